//! Health probe subsystem.
//!
//! # Data Flow
//! ```text
//! Orchestrator probes:
//!     GET /health → probes.rs (liveness, always 200 while the process runs)
//!     GET /ready  → probes.rs → state.rs (503 once shutdown starts)
//! ```

pub mod probes;
pub mod state;

pub use state::Readiness;
