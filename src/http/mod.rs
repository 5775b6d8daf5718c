//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID, span, metrics, path id parsing)
//!     → handlers.rs / health probes
//!     → store (UserStore)
//!     → response.rs (error → status + JSON body)
//!     → Send to client
//! ```

pub mod extract;
pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use response::ApiError;
pub use server::{build_router, AppState, HttpServer};
