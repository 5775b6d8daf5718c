//! Readiness state shared between the server and the `/ready` probe.
//!
//! # States
//! - Ready: serving traffic
//! - Draining: shutdown has begun, load balancers should stop sending traffic
//!
//! The transition is one-way.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct Readiness {
    draining: Arc<AtomicBool>,
}

impl Readiness {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_ready(&self) -> bool {
        !self.draining.load(Ordering::Acquire)
    }

    /// Mark the service as draining. Returns false if it already was.
    pub fn set_draining(&self) -> bool {
        !self.draining.swap(true, Ordering::AcqRel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draining_is_shared_and_one_way() {
        let readiness = Readiness::new();
        let probe = readiness.clone();
        assert!(probe.is_ready());

        assert!(readiness.set_draining());
        assert!(!readiness.set_draining());
        assert!(!probe.is_ready());
    }
}
