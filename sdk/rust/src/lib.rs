//! Typed HTTP client for the user service.

pub mod client;

pub use client::{ClientError, UserClient};
