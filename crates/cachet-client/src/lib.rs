//! Cachet client for the check runner
//!
//! Implements the status page seam of `check-runner-core` on top of the
//! Cachet REST API: a single authenticated `PUT /components/{id}` call.

pub mod client;
pub mod error;

pub use client::{CachetClient, CachetConfig};
pub use error::CachetError;

/// Result type for Cachet operations
pub type Result<T> = std::result::Result<T, CachetError>;
