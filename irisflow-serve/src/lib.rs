//! # Irisflow Serve
//!
//! HTTP serving layer for the irisflow pipeline: a health endpoint, a
//! prediction endpoint, and a server-rendered model-explorer page, all
//! backed by an immutable [`ServeContext`] built once at startup.

pub mod context;
pub mod routes;
pub mod server;

// Re-export commonly used types at the crate root.
pub use context::ServeContext;
pub use routes::{SharedContext, router};
pub use server::serve;
