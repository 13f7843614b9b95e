//! Request handler module
//!
//! Routing dispatch, the fixed page routes, and static file serving.

pub mod pages;
pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
