//! HTTP protocol layer module
//!
//! Protocol-level building blocks shared by the route handlers and the
//! static file server, decoupled from business logic.

pub mod cache;
pub mod mime;
pub mod range;
pub mod response;

// Re-export commonly used helpers
pub use range::parse_range_header;
pub use response::{
    build_304_response, build_404_response, build_416_response, build_500_response,
    build_html_response, build_text_response,
};
