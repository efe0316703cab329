pub mod client;
pub mod headers;

pub use client::{FetchConfig, build_http_client};
pub use headers::parse_headers;
