//! Streaming page-title extraction for bookmarks.
//!
//! The extractor reads an HTTP body (or any buffered async reader) once,
//! front to back, and stops at the first `<title>` element it recognises.
//! It never holds more of the document than the title text itself.
//!
//! ```no_run
//! use keepsake::{TracingDiagnostics, from_url};
//!
//! # async fn run() -> keepsake::Result<()> {
//! let title = from_url("https://example.com", &TracingDiagnostics).await?;
//! println!("{}", keepsake::display_title("https://example.com", &title));
//! # Ok(())
//! # }
//! ```

pub mod constants;
pub mod diagnostics;
pub mod entities;
pub mod error;
pub mod fetch;
pub mod http;
pub mod parser;
pub mod postprocess;
pub mod scanner;
pub mod utils;

pub use diagnostics::{Diagnostics, JsonLogger, Level, TracingDiagnostics};
pub use error::{Error, Result};
pub use fetch::{display_title, from_url, from_url_with, parse_from};
pub use http::{FetchConfig, build_http_client};
pub use parser::{ExtractedTitle, Parser};
pub use scanner::{ByteSource, Scanned};
