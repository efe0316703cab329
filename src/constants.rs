/// HTTP constants
pub const DEFAULT_REDIRECT_LIMIT: usize = 10;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_USER_AGENT: &str =
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Content types whose bodies are never scanned for a title
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Title scanning constants
pub const TITLE_TOKEN: &str = "title";
pub const TAG_OPEN: u8 = b'<';
pub const TAG_CLOSE: u8 = b'>';
pub const SPACE: u8 = b' ';
