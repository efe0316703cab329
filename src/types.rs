use clap::Parser;
use std::time::Duration;

use keepsake::constants::DEFAULT_USER_AGENT;
use keepsake::{FetchConfig, Level};

/// Output format options
#[derive(clap::ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Plain,
    Jsonl,
    Csv,
}

/// Fetch web pages and print the title each would be bookmarked under.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// URLs to fetch. Read from stdin, one per line, when none are given.
    pub urls: Vec<String>,

    /// Read an HTML document from stdin and print its title instead of fetching.
    #[arg(long, conflicts_with = "urls")]
    pub html: bool,

    // NETWORK
    /// Timeout for each request in seconds.
    #[arg(long, default_value_t = 10, help_heading = "NETWORK")]
    pub timeout: u64,

    /// Number of retries for failed requests.
    #[arg(long, default_value_t = 0, help_heading = "NETWORK")]
    pub retry: u32,

    /// Delay between retries in milliseconds.
    #[arg(long, default_value_t = 0, help_heading = "NETWORK")]
    pub delay: u64,

    /// Maximum number of concurrent requests (0 for unlimited).
    #[arg(long, default_value_t = 8, help_heading = "NETWORK")]
    pub concurrency: usize,

    /// Use a proxy for requests (e.g., "http://127.0.0.1:8080").
    #[arg(long, help_heading = "NETWORK")]
    pub proxy: Option<String>,

    /// Skip TLS certificate verification.
    #[arg(long, help_heading = "NETWORK")]
    pub insecure: bool,

    // HTTP
    /// Do not follow HTTP redirects.
    #[arg(long, help_heading = "HTTP")]
    pub no_follow_redirect: bool,

    /// Use HTTP/2 for requests.
    #[arg(long, help_heading = "HTTP")]
    pub http2: bool,

    /// Custom headers to add to the request (e.g., "Accept-Language: en").
    #[arg(short = 'H', long = "header", help_heading = "HTTP")]
    pub headers: Vec<String>,

    /// User-Agent sent with every request.
    #[arg(long, default_value = DEFAULT_USER_AGENT, help_heading = "HTTP")]
    pub user_agent: String,

    // OUTPUT
    /// Output file to save results (instead of stdout).
    #[arg(short, long, help_heading = "OUTPUT")]
    pub output: Option<String>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Plain, help_heading = "OUTPUT")]
    pub format: OutputFormat,

    /// Disable color output.
    #[arg(long, help_heading = "OUTPUT")]
    pub no_color: bool,

    // LOG
    /// Minimum log level: debug, info, warn or error.
    #[arg(long, default_value_t = Level::Info, help_heading = "LOG")]
    pub log_level: Level,

    /// Write extractor diagnostics to stderr as JSON lines.
    #[arg(long, help_heading = "LOG")]
    pub log_json: bool,
}

impl Cli {
    pub fn fetch_config(&self) -> FetchConfig {
        FetchConfig {
            timeout: Duration::from_secs(self.timeout),
            proxy: self.proxy.clone(),
            verify_ssl: !self.insecure,
            follow_redirect: !self.no_follow_redirect,
            http2: self.http2,
            headers: self.headers.clone(),
            user_agent: self.user_agent.clone(),
        }
    }

    pub fn colored(&self) -> bool {
        self.output.is_none() && !self.no_color
    }
}
