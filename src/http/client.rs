use reqwest::{Client, redirect::Policy};
use std::time::Duration;

use crate::constants::{DEFAULT_REDIRECT_LIMIT, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};
use crate::error::Result;
use crate::http::headers::parse_headers;

/// Transport settings for fetching pages.
///
/// The request timeout is the only bound on how long a fetch can take; the
/// title scanner itself waits as long as the body stream does.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub timeout: Duration,
    pub proxy: Option<String>,
    pub verify_ssl: bool,
    pub follow_redirect: bool,
    pub http2: bool,
    /// Extra headers in `Key: Value` form.
    pub headers: Vec<String>,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            proxy: None,
            verify_ssl: true,
            follow_redirect: true,
            http2: false,
            headers: Vec::new(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Build HTTP client from fetch configuration
pub fn build_http_client(config: &FetchConfig) -> Result<Client> {
    let redirect_policy = if config.follow_redirect {
        Policy::limited(DEFAULT_REDIRECT_LIMIT)
    } else {
        Policy::none()
    };

    let default_headers = parse_headers(&config.headers);

    let mut client_builder = Client::builder()
        .timeout(config.timeout)
        .redirect(redirect_policy)
        .user_agent(config.user_agent.as_str())
        .default_headers(default_headers);

    if !config.verify_ssl {
        client_builder = client_builder.danger_accept_invalid_certs(true);
    }

    if let Some(proxy_url) = &config.proxy {
        let proxy = reqwest::Proxy::all(proxy_url)?;
        client_builder = client_builder.proxy(proxy);
    }

    if !config.http2 {
        client_builder = client_builder.http1_only();
    }

    Ok(client_builder.build()?)
}
