use url::Url;

use crate::error::{Error, Result};

/// Add a scheme to bare host inputs and validate the result.
///
/// `example.com:80` becomes `http://example.com:80`; any other bare input gets
/// `https://`.
pub fn normalize_url(input: &str) -> Result<Url> {
    let trimmed = input.trim();
    let with_scheme = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else if host_port(trimmed) == Some("80") {
        format!("http://{trimmed}")
    } else {
        format!("https://{trimmed}")
    };

    Url::parse(&with_scheme).map_err(|source| Error::InvalidUrl {
        url: input.to_string(),
        source,
    })
}

fn host_port(bare: &str) -> Option<&str> {
    let authority = bare.split(['/', '?', '#']).next()?;
    let (_, port) = authority.rsplit_once(':')?;
    (!port.is_empty() && port.bytes().all(|b| b.is_ascii_digit())).then_some(port)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_url_with_scheme() {
        assert_eq!(
            normalize_url("http://example.com").unwrap().as_str(),
            "http://example.com/"
        );
        assert_eq!(
            normalize_url("  https://example.com/a?b=1 ").unwrap().as_str(),
            "https://example.com/a?b=1"
        );
    }

    #[test]
    fn test_normalize_url_port_80() {
        assert_eq!(
            normalize_url("example.com:80/docs").unwrap().scheme(),
            "http"
        );
    }

    #[test]
    fn test_normalize_url_other_ports() {
        let url = normalize_url("example.com:8443").unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.port(), Some(8443));
        assert_eq!(normalize_url("example.com").unwrap().scheme(), "https");
    }

    #[test]
    fn test_normalize_url_invalid() {
        assert!(matches!(
            normalize_url("exa mple.com"),
            Err(Error::InvalidUrl { .. })
        ));
        assert!(normalize_url("").is_err());
    }
}
