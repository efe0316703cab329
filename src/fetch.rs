//! End-to-end entry points: parse an open stream, or fetch a URL and parse its body.

use futures::TryStreamExt;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use serde_json::json;
use tokio::io::AsyncBufRead;
use tokio_util::io::StreamReader;

use crate::constants::PDF_CONTENT_TYPE;
use crate::diagnostics::Diagnostics;
use crate::error::Result;
use crate::parser::Parser;

/// Extract the title from an already-open byte stream.
///
/// Returns an empty string when the document has no title; errors are
/// reserved for read failures.
pub async fn parse_from<R, D>(reader: R, diagnostics: &D) -> Result<String>
where
    R: AsyncBufRead + Unpin,
    D: Diagnostics + ?Sized,
{
    let title = Parser::new(reader, diagnostics).parse().await?;
    Ok(title.into_string())
}

/// Fetch `url` with a default client and extract its title.
pub async fn from_url<D>(url: &str, diagnostics: &D) -> Result<String>
where
    D: Diagnostics + ?Sized,
{
    from_url_with(&Client::new(), url, diagnostics).await
}

/// Fetch `url` with `client` and extract its title.
///
/// PDF responses return an empty title without their body being read. The
/// response is dropped, closing the body, on every path out of this function.
pub async fn from_url_with<D>(client: &Client, url: &str, diagnostics: &D) -> Result<String>
where
    D: Diagnostics + ?Sized,
{
    let resp = client.get(url).send().await?;
    diagnostics.debug(
        "response",
        Some(json!({ "url": url, "status": resp.status().as_u16() })),
    );

    for ty in resp.headers().get_all(CONTENT_TYPE) {
        let ty = String::from_utf8_lossy(ty.as_bytes());
        diagnostics.debug("content type", Some(json!(ty)));
        if ty == PDF_CONTENT_TYPE {
            diagnostics.debug("PDF detected", None);
            return Ok(String::new());
        }
    }

    let body = StreamReader::new(Box::pin(
        resp.bytes_stream().map_err(std::io::Error::other),
    ));
    parse_from(body, diagnostics).await
}

/// The label to show for a bookmark: its title, or the URL when there is none.
pub fn display_title<'a>(url: &'a str, title: &'a str) -> &'a str {
    if title.is_empty() { url } else { title }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{JsonLogger, Level};
    use tokio::io::BufReader;

    #[tokio::test]
    async fn test_parse_from() {
        let logger = JsonLogger::new(Vec::new(), Level::Debug);
        let title = parse_from(&b"<title>The TITLE</title>"[..], &logger)
            .await
            .unwrap();
        assert_eq!(title, "The TITLE");
    }

    #[tokio::test]
    async fn test_parse_from_escape() {
        let logger = JsonLogger::new(Vec::new(), Level::Debug);
        let title = parse_from(&b"<title>Caf&#xE9;</title>"[..], &logger)
            .await
            .unwrap();
        assert_eq!(title, "Caf\u{e9}");
    }

    #[tokio::test]
    async fn test_parse_from_without_title_is_empty() {
        let logger = JsonLogger::new(Vec::new(), Level::Info);
        let title = parse_from(&b"plain text, no markup"[..], &logger)
            .await
            .unwrap();
        assert_eq!(title, "");

        let title = parse_from(&b"<html><title>"[..], &logger).await.unwrap();
        assert_eq!(title, "");
    }

    struct FailingReader;

    impl tokio::io::AsyncRead for FailingReader {
        fn poll_read(
            self: std::pin::Pin<&mut Self>,
            _cx: &mut std::task::Context<'_>,
            _buf: &mut tokio::io::ReadBuf<'_>,
        ) -> std::task::Poll<std::io::Result<()>> {
            std::task::Poll::Ready(Err(std::io::Error::other("connection reset")))
        }
    }

    #[tokio::test]
    async fn test_parse_from_propagates_read_errors() {
        let logger = JsonLogger::new(Vec::new(), Level::Info);
        let err = parse_from(BufReader::new(FailingReader), &logger)
            .await
            .unwrap_err();
        assert!(matches!(err, crate::Error::Io(_)));
    }

    #[test]
    fn test_display_title() {
        assert_eq!(display_title("https://example.com", ""), "https://example.com");
        assert_eq!(display_title("https://example.com", "Example"), "Example");
    }
}
