//! The title state machine.
//!
//! A parse walks candidate `<` occurrences in order: optional spaces, the
//! five-byte `title` token, anything up to `>`, then the content up to the
//! next `<`. A candidate whose token does not match is abandoned without
//! rewinding, so a `<` hidden inside those five bytes is never seen:
//! `<a<title>x</title>` has no title.

use serde_json::json;
use tokio::io::AsyncBufRead;

use crate::constants::{TAG_CLOSE, TAG_OPEN, TITLE_TOKEN};
use crate::diagnostics::{Diagnostics, Level};
use crate::error::Result;
use crate::postprocess::decode_title;
use crate::scanner::{ByteSource, Scanned};

/// Result of a single parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractedTitle {
    /// Non-empty title text with entities resolved.
    Found(String),
    Absent,
}

impl ExtractedTitle {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    pub fn as_deref(&self) -> Option<&str> {
        match self {
            Self::Found(s) => Some(s),
            Self::Absent => None,
        }
    }

    /// The title, or an empty string when there is none.
    pub fn into_string(self) -> String {
        match self {
            Self::Found(s) => s,
            Self::Absent => String::new(),
        }
    }
}

/// One-shot title parser over a byte stream.
///
/// Built fresh for every document and consumed by [`Parser::parse`].
pub struct Parser<'d, R, D: ?Sized> {
    source: ByteSource<R>,
    diagnostics: &'d D,
}

impl<'d, R, D> Parser<'d, R, D>
where
    R: AsyncBufRead + Unpin,
    D: Diagnostics + ?Sized,
{
    pub fn new(reader: R, diagnostics: &'d D) -> Self {
        Self {
            source: ByteSource::new(reader),
            diagnostics,
        }
    }

    pub async fn parse(mut self) -> Result<ExtractedTitle> {
        loop {
            let Scanned::Value(()) = self.source.skip_until(TAG_OPEN).await? else {
                return Ok(self.exhausted("seeking '<'"));
            };
            self.log_peek().await;

            let Scanned::Value(()) = self.source.skip_spaces().await? else {
                return Ok(self.exhausted("skipping spaces"));
            };
            self.log_peek().await;

            let Scanned::Value(found) = self.source.match_ascii_lowercase(TITLE_TOKEN).await?
            else {
                return Ok(self.exhausted("matching 'title'"));
            };
            if !found {
                self.diagnostics.debug("'title' not found, continuing", None);
                continue;
            }
            self.diagnostics.debug("'title' found", None);
            self.log_peek().await;

            let Scanned::Value(()) = self.source.skip_until(TAG_CLOSE).await? else {
                return Ok(self.exhausted("seeking '>'"));
            };
            self.log_peek().await;

            let Scanned::Value(raw) = self.source.read_until(TAG_OPEN).await? else {
                return Ok(self.exhausted("reading title content"));
            };
            let title = decode_title(&raw, self.diagnostics);
            self.diagnostics.debug(
                "title captured",
                Some(json!({ "bytes": raw.len(), "offset": self.source.consumed() })),
            );

            return Ok(if title.is_empty() {
                ExtractedTitle::Absent
            } else {
                ExtractedTitle::Found(title)
            });
        }
    }

    fn exhausted(&self, stage: &str) -> ExtractedTitle {
        self.diagnostics.debug(
            "end of input",
            Some(json!({ "stage": stage, "offset": self.source.consumed() })),
        );
        ExtractedTitle::Absent
    }

    async fn log_peek(&mut self) {
        if !self.diagnostics.enabled(Level::Debug) {
            return;
        }
        match self.source.peek().await {
            Ok(Some(b)) => self
                .diagnostics
                .debug("peek", Some(json!(String::from_utf8_lossy(&[b])))),
            Ok(None) => self.diagnostics.debug("peek error", Some(json!("EOF"))),
            Err(err) => self
                .diagnostics
                .debug("peek error", Some(json!(err.to_string()))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::JsonLogger;
    use tokio::io::BufReader;

    async fn extract(input: &[u8]) -> ExtractedTitle {
        let logger = JsonLogger::new(Vec::new(), Level::Debug);
        Parser::new(input, &logger).parse().await.unwrap()
    }

    fn found(s: &str) -> ExtractedTitle {
        ExtractedTitle::Found(s.to_string())
    }

    #[tokio::test]
    async fn test_simple_title() {
        assert_eq!(extract(b"<title>The TITLE</title>").await, found("The TITLE"));
    }

    #[tokio::test]
    async fn test_tag_name_case_and_spaces() {
        assert_eq!(extract(b"<TITLE>Upper</TITLE>").await, found("Upper"));
        assert_eq!(extract(b"<   TiTle>Mixed</title>").await, found("Mixed"));
    }

    #[tokio::test]
    async fn test_attributes_are_skipped() {
        let html = br#"<html><head><title lang="en" data-x='1'>With attrs</title>"#;
        assert_eq!(extract(html).await, found("With attrs"));
    }

    #[tokio::test]
    async fn test_content_is_returned_as_is() {
        assert_eq!(
            extract(b"<title>  Spaced  Out \n</title>").await,
            found("  Spaced  Out \n")
        );
    }

    #[tokio::test]
    async fn test_first_title_wins() {
        let html = b"<head><title>First</title><title>Second</title>";
        assert_eq!(extract(html).await, found("First"));
    }

    #[tokio::test]
    async fn test_short_tag_swallows_following_candidate() {
        // The five bytes read as the token after the first "<" are "foo><". They include
        // the '<' that opens the first <title>, so that element is never seen
        // and the scan resumes at "</title>", then matches the second <title>.
        let html = b"<foo><title>First</title><title>Second</title>";
        assert_eq!(extract(html).await, found("Second"));
    }

    #[tokio::test]
    async fn test_capture_stops_at_any_tag() {
        assert_eq!(extract(b"<title>Hello <b>world</b></title>").await, found("Hello "));
    }

    #[tokio::test]
    async fn test_no_title() {
        assert_eq!(extract(b"<html><body>nothing</body></html>").await, ExtractedTitle::Absent);
        assert_eq!(extract(b"").await, ExtractedTitle::Absent);
        assert_eq!(extract(b"%PDF-1.7 binary").await, ExtractedTitle::Absent);
    }

    #[tokio::test]
    async fn test_unterminated_title() {
        assert_eq!(extract(b"<title>").await, ExtractedTitle::Absent);
        assert_eq!(extract(b"<title>Half a title").await, ExtractedTitle::Absent);
        assert_eq!(extract(b"<title lang=\"en\"").await, ExtractedTitle::Absent);
        assert_eq!(extract(b"<tit").await, ExtractedTitle::Absent);
    }

    #[tokio::test]
    async fn test_empty_title_is_absent() {
        assert_eq!(extract(b"<title></title>").await, ExtractedTitle::Absent);
    }

    #[tokio::test]
    async fn test_mismatched_token_is_not_rescanned() {
        // The five bytes after the first '<' swallow the second '<'.
        assert_eq!(extract(b"<a<title>Hidden</title>").await, ExtractedTitle::Absent);
        assert_eq!(extract(b"<titletitle>").await, ExtractedTitle::Absent);
        assert_eq!(extract(b"<title<title>x<").await, found("x"));
    }

    #[tokio::test]
    async fn test_only_space_is_whitespace() {
        assert_eq!(extract(b"<\ntitle>Newline</title>").await, ExtractedTitle::Absent);
        assert_eq!(extract(b"<\ttitle>Tab</title>").await, ExtractedTitle::Absent);
        assert_eq!(extract(b"<title >Trailing</title>").await, found("Trailing"));
    }

    #[tokio::test]
    async fn test_titles_longer_than_the_buffer() {
        let html =
            b"<!doctype html><html><head><meta charset=utf-8><title>Chunked &amp; split</title>";
        let logger = JsonLogger::new(Vec::new(), Level::Debug);
        let reader = BufReader::with_capacity(3, &html[..]);
        let title = Parser::new(reader, &logger).parse().await.unwrap();
        assert_eq!(title, found("Chunked & split"));
    }

    #[tokio::test]
    async fn test_parse_is_repeatable() {
        let html = b"<head><title>Caf&#xE9;</title></head>";
        let first = extract(html).await;
        let second = extract(html).await;
        assert_eq!(first, found("Caf\u{e9}"));
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_debug_trace_is_logged() {
        let logger = JsonLogger::new(Vec::new(), Level::Debug);
        let title = Parser::new(&b"<html><title>x</title>"[..], &logger)
            .parse()
            .await
            .unwrap();
        assert_eq!(title.as_deref(), Some("x"));

        let log = String::from_utf8(logger.into_inner()).unwrap();
        assert!(log.contains("'title' not found, continuing"));
        assert!(log.contains("'title' found"));
        assert!(log.contains("\"message\":\"peek\""));
    }

    #[tokio::test]
    async fn test_quiet_logger_skips_peeks() {
        let logger = JsonLogger::new(Vec::new(), Level::Warn);
        let title = Parser::new(&b"<title>x</title>"[..], &logger)
            .parse()
            .await
            .unwrap();
        assert!(title.is_found());
        assert!(logger.into_inner().is_empty());
    }

    #[test]
    fn test_into_string() {
        assert_eq!(found("a").into_string(), "a");
        assert_eq!(ExtractedTitle::Absent.into_string(), "");
    }
}
