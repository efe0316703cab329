use colored::*;
use serde_json::json;

use keepsake::display_title;

use crate::types::OutputFormat;

/// Outcome of fetching one URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleRecord {
    pub url: String,
    /// Extracted title; empty when the page has none.
    pub title: String,
    pub error: Option<String>,
}

impl TitleRecord {
    pub fn display_title(&self) -> &str {
        display_title(&self.url, &self.title)
    }
}

pub fn csv_header() -> &'static str {
    "url,display_title,title,error\n"
}

/// Format a record in the requested output format
pub fn format_record(record: &TitleRecord, format: OutputFormat, colored: bool) -> String {
    match format {
        OutputFormat::Plain => format_plain_output(record, colored),
        OutputFormat::Jsonl => {
            let json_output = json!({
                "url": record.url,
                "display_title": record.display_title(),
                "title": record.title,
                "error": record.error,
            });
            json_output.to_string() + "\n"
        }
        OutputFormat::Csv => {
            let fields = [
                record.url.as_str(),
                record.display_title(),
                record.title.as_str(),
                record.error.as_deref().unwrap_or_default(),
            ];
            let mut csv_line = fields.map(csv_field).join(",");
            csv_line.push('\n');
            csv_line
        }
    }
}

fn format_plain_output(record: &TitleRecord, colored: bool) -> String {
    match (&record.error, colored) {
        (Some(err), true) => format!("[{}] -> {}\n", record.url.cyan(), err.red()),
        (Some(err), false) => format!("[{}] -> {}\n", record.url, err),
        (None, true) => {
            let title = if record.title.is_empty() {
                record.display_title().dimmed()
            } else {
                record.display_title().blue()
            };
            format!("[{}] {}\n", record.url.cyan(), title)
        }
        (None, false) => format!("[{}] {}\n", record.url, record.display_title()),
    }
}

fn csv_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}
