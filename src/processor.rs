use anyhow::Result;
use futures::stream::{self, StreamExt};
use reqwest::Client;
use serde_json::json;
use std::io::{self, BufRead};
use std::time::Duration;
use tokio::fs::File;
use tokio::io::{AsyncWrite, AsyncWriteExt, BufReader, BufWriter};

use keepsake::utils::normalize_url;
use keepsake::{Diagnostics, build_http_client, from_url_with, parse_from};

use crate::output::{TitleRecord, csv_header, format_record};
use crate::types::{Cli, OutputFormat};

/// Run the command selected by the CLI flags
pub async fn run(cli: &Cli, diagnostics: &(dyn Diagnostics + Send + Sync)) -> Result<()> {
    if cli.html {
        let stdin = BufReader::new(tokio::io::stdin());
        let title = parse_from(stdin, diagnostics).await?;
        println!("{title}");
        return Ok(());
    }

    let urls = if cli.urls.is_empty() {
        read_urls(io::stdin().lock())
    } else {
        cli.urls.clone()
    };

    let client = build_http_client(&cli.fetch_config())?;

    let mut out: Box<dyn AsyncWrite + Unpin + Send> = if let Some(output_path) = &cli.output {
        Box::new(BufWriter::new(File::create(output_path).await?))
    } else {
        Box::new(tokio::io::stdout())
    };

    if cli.format == OutputFormat::Csv {
        out.write_all(csv_header().as_bytes()).await?;
    }

    let concurrency_limit = if cli.concurrency == 0 {
        usize::MAX
    } else {
        cli.concurrency
    };

    let mut records = stream::iter(urls)
        .map(|url| fetch_record(&client, cli, url, diagnostics))
        .buffered(concurrency_limit);

    while let Some(record) = records.next().await {
        let line = format_record(&record, cli.format, cli.colored());
        out.write_all(line.as_bytes()).await?;
    }

    // Ensure all buffered output is written before exiting
    out.flush().await?;
    Ok(())
}

/// Collect non-empty, trimmed lines
fn read_urls(input: impl BufRead) -> Vec<String> {
    input
        .lines()
        .map_while(io::Result::ok)
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

/// Fetch one URL with retries and turn the outcome into a record
async fn fetch_record(
    client: &Client,
    cli: &Cli,
    input: String,
    diagnostics: &(dyn Diagnostics + Send + Sync),
) -> TitleRecord {
    let url = match normalize_url(&input) {
        Ok(url) => url,
        Err(err) => {
            diagnostics.error("normalize_url", Some(json!(err.to_string())));
            return TitleRecord {
                url: input,
                title: String::new(),
                error: Some(err.to_string()),
            };
        }
    };
    let url = String::from(url);

    let mut attempts = 0;
    loop {
        if attempts > 0 && cli.delay > 0 {
            tokio::time::sleep(Duration::from_millis(cli.delay)).await;
        }

        match from_url_with(client, &url, diagnostics).await {
            Ok(title) => {
                diagnostics.info("title", Some(json!({ "url": url, "title": title })));
                return TitleRecord {
                    url,
                    title,
                    error: None,
                };
            }
            Err(err) => {
                attempts += 1;
                if attempts <= cli.retry {
                    diagnostics.warn(
                        "attempt failed, retrying",
                        Some(json!({ "url": url, "attempt": attempts, "error": err.to_string() })),
                    );
                    continue;
                }
                diagnostics.error(
                    "from_url",
                    Some(json!({ "url": url, "error": err.to_string() })),
                );
                return TitleRecord {
                    url,
                    title: String::new(),
                    error: Some(err.to_string()),
                };
            }
        }
    }
}
