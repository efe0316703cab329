use anyhow::Result;
use clap::Parser;
use tracing_subscriber::FmtSubscriber;

use keepsake::{Diagnostics, JsonLogger, TracingDiagnostics};

mod output;
mod processor;
mod types;

use types::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    initialize_logging(&cli)?;

    let diagnostics: Box<dyn Diagnostics + Send + Sync> = if cli.log_json {
        Box::new(JsonLogger::new(std::io::stderr(), cli.log_level))
    } else {
        Box::new(TracingDiagnostics)
    };

    processor::run(&cli, diagnostics.as_ref()).await
}

fn initialize_logging(cli: &Cli) -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(tracing::Level::from(cli.log_level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
