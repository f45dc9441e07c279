use anyhow::Context;
use api_client::Dispatch;
use clap::{Parser, ValueEnum};
use comfy_table::Table;
use configuration::LogLevel;
use engine::error::EngineError;
use engine::{Execution, TranslatorEngine};
use std::path::PathBuf;
use std::process::ExitCode;

/// The main entry point for the order translator.
#[tokio::main]
async fn main() -> ExitCode {
    // Parse command-line arguments
    let cli = Cli::parse();
    let _log_guard = configuration::init_tracing(cli.log_level);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let (message, code) = report(&e);
            tracing::error!("{message}");
            ExitCode::from(code)
        }
    }
}

/// Message and exit status for a failed run. Engine errors already embed their
/// cause in `Display`, so only other errors get the full `{:#}` chain.
fn report(error: &anyhow::Error) -> (String, u8) {
    match error.downcast_ref::<EngineError>() {
        Some(engine_error) => (engine_error.to_string(), engine_error.exit_code()),
        None => (format!("{error:#}"), 1),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Translate a natural-language trading instruction into a 3Commas smart trade.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// The instruction to translate (e.g. "Buy 0.25 BTCUSDT at 30000 limit").
    instruction: String,

    /// Build and print the signed request without sending it.
    #[arg(long)]
    dry_run: bool,

    /// Path to an optional .env file containing API credentials.
    #[arg(long, default_value = ".env")]
    env_file: PathBuf,

    /// Path to an optional TOML settings file (defaults to `translator.toml`).
    #[arg(long)]
    config: Option<PathBuf>,

    /// How to print the result on stdout.
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,

    /// Log verbosity used when RUST_LOG is not set.
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

// ==============================================================================
// Command Logic
// ==============================================================================

/// Loads configuration, then runs the pipeline once and prints the outcome.
///
/// Credentials are validated before the instruction is even parsed.
async fn run(cli: Cli) -> anyhow::Result<()> {
    configuration::load_env_file(Some(cli.env_file.as_path())).map_err(EngineError::from)?;
    let settings = configuration::load_settings(cli.config.as_deref()).map_err(EngineError::from)?;

    let engine = TranslatorEngine::from_settings(settings)?;
    let execution = engine.execute(&cli.instruction, cli.dry_run).await?;

    let rendered = match cli.output {
        OutputFormat::Table => render_table(&execution)?,
        OutputFormat::Json => {
            serde_json::to_string_pretty(&execution).context("Failed to render the result as JSON")?
        }
    };
    println!("{rendered}");

    if execution.is_dry_run() {
        tracing::info!("Dry run complete. Nothing was sent.");
    } else {
        tracing::info!("Trade created successfully.");
    }
    Ok(())
}

fn render_table(execution: &Execution) -> anyhow::Result<String> {
    let intent = &execution.intent;
    let mut table = Table::new();
    table.set_header(vec!["Field", "Value"]);

    table.add_row(vec!["Side".to_string(), intent.side().to_string()]);
    table.add_row(vec!["Pair".to_string(), intent.pair().to_string()]);
    table.add_row(vec!["Quantity".to_string(), intent.quantity().to_string()]);
    table.add_row(vec!["Order type".to_string(), intent.order_type().to_string()]);
    table.add_row(vec![
        "Limit price".to_string(),
        intent.limit_price().map_or_else(|| "-".to_string(), |p| p.to_string()),
    ]);
    table.add_row(vec!["Endpoint".to_string(), execution.payload.endpoint.to_string()]);

    match &execution.dispatch {
        Dispatch::DryRun(request) => {
            table.add_row(vec!["Mode".to_string(), "dry run (not sent)".to_string()]);
            table.add_row(vec!["URL".to_string(), request.url.clone()]);
            for (name, value) in &request.headers {
                table.add_row(vec![format!("Header {name}"), value.clone()]);
            }
            table.add_row(vec!["Body".to_string(), request.body.clone()]);
        }
        Dispatch::Sent(response) => {
            table.add_row(vec!["Mode".to_string(), "sent".to_string()]);
            table.add_row(vec![
                "Trade id".to_string(),
                response.id.map_or_else(|| "-".to_string(), |id| id.to_string()),
            ]);
            let raw = serde_json::to_string(response).context("Failed to render the API response")?;
            table.add_row(vec!["Response".to_string(), raw]);
        }
    }

    Ok(table.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use configuration::error::ConfigError;

    #[test]
    fn engine_error_message_is_reported_once() {
        let error = anyhow::Error::from(EngineError::from(ConfigError::Missing(vec![
            "THREECOMMAS_API_SECRET".to_string(),
        ])));

        let (message, code) = report(&error);
        assert_eq!(message.matches("Missing configuration values").count(), 1, "{message}");
        assert_eq!(code, 1);
    }

    #[test]
    fn other_errors_keep_their_context_chain() {
        let error = anyhow::anyhow!("disk full").context("Failed to render the result as JSON");

        let (message, code) = report(&error);
        assert_eq!(message, "Failed to render the result as JSON: disk full");
        assert_eq!(code, 1);
    }
}
