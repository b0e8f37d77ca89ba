mod display;

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use helloaca_ai::{ContractAnalyzer, build_analysis_prompt, normalize_response};
use helloaca_config::HelloAcaConfig;
use helloaca_core::check_contract_text;
use tracing_subscriber::EnvFilter;

use crate::display::AnalysisCard;

#[derive(Parser)]
#[command(name = "helloaca", version, about = "AI contract risk analysis")]
struct Cli {
    /// Path to a helloaca.toml config file.
    #[arg(long, global = true, env = "HELLOACA_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP analysis service.
    Serve {
        /// Address to listen on, overriding the configured one.
        #[arg(long)]
        bind: Option<String>,
    },
    /// Analyse a contract file with the configured model.
    Analyze {
        file: PathBuf,
        /// Print the response envelope as JSON instead of a card.
        #[arg(long)]
        json: bool,
        /// Contract id to echo in the envelope.
        #[arg(long)]
        contract_id: Option<String>,
    },
    /// Print the prompt that would be sent for a contract file.
    Prompt { file: PathBuf },
    /// Run a saved model reply through extraction and validation.
    Check {
        file: PathBuf,
        /// Deserialize every leaf, not just the top-level shape.
        #[arg(long)]
        strict: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = HelloAcaConfig::load_with_dotenv(cli.config.as_deref())?;
    tracing::debug!("helloaca v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Command::Serve { bind } => {
            if let Some(bind) = bind {
                config.server.bind = bind;
                config.validate()?;
            }
            helloaca_server::serve(&config).await
        }
        Command::Analyze {
            file,
            json,
            contract_id,
        } => analyze(&config, &file, json, contract_id).await,
        Command::Prompt { file } => {
            let text = read_file(&file).await?;
            let text = check_contract_text(&text, config.analysis.max_contract_chars)?;
            println!("{}", build_analysis_prompt(text));
            Ok(())
        }
        Command::Check { file, strict } => {
            let raw = read_file(&file).await?;
            let strict = strict || config.analysis.strict_validation;
            match normalize_response(&raw, strict) {
                Ok(value) => {
                    print!("{}", AnalysisCard::new(&value, false));
                    Ok(())
                }
                Err(err) => bail!("{} failed: {err}", err.stage()),
            }
        }
    }
}

async fn analyze(
    config: &HelloAcaConfig,
    file: &Path,
    json: bool,
    contract_id: Option<String>,
) -> anyhow::Result<()> {
    let text = read_file(file).await?;
    let text = check_contract_text(&text, config.analysis.max_contract_chars)?;

    let analyzer = ContractAnalyzer::from_config(config)?;
    let analysis = analyzer
        .analyze(text)
        .await
        .context("analysis service unavailable")?;

    if json {
        let envelope = analysis.into_envelope(contract_id.map(Into::into), chrono::Utc::now());
        println!("{}", serde_json::to_string_pretty(&envelope)?);
    } else {
        let value = analysis.to_value();
        print!("{}", AnalysisCard::new(&value, analysis.is_fallback()));
    }
    Ok(())
}

async fn read_file(path: &Path) -> anyhow::Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::io::Write;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn analyze_flags_parse() {
        let cli = Cli::try_parse_from([
            "helloaca",
            "analyze",
            "nda.txt",
            "--json",
            "--contract-id",
            "c-9",
        ])
        .unwrap();
        match cli.command {
            Command::Analyze {
                file,
                json,
                contract_id,
            } => {
                assert_eq!(file, PathBuf::from("nda.txt"));
                assert!(json);
                assert_eq!(contract_id.as_deref(), Some("c-9"));
            }
            _ => panic!("expected analyze"),
        }
    }

    #[tokio::test]
    async fn read_file_reports_path() {
        let err = read_file(Path::new("/nonexistent/contract.txt"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/contract.txt"));
    }

    #[tokio::test]
    async fn read_file_returns_contents() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "The parties agree.").unwrap();
        assert_eq!(read_file(file.path()).await.unwrap(), "The parties agree.");
    }
}
