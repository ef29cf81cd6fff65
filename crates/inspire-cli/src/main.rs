use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use inspire_import::{
    Confirmation, DocumentType, FormFields, ImportConfig, ImportRequest, ImportSession, Importer,
    Preview, RunOutcome, Severity,
};

// ─── CLI Definition ─────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "inspire-import",
    about = "Import bibliographic metadata from DOI, arXiv and ISBN lookups",
    version,
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output in JSON format.
    /// Also enabled by setting INSPIRE_IMPORT_JSON=1.
    #[arg(long, global = true)]
    json: bool,

    /// Config file (defaults to ~/.config/inspire-import/config.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Raise log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up identifiers, preview the merged record and fill the form.
    Import {
        #[arg(long)]
        doi: Option<String>,
        #[arg(long)]
        arxiv: Option<String>,
        #[arg(long)]
        isbn: Option<String>,
        /// article, thesis, book, chapter or proceedings.
        #[arg(long = "type", default_value = "article")]
        document_type: DocumentType,
        /// Override server.base_url from the config.
        #[arg(long)]
        base_url: Option<String>,
        /// Accept the preview without asking.
        #[arg(long, short)]
        yes: bool,
    },

    /// Config management.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the config file path.
    Path,
    /// Print the effective configuration.
    Show,
    /// Write the default configuration to the config path.
    Init,
}

/// Exit codes.
#[repr(i32)]
enum ExitCode {
    NotFound = 2,
    Rejected = 8,
}

// ─── Main ───────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let start = Instant::now();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let json_output = cli.json || std::env::var("INSPIRE_IMPORT_JSON").as_deref() == Ok("1");
    let config_path = cli.config.clone().unwrap_or_else(ImportConfig::config_path);

    match cli.command {
        Commands::Import {
            doi,
            arxiv,
            isbn,
            document_type,
            base_url,
            yes,
        } => {
            let mut config = ImportConfig::load_from(&config_path)
                .with_context(|| format!("loading {}", config_path.display()))?;
            if let Some(url) = base_url {
                config.server.base_url = url;
            }

            let request = ImportRequest {
                doi,
                arxiv,
                isbn,
                document_type,
            };
            if request.is_empty() {
                anyhow::bail!("nothing to import: pass at least one of --doi, --arxiv, --isbn");
            }

            let importer = Importer::from_config(&config).context("building importer")?;
            let session = ImportSession::new(Arc::new(importer));
            let result = match session.run(&request).await {
                RunOutcome::Completed(result) => result,
                RunOutcome::Superseded => anyhow::bail!("import run was superseded"),
            };

            if !json_output {
                for msg in &result.status_messages {
                    eprintln!("{}", styled(msg.severity, &msg.text));
                }
            }

            let Some(preview) = Preview::from_result(&result) else {
                if json_output {
                    print_json(&serde_json::json!({
                        "status": "error",
                        "error": "not_found",
                        "data": { "messages": result.status_messages },
                        "meta": { "duration_ms": start.elapsed().as_millis() }
                    }))?;
                }
                std::process::exit(ExitCode::NotFound as i32);
            };

            let confirmation = if yes {
                Confirmation::Accepted
            } else {
                eprintln!();
                eprint!("{preview}");
                ask_confirmation()?
            };

            let mut form = FormFields::new();
            let written = preview.accept(confirmation, &mut form);
            let dur = start.elapsed().as_millis();

            if json_output {
                print_json(&serde_json::json!({
                    "status": if confirmation == Confirmation::Accepted { "ok" } else { "rejected" },
                    "data": { "form": form, "messages": result.status_messages },
                    "meta": { "duration_ms": dur }
                }))?;
            } else if confirmation == Confirmation::Rejected {
                eprintln!("Import discarded.");
            } else if written.is_empty() {
                eprintln!("Nothing to write.");
            } else {
                println!("{}", serde_json::to_string_pretty(&form)?);
            }

            if confirmation == Confirmation::Rejected {
                std::process::exit(ExitCode::Rejected as i32);
            }
        }

        Commands::Config { action } => match action {
            ConfigAction::Path => {
                if json_output {
                    print_json(&serde_json::json!({"status":"ok","data":{"path":config_path}}))?;
                } else {
                    println!("{}", config_path.display());
                }
            }
            ConfigAction::Show => {
                let config = ImportConfig::load_from(&config_path)?;
                if json_output {
                    print_json(&serde_json::json!({"status":"ok","data":config}))?;
                } else {
                    print!("{}", toml::to_string_pretty(&config)?);
                }
            }
            ConfigAction::Init => {
                if config_path.exists() {
                    anyhow::bail!("{} already exists", config_path.display());
                }
                ImportConfig::default().save_to(&config_path)?;
                if json_output {
                    print_json(&serde_json::json!({"status":"ok","data":{"path":config_path}}))?;
                } else {
                    println!("Wrote {}", config_path.display());
                }
            }
        },
    }

    Ok(())
}

// ─── Helpers ────────────────────────────────────────────────────────────────

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "inspire_import=debug,info",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn ask_confirmation() -> Result<Confirmation> {
    eprint!("\nWrite these values into the form? [y/N] ");
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(match line.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Confirmation::Accepted,
        _ => Confirmation::Rejected,
    })
}

fn styled(severity: Severity, text: &str) -> String {
    let tag = match severity {
        Severity::Success => "ok",
        Severity::Info => "info",
        Severity::Warning => "warn",
        Severity::Danger => "error",
    };
    format!("[{tag:>5}] {text}")
}

fn print_json(value: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}
