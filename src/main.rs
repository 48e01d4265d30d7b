//! gpit - CLI entry point.

use std::io;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use gpit::config::{CliOverrides, Config};
use gpit::editor::SystemEditor;
use gpit::error::SessionError;
use gpit::git::SystemGit;
use gpit::interact::TerminalPrompter;
use gpit::llm::OpenAiClient;
use gpit::session::Session;

/// Commit working-tree changes with an AI-suggested message, then push.
#[derive(Parser, Debug)]
#[command(name = "gpit")]
#[command(about = "Commit and push with an AI-suggested commit message")]
#[command(version)]
struct Cli {
    /// Chat model to use (overrides OPENAI_MODEL)
    #[arg(long)]
    model: Option<String>,

    /// Soft-reset unpushed commits you decline to push, folding them into the new commit
    #[arg(long)]
    reset_on_decline: bool,

    /// Print debug logs to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // A missing .env is normal.
    dotenvy::dotenv().ok();

    if let Err(e) = init_tracing(cli.verbose) {
        eprintln!("Warning: {:#}", e);
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

/// `RUST_LOG` wins; otherwise warnings only, or debug with `--verbose`.
fn init_tracing(verbose: bool) -> Result<()> {
    let default_directive = if verbose { "gpit=debug" } else { "gpit=warn" };
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_directive)
            .context("Invalid default log filter")?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .without_time()
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialise logging: {e}"))
}

async fn run(cli: Cli) -> Result<(), SessionError> {
    let overrides = CliOverrides {
        model: cli.model,
        reset_on_decline: cli.reset_on_decline,
    };
    let config = Config::from_env(&overrides)?;

    let client = OpenAiClient::new(&config)?;
    tracing::debug!("Using model {}", client.model());

    let git = SystemGit::new();
    let editor = SystemEditor::new(config.editor.clone());
    let mut prompter = TerminalPrompter;
    let mut stdout = io::stdout();

    Session {
        git: &git,
        client: &client,
        prompter: &mut prompter,
        editor: &editor,
        out: &mut stdout,
        decline_policy: config.decline_policy,
    }
    .run()
    .await?;

    Ok(())
}
