use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use dev_helper::assist::{self, AnnotateMode, LineRange};
use dev_helper::config::{self, Config};
use dev_helper::history::BranchTicketPattern;
use dev_helper::panel::{self, terminal::TerminalPanel};
use dev_helper::session::{LogSession, AUTH_REMEDIATION};
use dev_helper::theme::Theme;
use dev_helper::{workspace, CompletionClient, WorkflowError};

#[derive(Parser)]
#[command(name = "dev-helper", version)]
#[command(about = "AI-assisted commit messages, code comments and squash guides")]
struct Cli {
    /// Repository to work in (default: current directory)
    #[arg(long, global = true)]
    workspace: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Browse recent commits, pick two and get a squash guide
    Log {
        /// Speak JSON lines on stdin/stdout instead of the interactive prompt
        #[arg(long)]
        json: bool,

        /// Number of commits to load (default from config)
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Generate a commit message for the working-tree changes
    CommitMessage,

    /// Add comments to a range of lines
    Comment(AnnotateArgs),

    /// Polish an existing comment in a range of lines
    Polish(AnnotateArgs),

    /// Remove the stored API key
    ClearKey,

    /// Print the JSON Schema of the panel protocol
    Schema,
}

#[derive(clap::Args)]
struct AnnotateArgs {
    file: PathBuf,

    /// Lines to send, as START:END (1-based, inclusive)
    #[arg(long)]
    lines: LineRange,

    /// Replace the lines in the file instead of printing the result
    #[arg(long)]
    in_place: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config_path = config::get_config_path()?;

    match cli.command {
        Command::ClearKey => {
            Config::clear_api_key(&config_path)?;
            println!("{}", "API key has been cleared!".green());
            return Ok(());
        }
        Command::Schema => {
            println!("{}", serde_json::to_string_pretty(&panel::protocol_schema())?);
            return Ok(());
        }
        _ => {}
    }

    let result = run(cli, &config_path).await;
    if let Err(e) = &result {
        if e.downcast_ref::<WorkflowError>().is_some_and(WorkflowError::is_auth) {
            eprintln!("{}: {}", "Error".red().bold(), AUTH_REMEDIATION);
        }
    }
    result
}

async fn run(cli: Cli, config_path: &Path) -> Result<()> {
    let mut config = Config::load_or_create(config_path)?;
    let theme = Theme::for_output(config.display.color_output);

    match cli.command {
        Command::Log { json, limit } => {
            let git = workspace::open(cli.workspace.as_deref(), &config.git.binary)?;
            let completion = completion_client(&mut config, config_path)?;
            let limit = limit.unwrap_or(config.git.log_limit);
            show_log(git, completion, limit, json, theme).await
        }
        Command::CommitMessage => {
            let git = workspace::open(cli.workspace.as_deref(), &config.git.binary)?;
            let completion = completion_client(&mut config, config_path)?;
            let tickets = BranchTicketPattern::default();
            if let Some(message) = assist::commit_message(&git, &completion, &tickets).await? {
                println!("{}", message);
            }
            Ok(())
        }
        Command::Comment(args) => {
            let completion = completion_client(&mut config, config_path)?;
            annotate(&completion, AnnotateMode::Comment, &args).await
        }
        Command::Polish(args) => {
            let completion = completion_client(&mut config, config_path)?;
            annotate(&completion, AnnotateMode::Polish, &args).await
        }
        Command::ClearKey | Command::Schema => Ok(()),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Builds the completion client, asking for a key first if none is stored.
fn completion_client(config: &mut Config, config_path: &Path) -> Result<CompletionClient> {
    let mut client = CompletionClient::new(config.ai.clone());
    if config.ai.api_key().is_some() {
        return Ok(client);
    }

    let key = dialoguer::Password::new()
        .with_prompt(format!("Enter your {:?} API key", config.ai.provider))
        .allow_empty_password(true)
        .interact()
        .context("Failed to read API key")?;
    if key.trim().is_empty() {
        bail!("API key is required!");
    }

    config.store_api_key(config_path, key.trim())?;
    client.reset_credentials(Some(key.trim().to_string()));
    Ok(client)
}

async fn show_log(
    git: dev_helper::GitManager,
    completion: CompletionClient,
    limit: usize,
    json: bool,
    theme: Theme,
) -> Result<()> {
    let session = LogSession::new(
        Arc::new(git),
        Arc::new(completion),
        Box::new(BranchTicketPattern::default()),
    );
    let (handle, end) = panel::channel();
    let session_task = tokio::spawn(session.run(handle, limit));
    let input = panel::stdin_lines();

    if json {
        panel::json::run(input, tokio::io::stdout(), end).await?;
    } else {
        println!("{}", "dev-helper - commit history".green().bold());
        TerminalPanel::new(theme).run(input, end).await?;
    }

    session_task.await.context("Log session panicked")??;
    Ok(())
}

async fn annotate(completion: &CompletionClient, mode: AnnotateMode, args: &AnnotateArgs) -> Result<()> {
    let source = std::fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read {:?}", args.file))?;

    eprintln!("Sending lines {} of {:?}, please wait...", args.lines, args.file);
    let Some(result) = assist::annotate(completion, mode, &source, args.lines).await? else {
        return Ok(());
    };

    if args.in_place {
        std::fs::write(&args.file, assist::splice(&source, args.lines, &result))
            .with_context(|| format!("Failed to write {:?}", args.file))?;
    } else {
        println!("{}", result);
    }
    Ok(())
}
