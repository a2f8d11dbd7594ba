use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::Context;

#[derive(Parser)]
#[command(name = "membank")]
#[command(about = "Branch-aware memory banks for git projects")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Increase logging verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Config file (defaults to ~/.config/membank/config.json)
    #[arg(long, global = true, env = "MEMBANK_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show identity, bank locations and gitignore status
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Initialize the central bank for the current branch and load it locally
    Create {
        /// Reinitialize even if the central bank already has documents
        #[arg(short, long)]
        force: bool,
    },

    /// Save the current bank and load another branch's
    Switch {
        /// Target branch (defaults to the current git branch)
        branch: Option<String>,

        /// Copy the current bank when the target has none
        #[arg(long, conflicts_with = "fresh")]
        inherit: bool,

        /// Start from templates when the target has none
        #[arg(long)]
        fresh: bool,
    },

    /// Push local documents to the central bank, then pull them back
    Sync,

    /// List branches with a central bank for this project
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Move a branch's central bank into the archive
    Archive {
        /// Branch to archive (defaults to the current branch)
        branch: Option<String>,
    },

    /// Append another branch's bank into the current one
    Merge {
        /// Source branch
        branch: String,
    },

    /// Record a rebase onto another branch and merge its bank
    Rebase {
        /// Base branch
        branch: String,
    },

    /// Report gitignore status
    Check,

    /// Add the memory-bank entries to the project and global gitignore
    FixGitignore,

    /// Git hook entry point (called by hook shims)
    Hook {
        /// pre-checkout, post-checkout, post-merge or post-rebase
        name: String,

        /// Arguments git passed to the hook
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Write a config file with the default settings
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Show the effective configuration
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // --help and --version are not failures
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    // Hooks run inside git, so stay quiet unless asked
    let log_level = match (cli.quiet, cli.verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_thread_names(false),
        )
        .init();

    debug!("Starting membank v{}", env!("CARGO_PKG_VERSION"));

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red(), e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli.config.as_deref();
    let ctx = || Context::load(config);

    match cli.command.unwrap_or(Commands::Status { json: false }) {
        Commands::Status { json } => commands::status::execute(&ctx()?, json),
        Commands::Create { force } => commands::create::execute(&ctx()?, force),
        Commands::Switch {
            branch,
            inherit,
            fresh,
        } => commands::switch::execute(&ctx()?, branch.as_deref(), inherit, fresh),
        Commands::Sync => commands::sync::execute(&ctx()?),
        Commands::List { json } => commands::list::execute(&ctx()?, json),
        Commands::Archive { branch } => commands::archive::execute(&ctx()?, branch.as_deref()),
        Commands::Merge { branch } => commands::merge::execute(&ctx()?, &branch),
        Commands::Rebase { branch } => commands::rebase::execute(&ctx()?, &branch),
        Commands::Check => commands::gitignore::check(&ctx()?),
        Commands::FixGitignore => commands::gitignore::fix(&ctx()?),
        Commands::Hook { name, args } => commands::hook::execute(config, &name, &args),
        Commands::Config { command } => match command {
            ConfigCommands::Init { force } => commands::config::init(config, force),
            ConfigCommands::Show { json } => commands::config::show(config, json),
        },
    }
}
