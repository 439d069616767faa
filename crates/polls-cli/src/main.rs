mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{choice::ChoiceSubcommand, question::QuestionSubcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "polls",
    about = "Publish poll questions and serve them over HTTP",
    version,
    propagate_version = true
)]
struct Cli {
    /// Site root (default: auto-detect from .polls/)
    #[arg(long, global = true, env = "POLLS_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a polls site in the current directory
    Init {
        /// Site title (default: directory name)
        #[arg(long)]
        title: Option<String>,
    },

    /// Serve the poll pages
    Serve {
        /// Interface to bind (overrides server.host)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides server.port; 0 = OS-assigned)
        #[arg(long)]
        port: Option<u16>,

        /// Open the index page in a browser
        #[arg(long)]
        open: bool,
    },

    /// Manage questions
    Question {
        #[command(subcommand)]
        subcommand: QuestionSubcommand,
    },

    /// Manage choices
    Choice {
        #[command(subcommand)]
        subcommand: ChoiceSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Init { title } => cmd::init::run(&root, title.as_deref()),
        Commands::Serve { host, port, open } => {
            cmd::serve::run(&root, host.as_deref(), port, open)
        }
        Commands::Question { subcommand } => cmd::question::run(&root, subcommand, cli.json),
        Commands::Choice { subcommand } => cmd::choice::run(&root, subcommand, cli.json),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
