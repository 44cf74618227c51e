use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// deploy-agent - sync, build, and redeploy the frontend and backend services
#[derive(Parser, Debug)]
#[command(name = "deploy-agent")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory holding frontend/, backend/, and docker-compose.yml
    #[arg(long, global = true, default_value = ".")]
    pub base_dir: PathBuf,

    /// Config file (default: <base-dir>/deploy-agent.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Emit NDJSON events on stdout
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Repository selection shared by both commands
#[derive(Args, Debug, Clone, Default)]
pub struct RepoArgs {
    /// Frontend repository URL (overrides FE_REPO_URL)
    #[arg(long, value_name = "URL")]
    pub fe_repo: Option<String>,

    /// Backend repository URL (overrides BE_REPO_URL)
    #[arg(long, value_name = "URL")]
    pub be_repo: Option<String>,

    /// Do not prepare local venv / node_modules
    #[arg(long)]
    pub skip_bootstrap: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sync both repositories, rebuild images, and restart the services
    Deploy {
        #[command(flatten)]
        repos: RepoArgs,
    },

    /// Poll for new commits and redeploy services that changed
    Watch {
        #[command(flatten)]
        repos: RepoArgs,

        /// Seconds between polls (overrides POLL_INTERVAL)
        #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
        interval: Option<u64>,

        /// Poll once, redeploy if needed, then exit
        #[arg(long)]
        once: bool,

        /// Keep watch state in memory only
        #[arg(long)]
        no_state: bool,
    },
}
