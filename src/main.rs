//! deploy-agent CLI
//!
//! Usage: deploy-agent <COMMAND>
//!
//! Commands:
//!   deploy  Sync both repositories, rebuild images, and restart the services
//!   watch   Poll for new commits and redeploy services that changed

use std::process::ExitCode;

use clap::Parser;

use deploy_agent::application::StepFailure;
use deploy_agent::config;
use deploy_agent::logging::{self, Profile};

mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::Context;

fn run(cli: &Cli) -> anyhow::Result<()> {
    let ctx = Context::load(&cli.base_dir, cli.config.as_deref(), cli.json)?;

    match &cli.command {
        Commands::Deploy { repos } => commands::cmd_deploy(&ctx, repos),
        Commands::Watch {
            repos,
            interval,
            once,
            no_state,
        } => commands::cmd_watch(&ctx, repos, *interval, *once, *no_state),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Before logging, so DEPLOY_AGENT_LOG may come from .env.local
    let env_file = config::load_env_file(&cli.base_dir);

    let profile = if cli.json { Profile::Json } else { Profile::Human };
    logging::init(profile, cli.verbose);

    match env_file {
        Ok(Some(path)) => tracing::debug!(path = %path.display(), "loaded environment file"),
        Ok(None) => {}
        Err(e) => tracing::warn!(error = %e, "could not read environment file"),
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // Step failures were already reported through the event sink
            if err.downcast_ref::<StepFailure>().is_none() {
                deploy_agent::ui::error::print_error(&err, cli.json);
            }
            ExitCode::FAILURE
        }
    }
}
