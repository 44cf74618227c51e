use anyhow::Result;

use deploy_agent::application::DeployOptions;

use super::Context;
use crate::cli::RepoArgs;

pub fn cmd_deploy(ctx: &Context, repos: &RepoArgs) -> Result<()> {
    let repositories = ctx.repositories(repos)?;
    let use_case = ctx.deploy_use_case(repos.skip_bootstrap)?;

    let options = DeployOptions::new(repositories).with_overrides(ctx.config.overrides());
    let report = use_case.execute_with_events(&options, ctx.deploy_sink())?;

    tracing::info!(
        services = report.services.len(),
        files_written = report.files_written(),
        warnings = report.warnings.len(),
        "deploy finished"
    );
    Ok(())
}
