use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context as _, Result};

use deploy_agent::application::{WatchEvent, WatchOptions, WatchUseCase};
use deploy_agent::domain::ports::{InMemoryStateRepository, StateRepository};
use deploy_agent::infrastructure::TomlStateRepository;
use deploy_agent::ui::detect_capabilities;
use deploy_agent::ui::views::watch::render_watch_event;

use super::Context;
use crate::cli::RepoArgs;

pub fn cmd_watch(
    ctx: &Context,
    repos: &RepoArgs,
    interval: Option<u64>,
    once: bool,
    no_state: bool,
) -> Result<()> {
    let repositories = ctx.repositories(repos)?;
    let deploy = ctx.deploy_use_case(repos.skip_bootstrap)?;

    let interval = interval
        .map(Duration::from_secs)
        .unwrap_or_else(|| ctx.config.poll_interval());
    let options = WatchOptions::new(repositories, interval)
        .with_overrides(ctx.config.overrides())
        .with_once(once);

    let state_repo: Box<dyn StateRepository> = if no_state {
        Box::new(InMemoryStateRepository::new())
    } else {
        Box::new(TomlStateRepository::in_dir(&ctx.base_dir))
    };

    let use_case = WatchUseCase::new(deploy, state_repo, options).with_deploy_events(ctx.deploy_sink());

    // Set up Ctrl+C handler
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = running.clone();
    ctrlc::set_handler(move || {
        running_clone.store(false, Ordering::SeqCst);
    })
    .context("could not install Ctrl+C handler")?;

    let json = ctx.json;
    let caps = detect_capabilities();
    use_case.start(running, |event| {
        if json {
            println!("{}", event.to_json());
            return;
        }

        let timestamp = chrono::Local::now().format("%H:%M:%S").to_string();
        let rendered =
            render_watch_event(&timestamp, &event, caps.supports_color, caps.supports_unicode);
        match event {
            WatchEvent::Error { .. } | WatchEvent::LookupFailed { .. } => eprint!("{rendered}"),
            _ => print!("{rendered}"),
        }
    })?;

    Ok(())
}
