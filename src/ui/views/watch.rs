use crate::application::watch::WatchEvent;
use crate::domain::value_objects::Service;
use crate::ui::{ColoredText, Icons};

fn join(services: &[Service]) -> String {
    services
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn short(sha: &str) -> &str {
    sha.get(..8).unwrap_or(sha)
}

pub fn render_watch_header(
    services: &[Service],
    interval_secs: u64,
    state_file: Option<&str>,
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    let icons = Icons::new(supports_unicode);
    let mut out = format!(
        "{} {}\n",
        ColoredText::info(icons.watch).render(supports_color),
        ColoredText::info("deploy-agent watch").bold().render(supports_color)
    );
    out.push_str(&format!("  Services: {}\n", join(services)));
    out.push_str(&format!("  Interval: {}s\n", interval_secs));
    out.push_str(&format!("  State:    {}\n", state_file.unwrap_or("in memory")));
    out.push_str(&format!(
        "  {}\n\n",
        ColoredText::dim("Press Ctrl+C to stop").render(supports_color)
    ));
    out
}

pub fn render_watch_event(
    timestamp: &str,
    event: &WatchEvent,
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    let icons = Icons::new(supports_unicode);
    let prefix = ColoredText::dim(format!("[{}]", timestamp)).render(supports_color);
    let ok = ColoredText::success(icons.success).render(supports_color);
    let warn = ColoredText::warning(icons.warning).render(supports_color);
    let fail = ColoredText::error(icons.error).render(supports_color);
    let arrow = ColoredText::info(icons.arrow).render(supports_color);

    match event {
        WatchEvent::WatchStarted {
            services,
            interval_secs,
            state_file,
        } => render_watch_header(
            services,
            *interval_secs,
            state_file.as_deref(),
            supports_color,
            supports_unicode,
        ),
        WatchEvent::PollStarted { tick } => format!(
            "{} {} Polling (tick {})\n",
            prefix,
            ColoredText::dim(icons.progress).render(supports_color),
            tick
        ),
        WatchEvent::LookupFailed { service, message } => format!(
            "{} {} {}: commit lookup failed, state unchanged ({})\n",
            prefix, warn, service, message
        ),
        WatchEvent::Baseline { service, sha } => format!(
            "{} {} {}: tracking {}\n",
            prefix,
            ok,
            service,
            short(sha)
        ),
        WatchEvent::ChangeDetected {
            service,
            deployed,
            observed,
        } => format!(
            "{} {} {}: {} -> {}\n",
            prefix,
            arrow,
            service,
            short(deployed),
            short(observed)
        ),
        WatchEvent::RedeployStarted { services } => format!(
            "{} {} Redeploying {}\n",
            prefix,
            ColoredText::info(icons.progress).render(supports_color),
            join(services)
        ),
        WatchEvent::RedeployCompleted { services } => {
            format!("{} {} Redeployed {}\n", prefix, ok, join(services))
        }
        WatchEvent::RedeployFailed {
            services,
            step,
            message,
            ..
        } => format!(
            "{} {} Redeploy of {} failed at '{}': {} (will retry)\n",
            prefix,
            fail,
            join(services),
            step.title(),
            message
        ),
        WatchEvent::Error { message } => format!("{} {} Error: {}\n", prefix, fail, message),
        WatchEvent::Shutdown => format!(
            "\n{} {} Watch stopped.\n",
            prefix,
            ColoredText::info(icons.watch).render(supports_color)
        ),
    }
}
