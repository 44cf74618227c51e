//! Top-level error reporting for the binary

use std::io::Write;

use crate::application::StepFailure;
use crate::error::{DeployError, ErrorKind};
use crate::ui::ci::{github_actions_annotation, running_in_github_actions, AnnotationLevel};
use crate::ui::{detect_capabilities, ColoredText, Icons};

fn deploy_error(err: &anyhow::Error) -> Option<&DeployError> {
    err.downcast_ref::<StepFailure>()
        .map(|f| &f.source)
        .or_else(|| err.downcast_ref::<DeployError>())
}

/// Classification used in JSON error events
pub fn error_kind(err: &anyhow::Error) -> ErrorKind {
    deploy_error(err).map(DeployError::kind).unwrap_or(ErrorKind::Setup)
}

fn hint(err: &DeployError) -> Option<&'static str> {
    match err {
        DeployError::MissingToken => {
            Some("Add GITHUB_TOKEN=<token> to .env.local in the base directory")
        }
        DeployError::Auth { .. } => Some("Check that the token can read the repository"),
        DeployError::ComposeNotFound => {
            Some("Install the Docker Compose plugin (docker compose) or docker-compose")
        }
        DeployError::ComposeFileMissing { .. } => {
            Some("Pass --base-dir pointing at the directory with docker-compose.yml")
        }
        _ => None,
    }
}

pub fn format_error(err: &anyhow::Error, supports_color: bool, supports_unicode: bool) -> String {
    let icons = Icons::new(supports_unicode);
    let mut out = format!(
        "{} {}\n",
        ColoredText::error(icons.error).bold().render(supports_color),
        err
    );
    if let Some(fix) = deploy_error(err).and_then(hint) {
        out.push_str(&format!(
            "  {} {}\n",
            ColoredText::info(icons.arrow).render(supports_color),
            fix
        ));
    }
    out
}

pub fn print_error(err: &anyhow::Error, json: bool) {
    if json {
        let output = serde_json::json!({
            "event": "error",
            "kind": error_kind(err),
            "message": err.to_string(),
        });
        let mut out = std::io::stdout().lock();
        let _ = writeln!(out, "{}", output);
        return;
    }

    let caps = detect_capabilities();
    if caps.is_ci && running_in_github_actions() {
        println!(
            "{}",
            github_actions_annotation(AnnotationLevel::Error, "deploy-agent", &err.to_string())
        );
    }

    eprint!(
        "{}",
        format_error(err, caps.supports_color, caps.supports_unicode)
    );
}
