use is_terminal::IsTerminal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalCapabilities {
    pub is_tty: bool,
    pub supports_color: bool,
    pub supports_unicode: bool,
    pub is_ci: bool,
}

pub fn detect_capabilities() -> TerminalCapabilities {
    detect_capabilities_impl(|key| std::env::var(key).ok(), std::io::stdout().is_terminal())
}

fn detect_capabilities_impl(
    get_env: impl Fn(&str) -> Option<String>,
    is_tty: bool,
) -> TerminalCapabilities {
    let term = get_env("TERM").unwrap_or_default();
    let term_is_dumb = term.eq_ignore_ascii_case("dumb");
    let no_color = get_env("NO_COLOR").is_some();
    let is_ci = ["CI", "GITHUB_ACTIONS", "JENKINS_HOME", "GITLAB_CI", "BUILDKITE"]
        .iter()
        .any(|k| get_env(k).is_some());

    TerminalCapabilities {
        is_tty,
        supports_color: is_tty && !term_is_dumb && !no_color && !is_ci,
        supports_unicode: !term_is_dumb,
        is_ci,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn caps(env: &[(&str, &str)], is_tty: bool) -> TerminalCapabilities {
        let map: HashMap<String, String> = env
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        detect_capabilities_impl(|k| map.get(k).cloned(), is_tty)
    }

    #[test]
    fn detect_respects_no_color() {
        let c = caps(&[("NO_COLOR", "1"), ("TERM", "xterm-256color")], true);
        assert!(!c.supports_color);
    }

    #[test]
    fn ci_disables_color() {
        let c = caps(&[("CI", "true"), ("TERM", "xterm-256color")], true);
        assert!(c.is_ci);
        assert!(!c.supports_color);
    }

    #[test]
    fn dumb_terminal_is_plain() {
        let c = caps(&[("TERM", "dumb")], true);
        assert!(!c.supports_color);
        assert!(!c.supports_unicode);
    }

    #[test]
    fn pipe_has_no_color() {
        assert!(!caps(&[("TERM", "xterm")], false).supports_color);
    }
}
