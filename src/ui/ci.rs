//! GitHub Actions workflow commands

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationLevel {
    Warning,
    Error,
}

/// `::error title=...::message`, escaped for the workflow command parser
pub fn github_actions_annotation(level: AnnotationLevel, title: &str, message: &str) -> String {
    let level = match level {
        AnnotationLevel::Warning => "warning",
        AnnotationLevel::Error => "error",
    };
    format!("::{} title={}::{}", level, escape(title), escape(message))
}

pub fn running_in_github_actions() -> bool {
    std::env::var_os("GITHUB_ACTIONS").is_some()
}

fn escape(s: &str) -> String {
    s.replace('%', "%25").replace('\r', "%0D").replace('\n', "%0A")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn annotation_escapes_newlines_and_percent() {
        let rendered = github_actions_annotation(
            AnnotationLevel::Error,
            "deploy-agent",
            "100% broken\nsecond line",
        );
        assert_eq!(rendered, "::error title=deploy-agent::100%25 broken%0Asecond line");
    }
}
