//! Colors and icons for console output

use crossterm::style::Color;

pub mod colors {
    use super::Color;

    pub const SUCCESS: Color = Color::Green;
    pub const ERROR: Color = Color::Red;
    pub const WARNING: Color = Color::Yellow;
    pub const INFO: Color = Color::Cyan;
    pub const DIM: Color = Color::DarkGrey;
}

pub mod icons {
    pub const SUCCESS: &str = "✓";
    pub const ERROR: &str = "✗";
    pub const WARNING: &str = "⚠";
    pub const PROGRESS: &str = "●";
    pub const ARROW: &str = "↳";
    pub const WATCH: &str = "⟳";
}

pub mod icons_ascii {
    pub const SUCCESS: &str = "[OK]";
    pub const ERROR: &str = "[FAIL]";
    pub const WARNING: &str = "[WARN]";
    pub const PROGRESS: &str = "[..]";
    pub const ARROW: &str = "->";
    pub const WATCH: &str = "[watch]";
}

/// Icon set selected once from terminal capabilities
#[derive(Debug, Clone, Copy)]
pub struct Icons {
    pub success: &'static str,
    pub error: &'static str,
    pub warning: &'static str,
    pub progress: &'static str,
    pub arrow: &'static str,
    pub watch: &'static str,
}

impl Icons {
    pub fn new(unicode: bool) -> Self {
        if unicode {
            Self {
                success: icons::SUCCESS,
                error: icons::ERROR,
                warning: icons::WARNING,
                progress: icons::PROGRESS,
                arrow: icons::ARROW,
                watch: icons::WATCH,
            }
        } else {
            Self {
                success: icons_ascii::SUCCESS,
                error: icons_ascii::ERROR,
                warning: icons_ascii::WARNING,
                progress: icons_ascii::PROGRESS,
                arrow: icons_ascii::ARROW,
                watch: icons_ascii::WATCH,
            }
        }
    }
}
