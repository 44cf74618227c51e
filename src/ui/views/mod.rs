//! Rendered views for command output

pub mod watch;
