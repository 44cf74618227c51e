//! External command execution
//!
//! Every shell-out (git, docker, python, npm) goes through [`CommandRunner`]
//! so infrastructure adapters can be tested against a scripted runner.

use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use wait_timeout::ChildExt;

const REDACTED: &str = "***";

/// Limit for availability checks such as `docker compose version`
pub const AVAILABILITY_TIMEOUT: Duration = Duration::from_secs(5);

/// A command line to execute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub env: Vec<(String, String)>,
    /// Kill the command once it runs longer than this
    pub timeout: Option<Duration>,
    /// Values masked when the command is displayed or logged
    secrets: Vec<String>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            env: Vec::new(),
            timeout: None,
            secrets: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    pub fn timeout(mut self, limit: Duration) -> Self {
        self.timeout = Some(limit);
        self
    }

    /// Mark a value as secret so it never appears in `Display` output
    pub fn secret(mut self, value: impl Into<String>) -> Self {
        let value = value.into();
        if !value.is_empty() {
            self.secrets.push(value);
        }
        self
    }

    /// Whether the arguments start with `prefix`
    pub fn starts_with(&self, program: &str, prefix: &[&str]) -> bool {
        self.program == program
            && self.args.len() >= prefix.len()
            && self.args.iter().zip(prefix).all(|(a, p)| a == p)
    }

    fn mask(&self, text: &str) -> String {
        self.secrets
            .iter()
            .fold(text.to_string(), |acc, s| acc.replace(s.as_str(), REDACTED))
    }
}

impl std::fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            if arg.contains(' ') {
                line.push_str(&format!("\"{}\"", arg));
            } else {
                line.push_str(arg);
            }
        }
        f.write_str(&self.mask(&line))
    }
}

/// Captured result of a finished command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` if terminated by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Short failure description: exit code plus the tail of stderr
    pub fn describe_failure(&self) -> String {
        let code = self
            .code
            .map(|c| format!("exit code {}", c))
            .unwrap_or_else(|| "terminated by signal".to_string());
        let tail = tail_lines(&self.stderr, 5);
        if tail.is_empty() {
            code
        } else {
            format!("{}: {}", code, tail)
        }
    }
}

fn tail_lines(text: &str, n: usize) -> String {
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = lines.len().saturating_sub(n);
    lines[start..].join(" | ")
}

/// Runs external commands
pub trait CommandRunner: Send + Sync {
    /// Run to completion. `Err` when the program could not be started or
    /// was killed for exceeding its timeout (`ErrorKind::TimedOut`).
    fn run(&self, cmd: &CommandSpec) -> io::Result<CommandOutput>;

    /// Whether `program` can be started at all
    fn is_available(&self, program: &str, version_args: &[&str]) -> bool {
        let cmd = CommandSpec::new(program).args(version_args.iter().copied());
        self.run(&cmd).map(|o| o.success()).unwrap_or(false)
    }
}

/// Runs commands on the host with `std::process::Command`
pub struct SystemRunner {
    /// Stream child output to the terminal instead of capturing it.
    /// Only used in human mode; JSON mode needs stdout for events.
    inherit_output: bool,
}

impl SystemRunner {
    pub fn captured() -> Self {
        Self {
            inherit_output: false,
        }
    }

    pub fn inherited() -> Self {
        Self {
            inherit_output: true,
        }
    }
}

impl SystemRunner {
    fn command(spec: &CommandSpec) -> Command {
        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args).stdin(Stdio::null());
        if let Some(dir) = &spec.cwd {
            cmd.current_dir(dir);
        }
        for (k, v) in &spec.env {
            cmd.env(k, v);
        }
        cmd
    }

    /// Stream stdout, echo stderr while also keeping it for error reporting
    fn run_streaming(spec: &CommandSpec, mut cmd: Command) -> io::Result<CommandOutput> {
        cmd.stdout(Stdio::inherit()).stderr(Stdio::piped());
        let mut child = cmd.spawn()?;

        let stderr = child.stderr.take().map(|pipe| {
            let spec = spec.clone();
            thread::spawn(move || {
                let mut captured = String::new();
                for line in BufReader::new(pipe).lines().map_while(Result::ok) {
                    let line = spec.mask(&line);
                    eprintln!("{}", line);
                    captured.push_str(&line);
                    captured.push('\n');
                }
                captured
            })
        });

        let status = wait(&mut child, spec)?;
        Ok(CommandOutput {
            code: status.code(),
            stdout: String::new(),
            stderr: join(stderr),
        })
    }

    fn run_captured(spec: &CommandSpec, mut cmd: Command) -> io::Result<CommandOutput> {
        cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
        let mut child = cmd.spawn()?;

        // Drain both pipes while waiting so a chatty child never blocks on a full pipe
        let stdout = child.stdout.take().map(drain);
        let stderr = child.stderr.take().map(drain);

        let status = wait(&mut child, spec)?;
        Ok(CommandOutput {
            code: status.code(),
            stdout: spec.mask(&join(stdout)),
            stderr: spec.mask(&join(stderr)),
        })
    }
}

fn drain<R: Read + Send + 'static>(pipe: R) -> JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = BufReader::new(pipe).read_to_end(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    })
}

fn join(reader: Option<JoinHandle<String>>) -> String {
    reader.and_then(|h| h.join().ok()).unwrap_or_default()
}

/// Wait for `child`, killing it once the command's timeout passes
///
/// Reader threads are not joined after a kill: grandchildren may still hold
/// the pipes open.
fn wait(child: &mut Child, spec: &CommandSpec) -> io::Result<ExitStatus> {
    let Some(limit) = spec.timeout else {
        return child.wait();
    };
    match child.wait_timeout(limit)? {
        Some(status) => Ok(status),
        None => {
            let _ = child.kill();
            let _ = child.wait();
            tracing::warn!(command = %spec, seconds = limit.as_secs(), "command timed out");
            Err(io::Error::new(
                io::ErrorKind::TimedOut,
                format!("timed out after {}s", limit.as_secs()),
            ))
        }
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, spec: &CommandSpec) -> io::Result<CommandOutput> {
        tracing::debug!(command = %spec, cwd = ?spec.cwd, timeout = ?spec.timeout, "running");

        let cmd = Self::command(spec);
        if self.inherit_output {
            Self::run_streaming(spec, cmd)
        } else {
            Self::run_captured(spec, cmd)
        }
    }

    fn is_available(&self, program: &str, version_args: &[&str]) -> bool {
        let spec = CommandSpec::new(program)
            .args(version_args.iter().copied())
            .timeout(AVAILABILITY_TIMEOUT);
        tracing::debug!(command = %spec, "probing");
        let Ok(mut child) = Self::command(&spec)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
        else {
            return false;
        };
        wait(&mut child, &spec).map(|s| s.success()).unwrap_or(false)
    }
}
