//! Command execution utilities
//!
//! This module provides [`CommandAction`], the action used for every task that
//! shells out to an external tool (`git`, `lftp`, a precompiler ...). Commands are
//! run one after another with consistent setup, error handling and logging.

use std::io::{BufRead, BufReader, ErrorKind, Read, Write};
#[cfg(unix)]
use std::os::unix::process::CommandExt;
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use colored::*;
use tracing::{debug, warn};

use crate::execution::action::{Action, ActionFailure};

const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// A single command line to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandSpec {
    /// Run through `sh -c`
    Shell(String),
    /// Run a program directly with arguments
    Program { program: String, args: Vec<String> },
}

impl CommandSpec {
    pub fn shell(line: impl Into<String>) -> Self {
        Self::Shell(line.into())
    }

    pub fn program(program: impl Into<String>, args: Vec<String>) -> Self {
        Self::Program {
            program: program.into(),
            args,
        }
    }

    /// Human readable form used in logs and error messages
    pub fn display(&self) -> String {
        match self {
            Self::Shell(line) => line.clone(),
            Self::Program { program, args } if args.is_empty() => program.clone(),
            Self::Program { program, args } => format!("{} {}", program, args.join(" ")),
        }
    }

    fn to_command(&self) -> Command {
        match self {
            Self::Shell(line) => {
                let mut command = Command::new("sh");
                command.arg("-c").arg(line);
                command
            }
            Self::Program { program, args } => {
                let mut command = Command::new(program);
                command.args(args);
                command
            }
        }
    }
}

/// Action that runs external commands in sequence
#[derive(Debug, Clone, Default)]
pub struct CommandAction {
    commands: Vec<CommandSpec>,
    message: Option<String>,
    working_dir: Option<PathBuf>,
    env: Vec<(String, String)>,
    timeout: Option<Duration>,
    ignore_failure: bool,
}

impl CommandAction {
    pub fn new(commands: Vec<CommandSpec>) -> Self {
        Self {
            commands,
            ..Self::default()
        }
    }

    pub fn shell(line: impl Into<String>) -> Self {
        Self::new(vec![CommandSpec::shell(line)])
    }

    /// Printed before the first command runs
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Keep going when a command fails, like a bare `system(...)` call would
    pub fn ignore_failure(mut self, ignore: bool) -> Self {
        self.ignore_failure = ignore;
        self
    }

    pub fn commands(&self) -> &[CommandSpec] {
        &self.commands
    }

    fn run_one(&self, spec: &CommandSpec) -> Result<(), ActionFailure> {
        let rendered = spec.display();
        let mut command = spec.to_command();

        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }
        for (key, value) in &self.env {
            command.env(key, value);
        }
        command
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::piped());

        // Own process group, so a timeout can take down everything `sh` started.
        // Only for timed commands: the group leaves the terminal's Ctrl-C behind.
        #[cfg(unix)]
        if self.timeout.is_some() {
            command.process_group(0);
        }

        println!("  {} {}", "$".bright_black(), rendered.bright_black());
        debug!(command = %rendered, "spawning command");

        let mut child = command.spawn().map_err(|e| {
            ActionFailure::new(format!("Failed to execute command '{}': {}", rendered, e))
        })?;

        let stderr_reader = child
            .stderr
            .take()
            .map(|stderr| thread::spawn(move || tee_stderr(stderr)));

        // On timeout the reader is left detached; stragglers may still hold the pipe
        let status = self.wait(&mut child, &rendered)?;

        let stderr = stderr_reader
            .and_then(|handle| handle.join().ok())
            .unwrap_or_default();

        if !status.success() {
            let mut failure = ActionFailure::new(format!("Command '{}' failed", rendered));
            if let Some(code) = status.code() {
                failure = failure.with_exit_code(code);
            }
            return Err(failure.with_stderr(stderr));
        }

        Ok(())
    }

    fn wait(&self, child: &mut Child, rendered: &str) -> Result<ExitStatus, ActionFailure> {
        let wait_error = |e: std::io::Error| {
            ActionFailure::new(format!("Failed to wait for '{}': {}", rendered, e))
        };

        let Some(timeout) = self.timeout else {
            return child.wait().map_err(wait_error);
        };

        let deadline = Instant::now() + timeout;
        loop {
            if let Some(status) = child.try_wait().map_err(wait_error)? {
                return Ok(status);
            }
            if Instant::now() >= deadline {
                warn!(command = %rendered, ?timeout, "command timed out, killing it");
                kill_process_tree(child);
                return Err(ActionFailure::new(format!(
                    "Command '{}' timed out after {:?}",
                    rendered, timeout
                )));
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
}

/// Kill a child and, on unix, every process in its group
fn kill_process_tree(child: &mut Child) {
    #[cfg(unix)]
    {
        let group = format!("-{}", child.id());
        let _ = Command::new("kill")
            .args(["-KILL", "--", group.as_str()])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
    }
    let _ = child.kill();
    let _ = child.wait();
}

impl Action for CommandAction {
    fn execute(&self) -> Result<(), ActionFailure> {
        if let Some(message) = &self.message {
            println!("  {}", message.bright_black());
        }
        for spec in &self.commands {
            match self.run_one(spec) {
                Ok(()) => {}
                Err(failure) if self.ignore_failure => {
                    warn!(command = %spec.display(), error = %failure, "ignoring failed command");
                    println!("  {} {}", "!".yellow().bold(), failure.to_string().yellow());
                }
                Err(failure) => return Err(failure),
            }
        }
        Ok(())
    }
}

/// Forward a child's stderr to ours while keeping a copy.
///
/// Reads raw bytes until EOF so the pipe is always drained, whatever the encoding.
fn tee_stderr(stderr: impl Read) -> String {
    let mut reader = BufReader::new(stderr);
    let mut out = std::io::stderr();
    let mut captured = Vec::new();
    let mut line = Vec::new();

    loop {
        line.clear();
        match reader.read_until(b'\n', &mut line) {
            Ok(0) => break,
            Ok(_) => {
                let _ = out.write_all(&line);
                captured.extend_from_slice(&line);
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(_) => break,
        }
    }

    String::from_utf8_lossy(&captured).into_owned()
}
