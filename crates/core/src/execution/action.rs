//! The action capability
//!
//! An [`Action`] is the body of a task: something that can be executed with no
//! arguments and reports success or failure. The orchestrator never looks
//! inside an action; it only checks the signal it returns.

use std::fmt;

use colored::*;

/// Why an action failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionFailure {
    pub message: String,
    pub exit_code: Option<i32>,
    pub stderr: Option<String>,
}

impl ActionFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            exit_code: None,
            stderr: None,
        }
    }

    pub fn with_exit_code(mut self, code: i32) -> Self {
        self.exit_code = Some(code);
        self
    }

    pub fn with_stderr(mut self, stderr: impl Into<String>) -> Self {
        let stderr = stderr.into();
        let trimmed = stderr.trim();
        if !trimmed.is_empty() {
            self.stderr = Some(trimmed.to_string());
        }
        self
    }
}

impl fmt::Display for ActionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(code) = self.exit_code {
            write!(f, " (exit code {})", code)?;
        }
        if let Some(stderr) = &self.stderr {
            write!(f, ": {}", stderr)?;
        }
        Ok(())
    }
}

/// A task body
pub trait Action {
    fn execute(&self) -> Result<(), ActionFailure>;
}

/// Action that does nothing but optionally print a message.
///
/// Anchor tasks, whose only purpose is to give hooks a name to attach to, use this.
#[derive(Debug, Clone, Default)]
pub struct NoopAction {
    message: Option<String>,
}

impl NoopAction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }
}

impl Action for NoopAction {
    fn execute(&self) -> Result<(), ActionFailure> {
        if let Some(message) = &self.message {
            println!("  {}", message.bright_black());
        }
        Ok(())
    }
}

/// Action backed by a closure
pub struct FnAction<F>(F);

impl<F> FnAction<F>
where
    F: Fn() -> Result<(), ActionFailure>,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> Action for FnAction<F>
where
    F: Fn() -> Result<(), ActionFailure>,
{
    fn execute(&self) -> Result<(), ActionFailure> {
        (self.0)()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_failure_display_includes_code_and_stderr() {
        let failure = ActionFailure::new("Command 'lftp' failed")
            .with_exit_code(1)
            .with_stderr("login incorrect\n");
        assert_eq!(
            failure.to_string(),
            "Command 'lftp' failed (exit code 1): login incorrect"
        );
    }

    #[test]
    fn test_blank_stderr_is_dropped() {
        let failure = ActionFailure::new("boom").with_stderr("   \n");
        assert_eq!(failure.stderr, None);
        assert_eq!(failure.to_string(), "boom");
    }

    #[test]
    fn test_noop_always_succeeds() {
        assert!(NoopAction::new().execute().is_ok());
        assert!(NoopAction::with_message("Deploying through FTP...")
            .execute()
            .is_ok());
    }

    #[test]
    fn test_fn_action_runs_closure() {
        let calls = Cell::new(0);
        let action = FnAction::new(|| {
            calls.set(calls.get() + 1);
            Ok(())
        });
        action.execute().unwrap();
        action.execute().unwrap();
        assert_eq!(calls.get(), 2);
    }
}
