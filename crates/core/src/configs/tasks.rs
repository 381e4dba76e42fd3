use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::registry::HookKind;
use crate::types::{StagehandError, StagehandResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum Command {
    /// A shell line, run through `sh -c`
    Single(String),
    /// A program followed by its arguments
    Multiple(Vec<String>),
}

#[derive(Debug, Deserialize, Serialize, JsonSchema, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TaskConfig {
    pub name: String,
    pub description: Option<String>,
    pub command: Option<Command>,
    /// Shell lines run one after another
    pub commands: Option<Vec<String>>,
    /// Printed when the task starts. A task with only a message is an anchor for hooks.
    pub message: Option<String>,
    /// Relative paths are resolved against the project root
    pub working_dir: Option<String>,
    pub timeout_seconds: Option<u64>,
    /// Keep running the remaining commands when one fails
    pub ignore_failure: Option<bool>,
}

impl TaskConfig {
    pub fn validate(&self) -> StagehandResult<()> {
        if self.name.trim().is_empty() {
            return Err(StagehandError::Config("Task name cannot be empty".to_string()));
        }
        if self.command.is_some() && self.commands.is_some() {
            return Err(StagehandError::Config(format!(
                "Task '{}' sets both 'command' and 'commands'",
                self.name
            )));
        }
        if self.timeout_seconds == Some(0) {
            return Err(StagehandError::Config(format!(
                "Task '{}' has a timeoutSeconds of 0",
                self.name
            )));
        }
        Ok(())
    }

    /// True when the task runs no external command
    pub fn is_anchor(&self) -> bool {
        self.command.is_none() && self.commands.is_none()
    }
}

/// A hook entry: exactly one of `before` / `after`, plus the task to `run`
#[derive(Debug, Deserialize, Serialize, JsonSchema, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct HookConfig {
    pub before: Option<String>,
    pub after: Option<String>,
    pub run: String,
}

impl HookConfig {
    /// The hook kind and the task it attaches to
    pub fn target(&self) -> StagehandResult<(HookKind, &str)> {
        match (self.before.as_deref(), self.after.as_deref()) {
            (Some(target), None) => Ok((HookKind::Before, target)),
            (None, Some(target)) => Ok((HookKind::After, target)),
            (Some(_), Some(_)) => Err(StagehandError::Config(format!(
                "Hook for '{}' sets both 'before' and 'after'",
                self.run
            ))),
            (None, None) => Err(StagehandError::Config(format!(
                "Hook for '{}' needs either 'before' or 'after'",
                self.run
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(yaml: &str) -> TaskConfig {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_command_forms() {
        let single = task("name: compile\ncommand: make dist\n");
        assert_eq!(single.command, Some(Command::Single("make dist".to_string())));

        let multiple = task("name: compile\ncommand: [make, dist]\n");
        assert_eq!(
            multiple.command,
            Some(Command::Multiple(vec!["make".to_string(), "dist".to_string()]))
        );
    }

    #[test]
    fn test_anchor_task() {
        let anchor = task("name: deploy:ftp\nmessage: Deploying through FTP...\n");
        assert!(anchor.is_anchor());
        assert!(anchor.validate().is_ok());
    }

    #[test]
    fn test_command_and_commands_conflict() {
        let conflicting = task("name: x\ncommand: a\ncommands: [b]\n");
        assert!(matches!(conflicting.validate(), Err(StagehandError::Config(_))));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let zero = task("name: x\ncommand: a\ntimeoutSeconds: 0\n");
        assert!(zero.validate().is_err());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<TaskConfig, _> = serde_yaml::from_str("name: x\nscript: run.sh\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_hook_target() {
        let before: HookConfig = serde_yaml::from_str("before: ftp\nrun: compile\n").unwrap();
        assert_eq!(before.target().unwrap(), (HookKind::Before, "ftp"));

        let after: HookConfig = serde_yaml::from_str("after: compile\nrun: ftp_sync\n").unwrap();
        assert_eq!(after.target().unwrap(), (HookKind::After, "compile"));

        let both: HookConfig =
            serde_yaml::from_str("before: a\nafter: b\nrun: c\n").unwrap();
        assert!(both.target().is_err());

        let neither: HookConfig = serde_yaml::from_str("run: c\n").unwrap();
        assert!(neither.target().is_err());
    }
}
