use thiserror::Error;

/// The main error type for Stagehand operations
#[derive(Debug, Error)]
pub enum StagehandError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Task '{0}' is already registered")]
    DuplicateTask(String),

    #[error("Unknown task '{0}'")]
    UnknownTask(String),

    #[error("Circular dependency detected: {}", format_cycle(.0))]
    CyclicDependency(Vec<String>),

    #[error("Task '{task}' failed: {reason}")]
    TaskFailed { task: String, reason: String },
}

/// Result type alias for Stagehand operations
pub type StagehandResult<T> = Result<T, StagehandError>;

/// Render a cycle as a closed path, e.g. `a -> b -> a`
pub fn format_cycle(cycle: &[String]) -> String {
    let mut path = cycle.to_vec();
    if let Some(first) = path.first().cloned() {
        path.push(first);
    }
    path.join(" -> ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_message_closes_the_path() {
        let err = StagehandError::CyclicDependency(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(err.to_string(), "Circular dependency detected: a -> b -> a");
    }

    #[test]
    fn test_task_failed_message_names_task() {
        let err = StagehandError::TaskFailed {
            task: "deploy:compile".to_string(),
            reason: "exit code 2".to_string(),
        };
        assert_eq!(err.to_string(), "Task 'deploy:compile' failed: exit code 2");
    }
}
