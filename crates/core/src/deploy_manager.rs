//! High-level deploy management interface
//!
//! This module provides the [`DeployManager`] which is the primary interface for
//! everything the CLI does. It loads the deploy file, selects a stage, turns the
//! declared tasks and hooks into an [`Orchestrator`] and exposes list, plan, run
//! and graph operations on it.
//!
//! ## Example
//!
//! ```rust,no_run
//! use stagehand_core::deploy_manager::{DeployManager, DeployManagerConfig};
//! use std::path::PathBuf;
//!
//! # fn example() -> stagehand_core::types::StagehandResult<()> {
//! let manager = DeployManager::new(DeployManagerConfig {
//!     root: PathBuf::from("."),
//!     config_path: None,
//!     stage: Some("production".to_string()),
//! })?;
//!
//! let plan = manager.get_execution_plan("deploy:ftp")?;
//! println!("{:?}", plan.order);
//!
//! manager.run_task("deploy:ftp")?;
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::info;

use crate::configs::deploy::{parse_deploy_config, DeployConfig};
use crate::configs::stages::Stage;
use crate::configs::tasks::{Command as TaskCommand, TaskConfig};
use crate::execution::action::NoopAction;
use crate::execution::command::{CommandAction, CommandSpec};
use crate::execution::runner::RunReport;
use crate::orchestrator::Orchestrator;
use crate::registry::HookKind;
use crate::results::{
    ExecutionPlan, HookGraphEntry, HookGraphResult, StageInfo, StageListResult, TaskInfo,
    TaskListResult,
};
use crate::types::{StagehandError, StagehandResult};

/// Location of the deploy file relative to the project root
pub const DEFAULT_CONFIG_PATH: &str = ".stagehand/deploy.yml";

/// High-level manager that encapsulates all deploy operations
pub struct DeployManager {
    pub root: PathBuf,
    pub config: DeployConfig,
    pub stage: Stage,
    orchestrator: Orchestrator,
}

/// Configuration for initializing a deploy manager
pub struct DeployManagerConfig {
    pub root: PathBuf,
    /// Overrides [`DEFAULT_CONFIG_PATH`]; relative paths are taken from `root`
    pub config_path: Option<PathBuf>,
    pub stage: Option<String>,
}

impl DeployManager {
    /// Load the deploy file under `root` and build the task pipeline for a stage
    pub fn new(config: DeployManagerConfig) -> StagehandResult<Self> {
        let config_path = match config.config_path {
            Some(path) if path.is_relative() => config.root.join(path),
            Some(path) => path,
            None => config.root.join(DEFAULT_CONFIG_PATH),
        };
        let deploy_config = Self::load_deploy_config(&config_path)?;

        Self::from_config(config.root, deploy_config, config.stage.as_deref())
    }

    /// Build a manager from an already parsed deploy file
    pub fn from_config(
        root: PathBuf,
        config: DeployConfig,
        stage: Option<&str>,
    ) -> StagehandResult<Self> {
        let stage = config.select_stage(stage)?;
        info!(stage = %stage.name, tasks = config.tasks.len(), "loaded deploy configuration");

        let orchestrator = Self::build_orchestrator(&root, &config, &stage)?;

        Ok(Self {
            root,
            config,
            stage,
            orchestrator,
        })
    }

    /// List all tasks in declaration order
    pub fn list_tasks(&self) -> TaskListResult {
        let tasks = self
            .config
            .tasks
            .iter()
            .map(|task| TaskInfo {
                name: task.name.clone(),
                description: task.description.clone(),
                is_anchor: task.is_anchor(),
            })
            .collect();

        TaskListResult {
            application: self.config.application.clone(),
            tasks,
        }
    }

    /// List configured stages, marking the default and the selected one
    pub fn list_stages(&self) -> StageListResult {
        let default = self
            .config
            .default_stage
            .as_deref()
            .or_else(|| self.config.stages.first().map(|s| s.name.as_str()));

        let stages = self
            .config
            .stages
            .iter()
            .map(|stage| StageInfo {
                name: stage.name.clone(),
                params: stage.params.clone(),
                is_default: default == Some(stage.name.as_str()),
                is_selected: stage.name == self.stage.name,
            })
            .collect();

        StageListResult { stages }
    }

    /// Get the execution plan for a task
    pub fn get_execution_plan(&self, task: &str) -> StagehandResult<ExecutionPlan> {
        let order = self.orchestrator.resolve(task)?;
        Ok(ExecutionPlan {
            task_name: task.to_string(),
            stage: self.stage.name.clone(),
            order,
        })
    }

    /// Execute a task with everything hooked onto it
    pub fn run_task(&self, task: &str) -> StagehandResult<RunReport> {
        let plan = self.get_execution_plan(task)?;
        info!(task, stage = %plan.stage, "running task");
        self.orchestrator.execute(&plan.order)
    }

    /// Tasks that have hooks declared on them, in declaration order
    pub fn get_hook_graph(&self) -> HookGraphResult {
        let entries = self
            .orchestrator
            .tasks()
            .map(|task| HookGraphEntry {
                task: task.name.clone(),
                hooks: self.orchestrator.hook_set(&task.name),
            })
            .filter(|entry| !entry.hooks.is_empty())
            .collect();

        HookGraphResult { entries }
    }

    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }

    // Private helper methods

    fn load_deploy_config(path: &Path) -> StagehandResult<DeployConfig> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            StagehandError::Config(format!(
                "Failed to read deploy config {}: {}",
                path.display(),
                e
            ))
        })?;

        parse_deploy_config(&content).map_err(|e| {
            StagehandError::Config(format!(
                "Failed to parse deploy config {}: {}",
                path.display(),
                e
            ))
        })
    }

    fn build_orchestrator(
        root: &Path,
        config: &DeployConfig,
        stage: &Stage,
    ) -> StagehandResult<Orchestrator> {
        let mut orchestrator = Orchestrator::new();

        for task in &config.tasks {
            let description = task.description.clone();
            if task.is_anchor() {
                let action = match &task.message {
                    Some(message) => NoopAction::with_message(stage.render(message)?),
                    None => NoopAction::new(),
                };
                orchestrator.register(task.name.clone(), description, action)?;
            } else {
                let action = Self::build_command_action(root, config, stage, task)?;
                orchestrator.register(task.name.clone(), description, action)?;
            }
        }

        for hook in &config.hooks {
            let (kind, target) = hook.target()?;
            match kind {
                HookKind::Before => orchestrator.before(target, hook.run.clone()),
                HookKind::After => orchestrator.after(target, hook.run.clone()),
            }
        }

        Ok(orchestrator)
    }

    fn build_command_action(
        root: &Path,
        config: &DeployConfig,
        stage: &Stage,
        task: &TaskConfig,
    ) -> StagehandResult<CommandAction> {
        let mut specs = Vec::new();
        match &task.command {
            Some(TaskCommand::Single(line)) => specs.push(CommandSpec::shell(stage.render(line)?)),
            Some(TaskCommand::Multiple(parts)) => {
                if let Some((program, args)) = parts.split_first() {
                    let args = args
                        .iter()
                        .map(|arg| stage.render(arg))
                        .collect::<StagehandResult<Vec<_>>>()?;
                    specs.push(CommandSpec::program(stage.render(program)?, args));
                }
            }
            None => {}
        }
        for line in task.commands.iter().flatten() {
            specs.push(CommandSpec::shell(stage.render(line)?));
        }

        let working_dir = match &task.working_dir {
            Some(dir) => {
                let dir = PathBuf::from(stage.render(dir)?);
                if dir.is_relative() {
                    root.join(dir)
                } else {
                    dir
                }
            }
            None => root.to_path_buf(),
        };

        let mut action = CommandAction::new(specs)
            .working_dir(working_dir)
            .env("STAGEHAND_STAGE", stage.name.clone())
            .ignore_failure(task.ignore_failure.unwrap_or(false));

        if let Some(application) = &config.application {
            action = action.env("STAGEHAND_APPLICATION", application.clone());
        }
        if let Some(seconds) = task.timeout_seconds {
            action = action.timeout(Duration::from_secs(seconds));
        }
        if let Some(message) = &task.message {
            action = action.message(stage.render(message)?);
        }

        Ok(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(dir: &Path, yaml: &str) {
        let config_dir = dir.join(".stagehand");
        std::fs::create_dir_all(&config_dir).unwrap();
        std::fs::write(config_dir.join("deploy.yml"), yaml).unwrap();
    }

    fn manager(dir: &Path, stage: Option<&str>) -> StagehandResult<DeployManager> {
        DeployManager::new(DeployManagerConfig {
            root: dir.to_path_buf(),
            config_path: None,
            stage: stage.map(|s| s.to_string()),
        })
    }

    #[test]
    fn test_demo_project_plans_original_deploy_order() {
        let root = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../../demos/illiad")
            .canonicalize()
            .expect("demos/illiad directory should exist for tests");

        let manager = manager(&root, None).unwrap();
        assert_eq!(manager.stage.name, "development");

        let plan = manager.get_execution_plan("deploy:ftp").unwrap();
        assert_eq!(
            plan.order,
            vec![
                "deploy:update_submodules",
                "deploy:compile",
                "deploy:ftp_sync",
                "deploy:ftp",
            ]
        );

        let setup = manager.get_execution_plan("deploy:ftp_setup").unwrap();
        assert_eq!(setup.order, vec!["deploy:ftp_setup"]);
    }

    #[test]
    fn test_demo_project_stages() {
        let root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../demos/illiad");
        let manager = manager(&root, Some("production")).unwrap();

        let stages = manager.list_stages().stages;
        let names: Vec<_> = stages.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["development", "staging", "production"]);
        assert!(stages[0].is_default);
        assert!(stages[2].is_selected);
    }

    #[cfg(unix)]
    #[test]
    fn test_run_task_executes_hooked_commands_in_order() {
        let dir = tempfile::tempdir().unwrap();
        write_config(
            dir.path(),
            r#"
application: site
stages:
  - name: staging
    params:
      target: out
tasks:
  - name: build
    command: "echo build >> {{target}}.log"
  - name: prepare
    commands:
      - "echo prepare >> {{target}}.log"
  - name: upload
    command: ["sh", "-c", "echo upload-$STAGEHAND_STAGE-$STAGEHAND_APPLICATION >> out.log"]
  - name: release
    message: Releasing {{application}}
hooks:
  - before: release
    run: build
  - before: build
    run: prepare
  - after: build
    run: upload
"#,
        );

        let manager = manager(dir.path(), None).unwrap();
        let report = manager.run_task("release").unwrap();
        assert_eq!(report.task_names(), vec!["prepare", "build", "upload", "release"]);

        let log = std::fs::read_to_string(dir.path().join("out.log")).unwrap();
        assert_eq!(log, "prepare\nbuild\nupload-staging-site\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_task_stops_the_run() {
        let dir = tempfile::tempdir().unwrap();
        write_config(
            dir.path(),
            r#"
tasks:
  - name: compile
    command: "exit 4"
  - name: ftp_sync
    command: "touch synced"
  - name: ftp
hooks:
  - before: ftp
    run: compile
  - after: compile
    run: ftp_sync
"#,
        );

        let manager = manager(dir.path(), None).unwrap();
        let err = manager.run_task("ftp").unwrap_err();
        match err {
            StagehandError::TaskFailed { task, reason } => {
                assert_eq!(task, "compile");
                assert!(reason.contains("exit code 4"), "unexpected reason: {}", reason);
            }
            other => panic!("expected TaskFailed, got {:?}", other),
        }
        assert!(!dir.path().join("synced").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_working_dir_is_relative_to_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("dist")).unwrap();
        write_config(
            dir.path(),
            "tasks:\n  - name: mark\n    workingDir: dist\n    command: touch marker\n",
        );

        manager(dir.path(), None).unwrap().run_task("mark").unwrap();
        assert!(dir.path().join("dist/marker").exists());
    }

    #[test]
    fn test_unknown_placeholder_fails_at_load() {
        let dir = tempfile::tempdir().unwrap();
        write_config(
            dir.path(),
            "tasks:\n  - name: sync\n    command: lftp {{host}}\n",
        );

        let err = manager(dir.path(), None).err().expect("load should fail");
        assert!(err.to_string().contains("Unknown placeholder"));
    }

    #[test]
    fn test_duplicate_task_in_config() {
        let dir = tempfile::tempdir().unwrap();
        write_config(dir.path(), "tasks:\n  - name: a\n  - name: a\n");

        let err = manager(dir.path(), None).err().expect("load should fail");
        assert!(matches!(err, StagehandError::DuplicateTask(name) if name == "a"));
    }

    #[test]
    fn test_hook_to_missing_task_fails_at_plan_time() {
        let dir = tempfile::tempdir().unwrap();
        write_config(
            dir.path(),
            "tasks:\n  - name: ftp\nhooks:\n  - before: ftp\n    run: compile\n",
        );

        let manager = manager(dir.path(), None).unwrap();
        let err = manager.get_execution_plan("ftp").unwrap_err();
        assert!(matches!(err, StagehandError::UnknownTask(name) if name == "compile"));
    }

    #[test]
    fn test_missing_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = manager(dir.path(), None).err().expect("load should fail");
        assert!(err.to_string().contains("Failed to read deploy config"));
    }

    #[test]
    fn test_explicit_config_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("pipeline.yml"), "tasks:\n  - name: only\n").unwrap();

        let manager = DeployManager::new(DeployManagerConfig {
            root: dir.path().to_path_buf(),
            config_path: Some(PathBuf::from("pipeline.yml")),
            stage: None,
        })
        .unwrap();
        assert_eq!(manager.list_tasks().tasks.len(), 1);
        assert!(manager.list_tasks().tasks[0].is_anchor);
    }

    #[test]
    fn test_hook_graph_lists_only_hooked_tasks() {
        let dir = tempfile::tempdir().unwrap();
        write_config(
            dir.path(),
            "tasks:\n  - name: a\n  - name: b\n  - name: c\nhooks:\n  - after: a\n    run: b\n",
        );

        let graph = manager(dir.path(), None).unwrap().get_hook_graph();
        assert_eq!(graph.entries.len(), 1);
        assert_eq!(graph.entries[0].task, "a");
        assert_eq!(graph.entries[0].hooks.after, vec!["b".to_string()]);
    }
}
