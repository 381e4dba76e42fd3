//! Task orchestrator
//!
//! [`Orchestrator`] owns a [`Registry`] and ties registration, hook declaration,
//! resolution and execution together. Each instance is independent, so several
//! pipelines can live in one process.
//!
//! ```rust
//! use stagehand_core::execution::NoopAction;
//! use stagehand_core::orchestrator::Orchestrator;
//!
//! # fn example() -> stagehand_core::StagehandResult<()> {
//! let mut orchestrator = Orchestrator::new();
//! orchestrator.register("compile", None, NoopAction::new())?;
//! orchestrator.register("ftp", None, NoopAction::with_message("Deploying through FTP..."))?;
//! orchestrator.before("ftp", "compile");
//!
//! assert_eq!(orchestrator.resolve("ftp")?, vec!["compile", "ftp"]);
//! orchestrator.run("ftp")?;
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

use tracing::info;

use crate::execution::action::Action;
use crate::execution::dependencies::resolve;
use crate::execution::runner::{RunReport, TaskRunner};
use crate::registry::{HookSet, Registry, Task};
use crate::types::StagehandResult;

#[derive(Debug, Default)]
pub struct Orchestrator {
    registry: Registry,
}

impl Orchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        name: impl Into<String>,
        description: Option<String>,
        action: impl Action + 'static,
    ) -> StagehandResult<()> {
        self.registry.register(name, description, action)
    }

    /// Run `dependency` before `target`
    pub fn before(&mut self, target: impl Into<String>, dependency: impl Into<String>) {
        self.registry.add_before_hook(target, dependency);
    }

    /// Run `follower` after `target`
    pub fn after(&mut self, target: impl Into<String>, follower: impl Into<String>) {
        self.registry.add_after_hook(target, follower);
    }

    /// Compute the execution order for a task without running anything
    pub fn resolve(&self, task: &str) -> StagehandResult<Vec<String>> {
        resolve(&self.registry, task)
    }

    /// Run a previously resolved order
    pub fn execute(&self, order: &[String]) -> StagehandResult<RunReport> {
        TaskRunner::new(&self.registry).run(order)
    }

    /// Resolve and run a task with everything hooked onto it
    pub fn run(&self, task: &str) -> StagehandResult<RunReport> {
        let order = self.resolve(task)?;
        info!(task, steps = order.len(), "running task");
        self.execute(&order)
    }

    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.registry.tasks()
    }

    pub fn hook_set(&self, task: &str) -> HookSet {
        self.registry.hook_set(task)
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}
