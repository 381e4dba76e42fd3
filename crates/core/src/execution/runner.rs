//! Task runner
//!
//! This module runs an already-resolved execution order. Tasks run strictly one
//! after another; the first failure stops the run.

use std::time::{Duration, Instant};

use colored::*;
use tracing::{error, info};

use crate::registry::Registry;
use crate::tasks::{get_task_color, styled_task_name};
use crate::types::{StagehandError, StagehandResult};

/// Timing for one completed task
#[derive(Debug, Clone)]
pub struct TaskTiming {
    pub name: String,
    pub duration: Duration,
}

/// Result of a successful run
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub completed: Vec<TaskTiming>,
}

impl RunReport {
    pub fn task_names(&self) -> Vec<&str> {
        self.completed.iter().map(|t| t.name.as_str()).collect()
    }

    pub fn total_duration(&self) -> Duration {
        self.completed.iter().map(|t| t.duration).sum()
    }
}

/// Runs task actions in order against a registry
pub struct TaskRunner<'a> {
    registry: &'a Registry,
}

impl<'a> TaskRunner<'a> {
    pub fn new(registry: &'a Registry) -> Self {
        Self { registry }
    }

    /// Run every task in `order`, stopping at the first failure
    pub fn run(&self, order: &[String]) -> StagehandResult<RunReport> {
        // Look everything up front so an unknown name can't leave a half-finished run
        let tasks = order
            .iter()
            .map(|name| {
                self.registry
                    .task(name)
                    .ok_or_else(|| StagehandError::UnknownTask(name.clone()))
            })
            .collect::<StagehandResult<Vec<_>>>()?;

        let mut report = RunReport::default();
        for (i, task) in tasks.into_iter().enumerate() {
            let color = get_task_color(&task.name);
            println!();
            println!(
                "┌─ {} {}",
                format!("[{}/{}]", i + 1, order.len()).bright_black(),
                styled_task_name(&task.name)
            );
            if let Some(description) = &task.description {
                println!("└─ {}", description.bright_black());
            }
            info!(task = %task.name, "task started");

            let started = Instant::now();
            if let Err(failure) = task.action().execute() {
                error!(task = %task.name, error = %failure, "task failed");
                println!("{} {}", "✗".red().bold(), format!("{} failed", task.name).red());
                return Err(StagehandError::TaskFailed {
                    task: task.name.clone(),
                    reason: failure.to_string(),
                });
            }

            let duration = started.elapsed();
            info!(task = %task.name, elapsed_ms = duration.as_millis() as u64, "task finished");
            println!(
                "{} {}",
                "✓".green().bold(),
                format!("Completed {}", task.name).color(color)
            );
            report.completed.push(TaskTiming {
                name: task.name.clone(),
                duration,
            });
        }

        Ok(report)
    }
}
