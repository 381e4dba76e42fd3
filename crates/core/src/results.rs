//! Result types for deploy manager operations
//!
//! This module contains the output structures returned by [`crate::DeployManager`],
//! kept free of presentation so the CLI decides how to render them.

use std::collections::BTreeMap;

use crate::registry::HookSet;

/// A registered task as shown by `list`
#[derive(Debug, Clone)]
pub struct TaskInfo {
    pub name: String,
    pub description: Option<String>,
    /// True when the task runs no external command
    pub is_anchor: bool,
}

#[derive(Debug)]
pub struct TaskListResult {
    pub application: Option<String>,
    pub tasks: Vec<TaskInfo>,
}

#[derive(Debug, Clone)]
pub struct StageInfo {
    pub name: String,
    pub params: BTreeMap<String, String>,
    pub is_default: bool,
    pub is_selected: bool,
}

#[derive(Debug)]
pub struct StageListResult {
    pub stages: Vec<StageInfo>,
}

/// The resolved order for a requested task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionPlan {
    pub task_name: String,
    pub stage: String,
    pub order: Vec<String>,
}

/// Hooks declared on one task
#[derive(Debug, Clone)]
pub struct HookGraphEntry {
    pub task: String,
    pub hooks: HookSet,
}

#[derive(Debug)]
pub struct HookGraphResult {
    pub entries: Vec<HookGraphEntry>,
}
