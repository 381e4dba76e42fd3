//! Task registry
//!
//! The [`Registry`] holds every registered [`Task`] in registration order and the
//! declared hooks as an edge list. It is filled during setup and only read once
//! execution starts.

use std::collections::HashMap;
use std::fmt;

use crate::execution::action::Action;
use crate::types::{StagehandError, StagehandResult};

/// A named unit of work
pub struct Task {
    pub name: String,
    pub description: Option<String>,
    action: Box<dyn Action>,
}

impl Task {
    pub fn action(&self) -> &dyn Action {
        self.action.as_ref()
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookKind {
    /// `task` runs before `target`
    Before,
    /// `task` runs after `target`
    After,
}

/// A declared ordering constraint between two tasks
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Hook {
    pub kind: HookKind,
    pub target: String,
    pub task: String,
}

impl Hook {
    /// The edge this hook contributes, as `(runs_first, runs_second)`
    pub fn edge(&self) -> (&str, &str) {
        match self.kind {
            HookKind::Before => (&self.task, &self.target),
            HookKind::After => (&self.target, &self.task),
        }
    }
}

/// Tasks that must run strictly before and strictly after a given task
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HookSet {
    pub before: Vec<String>,
    pub after: Vec<String>,
}

impl HookSet {
    pub fn is_empty(&self) -> bool {
        self.before.is_empty() && self.after.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct Registry {
    tasks: Vec<Task>,
    positions: HashMap<String, usize>,
    hooks: Vec<Hook>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a task. Names are unique.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        description: Option<String>,
        action: impl Action + 'static,
    ) -> StagehandResult<()> {
        let name = name.into();
        if self.positions.contains_key(&name) {
            return Err(StagehandError::DuplicateTask(name));
        }

        self.positions.insert(name.clone(), self.tasks.len());
        self.tasks.push(Task {
            name,
            description,
            action: Box::new(action),
        });
        Ok(())
    }

    /// Declare that `dependency` runs before `target`.
    ///
    /// Neither task has to be registered yet.
    pub fn add_before_hook(&mut self, target: impl Into<String>, dependency: impl Into<String>) {
        self.add_hook(HookKind::Before, target.into(), dependency.into());
    }

    /// Declare that `follower` runs after `target`.
    pub fn add_after_hook(&mut self, target: impl Into<String>, follower: impl Into<String>) {
        self.add_hook(HookKind::After, target.into(), follower.into());
    }

    fn add_hook(&mut self, kind: HookKind, target: String, task: String) {
        let hook = Hook { kind, target, task };
        if !self.hooks.contains(&hook) {
            self.hooks.push(hook);
        }
    }

    pub fn task(&self, name: &str) -> Option<&Task> {
        self.positions.get(name).map(|&i| &self.tasks[i])
    }

    /// Registration index of a task
    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    /// Tasks in registration order
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    /// Hooks in declaration order
    pub fn hooks(&self) -> &[Hook] {
        &self.hooks
    }

    pub fn hook_set(&self, name: &str) -> HookSet {
        let mut set = HookSet::default();
        for hook in self.hooks.iter().filter(|h| h.target == name) {
            match hook.kind {
                HookKind::Before => set.before.push(hook.task.clone()),
                HookKind::After => set.after.push(hook.task.clone()),
            }
        }
        set
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
