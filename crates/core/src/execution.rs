//! Task execution module
//!
//! This module handles resolving hook order, the action capability, command
//! execution and the sequential runner.

pub mod action;
pub mod command;
pub mod dependencies;
pub mod runner;

pub use action::{Action, ActionFailure, FnAction, NoopAction};
pub use command::{CommandAction, CommandSpec};
pub use dependencies::resolve;
pub use runner::{RunReport, TaskRunner, TaskTiming};
