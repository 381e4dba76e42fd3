//! Stagehand Core Library
//!
//! This is the core library for the Stagehand deploy tool. It provides a small
//! task orchestrator: named tasks, `before`/`after` hooks between them, a
//! resolver that turns hooks into a deterministic execution order, and a runner
//! that executes that order fail-fast.
//!
//! ## Architecture
//!
//! - [`deploy_manager`] - High-level interface used by the CLI
//! - [`orchestrator`] - Registration, hook declaration, resolution and execution
//! - [`registry`] - Tasks and hooks as plain data
//! - [`execution`] - Actions, command execution, hook resolution and the runner
//! - [`configs`] - Deploy file parsing: stages, tasks and hooks
//! - [`results`] - Result types for deploy manager operations
//! - [`tasks`] - Task naming and color
//! - [`types`] - Common error types and type aliases
//!
//! ## Usage
//!
//! ```rust,no_run
//! use stagehand_core::deploy_manager::{DeployManager, DeployManagerConfig};
//! use std::path::PathBuf;
//!
//! # fn example() -> stagehand_core::types::StagehandResult<()> {
//! let manager = DeployManager::new(DeployManagerConfig {
//!     root: PathBuf::from("."),
//!     config_path: None,
//!     stage: None,
//! })?;
//!
//! let tasks = manager.list_tasks();
//! # Ok(())
//! # }
//! ```

pub mod configs;
pub mod deploy_manager;
pub mod execution;
pub mod orchestrator;
pub mod registry;
pub mod results;
pub mod tasks;
pub mod types;

// Re-export the main types for easier usage
pub use deploy_manager::{DeployManager, DeployManagerConfig};
pub use orchestrator::Orchestrator;
pub use types::{StagehandError, StagehandResult};
