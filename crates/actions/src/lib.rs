//! GitHub Actions runner integration for setup-step.
//!
//! [`GitHubActionsRunner`] speaks the runner's file and workflow-command
//! protocol. [`ProcessExecutor`] runs the installed tool with every directory
//! added through the runner placed ahead of the inherited `PATH`; the two
//! share a [`SearchPath`].

#![warn(missing_docs)]

mod exec;
mod runner;
mod search_path;

pub use exec::ProcessExecutor;
pub use runner::GitHubActionsRunner;
pub use search_path::SearchPath;
