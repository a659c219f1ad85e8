//! Core of setup-step: install a GitHub-released CLI onto a CI agent.
//!
//! The crate holds every decision the step makes and none of the I/O:
//!
//! - [`VersionSpec`] - validated `latest` or explicit version request
//! - [`HostPlatform`], [`Platform`], [`Os`], [`Arch`] - host to artifact mapping
//! - [`ToolRelease`], [`ArtifactDescriptor`] - release artifact naming
//! - [`collaborators`] - traits for the runner, registry, cache and executor
//! - [`Installer`] - resolve, fetch, cache, add to PATH, smoke test
//! - [`coordinator::run`] - read the step input and report the outcome
//!
//! # Example
//!
//! ```ignore
//! use setup_step_core::{Collaborators, HostPlatform, Installer, ToolRelease, coordinator};
//!
//! let installer = Installer::new(
//!     ToolRelease::step_cli(),
//!     HostPlatform::detect(),
//!     work_dir,
//!     collaborators,
//! );
//! coordinator::run(runner.as_ref(), &installer).await;
//! ```

#![warn(missing_docs)]

pub mod artifact;
pub mod collaborators;
pub mod coordinator;
mod error;
pub mod installer;
pub mod platform;
pub mod version;

pub use artifact::{ArtifactDescriptor, ToolRelease};
pub use collaborators::{
    CommandExecutor, ExtractOptions, Release, ReleaseRegistry, Runner, ToolCache,
};
pub use error::{Error, Result};
pub use installer::{Collaborators, Install, Installation, Installer};
pub use platform::{Arch, ArchiveKind, HostPlatform, Os, Platform};
pub use version::VersionSpec;
