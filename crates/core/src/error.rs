//! Error types for setup-step operations.

use miette::Diagnostic;
use thiserror::Error;

/// Result type for setup-step operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while validating input or installing the tool.
///
/// Every variant except [`Error::Unstructured`] carries a human-readable
/// message and is reported to the pipeline runner.
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// The supplied version input is neither `latest` nor semver-shaped.
    #[error(
        "The supplied input {input} is not a valid version. Please supply a semver format like major.minor.hotfix"
    )]
    #[diagnostic(code(setup_step::input::invalid_version))]
    InvalidVersion {
        /// The raw input value.
        input: String,
    },

    /// The host operating system has no release artifact.
    #[error("The platform {platform} is not supported by this action")]
    #[diagnostic(code(setup_step::env::unsupported_platform))]
    UnsupportedPlatform {
        /// The raw platform value reported by the host.
        platform: String,
    },

    /// The host CPU architecture has no release artifact.
    #[error("The architecture {arch} is not supported by this action")]
    #[diagnostic(code(setup_step::env::unsupported_architecture))]
    UnsupportedArchitecture {
        /// The raw architecture value reported by the host.
        arch: String,
    },

    /// Release registry lookup failed.
    #[error("{message}")]
    #[diagnostic(code(setup_step::registry))]
    Registry {
        /// Error message.
        message: String,
    },

    /// Artifact download failed.
    #[error("{message}")]
    #[diagnostic(code(setup_step::download))]
    Download {
        /// Error message.
        message: String,
    },

    /// Archive extraction failed.
    #[error("{message}")]
    #[diagnostic(code(setup_step::extract))]
    Extraction {
        /// Error message.
        message: String,
    },

    /// Tool cache operation failed.
    #[error("{message}")]
    #[diagnostic(code(setup_step::cache))]
    Cache {
        /// Error message.
        message: String,
    },

    /// Subprocess could not be spawned or exited unsuccessfully.
    #[error("{message}")]
    #[diagnostic(code(setup_step::exec))]
    Exec {
        /// Error message.
        message: String,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    #[diagnostic(code(setup_step::io))]
    Io(#[from] std::io::Error),

    /// A failure value that carried no usable message.
    ///
    /// Collaborators normalize foreign failure values into this variant.
    /// The coordinator logs it but never reports it to the runner.
    #[error("unstructured failure: {detail}")]
    #[diagnostic(code(setup_step::unstructured))]
    Unstructured {
        /// Debug rendering of the original value.
        detail: String,
    },
}

impl Error {
    /// Create an invalid version error.
    #[must_use]
    pub fn invalid_version(input: impl Into<String>) -> Self {
        Self::InvalidVersion {
            input: input.into(),
        }
    }

    /// Create an unsupported platform error.
    #[must_use]
    pub fn unsupported_platform(platform: impl Into<String>) -> Self {
        Self::UnsupportedPlatform {
            platform: platform.into(),
        }
    }

    /// Create an unsupported architecture error.
    #[must_use]
    pub fn unsupported_architecture(arch: impl Into<String>) -> Self {
        Self::UnsupportedArchitecture { arch: arch.into() }
    }

    /// Create a registry error.
    #[must_use]
    pub fn registry(message: impl Into<String>) -> Self {
        Self::Registry {
            message: message.into(),
        }
    }

    /// Create a download error.
    #[must_use]
    pub fn download(message: impl Into<String>) -> Self {
        Self::Download {
            message: message.into(),
        }
    }

    /// Create an extraction error.
    #[must_use]
    pub fn extraction(message: impl Into<String>) -> Self {
        Self::Extraction {
            message: message.into(),
        }
    }

    /// Create a cache error.
    #[must_use]
    pub fn cache(message: impl Into<String>) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }

    /// Create an exec error.
    #[must_use]
    pub fn exec(message: impl Into<String>) -> Self {
        Self::Exec {
            message: message.into(),
        }
    }

    /// Wrap a failure value that has no message of its own.
    #[must_use]
    pub fn unstructured(value: &impl std::fmt::Debug) -> Self {
        Self::Unstructured {
            detail: format!("{value:?}"),
        }
    }

    /// Message to surface to the pipeline runner, if this failure is reportable.
    #[must_use]
    pub fn report_message(&self) -> Option<String> {
        match self {
            Self::Unstructured { .. } => None,
            other => Some(other.to_string()),
        }
    }
}
