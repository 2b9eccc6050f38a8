//! Error taxonomy for a generation run.
//!
//! Every stage of the pipeline fails fast with a [`GenerationError`]. The run
//! wraps it in a [`RunFailure`] so the caller learns which stage failed as well
//! as the artifact or path involved.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::generator::EmitterKind;

/// Errors raised while loading, modeling, emitting or assembling a project.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// An interface description has no matching binary payload, or a listed
    /// artifact does not exist.
    #[error("missing artifact for contract '{contract}': {detail}")]
    MissingArtifact {
        /// Contract (interface) name
        contract: String,
        /// What exactly is missing
        detail: String,
    },

    /// An interface description could not be parsed into well-formed
    /// function signatures.
    #[error("malformed artifact '{artifact}': {reason}")]
    MalformedArtifact {
        /// Contract name or file the problem was found in
        artifact: String,
        /// Parser or validator message
        reason: String,
    },

    /// Project configuration rejected by the model builder.
    #[error("invalid configuration for '{field}': {reason}")]
    InvalidConfiguration {
        /// Configuration field at fault
        field: &'static str,
        /// Why the value was rejected
        reason: String,
    },

    /// Two emitted files share the same relative path.
    #[error("path collision on '{path}' between {first} and {second} emitters")]
    PathCollision {
        /// Relative output path produced twice
        path: String,
        /// Emitter that produced the path first
        first: EmitterKind,
        /// Emitter that produced it again
        second: EmitterKind,
    },

    /// A filesystem failure interrupted assembly.
    #[error("write of '{}' failed after {} file(s) were written: {source}", .path.display(), .written.len())]
    PartialWrite {
        /// Path whose write failed
        path: PathBuf,
        /// Relative paths written successfully before the failure
        written: Vec<String>,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A template failed to render.
    #[error("failed to render template '{template}': {source}")]
    Template {
        /// Template file name
        template: &'static str,
        /// Askama error
        #[source]
        source: askama::Error,
    },
}

/// Coarse classification of [`GenerationError`], used for exit codes and
/// for the terminal `Failed` run state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MissingArtifact,
    MalformedArtifact,
    InvalidConfiguration,
    PathCollision,
    PartialWrite,
    Template,
}

impl ErrorKind {
    /// Process exit code reported by the CLI for this kind of failure.
    pub fn exit_code(self) -> u8 {
        match self {
            ErrorKind::MissingArtifact => 2,
            ErrorKind::MalformedArtifact => 3,
            ErrorKind::InvalidConfiguration => 4,
            ErrorKind::PathCollision => 5,
            ErrorKind::PartialWrite => 6,
            ErrorKind::Template => 1,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::MissingArtifact => "MissingArtifactError",
            ErrorKind::MalformedArtifact => "MalformedArtifactError",
            ErrorKind::InvalidConfiguration => "InvalidConfigurationError",
            ErrorKind::PathCollision => "PathCollisionError",
            ErrorKind::PartialWrite => "PartialWriteError",
            ErrorKind::Template => "TemplateError",
        };
        write!(f, "{s}")
    }
}

impl GenerationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GenerationError::MissingArtifact { .. } => ErrorKind::MissingArtifact,
            GenerationError::MalformedArtifact { .. } => ErrorKind::MalformedArtifact,
            GenerationError::InvalidConfiguration { .. } => ErrorKind::InvalidConfiguration,
            GenerationError::PathCollision { .. } => ErrorKind::PathCollision,
            GenerationError::PartialWrite { .. } => ErrorKind::PartialWrite,
            GenerationError::Template { .. } => ErrorKind::Template,
        }
    }

    pub(crate) fn malformed(artifact: impl Into<String>, reason: impl Into<String>) -> Self {
        GenerationError::MalformedArtifact {
            artifact: artifact.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_config(field: &'static str, reason: impl Into<String>) -> Self {
        GenerationError::InvalidConfiguration {
            field,
            reason: reason.into(),
        }
    }
}

/// Stage of a generation run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    Loading,
    Modeling,
    Emitting,
    Assembling,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Loading => write!(f, "LOADING"),
            Stage::Modeling => write!(f, "MODELING"),
            Stage::Emitting => write!(f, "EMITTING"),
            Stage::Assembling => write!(f, "ASSEMBLING"),
        }
    }
}

/// A failed run: the stage that failed and the error it raised.
#[derive(Debug, Error)]
#[error("generation failed during {stage} ({}): {error}", .error.kind())]
pub struct RunFailure {
    pub stage: Stage,
    #[source]
    pub error: GenerationError,
}

impl RunFailure {
    pub fn kind(&self) -> ErrorKind {
        self.error.kind()
    }
}

/// Result alias used throughout the engine.
pub type Result<T, E = GenerationError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_failure_names_stage_and_kind() {
        let failure = RunFailure {
            stage: Stage::Loading,
            error: GenerationError::MissingArtifact {
                contract: "Token".to_string(),
                detail: "no binary payload".to_string(),
            },
        };
        let msg = failure.to_string();
        assert!(msg.contains("LOADING"));
        assert!(msg.contains("MissingArtifactError"));
        assert!(msg.contains("Token"));
    }

    #[test]
    fn test_exit_codes_are_distinct_for_taxonomy() {
        let codes = [
            ErrorKind::MissingArtifact.exit_code(),
            ErrorKind::MalformedArtifact.exit_code(),
            ErrorKind::InvalidConfiguration.exit_code(),
            ErrorKind::PathCollision.exit_code(),
            ErrorKind::PartialWrite.exit_code(),
        ];
        let unique: std::collections::HashSet<_> = codes.iter().collect();
        assert_eq!(unique.len(), codes.len());
        assert!(codes.iter().all(|c| *c != 0));
    }

    #[test]
    fn test_partial_write_message_counts_written_files() {
        let err = GenerationError::PartialWrite {
            path: PathBuf::from("out/src/main.rs"),
            written: vec!["Cargo.toml".to_string()],
            source: std::io::Error::other("disk full"),
        };
        let msg = err.to_string();
        assert!(msg.contains("out/src/main.rs"));
        assert!(msg.contains("1 file(s)"));
        assert_eq!(err.kind(), ErrorKind::PartialWrite);
    }
}
