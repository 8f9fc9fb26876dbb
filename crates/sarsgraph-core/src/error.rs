//! Error types for SarsGraph Core
//!
//! Every fallible operation in the crate returns [`GraphError`]. The taxonomy
//! mirrors how callers are expected to react:
//! - `Validation`: the input itself is malformed (confidence out of range,
//!   unknown domain tag, inconsistent stored flag)
//! - `NotFound`: a referenced node, graph or draft does not exist
//! - `Conflict`: an id or name is already taken
//! - `InvalidArgument`: an argument list is unusable as a whole
//!
//! A failing governance check is not an error; see [`crate::governance`].

use std::fmt;

/// Result alias used throughout the crate
pub type Result<T, E = GraphError> = std::result::Result<T, E>;

/// Main error type
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// Input rejected before any mutation took place
    #[error("validation failed: {reason}")]
    Validation {
        /// What was wrong with the input
        reason: String,
    },

    /// Referenced entity does not exist
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Kind of entity that was looked up
        kind: EntityKind,
        /// Id that failed to resolve
        id: String,
    },

    /// Id or name already in use
    #[error("{kind} already exists: {id}")]
    Conflict {
        /// Kind of entity that collided
        kind: EntityKind,
        /// Colliding id
        id: String,
    },

    /// Argument list is unusable (empty, duplicated, mismatched lengths)
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// JSON encoding or decoding failed
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Underlying reader or writer failed
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl GraphError {
    /// Build a validation error
    #[inline]
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation {
            reason: reason.into(),
        }
    }

    /// Build a not-found error
    #[inline]
    pub fn not_found(kind: EntityKind, id: impl fmt::Display) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// Build a conflict error
    #[inline]
    pub fn conflict(kind: EntityKind, id: impl fmt::Display) -> Self {
        Self::Conflict {
            kind,
            id: id.to_string(),
        }
    }

    /// Build an invalid-argument error
    #[inline]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Coarse classification, e.g. for mapping onto status codes
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } => ErrorKind::Validation,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Conflict { .. } => ErrorKind::Conflict,
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::Serialization(_) => ErrorKind::Serialization,
            Self::Io(_) => ErrorKind::Io,
        }
    }

    /// Whether the caller can retry with corrected input
    ///
    /// Rejected accumulation calls never mutate state, so input errors are
    /// always retryable. Encoding and I/O failures are not.
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Validation
                | ErrorKind::NotFound
                | ErrorKind::Conflict
                | ErrorKind::InvalidArgument
        )
    }
}

/// Coarse error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`GraphError::Validation`]
    Validation,
    /// See [`GraphError::NotFound`]
    NotFound,
    /// See [`GraphError::Conflict`]
    Conflict,
    /// See [`GraphError::InvalidArgument`]
    InvalidArgument,
    /// See [`GraphError::Serialization`]
    Serialization,
    /// See [`GraphError::Io`]
    Io,
}

/// Entity named in `NotFound` and `Conflict` errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// Domain node
    Node,
    /// Edge
    Edge,
    /// Serendipity trace (keyed by session id)
    Trace,
    /// Named rate-distortion curve
    Curve,
    /// Hypothesis path
    HypothesisPath,
    /// Built graph or open draft
    Graph,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Node => "node",
            Self::Edge => "edge",
            Self::Trace => "trace",
            Self::Curve => "rate-distortion curve",
            Self::HypothesisPath => "hypothesis path",
            Self::Graph => "graph",
        };
        f.write_str(name)
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid TOML for the expected shape
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Parsed values violate a constraint
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Reject confidence values outside `[0, 1]` (NaN included)
pub(crate) fn check_unit_interval(what: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(GraphError::validation(format!(
            "{what} must lie in [0, 1], got {value}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_interval_accepts_bounds() {
        assert!(check_unit_interval("confidence", 0.0).is_ok());
        assert!(check_unit_interval("confidence", 1.0).is_ok());
    }

    #[test]
    fn unit_interval_rejects_nan_and_out_of_range() {
        for bad in [f64::NAN, -0.01, 1.01, f64::INFINITY] {
            let err = check_unit_interval("confidence", bad).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation);
        }
    }

    #[test]
    fn display_names_entity() {
        let err = GraphError::not_found(EntityKind::Node, "n-1");
        assert_eq!(err.to_string(), "node not found: n-1");

        let err = GraphError::conflict(EntityKind::Curve, "transmissibility");
        assert_eq!(
            err.to_string(),
            "rate-distortion curve already exists: transmissibility"
        );
    }

    #[test]
    fn io_errors_are_not_retryable() {
        let err = GraphError::from(std::io::Error::other("disk gone"));
        assert!(!err.is_retryable());
        assert!(GraphError::invalid_argument("empty").is_retryable());
    }
}
