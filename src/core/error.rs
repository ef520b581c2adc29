//! Structured validation errors with breadcrumb context.
//!
//! Every check failure carries a machine-inspectable [`ErrorKind`] plus a trail
//! of human-readable breadcrumbs pushed at each enclosing stage boundary. The
//! rendered message reads outermost-first, e.g.
//! `failed to retrieve results from 'quality_control' <- expected a dataset at 'discards'`.

use std::fmt;
use thiserror::Error;

/// Failure taxonomy for schema validation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorKind {
    #[error("expected a group at '{0}'")]
    MissingGroup(String),
    #[error("expected a dataset at '{0}'")]
    MissingDataset(String),
    #[error("dataset '{name}' should be of {expected} type")]
    WrongType { name: String, expected: String },
    #[error("dataset '{name}' has unexpected dimensions")]
    WrongShape { name: String },
    #[error("'{value}' is not a valid value for '{field}'")]
    InvalidEnum { field: String, value: String },
    #[error("'{field}' is out of range: {reason}")]
    OutOfRange { field: String, reason: String },
    #[error("'{field}' should contain sorted and unique values")]
    NotSortedUnique { field: String },
    #[error("cluster {cluster} is not represented at least once")]
    EmptyCluster { cluster: i64 },
    #[error("'{name}' is duplicated")]
    DuplicateName { name: String },
    #[error("{0}")]
    InconsistentCount(String),
    #[error("format version in '_metadata' ({found}) does not match the supplied version ({expected})")]
    VersionMismatch { expected: i64, found: i64 },
    #[error("number of entries in '{field}' exceeds requested number of components")]
    TooManyComponents { field: String },
}

/// A validation failure: one root-cause kind plus the stage/field breadcrumbs
/// accumulated on the way out.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    kind: ErrorKind,
    trail: Vec<String>,
}

impl ValidationError {
    pub fn new(kind: ErrorKind) -> Self {
        ValidationError {
            kind,
            trail: Vec::new(),
        }
    }

    /// Root-cause kind, for programmatic inspection.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Breadcrumbs from innermost (first pushed) to outermost.
    pub fn trail(&self) -> &[String] {
        &self.trail
    }

    /// Push one breadcrumb; called at each enclosing stage boundary.
    pub fn push_context(mut self, message: impl Into<String>) -> Self {
        self.trail.push(message.into());
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for crumb in self.trail.iter().rev() {
            write!(f, "{} <- ", crumb)?;
        }
        write!(f, "{}", self.kind)
    }
}

impl std::error::Error for ValidationError {}

impl From<ErrorKind> for ValidationError {
    fn from(kind: ErrorKind) -> Self {
        ValidationError::new(kind)
    }
}

pub type Result<T> = std::result::Result<T, ValidationError>;

/// Context-pushing sugar for `Result<T, ValidationError>`.
pub trait ResultExt<T> {
    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> ResultExt<T> for Result<T> {
    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| e.push_context(f()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_renders_trail_outermost_first() {
        let err = ValidationError::new(ErrorKind::MissingDataset("discards".to_string()))
            .push_context("failed to retrieve results from 'quality_control'");
        let rendered = err.to_string();
        assert!(rendered.starts_with("failed to retrieve results from 'quality_control'"));
        assert!(rendered.ends_with("expected a dataset at 'discards'"));
    }

    #[test]
    fn test_kind_survives_wrapping() {
        let err: ValidationError = ErrorKind::EmptyCluster { cluster: 3 }.into();
        let err = err.push_context("outer");
        assert!(matches!(err.kind(), ErrorKind::EmptyCluster { cluster: 3 }));
        assert_eq!(err.trail(), &["outer".to_string()]);
    }
}
