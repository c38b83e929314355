//! Error types for feeder model parsing, queries and mutations.
//!
//! Every failure in the core is fatal for the operation that raised it: the
//! parser does not skip bad lines, queries do not guess between candidates and
//! mutations do not partially apply. Callers at the CLI/pipeline boundary wrap
//! these in `anyhow` with context.
//!
//! # Example
//!
//! ```ignore
//! use feeder_core::{FeederError, FeederResult};
//!
//! fn regulator_of(doc: &Document) -> FeederResult<NodeId> {
//!     doc.find_one("class", "regulator")
//! }
//! ```

use thiserror::Error;

use crate::NodeId;

/// Error type for all feeder model operations.
#[derive(Error, Debug)]
pub enum FeederError {
    /// I/O errors while reading or writing model files
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A line looked like an object declaration but its header could not be read
    #[error("line {line}: malformed object declaration `{text}`")]
    BadDeclaration { line: usize, text: String },

    /// A line inside an object block is not a property, comment, blank or nested object
    #[error("line {line}: unrecognized syntax inside object block `{text}`")]
    MalformedLine { line: usize, text: String },

    /// Input ended while an object block was still open
    #[error("unexpected end of input: {object} opened at line {line} is never closed")]
    UnexpectedEof { object: String, line: usize },

    /// A query asserting a result count found a different number of objects
    #[error("expected {expected} object(s) with {property} = {value}, found {found}")]
    Arity {
        property: String,
        value: String,
        expected: usize,
        found: usize,
    },

    #[error("no upstream found for {node}")]
    NoUpstream { node: String },

    #[error("ambiguous upstream for {node}: {count} candidates")]
    AmbiguousUpstream { node: String, count: usize },

    /// Upstream walk came back to an object it already visited
    #[error("topology cycle detected at {node}")]
    CycleDetected { node: String },

    #[error("cannot sign document: it holds nothing but blank lines and comments")]
    SignAnchorMissing,

    #[error("class of {node} is immutable (already `{class}`)")]
    ClassImmutable { node: String, class: String },

    #[error("object has no class")]
    MissingClass,

    #[error("invalid property `{key}`: {reason}")]
    InvalidProperty { key: String, reason: String },

    /// The id does not address a live object of this document
    #[error("unknown object id {0}")]
    UnknownNode(NodeId),

    /// Generic errors (for wrapping external errors)
    #[error("{0}")]
    Other(String),
}

/// Convenience type alias for Results using FeederError.
pub type FeederResult<T> = Result<T, FeederError>;

impl From<anyhow::Error> for FeederError {
    fn from(err: anyhow::Error) -> Self {
        FeederError::Other(err.to_string())
    }
}

impl From<String> for FeederError {
    fn from(s: String) -> Self {
        FeederError::Other(s)
    }
}

impl From<&str> for FeederError {
    fn from(s: &str) -> Self {
        FeederError::Other(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_names_line() {
        let err = FeederError::MalformedLine {
            line: 12,
            text: "phases ABCN".into(),
        };
        assert_eq!(
            err.to_string(),
            "line 12: unrecognized syntax inside object block `phases ABCN`"
        );
    }

    #[test]
    fn test_arity_display_reports_found() {
        let err = FeederError::Arity {
            property: "class".into(),
            value: "regulator".into(),
            expected: 1,
            found: 3,
        };
        assert!(err.to_string().contains("expected 1"));
        assert!(err.to_string().contains("found 3"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: FeederError = io_err.into();
        assert!(matches!(err, FeederError::Io(_)));
    }

    #[test]
    fn test_question_mark_operator() {
        fn inner() -> FeederResult<()> {
            Err(FeederError::SignAnchorMissing)
        }

        fn outer() -> FeederResult<()> {
            inner()?;
            Ok(())
        }

        assert!(matches!(outer(), Err(FeederError::SignAnchorMissing)));
    }
}
