//! Error types for reading generated skeletons back.
//!
//! Generating a skeleton never fails; only the skeleton reader can reject
//! its input.

use thiserror::Error;

/// Result type for skeleton reading.
pub type Result<T> = std::result::Result<T, SkeletonError>;

/// Read context carrying the filename for error reporting.
#[derive(Clone, Debug)]
pub struct ReadContext {
    pub filename: Option<String>,
}

impl ReadContext {
    /// Create a new read context.
    pub fn new(filename: Option<&str>) -> Self {
        Self {
            filename: filename.map(String::from),
        }
    }

    /// Format a location suffix for error messages. Lines and columns are
    /// zero-based here and printed one-based.
    pub fn loc_suffix(&self, line: usize, col: usize) -> String {
        match &self.filename {
            Some(name) => format!(" at {}:{} of <{}>", line + 1, col + 1, name),
            None => String::new(),
        }
    }
}

/// Error type for skeleton reading.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SkeletonError {
    /// `SCENARIO(...)` inside another open block.
    #[error("Nested SCENARIO{0}")]
    NestedScenario(String),

    /// `GIVEN`, `WHEN` or `THEN` with no open scenario.
    #[error("{0} outside of SCENARIO{1}")]
    StepOutsideScenario(String, String),

    /// A line starting with a call name that is not a well-formed call.
    #[error("Malformed {0} call{1}")]
    MalformedCall(String, String),

    /// Closing brace with nothing open.
    #[error("Unmatched closing brace{0}")]
    UnmatchedBrace(String),

    /// End of input with a block still open.
    #[error("Unclosed {0} block{1}")]
    UnclosedBlock(String, String),

    /// String literal missing its closing quote.
    #[error("Unterminated string{0}")]
    UnterminatedString(String),

    /// Unknown or truncated escape sequence in a string literal.
    #[error("Bad escape sequence{0}")]
    BadEscape(String),
}

impl SkeletonError {
    /// Create an error with location information.
    pub fn with_location(self, ctx: &ReadContext, line: usize, col: usize) -> Self {
        let suffix = ctx.loc_suffix(line, col);
        match self {
            SkeletonError::NestedScenario(_) => SkeletonError::NestedScenario(suffix),
            SkeletonError::StepOutsideScenario(call, _) => {
                SkeletonError::StepOutsideScenario(call, suffix)
            }
            SkeletonError::MalformedCall(call, _) => SkeletonError::MalformedCall(call, suffix),
            SkeletonError::UnmatchedBrace(_) => SkeletonError::UnmatchedBrace(suffix),
            SkeletonError::UnclosedBlock(call, _) => SkeletonError::UnclosedBlock(call, suffix),
            SkeletonError::UnterminatedString(_) => SkeletonError::UnterminatedString(suffix),
            SkeletonError::BadEscape(_) => SkeletonError::BadEscape(suffix),
        }
    }
}
