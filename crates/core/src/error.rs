//! Error type shared by the parser, filter, and renderer.

use thiserror::Error;

pub type HookerResult<T> = Result<T, HookerError>;

#[derive(Error, Debug)]
pub enum HookerError {
    #[error("No @interface declaration found")]
    NoClassFound,

    #[error("Malformed declaration on line {line}: {message}")]
    MalformedDeclaration { line: usize, message: String },

    #[error("Malformed argument on line {line}: '{segment}'")]
    MalformedArgument { line: usize, segment: String },

    #[error("Unbalanced parenthesis on line {line}")]
    UnbalancedParenthesis { line: usize },

    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Renderer failed to write hook text")]
    RenderIncomplete,
}

impl HookerError {
    pub fn malformed_declaration(line: usize, message: impl Into<String>) -> Self {
        Self::MalformedDeclaration { line, message: message.into() }
    }

    pub fn malformed_argument(line: usize, segment: impl Into<String>) -> Self {
        Self::MalformedArgument { line, segment: segment.into() }
    }

    pub fn unbalanced(line: usize) -> Self {
        Self::UnbalancedParenthesis { line }
    }

    /// Per-unit failures: the unit is skipped and the batch keeps going.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::NoClassFound
                | Self::MalformedDeclaration { .. }
                | Self::MalformedArgument { .. }
                | Self::UnbalancedParenthesis { .. }
        )
    }

    /// Rewrite the line number of a line-level error. The tokenizer works on
    /// a single line and reports line 0; the builder knows the real position.
    pub(crate) fn at_line(self, line: usize) -> Self {
        match self {
            Self::MalformedDeclaration { message, .. } => Self::MalformedDeclaration { line, message },
            Self::MalformedArgument { segment, .. } => Self::MalformedArgument { line, segment },
            Self::UnbalancedParenthesis { .. } => Self::UnbalancedParenthesis { line },
            other => other,
        }
    }
}

impl From<std::fmt::Error> for HookerError {
    fn from(_: std::fmt::Error) -> Self {
        Self::RenderIncomplete
    }
}
