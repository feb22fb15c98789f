//! Error types for envelope parsing

use thiserror::Error;

/// Errors that can occur while parsing an envelope
#[derive(Error, Debug)]
pub enum ParseError {
    /// A line in the header section is neither a header nor a continuation
    #[error("Bad header line: {0:?}")]
    MalformedHeader(String),

    /// Failed to render a parsed message
    #[error("Failed to serialize message: {0}")]
    Serialize(String),
}

impl ParseError {
    /// The raw line that could not be parsed, if any
    #[must_use]
    pub fn line(&self) -> Option<&str> {
        match self {
            Self::MalformedHeader(line) => Some(line),
            Self::Serialize(_) => None,
        }
    }
}

/// Errors that can occur while building [`crate::Options`] from overrides
#[derive(Error, Debug)]
pub enum OptionsError {
    /// The overrides document is not valid JSON for the options schema
    #[error("Invalid options document: {0}")]
    Json(#[from] serde_json::Error),

    /// A pattern override does not compile
    #[error("Invalid pattern for {field}: {source}")]
    Pattern {
        field: &'static str,
        #[source]
        source: regex::Error,
    },
}

/// Failure of a parse driven by caller overrides: either the overrides
/// were unusable or the message was malformed
#[derive(Error, Debug)]
pub enum ParseFailure {
    #[error(transparent)]
    Options(#[from] OptionsError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Result type for envelope parsing operations
pub type Result<T> = std::result::Result<T, ParseError>;
