/// Errors from the choices engine.
///
/// Only programmer-error construction misuse is an error. Policy refusals are
/// reported as `AddItemResponse` values and unknown ids are silent no-ops.
use thiserror::Error;

/// Errors that can occur while constructing or configuring a control.
#[derive(Debug, Error)]
pub enum ChoicesError {
    /// The source element is neither a text input nor a select.
    #[error("Unrecognised element passed: '{kind}'")]
    UnrecognisedElement {
        /// The element type string that was supplied.
        kind: String,
    },

    /// The configured value-acceptance pattern does not compile.
    #[error("Invalid regexFilter '{pattern}': {source}")]
    InvalidRegex {
        /// The pattern as configured.
        pattern: String,
        /// Compilation error.
        #[source]
        source: regex::Error,
    },

    /// A search field name is neither `value`, `label` nor `customProperties.<path>`.
    #[error("Unknown search field '{field}'")]
    UnknownSearchField {
        /// The rejected field name.
        field: String,
    },

    /// Setup or script input could not be decoded.
    #[error("Invalid input: {0}")]
    Json(#[from] serde_json::Error),
}

impl ChoicesError {
    /// Return the CLI exit code for this error.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::UnrecognisedElement { .. } => 2,
            Self::InvalidRegex { .. } | Self::UnknownSearchField { .. } => 3,
            Self::Json(_) => 4,
        }
    }

    /// Machine-readable code used in the JSON error envelope.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnrecognisedElement { .. } => "unrecognised_element",
            Self::InvalidRegex { .. } => "invalid_regex",
            Self::UnknownSearchField { .. } => "unknown_search_field",
            Self::Json(_) => "invalid_input",
        }
    }
}
