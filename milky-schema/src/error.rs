//! Error types for document loading and schema resolution.

use thiserror::Error;

/// Error type for document loading operations.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The document is not valid JSON or does not have the expected shape.
    #[error("invalid API description at '{path}': {message}")]
    Json {
        /// JSON path of the offending value (`.` for the root).
        path: String,
        /// Underlying decoder message.
        message: String,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_path_to_error::Error<serde_json::Error>> for ParseError {
    fn from(err: serde_path_to_error::Error<serde_json::Error>) -> Self {
        Self::Json {
            path: err.path().to_string(),
            message: err.inner().to_string(),
        }
    }
}

/// Error type for reference resolution and document validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// A reference names a definition that does not exist.
    #[error("reference to undefined schema definition '{name}'{}", located(.location))]
    UnknownDefinition {
        /// Definition name.
        name: String,
        /// Where the reference was found, if known.
        location: Option<String>,
    },

    /// A reference string does not point into the definition table.
    #[error(
        "unsupported reference '{reference}' (expected '#/components/schemas/<Name>'){}",
        located(.location)
    )]
    InvalidReference {
        /// The raw reference string.
        reference: String,
        /// Where the reference was found, if known.
        location: Option<String>,
    },

    /// Circular definition reference.
    #[error("circular schema reference detected: {path}{}", located(.location))]
    CircularReference {
        /// Chain of definition names, closed by the repeated name.
        path: String,
        /// Where the cycle was entered, if known.
        location: Option<String>,
    },

    /// Two callable paths produce the same operation name.
    #[error("duplicate operation '{name}' declared by '{first}' and '{second}'")]
    DuplicateOperation {
        /// Operation name.
        name: String,
        /// Path that declared it first.
        first: String,
        /// Path that declared it again.
        second: String,
    },

    /// Validation error.
    #[error("validation error: {message}")]
    Validation {
        /// Error message.
        message: String,
    },
}

impl SchemaError {
    /// Creates an unknown definition error.
    pub fn unknown(name: impl Into<String>) -> Self {
        Self::UnknownDefinition {
            name: name.into(),
            location: None,
        }
    }

    /// Creates an unsupported reference error.
    pub fn invalid_reference(reference: impl Into<String>) -> Self {
        Self::InvalidReference {
            reference: reference.into(),
            location: None,
        }
    }

    /// Creates a circular reference error from the visited chain and the
    /// name that closed the loop.
    pub fn circular<S: AsRef<str>>(trail: &[S], repeated: &str) -> Self {
        let mut path: Vec<&str> = trail.iter().map(AsRef::as_ref).collect();
        path.push(repeated);
        Self::CircularReference {
            path: path.join(" -> "),
            location: None,
        }
    }

    /// Records where this error was encountered. Reference errors keep
    /// their variant; an already recorded location is not replaced.
    #[must_use]
    pub fn within(mut self, location: impl std::fmt::Display) -> Self {
        match &mut self {
            Self::UnknownDefinition { location: slot, .. }
            | Self::InvalidReference { location: slot, .. }
            | Self::CircularReference { location: slot, .. } => {
                if slot.is_none() {
                    *slot = Some(location.to_string());
                }
                self
            }
            Self::Validation { message } => Self::Validation {
                message: format!("{location}: {message}"),
            },
            Self::DuplicateOperation { .. } => self,
        }
    }

    /// Returns the recorded location of a reference error.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        match self {
            Self::UnknownDefinition { location, .. }
            | Self::InvalidReference { location, .. }
            | Self::CircularReference { location, .. } => location.as_deref(),
            _ => None,
        }
    }
}

fn located(location: &Option<String>) -> String {
    location
        .as_deref()
        .map(|location| format!(" (in {location})"))
        .unwrap_or_default()
}
