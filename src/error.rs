//! Error types and handling for the package editor

use thiserror::Error;

/// Message shown when a failed write carries no usable text of its own
pub const GENERIC_SAVE_ERROR: &str = "Failed to save package";

/// Form input problems detected before any network call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please select a destination")]
    MissingDestination,

    #[error("Please fill in the itinerary for day {day}")]
    BlankDay { day: usize },

    #[error("Duration must be between 1 and 365 days")]
    InvalidDuration,

    #[error("Price must be a non-negative number")]
    InvalidPrice,

    #[error("Itinerary has {actual} days but the package lasts {expected}")]
    ItineraryLength { expected: usize, actual: usize },
}

/// Main error type for the package editor
#[derive(Error, Debug)]
pub enum PackageError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Local form validation errors
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The backend answered with a non-success status
    #[error("Backend error ({status}): {message}")]
    Backend { status: u16, message: String },

    /// The backend could not be reached
    #[error("Network error: {message}")]
    Network { message: String },

    /// The backend answered with a body we could not read
    #[error("Invalid backend response: {message}")]
    Decode { message: String },

    /// The host's save callback failed
    #[error("{message}")]
    Save { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl PackageError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new backend error
    pub fn backend<S: Into<String>>(status: u16, message: S) -> Self {
        Self::Backend {
            status,
            message: message.into(),
        }
    }

    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    pub fn decode<S: Into<String>>(message: S) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create a new save error
    pub fn save<S: Into<String>>(message: S) -> Self {
        Self::Save {
            message: message.into(),
        }
    }

    /// Message suitable for showing inline in the form.
    ///
    /// Backend and save failures expose the message they carry, falling back to
    /// [`GENERIC_SAVE_ERROR`] when that message is blank.
    #[must_use]
    pub fn user_message(&self) -> String {
        let message = match self {
            PackageError::Config { .. } => {
                return "Configuration error. Please check your config file and API key."
                    .to_string();
            }
            PackageError::Validation(err) => return err.to_string(),
            PackageError::Backend { message, .. } => message.as_str(),
            PackageError::Network { message } => message.as_str(),
            PackageError::Decode { .. } => "",
            PackageError::Save { message } => message.as_str(),
            PackageError::Io { .. } => {
                return "File operation failed. Please check file permissions.".to_string();
            }
        };

        if message.trim().is_empty() {
            GENERIC_SAVE_ERROR.to_string()
        } else {
            message.to_string()
        }
    }
}

impl From<reqwest::Error> for PackageError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            PackageError::decode(err.to_string())
        } else {
            PackageError::network(err.to_string())
        }
    }
}
