//! Error types and handling for the `TripSync` planning engine

use thiserror::Error;

/// Main error type for the `TripSync` engine
#[derive(Error, Debug)]
pub enum PlannerError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// No date window is shared by the group
    #[error("No common travel window: {message}")]
    NoCommonWindow { message: String },

    /// No candidate destination could be ranked
    #[error("No destination available: {message}")]
    NoDestinations { message: String },

    /// JSON input/output errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },

    /// Memo encoding errors
    #[error("Memo error: {source}")]
    Memo {
        #[from]
        source: postcard::Error,
    },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl PlannerError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new infeasible-trip error
    pub fn no_common_window<S: Into<String>>(message: S) -> Self {
        Self::NoCommonWindow {
            message: message.into(),
        }
    }

    /// Create a new missing-destination error
    pub fn no_destinations<S: Into<String>>(message: S) -> Self {
        Self::NoDestinations {
            message: message.into(),
        }
    }

    /// True when the group cannot travel together at all
    #[must_use]
    pub fn is_infeasible(&self) -> bool {
        matches!(self, PlannerError::NoCommonWindow { .. })
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            PlannerError::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
            PlannerError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            PlannerError::NoCommonWindow { .. } => {
                "The group has no dates in common. Ask travelers to widen their availability."
                    .to_string()
            }
            PlannerError::NoDestinations { .. } => {
                "No candidate destinations were supplied for this trip.".to_string()
            }
            PlannerError::Serialization { source } => {
                format!("Could not read the planning request: {source}")
            }
            PlannerError::Memo { .. } => {
                "Plan memo is unreadable. You may need to clear it.".to_string()
            }
            PlannerError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}
