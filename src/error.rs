//! Error types and handling for the `TravelHub` application

use thiserror::Error;

/// Start-up and configuration error type for the `TravelHub` application
#[derive(Error, Debug)]
pub enum TravelHubError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// HTTP client construction errors
    #[error("HTTP client error: {message}")]
    Client { message: String },

    /// Server start-up errors
    #[error("Server error: {message}")]
    Server { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl TravelHubError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new HTTP client error
    pub fn client<S: Into<String>>(message: S) -> Self {
        Self::Client {
            message: message.into(),
        }
    }

    /// Create a new server error
    pub fn server<S: Into<String>>(message: S) -> Self {
        Self::Server {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            TravelHubError::Config { message } => {
                format!("Configuration error: {message}. Please check your config file and environment.")
            }
            TravelHubError::Client { .. } => {
                "Unable to initialise outbound HTTP clients.".to_string()
            }
            TravelHubError::Server { message } => message.clone(),
            TravelHubError::Io { .. } => {
                "File or socket operation failed. Please check permissions and the listen address."
                    .to_string()
            }
        }
    }
}
