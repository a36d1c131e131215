//! Error types for client configuration.
//!
//! This module contains the error type returned while validating
//! configuration values before any request is made.
//!
//! # Error Handling
//!
//! All configuration constructors return `Result<T, ConfigError>` to enable
//! fail-fast validation. Error messages name the offending value.
//!
//! # Example
//!
//! ```rust
//! use ambari_api::{ConfigError, ServerUrl};
//!
//! let result = ServerUrl::parse("ftp://ambari.example.com", None, None);
//! assert!(matches!(result, Err(ConfigError::UnsupportedProtocol { .. })));
//! ```

use thiserror::Error;

/// Errors that can occur during client configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The server host is empty or cannot be parsed.
    #[error("Invalid Ambari host '{host}'. Expected format: '[http[s]://]host[:port]'.")]
    InvalidHost {
        /// The host string that was provided.
        host: String,
    },

    /// The protocol is neither `http` nor `https`.
    #[error("Unsupported protocol '{protocol}'. Only 'http' and 'https' are supported.")]
    UnsupportedProtocol {
        /// The protocol that was provided.
        protocol: String,
    },

    /// The port is not a valid TCP port number.
    #[error("Invalid port '{port}'. Expected a number between 1 and 65535.")]
    InvalidPort {
        /// The port value that was provided.
        port: String,
    },

    /// The `X-Requested-By` identifier is empty.
    #[error("Client identifier cannot be empty. It is sent as the X-Requested-By header.")]
    EmptyIdentifier,

    /// The username for basic authentication is empty.
    #[error("Username cannot be empty when credentials are configured.")]
    EmptyUsername,

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },
}
