//! HTTP-specific error types for the Ambari client.
//!
//! This module contains error types for HTTP operations: non-successful
//! responses, request validation failures and connectivity problems.
//!
//! # Error Handling
//!
//! - [`HttpResponseError`]: Non-2xx HTTP responses from the server
//! - [`InvalidHttpRequestError`]: When a request fails validation before sending
//! - [`HttpError`]: Unified error type encompassing all HTTP-related errors
//!
//! # Example
//!
//! ```rust,ignore
//! use ambari_api::clients::{HttpClient, HttpRequest, HttpMethod, HttpError};
//!
//! match client.request(request).await {
//!     Ok(response) => println!("Success: {}", response.body),
//!     Err(HttpError::Response(e)) => {
//!         println!("{} {} failed with {}: {}", e.method, e.path, e.code, e.message);
//!     }
//!     Err(HttpError::InvalidRequest(e)) => println!("Invalid request: {e}"),
//!     Err(HttpError::Network(e)) => println!("Network error: {e}"),
//! }
//! ```

use thiserror::Error;

use crate::clients::http_request::HttpMethod;

/// Error returned when an HTTP request receives a non-successful response.
///
/// The `message` is taken from the `message` field Ambari puts in its error
/// bodies, falling back to the raw body text.
///
/// # Example
///
/// ```rust
/// use ambari_api::clients::{HttpMethod, HttpResponseError};
///
/// let error = HttpResponseError {
///     code: 404,
///     method: HttpMethod::Get,
///     path: "clusters/c1".to_string(),
///     message: "The requested resource doesn't exist".to_string(),
/// };
///
/// assert!(error.to_string().contains("404"));
/// assert!(error.to_string().contains("clusters/c1"));
/// ```
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{method} {path} returned {code}: {message}")]
pub struct HttpResponseError {
    /// The HTTP status code of the response.
    pub code: u16,
    /// The method of the failed request.
    pub method: HttpMethod,
    /// The request path, relative to the API root.
    pub path: String,
    /// Error message reported by the server.
    pub message: String,
}

/// Error returned when an HTTP request fails validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidHttpRequestError {
    /// A POST or PUT request was made without a body.
    #[error("Cannot use {method} without specifying data.")]
    MissingBody {
        /// The HTTP method that requires a body.
        method: String,
    },

    /// A GET request carries a body.
    #[error("Cannot send data with {method}.")]
    UnexpectedBody {
        /// The HTTP method that does not accept a body.
        method: String,
    },

    /// The request path is absolute or a full URL.
    #[error("Request path '{path}' must be relative to the API root.")]
    AbsolutePath {
        /// The offending path.
        path: String,
    },
}

/// Unified error type for all HTTP-related errors.
#[derive(Debug, Error)]
pub enum HttpError {
    /// An HTTP response error (non-2xx status code).
    #[error(transparent)]
    Response(#[from] HttpResponseError),

    /// Request validation failed.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidHttpRequestError),

    /// Network or connection error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl HttpError {
    /// Returns the HTTP status code, if the server answered.
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Response(e) => Some(e.code),
            _ => None,
        }
    }
}

// Verify HttpError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpError>();
};
