//! Error types for resource graph operations.
//!
//! This module contains the error type returned by models, collections and
//! the synchronization engine. It wraps [`HttpError`] and maps the HTTP
//! statuses Ambari uses for "missing" and "not allowed" to semantic variants.
//!
//! # Error Handling
//!
//! - **404**: [`ResourceError::NotFound`]
//! - **405**: [`ResourceError::MethodNotAllowed`] (never retried)
//! - **Other 4xx/5xx and connectivity failures**: [`ResourceError::Http`]
//!
//! # Example
//!
//! ```rust,ignore
//! use ambari_api::rest::ResourceError;
//!
//! match user.attribute("admin").await {
//!     Ok(value) => println!("admin: {value}"),
//!     Err(ResourceError::NotFound { path, .. }) => println!("{path} is gone"),
//!     Err(ResourceError::FieldNotFound { field, .. }) => println!("no {field}"),
//!     Err(e) => println!("Other error: {e}"),
//! }
//! ```

use std::time::Duration;

use thiserror::Error;

use crate::clients::{HttpError, HttpMethod};
use crate::rest::operation::OperationStatus;

/// Error type for resource graph operations.
///
/// # Example
///
/// ```rust
/// use ambari_api::rest::{OperationStatus, ResourceError};
/// use std::time::Duration;
///
/// let error = ResourceError::WaitTimeout {
///     request_id: 5,
///     last_status: OperationStatus::InProgress,
///     timeout: Duration::from_secs(60),
/// };
/// assert!(error.to_string().contains("IN_PROGRESS"));
/// assert_eq!(error.request_id(), Some(5));
/// ```
#[derive(Debug, Error)]
pub enum ResourceError {
    /// The server has no entity at this path (HTTP 404).
    #[error("{resource} not found at '{path}'")]
    NotFound {
        /// The kind name of the resource (e.g., "Cluster").
        resource: &'static str,
        /// The request path.
        path: String,
    },

    /// The server refused the method for this path (HTTP 405), or the kind
    /// is known not to support it.
    #[error("{method} is not allowed on '{path}'")]
    MethodNotAllowed {
        /// The rejected method.
        method: HttpMethod,
        /// The request path.
        path: String,
    },

    /// The attribute is absent even after the entity was fetched.
    #[error("{resource} at '{path}' has no field '{field}'")]
    FieldNotFound {
        /// The kind name of the resource.
        resource: &'static str,
        /// The path of the entity.
        path: String,
        /// The requested attribute.
        field: String,
    },

    /// The kind has no relationship with this name.
    #[error("{resource} has no relationship named '{relationship}'")]
    UnknownRelationship {
        /// The kind name of the resource.
        resource: &'static str,
        /// The requested relationship.
        relationship: String,
    },

    /// A non-terminal segment of an identity has no key, so no path exists.
    #[error("Cannot resolve a path: '{segment}' has no key yet")]
    IncompleteIdentity {
        /// The collection segment that lacks a key.
        segment: String,
    },

    /// An asynchronous request finished unsuccessfully.
    #[error("Request {request_id} finished with status {status}")]
    OperationFailed {
        /// The server-side request id.
        request_id: u64,
        /// The terminal status.
        status: OperationStatus,
    },

    /// An asynchronous request did not finish before the timeout.
    #[error("Request {request_id} did not finish within {timeout:?} (last status {last_status})")]
    WaitTimeout {
        /// The server-side request id.
        request_id: u64,
        /// The last observed status.
        last_status: OperationStatus,
        /// The timeout that elapsed.
        timeout: Duration,
    },

    /// An entity did not reach its ready state before the timeout
    /// (e.g., a host that never reported healthy).
    #[error("{resource} at '{path}' was not ready within {timeout:?}")]
    NotReady {
        /// The kind name of the resource.
        resource: &'static str,
        /// The path of the entity.
        path: String,
        /// The timeout that elapsed.
        timeout: Duration,
    },

    /// The server answered with a body the client cannot interpret.
    #[error("Unexpected response from '{path}': {reason}")]
    InvalidResponse {
        /// The request path.
        path: String,
        /// What was wrong with the body.
        reason: String,
    },

    /// The kind does not support this operation.
    #[error("{resource} does not support {operation}")]
    UnsupportedOperation {
        /// The kind name of the resource.
        resource: &'static str,
        /// The attempted operation (e.g., "create", "delete").
        operation: &'static str,
    },

    /// An HTTP-level error that has no semantic variant.
    #[error(transparent)]
    Http(#[from] HttpError),
}

impl ResourceError {
    /// Maps a transport error to a resource error.
    ///
    /// - 404 -> `NotFound`
    /// - 405 -> `MethodNotAllowed`
    /// - Other -> `Http`
    ///
    /// # Example
    ///
    /// ```rust
    /// use ambari_api::clients::{HttpError, HttpMethod, HttpResponseError};
    /// use ambari_api::rest::ResourceError;
    ///
    /// let error = ResourceError::from_http_error(
    ///     HttpError::Response(HttpResponseError {
    ///         code: 404,
    ///         method: HttpMethod::Get,
    ///         path: "clusters/c1".to_string(),
    ///         message: "The requested resource doesn't exist".to_string(),
    ///     }),
    ///     "Cluster",
    /// );
    /// assert!(matches!(error, ResourceError::NotFound { .. }));
    /// ```
    #[must_use]
    pub fn from_http_error(error: HttpError, resource: &'static str) -> Self {
        match error {
            HttpError::Response(response) if response.code == 404 => Self::NotFound {
                resource,
                path: response.path,
            },
            HttpError::Response(response) if response.code == 405 => Self::MethodNotAllowed {
                method: response.method,
                path: response.path,
            },
            other => Self::Http(other),
        }
    }

    /// Returns the server-side request id for operation errors.
    #[must_use]
    pub const fn request_id(&self) -> Option<u64> {
        match self {
            Self::OperationFailed { request_id, .. } | Self::WaitTimeout { request_id, .. } => {
                Some(*request_id)
            }
            _ => None,
        }
    }

    /// Returns the HTTP status code associated with this error, if any.
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::NotFound { .. } => Some(404),
            Self::MethodNotAllowed { .. } => Some(405),
            Self::Http(e) => e.status_code(),
            _ => None,
        }
    }
}

// Verify ResourceError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ResourceError>();
};
