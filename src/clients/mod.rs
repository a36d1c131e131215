//! HTTP client types for Ambari API communication.
//!
//! This module provides the HTTP layer underneath the resource graph. It
//! handles request validation, authentication headers and response parsing.
//!
//! # Overview
//!
//! - [`HttpClient`]: The async HTTP client for API communication
//! - [`HttpRequest`]: A request to be sent to the API
//! - [`HttpResponse`]: A parsed response from the API
//! - [`HttpMethod`]: Supported HTTP methods (GET, POST, PUT, DELETE)
//! - [`Transport`]: The trait models and collections send requests through
//!
//! # Example
//!
//! ```rust,ignore
//! use ambari_api::AmbariConfig;
//! use ambari_api::clients::{HttpClient, HttpRequest, HttpMethod};
//!
//! let config = AmbariConfig::builder().host("ambari.local:8080").build()?;
//! let client = HttpClient::new(&config)?;
//!
//! let request = HttpRequest::builder(HttpMethod::Get, "clusters").build()?;
//! let response = client.request(request).await?;
//! ```
//!
//! # Retry Behavior
//!
//! There is none. Every request is sent once; the only repeated calls in the
//! crate are the status checks made by [`poll`](crate::rest::poll).

mod errors;
mod http_client;
mod http_request;
mod http_response;
mod transport;

pub use errors::{HttpError, HttpResponseError, InvalidHttpRequestError};
pub use http_client::{HttpClient, API_BASE_PATH, SDK_VERSION};
pub use http_request::{HttpMethod, HttpRequest, HttpRequestBuilder};
pub use http_response::HttpResponse;
pub use transport::{Transport, TransportFuture};
