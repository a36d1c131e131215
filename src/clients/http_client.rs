//! HTTP client for Ambari API communication.
//!
//! This module provides the [`HttpClient`] type for making authenticated
//! requests against an Ambari server.

use std::collections::HashMap;

use crate::clients::errors::{HttpError, HttpResponseError};
use crate::clients::http_request::{HttpMethod, HttpRequest};
use crate::clients::http_response::HttpResponse;
use crate::config::{AmbariConfig, Credentials};

/// Base path of the Ambari REST API.
pub const API_BASE_PATH: &str = "/api/v1";

/// Library version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// HTTP client for making requests to the Ambari API.
///
/// The client handles:
/// - Base URI construction from the configured [`ServerUrl`](crate::ServerUrl)
/// - Default headers including `User-Agent` and `X-Requested-By`
/// - Basic authentication
/// - Mapping non-2xx responses to [`HttpError::Response`]
///
/// Requests are sent exactly once. Retrying is left to the caller.
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync`, making it safe to share across async tasks.
///
/// # Example
///
/// ```rust,ignore
/// use ambari_api::{AmbariConfig, Credentials};
/// use ambari_api::clients::{HttpClient, HttpRequest, HttpMethod};
///
/// let config = AmbariConfig::builder()
///     .host("http://ambari.local:8080")
///     .credentials(Credentials::new("admin", "admin")?)
///     .build()?;
///
/// let client = HttpClient::new(&config)?;
/// let request = HttpRequest::builder(HttpMethod::Get, "clusters").build()?;
/// let response = client.request(request).await?;
/// ```
#[derive(Debug)]
pub struct HttpClient {
    /// The internal reqwest HTTP client.
    client: reqwest::Client,
    /// Base URI (e.g., `http://ambari.local:8080`).
    base_uri: String,
    /// Base path (always `/api/v1`).
    base_path: String,
    /// Default headers to include in all requests.
    default_headers: HashMap<String, String>,
    /// Basic authentication credentials.
    credentials: Option<Credentials>,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new HTTP client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Network`] if the underlying reqwest client cannot
    /// be created (e.g. TLS initialization failure).
    pub fn new(config: &AmbariConfig) -> Result<Self, HttpError> {
        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let rust_version = env!("CARGO_PKG_RUST_VERSION");
        let user_agent =
            format!("{user_agent_prefix}Ambari API Library v{SDK_VERSION} | Rust {rust_version}");

        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), user_agent);
        default_headers.insert("Accept".to_string(), "application/json".to_string());
        default_headers.insert(
            "X-Requested-By".to_string(),
            config.identifier().as_ref().to_string(),
        );

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(config.request_timeout())
            .danger_accept_invalid_certs(!config.validate_ssl())
            .build()?;

        Ok(Self {
            client,
            base_uri: config.server_url().as_ref().to_string(),
            base_path: API_BASE_PATH.to_string(),
            default_headers,
            credentials: config.credentials().cloned(),
        })
    }

    /// Returns the base URI for this client.
    #[must_use]
    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    /// Returns the base path for this client.
    #[must_use]
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Returns the default headers for this client.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Sends an HTTP request to the Ambari API.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if:
    /// - Request validation fails (`InvalidRequest`)
    /// - Network error occurs (`Network`)
    /// - Non-2xx response received (`Response`)
    pub async fn request(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        request.verify()?;

        let url = format!("{}{}/{}", self.base_uri, self.base_path, request.path);

        let mut headers = self.default_headers.clone();
        if request.body.is_some() {
            headers.insert("Content-Type".to_string(), "application/json".to_string());
        }

        let mut req_builder = match request.http_method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
            HttpMethod::Put => self.client.put(&url),
            HttpMethod::Delete => self.client.delete(&url),
        };

        for (key, value) in &headers {
            req_builder = req_builder.header(key, value);
        }
        if let Some(credentials) = &self.credentials {
            req_builder = req_builder.basic_auth(credentials.username(), Some(credentials.password()));
        }
        if let Some(body) = &request.body {
            req_builder = req_builder.body(body.to_string());
        }

        tracing::debug!(method = %request.http_method, path = %request.path, "sending request");
        let res = req_builder.send().await?;

        let code = res.status().as_u16();
        let res_headers = Self::parse_response_headers(res.headers());
        let body_text = res.text().await?;

        let is_success = (200..300).contains(&code);
        let body = if body_text.trim().is_empty() {
            serde_json::json!({})
        } else {
            match serde_json::from_str(&body_text) {
                Ok(value) => value,
                Err(_) if is_success => {
                    tracing::warn!(
                        method = %request.http_method,
                        path = %request.path,
                        "response body is not JSON, treating it as empty"
                    );
                    serde_json::json!({})
                }
                Err(_) => serde_json::json!({ "raw_body": body_text }),
            }
        };

        let response = HttpResponse::new(code, res_headers, body);
        tracing::debug!(
            method = %request.http_method,
            path = %request.path,
            status = code,
            "received response"
        );

        if response.is_ok() {
            return Ok(response);
        }

        Err(HttpError::Response(HttpResponseError {
            code,
            method: request.http_method,
            path: request.path,
            message: Self::error_message(&response),
        }))
    }

    /// Parses response headers into a `HashMap`.
    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }

    /// Extracts a human readable message from an error response.
    ///
    /// Ambari answers errors with `{"status": <code>, "message": "..."}`.
    fn error_message(response: &HttpResponse) -> String {
        let body = &response.body;
        body.get("message")
            .and_then(serde_json::Value::as_str)
            .or_else(|| body.get("raw_body").and_then(serde_json::Value::as_str))
            .map_or_else(|| body.to_string(), ToString::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Identifier;
    use serde_json::json;

    fn create_test_config() -> AmbariConfig {
        AmbariConfig::builder()
            .host("http://ambari.local:8080")
            .credentials(Credentials::new("admin", "admin").unwrap())
            .build()
            .unwrap()
    }

    #[test]
    fn test_client_construction_from_config() {
        let client = HttpClient::new(&create_test_config()).unwrap();

        assert_eq!(client.base_uri(), "http://ambari.local:8080");
        assert_eq!(client.base_path(), "/api/v1");
    }

    #[test]
    fn test_user_agent_header_format() {
        let client = HttpClient::new(&create_test_config()).unwrap();

        let user_agent = client.default_headers().get("User-Agent").unwrap();
        assert!(user_agent.contains("Ambari API Library v"));
        assert!(user_agent.contains("Rust"));
    }

    #[test]
    fn test_user_agent_with_prefix() {
        let config = AmbariConfig::builder()
            .host("ambari.local")
            .user_agent_prefix("Provisioner/1.0")
            .build()
            .unwrap();
        let client = HttpClient::new(&config).unwrap();

        let user_agent = client.default_headers().get("User-Agent").unwrap();
        assert!(user_agent.starts_with("Provisioner/1.0 | "));
    }

    #[test]
    fn test_requested_by_header_uses_identifier() {
        let config = AmbariConfig::builder()
            .host("ambari.local")
            .identifier(Identifier::new("deployer").unwrap())
            .build()
            .unwrap();
        let client = HttpClient::new(&config).unwrap();

        assert_eq!(
            client.default_headers().get("X-Requested-By"),
            Some(&"deployer".to_string())
        );
        assert_eq!(
            client.default_headers().get("Accept"),
            Some(&"application/json".to_string())
        );
    }

    #[test]
    fn test_error_message_prefers_server_message() {
        let response = HttpResponse::new(
            404,
            HashMap::new(),
            json!({"status": 404, "message": "The requested resource doesn't exist"}),
        );
        assert_eq!(
            HttpClient::error_message(&response),
            "The requested resource doesn't exist"
        );

        let response = HttpResponse::new(500, HashMap::new(), json!({"raw_body": "boom"}));
        assert_eq!(HttpClient::error_message(&response), "boom");
    }

    #[test]
    fn test_client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<HttpClient>();
    }
}
