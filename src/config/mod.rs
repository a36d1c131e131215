//! Configuration types for the Ambari client.
//!
//! This module provides the configuration used to construct the HTTP
//! transport behind an [`Ambari`](crate::Ambari) session.
//!
//! # Overview
//!
//! - [`AmbariConfig`]: The configuration struct holding all client settings
//! - [`AmbariConfigBuilder`]: A builder for constructing [`AmbariConfig`] instances
//! - [`ServerUrl`]: A validated, normalized server base URL
//! - [`Identifier`]: The `X-Requested-By` header value
//! - [`Credentials`]: Basic authentication credentials with masked debug output
//!
//! # Example
//!
//! ```rust
//! use ambari_api::{AmbariConfig, Credentials};
//!
//! let config = AmbariConfig::builder()
//!     .host("ambari.example.com")
//!     .port(8080)
//!     .credentials(Credentials::new("admin", "admin").unwrap())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.server_url().as_ref(), "http://ambari.example.com:8080");
//! ```

mod newtypes;

pub use newtypes::{Credentials, Identifier, ServerUrl};

use std::time::Duration;

use crate::error::ConfigError;

/// Default request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for an Ambari client session.
///
/// `AmbariConfig` is `Clone`, `Send`, and `Sync`.
#[derive(Clone, Debug)]
pub struct AmbariConfig {
    server_url: ServerUrl,
    credentials: Option<Credentials>,
    identifier: Identifier,
    request_timeout: Duration,
    validate_ssl: bool,
    user_agent_prefix: Option<String>,
}

impl AmbariConfig {
    /// Creates a new builder for constructing an `AmbariConfig`.
    #[must_use]
    pub fn builder() -> AmbariConfigBuilder {
        AmbariConfigBuilder::new()
    }

    /// Returns the normalized server base URL.
    #[must_use]
    pub const fn server_url(&self) -> &ServerUrl {
        &self.server_url
    }

    /// Returns the basic authentication credentials, if configured.
    #[must_use]
    pub const fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    /// Returns the `X-Requested-By` identifier.
    #[must_use]
    pub const fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    /// Returns the per-request timeout.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Returns whether TLS certificates are validated.
    #[must_use]
    pub const fn validate_ssl(&self) -> bool {
        self.validate_ssl
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }
}

// Verify AmbariConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<AmbariConfig>();
};

/// Builder for constructing [`AmbariConfig`] instances.
///
/// The only required field is `host`.
///
/// # Defaults
///
/// - `protocol`: taken from the host string, otherwise `http`
/// - `port`: taken from the host string, otherwise 80 / 443
/// - `identifier`: `ambari-api-rust`
/// - `request_timeout`: 10 seconds
/// - `validate_ssl`: `true`
/// - `credentials`, `user_agent_prefix`: `None`
#[derive(Debug, Default)]
pub struct AmbariConfigBuilder {
    host: Option<String>,
    protocol: Option<String>,
    port: Option<u16>,
    credentials: Option<Credentials>,
    identifier: Option<Identifier>,
    request_timeout: Option<Duration>,
    validate_ssl: Option<bool>,
    user_agent_prefix: Option<String>,
}

impl AmbariConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the server host (required). May include protocol and port.
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Sets the protocol used when the host string does not carry one.
    #[must_use]
    pub fn protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = Some(protocol.into());
        self
    }

    /// Sets the port used when the host string does not carry one.
    #[must_use]
    pub const fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Sets basic authentication credentials.
    #[must_use]
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Sets the `X-Requested-By` identifier.
    #[must_use]
    pub fn identifier(mut self, identifier: Identifier) -> Self {
        self.identifier = Some(identifier);
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub const fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Sets whether TLS certificates are validated.
    #[must_use]
    pub const fn validate_ssl(mut self, validate: bool) -> Self {
        self.validate_ssl = Some(validate);
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Builds the [`AmbariConfig`], validating the server location.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `host` is not set, or
    /// any error produced by [`ServerUrl::parse`].
    pub fn build(self) -> Result<AmbariConfig, ConfigError> {
        let host = self
            .host
            .ok_or(ConfigError::MissingRequiredField { field: "host" })?;
        let server_url = ServerUrl::parse(&host, self.protocol.as_deref(), self.port)?;

        Ok(AmbariConfig {
            server_url,
            credentials: self.credentials,
            identifier: self.identifier.unwrap_or_default(),
            request_timeout: self.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT),
            validate_ssl: self.validate_ssl.unwrap_or(true),
            user_agent_prefix: self.user_agent_prefix,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_requires_host() {
        let result = AmbariConfigBuilder::new().build();

        assert!(matches!(
            result,
            Err(ConfigError::MissingRequiredField { field: "host" })
        ));
    }

    #[test]
    fn test_builder_provides_sensible_defaults() {
        let config = AmbariConfig::builder()
            .host("ambari.local")
            .build()
            .unwrap();

        assert_eq!(config.server_url().as_ref(), "http://ambari.local:80");
        assert_eq!(config.identifier().as_ref(), "ambari-api-rust");
        assert_eq!(config.request_timeout(), DEFAULT_REQUEST_TIMEOUT);
        assert!(config.validate_ssl());
        assert!(config.credentials().is_none());
        assert!(config.user_agent_prefix().is_none());
    }

    #[test]
    fn test_builder_with_all_optional_fields() {
        let config = AmbariConfig::builder()
            .host("ambari.local")
            .protocol("https")
            .port(8443)
            .credentials(Credentials::new("admin", "admin").unwrap())
            .identifier(Identifier::new("provisioner").unwrap())
            .request_timeout(Duration::from_secs(30))
            .validate_ssl(false)
            .user_agent_prefix("Provisioner/2.1")
            .build()
            .unwrap();

        assert_eq!(config.server_url().as_ref(), "https://ambari.local:8443");
        assert_eq!(config.credentials().unwrap().username(), "admin");
        assert_eq!(config.identifier().as_ref(), "provisioner");
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert!(!config.validate_ssl());
        assert_eq!(config.user_agent_prefix(), Some("Provisioner/2.1"));
    }

    #[test]
    fn test_builder_propagates_host_errors() {
        let result = AmbariConfig::builder().host("ftp://ambari.local").build();
        assert!(matches!(
            result,
            Err(ConfigError::UnsupportedProtocol { .. })
        ));
    }

    #[test]
    fn test_config_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AmbariConfig>();
    }
}
