//! Validated newtype wrappers for configuration values.
//!
//! This module provides type-safe wrappers around string values that validate
//! their contents on construction. Invalid values are rejected with clear error messages.

use crate::error::ConfigError;
use std::fmt;

/// Default ports for the supported protocols.
const DEFAULT_HTTP_PORT: u16 = 80;
const DEFAULT_HTTPS_PORT: u16 = 443;

/// A validated Ambari server base URL.
///
/// The base URL is always normalized to `protocol://host:port`. Anything after
/// the authority (a path, a trailing slash) is discarded, because the client
/// appends the API root itself.
///
/// # Resolution Rules
///
/// - A protocol embedded in the host string wins over the `protocol` argument,
///   which wins over the `http` default.
/// - A port embedded in the host string wins over the `port` argument, which
///   wins over the protocol's default port (80 or 443).
///
/// # Example
///
/// ```rust
/// use ambari_api::ServerUrl;
///
/// let url = ServerUrl::parse("ambari.example.com", Some("https"), None).unwrap();
/// assert_eq!(url.as_ref(), "https://ambari.example.com:443");
///
/// let url = ServerUrl::parse("http://ambari.example.com:8080/some/path", None, None).unwrap();
/// assert_eq!(url.as_ref(), "http://ambari.example.com:8080");
/// assert_eq!(url.port(), 8080);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerUrl {
    protocol: String,
    host_name: String,
    port: u16,
    url: String,
}

impl ServerUrl {
    /// Parses and normalizes a server location.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidHost`] if no host name can be extracted,
    /// [`ConfigError::UnsupportedProtocol`] for anything other than `http` or
    /// `https`, and [`ConfigError::InvalidPort`] for a non-numeric port.
    pub fn parse(
        host: &str,
        protocol: Option<&str>,
        port: Option<u16>,
    ) -> Result<Self, ConfigError> {
        let invalid_host = || ConfigError::InvalidHost {
            host: host.to_string(),
        };

        let (derived_protocol, rest) = match host.split_once("://") {
            Some((scheme, rest)) if !scheme.is_empty() && !scheme.contains(':') => {
                (Some(scheme), rest)
            }
            Some(_) => return Err(invalid_host()),
            None => (None, host),
        };

        let authority = rest.split('/').next().unwrap_or_default();
        let (host_name, derived_port) = match authority.split_once(':') {
            Some((name, port)) => (name, Some(port)),
            None => (authority, None),
        };
        if host_name.is_empty() {
            return Err(invalid_host());
        }

        let protocol = derived_protocol.or(protocol).unwrap_or("http");
        let default_port = match protocol {
            "http" => DEFAULT_HTTP_PORT,
            "https" => DEFAULT_HTTPS_PORT,
            other => {
                return Err(ConfigError::UnsupportedProtocol {
                    protocol: other.to_string(),
                })
            }
        };

        let port = match derived_port {
            Some(raw) => raw
                .parse::<u16>()
                .ok()
                .filter(|p| *p != 0)
                .ok_or_else(|| ConfigError::InvalidPort {
                    port: raw.to_string(),
                })?,
            None => port.unwrap_or(default_port),
        };

        Ok(Self {
            url: format!("{protocol}://{host_name}:{port}"),
            protocol: protocol.to_string(),
            host_name: host_name.to_string(),
            port,
        })
    }

    /// Returns the protocol (`http` or `https`).
    #[must_use]
    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    /// Returns the host name without protocol or port.
    #[must_use]
    pub fn host_name(&self) -> &str {
        &self.host_name
    }

    /// Returns the resolved port.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }
}

impl AsRef<str> for ServerUrl {
    fn as_ref(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for ServerUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

/// The value sent in the `X-Requested-By` header.
///
/// Ambari rejects mutating requests that lack this header, so it must be
/// non-empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identifier(String);

impl Identifier {
    /// Creates a new validated identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyIdentifier`] if the value is empty.
    pub fn new(value: impl Into<String>) -> Result<Self, ConfigError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ConfigError::EmptyIdentifier);
        }
        Ok(Self(value))
    }
}

impl Default for Identifier {
    fn default() -> Self {
        Self("ambari-api-rust".to_string())
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Basic authentication credentials.
///
/// The `Debug` implementation masks the password.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Creates a new credential pair.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyUsername`] if the username is empty.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let username = username.into();
        if username.is_empty() {
            return Err(ConfigError::EmptyUsername);
        }
        Ok(Self {
            username,
            password: password.into(),
        })
    }

    /// Returns the username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the password.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"*****")
            .finish()
    }
}
