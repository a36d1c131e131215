//! Host bootstrap requests.
//!
//! Bootstrapping installs the agent on new hosts over SSH. The endpoint
//! cannot be listed, answers in its own flat vocabulary and is polled at
//! `bootstrap/{requestId}`.
//!
//! # Example
//!
//! ```rust,ignore
//! use ambari_api::rest::resources::BootstrapRequest;
//!
//! let request = BootstrapRequest::new(vec!["h1.example.com".into()], ssh_key);
//! let bootstrap = ambari.bootstrap().create(None, request.to_payload()?).await?;
//! bootstrap.wait(None).await?;
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::rest::kind::{Capabilities, ResourceKind};
use crate::rest::operation::OperationStyle;

/// `bootstrap/{requestId}`
pub static BOOTSTRAP: ResourceKind = ResourceKind {
    name: "Bootstrap",
    path: "bootstrap",
    data_key: None,
    primary_key: "requestId",
    fields: &["status", "requestId", "message", "hostsStatus", "log"],
    relationships: &[],
    capabilities: Capabilities {
        list: false,
        create: true,
        update: false,
        delete: false,
    },
    operation: Some(OperationStyle::Bootstrap),
    readiness: None,
    wait: ResourceKind::DEFAULT_WAIT,
};

fn default_user() -> String {
    "root".to_string()
}

const fn default_verbose() -> bool {
    true
}

/// Payload for a bootstrap creation.
///
/// `user` and `user_run_as` default to `root`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BootstrapRequest {
    /// Host names to bootstrap.
    pub hosts: Vec<String>,
    /// Private SSH key used to reach the hosts.
    pub ssh_key: String,
    /// SSH login user.
    #[serde(default = "default_user")]
    pub user: String,
    /// User the agent runs as.
    #[serde(default = "default_user")]
    pub user_run_as: String,
    /// Ask the server for a verbose log.
    #[serde(default = "default_verbose")]
    pub verbose: bool,
}

impl BootstrapRequest {
    /// Creates a request with the default users.
    #[must_use]
    pub fn new(hosts: Vec<String>, ssh_key: impl Into<String>) -> Self {
        Self {
            hosts,
            ssh_key: ssh_key.into(),
            user: default_user(),
            user_run_as: default_user(),
            verbose: default_verbose(),
        }
    }

    /// Sets the SSH login user.
    #[must_use]
    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }

    /// Sets the user the agent runs as.
    #[must_use]
    pub fn user_run_as(mut self, user: impl Into<String>) -> Self {
        self.user_run_as = user.into();
        self
    }

    /// Renders the JSON payload.
    ///
    /// # Errors
    ///
    /// Returns a serialization error, which cannot happen for this type in
    /// practice.
    pub fn to_payload(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}
