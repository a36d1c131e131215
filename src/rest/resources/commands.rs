//! Host maintenance, custom actions and bulk host assignment.
//!
//! # Example
//!
//! ```rust,ignore
//! use ambari_api::rest::resources::HostAssignment;
//!
//! let cluster = ambari.clusters().get("c1");
//! cluster
//!     .relationship("hosts")?
//!     .create_many(&[HostAssignment::new("h2.example.com", "workers", "bp")])
//!     .await?
//!     .wait(None)
//!     .await?;
//!
//! cluster
//!     .execute_action("check_host", "Check hosts", None, Some("h2.example.com"))
//!     .await?
//!     .wait(None)
//!     .await?;
//! ```

use serde_json::{json, Value};

use crate::clients::HttpMethod;
use crate::rest::collection::Collection;
use crate::rest::errors::ResourceError;
use crate::rest::model::{Action, Model};
use crate::rest::resources::{CLUSTER, CLUSTER_HOST, HOST};

/// Places a registered host into a host group of a blueprint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostAssignment {
    /// The registered host.
    pub host_name: String,
    /// The host group it joins.
    pub host_group: String,
    /// The blueprint that defines the host group.
    pub blueprint: String,
}

impl HostAssignment {
    /// Creates an assignment.
    #[must_use]
    pub fn new(
        host_name: impl Into<String>,
        host_group: impl Into<String>,
        blueprint: impl Into<String>,
    ) -> Self {
        Self {
            host_name: host_name.into(),
            host_group: host_group.into(),
            blueprint: blueprint.into(),
        }
    }

    fn to_payload(&self) -> Value {
        json!({
            "host_name": self.host_name,
            "host_group": self.host_group,
            "blueprint": self.blueprint,
        })
    }
}

impl Model {
    /// Puts every component of a host into maintenance mode.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnsupportedOperation`] for kinds other than
    /// hosts, or any error of the `PUT`.
    pub async fn enable_maintenance(&self) -> Result<&Self, ResourceError> {
        self.maintenance(true).await
    }

    /// Takes a host out of maintenance mode.
    ///
    /// # Errors
    ///
    /// Same as [`enable_maintenance`](Self::enable_maintenance).
    pub async fn disable_maintenance(&self) -> Result<&Self, ResourceError> {
        self.maintenance(false).await
    }

    async fn maintenance(&self, enable: bool) -> Result<&Self, ResourceError> {
        let kind = self.kind();
        if *kind != HOST && *kind != CLUSTER_HOST {
            return Err(ResourceError::UnsupportedOperation {
                resource: kind.name,
                operation: "maintenance mode",
            });
        }
        let host = self.key().ok_or_else(|| ResourceError::IncompleteIdentity {
            segment: kind.path.to_string(),
        })?;

        let (name, context, state) = if enable {
            ("enable maintenance", "Start Maintenance Mode", "ON")
        } else {
            ("disable maintenance", "Stop Maintenance Mode", "OFF")
        };
        let payload = json!({
            "RequestInfo": {
                "context": context,
                "query": format!("Hosts/host_name.in({host})"),
            },
            "Body": {"Hosts": {"maintenance_state": state}},
        });
        self.invoke(Action::custom(name, HttpMethod::Put), Some(payload))
            .await?;
        // The server usually answers without a body.
        self.invalidate();
        Ok(self)
    }

    /// Runs a custom action on hosts of a cluster.
    ///
    /// `parameters` are handed to the action's script; `hosts` is a
    /// comma-separated host list. The started request becomes the
    /// cluster's pending operation.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnsupportedOperation`] for kinds other than
    /// clusters, or any error of the `POST`.
    pub async fn execute_action(
        &self,
        action: &str,
        context: &str,
        parameters: Option<Value>,
        hosts: Option<&str>,
    ) -> Result<&Self, ResourceError> {
        let kind = self.kind();
        if *kind != CLUSTER {
            return Err(ResourceError::UnsupportedOperation {
                resource: kind.name,
                operation: "custom actions",
            });
        }

        let payload = json!({
            "RequestInfo": {
                "action": action,
                "context": context,
                "parameters": parameters,
            },
            "Requests/resource_filters": [{"hosts": hosts}],
        });
        let path = format!("{}/requests", self.path()?);
        self.submit("execute action", HttpMethod::Post, &path, payload)
            .await
    }
}

impl Collection {
    /// Adds several registered hosts to a cluster in one request.
    ///
    /// The started request becomes the collection's pending operation, and
    /// the members are re-listed. A following [`wait`](Self::wait) settles
    /// the request and then waits for every host.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnsupportedOperation`] for collections other
    /// than a cluster's hosts, or any error of the `POST` and the listing.
    pub async fn create_many(&self, hosts: &[HostAssignment]) -> Result<&Self, ResourceError> {
        let kind = self.kind();
        if *kind != CLUSTER_HOST {
            return Err(ResourceError::UnsupportedOperation {
                resource: kind.name,
                operation: "bulk host assignment",
            });
        }

        let payload = Value::Array(hosts.iter().map(HostAssignment::to_payload).collect());
        self.invoke(HttpMethod::Post, payload).await?;
        self.refresh().await?;
        Ok(self)
    }
}
