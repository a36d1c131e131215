//! Install, start, stop and restart commands for host components and
//! cluster services.
//!
//! Each command is a `PUT` of the desired state with a request context
//! that shows up in the server's operation list:
//!
//! ```json
//! {"RequestInfo": {"context": "Install Hbase Master"}, "HostRoles": {"state": "INSTALLED"}}
//! ```
//!
//! The same commands on a collection apply to every member at once:
//!
//! ```json
//! {"RequestInfo": {"context": "Start All Host Components"}, "Body": {"HostRoles": {"state": "STARTED"}}}
//! ```
//!
//! A restart is a `RESTART` command posted to the cluster's requests,
//! filtered down to the components and hosts concerned.

use serde_json::{json, Map, Value};

use crate::clients::HttpMethod;
use crate::rest::collection::Collection;
use crate::rest::errors::ResourceError;
use crate::rest::kind::ResourceKind;
use crate::rest::model::{Action, Model};
use crate::rest::resources::{CLUSTER_SERVICE, HOST_COMPONENT};

/// The key of the node a command is addressed to.
fn key_of(model: &Model) -> Result<String, ResourceError> {
    model.key().ok_or_else(|| ResourceError::IncompleteIdentity {
        segment: model.kind().path.to_string(),
    })
}

/// The name of the cluster a node lives in, taken from its identity.
fn cluster_of(model: &Model) -> Result<String, ResourceError> {
    model
        .identity()
        .segments()
        .iter()
        .find(|segment| segment.collection == "clusters")
        .and_then(|segment| segment.key.clone())
        .ok_or_else(|| ResourceError::IncompleteIdentity {
            segment: "clusters".to_string(),
        })
}

/// A lifecycle command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Command {
    Install,
    Start,
    Stop,
}

impl Command {
    const fn verb(self) -> &'static str {
        match self {
            Self::Install => "Install",
            Self::Start => "Start",
            Self::Stop => "Stop",
        }
    }

    const fn target_state(self) -> &'static str {
        match self {
            Self::Install | Self::Stop => "INSTALLED",
            Self::Start => "STARTED",
        }
    }
}

/// Turns an identifier such as `HBASE_MASTER` into `Hbase Master`.
///
/// The input is lower-cased, each underscore followed by a letter becomes a
/// space and an upper-case letter, and the first letter is capitalized.
///
/// # Example
///
/// ```rust
/// use ambari_api::rest::resources::normalize_underscore_case;
///
/// assert_eq!(normalize_underscore_case("HBASE_MASTER"), "Hbase Master");
/// assert_eq!(normalize_underscore_case("host_components"), "Host Components");
/// ```
#[must_use]
pub fn normalize_underscore_case(value: &str) -> String {
    let mut normalized = String::with_capacity(value.len());
    let mut chars = value.chars().flat_map(char::to_lowercase).peekable();

    while let Some(c) = chars.next() {
        match c {
            '_' if chars.peek().is_some_and(|next| next.is_alphabetic()) => {
                normalized.push(' ');
                normalized.extend(chars.next().into_iter().flat_map(char::to_uppercase));
            }
            c if normalized.is_empty() => normalized.extend(c.to_uppercase()),
            c => normalized.push(c),
        }
    }
    normalized
}

fn supports_lifecycle(kind: &ResourceKind) -> bool {
    *kind == HOST_COMPONENT || *kind == CLUSTER_SERVICE
}

/// `{<data key>: {"state": <state>}}`
fn desired_state(kind: &ResourceKind, command: Command) -> Value {
    let mut body = Map::new();
    body.insert(
        kind.data_key.unwrap_or(kind.path).to_string(),
        json!({"state": command.target_state()}),
    );
    Value::Object(body)
}

impl Model {
    /// Installs a host component or service.
    ///
    /// The context defaults to `"Install <Name>"`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnsupportedOperation`] for other kinds, or any
    /// error of [`invoke`](Self::invoke).
    pub async fn install(&self, context: Option<&str>) -> Result<&Self, ResourceError> {
        self.lifecycle(Command::Install, context).await
    }

    /// Starts a host component or service.
    ///
    /// # Errors
    ///
    /// Same as [`install`](Self::install).
    pub async fn start(&self, context: Option<&str>) -> Result<&Self, ResourceError> {
        self.lifecycle(Command::Start, context).await
    }

    /// Stops a host component or service.
    ///
    /// # Errors
    ///
    /// Same as [`install`](Self::install).
    pub async fn stop(&self, context: Option<&str>) -> Result<&Self, ResourceError> {
        self.lifecycle(Command::Stop, context).await
    }

    async fn lifecycle(&self, command: Command, context: Option<&str>) -> Result<&Self, ResourceError> {
        let kind = self.kind();
        if !supports_lifecycle(kind) {
            return Err(ResourceError::UnsupportedOperation {
                resource: kind.name,
                operation: "lifecycle commands",
            });
        }

        let context = context.map_or_else(
            || {
                let name = self.key().unwrap_or_default();
                format!("{} {}", command.verb(), normalize_underscore_case(&name))
            },
            ToString::to_string,
        );
        let mut payload = desired_state(kind, command);
        payload["RequestInfo"] = json!({"context": context});

        self.invoke(
            Action::custom(command.verb().to_ascii_lowercase(), HttpMethod::Put),
            Some(payload),
        )
        .await
    }
}

impl Model {
    /// Restarts a host component on its host, or every placed component of
    /// a cluster service.
    ///
    /// The request is posted to the cluster's `requests`; the started
    /// request becomes this node's pending operation. The context defaults
    /// to `"Restart <Component>"` for a host component. For a service, see
    /// [`restart_components`](Self::restart_components).
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnsupportedOperation`] for other kinds, or any
    /// error of the attribute lookups and the `POST`.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let datanode = host.relationship("host_components")?.get("DATANODE");
    /// datanode.restart(None).await?.wait(None).await?;
    /// ```
    pub async fn restart(&self, context: Option<&str>) -> Result<&Self, ResourceError> {
        let kind = self.kind();
        if *kind == CLUSTER_SERVICE {
            return self.restart_components(None, context).await;
        }
        if *kind != HOST_COMPONENT {
            return Err(ResourceError::UnsupportedOperation {
                resource: kind.name,
                operation: "restart",
            });
        }

        let component = key_of(self)?;
        let service: String = self.attribute_as("service_name").await?;
        let host: String = self.attribute_as("host_name").await?;
        let context = context.map_or_else(
            || format!("Restart {}", normalize_underscore_case(&component)),
            ToString::to_string,
        );
        let filters = vec![json!({
            "service_name": service,
            "component_name": component,
            "hosts": host,
        })];
        self.request_restart(&service, &context, filters).await
    }

    /// Restarts the components of a cluster service on every host they are
    /// placed on.
    ///
    /// `component_names` narrows the restart; `None` restarts all listed
    /// components. Components without placements are skipped, and nothing
    /// is sent if none remain. The context defaults to
    /// `"Restart all components for <Service>"`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnsupportedOperation`] for kinds other than
    /// cluster services, or any error of the component lookups and the `POST`.
    pub async fn restart_components(
        &self,
        component_names: Option<&[&str]>,
        context: Option<&str>,
    ) -> Result<&Self, ResourceError> {
        let kind = self.kind();
        if *kind != CLUSTER_SERVICE {
            return Err(ResourceError::UnsupportedOperation {
                resource: kind.name,
                operation: "restart",
            });
        }

        let service = key_of(self)?;
        let components = self.relationship("components")?;
        let members: Vec<Model> = match component_names {
            Some(names) => names.iter().map(|name| components.get(name)).collect(),
            None => components.list().await?,
        };

        let mut filters = Vec::new();
        for component in members {
            component.inflate().await?;
            let hosts: Vec<String> = component
                .relationship("host_components")?
                .known()
                .iter()
                .filter_map(Model::key)
                .collect();
            if hosts.is_empty() {
                continue;
            }
            filters.push(json!({
                "service_name": service,
                "component_name": key_of(&component)?,
                "hosts": hosts.join(","),
            }));
        }
        if filters.is_empty() {
            tracing::debug!(service = %service, "no placed components to restart");
            return Ok(self);
        }

        let context = context.map_or_else(
            || format!("Restart all components for {}", normalize_underscore_case(&service)),
            ToString::to_string,
        );
        self.request_restart(&service, &context, filters).await
    }

    async fn request_restart(
        &self,
        service: &str,
        context: &str,
        filters: Vec<Value>,
    ) -> Result<&Self, ResourceError> {
        let cluster = cluster_of(self)?;
        let payload = json!({
            "RequestInfo": {
                "command": "RESTART",
                "context": context,
                "operation_level": {
                    "level": "SERVICE",
                    "cluster_name": cluster,
                    "service_name": service,
                },
            },
            "Requests/resource_filters": filters,
        });
        self.submit(
            "restart",
            HttpMethod::Post,
            &format!("clusters/{cluster}/requests"),
            payload,
        )
        .await
    }
}

impl Collection {
    /// Installs every member.
    ///
    /// The context defaults to `"Install All <Kind>"`, e.g.
    /// `"Install All Host Components"`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnsupportedOperation`] for other kinds, or any
    /// error of [`invoke`](Self::invoke).
    pub async fn install(&self, context: Option<&str>) -> Result<&Self, ResourceError> {
        self.lifecycle(Command::Install, context).await
    }

    /// Starts every member.
    ///
    /// # Errors
    ///
    /// Same as [`install`](Self::install).
    pub async fn start(&self, context: Option<&str>) -> Result<&Self, ResourceError> {
        self.lifecycle(Command::Start, context).await
    }

    /// Stops every member.
    ///
    /// # Errors
    ///
    /// Same as [`install`](Self::install).
    pub async fn stop(&self, context: Option<&str>) -> Result<&Self, ResourceError> {
        self.lifecycle(Command::Stop, context).await
    }

    async fn lifecycle(&self, command: Command, context: Option<&str>) -> Result<&Self, ResourceError> {
        let kind = self.kind();
        if !supports_lifecycle(kind) {
            return Err(ResourceError::UnsupportedOperation {
                resource: kind.name,
                operation: "lifecycle commands",
            });
        }

        let context = context.map_or_else(
            || format!("{} All {}", command.verb(), normalize_underscore_case(kind.path)),
            ToString::to_string,
        );
        let payload = json!({
            "RequestInfo": {"context": context},
            "Body": desired_state(kind, command),
        });
        self.invoke(HttpMethod::Put, payload).await
    }
}
