//! Server-level services and custom action definitions.

use crate::rest::kind::{Capabilities, Relationship, ResourceKind};

/// `services/{service_name}`, e.g. `services/AMBARI`
pub static ROOT_SERVICE: ResourceKind = ResourceKind {
    name: "RootService",
    path: "services",
    data_key: Some("RootService"),
    primary_key: "service_name",
    fields: &["service_name"],
    relationships: &[Relationship {
        name: "components",
        kind: &ROOT_SERVICE_COMPONENT,
    }],
    capabilities: Capabilities::READ_ONLY,
    operation: None,
    readiness: None,
    wait: ResourceKind::DEFAULT_WAIT,
};

/// `services/{service_name}/components/{component_name}`
pub static ROOT_SERVICE_COMPONENT: ResourceKind = ResourceKind {
    name: "RootServiceComponent",
    path: "components",
    data_key: Some("RootServiceComponents"),
    primary_key: "component_name",
    fields: &[
        "component_name",
        "component_version",
        "server_clock",
        "service_name",
        "properties",
    ],
    relationships: &[],
    capabilities: Capabilities::READ_ONLY,
    operation: None,
    readiness: None,
    wait: ResourceKind::DEFAULT_WAIT,
};

/// `actions/{action_name}`
pub static ACTION: ResourceKind = ResourceKind {
    name: "Action",
    path: "actions",
    data_key: Some("Actions"),
    primary_key: "action_name",
    fields: &[
        "action_name",
        "action_type",
        "default_timeout",
        "description",
        "inputs",
        "target_component",
        "target_service",
        "target_type",
    ],
    relationships: &[],
    capabilities: Capabilities::ALL,
    operation: None,
    readiness: None,
    wait: ResourceKind::DEFAULT_WAIT,
};
