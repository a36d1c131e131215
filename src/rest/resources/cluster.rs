//! Clusters and the resources scoped under them.

use std::time::Duration;

use serde_json::{Map, Value};

use crate::rest::kind::{Capabilities, Relationship, ResourceKind};
use crate::rest::poller::WaitOptions;
use crate::rest::resources::{REQUEST, USER_PRIVILEGE};

/// Host registration is quick; give up early.
pub(crate) const HOST_WAIT: WaitOptions = WaitOptions::new(Duration::from_secs(180), Duration::from_secs(5));

/// A host is settled once its agent reports healthy, or once it is in
/// maintenance and no longer reporting at all.
pub(crate) fn host_is_registered(attributes: &Map<String, Value>) -> bool {
    let field = |name: &str| attributes.get(name).and_then(Value::as_str);
    match (field("host_status"), field("maintenance_state")) {
        (Some("HEALTHY"), _) => true,
        (Some("UNKNOWN"), Some("ON")) => true,
        _ => false,
    }
}

pub(crate) const HOST_FIELDS: &[&str] = &[
    "host_name",
    "cluster_name",
    "cpu_count",
    "ph_cpu_count",
    "os_arch",
    "os_type",
    "disk_info",
    "total_mem",
    "host_state",
    "host_status",
    "host_health_report",
    "ip",
    "rack_info",
    "public_host_name",
    "last_agent_env",
    "last_heartbeat_time",
    "last_registration_time",
    "maintenance_state",
    "desired_configs",
];

/// `clusters/{cluster_name}`
pub static CLUSTER: ResourceKind = ResourceKind {
    name: "Cluster",
    path: "clusters",
    data_key: Some("Clusters"),
    primary_key: "cluster_name",
    fields: &[
        "cluster_id",
        "cluster_name",
        "health_report",
        "provisioning_state",
        "total_hosts",
        "version",
        "desired_configs",
        "desired_service_config_versions",
    ],
    relationships: &[
        Relationship {
            name: "alerts",
            kind: &ALERT,
        },
        Relationship {
            name: "alert_history",
            kind: &ALERT_HISTORY,
        },
        Relationship {
            name: "hosts",
            kind: &CLUSTER_HOST,
        },
        Relationship {
            name: "host_components",
            kind: &HOST_COMPONENT,
        },
        Relationship {
            name: "requests",
            kind: &REQUEST,
        },
        Relationship {
            name: "services",
            kind: &CLUSTER_SERVICE,
        },
        Relationship {
            name: "privileges",
            kind: &USER_PRIVILEGE,
        },
    ],
    capabilities: Capabilities::ALL,
    operation: None,
    readiness: None,
    wait: ResourceKind::DEFAULT_WAIT,
};

/// `clusters/{cluster_name}/hosts/{host_name}`
pub static CLUSTER_HOST: ResourceKind = ResourceKind {
    name: "ClusterHost",
    path: "hosts",
    data_key: Some("Hosts"),
    primary_key: "host_name",
    fields: HOST_FIELDS,
    relationships: &[
        Relationship {
            name: "alerts",
            kind: &ALERT,
        },
        Relationship {
            name: "alert_history",
            kind: &ALERT_HISTORY,
        },
        Relationship {
            name: "host_components",
            kind: &HOST_COMPONENT,
        },
    ],
    capabilities: Capabilities::ALL,
    operation: None,
    readiness: Some(host_is_registered),
    wait: HOST_WAIT,
};

/// `clusters/{cluster_name}/hosts/{host_name}/host_components/{component_name}`
pub static HOST_COMPONENT: ResourceKind = ResourceKind {
    name: "HostComponent",
    path: "host_components",
    data_key: Some("HostRoles"),
    primary_key: "component_name",
    fields: &[
        "cluster_name",
        "component_name",
        "desired_stack_id",
        "desired_state",
        "host_name",
        "maintenance_state",
        "service_name",
        "stack_id",
        "stale_configs",
        "state",
        "actual_configs",
        "desired_admin_state",
    ],
    relationships: &[],
    capabilities: Capabilities::ALL,
    operation: None,
    readiness: None,
    wait: ResourceKind::DEFAULT_WAIT,
};

/// `clusters/{cluster_name}/services/{service_name}`
pub static CLUSTER_SERVICE: ResourceKind = ResourceKind {
    name: "ClusterService",
    path: "services",
    data_key: Some("ServiceInfo"),
    primary_key: "service_name",
    fields: &["service_name", "cluster_name", "maintenance_state", "state"],
    relationships: &[
        Relationship {
            name: "alerts",
            kind: &ALERT,
        },
        Relationship {
            name: "alert_history",
            kind: &ALERT_HISTORY,
        },
        Relationship {
            name: "components",
            kind: &SERVICE_COMPONENT,
        },
    ],
    capabilities: Capabilities::ALL,
    operation: None,
    readiness: None,
    wait: ResourceKind::DEFAULT_WAIT,
};

/// `clusters/{cluster_name}/services/{service_name}/components/{component_name}`
pub static SERVICE_COMPONENT: ResourceKind = ResourceKind {
    name: "ServiceComponent",
    path: "components",
    data_key: Some("ServiceComponentInfo"),
    primary_key: "component_name",
    fields: &[
        "cluster_name",
        "component_name",
        "service_name",
        "category",
        "state",
        "installed_count",
        "started_count",
        "total_count",
    ],
    relationships: &[Relationship {
        name: "host_components",
        kind: &COMPONENT_HOST,
    }],
    capabilities: Capabilities::ALL,
    operation: None,
    readiness: None,
    wait: ResourceKind::DEFAULT_WAIT,
};

/// The placements of a service component, as embedded in the component:
/// one `HostRoles` item per host, keyed by host name.
pub static COMPONENT_HOST: ResourceKind = ResourceKind {
    name: "ComponentHost",
    path: "host_components",
    data_key: Some("HostRoles"),
    primary_key: "host_name",
    fields: &["cluster_name", "component_name", "host_name", "service_name", "state"],
    relationships: &[],
    capabilities: Capabilities {
        list: false,
        create: false,
        update: false,
        delete: false,
    },
    operation: None,
    readiness: None,
    wait: ResourceKind::DEFAULT_WAIT,
};

/// `clusters/{cluster_name}/alerts/{id}`
pub static ALERT: ResourceKind = ResourceKind {
    name: "ClusterAlert",
    path: "alerts",
    data_key: Some("Alert"),
    primary_key: "id",
    fields: &[
        "id",
        "cluster_name",
        "component_name",
        "definition_id",
        "definition_name",
        "host_name",
        "instance",
        "label",
        "latest_timestamp",
        "maintenance_state",
        "original_timestamp",
        "scope",
        "service_name",
        "state",
        "text",
    ],
    relationships: &[],
    capabilities: Capabilities::READ_ONLY,
    operation: None,
    readiness: None,
    wait: ResourceKind::DEFAULT_WAIT,
};

/// `clusters/{cluster_name}/alert_history/{id}`
pub static ALERT_HISTORY: ResourceKind = ResourceKind {
    name: "AlertHistory",
    path: "alert_history",
    data_key: Some("AlertHistory"),
    primary_key: "id",
    fields: &[
        "id",
        "cluster_name",
        "component_name",
        "definition_id",
        "definition_name",
        "host_name",
        "instance",
        "label",
        "service_name",
        "state",
        "text",
        "timestamp",
    ],
    relationships: &[],
    capabilities: Capabilities::READ_ONLY,
    operation: None,
    readiness: None,
    wait: ResourceKind::DEFAULT_WAIT,
};
