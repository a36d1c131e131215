//! Stack definitions and blueprints.

use crate::rest::kind::{Capabilities, Relationship, ResourceKind};

/// `stacks/{stack_name}`
pub static STACK: ResourceKind = ResourceKind {
    name: "Stack",
    path: "stacks",
    data_key: Some("Stacks"),
    primary_key: "stack_name",
    fields: &["stack_name"],
    relationships: &[Relationship {
        name: "versions",
        kind: &STACK_VERSION,
    }],
    capabilities: Capabilities::READ_ONLY,
    operation: None,
    readiness: None,
    wait: ResourceKind::DEFAULT_WAIT,
};

/// `stacks/{stack_name}/versions/{stack_version}`
pub static STACK_VERSION: ResourceKind = ResourceKind {
    name: "StackVersion",
    path: "versions",
    data_key: Some("Versions"),
    primary_key: "stack_version",
    fields: &[
        "stack_name",
        "stack_version",
        "active",
        "min_upgrade_version",
        "parent_stack_version",
        "config_types",
    ],
    relationships: &[Relationship {
        name: "services",
        kind: &STACK_SERVICE,
    }],
    capabilities: Capabilities::READ_ONLY,
    operation: None,
    readiness: None,
    wait: ResourceKind::DEFAULT_WAIT,
};

/// `stacks/{stack_name}/versions/{stack_version}/services/{service_name}`
pub static STACK_SERVICE: ResourceKind = ResourceKind {
    name: "StackService",
    path: "services",
    data_key: Some("StackServices"),
    primary_key: "service_name",
    fields: &[
        "service_name",
        "stack_name",
        "stack_version",
        "display_name",
        "comments",
        "custom_commands",
        "required_services",
        "service_check_supported",
        "service_version",
        "user_name",
        "config_types",
    ],
    relationships: &[Relationship {
        name: "components",
        kind: &STACK_SERVICE_COMPONENT,
    }],
    capabilities: Capabilities::READ_ONLY,
    operation: None,
    readiness: None,
    wait: ResourceKind::DEFAULT_WAIT,
};

/// `stacks/{stack_name}/versions/{stack_version}/services/{service_name}/components/{component_name}`
pub static STACK_SERVICE_COMPONENT: ResourceKind = ResourceKind {
    name: "StackServiceComponent",
    path: "components",
    data_key: Some("StackServiceComponents"),
    primary_key: "component_name",
    fields: &[
        "component_name",
        "service_name",
        "stack_name",
        "stack_version",
        "cardinality",
        "component_category",
        "custom_commands",
        "display_name",
        "is_client",
        "is_master",
    ],
    relationships: &[],
    capabilities: Capabilities::READ_ONLY,
    operation: None,
    readiness: None,
    wait: ResourceKind::DEFAULT_WAIT,
};

/// `blueprints/{blueprint_name}`
pub static BLUEPRINT: ResourceKind = ResourceKind {
    name: "Blueprint",
    path: "blueprints",
    data_key: Some("Blueprints"),
    primary_key: "blueprint_name",
    fields: &["blueprint_name", "stack_name", "stack_version"],
    relationships: &[],
    capabilities: Capabilities {
        list: true,
        create: true,
        update: false,
        delete: true,
    },
    operation: None,
    readiness: None,
    wait: ResourceKind::DEFAULT_WAIT,
};
