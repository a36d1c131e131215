//! Users, groups and privileges.

use crate::rest::kind::{Capabilities, Relationship, ResourceKind};

/// `users/{user_name}`
pub static USER: ResourceKind = ResourceKind {
    name: "User",
    path: "users",
    data_key: Some("Users"),
    primary_key: "user_name",
    fields: &[
        "user_name",
        "active",
        "admin",
        "groups",
        "ldap_user",
        "password",
        "old_password",
    ],
    relationships: &[Relationship {
        name: "privileges",
        kind: &USER_PRIVILEGE,
    }],
    capabilities: Capabilities::ALL,
    operation: None,
    readiness: None,
    wait: ResourceKind::DEFAULT_WAIT,
};

/// `users/{user_name}/privileges/{privilege_id}` and
/// `clusters/{cluster_name}/privileges/{privilege_id}`
///
/// Privilege ids are assigned by the server.
pub static USER_PRIVILEGE: ResourceKind = ResourceKind {
    name: "Privilege",
    path: "privileges",
    data_key: Some("PrivilegeInfo"),
    primary_key: "privilege_id",
    fields: &[
        "privilege_id",
        "permission_name",
        "principal_name",
        "principal_type",
        "type",
        "user_name",
        "cluster_name",
    ],
    relationships: &[],
    capabilities: Capabilities::ALL,
    operation: None,
    readiness: None,
    wait: ResourceKind::DEFAULT_WAIT,
};

/// `groups/{group_name}`
pub static GROUP: ResourceKind = ResourceKind {
    name: "Group",
    path: "groups",
    data_key: Some("Groups"),
    primary_key: "group_name",
    fields: &["group_name", "ldap_group"],
    relationships: &[Relationship {
        name: "members",
        kind: &GROUP_MEMBER,
    }],
    capabilities: Capabilities::ALL,
    operation: None,
    readiness: None,
    wait: ResourceKind::DEFAULT_WAIT,
};

/// `groups/{group_name}/members/{user_name}`
pub static GROUP_MEMBER: ResourceKind = ResourceKind {
    name: "GroupMember",
    path: "members",
    data_key: Some("MemberInfo"),
    primary_key: "user_name",
    fields: &["user_name", "group_name"],
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
