//! Hosts registered with the server, independent of any cluster.
//!
//! Waiting on a host polls it until it reports healthy.

use crate::rest::kind::{Capabilities, ResourceKind};
use crate::rest::resources::cluster::{host_is_registered, HOST_FIELDS, HOST_WAIT};

/// `hosts/{host_name}`
pub static HOST: ResourceKind = ResourceKind {
    name: "Host",
    path: "hosts",
    data_key: Some("Hosts"),
    primary_key: "host_name",
    fields: HOST_FIELDS,
    relationships: &[],
    capabilities: Capabilities::ALL,
    operation: None,
    readiness: Some(host_is_registered),
    wait: HOST_WAIT,
};
