//! The catalog of Ambari entity kinds.
//!
//! Each kind is a `'static` [`ResourceKind`](crate::rest::ResourceKind)
//! value. Kinds reference their child kinds through relationships, so the
//! whole API tree is reachable from the top-level kinds:
//!
//! ```text
//! clusters
//!   hosts
//!     host_components
//!   services
//!     components
//!       host_components
//!   requests
//!     tasks
//!   alerts, alert_history, privileges
//! hosts
//! users
//!   privileges
//! groups
//!   members
//! stacks
//!   versions
//!     services
//!       components
//! blueprints
//! actions
//! services (server-level)
//!   components
//! bootstrap
//! ```
//!
//! # Lifecycle Commands
//!
//! Host components and cluster services additionally support
//! `install`, `start` and `stop`, both on a single [`Model`](crate::rest::Model)
//! and on a whole [`Collection`](crate::rest::Collection), as well as
//! `restart` on a single node. Hosts can be put into maintenance mode,
//! clusters run custom actions with `execute_action`, and a cluster's
//! hosts collection adds hosts in bulk with `create_many`.
//!
//! ```rust,ignore
//! let host = ambari.clusters().get("c1").relationship("hosts")?.get("h1");
//! let components = host.relationship("host_components")?;
//!
//! components.install(None).await?.wait(None).await?;
//! components.get("DATANODE").start(None).await?.wait(None).await?;
//! ```

mod bootstrap;
mod cluster;
mod commands;
mod host;
mod lifecycle;
mod request;
mod service;
mod stack;
mod user;

pub use bootstrap::{BootstrapRequest, BOOTSTRAP};
pub use cluster::{
    ALERT, ALERT_HISTORY, CLUSTER, CLUSTER_HOST, CLUSTER_SERVICE, COMPONENT_HOST, HOST_COMPONENT,
    SERVICE_COMPONENT,
};
pub use commands::HostAssignment;
pub use host::HOST;
pub use lifecycle::normalize_underscore_case;
pub use request::{REQUEST, TASK};
pub use service::{ACTION, ROOT_SERVICE, ROOT_SERVICE_COMPONENT};
pub use stack::{BLUEPRINT, STACK, STACK_SERVICE, STACK_SERVICE_COMPONENT, STACK_VERSION};
pub use user::{GROUP, GROUP_MEMBER, USER, USER_PRIVILEGE};
