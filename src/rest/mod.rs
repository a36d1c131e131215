//! The lazy resource graph of the Ambari API.
//!
//! This module turns the hierarchical REST API into a graph of cached,
//! lazily loaded nodes:
//!
//! - **[`Model`]**: one entity; fetches itself on the first access to an
//!   attribute that is not cached
//! - **[`Collection`]**: the entities of one kind under one parent; hands out
//!   the same [`Model`] for the same key
//! - **[`EntityIdentifier`]** and [`resolve_path`]: identity chains and the
//!   request paths they map to
//! - **[`ResourceKind`]**: static per-kind descriptors, catalogued in [`resources`]
//! - **[`OperationDescriptor`]** and [`poll`]: server-side asynchronous requests
//! - **[`ResourceError`]**: semantic errors for all of the above
//!
//! # Overview
//!
//! Nothing is fetched until a value is needed. When a fetch happens, child
//! collections embedded in the response are hydrated as well, so walking
//! into them costs no further round trips.
//!
//! # Example
//!
//! ```rust,ignore
//! use ambari_api::{Ambari, AmbariConfig, Credentials};
//! use ambari_api::rest::WaitOptions;
//! use std::time::Duration;
//!
//! let config = AmbariConfig::builder()
//!     .host("ambari.example.com:8080")
//!     .credentials(Credentials::new("admin", "admin")?)
//!     .build()?;
//! let ambari = Ambari::new(&config)?;
//!
//! // Addressing costs nothing
//! let admin = ambari.users().get("admin");
//!
//! // One GET to users/admin; embedded privileges come along
//! println!("{}", admin.attribute("user_name").await?);
//! for privilege in admin.relationship("privileges")?.list().await? {
//!     println!("{:?}", privilege.cached("permission_name"));
//! }
//!
//! // Mutations that start a server-side request can be waited on
//! let component = ambari
//!     .clusters()
//!     .get("c1")
//!     .relationship("hosts")?
//!     .get("h1")
//!     .relationship("host_components")?
//!     .get("HBASE_MASTER");
//! component
//!     .install(None)
//!     .await?
//!     .wait(Some(WaitOptions::default().timeout(Duration::from_secs(600))))
//!     .await?;
//! ```

mod collection;
mod errors;
mod kind;
mod model;
mod operation;
mod path;
mod poller;
mod session;
mod wait;

pub mod resources;

// Public exports
pub use collection::Collection;
pub use errors::ResourceError;
pub use kind::{Capabilities, Relationship, ResourceKind};
pub use model::{Action, FetchState, Model};
pub use operation::{OperationDescriptor, OperationStatus, OperationStyle};
pub use path::{relative_path, resolve_path, EntityIdentifier, IdentitySegment};
pub use poller::{poll, WaitOptions, DEFAULT_POLL_INTERVAL, DEFAULT_POLL_TIMEOUT};
pub(crate) use session::Session;
