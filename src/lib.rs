//! # Ambari API Rust Client
//!
//! A Rust client for the Apache Ambari REST API. The API is exposed as a
//! lazily loaded resource graph: collections and models are addressed
//! for free, fetched on first use and cached for the lifetime of the
//! session.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe configuration via [`AmbariConfig`] and [`AmbariConfigBuilder`]
//! - Validated newtypes for the server URL, credentials and request identifier
//! - An async HTTP transport with basic authentication via [`clients`]
//! - The [`Ambari`] session root and its entry-point collections
//! - Lazy [`Model`](rest::Model) and [`Collection`](rest::Collection) nodes with
//!   embedding-aware hydration via [`rest`]
//! - Waiting on server-side asynchronous requests with bounded polling
//!
//! ## Quick Start
//!
//! ```rust
//! use ambari_api::{AmbariConfig, Credentials};
//!
//! // Create configuration using the builder pattern
//! let config = AmbariConfig::builder()
//!     .host("https://ambari.example.com:8443")
//!     .credentials(Credentials::new("admin", "admin").unwrap())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.server_url().port(), 8443);
//! ```
//!
//! ## Reading the Graph
//!
//! ```rust,ignore
//! use ambari_api::{Ambari, AmbariConfig, Credentials};
//!
//! let ambari = Ambari::new(&config)?;
//!
//! // No I/O: the node is only addressed
//! let cluster = ambari.clusters().get("c1");
//!
//! // One GET to clusters/c1
//! println!("version: {}", cluster.attribute("version").await?);
//!
//! // Hosts embedded in the cluster response are already known
//! for host in cluster.relationship("hosts")?.list().await? {
//!     println!("{:?}", host.key());
//! }
//! ```
//!
//! ## Waiting on Operations
//!
//! Mutations that start a server-side request record it as the node's
//! pending operation; `wait` polls it to completion.
//!
//! ```rust,ignore
//! use ambari_api::rest::WaitOptions;
//! use std::time::Duration;
//!
//! let component = host.relationship("host_components")?.get("DATANODE");
//! component
//!     .install(None)
//!     .await?
//!     .wait(Some(
//!         WaitOptions::default()
//!             .timeout(Duration::from_secs(60))
//!             .interval(Duration::from_secs(10)),
//!     ))
//!     .await?;
//! ```
//!
//! ## Testing Against a Fake Server
//!
//! Everything goes through the [`Transport`](clients::Transport) trait, so
//! [`Ambari::with_transport`] accepts any implementation.
//!
//! ## Design Principles
//!
//! - **No global state**: Configuration and caches are instance-based
//! - **Fail-fast validation**: All newtypes validate on construction
//! - **Thread-safe**: All types are `Send + Sync`
//! - **Async-first**: Designed for use with Tokio async runtime
//! - **No hidden retries**: Only the operation poller repeats requests

mod client;

pub mod clients;
pub mod config;
pub mod error;
pub mod rest;

// Re-export public types at crate root for convenience
pub use client::Ambari;
pub use config::{AmbariConfig, AmbariConfigBuilder, Credentials, Identifier, ServerUrl};
pub use error::ConfigError;

// Re-export HTTP client types
pub use clients::{
    HttpClient, HttpError, HttpMethod, HttpRequest, HttpRequestBuilder, HttpResponse,
    HttpResponseError, InvalidHttpRequestError, Transport,
};

// Re-export the resource graph types
pub use rest::{
    Collection, FetchState, Model, OperationDescriptor, OperationStatus, ResourceError,
    WaitOptions,
};
