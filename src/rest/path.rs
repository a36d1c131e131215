//! Entity identity and path resolution.
//!
//! Every entity in the Ambari API lives at a path built from the collection
//! segments and keys that lead to it from the API root, e.g.
//! `clusters/c1/hosts/h1/host_components/DATANODE`. An [`EntityIdentifier`]
//! stores exactly that chain, and [`resolve_path`] turns it into the request
//! path.
//!
//! # Example
//!
//! ```rust
//! use ambari_api::rest::{resolve_path, EntityIdentifier};
//!
//! let host = EntityIdentifier::root()
//!     .child("clusters", Some("c1"))
//!     .child("hosts", Some("h1.example.com"));
//! assert_eq!(resolve_path(&host).unwrap(), "clusters/c1/hosts/h1.example.com");
//!
//! // A keyless terminal segment resolves to the collection path
//! let pending = EntityIdentifier::root()
//!     .child("clusters", Some("c1"))
//!     .child("requests", None::<String>);
//! assert_eq!(resolve_path(&pending).unwrap(), "clusters/c1/requests");
//! ```

use crate::clients::API_BASE_PATH;
use crate::rest::errors::ResourceError;

/// One step of an [`EntityIdentifier`]: a collection segment and, once
/// known, the key of the entity inside it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct IdentitySegment {
    /// The collection path segment (e.g., `"clusters"`).
    pub collection: &'static str,
    /// The entity key, absent while the server has not assigned one.
    pub key: Option<String>,
}

/// The ordered chain of (collection, key) pairs from the API root to an entity.
///
/// Two equal identifiers denote the same logical entity.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct EntityIdentifier {
    segments: Vec<IdentitySegment>,
}

impl EntityIdentifier {
    /// The identity of the API root (no segments).
    #[must_use]
    pub const fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Returns a new identifier with one more segment appended.
    #[must_use]
    pub fn child(&self, collection: &'static str, key: Option<impl Into<String>>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(IdentitySegment {
            collection,
            key: key.map(Into::into),
        });
        Self { segments }
    }

    /// Returns a copy whose terminal segment carries `key`.
    #[must_use]
    pub fn with_key(&self, key: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        if let Some(last) = segments.last_mut() {
            last.key = Some(key.into());
        }
        Self { segments }
    }

    /// Returns the segments from the root outwards.
    #[must_use]
    pub fn segments(&self) -> &[IdentitySegment] {
        &self.segments
    }

    /// Returns the key of the terminal segment.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.segments.last().and_then(|s| s.key.as_deref())
    }

    /// Returns `true` if every segment has a key.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.segments.iter().all(|s| s.key.is_some())
    }
}

/// Resolves an identity to its request path, relative to the API root.
///
/// Keys are percent-encoded. A keyless terminal segment resolves to the
/// collection path.
///
/// # Errors
///
/// Returns [`ResourceError::IncompleteIdentity`] if a non-terminal segment
/// has no key.
pub fn resolve_path(identity: &EntityIdentifier) -> Result<String, ResourceError> {
    let last = identity.segments.len().saturating_sub(1);
    let mut parts = Vec::with_capacity(identity.segments.len() * 2);

    for (index, segment) in identity.segments.iter().enumerate() {
        parts.push(segment.collection.to_string());
        match &segment.key {
            Some(key) => parts.push(urlencoding::encode(key).into_owned()),
            None if index == last => {}
            None => {
                return Err(ResourceError::IncompleteIdentity {
                    segment: segment.collection.to_string(),
                })
            }
        }
    }

    Ok(parts.join("/"))
}

/// Converts an absolute `href` returned by the server into a request path.
///
/// Returns `None` if the href does not point into the API root.
///
/// ```rust
/// use ambari_api::rest::relative_path;
///
/// assert_eq!(
///     relative_path("http://ambari:8080/api/v1/clusters/c1/requests/5?fields=*"),
///     Some("clusters/c1/requests/5".to_string())
/// );
/// assert_eq!(relative_path("http://ambari:8080/views"), None);
/// ```
#[must_use]
pub fn relative_path(href: &str) -> Option<String> {
    let marker = format!("{API_BASE_PATH}/");
    let start = href.find(&marker)? + marker.len();
    let path = &href[start..];
    let path = path.split(['?', '#']).next().unwrap_or_default();
    Some(path.trim_end_matches('/').to_string())
}

/// Returns the last path segment of an `href`, percent-decoded.
pub(crate) fn last_segment(href: &str) -> Option<String> {
    let path = href.split(['?', '#']).next()?.trim_end_matches('/');
    let segment = path.rsplit('/').next().filter(|s| !s.is_empty())?;
    urlencoding::decode(segment).ok().map(|s| s.into_owned())
}

/// Returns the `clusters/<name>/` prefix of a path, or an empty string.
pub(crate) fn cluster_prefix(path: &str) -> String {
    let mut parts = path.splitn(3, '/');
    match (parts.next(), parts.next()) {
        (Some("clusters"), Some(name)) if !name.is_empty() => format!("clusters/{name}/"),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cluster(name: &str) -> EntityIdentifier {
        EntityIdentifier::root().child("clusters", Some(name))
    }

    #[test]
    fn test_resolve_path_for_nested_identity() {
        let component = cluster("c1")
            .child("hosts", Some("h1"))
            .child("host_components", Some("DATANODE"));
        assert_eq!(
            resolve_path(&component).unwrap(),
            "clusters/c1/hosts/h1/host_components/DATANODE"
        );
    }

    #[test]
    fn test_resolve_path_for_root_is_empty() {
        assert_eq!(resolve_path(&EntityIdentifier::root()).unwrap(), "");
    }

    #[test]
    fn test_resolve_path_encodes_keys() {
        let user = EntityIdentifier::root().child("users", Some("jane doe/ops"));
        assert_eq!(resolve_path(&user).unwrap(), "users/jane%20doe%2Fops");
    }

    #[test]
    fn test_keyless_terminal_segment_resolves_to_collection() {
        let pending = cluster("c1").child("requests", None::<String>);
        assert_eq!(resolve_path(&pending).unwrap(), "clusters/c1/requests");
        assert!(!pending.is_complete());
        assert_eq!(pending.key(), None);
    }

    #[test]
    fn test_keyless_inner_segment_is_incomplete() {
        let orphan = EntityIdentifier::root()
            .child("requests", None::<String>)
            .child("tasks", Some("7"));
        assert!(matches!(
            resolve_path(&orphan),
            Err(ResourceError::IncompleteIdentity { segment }) if segment == "requests"
        ));
    }

    #[test]
    fn test_equal_chains_are_equal_identities() {
        let a = cluster("c1").child("services", Some("HDFS"));
        let b = cluster("c1").child("services", Some("HDFS"));
        assert_eq!(a, b);
        assert_ne!(a, cluster("c2").child("services", Some("HDFS")));
    }

    #[test]
    fn test_with_key_assigns_terminal_key() {
        let pending = cluster("c1").child("requests", None::<String>);
        let assigned = pending.with_key("5");
        assert_eq!(assigned.key(), Some("5"));
        assert!(assigned.is_complete());
        assert_eq!(resolve_path(&assigned).unwrap(), "clusters/c1/requests/5");
    }

    #[test]
    fn test_relative_path_strips_host_and_query() {
        assert_eq!(
            relative_path("http://h:8080/api/v1/users/admin/"),
            Some("users/admin".to_string())
        );
        assert_eq!(relative_path("users/admin"), None);
    }

    #[test]
    fn test_last_segment_decodes() {
        assert_eq!(
            last_segment("http://h/api/v1/users/jane%20doe"),
            Some("jane doe".to_string())
        );
        assert_eq!(last_segment(""), None);
    }

    #[test]
    fn test_cluster_prefix() {
        assert_eq!(cluster_prefix("clusters/c1/hosts/h1"), "clusters/c1/");
        assert_eq!(cluster_prefix("clusters/c1"), "clusters/c1/");
        assert_eq!(cluster_prefix("users/admin"), "");
    }
}
