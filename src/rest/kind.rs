//! Static descriptors for the entity kinds of the Ambari API.
//!
//! A [`ResourceKind`] tells the generic [`Model`](crate::rest::Model) and
//! [`Collection`](crate::rest::Collection) everything that differs between
//! kinds: the URL segment, where attributes live in a response body, which
//! attribute is the key, which child collections may be embedded and what
//! the server lets you do with it.

use std::fmt;
use std::time::Duration;

use serde_json::{Map, Value};

use crate::rest::operation::OperationStyle;
use crate::rest::path::last_segment;
use crate::rest::poller::WaitOptions;

/// What the server allows on a kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Capabilities {
    /// `GET` on the collection path.
    pub list: bool,
    /// `POST` to create an entity.
    pub create: bool,
    /// `PUT` on the entity path.
    pub update: bool,
    /// `DELETE` on the entity path.
    pub delete: bool,
}

impl Capabilities {
    /// Everything allowed.
    pub const ALL: Self = Self {
        list: true,
        create: true,
        update: true,
        delete: true,
    };

    /// Listing and reading only.
    pub const READ_ONLY: Self = Self {
        list: true,
        create: false,
        update: false,
        delete: false,
    };
}

/// A named child collection of a kind.
#[derive(Clone, Copy)]
pub struct Relationship {
    /// Accessor name, also the key the children are embedded under.
    pub name: &'static str,
    /// The kind of the children.
    pub kind: &'static ResourceKind,
}

impl fmt::Debug for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Relationship")
            .field("name", &self.name)
            .field("kind", &self.kind.name)
            .finish()
    }
}

/// Descriptor of one entity kind.
///
/// Kinds are `'static` values that reference each other through their
/// relationships; see [`resources`](crate::rest::resources) for the catalog.
pub struct ResourceKind {
    /// Human readable name used in errors and logs (e.g., `"Cluster"`).
    pub name: &'static str,
    /// Collection path segment (e.g., `"clusters"`).
    pub path: &'static str,
    /// Response key attributes are nested under, if any (e.g., `"Clusters"`).
    pub data_key: Option<&'static str>,
    /// Attribute that holds the key.
    pub primary_key: &'static str,
    /// Recognized attribute names, nested under `data_key` in payloads.
    pub fields: &'static [&'static str],
    /// Child collections.
    pub relationships: &'static [Relationship],
    /// Allowed operations.
    pub capabilities: Capabilities,
    /// Set when entities of this kind are themselves asynchronous operations.
    pub operation: Option<OperationStyle>,
    /// Set when an entity is only settled once its attributes say so;
    /// `wait` keeps refreshing until this returns `true`.
    pub readiness: Option<fn(&Map<String, Value>) -> bool>,
    /// Wait policy used by [`Model::default_wait_options`](crate::rest::Model::default_wait_options).
    pub wait: WaitOptions,
}

impl ResourceKind {
    /// Wait policy for kinds without their own.
    pub const DEFAULT_WAIT: WaitOptions =
        WaitOptions::new(Duration::from_secs(3600), Duration::from_secs(15));

    /// Looks up a relationship by name.
    #[must_use]
    pub fn relationship(&self, name: &str) -> Option<&Relationship> {
        self.relationships.iter().find(|r| r.name == name)
    }

    /// Returns `true` if `field` is a recognized attribute.
    #[must_use]
    pub fn is_field(&self, field: &str) -> bool {
        self.fields.contains(&field)
    }

    /// Builds a create or update payload.
    ///
    /// Recognized fields are nested under the data key; everything else stays
    /// at the top level. Kinds without a data key send the payload as is.
    /// With `drop_primary_key`, the key attribute is removed because it is
    /// already part of the path.
    ///
    /// # Example
    ///
    /// ```rust
    /// use ambari_api::rest::resources::USER;
    /// use serde_json::json;
    ///
    /// let input = USER.build_input(
    ///     &json!({"user_name": "bob", "password": "s3cret", "extra": 1}),
    ///     true,
    /// );
    /// assert_eq!(input, json!({"Users": {"password": "s3cret"}, "extra": 1}));
    /// ```
    #[must_use]
    pub fn build_input(&self, payload: &Value, drop_primary_key: bool) -> Value {
        let Some(source) = payload.as_object() else {
            return payload.clone();
        };

        let entries = source
            .iter()
            .filter(|(field, _)| !(drop_primary_key && field.as_str() == self.primary_key));

        let Some(data_key) = self.data_key else {
            return Value::Object(entries.map(|(k, v)| (k.clone(), v.clone())).collect());
        };

        let mut nested = Map::new();
        let mut top_level = Map::new();
        for (field, value) in entries {
            if field == data_key {
                if let Some(section) = value.as_object() {
                    nested.extend(section.iter().map(|(k, v)| (k.clone(), v.clone())));
                    continue;
                }
            }
            if self.is_field(field) {
                nested.insert(field.clone(), value.clone());
            } else {
                top_level.insert(field.clone(), value.clone());
            }
        }
        // Request-style payloads carry only top-level sections.
        if !nested.is_empty() || top_level.is_empty() {
            top_level.insert(data_key.to_string(), Value::Object(nested));
        }
        Value::Object(top_level)
    }

    /// Returns the attribute section of a response body or embedded item.
    ///
    /// For kinds without a data key, the whole object minus `href` and
    /// embedded relationships.
    #[must_use]
    pub fn attributes_of(&self, body: &Map<String, Value>) -> Option<Map<String, Value>> {
        match self.data_key {
            Some(key) => body.get(key).and_then(Value::as_object).cloned(),
            None => Some(
                body.iter()
                    .filter(|(k, _)| k.as_str() != "href" && self.relationship(k).is_none())
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect(),
            ),
        }
    }

    /// Extracts the key of an entity from a response body or embedded item.
    ///
    /// Looks at the primary key inside the attribute section, then at the top
    /// level, then at the last segment of `href`.
    #[must_use]
    pub fn key_of(&self, body: &Value) -> Option<String> {
        let from_section = self
            .data_key
            .and_then(|k| body.get(k))
            .and_then(|section| section.get(self.primary_key));
        let from_top = body.get(self.primary_key);

        from_section
            .or(from_top)
            .and_then(key_string)
            .or_else(|| {
                body.get("href")
                    .and_then(Value::as_str)
                    .and_then(last_segment)
            })
    }
}

impl PartialEq for ResourceKind {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for ResourceKind {}

impl fmt::Debug for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceKind")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("data_key", &self.data_key)
            .field("primary_key", &self.primary_key)
            .field("relationships", &self.relationships)
            .field("capabilities", &self.capabilities)
            .finish_non_exhaustive()
    }
}

fn key_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::resources::{BOOTSTRAP, CLUSTER, REQUEST, USER};
    use serde_json::json;

    #[test]
    fn test_build_input_nests_recognized_fields() {
        let input = CLUSTER.build_input(
            &json!({"cluster_name": "c1", "version": "HDP-2.6", "blueprint": "bp", "host_groups": []}),
            true,
        );
        assert_eq!(
            input,
            json!({"Clusters": {"version": "HDP-2.6"}, "blueprint": "bp", "host_groups": []})
        );
    }

    #[test]
    fn test_build_input_keeps_primary_key_when_asked() {
        let input = USER.build_input(&json!({"user_name": "bob", "active": false}), false);
        assert_eq!(input, json!({"Users": {"user_name": "bob", "active": false}}));
    }

    #[test]
    fn test_build_input_merges_explicit_data_key_section() {
        let input = USER.build_input(&json!({"Users": {"admin": true}, "active": true}), true);
        assert_eq!(input, json!({"Users": {"admin": true, "active": true}}));
    }

    #[test]
    fn test_build_input_without_data_key_is_verbatim() {
        let payload = json!({"hosts": ["h1"], "sshKey": "KEY", "verbose": true});
        assert_eq!(BOOTSTRAP.build_input(&payload, true), payload);
    }

    #[test]
    fn test_build_input_for_requests_keeps_request_info_top_level() {
        let input = REQUEST.build_input(
            &json!({"RequestInfo": {"command": "RESTART"}, "Requests/resource_filters": []}),
            true,
        );
        assert_eq!(
            input,
            json!({"RequestInfo": {"command": "RESTART"}, "Requests/resource_filters": []})
        );
    }

    #[test]
    fn test_key_of_prefers_section_then_top_then_href() {
        assert_eq!(
            USER.key_of(&json!({"Users": {"user_name": "admin"}})),
            Some("admin".to_string())
        );
        assert_eq!(
            BOOTSTRAP.key_of(&json!({"status": "OK", "requestId": 3})),
            Some("3".to_string())
        );
        assert_eq!(
            USER.key_of(&json!({"href": "http://h/api/v1/users/bob"})),
            Some("bob".to_string())
        );
        assert_eq!(USER.key_of(&json!({})), None);
    }

    #[test]
    fn test_attributes_of_without_data_key_drops_href() {
        let body = json!({"href": "x", "status": "RUNNING", "log": "..."});
        let attributes = BOOTSTRAP.attributes_of(body.as_object().unwrap()).unwrap();
        assert_eq!(Value::Object(attributes), json!({"status": "RUNNING", "log": "..."}));
    }

    #[test]
    fn test_relationship_lookup_and_debug_do_not_recurse() {
        assert!(CLUSTER.relationship("hosts").is_some());
        assert!(CLUSTER.relationship("nope").is_none());
        let debug = format!("{CLUSTER:?}");
        assert!(debug.contains("Cluster"));
    }
}
