//! Resource sets.
//!
//! A [`Collection`] is the set of entities of one kind under one parent,
//! e.g. the hosts of cluster `c1`. It owns the canonical [`Model`] for each
//! key it has seen:
//!
//! - [`get`](Collection::get) never performs I/O. It returns the known node
//!   for a key, creating an unloaded one if needed.
//! - [`list`](Collection::list) fetches the member references once; later
//!   calls are answered from memory.
//! - [`refresh`](Collection::refresh) re-lists unconditionally. Members are
//!   added or updated, never removed.
//!
//! # Example
//!
//! ```rust,ignore
//! let hosts = ambari.clusters().get("c1").relationship("hosts")?;
//!
//! // One GET to clusters/c1/hosts
//! for host in hosts.list().await? {
//!     println!("{:?}", host.key());
//! }
//!
//! // Same node as the one returned by the listing
//! let h1 = hosts.get("h1.example.com");
//! ```

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use indexmap::IndexMap;
use serde_json::Value;

use crate::clients::HttpMethod;
use crate::rest::errors::ResourceError;
use crate::rest::kind::ResourceKind;
use crate::rest::model::{dispatch, Model, Origin};
use crate::rest::operation::OperationDescriptor;
use crate::rest::path::{cluster_prefix, resolve_path, EntityIdentifier};
use crate::rest::session::Session;

/// The set of entities of one kind under one parent.
///
/// Cloning yields another handle to the same set.
#[derive(Clone)]
pub struct Collection {
    inner: Arc<CollectionInner>,
}

pub(crate) struct CollectionInner {
    session: Arc<Session>,
    kind: &'static ResourceKind,
    scope: EntityIdentifier,
    state: Mutex<CollectionState>,
    // Held for the duration of a listing or bulk command.
    io: tokio::sync::Mutex<()>,
}

#[derive(Default)]
struct CollectionState {
    known: IndexMap<String, Model>,
    listed: bool,
    pending_operation: Option<OperationDescriptor>,
}

impl Collection {
    /// Creates the collection of `kind` under the entity identified by `scope`.
    pub(crate) fn new(
        session: Arc<Session>,
        kind: &'static ResourceKind,
        scope: EntityIdentifier,
    ) -> Self {
        Self {
            inner: Arc::new(CollectionInner {
                session,
                kind,
                scope,
                state: Mutex::new(CollectionState::default()),
                io: tokio::sync::Mutex::new(()),
            }),
        }
    }

    pub(crate) const fn from_inner(inner: Arc<CollectionInner>) -> Self {
        Self { inner }
    }

    fn lock(&self) -> MutexGuard<'_, CollectionState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the kind of the members.
    #[must_use]
    pub fn kind(&self) -> &'static ResourceKind {
        self.inner.kind
    }

    /// Returns the identity of the collection: the parent chain plus a
    /// keyless segment for this collection.
    #[must_use]
    pub fn identity(&self) -> EntityIdentifier {
        self.inner.scope.child(self.inner.kind.path, None::<String>)
    }

    /// Returns the request path of the collection.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::IncompleteIdentity`] if an ancestor has no key.
    pub fn path(&self) -> Result<String, ResourceError> {
        resolve_path(&self.identity())
    }

    /// Returns the node for `key`, creating an unloaded one if needed.
    ///
    /// Never performs I/O. Asking twice for the same key returns the same
    /// node.
    #[must_use]
    pub fn get(&self, key: &str) -> Model {
        let mut state = self.lock();
        state
            .known
            .entry(key.to_string())
            .or_insert_with(|| self.new_member(Some(key)))
            .clone()
    }

    fn new_member(&self, key: Option<&str>) -> Model {
        Model::new(
            Arc::clone(&self.inner.session),
            self.inner.kind,
            self.inner.scope.child(self.inner.kind.path, key),
            Arc::downgrade(&self.inner),
        )
    }

    /// Returns the nodes known so far, in the order they became known.
    #[must_use]
    pub fn known(&self) -> Vec<Model> {
        self.lock().known.values().cloned().collect()
    }

    /// Returns `true` once the member set has been listed or embedded.
    #[must_use]
    pub fn is_listed(&self) -> bool {
        self.lock().listed
    }

    /// Returns the members, listing them on first use.
    ///
    /// # Errors
    ///
    /// - [`ResourceError::MethodNotAllowed`] if the kind cannot be listed
    /// - [`ResourceError::NotFound`], [`ResourceError::IncompleteIdentity`], [`ResourceError::Http`]
    pub async fn list(&self) -> Result<Vec<Model>, ResourceError> {
        if self.is_listed() {
            return Ok(self.known());
        }
        let _io = self.inner.io.lock().await;
        if !self.is_listed() {
            self.fetch_list().await?;
        }
        Ok(self.known())
    }

    /// Re-lists the members unconditionally.
    ///
    /// # Errors
    ///
    /// Same as [`list`](Self::list).
    pub async fn refresh(&self) -> Result<Vec<Model>, ResourceError> {
        let _io = self.inner.io.lock().await;
        self.fetch_list().await?;
        Ok(self.known())
    }

    async fn fetch_list(&self) -> Result<(), ResourceError> {
        let kind = self.inner.kind;
        let path = self.path()?;
        if !kind.capabilities.list {
            return Err(ResourceError::MethodNotAllowed {
                method: HttpMethod::Get,
                path,
            });
        }

        tracing::debug!(resource = kind.name, path = %path, "listing collection");
        let body = dispatch(
            self.inner.session.transport(),
            kind,
            HttpMethod::Get,
            &path,
            None,
        )
        .await?;

        let items = body
            .get("items")
            .and_then(Value::as_array)
            .ok_or_else(|| ResourceError::InvalidResponse {
                path: path.clone(),
                reason: "listing has no 'items' array".to_string(),
            })?;
        self.merge_items(items);
        Ok(())
    }

    /// Merges embedded items or list stubs into the member set.
    ///
    /// Existing nodes are reused; items without a recognizable key are
    /// skipped.
    pub(crate) fn merge_items(&self, items: &[Value]) {
        let kind = self.inner.kind;
        let mut members = Vec::with_capacity(items.len());
        {
            let mut state = self.lock();
            for item in items {
                let Some(key) = kind.key_of(item) else {
                    tracing::warn!(resource = kind.name, "skipping embedded item without a key");
                    continue;
                };
                let model = state
                    .known
                    .entry(key)
                    .or_insert_with_key(|key| self.new_member(Some(key.as_str())))
                    .clone();
                members.push((model, item));
            }
            state.listed = true;
        }

        for (model, item) in members {
            model.absorb(item, Origin::Embedded);
        }
    }

    /// Registers a node whose key the server just assigned.
    ///
    /// If a node for `key` is already known, it takes over the new node's
    /// state and is returned instead.
    pub(crate) fn adopt(&self, key: &str, model: &Model) -> Model {
        let existing = {
            let mut state = self.lock();
            match state.known.get(key) {
                Some(existing) => existing.clone(),
                None => {
                    state.known.insert(key.to_string(), model.clone());
                    return model.clone();
                }
            }
        };
        existing.merge_from(model);
        existing
    }

    pub(crate) fn remove(&self, key: &str) {
        self.lock().known.shift_remove(key);
    }

    /// Creates a member.
    ///
    /// With a key, the known node for that key posts to its own path. Without
    /// one, a new node posts to the collection path and is registered under
    /// the key the server assigns.
    ///
    /// # Errors
    ///
    /// Same as [`Model::create`].
    pub async fn create(&self, key: Option<&str>, payload: Value) -> Result<Model, ResourceError> {
        match key {
            Some(key) => self.get(key).create(payload).await,
            None => self.new_member(None).create(payload).await,
        }
    }

    /// Sends a bulk command to the collection path.
    ///
    /// The payload is sent as is. If the response describes an asynchronous
    /// request it becomes the collection's pending operation.
    ///
    /// # Errors
    ///
    /// - [`ResourceError::MethodNotAllowed`] if the server refuses the method
    /// - [`ResourceError::NotFound`], [`ResourceError::IncompleteIdentity`], [`ResourceError::Http`]
    pub async fn invoke(&self, method: HttpMethod, payload: Value) -> Result<&Self, ResourceError> {
        let kind = self.inner.kind;
        let path = self.path()?;
        let body = match method {
            HttpMethod::Get | HttpMethod::Delete => None,
            HttpMethod::Post | HttpMethod::Put => Some(payload),
        };

        let _io = self.inner.io.lock().await;
        tracing::debug!(resource = kind.name, method = %method, path = %path, "sending bulk command");
        let response = dispatch(self.inner.session.transport(), kind, method, &path, body).await?;

        if let Some(op) = OperationDescriptor::from_requests(&response, &cluster_prefix(&path)) {
            tracing::debug!(
                resource = kind.name,
                request_id = op.request_id,
                status = %op.status,
                "bulk command started an operation"
            );
            self.lock().pending_operation = Some(op);
        }
        Ok(self)
    }

    /// Returns the operation started by the last bulk command, until settled.
    #[must_use]
    pub fn pending_operation(&self) -> Option<OperationDescriptor> {
        self.lock().pending_operation.clone()
    }

    pub(crate) fn set_pending_operation(&self, op: Option<OperationDescriptor>) {
        self.lock().pending_operation = op;
    }

    pub(crate) fn session(&self) -> &Arc<Session> {
        &self.inner.session
    }
}

impl fmt::Debug for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("Collection")
            .field("kind", &self.inner.kind.name)
            .field("scope", &self.inner.scope)
            .field("known", &state.known.len())
            .field("listed", &state.listed)
            .finish_non_exhaustive()
    }
}

// Verify Collection is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Collection>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::Transport;
    use crate::rest::resources::{BOOTSTRAP, CLUSTER, USER};
    use serde_json::json;

    #[derive(Debug)]
    struct Unreachable;

    impl Transport for Unreachable {
        fn execute(&self, request: crate::clients::HttpRequest) -> crate::clients::TransportFuture<'_> {
            panic!("unexpected request to {}", request.path)
        }
    }

    fn users() -> Collection {
        Collection::new(Session::new(Arc::new(Unreachable)), &USER, EntityIdentifier::root())
    }

    #[test]
    fn test_get_returns_same_node_without_io() {
        let users = users();
        let first = users.get("admin");
        let second = users.get("admin");
        assert!(first.ptr_eq(&second));
        assert_eq!(first.path().unwrap(), "users/admin");
        assert_eq!(users.known().len(), 1);
        assert!(!users.is_listed());
    }

    #[test]
    fn test_merge_items_reuses_known_nodes() {
        let users = users();
        let admin = users.get("admin");
        users.merge_items(&[
            json!({"href": "http://h/api/v1/users/admin", "Users": {"user_name": "admin"}}),
            json!({"href": "http://h/api/v1/users/bob", "Users": {"user_name": "bob"}}),
            json!({"bogus": true}),
        ]);

        let known = users.known();
        assert_eq!(known.len(), 2);
        assert!(known[0].ptr_eq(&admin));
        assert_eq!(admin.cached("user_name"), Some(json!("admin")));
        assert!(users.is_listed());
    }

    #[test]
    fn test_collection_path_under_parent() {
        let hosts = Collection::new(
            Session::new(Arc::new(Unreachable)),
            CLUSTER.relationship("hosts").unwrap().kind,
            EntityIdentifier::root().child("clusters", Some("c1")),
        );
        assert_eq!(hosts.path().unwrap(), "clusters/c1/hosts");
        assert_eq!(hosts.get("h1").path().unwrap(), "clusters/c1/hosts/h1");
    }

    #[tokio::test]
    async fn test_unlistable_kind_fails_locally() {
        let bootstrap = Collection::new(Session::new(Arc::new(Unreachable)), &BOOTSTRAP, EntityIdentifier::root());
        let error = bootstrap.list().await.unwrap_err();
        assert!(matches!(
            error,
            ResourceError::MethodNotAllowed { method: HttpMethod::Get, ref path } if path == "bootstrap"
        ));
    }

    #[test]
    fn test_remove_forgets_member() {
        let users = users();
        let admin = users.get("admin");
        users.remove("admin");
        assert!(!users.get("admin").ptr_eq(&admin));
    }

    #[test]
    fn test_adopt_prefers_known_node() {
        let users = users();
        let known = users.get("bob");
        let fresh = users.new_member(Some("bob"));
        fresh.absorb(&json!({"Users": {"active": true}}), Origin::Embedded);

        let adopted = users.adopt("bob", &fresh);
        assert!(adopted.ptr_eq(&known));
        assert_eq!(known.cached("active"), Some(json!(true)));
    }
}
