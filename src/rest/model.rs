//! Resource nodes.
//!
//! A [`Model`] is the client-side stand-in for one server entity. It starts
//! out knowing only its identity and fills its attribute cache lazily: the
//! first access to an attribute that is not cached fetches the entity once,
//! later accesses are answered from the cache.
//!
//! Models are cheap handles. Cloning one yields another handle to the same
//! node, and a [`Collection`] hands out the same node every time the same key
//! is asked for, so state observed through one handle is visible through all
//! of them.
//!
//! # Example
//!
//! ```rust,ignore
//! let admin = ambari.users().get("admin");
//! assert_eq!(admin.fetch_state(), FetchState::Unloaded);
//!
//! // One GET to users/admin
//! let name = admin.attribute("user_name").await?;
//!
//! // Answered from the cache
//! let active: bool = admin.attribute_as("active").await?;
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};

use crate::clients::{HttpError, HttpMethod, HttpRequest, Transport};
use crate::rest::collection::{Collection, CollectionInner};
use crate::rest::errors::ResourceError;
use crate::rest::kind::ResourceKind;
use crate::rest::operation::{OperationDescriptor, OperationStyle};
use crate::rest::path::{cluster_prefix, resolve_path, EntityIdentifier};
use crate::rest::poller::WaitOptions;
use crate::rest::session::Session;

/// How much of a node's server state has been seen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FetchState {
    /// Never fetched. Attributes may still hold data embedded in a parent
    /// response or a listing.
    Unloaded,
    /// Fetched; the attribute map reflects the last response.
    Loaded,
    /// Fetched once, but the server state is known to have changed since.
    Stale,
}

/// A mutating call against a node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    /// `POST` the payload, shaped by [`ResourceKind::build_input`].
    Create,
    /// `PUT` the payload, shaped by [`ResourceKind::build_input`].
    Update,
    /// `DELETE` the node.
    Delete,
    /// Send the payload as is. `GET` and `DELETE` carry no body.
    Custom {
        /// Name used in logs (e.g., `"install"`).
        name: String,
        /// HTTP method to use.
        method: HttpMethod,
    },
}

impl Action {
    /// Shorthand for [`Action::Custom`].
    #[must_use]
    pub fn custom(name: impl Into<String>, method: HttpMethod) -> Self {
        Self::Custom {
            name: name.into(),
            method,
        }
    }

    fn name(&self) -> &str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Custom { name, .. } => name,
        }
    }
}

/// Where a body handed to [`Model::absorb`] came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Origin {
    /// A direct `GET` of the entity.
    Fetch,
    /// An item embedded in a parent response or a listing.
    Embedded,
    /// The response to a mutation.
    Mutation,
}

/// A lazily loaded handle to one server entity.
#[derive(Clone)]
pub struct Model {
    inner: Arc<ModelInner>,
}

struct ModelInner {
    session: Arc<Session>,
    kind: &'static ResourceKind,
    parent: Weak<CollectionInner>,
    state: Mutex<ModelState>,
    // Held for the duration of a fetch or mutation.
    io: tokio::sync::Mutex<()>,
}

struct ModelState {
    identity: EntityIdentifier,
    attributes: Map<String, Value>,
    fetch_state: FetchState,
    children: HashMap<&'static str, Collection>,
    pending_operation: Option<OperationDescriptor>,
}

impl Model {
    pub(crate) fn new(
        session: Arc<Session>,
        kind: &'static ResourceKind,
        identity: EntityIdentifier,
        parent: Weak<CollectionInner>,
    ) -> Self {
        Self {
            inner: Arc::new(ModelInner {
                session,
                kind,
                parent,
                state: Mutex::new(ModelState {
                    identity,
                    attributes: Map::new(),
                    fetch_state: FetchState::Unloaded,
                    children: HashMap::new(),
                    pending_operation: None,
                }),
                io: tokio::sync::Mutex::new(()),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ModelState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the kind descriptor.
    #[must_use]
    pub fn kind(&self) -> &'static ResourceKind {
        self.inner.kind
    }

    /// Returns the key, once known.
    #[must_use]
    pub fn key(&self) -> Option<String> {
        self.lock().identity.key().map(ToString::to_string)
    }

    /// Returns the identity chain from the API root.
    #[must_use]
    pub fn identity(&self) -> EntityIdentifier {
        self.lock().identity.clone()
    }

    /// Returns the request path of the entity.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::IncompleteIdentity`] if an ancestor has no key.
    pub fn path(&self) -> Result<String, ResourceError> {
        resolve_path(&self.lock().identity)
    }

    /// Returns how much server state has been seen.
    #[must_use]
    pub fn fetch_state(&self) -> FetchState {
        self.lock().fetch_state
    }

    /// Returns a cached attribute without any I/O.
    #[must_use]
    pub fn cached(&self, name: &str) -> Option<Value> {
        self.lock().attributes.get(name).cloned()
    }

    /// Returns a snapshot of the attribute cache without any I/O.
    #[must_use]
    pub fn attributes(&self) -> Map<String, Value> {
        self.lock().attributes.clone()
    }

    /// Returns an attribute, fetching the entity if it is not cached.
    ///
    /// A cached value is returned without I/O regardless of the fetch state.
    /// Otherwise the entity is fetched at most once; if the attribute is
    /// still absent afterwards, the call fails.
    ///
    /// # Errors
    ///
    /// - [`ResourceError::FieldNotFound`] if the loaded entity has no such attribute
    /// - [`ResourceError::NotFound`] if the entity does not exist
    /// - [`ResourceError::IncompleteIdentity`] if an ancestor has no key
    /// - [`ResourceError::Http`] for transport failures
    pub async fn attribute(&self, name: &str) -> Result<Value, ResourceError> {
        if let Some(found) = self.lookup(name)? {
            return Ok(found);
        }

        let _io = self.inner.io.lock().await;
        // Another caller may have fetched while we waited for the lock.
        if let Some(found) = self.lookup(name)? {
            return Ok(found);
        }

        self.fetch().await?;
        self.lookup(name)?
            .ok_or_else(|| self.field_not_found(name))
    }

    /// Cache lookup: `Ok(None)` means a fetch is needed.
    fn lookup(&self, name: &str) -> Result<Option<Value>, ResourceError> {
        let state = self.lock();
        if let Some(value) = state.attributes.get(name) {
            return Ok(Some(value.clone()));
        }
        if state.fetch_state == FetchState::Loaded {
            drop(state);
            return Err(self.field_not_found(name));
        }
        Ok(None)
    }

    fn field_not_found(&self, name: &str) -> ResourceError {
        ResourceError::FieldNotFound {
            resource: self.inner.kind.name,
            path: self.path().unwrap_or_default(),
            field: name.to_string(),
        }
    }

    /// Returns an attribute deserialized into `T`.
    ///
    /// # Errors
    ///
    /// Same as [`attribute`](Self::attribute), plus
    /// [`ResourceError::InvalidResponse`] if the value does not deserialize.
    pub async fn attribute_as<T: DeserializeOwned>(&self, name: &str) -> Result<T, ResourceError> {
        let value = self.attribute(name).await?;
        serde_json::from_value(value).map_err(|e| ResourceError::InvalidResponse {
            path: self.path().unwrap_or_default(),
            reason: format!("field '{name}': {e}"),
        })
    }

    /// Returns the named child collection.
    ///
    /// The collection is created on first access and the same one is returned
    /// afterwards. No I/O happens here; if a fetch of this node embedded the
    /// children, the collection is already hydrated and marked listed.
    ///
    /// # Errors
    ///
    /// - [`ResourceError::UnknownRelationship`] if the kind has no such relationship
    /// - [`ResourceError::IncompleteIdentity`] if this node has no key yet
    pub fn relationship(&self, name: &str) -> Result<Collection, ResourceError> {
        let kind = self.inner.kind;
        let relationship =
            kind.relationship(name)
                .ok_or_else(|| ResourceError::UnknownRelationship {
                    resource: kind.name,
                    relationship: name.to_string(),
                })?;

        let mut guard = self.lock();
        let state = &mut *guard;
        if !state.identity.is_complete() {
            return Err(ResourceError::IncompleteIdentity {
                segment: kind.path.to_string(),
            });
        }
        let identity = &state.identity;
        let session = &self.inner.session;
        let collection = state
            .children
            .entry(relationship.name)
            .or_insert_with(|| {
                Collection::new(Arc::clone(session), relationship.kind, identity.clone())
            });
        Ok(collection.clone())
    }

    /// Fetches the entity unconditionally.
    ///
    /// Replaces the attribute cache and merges embedded relationships into
    /// the child collections.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::NotFound`], [`ResourceError::IncompleteIdentity`]
    /// or [`ResourceError::Http`].
    pub async fn refresh(&self) -> Result<&Self, ResourceError> {
        let _io = self.inner.io.lock().await;
        self.fetch().await?;
        Ok(self)
    }

    /// Fetches the entity unless it is already loaded.
    ///
    /// # Errors
    ///
    /// Same as [`refresh`](Self::refresh).
    pub async fn inflate(&self) -> Result<&Self, ResourceError> {
        if self.fetch_state() == FetchState::Loaded {
            return Ok(self);
        }
        let _io = self.inner.io.lock().await;
        if self.fetch_state() != FetchState::Loaded {
            self.fetch().await?;
        }
        Ok(self)
    }

    /// Marks a loaded node as stale. Cached attributes are kept.
    pub fn invalidate(&self) {
        let mut state = self.lock();
        if state.fetch_state == FetchState::Loaded {
            state.fetch_state = FetchState::Stale;
        }
    }

    /// Returns the operation started by the last mutation, until settled.
    #[must_use]
    pub fn pending_operation(&self) -> Option<OperationDescriptor> {
        self.lock().pending_operation.clone()
    }

    /// Returns the wait policy of the kind.
    #[must_use]
    pub fn default_wait_options(&self) -> WaitOptions {
        self.inner.kind.wait
    }

    /// Renders `{primary_key: key}` for use inside another entity's payload.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::IncompleteIdentity`] if the node has no key.
    pub fn reference(&self) -> Result<Value, ResourceError> {
        let kind = self.inner.kind;
        let key = self.key().ok_or_else(|| ResourceError::IncompleteIdentity {
            segment: kind.path.to_string(),
        })?;
        let mut reference = Map::new();
        reference.insert(kind.primary_key.to_string(), Value::String(key));
        Ok(Value::Object(reference))
    }

    /// Returns `true` if both handles point at the same node.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Issues a mutating call against the node's path.
    ///
    /// If the response describes an asynchronous request it becomes the
    /// [`pending_operation`](Self::pending_operation); otherwise attributes
    /// in the response are merged into the cache. Returns the node so a
    /// [`wait`](Self::wait) can be chained.
    ///
    /// # Errors
    ///
    /// - [`ResourceError::UnsupportedOperation`] if the kind does not allow the action
    /// - [`ResourceError::MethodNotAllowed`] if the server refuses it
    /// - [`ResourceError::NotFound`], [`ResourceError::IncompleteIdentity`], [`ResourceError::Http`]
    pub async fn invoke(&self, action: Action, payload: Option<Value>) -> Result<&Self, ResourceError> {
        let payload = payload.unwrap_or_else(|| json!({}));
        match action {
            Action::Create => {
                self.create_in_place(&payload).await?;
            }
            Action::Update => {
                self.require(self.inner.kind.capabilities.update, "update")?;
                let body = self.inner.kind.build_input(&payload, false);
                self.mutate(&action, HttpMethod::Put, Some(body)).await?;
            }
            Action::Delete => {
                self.delete().await?;
            }
            Action::Custom { method, .. } => {
                let body = match method {
                    HttpMethod::Get | HttpMethod::Delete => None,
                    HttpMethod::Post | HttpMethod::Put => Some(payload),
                };
                self.mutate(&action, method, body).await?;
            }
        }
        Ok(self)
    }

    /// Creates the entity on the server.
    ///
    /// A keyed node posts to its own path without the primary key in the
    /// payload. A keyless node posts to the collection path, takes its key
    /// from the response and is registered with its collection; the returned
    /// model is the one the collection hands out for that key.
    ///
    /// # Errors
    ///
    /// Same as [`invoke`](Self::invoke).
    pub async fn create(&self, payload: Value) -> Result<Self, ResourceError> {
        self.create_in_place(&payload).await
    }

    /// Updates the entity with a `PUT` of the shaped payload.
    ///
    /// # Errors
    ///
    /// Same as [`invoke`](Self::invoke).
    pub async fn update(&self, payload: Value) -> Result<&Self, ResourceError> {
        self.invoke(Action::Update, Some(payload)).await
    }

    /// Deletes the entity and removes it from its collection.
    ///
    /// # Errors
    ///
    /// Same as [`invoke`](Self::invoke).
    pub async fn delete(&self) -> Result<(), ResourceError> {
        let kind = self.inner.kind;
        self.require(kind.capabilities.delete, "delete")?;
        self.mutate(&Action::Delete, HttpMethod::Delete, None).await?;

        if let (Some(parent), Some(key)) = (self.inner.parent.upgrade(), self.key()) {
            Collection::from_inner(parent).remove(&key);
        }
        Ok(())
    }

    fn require(&self, allowed: bool, operation: &'static str) -> Result<(), ResourceError> {
        if allowed {
            Ok(())
        } else {
            Err(ResourceError::UnsupportedOperation {
                resource: self.inner.kind.name,
                operation,
            })
        }
    }

    async fn create_in_place(&self, payload: &Value) -> Result<Self, ResourceError> {
        let kind = self.inner.kind;
        self.require(kind.capabilities.create, "create")?;

        let keyed = self.key().is_some();
        let body = kind.build_input(payload, keyed);
        let response = self.mutate(&Action::Create, HttpMethod::Post, Some(body)).await?;
        if keyed {
            return Ok(self.clone());
        }

        let Some(key) = kind.key_of(&response) else {
            tracing::debug!(
                resource = kind.name,
                "server did not report a key for the created entity"
            );
            return Ok(self.clone());
        };

        {
            let mut state = self.lock();
            state.identity = state.identity.with_key(key.as_str());
        }
        // Re-read with the key in place so the children get the full identity.
        self.absorb(&response, Origin::Mutation);
        if let Some(op) = self.own_operation() {
            self.lock().pending_operation = Some(op);
        }

        Ok(match self.inner.parent.upgrade() {
            Some(parent) => Collection::from_inner(parent).adopt(&key, self),
            None => self.clone(),
        })
    }

    async fn mutate(
        &self,
        action: &Action,
        method: HttpMethod,
        body: Option<Value>,
    ) -> Result<Value, ResourceError> {
        let _io = self.inner.io.lock().await;
        let path = self.path()?;
        tracing::debug!(
            resource = self.inner.kind.name,
            action = action.name(),
            method = %method,
            path = %path,
            "sending mutation"
        );
        let response = dispatch(
            self.inner.session.transport(),
            self.inner.kind,
            method,
            &path,
            body,
        )
        .await?;
        self.absorb(&response, Origin::Mutation);
        Ok(response)
    }

    async fn fetch(&self) -> Result<(), ResourceError> {
        let path = self.path()?;
        tracing::debug!(resource = self.inner.kind.name, path = %path, "fetching entity");
        let body = dispatch(
            self.inner.session.transport(),
            self.inner.kind,
            HttpMethod::Get,
            &path,
            None,
        )
        .await?;
        self.absorb(&body, Origin::Fetch);
        Ok(())
    }

    /// Folds a response body or embedded item into the node.
    ///
    /// A `Requests` section on a kind that is not itself a request becomes
    /// the pending operation. Otherwise the attribute section is taken in
    /// (replacing the cache for a fetch, merging otherwise) and embedded
    /// relationships are merged into the child collections.
    pub(crate) fn absorb(&self, body: &Value, origin: Origin) {
        let kind = self.inner.kind;
        let Some(object) = body.as_object() else {
            return;
        };

        if kind.data_key != Some("Requests") && object.contains_key("Requests") {
            let scope = cluster_prefix(&self.path().unwrap_or_default());
            if let Some(op) = OperationDescriptor::from_requests(body, &scope) {
                tracing::debug!(
                    resource = kind.name,
                    request_id = op.request_id,
                    status = %op.status,
                    "mutation started an operation"
                );
                let mut state = self.lock();
                state.pending_operation = Some(op);
                if state.fetch_state == FetchState::Loaded {
                    state.fetch_state = FetchState::Stale;
                }
                return;
            }
        }

        let section = kind.attributes_of(object).filter(|s| {
            // A bare mutation echo has nothing but `href`.
            kind.data_key.is_some() || !s.is_empty()
        });

        let mut embedded = Vec::new();
        {
            let mut guard = self.lock();
            let state = &mut *guard;
            match (origin, section) {
                (Origin::Fetch, section) => {
                    state.attributes = section.unwrap_or_default();
                    state.fetch_state = FetchState::Loaded;
                }
                (Origin::Embedded | Origin::Mutation, Some(section)) => {
                    state.attributes.extend(section);
                }
                (Origin::Mutation, None) => {
                    if state.fetch_state == FetchState::Loaded {
                        state.fetch_state = FetchState::Stale;
                    }
                }
                (Origin::Embedded, None) => {}
            }

            if state.identity.is_complete() {
                for relationship in kind.relationships {
                    let Some(Value::Array(items)) = object.get(relationship.name) else {
                        continue;
                    };
                    let identity = &state.identity;
                    let session = &self.inner.session;
                    let child = state
                        .children
                        .entry(relationship.name)
                        .or_insert_with(|| {
                            Collection::new(
                                Arc::clone(session),
                                relationship.kind,
                                identity.clone(),
                            )
                        })
                        .clone();
                    embedded.push((child, items));
                }
            }
        }

        for (child, items) in embedded {
            child.merge_items(items);
        }
    }

    /// The operation a request or bootstrap entity stands for, read from
    /// its cached attributes.
    pub(crate) fn own_operation(&self) -> Option<OperationDescriptor> {
        let style = self.inner.kind.operation?;
        let attributes = Value::Object(self.attributes());
        match style {
            OperationStyle::Request => {
                let path = self.path().ok()?;
                let mut op = OperationDescriptor::from_request_section(&attributes, None, "")?;
                op.path = path;
                Some(op)
            }
            OperationStyle::Bootstrap => {
                let known_id = self.key().and_then(|k| k.parse().ok());
                OperationDescriptor::from_bootstrap(&attributes, known_id)
            }
            OperationStyle::Task => OperationDescriptor::from_task_section(&attributes, self.path().ok()?),
        }
    }

    /// Sends `body` to `path` on behalf of this node and absorbs the
    /// response, so a started request becomes the node's pending operation.
    pub(crate) async fn submit(
        &self,
        name: &str,
        method: HttpMethod,
        path: &str,
        body: Value,
    ) -> Result<&Self, ResourceError> {
        let _io = self.inner.io.lock().await;
        tracing::debug!(
            resource = self.inner.kind.name,
            action = name,
            method = %method,
            path = %path,
            "sending command"
        );
        let response = dispatch(
            self.inner.session.transport(),
            self.inner.kind,
            method,
            path,
            Some(body),
        )
        .await?;
        self.absorb(&response, Origin::Mutation);
        Ok(self)
    }

    pub(crate) fn set_pending_operation(&self, op: Option<OperationDescriptor>) {
        self.lock().pending_operation = op;
    }

    pub(crate) fn session(&self) -> &Arc<Session> {
        &self.inner.session
    }

    /// Takes over the cache and pending operation of another node for the
    /// same entity.
    pub(crate) fn merge_from(&self, other: &Self) {
        if self.ptr_eq(other) {
            return;
        }
        let (attributes, pending) = {
            let theirs = other.lock();
            (theirs.attributes.clone(), theirs.pending_operation.clone())
        };
        let mut state = self.lock();
        state.attributes.extend(attributes);
        if pending.is_some() {
            state.pending_operation = pending;
        }
    }
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("Model")
            .field("kind", &self.inner.kind.name)
            .field("identity", &state.identity)
            .field("fetch_state", &state.fetch_state)
            .field("pending_operation", &state.pending_operation)
            .finish_non_exhaustive()
    }
}

/// Sends one request and maps HTTP errors for `resource`.
pub(crate) async fn dispatch(
    transport: &dyn Transport,
    kind: &'static ResourceKind,
    method: HttpMethod,
    path: &str,
    body: Option<Value>,
) -> Result<Value, ResourceError> {
    let mut builder = HttpRequest::builder(method, path);
    if let Some(body) = body {
        builder = builder.body(body);
    }
    let request = builder.build().map_err(HttpError::from)?;

    let response = transport
        .execute(request)
        .await
        .map_err(|e| ResourceError::from_http_error(e, kind.name))?;
    Ok(response.body)
}

// Verify Model is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Model>();
};
