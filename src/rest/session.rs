//! State shared by every node of one client session.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::clients::Transport;
use crate::rest::collection::Collection;
use crate::rest::kind::ResourceKind;
use crate::rest::path::EntityIdentifier;

/// The transport and the top-level collections of a session.
///
/// Every node holds its session, and the session holds the top-level
/// collections until [`close`](Self::close) releases them.
pub(crate) struct Session {
    transport: Arc<dyn Transport>,
    // `None` once closed.
    roots: Mutex<Option<HashMap<&'static str, Collection>>>,
}

impl Session {
    pub(crate) fn new(transport: Arc<dyn Transport>) -> Arc<Self> {
        Arc::new(Self {
            transport,
            roots: Mutex::new(Some(HashMap::new())),
        })
    }

    pub(crate) fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    fn lock(&self) -> MutexGuard<'_, Option<HashMap<&'static str, Collection>>> {
        self.roots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the top-level collection of `kind`.
    ///
    /// The same collection is returned on every call until the session is
    /// closed; after that each call yields a detached one.
    pub(crate) fn root(self: &Arc<Self>, kind: &'static ResourceKind) -> Collection {
        let create = || Collection::new(Arc::clone(self), kind, EntityIdentifier::root());
        match self.lock().as_mut() {
            Some(roots) => roots.entry(kind.name).or_insert_with(create).clone(),
            None => create(),
        }
    }

    /// Releases the top-level collections, breaking the cycle between the
    /// session and its nodes.
    pub(crate) fn close(&self) {
        let roots = self.lock().take();
        drop(roots);
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("transport", &self.transport)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::resources::{HOST, USER};

    #[derive(Debug)]
    struct Unreachable;

    impl Transport for Unreachable {
        fn execute(&self, request: crate::clients::HttpRequest) -> crate::clients::TransportFuture<'_> {
            panic!("unexpected request to {}", request.path)
        }
    }

    #[test]
    fn test_root_is_shared() {
        let session = Session::new(Arc::new(Unreachable));
        let admin = session.root(&USER).get("admin");

        assert!(session.root(&USER).get("admin").ptr_eq(&admin));
        assert_eq!(session.root(&HOST).path().unwrap(), "hosts");
    }

    #[test]
    fn test_closed_session_hands_out_detached_roots() {
        let session = Session::new(Arc::new(Unreachable));
        let admin = session.root(&USER).get("admin");
        session.close();

        assert!(!session.root(&USER).get("admin").ptr_eq(&admin));
        drop(admin);
        assert_eq!(Arc::strong_count(&session), 1);
    }
}
