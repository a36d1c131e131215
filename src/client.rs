//! The session root.

use std::fmt;
use std::sync::Arc;

use crate::clients::{HttpClient, HttpError, Transport};
use crate::config::AmbariConfig;
use crate::rest::resources::{
    ACTION, BLUEPRINT, BOOTSTRAP, CLUSTER, GROUP, HOST, ROOT_SERVICE, STACK, USER,
};
use crate::rest::{Collection, ResourceKind, Session};

/// A client session against one Ambari server.
///
/// The session owns the cache: every collection and model reached through
/// it is shared by all callers holding the same `Ambari`. Separate sessions
/// never share state. Dropping the `Ambari` releases the cache; handles taken
/// from it keep working on their own.
///
/// # Example
///
/// ```rust,ignore
/// use ambari_api::{Ambari, AmbariConfig, Credentials};
///
/// let config = AmbariConfig::builder()
///     .host("https://ambari.example.com:8443")
///     .credentials(Credentials::new("admin", "admin")?)
///     .build()?;
/// let ambari = Ambari::new(&config)?;
///
/// for cluster in ambari.clusters().list().await? {
///     println!("{:?}", cluster.key());
/// }
/// ```
pub struct Ambari {
    session: Arc<Session>,
}

impl Ambari {
    /// Creates a session using an [`HttpClient`] built from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Network`] if the HTTP client cannot be built.
    pub fn new(config: &AmbariConfig) -> Result<Self, HttpError> {
        Ok(Self::with_transport(Arc::new(HttpClient::new(config)?)))
    }

    /// Creates a session on top of any [`Transport`].
    #[must_use]
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self {
            session: Session::new(transport),
        }
    }

    /// Returns the top-level collection of `kind`.
    ///
    /// The same collection is returned on every call.
    #[must_use]
    pub fn collection(&self, kind: &'static ResourceKind) -> Collection {
        self.session.root(kind)
    }

    /// `clusters`
    #[must_use]
    pub fn clusters(&self) -> Collection {
        self.collection(&CLUSTER)
    }

    /// `hosts`
    #[must_use]
    pub fn hosts(&self) -> Collection {
        self.collection(&HOST)
    }

    /// `users`
    #[must_use]
    pub fn users(&self) -> Collection {
        self.collection(&USER)
    }

    /// `groups`
    #[must_use]
    pub fn groups(&self) -> Collection {
        self.collection(&GROUP)
    }

    /// `stacks`
    #[must_use]
    pub fn stacks(&self) -> Collection {
        self.collection(&STACK)
    }

    /// `blueprints`
    #[must_use]
    pub fn blueprints(&self) -> Collection {
        self.collection(&BLUEPRINT)
    }

    /// `actions`
    #[must_use]
    pub fn actions(&self) -> Collection {
        self.collection(&ACTION)
    }

    /// Server-level `services`, e.g. `AMBARI`.
    #[must_use]
    pub fn services(&self) -> Collection {
        self.collection(&ROOT_SERVICE)
    }

    /// `bootstrap`; cannot be listed, only created and waited on.
    #[must_use]
    pub fn bootstrap(&self) -> Collection {
        self.collection(&BOOTSTRAP)
    }
}

impl Drop for Ambari {
    fn drop(&mut self) {
        self.session.close();
    }
}

impl fmt::Debug for Ambari {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ambari")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

// Verify Ambari is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Ambari>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Credentials;

    #[test]
    fn test_entry_points_are_stable() {
        let config = AmbariConfig::builder()
            .host("ambari.local:8080")
            .credentials(Credentials::new("admin", "admin").unwrap())
            .build()
            .unwrap();
        let ambari = Ambari::new(&config).unwrap();

        let admin = ambari.users().get("admin");
        assert!(admin.ptr_eq(&ambari.users().get("admin")));
        assert_eq!(ambari.clusters().path().unwrap(), "clusters");
        assert_eq!(ambari.services().path().unwrap(), "services");
        assert_eq!(ambari.bootstrap().kind(), &BOOTSTRAP);
    }

    #[test]
    fn test_sessions_do_not_share_state() {
        let config = AmbariConfig::builder().host("ambari.local").build().unwrap();
        let first = Ambari::new(&config).unwrap();
        let second = Ambari::new(&config).unwrap();
        assert!(!first.users().get("admin").ptr_eq(&second.users().get("admin")));
    }
}
