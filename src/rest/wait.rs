//! Settling nodes and collections.
//!
//! `wait` brings a node in line with the server. With no operation in
//! flight that is a single refresh. With a pending operation, the operation
//! is polled until it is terminal:
//!
//! | Pending operation        | Action                                   |
//! |--------------------------|------------------------------------------|
//! | none                     | refresh                                  |
//! | not terminal             | poll; on completion clear and mark stale |
//! | completed                | clear, then refresh                      |
//! | failed or aborted        | [`ResourceError::OperationFailed`]       |
//!
//! A request whose progress reached 100% is finished, whatever its status.
//! A poll that runs out of time fails with [`ResourceError::WaitTimeout`]
//! and leaves the operation pending with its last observed status, so a
//! later `wait` resumes polling.
//!
//! Kinds with a readiness check (hosts) are refreshed until the check
//! passes instead, and a finished bootstrap waits for the hosts it
//! registered.

use std::sync::atomic::{AtomicU32, Ordering};

use serde_json::{Map, Value};

use crate::clients::{HttpMethod, Transport};
use crate::rest::collection::Collection;
use crate::rest::errors::ResourceError;
use crate::rest::model::{dispatch, Model, Origin};
use crate::rest::operation::{OperationDescriptor, OperationStyle};
use crate::rest::poller::{poll, poll_until, WaitOptions};
use crate::rest::resources::{BOOTSTRAP, HOST, REQUEST, TASK};

/// Lookups of an entity that is not registered yet; the last 404 is final.
const MAX_LOOKUPS: u32 = 6;

/// What `wait` does for a given pending operation.
#[derive(Debug, PartialEq)]
enum Plan {
    Refresh,
    Poll(OperationDescriptor),
}

fn plan(pending: Option<OperationDescriptor>) -> Result<Plan, ResourceError> {
    match pending {
        None => Ok(Plan::Refresh),
        Some(op) if op.has_failed() => Err(failure(&op)),
        Some(op) if op.is_terminal() => Ok(Plan::Refresh),
        Some(op) => Ok(Plan::Poll(op)),
    }
}

const fn failure(op: &OperationDescriptor) -> ResourceError {
    ResourceError::OperationFailed {
        request_id: op.request_id,
        status: op.status,
    }
}

/// Fetches the current state of `op`.
async fn fetch_status(
    transport: &dyn Transport,
    op: &OperationDescriptor,
) -> Result<(OperationDescriptor, Value), ResourceError> {
    let kind = match op.style {
        OperationStyle::Request => &REQUEST,
        OperationStyle::Bootstrap => &BOOTSTRAP,
        OperationStyle::Task => &TASK,
    };
    let body = dispatch(transport, kind, HttpMethod::Get, &op.path, None).await?;
    let observed = op
        .observe(&body)
        .ok_or_else(|| ResourceError::InvalidResponse {
            path: op.path.clone(),
            reason: "no operation status in response".to_string(),
        })?;
    Ok((observed, body))
}

/// Polls `op` and turns a terminal failure into an error.
///
/// `on_body` sees every polled body. The returned descriptor is the
/// finished operation; timeouts leave `last_seen` holding the last status.
async fn settle(
    transport: &dyn Transport,
    op: &OperationDescriptor,
    options: WaitOptions,
    on_body: impl Fn(&Value),
    last_seen: impl Fn(OperationDescriptor),
) -> Result<OperationDescriptor, ResourceError> {
    let on_body = &on_body;
    let last_seen = &last_seen;

    let result = poll(
        move || async move {
            let (observed, body) = fetch_status(transport, op).await?;
            on_body(&body);
            last_seen(observed.clone());
            Ok(observed)
        },
        options,
    )
    .await?;

    if result.has_failed() {
        return Err(failure(&result));
    }
    Ok(result)
}

impl Model {
    /// Waits until the node is settled.
    ///
    /// `None` uses the kind's [`default_wait_options`](Self::default_wait_options).
    /// Request, task and bootstrap entities are their own operation: after
    /// the refresh, an unfinished status is polled as well. Hosts are
    /// refreshed until they report healthy (or sit in maintenance without
    /// reporting); a host that is not registered yet may answer `404` a few
    /// times first. A bootstrap then waits for each of its hosts, with
    /// `options` if given and the host defaults otherwise.
    ///
    /// # Errors
    ///
    /// - [`ResourceError::OperationFailed`] if the operation finished unsuccessfully
    /// - [`ResourceError::WaitTimeout`] if it did not finish in time
    /// - [`ResourceError::NotReady`] if a host did not become ready in time
    /// - any error of [`refresh`](Self::refresh) or of the status checks
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let datanode = host.relationship("host_components")?.get("DATANODE");
    /// datanode.install(None).await?.wait(None).await?;
    /// ```
    pub async fn wait(&self, options: Option<WaitOptions>) -> Result<&Self, ResourceError> {
        self.settle_node(options.unwrap_or_else(|| self.default_wait_options()))
            .await?;

        if self.kind() == &BOOTSTRAP {
            let hosts = self.session().root(&HOST);
            for name in self.bootstrapped_hosts() {
                let host = hosts.get(&name);
                let host_options = options.unwrap_or_else(|| host.default_wait_options());
                host.settle_node(host_options).await?;
            }
        }
        Ok(self)
    }

    async fn settle_node(&self, options: WaitOptions) -> Result<(), ResourceError> {
        let polled = match plan(self.pending_operation())? {
            Plan::Poll(op) => {
                self.poll_operation(&op, options).await?;
                true
            }
            Plan::Refresh => {
                self.set_pending_operation(None);
                false
            }
        };

        if let Some(ready) = self.kind().readiness {
            return self.poll_readiness(ready, options).await;
        }
        if polled {
            return Ok(());
        }

        self.refresh().await?;
        if let Some(op) = self.own_operation() {
            if op.has_failed() {
                return Err(failure(&op));
            }
            if !op.is_terminal() {
                self.poll_operation(&op, options).await?;
            }
        }
        Ok(())
    }

    async fn poll_operation(
        &self,
        op: &OperationDescriptor,
        options: WaitOptions,
    ) -> Result<(), ResourceError> {
        // Requests, tasks and bootstraps are polled at their own path.
        let own_path = self.path().ok().filter(|p| *p == op.path).is_some();
        tracing::debug!(
            resource = self.kind().name,
            request_id = op.request_id,
            path = %op.path,
            timeout = ?options.timeout,
            interval = ?options.interval,
            "waiting for operation"
        );

        settle(
            self.session().transport(),
            op,
            options,
            |body| {
                if own_path {
                    self.absorb(body, Origin::Fetch);
                }
            },
            |observed| self.set_pending_operation(Some(observed)),
        )
        .await?;

        self.set_pending_operation(None);
        if !own_path {
            self.invalidate();
        }
        Ok(())
    }

    async fn poll_readiness(
        &self,
        ready: fn(&Map<String, Value>) -> bool,
        options: WaitOptions,
    ) -> Result<(), ResourceError> {
        let path = self.path()?;
        let lookups = AtomicU32::new(0);
        let lookups = &lookups;
        tracing::debug!(
            resource = self.kind().name,
            path = %path,
            timeout = ?options.timeout,
            interval = ?options.interval,
            "waiting for entity to become ready"
        );

        poll_until(
            move || async move {
                match self.refresh().await {
                    Ok(_) => Ok(ready(&self.attributes())),
                    Err(ResourceError::NotFound { path, .. })
                        if lookups.fetch_add(1, Ordering::SeqCst) + 1 < MAX_LOOKUPS =>
                    {
                        tracing::debug!(
                            resource = self.kind().name,
                            path = %path,
                            "entity not registered yet"
                        );
                        Ok(false)
                    }
                    Err(e) => Err(e),
                }
            },
            |settled| *settled,
            options,
            |_| ResourceError::NotReady {
                resource: self.kind().name,
                path: path.clone(),
                timeout: options.timeout,
            },
        )
        .await?;
        Ok(())
    }

    /// Host names listed in a bootstrap's `hostsStatus`.
    fn bootstrapped_hosts(&self) -> Vec<String> {
        let Some(Value::Array(statuses)) = self.cached("hostsStatus") else {
            return Vec::new();
        };
        statuses
            .iter()
            .filter_map(|status| status.get("hostName").and_then(Value::as_str))
            .map(str::to_string)
            .collect()
    }
}

impl Collection {
    /// Waits for the pending bulk command, then re-lists the members.
    ///
    /// Without a pending operation this is a plain [`refresh`](Self::refresh).
    /// Members of kinds with a readiness check (cluster hosts) are then
    /// waited on one by one with the same options.
    ///
    /// # Errors
    ///
    /// - [`ResourceError::MethodNotAllowed`] if nothing is pending and the kind
    ///   cannot be listed
    /// - otherwise the same as [`Model::wait`]
    pub async fn wait(&self, options: Option<WaitOptions>) -> Result<&Self, ResourceError> {
        let kind = self.kind();
        let options = options.unwrap_or_else(|| kind.wait);

        let pending = self.pending_operation();
        if pending.is_none() && !kind.capabilities.list {
            return Err(ResourceError::MethodNotAllowed {
                method: HttpMethod::Get,
                path: self.path()?,
            });
        }

        if let Plan::Poll(op) = plan(pending)? {
            tracing::debug!(
                resource = kind.name,
                request_id = op.request_id,
                path = %op.path,
                "waiting for bulk operation"
            );
            settle(
                self.session().transport(),
                &op,
                options,
                |_| {},
                |observed| self.set_pending_operation(Some(observed)),
            )
            .await?;
        }

        self.set_pending_operation(None);
        if kind.capabilities.list {
            self.refresh().await?;
        }
        if kind.readiness.is_some() {
            for member in self.known() {
                member.settle_node(options).await?;
            }
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::operation::OperationStatus;

    fn op(status: OperationStatus) -> OperationDescriptor {
        OperationDescriptor {
            request_id: 5,
            status,
            server_status: status.as_str().to_string(),
            progress_percent: None,
            path: "clusters/c1/requests/5".to_string(),
            style: OperationStyle::Request,
        }
    }

    #[test]
    fn test_plan_without_operation_refreshes() {
        assert_eq!(plan(None).unwrap(), Plan::Refresh);
    }

    #[test]
    fn test_plan_polls_running_operation() {
        let running = op(OperationStatus::InProgress);
        assert_eq!(plan(Some(running.clone())).unwrap(), Plan::Poll(running));
        let pending = op(OperationStatus::Pending);
        assert_eq!(plan(Some(pending.clone())).unwrap(), Plan::Poll(pending));
    }

    #[test]
    fn test_plan_refreshes_after_completed_operation() {
        assert_eq!(plan(Some(op(OperationStatus::Completed))).unwrap(), Plan::Refresh);
    }

    #[test]
    fn test_plan_refreshes_after_timed_out_request_at_full_progress() {
        let mut timed_out = op(OperationStatus::from_server("TIMEDOUT"));
        timed_out.progress_percent = Some(100.0);
        assert_eq!(plan(Some(timed_out)).unwrap(), Plan::Refresh);
    }

    #[test]
    fn test_plan_keeps_polling_timed_out_request_below_full_progress() {
        let mut timed_out = op(OperationStatus::from_server("TIMEDOUT"));
        timed_out.progress_percent = Some(40.0);
        assert_eq!(plan(Some(timed_out.clone())).unwrap(), Plan::Poll(timed_out));
    }

    #[test]
    fn test_plan_fails_on_terminal_failures() {
        for status in [OperationStatus::Failed, OperationStatus::Aborted] {
            let error = plan(Some(op(status))).unwrap_err();
            assert!(matches!(
                error,
                ResourceError::OperationFailed { request_id: 5, status: s } if s == status
            ));
        }
    }
}
