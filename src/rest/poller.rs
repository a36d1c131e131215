//! The operation poller.
//!
//! [`poll`] repeatedly checks an operation's status until it reaches a
//! terminal state or the timeout elapses. The loop itself is shared with the
//! readiness checks of hosts. Elapsed time is checked after each
//! status check and before sleeping, so a zero timeout performs exactly one
//! check.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;

use crate::rest::errors::ResourceError;
use crate::rest::operation::OperationDescriptor;

/// Default delay between two status checks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(15);

/// Default upper bound on the total wait.
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(3600);

/// Timeout and interval for [`poll`] and `wait`.
///
/// # Example
///
/// ```rust
/// use ambari_api::rest::WaitOptions;
/// use std::time::Duration;
///
/// let options = WaitOptions::default()
///     .timeout(Duration::from_secs(60))
///     .interval(Duration::from_secs(10));
/// assert_eq!(options.timeout, Duration::from_secs(60));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WaitOptions {
    /// Upper bound on the total wait.
    pub timeout: Duration,
    /// Delay between two status checks.
    pub interval: Duration,
}

impl WaitOptions {
    /// Creates options with explicit values.
    #[must_use]
    pub const fn new(timeout: Duration, interval: Duration) -> Self {
        Self { timeout, interval }
    }

    /// Sets the timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the interval.
    #[must_use]
    pub const fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_TIMEOUT, DEFAULT_POLL_INTERVAL)
    }
}

/// Polls `fetch_status` until the operation is terminal.
///
/// Returns the terminal descriptor, whether it completed or failed; callers
/// decide what a failure means. Errors from `fetch_status` propagate
/// immediately.
///
/// # Errors
///
/// Returns [`ResourceError::WaitTimeout`] carrying the last observed status
/// when the timeout elapses first.
///
/// # Example
///
/// ```rust,ignore
/// let op = poll(|| fetch_request_status(&transport, 5), WaitOptions::default()).await?;
/// ```
pub async fn poll<F, Fut>(
    mut fetch_status: F,
    options: WaitOptions,
) -> Result<OperationDescriptor, ResourceError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<OperationDescriptor, ResourceError>>,
{
    let mut attempt: u32 = 0;
    poll_until(
        || {
            attempt += 1;
            let attempt = attempt;
            let next = fetch_status();
            async move {
                let op = next.await?;
                tracing::debug!(
                    request_id = op.request_id,
                    status = %op.status,
                    progress = ?op.progress_percent,
                    attempt,
                    "polled operation"
                );
                Ok(op)
            }
        },
        OperationDescriptor::is_terminal,
        options,
        |op| ResourceError::WaitTimeout {
            request_id: op.request_id,
            last_status: op.status,
            timeout: options.timeout,
        },
    )
    .await
}

/// Calls `check` until `is_done` accepts its result.
///
/// Elapsed time is checked after each call and before sleeping; when the
/// timeout has run out, `on_timeout` turns the last result into the error.
pub(crate) async fn poll_until<T, F, Fut>(
    mut check: F,
    is_done: impl Fn(&T) -> bool,
    options: WaitOptions,
    on_timeout: impl FnOnce(T) -> ResourceError,
) -> Result<T, ResourceError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ResourceError>>,
{
    let started = Instant::now();

    loop {
        let observed = check().await?;
        if is_done(&observed) {
            return Ok(observed);
        }

        if started.elapsed() >= options.timeout {
            return Err(on_timeout(observed));
        }

        tokio::time::sleep(options.interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::operation::{OperationStatus, OperationStyle};
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn descriptor(status: OperationStatus) -> OperationDescriptor {
        OperationDescriptor {
            request_id: 5,
            status,
            server_status: status.as_str().to_string(),
            progress_percent: None,
            path: "clusters/c1/requests/5".to_string(),
            style: OperationStyle::Request,
        }
    }

    /// Returns a status source that yields `statuses` in order, repeating the last one.
    fn scripted(
        statuses: Vec<OperationStatus>,
    ) -> (
        Arc<AtomicU32>,
        impl FnMut() -> std::future::Ready<Result<OperationDescriptor, ResourceError>>,
    ) {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);
        let fetch = move || {
            let index = counter.fetch_add(1, Ordering::SeqCst) as usize;
            let status = statuses[index.min(statuses.len() - 1)];
            std::future::ready(Ok(descriptor(status)))
        };
        (calls, fetch)
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_timeout_checks_exactly_once() {
        let (calls, fetch) = scripted(vec![OperationStatus::InProgress]);
        let started = Instant::now();

        let result = poll(fetch, WaitOptions::new(Duration::ZERO, Duration::from_secs(10))).await;

        assert!(matches!(
            result,
            Err(ResourceError::WaitTimeout {
                request_id: 5,
                last_status: OperationStatus::InProgress,
                ..
            })
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_returns_immediately_on_terminal_status() {
        let (calls, fetch) = scripted(vec![OperationStatus::Completed]);
        let started = Instant::now();

        let op = poll(fetch, WaitOptions::default()).await.unwrap();

        assert_eq!(op.status, OperationStatus::Completed);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_returns_failed_descriptor_without_error() {
        let (_, fetch) = scripted(vec![OperationStatus::InProgress, OperationStatus::Aborted]);

        let op = poll(fetch, WaitOptions::default()).await.unwrap();

        assert_eq!(op.status, OperationStatus::Aborted);
    }

    #[tokio::test(start_paused = true)]
    async fn test_completes_within_timeout() {
        let (calls, fetch) = scripted(vec![
            OperationStatus::Pending,
            OperationStatus::InProgress,
            OperationStatus::Completed,
        ]);
        let options = WaitOptions::new(Duration::from_secs(60), Duration::from_secs(10));
        let started = Instant::now();

        let op = poll(fetch, options).await.unwrap();

        assert_eq!(op.status, OperationStatus::Completed);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(started.elapsed() >= Duration::from_secs(20));
        assert!(started.elapsed() < Duration::from_secs(21));
    }

    #[tokio::test(start_paused = true)]
    async fn test_times_out_when_never_terminal() {
        let (calls, fetch) = scripted(vec![OperationStatus::InProgress]);
        let options = WaitOptions::new(Duration::from_secs(60), Duration::from_secs(10));

        let result = poll(fetch, options).await;

        match result {
            Err(ResourceError::WaitTimeout {
                request_id,
                last_status,
                timeout,
            }) => {
                assert_eq!(request_id, 5);
                assert_eq!(last_status, OperationStatus::InProgress);
                assert_eq!(timeout, Duration::from_secs(60));
            }
            other => panic!("expected a timeout, got {other:?}"),
        }
        // checks at 0, 10, ..., 60 seconds
        assert_eq!(calls.load(Ordering::SeqCst), 7);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_until_hands_last_value_to_timeout() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);
        let options = WaitOptions::new(Duration::from_secs(20), Duration::from_secs(5));

        let result = poll_until(
            move || std::future::ready(Ok(counter.fetch_add(1, Ordering::SeqCst))),
            |seen| *seen >= 10,
            options,
            |last| ResourceError::InvalidResponse {
                path: "hosts/h1".to_string(),
                reason: format!("last {last}"),
            },
        )
        .await;

        assert!(matches!(
            result,
            Err(ResourceError::InvalidResponse { ref reason, .. }) if reason == "last 4"
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_errors_propagate_immediately() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);
        let fetch = move || {
            counter.fetch_add(1, Ordering::SeqCst);
            std::future::ready(Err(ResourceError::NotFound {
                resource: "Request",
                path: "clusters/c1/requests/5".to_string(),
            }))
        };

        let result = poll(fetch, WaitOptions::default()).await;

        assert!(matches!(result, Err(ResourceError::NotFound { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
