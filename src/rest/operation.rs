//! Operation descriptors for server-side asynchronous requests.
//!
//! Mutations in Ambari frequently answer `202 Accepted` with a `Requests`
//! section describing a background request. Bootstrap answers with its own,
//! flatter vocabulary. Both are normalized into an [`OperationDescriptor`].

use std::fmt;

use serde_json::Value;

use crate::rest::path::relative_path;

/// Normalized status of an asynchronous operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationStatus {
    /// Accepted but not started.
    Pending,
    /// Running.
    InProgress,
    /// Finished successfully.
    Completed,
    /// Finished unsuccessfully.
    Failed,
    /// Cancelled.
    Aborted,
    /// Exceeded the server-side time limit.
    TimedOut,
}

impl OperationStatus {
    /// Normalizes a server status string.
    ///
    /// Covers the request vocabulary (`PENDING`, `QUEUED`, `IN_PROGRESS`,
    /// `HOLDING*`, `COMPLETED`, `FAILED`, `ABORTED`, `TIMEDOUT`, ...) and the
    /// bootstrap vocabulary (`OK`, `RUNNING`, `SUCCESS`, `ERROR`). Unknown
    /// values are treated as in progress.
    #[must_use]
    pub fn from_server(status: &str) -> Self {
        let upper = status.trim().to_ascii_uppercase();
        match upper.as_str() {
            "PENDING" | "QUEUED" | "ACCEPTED" | "OK" => Self::Pending,
            "IN_PROGRESS" | "RUNNING" => Self::InProgress,
            "COMPLETED" | "SUCCESS" => Self::Completed,
            "FAILED" | "ERROR" | "SKIPPED_FAILED" => Self::Failed,
            "ABORTED" => Self::Aborted,
            "TIMEDOUT" | "TIMED_OUT" => Self::TimedOut,
            other if other.starts_with("HOLDING") => Self::InProgress,
            other => {
                tracing::warn!(status = other, "unknown operation status, treating it as in progress");
                Self::InProgress
            }
        }
    }

    /// Returns `true` for `Completed`, `Failed` and `Aborted`.
    ///
    /// `TimedOut` is not terminal on its own: a request whose tasks timed out
    /// is finished once its progress reaches 100%.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Aborted)
    }

    /// Returns `true` for `Failed` and `Aborted`.
    #[must_use]
    pub const fn is_failure(self) -> bool {
        matches!(self, Self::Failed | Self::Aborted)
    }

    /// Returns the canonical upper-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
            Self::Failed => "FAILED",
            Self::Aborted => "ABORTED",
            Self::TimedOut => "TIMED_OUT",
        }
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The response shape an operation is reported in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationStyle {
    /// `{"href": ".../requests/<id>", "Requests": {"id", "request_status", ...}}`
    Request,
    /// `{"requestId": <id>, "status": "RUNNING", ...}` from the bootstrap endpoint.
    Bootstrap,
    /// `{"href": ".../tasks/<id>", "Tasks": {"id", "status", ...}}`
    Task,
}

/// A server-side asynchronous operation.
#[derive(Clone, Debug, PartialEq)]
pub struct OperationDescriptor {
    /// The server-assigned request id (the task id for tasks).
    pub request_id: u64,
    /// Normalized status.
    pub status: OperationStatus,
    /// The status string as reported by the server.
    pub server_status: String,
    /// Progress in percent, when reported.
    pub progress_percent: Option<f64>,
    /// Path the status can be polled at.
    pub path: String,
    /// The response shape used when polling.
    pub style: OperationStyle,
}

impl OperationDescriptor {
    /// Extracts the operation from a body carrying a `Requests` section.
    ///
    /// `scope` is the path prefix used when the body has no `href`
    /// (e.g. `"clusters/c1/"`).
    #[must_use]
    pub fn from_requests(body: &Value, scope: &str) -> Option<Self> {
        let section = body.get("Requests")?;
        Self::from_request_section(section, body.get("href").and_then(Value::as_str), scope)
    }

    /// Builds an operation from the `Requests` section itself.
    #[must_use]
    pub fn from_request_section(section: &Value, href: Option<&str>, scope: &str) -> Option<Self> {
        let request_id = section.get("id").and_then(as_request_id)?;
        let progress_percent = section.get("progress_percent").and_then(Value::as_f64);
        let server_status = section
            .get("request_status")
            .or_else(|| section.get("status"))
            .and_then(Value::as_str)
            .map(ToString::to_string)
            .unwrap_or_else(|| {
                if progress_percent.is_some_and(|p| p >= 100.0) {
                    "COMPLETED".to_string()
                } else {
                    "PENDING".to_string()
                }
            });
        let path = href
            .and_then(relative_path)
            .unwrap_or_else(|| format!("{scope}requests/{request_id}"));

        Some(Self {
            request_id,
            status: OperationStatus::from_server(&server_status),
            server_status,
            progress_percent,
            path,
            style: OperationStyle::Request,
        })
    }

    /// Extracts the operation from a bootstrap response.
    ///
    /// Only the creation response carries `requestId`, so polls pass the id
    /// they already know.
    #[must_use]
    pub fn from_bootstrap(body: &Value, known_id: Option<u64>) -> Option<Self> {
        let request_id = body
            .get("requestId")
            .and_then(as_request_id)
            .or(known_id)?;
        let server_status = body.get("status").and_then(Value::as_str)?.to_string();

        Some(Self {
            request_id,
            status: OperationStatus::from_server(&server_status),
            server_status,
            progress_percent: None,
            path: format!("bootstrap/{request_id}"),
            style: OperationStyle::Bootstrap,
        })
    }

    /// Builds an operation from the `Tasks` section of a task polled at `path`.
    #[must_use]
    pub fn from_task_section(section: &Value, path: impl Into<String>) -> Option<Self> {
        let request_id = section.get("id").and_then(as_request_id)?;
        let server_status = section.get("status").and_then(Value::as_str)?.to_string();

        Some(Self {
            request_id,
            status: OperationStatus::from_server(&server_status),
            server_status,
            progress_percent: None,
            path: path.into(),
            style: OperationStyle::Task,
        })
    }

    /// Re-reads this operation from a freshly polled body.
    #[must_use]
    pub fn observe(&self, body: &Value) -> Option<Self> {
        match self.style {
            OperationStyle::Request => {
                let section = body.get("Requests")?;
                let mut observed = Self::from_request_section(section, None, "")?;
                observed.path.clone_from(&self.path);
                Some(observed)
            }
            OperationStyle::Bootstrap => Self::from_bootstrap(body, Some(self.request_id)),
            OperationStyle::Task => Self::from_task_section(body.get("Tasks")?, self.path.as_str()),
        }
    }

    /// Returns `true` if the operation finished unsuccessfully.
    ///
    /// A task fails on any status outside `PENDING`, `QUEUED`,
    /// `IN_PROGRESS` and `COMPLETED`.
    #[must_use]
    pub fn has_failed(&self) -> bool {
        match self.style {
            OperationStyle::Request | OperationStyle::Bootstrap => self.status.is_failure(),
            OperationStyle::Task => !matches!(
                self.server_status.trim().to_ascii_uppercase().as_str(),
                "PENDING" | "QUEUED" | "IN_PROGRESS" | "COMPLETED"
            ),
        }
    }

    /// Returns `true` if the operation finished successfully.
    ///
    /// A request is finished once its progress reaches 100%, whatever its
    /// status says.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        match self.style {
            OperationStyle::Request => {
                self.status == OperationStatus::Completed
                    || self.progress_percent.is_some_and(|p| p >= 100.0)
            }
            OperationStyle::Bootstrap | OperationStyle::Task => {
                self.status == OperationStatus::Completed
            }
        }
    }

    /// Returns `true` once the operation can no longer change.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.has_failed() || self.is_finished()
    }
}

fn as_request_id(value: &Value) -> Option<u64> {
    value
        .as_u64()
        .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
}
