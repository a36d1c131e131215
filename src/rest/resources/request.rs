//! Asynchronous requests and their tasks.

use crate::rest::kind::{Capabilities, Relationship, ResourceKind};
use crate::rest::operation::OperationStyle;

/// `clusters/{cluster_name}/requests/{id}`
///
/// The id is assigned by the server, so requests are created through a
/// keyless [`Collection::create`](crate::rest::Collection::create). A request
/// is its own pending operation.
pub static REQUEST: ResourceKind = ResourceKind {
    name: "Request",
    path: "requests",
    data_key: Some("Requests"),
    primary_key: "id",
    fields: &[
        "id",
        "request_context",
        "status",
        "request_status",
        "progress_percent",
        "queued_task_count",
        "task_count",
        "completed_task_count",
        "type",
        "operation_level",
        "exclusive",
        "aborted_task_count",
        "create_time",
        "end_time",
        "failed_task_count",
        "inputs",
        "request_schedule",
        "resource_filters",
        "start_time",
        "timed_out_task_count",
    ],
    relationships: &[Relationship {
        name: "tasks",
        kind: &TASK,
    }],
    capabilities: Capabilities {
        list: true,
        create: true,
        update: true,
        delete: false,
    },
    operation: Some(OperationStyle::Request),
    readiness: None,
    wait: ResourceKind::DEFAULT_WAIT,
};

/// `clusters/{cluster_name}/requests/{request_id}/tasks/{id}`
///
/// A task is its own pending operation, like its request.
pub static TASK: ResourceKind = ResourceKind {
    name: "Task",
    path: "tasks",
    data_key: Some("Tasks"),
    primary_key: "id",
    fields: &[
        "id",
        "cluster_name",
        "host_name",
        "request_id",
        "exit_code",
        "stdout",
        "stderr",
        "status",
        "attempt_cnt",
        "command",
        "role",
        "start_time",
        "stage_id",
        "end_time",
        "error_log",
        "output_log",
        "command_detail",
        "structured_out",
        "custom_command_name",
    ],
    relationships: &[],
    capabilities: Capabilities::READ_ONLY,
    operation: Some(OperationStyle::Task),
    readiness: None,
    wait: ResourceKind::DEFAULT_WAIT,
};
