//! Tolerant field lookup for provider payloads.
//!
//! Twelve Labs has returned task and video ids under different keys across
//! API versions. Each lookup is an ordered list of JSON pointers; the first
//! pointer that resolves to a non-empty string wins.

use serde_json::Value;

/// Accepted locations of the task id in a task-creation response.
pub const TASK_ID_FIELDS: &[&str] = &["/id", "/task_id", "/_id"];

/// Accepted locations of the resulting video id in a task payload.
pub const TASK_VIDEO_ID_FIELDS: &[&str] = &["/video_id", "/data/video_id"];

/// Return the first non-empty string found at any of `pointers`.
pub fn first_string(value: &Value, pointers: &[&str]) -> Option<String> {
    pointers
        .iter()
        .filter_map(|p| value.pointer(p))
        .filter_map(Value::as_str)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}
