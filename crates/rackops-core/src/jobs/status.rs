//! Completion status derivation.
//!
//! Two raw inputs produce the same [`JobStatus`] shape: a poll response keyed
//! by job id, and the data object of a completion envelope from the push
//! channel. Both share the first-failure selection rule: among failed steps,
//! the one with the smallest `runOrder` (first chronological failure) wins.
//!
//! Malformed or incomplete input always resolves to pending, never to an
//! error, so a half-written response can never produce a false completion.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::jobs::types::{JobStatus, StepResult};

/// Delimiter inside step names: `<module>_|-<id>_|-<name>_|-<function>`.
const STEP_NAME_DELIMITER: &str = "_|-";

/// Derive status from a poll response for `job_id`.
///
/// Expected shape:
/// `{"return": [ { "<job_id>": { "Result": { "<step>": {...} } } } ] }`.
/// A missing `Result` means the job is still running, not an error.
pub fn resolve_from_poll(response: &Value, job_id: &str) -> JobStatus {
    let Some(entries) = response.get("return").and_then(Value::as_array) else {
        return JobStatus::pending();
    };

    let Some(result) = entries
        .iter()
        .filter_map(Value::as_object)
        .find_map(|entry| entry.get(job_id))
        .and_then(|job| job.get("Result"))
        .and_then(Value::as_object)
    else {
        return JobStatus::pending();
    };

    // A step that does not deserialize means the response shape is not the
    // one we expect; treat the whole job as still running.
    let mut steps = BTreeMap::new();
    for (name, value) in result {
        match serde_json::from_value::<StepResult>(value.clone()) {
            Ok(step) => {
                steps.insert(name.clone(), step);
            }
            Err(_) => return JobStatus::pending(),
        }
    }

    if steps.is_empty() {
        return JobStatus::pending();
    }

    if steps.values().all(|step| step.result) {
        JobStatus::succeeded()
    } else {
        failure_status(&steps)
    }
}

/// Derive status from the data object of a completion envelope.
///
/// The payload already carries `{"success": bool, ...steps}`. A missing or
/// non-boolean `success` means the envelope cannot be interpreted; the job
/// stays pending rather than risking a false completion.
pub fn resolve_from_event(data: &Value) -> JobStatus {
    let Some(object) = data.as_object() else {
        return JobStatus::pending();
    };

    let Some(success) = object.get("success").and_then(Value::as_bool) else {
        return JobStatus::pending();
    };

    if success {
        return JobStatus::succeeded();
    }

    // Collect whatever keys parse as steps; event payloads carry extra
    // scalar metadata alongside them.
    let steps: BTreeMap<String, StepResult> = object
        .iter()
        .filter(|(name, _)| name.as_str() != "success")
        .filter_map(|(name, value)| {
            serde_json::from_value::<StepResult>(value.clone())
                .ok()
                .map(|step| (name.clone(), step))
        })
        .collect();

    failure_status(&steps)
}

fn failure_status(steps: &BTreeMap<String, StepResult>) -> JobStatus {
    match select_first_failure(steps) {
        Some((name, step)) => {
            let comment = if step.comment.is_empty() {
                None
            } else {
                Some(step.comment.clone())
            };
            JobStatus::failed(Some(derive_step_id(name)), comment)
        }
        None => JobStatus::failed(None, None),
    }
}

/// Among failed steps, pick the one with the smallest `runOrder`.
fn select_first_failure(steps: &BTreeMap<String, StepResult>) -> Option<(&String, &StepResult)> {
    steps
        .iter()
        .filter(|(_, step)| !step.result)
        .min_by_key(|(_, step)| step.run_order)
}

/// The id segment of a delimited step name; the full name when undelimited.
fn derive_step_id(name: &str) -> String {
    name.split(STEP_NAME_DELIMITER)
        .nth(1)
        .unwrap_or(name)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_poll_first_failure_exposes_comment() {
        let response = json!({
            "return": [
                {"j1": {"Result": {"step_|-a": {"result": false, "comment": "boom", "runOrder": 0}}}}
            ]
        });

        let status = resolve_from_poll(&response, "j1");
        assert!(status.completed);
        assert_eq!(status.success, Some(false));
        assert_eq!(status.comment.as_deref(), Some("boom"));
        assert_eq!(status.failing_step_id.as_deref(), Some("a"));
    }

    #[test]
    fn test_poll_all_steps_passing_is_success() {
        let response = json!({
            "return": [
                {"j1": {"Result": {
                    "pkg_|-install": {"result": true, "comment": "done", "runOrder": 0},
                    "svc_|-start": {"result": true, "comment": "done", "runOrder": 1}
                }}}
            ]
        });

        let status = resolve_from_poll(&response, "j1");
        assert!(status.completed);
        assert_eq!(status.success, Some(true));
        assert!(status.failing_step_id.is_none());
    }

    #[test]
    fn test_poll_selects_chronologically_first_failure() {
        // "z" sorts last by name but fails first by runOrder
        let response = json!({
            "return": [
                {"j1": {"Result": {
                    "a_|-late": {"result": false, "comment": "late failure", "runOrder": 5},
                    "z_|-early": {"result": false, "comment": "early failure", "runOrder": 1}
                }}}
            ]
        });

        let status = resolve_from_poll(&response, "j1");
        assert_eq!(status.comment.as_deref(), Some("early failure"));
        assert_eq!(status.failing_step_id.as_deref(), Some("early"));
    }

    #[test]
    fn test_poll_missing_result_means_still_running() {
        let response = json!({"return": [{"j1": {}}]});
        assert_eq!(resolve_from_poll(&response, "j1"), JobStatus::pending());
    }

    #[test]
    fn test_poll_empty_result_means_still_running() {
        let response = json!({"return": [{"j1": {"Result": {}}}]});
        assert_eq!(resolve_from_poll(&response, "j1"), JobStatus::pending());
    }

    #[test]
    fn test_poll_unknown_job_id_means_still_running() {
        let response = json!({
            "return": [{"other": {"Result": {"s_|-a": {"result": true, "runOrder": 0}}}}]
        });
        assert_eq!(resolve_from_poll(&response, "j1"), JobStatus::pending());
    }

    #[test]
    fn test_poll_malformed_step_means_still_running() {
        let response = json!({
            "return": [{"j1": {"Result": {"step_|-a": {"result": "yes"}}}}]
        });
        assert_eq!(resolve_from_poll(&response, "j1"), JobStatus::pending());
    }

    #[test]
    fn test_poll_malformed_response_means_still_running() {
        assert_eq!(
            resolve_from_poll(&json!("garbage"), "j1"),
            JobStatus::pending()
        );
        assert_eq!(
            resolve_from_poll(&json!({"return": "nope"}), "j1"),
            JobStatus::pending()
        );
    }

    #[test]
    fn test_event_success() {
        let status = resolve_from_event(&json!({"success": true}));
        assert!(status.completed);
        assert_eq!(status.success, Some(true));
    }

    #[test]
    fn test_event_failure_selects_first_failing_step() {
        let status = resolve_from_event(&json!({
            "success": false,
            "fun": "state.apply",
            "disk_|-format": {"result": false, "comment": "device busy", "runOrder": 2},
            "net_|-bond": {"result": false, "comment": "link down", "runOrder": 0}
        }));
        assert!(status.completed);
        assert_eq!(status.success, Some(false));
        assert_eq!(status.comment.as_deref(), Some("link down"));
        assert_eq!(status.failing_step_id.as_deref(), Some("bond"));
    }

    #[test]
    fn test_event_failure_without_steps_still_completes() {
        let status = resolve_from_event(&json!({"success": false}));
        assert!(status.completed);
        assert_eq!(status.success, Some(false));
        assert!(status.comment.is_none());
    }

    #[test]
    fn test_event_missing_success_means_still_running() {
        assert_eq!(resolve_from_event(&json!({})), JobStatus::pending());
        assert_eq!(
            resolve_from_event(&json!({"success": "maybe"})),
            JobStatus::pending()
        );
        assert_eq!(resolve_from_event(&json!(null)), JobStatus::pending());
    }

    #[test]
    fn test_derive_step_id_undelimited_name_passes_through() {
        let status = resolve_from_event(&json!({
            "success": false,
            "plainstep": {"result": false, "comment": "oops", "runOrder": 0}
        }));
        assert_eq!(status.failing_step_id.as_deref(), Some("plainstep"));
    }

    #[test]
    fn test_empty_comment_maps_to_none() {
        let status = resolve_from_event(&json!({
            "success": false,
            "s_|-a": {"result": false, "runOrder": 0}
        }));
        assert!(status.comment.is_none());
        assert_eq!(status.failing_step_id.as_deref(), Some("a"));
    }
}
