//! Concurrent fan-out over a fixed set of containers

use crate::docker::ClientError;
use crate::models::short_id;
use std::fmt;
use std::future::Future;
use thiserror::Error;
use tokio::task::JoinSet;
use tokio::time::Instant;

/// Per-id results of a batch run, in input order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub succeeded: Vec<String>,
    pub failed: Vec<(String, String)>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn into_result(self) -> Result<BatchReport, BatchError> {
        if self.failed.is_empty() {
            Ok(self)
        } else {
            Err(BatchError {
                failures: self.failed,
            })
        }
    }
}

/// Every failing id with its cause
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct BatchError {
    pub failures: Vec<(String, String)>,
}

impl BatchError {
    pub fn failed_ids(&self) -> Vec<&str> {
        self.failures.iter().map(|(id, _)| id.as_str()).collect()
    }
}

impl fmt::Display for BatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .failures
            .iter()
            .map(|(id, cause)| format!("{}: {}", short_id(id), cause))
            .collect();
        write!(f, "group operation failed: [{}]", parts.join(", "))
    }
}

/// Run `op` once per id, all concurrently, and wait for every one.
///
/// Each task is bounded by the shared `deadline`; a failure never cancels
/// the others. Dropping the returned future aborts the tasks still running.
pub async fn run_batch<F, Fut>(ids: Vec<String>, deadline: Instant, op: F) -> BatchReport
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<(), ClientError>> + Send + 'static,
{
    let budget = deadline.saturating_duration_since(Instant::now());
    let mut tasks = JoinSet::new();

    for (index, id) in ids.iter().enumerate() {
        let fut = op(id.clone());
        tasks.spawn(async move {
            let result = match tokio::time::timeout_at(deadline, fut).await {
                Ok(result) => result.map_err(|e| e.to_string()),
                Err(_) => Err(ClientError::timeout("batch operation", budget).to_string()),
            };
            (index, result)
        });
    }

    let mut results: Vec<Option<Result<(), String>>> = vec![None; ids.len()];
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, result)) => results[index] = Some(result),
            Err(e) => tracing::error!("batch task failed to join: {}", e),
        }
    }

    let mut report = BatchReport::default();
    for (id, result) in ids.into_iter().zip(results) {
        match result {
            Some(Ok(())) => report.succeeded.push(id),
            Some(Err(cause)) => report.failed.push((id, cause)),
            None => report.failed.push((id, "task aborted".to_string())),
        }
    }

    tracing::info!(
        succeeded = report.succeeded.len(),
        failed = report.failed.len(),
        "batch finished"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_empty_batch_succeeds() {
        let report = run_batch(vec![], Instant::now() + Duration::from_secs(1), |_| async {
            Ok(())
        })
        .await;
        assert_eq!(report.total(), 0);
        assert!(report.into_result().is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_bounds_slow_tasks() {
        let ids = vec!["fast".to_string(), "slow".to_string()];
        let report = run_batch(ids, Instant::now() + Duration::from_secs(5), |id| async move {
            if id == "slow" {
                tokio::time::sleep(Duration::from_secs(60)).await;
            }
            Ok(())
        })
        .await;

        assert_eq!(report.succeeded, vec!["fast"]);
        let err = report.into_result().unwrap_err();
        insta::assert_snapshot!(err.to_string(), @"group operation failed: [slow: batch operation timed out after 5s]");
    }

    #[test]
    fn test_error_uses_short_ids() {
        let err = BatchError {
            failures: vec![
                ("0123456789abcdef".to_string(), "boom".to_string()),
                ("b".to_string(), "gone".to_string()),
            ],
        };
        insta::assert_snapshot!(err.to_string(), @"group operation failed: [0123456789ab: boom, b: gone]");
    }
}
