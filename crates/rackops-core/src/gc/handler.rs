//! Periodic expiration of completed jobs.
//!
//! The collector only ever looks at jobs that have completed; a job still
//! running is never a candidate, however old its submission. Expiry is
//! measured from `completed_at`, strictly: a job exactly at the window
//! boundary survives the sweep and goes on the next one.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::gc::types::SweepSummary;
use crate::jobs::registry::JobRegistry;

pub struct GarbageCollector {
    registry: JobRegistry,
    interval: Duration,
    expiration_window: ChronoDuration,
}

impl GarbageCollector {
    pub fn new(registry: JobRegistry, interval: Duration, expiration_window: Duration) -> Self {
        Self {
            registry,
            interval,
            // Saturates for windows beyond chrono's range, which only makes
            // expiry later, never earlier
            expiration_window: ChronoDuration::from_std(expiration_window)
                .unwrap_or(ChronoDuration::MAX),
        }
    }

    /// Spawn the sweep loop. Runs until the token is cancelled; the first
    /// sweep happens one full interval after start, not immediately.
    pub fn start(self, token: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!(
                event = "core.gc.started",
                interval_ms = self.interval.as_millis() as u64,
                window_secs = self.expiration_window.num_seconds()
            );

            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            // interval() fires immediately on the first tick; swallow it so
            // freshly completed jobs get at least one full interval of life
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = token.cancelled() => {
                        info!(event = "core.gc.stopped");
                        break;
                    }
                    _ = ticker.tick() => {
                        self.sweep(Utc::now()).await;
                    }
                }
            }
        })
    }

    /// Remove every completed job whose `completed_at` is strictly older
    /// than the expiration window, as of `now`.
    pub async fn sweep(&self, now: DateTime<Utc>) -> SweepSummary {
        let jobs = self.registry.jobs_snapshot().await;
        let mut summary = SweepSummary {
            scanned: jobs.len(),
            ..Default::default()
        };

        for job in jobs {
            if !job.completed {
                continue;
            }
            let Some(completed_at) = job.completed_at else {
                // Completed without a timestamp should be unreachable; leave
                // the job alone rather than guess its age
                warn!(event = "core.gc.completed_without_timestamp", job_id = %job.id);
                continue;
            };
            if now - completed_at <= self.expiration_window {
                continue;
            }

            match self.registry.remove_job(&job.id).await {
                Ok(()) => {
                    info!(
                        event = "core.gc.job_expired",
                        job_id = %job.id,
                        completed_at = %completed_at
                    );
                    summary.removed.push(job.id);
                }
                Err(e) => {
                    // Raced with a manual removal between snapshot and here
                    debug!(event = "core.gc.remove_raced", job_id = %job.id, error = %e);
                }
            }
        }

        if !summary.removed.is_empty() {
            info!(
                event = "core.gc.sweep_done",
                scanned = summary.scanned,
                removed = summary.removed.len()
            );
        }
        summary
    }
}
