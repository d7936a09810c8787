//! Scheduled background tasks using tokio-cron-scheduler.
//!
//! One periodic task: a full employer enrichment pass.
//!
//! ```text
//! Scheduler (ENRICH_SCHEDULE, default daily 14:05)
//!     │
//!     ├─► (optional) any employer created within RECENT_WINDOW_HOURS?
//!     │       └─► no → skip this tick
//!     └─► run_to_completion(page_size)
//! ```
//!
//! Nobody waits on a scheduled pass, so failures are only logged. A tick may
//! overlap a pass triggered over HTTP; the two are not serialized.

use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use jboard_client::Employer;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::domains::employers::EmployerReconciler;

/// Settings for the enrichment job.
#[derive(Debug, Clone)]
pub struct EnrichmentSchedule {
    /// Six-field cron expression (seconds first)
    pub cron: String,
    pub page_size: u32,
    /// Only run when some employer was created this recently
    pub recent_window: Option<Duration>,
}

/// Start all scheduled tasks
pub async fn start_scheduler(
    reconciler: Arc<EmployerReconciler>,
    schedule: EnrichmentSchedule,
) -> Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;

    let job_schedule = schedule.clone();
    let enrich_job = Job::new_async(schedule.cron.as_str(), move |_uuid, _lock| {
        let reconciler = reconciler.clone();
        let schedule = job_schedule.clone();
        Box::pin(async move {
            if let Err(e) = run_scheduled_enrichment(&reconciler, &schedule).await {
                tracing::error!("Scheduled employer enrichment failed: {}", e);
            }
        })
    })?;

    scheduler.add(enrich_job).await?;
    scheduler.start().await?;

    tracing::info!(cron = %schedule.cron, "Scheduled tasks started (employer enrichment)");
    Ok(scheduler)
}

/// Run one scheduled pass.
///
/// Returns `Ok(false)` when the recent-employer check skipped the pass.
pub async fn run_scheduled_enrichment(
    reconciler: &EmployerReconciler,
    schedule: &EnrichmentSchedule,
) -> Result<bool> {
    tracing::info!("Running scheduled job: updating employer data");

    if let Some(window) = schedule.recent_window {
        let employers = reconciler
            .deps()
            .directory
            .fetch_all(schedule.page_size)
            .await?;
        if !any_created_within(&employers, window, Utc::now()) {
            tracing::info!(
                window_hours = window.num_hours(),
                "No recently created employers, skipping enrichment"
            );
            return Ok(false);
        }
    }

    let summary = reconciler.run_to_completion(schedule.page_size).await?;
    tracing::info!(
        patched = summary.patched,
        failed = summary.failed,
        "Scheduled job completed successfully"
    );
    Ok(true)
}

/// Whether any employer's `created_at` falls within `window` before `now`.
///
/// Records with a missing or unparseable timestamp do not count.
pub fn any_created_within(employers: &[Employer], window: Duration, now: DateTime<Utc>) -> bool {
    employers
        .iter()
        .filter_map(Employer::created_at_utc)
        .any(|created| created <= now && now - created <= window)
}
