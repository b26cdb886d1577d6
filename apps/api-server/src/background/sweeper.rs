//! Periodic cleanup of expired sessions using tokio-cron-scheduler.
//!
//! Expiry is already enforced lazily at lookup; the sweep keeps dead rows
//! from accumulating in the store.

use std::sync::Arc;

use chrono::Utc;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use murmur_core::ports::SessionStore;

/// Start the sweeper on the given six-field cron schedule. The returned
/// scheduler must be kept alive for the jobs to keep firing.
pub async fn start(
    sessions: Arc<dyn SessionStore>,
    schedule: &str,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;

    let job = Job::new_async(schedule, move |_uuid, _lock| {
        let sessions = sessions.clone();
        Box::pin(async move {
            match sessions.purge_expired(Utc::now()).await {
                Ok(0) => tracing::debug!("session sweep: nothing expired"),
                Ok(purged) => tracing::info!(purged, "session sweep: expired sessions removed"),
                Err(e) => tracing::warn!(error = %e, "session sweep failed"),
            }
        })
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;
    tracing::info!(schedule = %schedule, "session sweeper started");

    Ok(scheduler)
}
