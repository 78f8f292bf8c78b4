//! In-process trigger for the deadline sweep.

use domain_books::{BookRepository, BookService};
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info};

/// Builds the cron job that runs one sweep per tick.
pub fn sweep_job<R: BookRepository + 'static>(
    schedule: &str,
    service: BookService<R>,
) -> eyre::Result<Job> {
    let job = Job::new_async(schedule, move |_uuid, _l| {
        let service = service.clone();

        Box::pin(async move {
            info!("Running scheduled deadline sweep");

            match service.sweep_now().await {
                Ok(report) => info!(
                    candidates = report.candidates,
                    notified = report.notified,
                    "Scheduled sweep complete"
                ),
                Err(e) => error!(error = %e, "Scheduled sweep failed"),
            }
        })
    })?;

    Ok(job)
}

/// Starts a scheduler running the sweep on `schedule`.
///
/// The returned handle must be shut down on exit.
pub async fn start<R: BookRepository + 'static>(
    schedule: &str,
    service: BookService<R>,
) -> eyre::Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;
    scheduler.add(sweep_job(schedule, service)?).await?;
    scheduler.start().await?;

    info!(schedule, "Deadline sweep scheduler started");
    Ok(scheduler)
}
