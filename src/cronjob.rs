//! Cronjob module for scheduled triggers.
//!
//! The built-in trigger source: one cron job per payload-less trigger. Jobs only
//! put their trigger on the bus; the trigger loop decides nothing about timing.

use log::{error, info};
use tokio::sync::mpsc::UnboundedSender;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::bus::Trigger;
use crate::config::Schedule;

/// Pairs each schedule entry with the trigger it fires.
pub fn scheduled_triggers(schedule: &Schedule) -> Vec<(String, Trigger)> {
    vec![
        (schedule.retweet.clone(), Trigger::Retweet),
        (schedule.favorite.clone(), Trigger::Favorite),
        (schedule.follow.clone(), Trigger::Follow),
        (schedule.content.clone(), Trigger::ContentRichTweet),
        (schedule.advertising.clone(), Trigger::AdvertisingTweet),
        (schedule.prune.clone(), Trigger::Prune),
        (schedule.retweeters.clone(), Trigger::CheckForRetweeters),
        (schedule.thank_yous.clone(), Trigger::CheckForThankYouTweets),
    ]
}

/// Builds the job scheduler that feeds `triggers`.
///
/// # Returns
///
/// - `Ok(JobScheduler)`: The configured, not yet started, scheduler
/// - `Err(...)`: If the scheduler cannot be created or a cron expression is invalid
pub async fn start_trigger_cronjob(
    schedule: &Schedule,
    triggers: UnboundedSender<Trigger>,
) -> Result<JobScheduler, Box<dyn std::error::Error + Send + Sync>> {
    let sched = JobScheduler::new().await?;

    for (expression, trigger) in scheduled_triggers(schedule) {
        let tx = triggers.clone();
        let job_trigger = trigger.clone();
        let job = Job::new_async(expression.as_str(), move |_uuid, _l| {
            let tx = tx.clone();
            let trigger = job_trigger.clone();
            Box::pin(async move {
                info!("Scheduled trigger firing: {}", trigger.name());
                if let Err(e) = tx.send(trigger) {
                    error!("Failed to enqueue scheduled trigger: {}", e);
                }
            })
        })?;
        sched.add(job).await?;
        info!("Scheduled '{}' at '{}'", trigger.name(), expression);
    }

    Ok(sched)
}
