// Presence Updater - rotates the bot's "Playing" status

use std::time::Duration;

use poise::serenity_prelude as serenity;
use rand::seq::IndexedRandom;
use tracing::{debug, info};

/// Pick the next status to show
pub fn pick_status(statuses: &[String]) -> Option<&str> {
    statuses.choose(&mut rand::rng()).map(String::as_str)
}

/// Go online and start rotating the activity every `interval`
///
/// The task runs for the lifetime of the process and shares nothing with
/// message handling.
pub fn spawn_presence_updater(
    ctx: serenity::Context,
    statuses: Vec<String>,
    interval: Duration,
) -> tokio::task::JoinHandle<()> {
    ctx.online();
    info!(
        "Rotating presence across {} status(es) every {:?}",
        statuses.len(),
        interval
    );

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            if let Some(status) = pick_status(&statuses) {
                debug!("Setting activity to {}", status);
                ctx.set_activity(Some(serenity::ActivityData::playing(status)));
            }
        }
    })
}
