//! Housekeeping jobs that run periodically alongside the server or
//! once through the `maintenance` CLI subcommand.
use chrono::{DateTime, TimeDelta, Utc};
use foodie_error::ext::ResultExt;
use foodie_error::{Error, ErrorCategory, Result};
use foodie_model::activity::UserActivity;
use foodie_model::counter::Counter;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::App;

#[derive(Debug, Error)]
#[error("Could not run maintenance job")]
pub struct MaintenanceError;

/// Deletes activity records older than `retention_days` days.
///
/// Returns the amount of deleted records.
#[tracing::instrument(skip(app), name = "maintenance.purge_activities")]
pub async fn purge_activities(app: &App, retention_days: u32) -> Result<u64, MaintenanceError> {
    let cutoff = retention_cutoff(Utc::now(), retention_days).ok_or_else(|| {
        Error::new(ErrorCategory::InvalidRequest, MaintenanceError)
            .attach_printable(format!("retention of {retention_days} days is out of range"))
    })?;

    let mut conn = app.db_write().await.change_context(MaintenanceError)?;
    let purged = UserActivity::purge_older_than(&mut conn, cutoff)
        .await
        .change_context(MaintenanceError)?;
    conn.commit().await.change_context(MaintenanceError)?;

    info!(%cutoff, "purged {purged} old activities");
    Ok(purged)
}

fn retention_cutoff(now: DateTime<Utc>, retention_days: u32) -> Option<DateTime<Utc>> {
    TimeDelta::try_days(i64::from(retention_days)).and_then(|age| now.checked_sub_signed(age))
}

/// Recounts every denormalized counter.
///
/// Returns the amount of counters that were corrected.
#[tracing::instrument(skip_all, name = "maintenance.recount")]
pub async fn recount(app: &App) -> Result<u64, MaintenanceError> {
    let mut conn = app.db_write().await.change_context(MaintenanceError)?;
    let corrected = Counter::recount_all(&mut conn)
        .await
        .change_context(MaintenanceError)?;
    conn.commit().await.change_context(MaintenanceError)?;

    if corrected > 0 {
        warn!("corrected {corrected} drifted counters");
    } else {
        debug!("all counters are consistent");
    }
    Ok(corrected)
}

/// Spawns the periodic activity purge. Returns [`None`] if it is
/// disabled in the configuration.
pub fn spawn(app: App) -> Option<JoinHandle<()>> {
    let period = app.config.maintenance.interval()?;
    let retention_days = app.config.maintenance.activity_retention_days;

    let handle = tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;
            if let Err(error) = purge_activities(&app, retention_days).await {
                warn!(%error, "scheduled activity purge failed");
            }
        }
    });

    info!(?period, "scheduled activity purge");
    Some(handle)
}
