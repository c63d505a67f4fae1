//! Background maintenance jobs.
//!
//! The consolidation job runs in a single spawned task on a fixed
//! interval. Shutdown is cooperative through a watch channel; an
//! in-flight run finishes before the task exits.

use std::sync::Arc;
use std::time::Duration;

use rbk_domain::ports::services::ConsolidationServiceInterface;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

/// Handle to a running maintenance job.
pub struct MaintenanceHandle {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl MaintenanceHandle {
    /// Signal the job to stop and wait for it to finish.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        if let Err(e) = self.handle.await {
            error!(error = %e, "maintenance job did not shut down cleanly");
        }
    }
}

/// Spawn the periodic consolidation job.
///
/// The first run happens one full period after startup; missed ticks are
/// delayed, not bursted.
#[must_use]
pub fn spawn_consolidation_job(
    service: Arc<dyn ConsolidationServiceInterface>,
    period: Duration,
) -> MaintenanceHandle {
    let (shutdown, mut observed) = watch::channel(false);
    let handle = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // An interval's first tick completes immediately; consume it.
        ticker.tick().await;
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match service.consolidate().await {
                        Ok(stats) => info!(
                            pruned = stats.pruned,
                            merged = stats.merged,
                            archived = stats.archived,
                            success = stats.success,
                            "scheduled consolidation finished"
                        ),
                        Err(e) => error!(error = %e, "scheduled consolidation failed"),
                    }
                }
                changed = observed.changed() => {
                    if changed.is_err() || *observed.borrow() {
                        break;
                    }
                }
            }
        }
        info!("maintenance job stopped");
    });
    MaintenanceHandle { shutdown, handle }
}
