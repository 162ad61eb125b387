//! Periodic reclamation of expired holds.
//!
//! Spawns from `main` as a background task running on a fixed interval,
//! independent of request traffic, so a session that closes its browser
//! without releasing still has its hold reclaimed within one interval.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::coordinator::ReservationCoordinator;

/// Run the expiry sweep loop.
///
/// Sweeps are best-effort and idempotent: a row that moved between the scan
/// and the conditional write fails its compare-and-swap harmlessly and is
/// picked up (or not) next tick. Runs until `cancel` is triggered.
pub async fn run(coordinator: Arc<ReservationCoordinator>, cancel: CancellationToken) {
    let period = Duration::from_secs(coordinator.config().sweep_interval_secs);

    tracing::info!(interval_secs = period.as_secs(), "Expiry sweeper started");

    let mut interval = tokio::time::interval(period);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Expiry sweeper stopping");
                break;
            }
            _ = interval.tick() => {
                match coordinator.sweep_expired_holds().await {
                    Ok(reclaimed) => {
                        if reclaimed > 0 {
                            tracing::info!(reclaimed, "Expiry sweep reclaimed holds");
                        } else {
                            tracing::debug!("Expiry sweep found nothing to reclaim");
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Expiry sweep failed");
                    }
                }
            }
        }
    }
}
