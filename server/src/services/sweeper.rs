//! Invitation expiry sweeper: background task.
//!
//! DESIGN
//! ======
//! A fixed-interval tokio task marks invitations past their expiry as
//! expired. The ledger lock is held only for the synchronous sweep, so the
//! task interleaves with request handlers instead of racing them.
//!
//! ERROR HANDLING
//! ==============
//! A sweep has no failure mode of its own. If one panics, the panic is
//! logged and the next tick sweeps again.

use std::panic::AssertUnwindSafe;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

use super::invitation::InvitationLedger;

/// Spawn the periodic sweep. Returns a handle for shutdown.
pub fn spawn_sweeper_task(ledger: InvitationLedger, interval: Duration) -> JoinHandle<()> {
    info!(interval_secs = interval.as_secs(), "invitation sweeper configured");
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first tick completes immediately; skip it so startup does not sweep.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            sweep_once(&ledger);
        }
    })
}

/// Run one sweep, logging the outcome. Returns how many records expired.
pub fn sweep_once(ledger: &InvitationLedger) -> usize {
    match std::panic::catch_unwind(AssertUnwindSafe(|| ledger.cleanup_expired())) {
        Ok(0) => {
            debug!("invitation sweep found nothing to expire");
            0
        }
        Ok(count) => {
            info!(count, "invitation sweep expired invitations");
            count
        }
        Err(_) => {
            error!("invitation sweep panicked; retrying next interval");
            0
        }
    }
}

#[cfg(test)]
#[path = "sweeper_test.rs"]
mod tests;
