use std::{sync::Arc, time::Duration};

use bastion_core::SupportsRevocationSweep;
use tokio::{
    task::JoinHandle,
    time::{MissedTickBehavior, interval},
};

/// Periodically drops revocation entries whose tokens have expired.
///
/// The first sweep runs immediately. A failed sweep is logged and retried on the next tick.
pub fn spawn_revocation_sweeper<A>(scheme: Arc<A>, every: Duration) -> JoinHandle<()>
where
    A: SupportsRevocationSweep,
{
    tokio::spawn(async move {
        let mut ticker = interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            match scheme.sweep_revocations().await {
                Ok(removed) => tracing::debug!(removed, "Revocation sweep finished"),
                Err(e) => tracing::warn!(error = %e, "Revocation sweep failed"),
            }
        }
    })
}
