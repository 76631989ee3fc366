use bastion_core::{AuthError, Clock, RevocationStore};

use crate::attempt_tracker::AttemptTracker;

/// Garbage-collects revocation entries whose tokens have expired, and stale attempt records
/// along the way.
pub struct SweepRevocationsUseCase<'a, R, C>
where
    R: RevocationStore,
    C: Clock,
{
    revocations: &'a R,
    attempts: &'a AttemptTracker<C>,
    clock: &'a C,
}

impl<'a, R, C> SweepRevocationsUseCase<'a, R, C>
where
    R: RevocationStore,
    C: Clock,
{
    pub fn new(revocations: &'a R, attempts: &'a AttemptTracker<C>, clock: &'a C) -> Self {
        Self {
            revocations,
            attempts,
            clock,
        }
    }

    /// Returns the number of revocation entries removed.
    #[tracing::instrument(name = "SweepRevocationsUseCase::execute", skip_all)]
    pub async fn execute(&self) -> Result<u64, AuthError> {
        let removed = self.revocations.sweep_expired(self.clock.now()).await?;
        let evicted = self.attempts.evict_stale();
        tracing::info!(removed, evicted, "Swept expired revocations");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use bastion_core::{RevocationEntry, TokenId};
    use chrono::Duration;

    use super::*;
    use crate::test_support::TestHarness;

    #[tokio::test]
    async fn test_sweep_removes_only_expired_entries() {
        let harness = TestHarness::new();
        let now = harness.clock.now();
        let expired = TokenId::new();
        let live = TokenId::new();
        harness
            .revocations
            .revoke(RevocationEntry::new(expired.clone(), now + Duration::minutes(1)))
            .await
            .unwrap();
        harness
            .revocations
            .revoke(RevocationEntry::new(live.clone(), now + Duration::days(1)))
            .await
            .unwrap();
        harness.clock.advance(Duration::minutes(2));

        let removed = SweepRevocationsUseCase::new(
            &harness.revocations,
            &harness.attempts,
            &harness.clock,
        )
        .execute()
        .await
        .unwrap();

        assert_eq!(removed, 1);
        assert!(!harness.revocations.is_revoked(&expired).await.unwrap());
        assert!(harness.revocations.is_revoked(&live).await.unwrap());
    }
}
