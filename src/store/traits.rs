use async_trait::async_trait;

/// Result of one hit recording attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// The tier's count was incremented by exactly one.
    Recorded,
    /// The tier key has no record in the store (configuration drift between
    /// the tier table and the persisted counters). Non-fatal by contract.
    UnknownTier,
}

/// Persisted per-tier award counters.
///
/// `record_hit` must be an atomic increment: concurrent evaluations landing
/// on the same tier each contribute exactly one, with no lost updates. A
/// bare read-then-write-back sequence is not a valid implementation.
#[async_trait]
pub trait TierHitStore: Send + Sync {
    /// Durably add one hit to the tier's count.
    async fn record_hit(&self, tier_key: &str) -> anyhow::Result<HitOutcome>;

    /// Current count for a tier, `None` when the key is unknown.
    async fn hits(&self, tier_key: &str) -> anyhow::Result<Option<i64>>;
}
