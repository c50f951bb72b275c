//! Tier selection: map a final score onto the named band it falls in.

use serde::Serialize;

use crate::error::ConfigError;

/// One scoring band. `key` is the stable identifier the hit store counts
/// under; `label` is the human-facing display text.
#[derive(Debug, Clone, Serialize)]
pub struct Tier {
    pub min_score: f64,
    pub key: String,
    pub label: String,
}

impl Tier {
    pub fn new(min_score: f64, key: &str, label: &str) -> Self {
        Self {
            min_score,
            key: key.to_string(),
            label: label.to_string(),
        }
    }
}

/// Ordered tier thresholds, descending by `min_score`. Invariant: exactly
/// one tier has `min_score == 0`, so every score in [0, 100] resolves.
#[derive(Debug, Clone)]
pub struct TierTable {
    tiers: Vec<Tier>,
}

impl TierTable {
    pub fn new(tiers: Vec<Tier>) -> Result<Self, ConfigError> {
        if tiers.is_empty() {
            return Err(ConfigError::Validation("tier table is empty".into()));
        }

        for pair in tiers.windows(2) {
            if pair[0].min_score <= pair[1].min_score {
                return Err(ConfigError::Validation(format!(
                    "tier thresholds must be strictly descending: `{}` ({}) does not dominate `{}` ({})",
                    pair[0].key, pair[0].min_score, pair[1].key, pair[1].min_score
                )));
            }
        }

        let floors = tiers.iter().filter(|tier| tier.min_score == 0.0).count();
        if floors != 1 {
            return Err(ConfigError::Validation(format!(
                "exactly one tier must have a zero minimum, found {floors}"
            )));
        }

        Ok(Self { tiers })
    }

    /// First threshold at or below the score wins, so a score landing
    /// exactly on a boundary resolves to the higher tier.
    pub fn select(&self, final_score: f64) -> &Tier {
        for tier in &self.tiers {
            if tier.min_score <= final_score {
                return tier;
            }
        }
        // unreachable for scores in [0, 100]: the validated zero floor
        // matched above; anything else still gets the floor tier
        &self.tiers[self.tiers.len() - 1]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Tier> {
        self.tiers.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.tiers.iter().map(|tier| tier.key.as_str())
    }
}
