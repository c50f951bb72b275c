//! Static scoring definitions: the six categories, their weights, and the
//! tier thresholds. Built once at process start, validated, then passed
//! explicitly into the evaluator — never mutated afterwards.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

use super::tier::{Tier, TierTable};
use crate::error::ConfigError;

/// The six photo-quality dimensions, in their fixed wire order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    AsRefStr,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Category {
    Focus,
    Exposure,
    Color,
    Composition,
    Resolution,
    FaceDetection,
}

/// One model judgment for a single category: a score on the 0–5 half-point
/// grid plus a short human-readable reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryJudgment {
    pub score: f64,
    pub reason: String,
}

/// Validated model output: one judgment per category plus the overall
/// comment. The final score is never part of this — it is always derived.
#[derive(Debug, Clone)]
pub struct Assessment {
    pub judgments: BTreeMap<Category, CategoryJudgment>,
    pub comment: String,
}

const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// Per-category weights. Invariant: every category has a positive weight and
/// the weights sum to exactly 1.0, so the weighted score tops out at 5.
#[derive(Debug, Clone)]
pub struct WeightTable {
    weights: BTreeMap<Category, f64>,
}

impl WeightTable {
    pub fn new(weights: BTreeMap<Category, f64>) -> Result<Self, ConfigError> {
        for category in Category::iter() {
            match weights.get(&category) {
                Some(weight) if *weight > 0.0 => {}
                Some(weight) => {
                    return Err(ConfigError::Validation(format!(
                        "weight for `{category}` must be positive, got {weight}"
                    )));
                }
                None => {
                    return Err(ConfigError::Validation(format!(
                        "missing weight for `{category}`"
                    )));
                }
            }
        }

        let sum: f64 = weights.values().sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ConfigError::Validation(format!(
                "weights sum to {sum}, expected 1.0"
            )));
        }

        Ok(Self { weights })
    }

    /// The reference weight configuration.
    pub fn reference() -> Result<Self, ConfigError> {
        Self::new(BTreeMap::from([
            (Category::Focus, 0.25),
            (Category::Exposure, 0.15),
            (Category::Color, 0.15),
            (Category::Composition, 0.20),
            (Category::Resolution, 0.10),
            (Category::FaceDetection, 0.15),
        ]))
    }

    pub fn get(&self, category: Category) -> f64 {
        self.weights.get(&category).copied().unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, f64)> + '_ {
        self.weights.iter().map(|(category, weight)| (*category, *weight))
    }
}

/// The immutable process-wide scoring configuration bundle.
#[derive(Debug, Clone)]
pub struct Scoring {
    pub weights: WeightTable,
    pub tiers: TierTable,
}

impl Scoring {
    /// Build and validate the reference configuration.
    pub fn reference() -> Result<Self, ConfigError> {
        Ok(Self {
            weights: WeightTable::reference()?,
            tiers: reference_tiers()?,
        })
    }
}

fn reference_tiers() -> Result<TierTable, ConfigError> {
    TierTable::new(vec![
        Tier::new(96.0, "master", "🎨 사진 예술의 거장"),
        Tier::new(86.0, "expert", "📷 감각이 뛰어난 전문가"),
        Tier::new(71.0, "skilled", "📸 감성을 아는 실력자"),
        Tier::new(51.0, "growing", "🔍 성장 중인 사진가"),
        Tier::new(26.0, "novice", "🤳 아직은 미숙한 도전자"),
        Tier::new(0.0, "hopeless", "💩 기준 미달의 똥손"),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_serializes_snake_case() {
        assert_eq!(Category::FaceDetection.to_string(), "face_detection");
        assert_eq!(Category::Focus.as_ref(), "focus");
    }

    #[test]
    fn category_parses_from_wire_name() {
        assert_eq!("face_detection".parse::<Category>(), Ok(Category::FaceDetection));
        assert!("sharpness".parse::<Category>().is_err());
    }

    #[test]
    fn category_order_is_wire_order() {
        let order: Vec<Category> = Category::iter().collect();
        assert_eq!(
            order,
            vec![
                Category::Focus,
                Category::Exposure,
                Category::Color,
                Category::Composition,
                Category::Resolution,
                Category::FaceDetection,
            ]
        );
    }

    #[test]
    fn reference_scoring_validates() {
        let scoring = Scoring::reference().unwrap();
        assert_eq!(scoring.weights.get(Category::Focus), 0.25);
        assert_eq!(scoring.tiers.iter().count(), 6);
    }

    #[test]
    fn weight_table_rejects_bad_sum() {
        let mut weights: BTreeMap<Category, f64> =
            Category::iter().map(|c| (c, 0.1)).collect();
        weights.insert(Category::Focus, 0.2);
        let err = WeightTable::new(weights).unwrap_err();
        assert!(err.to_string().contains("sum"));
    }

    #[test]
    fn weight_table_rejects_missing_category() {
        let mut weights = BTreeMap::new();
        weights.insert(Category::Focus, 1.0);
        let err = WeightTable::new(weights).unwrap_err();
        assert!(err.to_string().contains("missing weight"));
    }

    #[test]
    fn weight_table_rejects_non_positive_weight() {
        let mut weights: BTreeMap<Category, f64> = WeightTable::reference()
            .unwrap()
            .iter()
            .collect();
        weights.insert(Category::Resolution, 0.0);
        assert!(WeightTable::new(weights).is_err());
    }
}
