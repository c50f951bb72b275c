//! Score aggregation: fold six weighted category scores into one final
//! score on the 0–100 scale.

use std::collections::BTreeMap;

use super::schema::{Category, CategoryJudgment, WeightTable};

/// Rescales the maximum weighted sum (5.0, since weights sum to 1 and the
/// per-category ceiling is 5) up to 100.
const SCALE: f64 = 20.0;

/// Compute the final score from validated category judgments.
///
/// A category absent from the input contributes zero instead of failing;
/// the total stays defined even under partial data. Pure and deterministic.
pub fn final_score(weights: &WeightTable, judgments: &BTreeMap<Category, CategoryJudgment>) -> f64 {
    let weighted: f64 = weights
        .iter()
        .map(|(category, weight)| {
            let score = judgments.get(&category).map_or(0.0, |judgment| judgment.score);
            weight * score
        })
        .sum();

    round_one_decimal(weighted * SCALE)
}

/// Round to one decimal place, half away from zero (`f64::round` ties).
/// The tie rule is pinned by tests; callers must not substitute a
/// banker's-rounding implementation.
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::super::schema::{Category, WeightTable};
    use super::*;
    use strum::IntoEnumIterator;

    fn judgments_with(scores: &[(Category, f64)]) -> BTreeMap<Category, CategoryJudgment> {
        scores
            .iter()
            .map(|(category, score)| {
                (
                    *category,
                    CategoryJudgment {
                        score: *score,
                        reason: "test".into(),
                    },
                )
            })
            .collect()
    }

    fn uniform(score: f64) -> BTreeMap<Category, CategoryJudgment> {
        judgments_with(&Category::iter().map(|c| (c, score)).collect::<Vec<_>>())
    }

    #[test]
    fn all_fives_score_one_hundred() {
        let weights = WeightTable::reference().unwrap();
        assert_eq!(final_score(&weights, &uniform(5.0)), 100.0);
    }

    #[test]
    fn all_zeros_score_zero() {
        let weights = WeightTable::reference().unwrap();
        assert_eq!(final_score(&weights, &uniform(0.0)), 0.0);
    }

    #[test]
    fn reference_vector_scores_73() {
        let weights = WeightTable::reference().unwrap();
        let judgments = judgments_with(&[
            (Category::Focus, 4.0),
            (Category::Exposure, 3.0),
            (Category::Color, 3.0),
            (Category::Composition, 4.0),
            (Category::Resolution, 2.0),
            (Category::FaceDetection, 5.0),
        ]);
        assert_eq!(final_score(&weights, &judgments), 73.0);
    }

    #[test]
    fn missing_category_contributes_zero() {
        let weights = WeightTable::reference().unwrap();
        let mut judgments = uniform(5.0);
        judgments.remove(&Category::Focus);
        // 5.0 everywhere except focus: (1 - 0.25) * 5 * 20 = 75
        assert_eq!(final_score(&weights, &judgments), 75.0);
    }

    #[test]
    fn empty_judgments_score_zero() {
        let weights = WeightTable::reference().unwrap();
        assert_eq!(final_score(&weights, &BTreeMap::new()), 0.0);
    }

    #[test]
    fn stays_within_scale_for_grid_scores() {
        let weights = WeightTable::reference().unwrap();
        for half_steps in 0..=10 {
            let score = f64::from(half_steps) * 0.5;
            let result = final_score(&weights, &uniform(score));
            assert!((0.0..=100.0).contains(&result), "score {score} gave {result}");
        }
    }

    #[test]
    fn deterministic_for_identical_input() {
        let weights = WeightTable::reference().unwrap();
        let judgments = uniform(3.5);
        assert_eq!(
            final_score(&weights, &judgments),
            final_score(&weights, &judgments)
        );
    }

    #[test]
    fn rounds_half_away_from_zero() {
        // ties exactly representable in binary, so the rule is what decides
        assert_eq!(round_one_decimal(0.25), 0.3);
        assert_eq!(round_one_decimal(0.75), 0.8);
        assert_eq!(round_one_decimal(1.25), 1.3);
        assert_eq!(round_one_decimal(72.44), 72.4);
        assert_eq!(round_one_decimal(72.46), 72.5);
    }
}
