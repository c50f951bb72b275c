//! The evaluation pipeline: orchestrates model invocation, response
//! validation, score aggregation, tier selection, and the tier hit count.

pub mod schema;
pub mod score;
pub mod tier;
pub mod validate;

pub use schema::{Assessment, Category, CategoryJudgment, Scoring, WeightTable};
pub use tier::{Tier, TierTable};

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use crate::error::EvalError;
use crate::media;
use crate::providers::VisionModel;
use crate::store::{HitOutcome, TierHitStore};

/// Fixed instruction sent with every image. The model only ever returns the
/// six category judgments and a comment; the final score is computed here.
const EVALUATION_INSTRUCTION: &str = r#"You are a professional photo quality evaluator.

Evaluate the image using the 6 criteria below. For each, score from 0 to 5 (steps of 0.5 allowed) and explain briefly in Korean.
Do NOT hesitate to assign very low scores (even 0 or 1) if the quality is clearly poor.
Avoid assigning 4 or 5 to all items unless the image is truly outstanding.

Scoring guidelines:
- 5: Excellent
- 4: Good
- 3: Average
- 2: Needs improvement
- 1: Poor
- 0: Unacceptable

Do NOT calculate the final score.
Only return the 6 category scores (0~5) with short Korean explanations, and one overall comment.

Respond with raw JSON only. No markdown, no extra text.

{
  "focus": { "score": <0-5>, "reason": "..." },
  "exposure": { "score": <0-5>, "reason": "..." },
  "color": { "score": <0-5>, "reason": "..." },
  "composition": { "score": <0-5>, "reason": "..." },
  "resolution": { "score": <0-5>, "reason": "..." },
  "face_detection": { "score": <0-5>, "reason": "..." },
  "comment": ""
}"#;

/// The completed evaluation returned to the caller. Constructed per request
/// and never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct Evaluation {
    #[serde(flatten)]
    pub judgments: BTreeMap<Category, CategoryJudgment>,
    pub comment: String,
    pub final_score: f64,
    pub tier: String,
}

/// Sequences one evaluation request end to end.
///
/// Requests are independent: the evaluator holds no per-request state, and
/// the only shared mutable resource behind it is the tier hit store, which
/// is mutated exclusively through its atomic increment.
pub struct Evaluator {
    model: Arc<dyn VisionModel>,
    store: Arc<dyn TierHitStore>,
    scoring: Scoring,
    model_name: String,
    temperature: f64,
}

impl Evaluator {
    pub fn new(
        model: Arc<dyn VisionModel>,
        store: Arc<dyn TierHitStore>,
        scoring: Scoring,
        model_name: String,
        temperature: f64,
    ) -> Self {
        Self {
            model,
            store,
            scoring,
            model_name,
            temperature,
        }
    }

    /// Evaluate one image payload (data URL or bare base64).
    ///
    /// Fails fast on an empty payload, maps collaborator failures to
    /// [`EvalError::Upstream`], and validates the model's output strictly.
    /// A failure while counting the tier award is logged and absorbed: the
    /// evaluation already computed is returned regardless.
    pub async fn evaluate(&self, image_payload: &str) -> Result<Evaluation, EvalError> {
        if image_payload.trim().is_empty() {
            return Err(EvalError::MissingInput);
        }

        let image = media::decode_payload(image_payload);

        let raw = self
            .model
            .generate(
                EVALUATION_INSTRUCTION,
                &image,
                &self.model_name,
                self.temperature,
            )
            .await
            .map_err(|error| EvalError::Upstream(format!("{error:#}")))?;

        let assessment = validate::parse_assessment(&raw)?;

        let final_score = score::final_score(&self.scoring.weights, &assessment.judgments);
        let tier = self.scoring.tiers.select(final_score);

        self.record_tier_hit(tier).await;

        Ok(Evaluation {
            judgments: assessment.judgments,
            comment: assessment.comment,
            final_score,
            tier: tier.label.clone(),
        })
    }

    async fn record_tier_hit(&self, tier: &Tier) {
        match self.store.record_hit(&tier.key).await {
            Ok(HitOutcome::Recorded) => {}
            Ok(HitOutcome::UnknownTier) => {
                tracing::warn!(tier = %tier.key, "tier missing from hit store; award not counted");
            }
            Err(error) => {
                tracing::warn!(tier = %tier.key, "failed to record tier hit: {error:#}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instruction_pins_the_response_shape() {
        assert!(EVALUATION_INSTRUCTION.contains("\"face_detection\""));
        assert!(EVALUATION_INSTRUCTION.contains("raw JSON only"));
        assert!(!EVALUATION_INSTRUCTION.contains("final_score"));
    }

    #[test]
    fn evaluation_serializes_flat() {
        let scoring = Scoring::reference().unwrap();
        let judgments: BTreeMap<Category, CategoryJudgment> =
            [(Category::Focus, CategoryJudgment { score: 4.0, reason: "선명함".into() })]
                .into_iter()
                .collect();
        let evaluation = Evaluation {
            judgments,
            comment: "괜찮음".into(),
            final_score: 73.0,
            tier: scoring.tiers.select(73.0).label.clone(),
        };

        let body = serde_json::to_value(&evaluation).unwrap();
        assert_eq!(body["focus"]["score"], 4.0);
        assert_eq!(body["final_score"], 73.0);
        assert!(body["tier"].as_str().unwrap().contains("실력자"));
        assert!(body.get("judgments").is_none());
    }
}
