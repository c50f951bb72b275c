use async_trait::async_trait;

use crate::media::InlineImage;

/// The external model invocation seam.
///
/// Implementations send one instruction plus one inline image and return the
/// model's raw text. Transient-failure retry and backoff live behind this
/// trait, never in front of it: the evaluation pipeline treats every error
/// from here as a single upstream failure.
#[async_trait]
pub trait VisionModel: Send + Sync {
    async fn generate(
        &self,
        instruction: &str,
        image: &InlineImage,
        model: &str,
        temperature: f64,
    ) -> anyhow::Result<String>;
}
