#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tempfile::TempDir;

use phodo::eval::{Evaluator, Scoring};
use phodo::media::InlineImage;
use phodo::providers::VisionModel;
use phodo::store::{SqliteHitStore, TierHitStore};

/// Stub model that returns a canned response and counts invocations.
pub struct CannedModel {
    response: String,
    pub calls: Arc<AtomicUsize>,
}

impl CannedModel {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VisionModel for CannedModel {
    async fn generate(
        &self,
        _instruction: &str,
        _image: &InlineImage,
        _model: &str,
        _temperature: f64,
    ) -> anyhow::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.response.clone())
    }
}

/// Stub model whose every call fails like an unreachable upstream.
pub struct FailingModel;

#[async_trait]
impl VisionModel for FailingModel {
    async fn generate(
        &self,
        _instruction: &str,
        _image: &InlineImage,
        _model: &str,
        _temperature: f64,
    ) -> anyhow::Result<String> {
        anyhow::bail!("model quota exceeded")
    }
}

/// A well-formed model response scoring 73.0 with reference weights
/// (focus 4, exposure 3, color 3, composition 4, resolution 2, face 5).
pub fn reference_response() -> String {
    r#"{
        "focus": { "score": 4, "reason": "초점이 또렷함" },
        "exposure": { "score": 3, "reason": "노출이 무난함" },
        "color": { "score": 3, "reason": "색감이 평범함" },
        "composition": { "score": 4, "reason": "구도가 안정적임" },
        "resolution": { "score": 2, "reason": "노이즈가 보임" },
        "face_detection": { "score": 5, "reason": "얼굴이 선명함" },
        "comment": "전반적으로 준수한 사진"
    }"#
    .to_string()
}

pub fn sample_payload() -> String {
    "data:image/jpeg;base64,/9j/4AAQSkZJRgABAQAAAQ==".to_string()
}

pub async fn reference_store(dir: &TempDir) -> Arc<SqliteHitStore> {
    let scoring = Scoring::reference().unwrap();
    let tier_keys: Vec<&str> = scoring.tiers.keys().collect();
    Arc::new(
        SqliteHitStore::open(&dir.path().join("hits.db"), &tier_keys)
            .await
            .unwrap(),
    )
}

pub fn evaluator(model: Arc<dyn VisionModel>, store: Arc<dyn TierHitStore>) -> Evaluator {
    Evaluator::new(
        model,
        store,
        Scoring::reference().unwrap(),
        "gemini-2.0-flash".into(),
        0.2,
    )
}
