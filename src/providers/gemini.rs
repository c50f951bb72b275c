//! Google Gemini vision model client.
//!
//! Speaks the `generateContent` API with an instruction text part plus an
//! `inlineData` image part. Temperature is fixed low by the caller so that
//! repeated evaluations of the same image stay comparable.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::gemini_types::{
    Content, GeminiInlineData, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    Part,
};
use super::traits::VisionModel;
use crate::media::InlineImage;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const MAX_OUTPUT_TOKENS: u32 = 2048;
const REQUEST_TIMEOUT_SECS: u64 = 60;

pub struct GeminiModel {
    api_key: Option<String>,
    base_url: String,
    client: Client,
}

impl GeminiModel {
    /// Create a new Gemini client.
    ///
    /// Authentication priority:
    /// 1. Explicit API key passed in (config file)
    /// 2. `GEMINI_API_KEY` environment variable
    /// 3. `GOOGLE_API_KEY` environment variable
    pub fn new(api_key: Option<&str>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Same as [`GeminiModel::new`] but pointed at a different endpoint.
    /// Used by the wire tests.
    pub fn with_base_url(api_key: Option<&str>, base_url: &str) -> Self {
        let resolved_key = api_key
            .map(String::from)
            .or_else(|| std::env::var("GEMINI_API_KEY").ok())
            .or_else(|| std::env::var("GOOGLE_API_KEY").ok());

        Self {
            api_key: resolved_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            client: build_client(),
        }
    }

    fn model_name(model: &str) -> String {
        if model.starts_with("models/") {
            model.to_string()
        } else {
            format!("models/{model}")
        }
    }

    fn build_request(
        instruction: &str,
        image: &InlineImage,
        temperature: f64,
    ) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![
                    Part::text(instruction.to_string()),
                    Part::inline_data(GeminiInlineData {
                        mime_type: image.mime_type.clone(),
                        data: image.data.clone(),
                    }),
                ],
            }],
            generation_config: GenerationConfig {
                temperature,
                max_output_tokens: MAX_OUTPUT_TOKENS,
            },
        }
    }

    fn extract_text(result: &GenerateContentResponse) -> anyhow::Result<String> {
        let text = result
            .candidates
            .as_ref()
            .and_then(|candidates| candidates.first())
            .map(|candidate| {
                candidate
                    .content
                    .parts
                    .iter()
                    .filter_map(|part| part.text.as_ref())
                    .cloned()
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .unwrap_or_default();

        if text.is_empty() {
            anyhow::bail!("No response from Gemini");
        }

        Ok(text)
    }

    async fn call_api(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> anyhow::Result<GenerateContentResponse> {
        let api_key = self.api_key.as_ref().ok_or_else(|| {
            anyhow::anyhow!(
                "Gemini API key not found. Options:\n\
                 1. Set GEMINI_API_KEY (or GOOGLE_API_KEY) env var\n\
                 2. Set api_key in config.toml\n\
                 3. Get an API key from https://aistudio.google.com/app/apikey"
            )
        })?;

        let model_name = Self::model_name(model);
        let url = format!(
            "{}/v1beta/{model_name}:generateContent?key={api_key}",
            self.base_url
        );

        let response = self.client.post(&url).json(request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Gemini API error ({status}): {error_text}");
        }

        let result: GenerateContentResponse = response.json().await?;

        if let Some(err) = result.error.as_ref() {
            anyhow::bail!("Gemini API error: {}", err.message);
        }

        Ok(result)
    }
}

#[async_trait]
impl VisionModel for GeminiModel {
    async fn generate(
        &self,
        instruction: &str,
        image: &InlineImage,
        model: &str,
        temperature: f64,
    ) -> anyhow::Result<String> {
        let request = Self::build_request(instruction, image, temperature);
        let result = self.call_api(model, &request).await?;
        Self::extract_text(&result)
    }
}

fn build_client() -> Client {
    Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .connect_timeout(Duration::from_secs(10))
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(Duration::from_secs(90))
        .tcp_keepalive(Duration::from_secs(60))
        .build()
        .unwrap_or_else(|_| Client::new())
}
