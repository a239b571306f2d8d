//! HTTP advisor backed by the Gemini `generateContent` endpoint.
//!
//! Requests are bounded by the configured timeout. Briefings are cached per
//! `(name, level)` so re-opening the dashboard does not re-query the service
//! until the player's name or level changes or the cache entry expires.

use anyhow::{anyhow, Result};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tokio::time::timeout;

use super::prompts::{briefing_prompt, creative_prompt};
use super::{briefing_fallback, Advisor, BriefingSnapshot, CREATIVE_FALLBACK};
use crate::config::AdviceConfig;
use crate::logutil::preview;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<RequestContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct RequestContent {
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
struct RequestPart {
    text: String,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f64,
    top_p: f64,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate.
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[derive(Debug, Clone)]
struct BriefingCacheEntry {
    fetched_at: Instant,
    name: String,
    level: u32,
    text: String,
}

pub struct GeminiAdvisor {
    config: AdviceConfig,
    api_key: String,
    client: reqwest::Client,
    briefing_cache: Mutex<Option<BriefingCacheEntry>>,
}

impl GeminiAdvisor {
    pub fn new(config: AdviceConfig) -> Self {
        let api_key = config.resolved_api_key();
        Self {
            config,
            api_key,
            client: reqwest::Client::new(),
            briefing_cache: Mutex::new(None),
        }
    }

    pub fn endpoint_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            urlencoding::encode(&self.config.model)
        )
    }

    pub fn clear_cache(&self) {
        if let Ok(mut cache) = self.briefing_cache.lock() {
            *cache = None;
        }
    }

    fn cached_briefing(&self, snapshot: &BriefingSnapshot) -> Option<String> {
        let ttl = Duration::from_secs(u64::from(self.config.briefing_cache_minutes) * 60);
        if ttl.is_zero() {
            return None;
        }
        let cache = self.briefing_cache.lock().ok()?;
        let entry = cache.as_ref()?;
        if entry.name == snapshot.name && entry.level == snapshot.level && entry.fetched_at.elapsed() < ttl {
            debug!(
                "returning cached briefing for {} (age: {:.1}min)",
                preview(&entry.name),
                entry.fetched_at.elapsed().as_secs_f64() / 60.0
            );
            return Some(entry.text.clone());
        }
        None
    }

    fn store_briefing(&self, snapshot: &BriefingSnapshot, text: &str) {
        if let Ok(mut cache) = self.briefing_cache.lock() {
            *cache = Some(BriefingCacheEntry {
                fetched_at: Instant::now(),
                name: snapshot.name.clone(),
                level: snapshot.level,
                text: text.to_string(),
            });
        }
    }

    async fn generate(&self, prompt: String, generation_config: Option<GenerationConfig>) -> Result<String> {
        let body = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config,
        };
        let timeout_duration = Duration::from_secs(u64::from(self.config.timeout_seconds));

        timeout(timeout_duration, self.exchange(&body))
            .await
            .map_err(|_| anyhow!("request timeout after {}s", self.config.timeout_seconds))?
    }

    async fn exchange(&self, body: &GenerateRequest) -> Result<String> {
        let url = self.endpoint_url();
        debug!("requesting advice from {}", url);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| anyhow!("HTTP request failed: {}", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(anyhow!("API returned status {}: {}", status, preview(&detail)));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| anyhow!("failed to parse response: {}", e))?;
        parsed.text().ok_or_else(|| anyhow!("response contained no text"))
    }
}

impl Advisor for GeminiAdvisor {
    fn request_briefing(&self, snapshot: &BriefingSnapshot) -> impl Future<Output = String> + Send {
        async move {
            if let Some(text) = self.cached_briefing(snapshot) {
                return text;
            }
            match self.generate(briefing_prompt(snapshot), None).await {
                Ok(text) => {
                    self.store_briefing(snapshot, &text);
                    text
                }
                Err(e) => {
                    warn!("briefing request failed: {}", e);
                    briefing_fallback(snapshot)
                }
            }
        }
    }

    fn request_creative_advice(&self, prompt: &str, context: &str) -> impl Future<Output = String> + Send {
        async move {
            let generation = GenerationConfig {
                temperature: self.config.temperature,
                top_p: self.config.top_p,
                max_output_tokens: self.config.max_output_tokens,
            };
            match self.generate(creative_prompt(prompt, context), Some(generation)).await {
                Ok(text) => text,
                Err(e) => {
                    warn!("creative advice request failed for '{}': {}", preview(prompt), e);
                    CREATIVE_FALLBACK.to_string()
                }
            }
        }
    }
}
