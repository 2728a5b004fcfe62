//! AI content gateway. The remote model is an opaque collaborator: prompt
//! in, text/image/topics out. Every call is attempted exactly once; any
//! failure is logged and converted to a fixed fallback at the call site.
//!
//! The gateway is injected as a trait object so tests substitute a double,
//! and overlapping generations are arbitrated by a request-token guard:
//! only the response matching the latest issued ticket is applied.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::config;
use crate::models::models::TrendingTopic;

pub const GENERATION_FAILED: &str = "Failed to generate content.";
pub const BUSY_FALLBACK: &str = "Oops! AI is busy right now. Try writing it yourself?";

const TRENDING_PROMPT: &str = "What are the top 3 trending technology and lifestyle topics \
     today? Provide a short 1-sentence summary for each.";
const LINKS_PER_TOPIC: usize = 2;

/// Fixed two-item fallback, in fixed order.
pub fn fallback_trending() -> Vec<TrendingTopic> {
    vec![
        TrendingTopic {
            topic: "Blue AI".to_string(),
            summary: "AI-integrated social media is the new frontier.".to_string(),
            links: Vec::new(),
        },
        TrendingTopic {
            topic: "Remote Work".to_string(),
            summary: "The debate on returning to office continues globally.".to_string(),
            links: Vec::new(),
        },
    ]
}

#[async_trait]
pub trait ContentGateway: Send + Sync {
    /// Enhanced post text, or the fixed apology string on failure.
    async fn generate_text(&self, prompt: &str) -> String;

    /// 16:9 illustration as a data URI, or `None` on failure.
    async fn generate_image(&self, prompt: &str) -> Option<String>;

    /// Three topics nominal; the fixed two-item fallback on failure.
    async fn trending_topics(&self) -> Vec<TrendingTopic>;
}

// === Gemini REST client ===

pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: String, base_url: String) -> Self {
        GeminiClient {
            http: reqwest::Client::new(),
            api_key,
            base_url,
        }
    }

    pub fn from_env() -> Self {
        Self::new(config::gemini_api_key(), config::gemini_base_url())
    }

    async fn generate(&self, model: &str, body: Value) -> anyhow::Result<Value> {
        let url = format!("{}/models/{}:generateContent", self.base_url, model);
        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    async fn try_generate_text(&self, prompt: &str) -> anyhow::Result<String> {
        let body = json!({
            "contents": [{ "parts": [{ "text": format!(
                "Create a concise, engaging social media post (max 280 chars) about: {}. \
                 Use a few relevant emojis but keep it professional yet trendy.",
                prompt
            ) }] }],
            "generationConfig": { "temperature": 0.7, "maxOutputTokens": 200 }
        });
        let response = self.generate(config::TEXT_MODEL, body).await?;
        let text = response["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .map(str::to_string);
        Ok(text.unwrap_or_else(|| GENERATION_FAILED.to_string()))
    }

    async fn try_generate_image(&self, content: &str) -> anyhow::Result<Option<String>> {
        let body = json!({
            "contents": [{ "parts": [{ "text": format!(
                "A high quality, vibrant artistic illustration for a social media post about: {}",
                content
            ) }] }],
            "generationConfig": { "imageConfig": { "aspectRatio": "16:9" } }
        });
        let response = self.generate(config::IMAGE_MODEL, body).await?;

        if let Some(parts) = response["candidates"][0]["content"]["parts"].as_array() {
            for part in parts {
                if let Some(data) = part["inlineData"]["data"].as_str() {
                    return Ok(Some(format!("data:image/png;base64,{}", data)));
                }
            }
        }
        Ok(None)
    }

    async fn try_trending(&self) -> anyhow::Result<Vec<TrendingTopic>> {
        let body = json!({
            "contents": [{ "parts": [{ "text": TRENDING_PROMPT }] }],
            "tools": [{ "googleSearch": {} }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": {
                    "type": "ARRAY",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "topic": { "type": "STRING" },
                            "summary": { "type": "STRING" },
                            "links": { "type": "ARRAY", "items": { "type": "STRING" } }
                        },
                        "required": ["topic", "summary"]
                    }
                }
            }
        });
        let response = self.generate(config::TEXT_MODEL, body).await?;

        let text = response["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .unwrap_or("[]");
        let mut topics: Vec<TrendingTopic> = serde_json::from_str(text)?;

        // Attach search-grounding links, two per topic.
        let links: Vec<String> = response["candidates"][0]["groundingMetadata"]["groundingChunks"]
            .as_array()
            .map(|chunks| {
                chunks
                    .iter()
                    .filter_map(|chunk| chunk["web"]["uri"].as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();
        for (idx, topic) in topics.iter_mut().enumerate() {
            topic.links = links
                .iter()
                .skip(idx * LINKS_PER_TOPIC)
                .take(LINKS_PER_TOPIC)
                .cloned()
                .collect();
        }
        Ok(topics)
    }
}

#[async_trait]
impl ContentGateway for GeminiClient {
    async fn generate_text(&self, prompt: &str) -> String {
        match self.try_generate_text(prompt).await {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(error = %err, "post generation failed");
                BUSY_FALLBACK.to_string()
            }
        }
    }

    async fn generate_image(&self, prompt: &str) -> Option<String> {
        match self.try_generate_image(prompt).await {
            Ok(image) => image,
            Err(err) => {
                tracing::warn!(error = %err, "image generation failed");
                None
            }
        }
    }

    async fn trending_topics(&self) -> Vec<TrendingTopic> {
        match self.try_trending().await {
            Ok(topics) => topics,
            Err(err) => {
                tracing::warn!(error = %err, "trending topics failed");
                fallback_trending()
            }
        }
    }
}

// === Latest-request arbitration ===

pub struct Ticket(u64);

/// Monotonic generation counter. A response is applied only while its
/// ticket is still the most recently issued one.
#[derive(Default)]
pub struct RequestGuard {
    latest: AtomicU64,
}

impl RequestGuard {
    pub fn issue(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: &Ticket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }
}

/// Shared post-composer draft. Generations may overlap; the guard drops
/// every response except the latest-issued one.
pub struct Composer {
    gateway: Arc<dyn ContentGateway>,
    guard: RequestGuard,
    draft: Mutex<String>,
}

impl Composer {
    pub fn new(gateway: Arc<dyn ContentGateway>) -> Self {
        Composer {
            gateway,
            guard: RequestGuard::default(),
            draft: Mutex::new(String::new()),
        }
    }

    pub fn gateway(&self) -> Arc<dyn ContentGateway> {
        self.gateway.clone()
    }

    pub fn draft(&self) -> String {
        self.draft.lock().expect("composer draft lock").clone()
    }

    pub fn set_draft(&self, text: &str) {
        *self.draft.lock().expect("composer draft lock") = text.to_string();
    }

    /// Generate enhanced text for the draft. Returns `None` when a newer
    /// request was issued while this one was in flight; the stale response
    /// is discarded without touching the draft.
    pub async fn enhance(&self, prompt: &str) -> Option<String> {
        let ticket = self.guard.issue();
        let text = self.gateway.generate_text(prompt).await;
        if !self.guard.is_current(&ticket) {
            tracing::debug!("stale generation dropped");
            return None;
        }
        self.set_draft(&text);
        Some(text)
    }
}
