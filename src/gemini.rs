use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::{info, error};

use crate::prompt::PromptPayload;

pub const DEMO_KEY: &str = "DEMO_KEY";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("API error (status {status}): {body}")]
    Api { status: u16, body: String },
    #[error("Envelope parse error: {0}")]
    Parse(String),
    #[error("No text content in response")]
    EmptyContent,
}

impl GeminiError {
    /// True when the call itself failed, as opposed to returning something unusable.
    pub fn is_transport(&self) -> bool {
        matches!(self, GeminiError::Http(_) | GeminiError::Api { .. })
    }
}

/// The external generation service. Returns the raw JSON text of the reply.
#[async_trait]
pub trait AdGenerator: Send + Sync {
    async fn generate(&self, prompt: &PromptPayload) -> Result<String, GeminiError>;
}

/// Char-boundary safe preview for log lines.
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...[{} chars]", &text[..cut], text.chars().count()),
        None => text.to_string(),
    }
}

pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: String, base_url: String, model: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url,
            model,
        }
    }

    pub fn is_demo(&self) -> bool {
        self.api_key == DEMO_KEY
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent?key={}", self.base_url, self.model, self.api_key)
    }

    async fn perform_api_call(&self, prompt: &PromptPayload) -> Result<String, GeminiError> {
        let url = self.endpoint();
        info!("🔗 Making request to: {}", url.replace(&self.api_key, "***"));

        let request_body = request_body(prompt);
        info!("📤 System instruction: {}", preview(&prompt.system_instruction, 160));

        let response = self.client
            .post(&url)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| GeminiError::Http(e.without_url().to_string()))?;

        let status = response.status();
        info!("📥 Response status: {}", status);

        let response_text = response.text().await
            .map_err(|e| GeminiError::Http(e.without_url().to_string()))?;

        if !status.is_success() {
            error!("❌ API Error response: {}", preview(&response_text, 500));
            return Err(GeminiError::Api { status: status.as_u16(), body: response_text });
        }

        info!("📥 Raw Gemini API response: {}", preview(&response_text, 1000));
        extract_text(&response_text)
    }
}

#[async_trait]
impl AdGenerator for GeminiClient {
    async fn generate(&self, prompt: &PromptPayload) -> Result<String, GeminiError> {
        if self.is_demo() {
            info!("Using demo mode - returning canned ad variations");
            return Ok(demo_reply());
        }
        info!("Generating ad copy with Gemini model {}...", self.model);
        self.perform_api_call(prompt).await
    }
}

/// `generateContent` body: instruction as system instruction, fixed user turn, JSON schema output.
fn request_body(prompt: &PromptPayload) -> serde_json::Value {
    json!({
        "systemInstruction": {
            "parts": [{"text": prompt.system_instruction}]
        },
        "contents": [{
            "role": "user",
            "parts": [{"text": prompt.user_turn}]
        }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": prompt.response_schema
        }
    })
}

/// Schema-conformant reply used when no API key is configured.
fn demo_reply() -> String {
    json!([
        {
            "headline": "Ship Faster Without the Busywork",
            "primaryText": "Teams like yours cut launch time in half. Join 2,000+ teams already shipping faster today.",
            "callToAction": "Start Free Trial",
            "persuasivePhrase": "Join 2,000+ teams already shipping faster"
        },
        {
            "headline": "Your Next Launch, Simplified",
            "primaryText": "Stop juggling tools. Everything you need in one place, with setup done in minutes.",
            "callToAction": "Get Started",
            "persuasivePhrase": "setup done in minutes"
        },
        {
            "headline": "Only a Few Founder Seats Left",
            "primaryText": "Founder pricing ends this week. Lock in lifetime savings before spots run out.",
            "callToAction": "Claim Your Seat",
            "persuasivePhrase": "Lock in lifetime savings"
        }
    ])
    .to_string()
}

// --- Response Parsing Helpers ---

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

#[derive(Debug, Deserialize, Default)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Part {
    Text { text: String },
    Other(serde_json::Value),
}

/// Concatenates the text parts of the first candidate.
fn extract_text(body: &str) -> Result<String, GeminiError> {
    let parsed: GeminiResponse = serde_json::from_str(body)
        .map_err(|e| GeminiError::Parse(e.to_string()))?;

    let text: String = parsed
        .candidates
        .first()
        .map(|c| {
            c.content
                .parts
                .iter()
                .filter_map(|p| match p {
                    Part::Text { text } => Some(text.as_str()),
                    Part::Other(_) => None,
                })
                .collect()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        info!("⚠️ No text content found in API response");
        return Err(GeminiError::EmptyContent);
    }
    Ok(text)
}
