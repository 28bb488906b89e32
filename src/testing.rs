use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::json;
use tokio::sync::Notify;

use crate::gemini::{AdGenerator, GeminiError};
use crate::prompt::PromptPayload;

/// A reply with `n` records whose persuasive phrase is "limited spots".
pub fn ads_reply(n: usize, platform: Option<&str>) -> String {
    let items: Vec<_> = (1..=n)
        .map(|i| {
            let mut item = json!({
                "headline": format!("Headline {i}"),
                "primaryText": format!("Variation {i} body, limited spots and more."),
                "callToAction": "Sign Up",
                "persuasivePhrase": "limited spots"
            });
            if let Some(p) = platform {
                item["platform"] = json!(p);
            }
            item
        })
        .collect();
    serde_json::Value::Array(items).to_string()
}

/// Replays queued results in order; records every prompt it sees.
pub struct ScriptedGenerator {
    replies: Mutex<VecDeque<Result<String, GeminiError>>>,
    prompts: Mutex<Vec<PromptPayload>>,
}

impl ScriptedGenerator {
    pub fn new(replies: Vec<Result<String, GeminiError>>) -> Self {
        Self { replies: Mutex::new(replies.into()), prompts: Mutex::new(Vec::new()) }
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().len()
    }

    pub fn prompts(&self) -> Vec<PromptPayload> {
        self.prompts.lock().clone()
    }
}

#[async_trait]
impl AdGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &PromptPayload) -> Result<String, GeminiError> {
        self.prompts.lock().push(prompt.clone());
        self.replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(GeminiError::Http("no scripted reply".into())))
    }
}

/// Blocks every call until [`GatedGenerator::release`].
pub struct GatedGenerator {
    reply: String,
    gate: Notify,
    calls: AtomicUsize,
}

impl GatedGenerator {
    pub fn new(reply: String) -> Self {
        Self { reply, gate: Notify::new(), calls: AtomicUsize::new(0) }
    }

    pub fn release(&self) {
        self.gate.notify_one();
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AdGenerator for GatedGenerator {
    async fn generate(&self, _prompt: &PromptPayload) -> Result<String, GeminiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.gate.notified().await;
        Ok(self.reply.clone())
    }
}
