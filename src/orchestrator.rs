//! Request lifecycle for one session: Idle → Loading → (Success | Error), Success → Idle on clear.
//!
//! State lives behind a `parking_lot` lock that is never held across the service call.
//! A submission while Loading is refused, so the outbound call is the only writer in flight.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::clipboard::{clipboard_text, CopyIndicator};
use crate::gemini::{AdGenerator, GeminiError};
use crate::highlight::{locate, SegmentsBuf};
use crate::models::{AdCopy, GenerationConfig};
use crate::normalize::{normalize, NormalizeError};
use crate::prompt::build_prompt;

pub const GENERIC_FAILURE: &str =
    "Failed to generate ad copy. Please check your API key and network connection.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Loading,
    Success,
    Error,
}

/// Internal failure taxonomy. Only ever logged; callers see [`GENERIC_FAILURE`].
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("transport error: {0}")]
    Transport(GeminiError),
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl GenerationError {
    pub fn category(&self) -> &'static str {
        match self {
            GenerationError::Transport(_) => "transport",
            GenerationError::MalformedResponse(_) => "malformed_response",
        }
    }
}

impl From<GeminiError> for GenerationError {
    fn from(e: GeminiError) -> Self {
        if e.is_transport() {
            GenerationError::Transport(e)
        } else {
            GenerationError::MalformedResponse(e.to_string())
        }
    }
}

impl From<NormalizeError> for GenerationError {
    fn from(e: NormalizeError) -> Self {
        GenerationError::MalformedResponse(e.to_string())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
    /// Required fields blank. No transition, no service call.
    #[error("missing required fields: {}", .0.join(", "))]
    Invalid(Vec<&'static str>),
    /// A request is already outstanding. No transition, no service call.
    #[error("a generation request is already in progress")]
    Busy,
    /// Transport or malformed reply. Detail is logged, never returned.
    #[error("ad generation failed")]
    Failed,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("nothing to clear while {phase:?}")]
pub struct ClearRejected {
    pub phase: Phase,
}

#[derive(Debug)]
struct State {
    phase: Phase,
    ads: Vec<AdCopy>,
    error: Option<String>,
    copied: HashMap<Uuid, CopyIndicator>,
    updated_at: DateTime<Utc>,
}

impl State {
    fn drop_results(&mut self) {
        self.ads.clear();
        self.copied.clear();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdView {
    #[serde(flatten)]
    pub ad: AdCopy,
    pub variation: usize,
    pub segments: SegmentsBuf,
    pub copied: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub id: Uuid,
    pub phase: Phase,
    pub error: Option<String>,
    pub ads: Vec<AdView>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct Orchestrator {
    id: Uuid,
    created_at: DateTime<Utc>,
    generator: Arc<dyn AdGenerator>,
    state: RwLock<State>,
}

impl Orchestrator {
    pub fn new(id: Uuid, generator: Arc<dyn AdGenerator>) -> Self {
        let now = Utc::now();
        Self {
            id,
            created_at: now,
            generator,
            state: RwLock::new(State {
                phase: Phase::Idle,
                ads: Vec::new(),
                error: None,
                copied: HashMap::new(),
                updated_at: now,
            }),
        }
    }

    pub fn phase(&self) -> Phase {
        self.state.read().phase
    }

    pub async fn submit(&self, config: GenerationConfig) -> Result<Vec<AdCopy>, SubmitError> {
        let missing = config.missing_fields();
        if !missing.is_empty() {
            return Err(SubmitError::Invalid(missing));
        }

        {
            let mut state = self.state.write();
            if state.phase == Phase::Loading {
                warn!(session = %self.id, "submit ignored: request already in progress");
                return Err(SubmitError::Busy);
            }
            state.phase = Phase::Loading;
            state.error = None;
            state.touch();
        }
        let guard = LoadingGuard { state: &self.state, session: self.id, settled: false };

        info!(session = %self.id, product = %config.product_name, platform = config.platform.label(), "🚀 Generating ad variations");
        let result = self.run(&config).await;
        guard.settle(result)
    }

    async fn run(&self, config: &GenerationConfig) -> Result<Vec<AdCopy>, GenerationError> {
        let prompt = build_prompt(config);
        let raw = self.generator.generate(&prompt).await?;
        Ok(normalize(&raw, config.platform)?)
    }

    /// Empties results. Only valid from Success.
    pub fn clear(&self) -> Result<(), ClearRejected> {
        let mut state = self.state.write();
        if state.phase != Phase::Success {
            return Err(ClearRejected { phase: state.phase });
        }
        state.drop_results();
        state.phase = Phase::Idle;
        state.error = None;
        state.touch();
        info!(session = %self.id, "🧹 Cleared results");
        Ok(())
    }

    /// Returns the clipboard text for one card and arms its copied indicator.
    pub fn copy(&self, ad_id: Uuid) -> Option<String> {
        let mut state = self.state.write();
        let text = state.ads.iter().find(|a| a.id == ad_id).map(clipboard_text)?;
        state.copied.entry(ad_id).or_default().mark();
        Some(text)
    }

    pub fn snapshot(&self) -> Snapshot {
        let state = self.state.read();
        let ads = state
            .ads
            .iter()
            .enumerate()
            .map(|(i, ad)| AdView {
                ad: ad.clone(),
                variation: i + 1,
                segments: locate(&ad.primary_text, &ad.persuasive_phrase).into(),
                copied: state.copied.get(&ad.id).is_some_and(CopyIndicator::is_active),
            })
            .collect();
        Snapshot {
            id: self.id,
            phase: state.phase,
            error: state.error.clone(),
            ads,
            created_at: self.created_at,
            updated_at: state.updated_at,
        }
    }
}

/// Takes the session out of Loading on every exit path, including a dropped future.
struct LoadingGuard<'a> {
    state: &'a RwLock<State>,
    session: Uuid,
    settled: bool,
}

impl LoadingGuard<'_> {
    fn settle(mut self, result: Result<Vec<AdCopy>, GenerationError>) -> Result<Vec<AdCopy>, SubmitError> {
        self.settled = true;
        let mut state = self.state.write();
        state.drop_results();
        state.touch();
        match result {
            Ok(ads) => {
                info!(session = %self.session, count = ads.len(), "✅ Ad variations generated");
                state.ads = ads.clone();
                state.phase = Phase::Success;
                Ok(ads)
            }
            Err(e) => {
                error!(session = %self.session, category = e.category(), error = %e, "❌ Ad generation failed");
                state.error = Some(GENERIC_FAILURE.to_string());
                state.phase = Phase::Error;
                Err(SubmitError::Failed)
            }
        }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let mut state = self.state.write();
        if state.phase == Phase::Loading {
            warn!(session = %self.session, "generation abandoned before completion");
            state.drop_results();
            state.phase = Phase::Idle;
            state.touch();
        }
    }
}
