use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::{AdCopy, AdPlatform, RawAdCopy};
use crate::prompt::VARIATION_COUNT;

#[derive(Debug, Error)]
#[error("malformed response: {0}")]
pub struct NormalizeError(#[from] serde_json::Error);

pub fn parse_records(raw: &str) -> Result<Vec<RawAdCopy>, NormalizeError> {
    Ok(serde_json::from_str(raw)?)
}

/// Parses the service reply and attaches fresh ids and the request's platform.
pub fn normalize(raw: &str, platform: AdPlatform) -> Result<Vec<AdCopy>, NormalizeError> {
    let records = parse_records(raw)?;
    if records.len() != VARIATION_COUNT {
        warn!(count = records.len(), "service returned an unexpected number of variations");
    }
    Ok(attach_identity(records, platform))
}

/// Order is preserved; order is the variation number.
pub fn attach_identity(records: Vec<RawAdCopy>, platform: AdPlatform) -> Vec<AdCopy> {
    let ads: Vec<AdCopy> = records
        .into_iter()
        .map(|r| AdCopy {
            id: Uuid::new_v4(),
            platform,
            headline: r.headline,
            primary_text: r.primary_text,
            call_to_action: r.call_to_action,
            persuasive_phrase: r.persuasive_phrase,
        })
        .collect();
    for ad in &ads {
        if !ad.persuasive_phrase.is_empty() && !ad.primary_text.contains(&ad.persuasive_phrase) {
            debug!(ad_id = %ad.id, "persuasive phrase is not a substring of the body; rendering plain");
        }
    }
    ads
}
