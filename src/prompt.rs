use serde_json::{json, Value};

use crate::models::GenerationConfig;

pub const VARIATION_COUNT: usize = 3;

/// Fixed user turn; all request-specific detail lives in the system instruction.
pub const USER_TURN: &str = "Generate 3 ad variations based on the system instructions.";

/// Everything sent to the generation service for one submission.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptPayload {
    pub system_instruction: String,
    pub user_turn: &'static str,
    pub response_schema: Value,
}

pub fn build_prompt(config: &GenerationConfig) -> PromptPayload {
    PromptPayload {
        system_instruction: build_instruction(config),
        user_turn: USER_TURN,
        response_schema: response_schema(),
    }
}

pub fn build_instruction(config: &GenerationConfig) -> String {
    format!(
        "You are a conversion-focused senior advertising copywriter and marketing technologist. \
        Generate exactly {VARIATION_COUNT} distinct, high-performing advertisement variations. \
        Each variation must include a compelling headline, persuasive body text (primaryText) and a strong callToAction. \
        For each variation, identify one persuasivePhrase within the body text that acts as the primary conversion trigger (social proof, scarcity, benefit-led). \
        The persuasivePhrase must be an exact substring of the primaryText.\n\n\
        Platform Context: {platform}\n\
        Target Audience: {audience}\n\
        Tone: {tone}\n\
        Product/Service: {product}\n\
        Key Benefits: {benefits}",
        platform = config.platform.label(),
        audience = config.target_audience,
        tone = config.tone.label(),
        product = config.product_name,
        benefits = config.benefits,
    )
}

/// Output contract: an array of records with four required string fields.
pub fn response_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "headline": { "type": "STRING" },
                "primaryText": { "type": "STRING" },
                "callToAction": { "type": "STRING" },
                "persuasivePhrase": { "type": "STRING" }
            },
            "required": ["headline", "primaryText", "callToAction", "persuasivePhrase"]
        }
    })
}
