use serde::{Serialize, Deserialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AdPlatform {
    #[default]
    #[serde(rename = "Facebook/Instagram")]
    Facebook,
    #[serde(rename = "Google Search")]
    Google,
    #[serde(rename = "LinkedIn")]
    LinkedIn,
    #[serde(rename = "TikTok")]
    TikTok,
    #[serde(rename = "X (Twitter)")]
    Twitter,
}

impl AdPlatform {
    pub const ALL: [AdPlatform; 5] = [
        AdPlatform::Facebook,
        AdPlatform::Google,
        AdPlatform::LinkedIn,
        AdPlatform::TikTok,
        AdPlatform::Twitter,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            AdPlatform::Facebook => "Facebook/Instagram",
            AdPlatform::Google => "Google Search",
            AdPlatform::LinkedIn => "LinkedIn",
            AdPlatform::TikTok => "TikTok",
            AdPlatform::Twitter => "X (Twitter)",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AdTone {
    #[default]
    #[serde(rename = "Professional")]
    Professional,
    #[serde(rename = "Bold & Energetic")]
    Bold,
    #[serde(rename = "Playful & Witty")]
    Playful,
    #[serde(rename = "Empathetic")]
    Empathetic,
    #[serde(rename = "Urgent/Scarcity")]
    Urgent,
}

impl AdTone {
    pub const ALL: [AdTone; 5] = [
        AdTone::Professional,
        AdTone::Bold,
        AdTone::Playful,
        AdTone::Empathetic,
        AdTone::Urgent,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            AdTone::Professional => "Professional",
            AdTone::Bold => "Bold & Energetic",
            AdTone::Playful => "Playful & Witty",
            AdTone::Empathetic => "Empathetic",
            AdTone::Urgent => "Urgent/Scarcity",
        }
    }
}

/// Parameters for one generation request, built fresh from each form submission.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub target_audience: String,
    #[serde(default)]
    pub tone: AdTone,
    #[serde(default)]
    pub platform: AdPlatform,
    #[serde(default)]
    pub benefits: String,
}

impl GenerationConfig {
    /// Names of required fields that are empty. Empty result means the config may be submitted.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.product_name.is_empty() {
            missing.push("productName");
        }
        if self.target_audience.is_empty() {
            missing.push("targetAudience");
        }
        missing
    }
}

/// One record as the generation service returns it. Carries no id or platform.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawAdCopy {
    pub headline: String,
    pub primary_text: String,
    pub call_to_action: String,
    pub persuasive_phrase: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdCopy {
    pub id: Uuid,
    pub platform: AdPlatform,
    pub headline: String,
    pub primary_text: String,
    pub call_to_action: String,
    pub persuasive_phrase: String,
}

impl From<AdCopy> for RawAdCopy {
    fn from(ad: AdCopy) -> Self {
        RawAdCopy {
            headline: ad.headline,
            primary_text: ad.primary_text,
            call_to_action: ad.call_to_action,
            persuasive_phrase: ad.persuasive_phrase,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn config_defaults_fill_enums_and_use_camel_case() {
        let config: GenerationConfig = serde_json::from_value(json!({
            "productName": "Conversio",
            "targetAudience": "Founders"
        })).unwrap();
        assert_eq!(config.tone, AdTone::Professional);
        assert_eq!(config.platform, AdPlatform::Facebook);
        assert_eq!(config.benefits, "");
        assert!(config.missing_fields().is_empty());
    }

    #[test]
    fn enum_values_use_display_labels_on_the_wire() {
        for platform in AdPlatform::ALL {
            assert_eq!(serde_json::to_value(platform).unwrap(), json!(platform.label()));
        }
        for tone in AdTone::ALL {
            assert_eq!(serde_json::to_value(tone).unwrap(), json!(tone.label()));
        }
        let tone: AdTone = serde_json::from_value(json!("Urgent/Scarcity")).unwrap();
        assert_eq!(tone, AdTone::Urgent);
        assert!(serde_json::from_value::<AdPlatform>(json!("MySpace")).is_err());
    }

    #[test]
    fn empty_required_fields_are_reported() {
        let config = GenerationConfig::default();
        assert_eq!(config.missing_fields(), vec!["productName", "targetAudience"]);
    }

    #[test]
    fn whitespace_counts_as_present() {
        let config = GenerationConfig {
            product_name: "   ".into(),
            target_audience: "Founders".into(),
            ..Default::default()
        };
        assert!(config.missing_fields().is_empty());
    }
}
