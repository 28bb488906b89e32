use std::time::Duration;
use tokio::time::Instant;

use crate::models::AdCopy;

pub const COPIED_RESET_AFTER: Duration = Duration::from_millis(2000);

/// Text placed on the clipboard for one card.
pub fn clipboard_text(ad: &AdCopy) -> String {
    format!("Headline: {}\n\nBody: {}\n\nCTA: {}", ad.headline, ad.primary_text, ad.call_to_action)
}

/// Per-card "copied" flag that resets itself after [`COPIED_RESET_AFTER`].
#[derive(Debug, Default, Clone, Copy)]
pub struct CopyIndicator {
    copied_at: Option<Instant>,
}

impl CopyIndicator {
    pub fn mark(&mut self) {
        self.copied_at = Some(Instant::now());
    }

    pub fn is_active(&self) -> bool {
        self.copied_at.is_some_and(|at| at.elapsed() < COPIED_RESET_AFTER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AdPlatform;
    use pretty_assertions::assert_eq;
    use uuid::Uuid;

    #[test]
    fn formats_headline_body_and_cta() {
        let ad = AdCopy {
            id: Uuid::new_v4(),
            platform: AdPlatform::Twitter,
            headline: "Go".into(),
            primary_text: "Body text".into(),
            call_to_action: "Try it".into(),
            persuasive_phrase: "Body".into(),
        };
        assert_eq!(clipboard_text(&ad), "Headline: Go\n\nBody: Body text\n\nCTA: Try it");
    }

    #[tokio::test(start_paused = true)]
    async fn indicator_resets_after_two_seconds() {
        let mut indicator = CopyIndicator::default();
        assert!(!indicator.is_active());

        indicator.mark();
        assert!(indicator.is_active());

        tokio::time::advance(Duration::from_millis(1999)).await;
        assert!(indicator.is_active());

        tokio::time::advance(Duration::from_millis(1)).await;
        assert!(!indicator.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn copying_again_restarts_the_window() {
        let mut indicator = CopyIndicator::default();
        indicator.mark();
        tokio::time::advance(Duration::from_millis(1500)).await;
        indicator.mark();
        tokio::time::advance(Duration::from_millis(1500)).await;
        assert!(indicator.is_active());
    }
}
