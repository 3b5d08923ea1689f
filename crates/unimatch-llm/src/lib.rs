//! LLM-backed admission scoring for unimatch.
//!
//! [`LlmScorer`] asks an OpenAI-compatible chat model for an admission
//! probability, then recalibrates it with the knowledge base's [`Calibrator`]
//! and discounts targets outside the student's study track.

mod calibrator;
mod client;
mod scorer;

pub use calibrator::Calibrator;
pub use client::ChatClient;
pub use scorer::LlmScorer;

use async_trait::async_trait;
use serde::Serialize;
use unimatch_core::{Features, MajorCard, UnimatchError};

/// What a student is being scored against.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreTarget {
    /// Text shown to the model, "University - Major" for KB matches.
    pub label: String,
    pub key: Option<String>,
    pub card: Option<MajorCard>,
}

impl ScoreTarget {
    /// A resolved knowledge-base entry.
    pub fn matched(key: &str, card: &MajorCard) -> Self {
        Self {
            label: card.display_name(),
            key: Some(key.to_string()),
            card: Some(card.clone()),
        }
    }

    /// A bare major name with no KB entry.
    pub fn major(name: &str) -> Self {
        Self {
            label: name.to_string(),
            key: None,
            card: None,
        }
    }

    /// Major name used for track checks.
    pub fn major_name(&self) -> &str {
        match &self.card {
            Some(card) if !card.major_name().is_empty() => card.major_name(),
            _ => &self.label,
        }
    }
}

/// Result of an LLM scoring call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LlmScore {
    /// Calibrated and track-adjusted probability.
    pub probability: f64,
    /// Probability as returned by the model, clamped to `[0, 1]`.
    pub probability_raw: f64,
    pub program_match: bool,
    pub weights: Option<serde_json::Value>,
    pub explanation: String,
}

/// A scorer producing admission probabilities for a target.
#[async_trait]
pub trait AdmissionScorer: Send + Sync {
    async fn score(&self, features: &Features, target: &ScoreTarget) -> Result<LlmScore, UnimatchError>;

    fn calibrator_loaded(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_target_major_name() {
        let card = MajorCard {
            university: Some("Universitas Airlangga".into()),
            major: Some("Farmasi".into()),
            ..Default::default()
        };
        let matched = ScoreTarget::matched("unair-farmasi", &card);
        assert_eq!(matched.label, "Universitas Airlangga - Farmasi");
        assert_eq!(matched.major_name(), "Farmasi");

        let bare = ScoreTarget::major("Psikologi");
        assert_eq!(bare.major_name(), "Psikologi");
        assert!(bare.key.is_none());
    }
}
