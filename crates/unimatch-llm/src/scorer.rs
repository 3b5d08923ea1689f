//! LLM-backed admission scorer.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};
use unimatch_config::{KnowledgeBase, LlmSettings};
use unimatch_core::{Features, UnimatchError};
use unimatch_engine::program_matches;

use crate::calibrator::Calibrator;
use crate::client::ChatClient;
use crate::{AdmissionScorer, LlmScore, ScoreTarget};

/// Multiplier applied when the target major belongs to the other study track.
const PROGRAM_MISMATCH_FACTOR: f64 = 0.6;

const SYSTEM_PROMPT: &str = "You are an admissions analyst for Indonesian state universities \
(report-card admission route). Given a student's profile and a target study program, estimate \
the probability that the student is admitted. rapor_avg is the mean semester report grade and \
core_avg the mean of the core subjects for the student's track, both on a 0-100 scale. \
rank_percentile is the class rank percentile where 1 is the top. Reply with a single JSON \
object: {\"probability\": number between 0 and 1, \"explanation\": short string, \
\"weights\": object mapping each factor you used to its relative importance}.";

#[derive(Debug, Deserialize)]
struct LlmReply {
    probability: f64,
    #[serde(default)]
    explanation: String,
    #[serde(default)]
    weights: Option<serde_json::Value>,
}

/// Extracts the JSON object from a reply that may be wrapped in prose or code fences.
fn parse_reply(content: &str) -> Result<LlmReply, UnimatchError> {
    let (Some(start), Some(end)) = (content.find('{'), content.rfind('}')) else {
        return Err(UnimatchError::ParseError("no JSON object in LLM reply".into()));
    };
    if end < start {
        return Err(UnimatchError::ParseError("no JSON object in LLM reply".into()));
    }

    let reply: LlmReply = serde_json::from_str(&content[start..=end])?;
    if !reply.probability.is_finite() {
        return Err(UnimatchError::ParseError("probability is not a number".into()));
    }
    Ok(reply)
}

/// Accepts percentages as well as fractions and clamps to `[0, 1]`.
fn normalize_probability(p: f64) -> f64 {
    let p = if p > 1.0 && p <= 100.0 { p / 100.0 } else { p };
    p.clamp(0.0, 1.0)
}

pub struct LlmScorer {
    client: ChatClient,
    kb: Arc<KnowledgeBase>,
    calibrator: Calibrator,
}

impl LlmScorer {
    pub fn new(settings: &LlmSettings, kb: Arc<KnowledgeBase>) -> Result<Self, UnimatchError> {
        let client = ChatClient::new(settings)?;
        let calibrator = Calibrator::new(kb.calibrator);
        Ok(Self {
            client,
            kb,
            calibrator,
        })
    }

    fn user_prompt(&self, features: &Features, target: &ScoreTarget) -> String {
        let distribution = target.key.as_deref().and_then(|k| self.kb.distros.get(k));
        let payload = json!({
            "student": features,
            "target": target.label,
            "program_card": target.card,
            "admitted_score_distribution": distribution,
        });
        serde_json::to_string_pretty(&payload).unwrap_or_else(|_| payload.to_string())
    }
}

#[async_trait]
impl AdmissionScorer for LlmScorer {
    async fn score(&self, features: &Features, target: &ScoreTarget) -> Result<LlmScore, UnimatchError> {
        info!("Scoring {} with {}", target.label, self.client.model());

        let content = self
            .client
            .chat_json(SYSTEM_PROMPT, &self.user_prompt(features, target))
            .await?;
        let reply = parse_reply(&content)?;

        let probability_raw = normalize_probability(reply.probability);
        let program_match = program_matches(features.program, target.major_name());

        let mut probability = self.calibrator.apply(probability_raw);
        if !program_match {
            warn!(
                "Target {} does not fit the {} track",
                target.label, features.program
            );
            probability *= PROGRAM_MISMATCH_FACTOR;
        }

        Ok(LlmScore {
            probability,
            probability_raw,
            program_match,
            weights: reply.weights,
            explanation: reply.explanation,
        })
    }

    fn calibrator_loaded(&self) -> bool {
        self.calibrator.loaded()
    }
}
