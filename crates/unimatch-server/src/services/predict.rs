//! Single-target admission prediction.

use tracing::{info, warn};
use unimatch_config::KnowledgeBase;
use unimatch_core::{decision_label, recommendations, Features};
use unimatch_engine::find_best_match;
use unimatch_llm::{AdmissionScorer, ScoreTarget};

use crate::dto::{BaselineDetails, LlmDetails, PredictDetails, PredictResponse};
use crate::ServerState;

/// Target for the LLM: the matched KB entry, else the requested major.
fn resolve_target(kb: &KnowledgeBase, features: &Features) -> ScoreTarget {
    let entries = kb.entries();
    let matched = find_best_match(
        &entries,
        features.target_university.as_deref(),
        features.target_major.as_deref(),
    );

    match matched {
        Some((key, card)) => ScoreTarget::matched(key, card),
        None => {
            let major = features
                .target_major
                .as_deref()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or("Unknown");
            ScoreTarget::major(major)
        }
    }
}

async fn predict_llm(
    scorer: &dyn AdmissionScorer,
    state: &ServerState,
    features: &Features,
) -> Option<PredictResponse> {
    // Fuzzy matching scans the whole KB, so keep it off the async workers.
    let kb = state.kb.clone();
    let query = features.clone();
    let target = match tokio::task::spawn_blocking(move || resolve_target(&kb, &query)).await {
        Ok(t) => t,
        Err(e) => {
            warn!("Target resolution failed, falling back to baseline model: {}", e);
            return None;
        }
    };
    let matched_university_major = target.card.as_ref().map(|c| c.display_name());

    let score = match scorer.score(features, &target).await {
        Ok(s) => s,
        Err(e) => {
            warn!("LLM scoring failed, falling back to baseline model: {}", e);
            return None;
        }
    };

    let label = decision_label(score.probability);
    info!(
        "LLM prediction for {}: {:.3} ({:?})",
        target.label, score.probability, label
    );

    Some(PredictResponse {
        probability: score.probability,
        label,
        tips: recommendations(score.probability, features),
        details: PredictDetails::Llm(LlmDetails {
            features: features.clone(),
            probability_raw: score.probability_raw,
            program_match: score.program_match,
            matched_university_major,
        }),
        weights: score.weights,
        explanation: Some(score.explanation),
    })
}

fn predict_baseline(state: &ServerState, features: Features) -> PredictResponse {
    let probability = state.baseline.predict_proba(&features);
    let label = decision_label(probability);
    info!("Baseline prediction: {:.3} ({:?})", probability, label);

    PredictResponse {
        probability,
        label,
        tips: recommendations(probability, &features),
        details: PredictDetails::Baseline(BaselineDetails {
            features,
            probability,
            label,
        }),
        weights: None,
        explanation: None,
    }
}

/// Scores with the LLM when available, otherwise with the baseline model.
pub async fn predict(state: &ServerState, features: Features) -> PredictResponse {
    if let Some(scorer) = &state.scorer {
        if let Some(resp) = predict_llm(scorer.as_ref(), state, &features).await {
            return resp;
        }
    }
    predict_baseline(state, features)
}
