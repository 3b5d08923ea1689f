//! Logistic admission scoring from report grades and profile bonuses.

use serde::Serialize;
use unimatch_core::{Accreditation, Competitiveness, Features, MajorCard, Program};

/// Score at which the admission probability is 0.5.
const PIVOT_SCORE: f64 = 75.0;
const STEEPNESS: f64 = 0.25;

const SAINTEK_KEYWORDS: &[&str] = &[
    "fisika", "kimia", "biologi", "kedokteran", "informatika", "statistika", "elektro", "mesin",
    "teknik", "matematika", "farmasi", "geologi", "perikanan", "arsitektur", "kehutanan",
    "pertanian",
];

const SOSHUM_KEYWORDS: &[&str] = &[
    "hukum", "ekonomi", "manajemen", "akuntansi", "psikologi", "sosiologi", "sejarah", "ilmu",
    "komunikasi", "bahasa", "pendidikan", "administrasi", "hubungan", "politik", "pariwisata",
    "bisnis",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bonuses {
    pub rank_bonus: i32,
    pub achievement_bonus: i32,
    pub accreditation_adj: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Penalties {
    pub competitiveness: i32,
}

/// Breakdown of how a score was reached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreComponents {
    pub base: f64,
    pub bonuses: Bonuses,
    pub penalties: Penalties,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCard {
    pub probability: f64,
    pub components: ScoreComponents,
    pub tags: Vec<String>,
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

fn rank_bonus(rank: u32) -> i32 {
    match rank {
        0..=10 => 3,
        11..=20 => 2,
        21..=40 => 1,
        _ => 0,
    }
}

/// Penalty from the card's competitiveness index, its label, or the request's level.
fn competitiveness_penalty(features: &Features, card: &MajorCard) -> i32 {
    if let Some(ci) = card.ci {
        return (5.0 * ci).round_ties_even() as i32;
    }

    match card.competitiveness.as_deref().filter(|s| !s.trim().is_empty()) {
        Some(label) => label
            .parse::<Competitiveness>()
            .map(|c| c.penalty())
            .unwrap_or(Competitiveness::High.penalty()),
        None => features.competitiveness.penalty(),
    }
}

/// Scores `features` against one KB card.
pub fn score_components(features: &Features, card: &MajorCard) -> ScoredCard {
    let rank = features.rank_or_default();
    let rank_bonus = rank_bonus(rank);
    let achievement_bonus = features.achievement.bonus();
    let accreditation_adj = features.accreditation.adjustment();
    let comp_pen = competitiveness_penalty(features, card);

    let base = 0.6 * features.rapor_avg + 0.4 * features.core_avg;
    let score = base + f64::from(rank_bonus + achievement_bonus + accreditation_adj - comp_pen);
    let probability = sigmoid(STEEPNESS * (score - PIVOT_SCORE));

    let mut tags = Vec::new();
    if rank <= 10 {
        tags.push("Top-10% rank".to_string());
    } else if rank <= 20 {
        tags.push("Top-20% rank".to_string());
    }
    if features.achievement.is_strong() {
        tags.push("Strong achievements".to_string());
    }
    if features.accreditation == Accreditation::A {
        tags.push("School A".to_string());
    }
    if comp_pen <= 1 {
        tags.push("Low competition".to_string());
    } else if comp_pen >= 5 {
        tags.push("Very competitive".to_string());
    }

    ScoredCard {
        probability,
        components: ScoreComponents {
            base: round2(base),
            bonuses: Bonuses {
                rank_bonus,
                achievement_bonus,
                accreditation_adj,
            },
            penalties: Penalties {
                competitiveness: comp_pen,
            },
            score: round2(score),
        },
        tags,
    }
}

/// Scorer used when no LLM is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct BaselineModel;

impl BaselineModel {
    pub fn new() -> Self {
        Self
    }

    /// Probability against a card-less target, so the request's competitiveness applies.
    pub fn predict_proba(&self, features: &Features) -> f64 {
        score_components(features, &MajorCard::default()).probability
    }
}

/// Guesses the study track of a major from keywords in its name.
pub fn guess_program(major: &str) -> Option<Program> {
    let name = major.to_lowercase();
    if SAINTEK_KEYWORDS.iter().any(|k| name.contains(k)) {
        return Some(Program::Saintek);
    }
    if SOSHUM_KEYWORDS.iter().any(|k| name.contains(k)) {
        return Some(Program::Soshum);
    }
    None
}

/// True when the major's guessed track is unknown or equal to `program`.
pub fn program_matches(program: Program, major: &str) -> bool {
    guess_program(major).map_or(true, |guessed| guessed == program)
}
