//! Turning admission probabilities into labels, buckets and advice.

use serde::Serialize;

use crate::{Achievement, Features};

const HIGH_CHANCE: f64 = 0.70;
const MID_CHANCE: f64 = 0.40;

/// Human-readable decision for a probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Label {
    Likely,
    Borderline,
    Unlikely,
}

pub fn decision_label(probability: f64) -> Label {
    if probability >= HIGH_CHANCE {
        Label::Likely
    } else if probability >= MID_CHANCE {
        Label::Borderline
    } else {
        Label::Unlikely
    }
}

/// Recommendation bucket of a candidate major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    Safe,
    Target,
    Reach,
}

impl Bucket {
    pub fn from_probability(probability: f64) -> Self {
        if probability >= HIGH_CHANCE {
            Bucket::Safe
        } else if probability >= MID_CHANCE {
            Bucket::Target
        } else {
            Bucket::Reach
        }
    }
}

/// Builds study tips for a student given their predicted chance.
pub fn recommendations(probability: f64, features: &Features) -> Vec<String> {
    let mut tips = Vec::new();

    if features.rapor_avg < 85.0 {
        tips.push(format!(
            "Raise your report average (currently {:.1}); most competitive programs expect 85 or above.",
            features.rapor_avg
        ));
    }

    if features.core_avg < features.rapor_avg {
        tips.push(format!(
            "Core {} subjects ({:.1}) trail your overall average; focus study time there.",
            features.program, features.core_avg
        ));
    }

    if features.rank_or_default() > 20 {
        tips.push("Aim for the top 20% of your class to earn a rank bonus.".to_string());
    }

    if features.achievement == Achievement::None {
        tips.push(
            "Enter academic competitions; provincial or national awards add significant weight."
                .to_string(),
        );
    }

    if features.competitiveness.penalty() >= 3 {
        tips.push(
            "This program is highly contested; prepare a less competitive alternative.".to_string(),
        );
    }

    if probability < MID_CHANCE {
        tips.push("Add safer choices to your list to balance the risk.".to_string());
    } else if probability >= HIGH_CHANCE {
        tips.push("Your profile looks strong; keep your grades consistent.".to_string());
    }

    tips
}
