//! Core domain types and error definitions for unimatch.
//!
//! This crate provides the fundamental types shared across the unimatch crates:
//!
//! - [`UnimatchError`]: Error type for scoring, LLM and knowledge-base operations
//! - [`PredictRequest`] and [`Features`]: Student input and the derived scoring features
//! - [`MajorCard`]: A university/major entry of the knowledge base
//! - [`decision_label`], [`Bucket`] and [`recommendations`]: Probability interpretation
//!
//! # Example
//!
//! ```rust
//! use unimatch_core::{decision_label, Features, Label, PredictRequest};
//!
//! let req: PredictRequest = serde_json::from_str(
//!     r#"{"program": "saintek", "s1": 90, "s2": 88, "math": 92}"#,
//! ).unwrap();
//! req.validate().unwrap();
//!
//! let features = Features::from_request(&req);
//! assert_eq!(features.rapor_avg, 89.0);
//! assert_eq!(decision_label(0.82), Label::Likely);
//! ```

mod advice;
mod request;

pub use advice::{decision_label, recommendations, Bucket, Label};
pub use request::{average, Features, PredictRequest, RecommendTargets};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

// ─────────────────────────────────────────────────────────────────────────────
// Error
// ─────────────────────────────────────────────────────────────────────────────

/// Errors that can occur while validating input or scoring a student.
#[derive(Error, Debug)]
pub enum UnimatchError {
    /// Request body failed validation.
    #[error("{0}")]
    InvalidPayload(String),

    /// LLM API request failed.
    #[error("LLM request failed: {0}")]
    LlmError(String),

    /// Failed to parse structured output.
    #[error("Failed to parse structured output: {0}")]
    ParseError(String),

    /// No knowledge base entries are available.
    #[error("Knowledge base not found. Run build_kb.py first.")]
    KnowledgeBaseMissing,
}

impl From<serde_json::Error> for UnimatchError {
    fn from(err: serde_json::Error) -> Self {
        UnimatchError::ParseError(err.to_string())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Enumerations
// ─────────────────────────────────────────────────────────────────────────────

/// Study track a student applies through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Program {
    /// Science and technology.
    Saintek,
    /// Social sciences and humanities.
    Soshum,
}

impl Program {
    pub fn as_str(&self) -> &'static str {
        match self {
            Program::Saintek => "saintek",
            Program::Soshum => "soshum",
        }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How contested a program is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Competitiveness {
    Very,
    #[default]
    High,
    Mid,
    Low,
}

impl Competitiveness {
    /// Score points subtracted for this level.
    pub fn penalty(&self) -> i32 {
        match self {
            Competitiveness::Very => 5,
            Competitiveness::High => 3,
            Competitiveness::Mid => 1,
            Competitiveness::Low => 0,
        }
    }
}

impl FromStr for Competitiveness {
    type Err = UnimatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "very" => Ok(Competitiveness::Very),
            "high" => Ok(Competitiveness::High),
            "mid" => Ok(Competitiveness::Mid),
            "low" => Ok(Competitiveness::Low),
            other => Err(UnimatchError::InvalidPayload(format!(
                "unknown competitiveness: {}",
                other
            ))),
        }
    }
}

/// Highest level of competition the student won.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Achievement {
    #[default]
    None,
    School,
    Prov,
    National,
}

impl Achievement {
    pub fn bonus(&self) -> i32 {
        match self {
            Achievement::None => 0,
            Achievement::School => 1,
            Achievement::Prov => 3,
            Achievement::National => 5,
        }
    }

    /// Provincial or national level.
    pub fn is_strong(&self) -> bool {
        matches!(self, Achievement::Prov | Achievement::National)
    }
}

/// Accreditation grade of the student's school.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Accreditation {
    A,
    #[default]
    B,
    C,
}

impl Accreditation {
    pub fn adjustment(&self) -> i32 {
        match self {
            Accreditation::A => 1,
            Accreditation::B => 0,
            Accreditation::C => -1,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Knowledge Base Card
// ─────────────────────────────────────────────────────────────────────────────

/// A single university/major entry of the knowledge base.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MajorCard {
    #[serde(default)]
    pub university: Option<String>,
    #[serde(default)]
    pub major: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub sheet: Option<String>,
    /// Competitiveness index in `0.0..=1.0`. Non-numeric values read as absent.
    #[serde(default, deserialize_with = "number_or_none")]
    pub ci: Option<f64>,
    #[serde(default)]
    pub competitiveness: Option<String>,
}

fn number_or_none<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_f64())
}

impl MajorCard {
    pub fn university_name(&self) -> &str {
        self.university.as_deref().unwrap_or("")
    }

    pub fn major_name(&self) -> &str {
        self.major.as_deref().unwrap_or("")
    }

    /// "University - Major" display form.
    pub fn display_name(&self) -> String {
        format!("{} - {}", self.university_name(), self.major_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_points() {
        assert_eq!(Competitiveness::Very.penalty(), 5);
        assert_eq!(Competitiveness::default().penalty(), 3);
        assert_eq!(Achievement::National.bonus(), 5);
        assert!(Achievement::Prov.is_strong());
        assert!(!Achievement::School.is_strong());
        assert_eq!(Accreditation::C.adjustment(), -1);
    }

    #[test]
    fn test_competitiveness_from_str() {
        assert_eq!("Very".parse::<Competitiveness>().unwrap(), Competitiveness::Very);
        assert_eq!(" mid ".parse::<Competitiveness>().unwrap(), Competitiveness::Mid);
        assert!("extreme".parse::<Competitiveness>().is_err());
    }

    #[test]
    fn test_accreditation_serde_is_uppercase() {
        let a: Accreditation = serde_json::from_str("\"A\"").unwrap();
        assert_eq!(a, Accreditation::A);
        assert!(serde_json::from_str::<Accreditation>("\"a\"").is_err());
    }

    #[test]
    fn test_major_card_display() {
        let card: MajorCard = serde_json::from_str(
            r#"{"university": "Universitas Indonesia", "major": "Ilmu Komputer", "ci": 0.9}"#,
        )
        .unwrap();
        assert_eq!(card.display_name(), "Universitas Indonesia - Ilmu Komputer");
        assert_eq!(card.ci, Some(0.9));
        assert!(card.level.is_none());
    }

    #[test]
    fn test_major_card_non_numeric_ci() {
        for raw in [r#""n/a""#, r#""0.7""#, "null", "[]"] {
            let card: MajorCard = serde_json::from_str(&format!(
                r#"{{"major": "Farmasi", "ci": {}, "competitiveness": "very"}}"#,
                raw
            ))
            .unwrap();
            assert_eq!(card.ci, None, "ci {}", raw);
            assert_eq!(card.competitiveness.as_deref(), Some("very"));
        }

        let card: MajorCard = serde_json::from_str(r#"{"ci": 1}"#).unwrap();
        assert_eq!(card.ci, Some(1.0));
    }
}
