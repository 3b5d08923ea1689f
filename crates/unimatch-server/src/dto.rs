use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use unimatch_core::{Features, Label, MajorCard};

// === Service info DTOs ===

#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub name: &'static str,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub name: &'static str,
    pub version: &'static str,
    pub llm_enabled: bool,
}

// === Knowledge base DTOs ===

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum KbStatsResponse {
    Disabled {
        llm_enabled: bool,
    },
    Enabled {
        llm_enabled: bool,
        majors_count: usize,
        distros_keys: Vec<String>,
        calibrator_loaded: bool,
    },
}

#[derive(Debug, Serialize)]
pub struct UniversitiesResponse {
    pub universities: Vec<String>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct MajorsResponse {
    pub majors: Vec<String>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct UniversityMajorsResponse {
    pub university: String,
    pub majors: Vec<String>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct MajorsFullResponse<'a> {
    pub majors: Vec<String>,
    pub details: &'a BTreeMap<String, MajorCard>,
    pub count: usize,
}

// === Prediction DTOs ===

/// Detail block of an LLM-scored prediction.
#[derive(Debug, Serialize)]
pub struct LlmDetails {
    #[serde(flatten)]
    pub features: Features,
    pub probability_raw: f64,
    pub program_match: bool,
    pub matched_university_major: Option<String>,
}

/// Detail block of a baseline-model prediction.
#[derive(Debug, Serialize)]
pub struct BaselineDetails {
    #[serde(flatten)]
    pub features: Features,
    pub probability: f64,
    pub label: Label,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum PredictDetails {
    Llm(LlmDetails),
    Baseline(BaselineDetails),
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub probability: f64,
    pub label: Label,
    pub details: PredictDetails,
    pub tips: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weights: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

// === Recommendation DTOs ===

/// Raw `/api/recommend` query; values are parsed by the handler.
#[derive(Debug, Default, Deserialize)]
pub struct RecommendQuery {
    pub pref_n: Option<String>,
    pub alt_n: Option<String>,
    pub per_uni: Option<String>,
}
