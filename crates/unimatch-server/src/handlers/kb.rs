//! Knowledge base lookup handlers.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::dto::{
    KbStatsResponse, MajorsFullResponse, MajorsResponse, UniversitiesResponse,
    UniversityMajorsResponse,
};
use crate::ServerState;

/// GET /api/kb/stats - Knowledge base and scorer status.
pub async fn stats(State(state): State<Arc<ServerState>>) -> Json<KbStatsResponse> {
    if !state.use_llm {
        return Json(KbStatsResponse::Disabled { llm_enabled: false });
    }

    Json(KbStatsResponse::Enabled {
        llm_enabled: state.llm_enabled(),
        majors_count: state.kb.majors.len(),
        distros_keys: state.kb.distro_keys().into_iter().map(String::from).collect(),
        calibrator_loaded: state.calibrator_loaded(),
    })
}

/// GET /api/kb/universities - Unique university names.
pub async fn universities(State(state): State<Arc<ServerState>>) -> Json<UniversitiesResponse> {
    let universities = state.kb.universities();
    Json(UniversitiesResponse {
        count: universities.len(),
        universities,
    })
}

/// GET /api/kb/majors - Unique major names.
pub async fn majors(State(state): State<Arc<ServerState>>) -> Json<MajorsResponse> {
    let majors = state.kb.major_names();
    Json(MajorsResponse {
        count: majors.len(),
        majors,
    })
}

/// GET /api/kb/universities/{name}/majors - Majors offered by one university.
pub async fn university_majors(
    State(state): State<Arc<ServerState>>,
    Path(university): Path<String>,
) -> Json<UniversityMajorsResponse> {
    let majors = state.kb.majors_at(&university);
    Json(UniversityMajorsResponse {
        university,
        count: majors.len(),
        majors,
    })
}

/// GET /api/kb/majors-full - Major names plus every KB card.
pub async fn majors_full(State(state): State<Arc<ServerState>>) -> Response {
    let majors = state.kb.major_names();
    Json(MajorsFullResponse {
        count: majors.len(),
        majors,
        details: &state.kb.majors,
    })
    .into_response()
}
