//! Prediction and recommendation handlers.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use tracing::{error, info};
use unimatch_core::{Features, PredictRequest};
use unimatch_engine::{recommend as rank, RecommendParams, RecommendResult};

use crate::dto::{PredictResponse, RecommendQuery};
use crate::error::AppError;
use crate::services::predict as predict_service;
use crate::ServerState;

fn parse_request(body: &[u8]) -> Result<PredictRequest, AppError> {
    let req: PredictRequest = serde_json::from_slice(body).map_err(AppError::invalid_payload)?;
    req.validate()?;
    Ok(req)
}

fn parse_param(name: &str, raw: Option<&str>, default: usize) -> Result<usize, AppError> {
    match raw {
        None => Ok(default),
        Some(v) => v.trim().parse().map_err(|_| {
            AppError::BadRequest(format!("Invalid query parameter {}: {}", name, v))
        }),
    }
}

impl RecommendQuery {
    fn params(&self) -> Result<RecommendParams, AppError> {
        let defaults = RecommendParams::default();
        Ok(RecommendParams {
            pref_n: parse_param("pref_n", self.pref_n.as_deref(), defaults.pref_n)?,
            alt_n: parse_param("alt_n", self.alt_n.as_deref(), defaults.alt_n)?,
            per_uni: parse_param("per_uni", self.per_uni.as_deref(), defaults.per_uni)?,
        })
    }
}

/// POST /api/predict - Admission probability for one target.
pub async fn predict(
    State(state): State<Arc<ServerState>>,
    body: Bytes,
) -> Result<Json<PredictResponse>, AppError> {
    let mut req = parse_request(&body)?;
    req.normalize_for_predict();
    let features = Features::from_request(&req);

    info!(
        "Predict: program={}, target={:?} @ {:?}",
        features.program, features.target_major, features.target_university
    );

    Ok(Json(predict_service::predict(&state, features).await))
}

/// POST /api/recommend - Preferred and alternative majors from the knowledge base.
pub async fn recommend(
    State(state): State<Arc<ServerState>>,
    query: Result<Query<RecommendQuery>, QueryRejection>,
    body: Bytes,
) -> Result<Json<RecommendResult>, AppError> {
    let Query(query) = query.map_err(|e| {
        AppError::BadRequest(format!("Invalid query string: {}", e.body_text()))
    })?;
    let params = query.params()?;
    let mut req = parse_request(&body)?;
    let targets = req.normalize_for_recommend();
    let features = Features::from_request(&req);

    let kb = state.kb.clone();
    let result = tokio::task::spawn_blocking(move || rank(&kb, &features, &targets, params))
        .await
        .map_err(AppError::internal)?
        .map_err(|e| {
            error!("Failed to rank recommendations: {}", e);
            AppError::from(e)
        })?;

    Ok(Json(result))
}
