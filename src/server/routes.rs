use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use crate::histogram::Histogram;
use crate::passenger::Passenger;
use crate::server::AppState;
use crate::{Error, Result};

/// Message returned for every failure whose cause must not leak.
pub const INTERNAL_FAILURE: &str = "something went wrong, please try again";

#[derive(Deserialize)]
pub struct PassengerParams {
    pub attributes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
    pub code: u16,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    pub code: u16,
    pub state: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn error_response(err: Error) -> ApiError {
    let (status, message) = match &err {
        Error::NotFound(id) => {
            tracing::debug!("Passenger {} not found", id);
            (StatusCode::NOT_FOUND, err.to_string())
        }
        e if e.is_client_error() => {
            tracing::debug!("Rejected request: {}", e);
            (StatusCode::BAD_REQUEST, e.to_string())
        }
        e => {
            tracing::error!("Request failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_FAILURE.to_string())
        }
    };

    (status, Json(ErrorResponse { message, code: status.as_u16() }))
}

/// Run a store call on the blocking pool; both backends do synchronous I/O.
async fn run_blocking<T, F>(f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| Error::StoreUnavailable(format!("store task failed: {}", e)))?
}

pub async fn get_passengers(
    State(state): State<Arc<AppState>>,
) -> std::result::Result<Json<Vec<Passenger>>, ApiError> {
    let service = state.service.clone();
    let passengers = run_blocking(move || service.get_all()).await.map_err(error_response)?;
    Ok(Json(passengers))
}

pub async fn get_passenger(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
    Query(params): Query<PassengerParams>,
) -> std::result::Result<Response, ApiError> {
    let attributes = params.attributes.unwrap_or_default();
    let service = state.service.clone();
    let (passenger, filter) = run_blocking(move || service.lookup(&raw_id, &attributes))
        .await
        .map_err(error_response)?;

    Ok(Json(filter.apply(&passenger)).into_response())
}

pub async fn get_fare_histogram(
    State(state): State<Arc<AppState>>,
) -> std::result::Result<Json<Histogram>, ApiError> {
    let service = state.service.clone();
    let histogram = run_blocking(move || service.fare_histogram()).await.map_err(error_response)?;
    Ok(Json(histogram))
}

pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        code: StatusCode::OK.as_u16(),
        state: "OK".to_string(),
    })
}
