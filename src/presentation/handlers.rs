// HTTP request handlers
use crate::application::commands::Command;
use crate::application::coordinator::Connectivity;
use crate::presentation::app_state::{AppState, MinerHandle};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Serialize)]
pub struct MinerSummary {
    pub id: String,
    pub name: String,
    pub connectivity: Connectivity,
    pub available: bool,
}

#[derive(Deserialize)]
pub struct FrequencyBody {
    pub frequency: u32,
}

#[derive(Deserialize)]
pub struct VoltageBody {
    pub voltage: u32,
}

#[derive(Deserialize)]
pub struct FanspeedBody {
    pub fanspeed: u32,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// List all configured miners with their derived connectivity.
pub async fn list_miners(State(state): State<Arc<AppState>>) -> Json<Vec<MinerSummary>> {
    let mut miners: Vec<MinerSummary> = state
        .miners
        .iter()
        .map(|(id, handle)| {
            let snapshot = handle.session.latest();
            MinerSummary {
                id: id.clone(),
                name: handle.session.name().to_string(),
                connectivity: snapshot.connectivity,
                available: snapshot.available,
            }
        })
        .collect();
    miners.sort_by(|a, b| a.id.cmp(&b.id));
    Json(miners)
}

/// Latest snapshot for one miner: canonical record, connectivity, history
/// aggregates.
pub async fn get_miner(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    match state.miners.get(&id) {
        Some(handle) => {
            let snapshot = handle.session.latest();
            Json(snapshot.as_ref().clone()).into_response()
        }
        None => miner_not_found(&id),
    }
}

pub async fn restart_miner(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    dispatch(&state, &id, Command::Restart).await
}

pub async fn set_frequency(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(body): Json<FrequencyBody>,
) -> impl IntoResponse {
    dispatch(&state, &id, Command::SetFrequency(body.frequency)).await
}

pub async fn set_voltage(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(body): Json<VoltageBody>,
) -> impl IntoResponse {
    dispatch(&state, &id, Command::SetVoltage(body.voltage)).await
}

pub async fn set_fanspeed(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(body): Json<FanspeedBody>,
) -> impl IntoResponse {
    dispatch(&state, &id, Command::SetFanspeed(body.fanspeed)).await
}

async fn dispatch(state: &AppState, id: &str, command: Command) -> axum::response::Response {
    let Some(handle) = state.miners.get(id) else {
        return miner_not_found(id);
    };
    match handle.dispatcher.send(command).await {
        Ok(()) => {
            // Observe the effect without waiting for the next scheduled tick.
            refresh_after_command(handle);
            StatusCode::NO_CONTENT.into_response()
        }
        Err(err) => (
            StatusCode::BAD_GATEWAY,
            Json(ErrorBody {
                error: err.to_string(),
            }),
        )
            .into_response(),
    }
}

fn refresh_after_command(handle: &MinerHandle) {
    handle.session.request_refresh();
}

fn miner_not_found(id: &str) -> axum::response::Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody {
            error: format!("unknown miner: {id}"),
        }),
    )
        .into_response()
}
