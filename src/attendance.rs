use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{DateTime, Utc};
use pelada_server_domain::{
    app::AppState,
    roster::{AttendanceList, AttendanceStatus, ResolvedEntry},
};
use serde::{Deserialize, Serialize};

use crate::server::MyServiceError;

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonAttendanceEntry {
    pub player_id: String,
    pub name: String,
    pub position: u32,
    pub status: JsonAttendanceStatus,
    pub monthly_payer: bool,
    pub joined_at: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonAttendanceStatus {
    Confirmed,
    Waiting,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonAttendanceList {
    pub match_id: String,
    pub max_players: u32,
    pub confirmed_count: usize,
    pub waiting_count: usize,
    pub entries: Vec<JsonAttendanceEntry>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonJoinRequest {
    pub player_id: String,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonLeaveRequest {
    pub requester_id: String,
}

fn json_entry_from_resolved(resolved: &ResolvedEntry) -> JsonAttendanceEntry {
    JsonAttendanceEntry {
        player_id: resolved.entry.player_id.clone(),
        name: resolved.player.name.clone(),
        position: resolved.entry.position,
        status: match resolved.status {
            AttendanceStatus::Confirmed => JsonAttendanceStatus::Confirmed,
            AttendanceStatus::Waiting => JsonAttendanceStatus::Waiting,
        },
        monthly_payer: resolved.player.monthly_payer,
        joined_at: resolved.entry.joined_at,
    }
}

pub fn json_list_from_list(list: &AttendanceList) -> JsonAttendanceList {
    JsonAttendanceList {
        match_id: list.match_id.clone(),
        max_players: list.max_players,
        confirmed_count: list.confirmed_count(),
        waiting_count: list.waiting_count(),
        entries: list.entries.iter().map(json_entry_from_resolved).collect(),
    }
}

#[axum::debug_handler]
pub async fn join(
    Path(match_id): Path<String>,
    State(app): State<AppState>,
    Json(request): Json<JsonJoinRequest>,
) -> Result<Json<JsonAttendanceList>, MyServiceError> {
    app.roster_service.join(&match_id, &request.player_id).await?;
    let list = app.roster_service.get_list(&match_id).await?;
    Ok(Json(json_list_from_list(&list)))
}

#[axum::debug_handler]
pub async fn leave(
    Path((match_id, player_id)): Path<(String, String)>,
    State(app): State<AppState>,
    Json(request): Json<JsonLeaveRequest>,
) -> Result<Json<JsonAttendanceList>, MyServiceError> {
    if request.requester_id == player_id {
        app.roster_service.leave(&match_id, &player_id).await?;
    } else {
        app.roster_service
            .remove_player(&match_id, &request.requester_id, &player_id)
            .await?;
    }
    let list = app.roster_service.get_list(&match_id).await?;
    Ok(Json(json_list_from_list(&list)))
}

#[axum::debug_handler]
pub async fn get_list(
    Path(match_id): Path<String>,
    State(app): State<AppState>,
) -> Result<Json<JsonAttendanceList>, MyServiceError> {
    let list = app.roster_service.get_list(&match_id).await?;
    Ok(Json(json_list_from_list(&list)))
}
