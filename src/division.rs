use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{DateTime, Utc};
use pelada_core::TeamSheets;
use pelada_server_domain::{app::AppState, division::TeamDivision};
use serde::{Deserialize, Serialize};

use crate::server::MyServiceError;

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonTeamSheets {
    pub team_black: Vec<String>,
    pub team_white: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonDivision {
    pub match_id: String,
    pub created_by: String,
    pub team_black: Vec<String>,
    pub team_white: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_active: bool,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonSaveDivisionRequest {
    pub requester_id: String,
    pub team_black: Vec<String>,
    pub team_white: Vec<String>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonDeleteDivisionRequest {
    pub requester_id: String,
}

impl From<TeamSheets> for JsonTeamSheets {
    fn from(value: TeamSheets) -> Self {
        JsonTeamSheets {
            team_black: value.team_black,
            team_white: value.team_white,
        }
    }
}

impl From<TeamDivision> for JsonDivision {
    fn from(value: TeamDivision) -> Self {
        JsonDivision {
            match_id: value.match_id,
            created_by: value.created_by,
            team_black: value.team_black,
            team_white: value.team_white,
            created_at: value.created_at,
            updated_at: value.updated_at,
            is_active: value.active,
        }
    }
}

#[axum::debug_handler]
pub async fn generate(
    Path(match_id): Path<String>,
    State(app): State<AppState>,
) -> Result<Json<JsonTeamSheets>, MyServiceError> {
    let sheets = app.division_service.generate(&match_id).await?;
    Ok(Json(sheets.into()))
}

#[axum::debug_handler]
pub async fn save(
    Path(match_id): Path<String>,
    State(app): State<AppState>,
    Json(request): Json<JsonSaveDivisionRequest>,
) -> Result<Json<JsonDivision>, MyServiceError> {
    let sheets = TeamSheets {
        team_black: request.team_black,
        team_white: request.team_white,
    };
    let division = app
        .division_service
        .create_or_update(&match_id, &request.requester_id, sheets)
        .await?;
    Ok(Json(division.into()))
}

#[axum::debug_handler]
pub async fn get(
    Path(match_id): Path<String>,
    State(app): State<AppState>,
) -> Result<Json<Option<JsonDivision>>, MyServiceError> {
    let division = app.division_service.get_division(&match_id).await?;
    Ok(Json(division.map(JsonDivision::from)))
}

#[axum::debug_handler]
pub async fn remove(
    Path(match_id): Path<String>,
    State(app): State<AppState>,
    Json(request): Json<JsonDeleteDivisionRequest>,
) -> Result<(), MyServiceError> {
    app.division_service
        .delete(&match_id, &request.requester_id)
        .await?;
    Ok(())
}
