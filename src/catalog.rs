use axum::{
    Json,
    extract::State,
};
use chrono::{DateTime, Utc};
use pelada_core::FieldPosition;
use pelada_server_domain::{
    app::AppState,
    matches::{Match, MatchStatus},
    player::{DEFAULT_SCORE, MAX_SCORE, Player},
};
use serde::{Deserialize, Serialize};

use crate::server::MyServiceError;

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonMatch {
    pub id: String,
    pub location: String,
    pub scheduled_at: DateTime<Utc>,
    pub max_players: u32,
    pub player_count: u32,
    pub status: String,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonPlayer {
    pub id: String,
    pub name: String,
    pub score: u32,
    pub positions: Vec<String>,
    pub monthly_payer: bool,
    pub is_admin: bool,
    pub is_active: bool,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonCreateMatchRequest {
    pub location: String,
    pub scheduled_at: DateTime<Utc>,
    pub max_players: u32,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonCreatePlayerRequest {
    pub name: String,
    pub score: Option<u32>,
    pub positions: Vec<String>,
    pub monthly_payer: Option<bool>,
    pub is_admin: Option<bool>,
}

impl From<Match> for JsonMatch {
    fn from(value: Match) -> Self {
        JsonMatch {
            id: value.id,
            location: value.location,
            scheduled_at: value.scheduled_at,
            max_players: value.max_players,
            player_count: value.player_count,
            status: value.status.label().to_string(),
        }
    }
}

impl From<Player> for JsonPlayer {
    fn from(value: Player) -> Self {
        JsonPlayer {
            id: value.id,
            name: value.name,
            score: value.score,
            positions: value
                .positions
                .iter()
                .map(|position| position.label().to_string())
                .collect(),
            monthly_payer: value.monthly_payer,
            is_admin: value.admin,
            is_active: value.active,
        }
    }
}

#[axum::debug_handler]
pub async fn get_matches(
    State(app): State<AppState>,
) -> Result<Json<Vec<JsonMatch>>, MyServiceError> {
    let matches = app.match_repository.get_matches().await?;
    Ok(Json(matches.into_iter().map(JsonMatch::from).collect()))
}

#[axum::debug_handler]
pub async fn create_match(
    State(app): State<AppState>,
    Json(request): Json<JsonCreateMatchRequest>,
) -> Result<Json<JsonMatch>, MyServiceError> {
    let match_record = Match {
        id: uuid::Uuid::new_v4().to_string(),
        location: request.location,
        scheduled_at: request.scheduled_at,
        max_players: request.max_players,
        player_count: 0,
        status: MatchStatus::Scheduled,
    };
    app.match_repository.create_match(&match_record).await?;
    log::info!("Created match [{}] at [{}]", match_record.id, match_record.location);
    Ok(Json(match_record.into()))
}

#[axum::debug_handler]
pub async fn get_players(
    State(app): State<AppState>,
) -> Result<Json<Vec<JsonPlayer>>, MyServiceError> {
    let players = app.player_directory.get_players().await?;
    Ok(Json(players.into_iter().map(JsonPlayer::from).collect()))
}

#[axum::debug_handler]
pub async fn create_player(
    State(app): State<AppState>,
    Json(request): Json<JsonCreatePlayerRequest>,
) -> Result<Json<JsonPlayer>, MyServiceError> {
    let positions: Vec<FieldPosition> = request
        .positions
        .iter()
        .filter_map(|label| FieldPosition::parse(label))
        .collect();
    let player = Player {
        id: uuid::Uuid::new_v4().to_string(),
        name: request.name,
        score: request.score.unwrap_or(DEFAULT_SCORE).min(MAX_SCORE),
        positions,
        monthly_payer: request.monthly_payer.unwrap_or(false),
        admin: request.is_admin.unwrap_or(false),
        active: true,
    };
    app.player_directory.add_player(player.clone()).await?;
    Ok(Json(player.into()))
}
