use pelada_server_domain::{
    ServiceError, ServiceResult,
    matches::{Match, MatchId, MatchRepository, MatchStatus},
};
use sqlx::{Pool, Row, Sqlite, sqlite::SqliteRow};

use crate::{create_db_pool, format_timestamp, parse_timestamp};

pub struct SqliteMatchRepository {
    pool: Pool<Sqlite>,
}

impl SqliteMatchRepository {
    pub fn new() -> Self {
        let pool = create_db_pool();
        Self { pool }
    }

    fn match_from_row(row: &SqliteRow) -> sqlx::Result<Match> {
        let scheduled_at: String = row.try_get("scheduled_at")?;
        let max_players: i64 = row.try_get("max_players")?;
        let player_count: i64 = row.try_get("player_count")?;
        let status: String = row.try_get("status")?;
        let status = MatchStatus::parse(&status).ok_or_else(|| sqlx::Error::ColumnDecode {
            index: "status".to_string(),
            source: format!("unknown match status [{}]", status).into(),
        })?;
        Ok(Match {
            id: row.try_get("id")?,
            location: row.try_get("location")?,
            scheduled_at: parse_timestamp(&scheduled_at, "scheduled_at")?,
            max_players: max_players as u32,
            player_count: player_count as u32,
            status,
        })
    }
}

#[async_trait::async_trait]
impl MatchRepository for SqliteMatchRepository {
    async fn get_match_by_id(&self, id: &MatchId) -> ServiceResult<Option<Match>> {
        let row = sqlx::query("SELECT * FROM matches WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        row.map(|row| Self::match_from_row(&row))
            .transpose()
            .map_err(|e| ServiceError::Storage(e.to_string()))
    }

    async fn get_matches(&self) -> ServiceResult<Vec<Match>> {
        let rows = sqlx::query("SELECT * FROM matches ORDER BY scheduled_at")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        rows.iter()
            .map(|row| Self::match_from_row(row).map_err(|e| ServiceError::Storage(e.to_string())))
            .collect::<ServiceResult<Vec<Match>>>()
    }

    async fn create_match(&self, match_record: &Match) -> ServiceResult<()> {
        sqlx::query(
            "INSERT INTO matches (id, location, scheduled_at, max_players, player_count, status) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&match_record.id)
        .bind(&match_record.location)
        .bind(format_timestamp(&match_record.scheduled_at))
        .bind(match_record.max_players as i64)
        .bind(match_record.player_count as i64)
        .bind(match_record.status.label())
        .execute(&self.pool)
        .await
        .map_err(|e| ServiceError::Storage(e.to_string()))?;
        Ok(())
    }

    async fn update_player_count(&self, id: &MatchId, player_count: u32) -> ServiceResult<()> {
        sqlx::query("UPDATE matches SET player_count = ? WHERE id = ?")
            .bind(player_count as i64)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        Ok(())
    }
}
