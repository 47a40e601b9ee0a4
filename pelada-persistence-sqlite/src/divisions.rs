use pelada_server_domain::{
    ServiceError, ServiceResult,
    division::{DivisionRepository, TeamDivision},
    matches::MatchId,
    player::PlayerId,
};
use sqlx::{Pool, Row, Sqlite, sqlite::SqliteRow};

use crate::{create_db_pool, format_timestamp, parse_timestamp};

pub struct SqliteDivisionRepository {
    pool: Pool<Sqlite>,
}

impl SqliteDivisionRepository {
    pub fn new() -> Self {
        let pool = create_db_pool();
        Self { pool }
    }

    fn division_from_row(row: &SqliteRow) -> sqlx::Result<TeamDivision> {
        let created_at: String = row.try_get("created_at")?;
        let updated_at: String = row.try_get("updated_at")?;
        Ok(TeamDivision {
            match_id: row.try_get("match_id")?,
            created_by: row.try_get("created_by")?,
            team_black: parse_team(row.try_get("team_black")?, "team_black")?,
            team_white: parse_team(row.try_get("team_white")?, "team_white")?,
            created_at: parse_timestamp(&created_at, "created_at")?,
            updated_at: parse_timestamp(&updated_at, "updated_at")?,
            active: row.try_get("is_active")?,
        })
    }
}

/// Team sheets are stored as JSON arrays of player ids.
fn parse_team(text: String, column: &str) -> sqlx::Result<Vec<PlayerId>> {
    serde_json::from_str(&text).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

fn format_team(team: &[PlayerId]) -> ServiceResult<String> {
    serde_json::to_string(team).map_err(|e| ServiceError::Internal(e.to_string()))
}

#[async_trait::async_trait]
impl DivisionRepository for SqliteDivisionRepository {
    async fn get_division(&self, match_id: &MatchId) -> ServiceResult<Option<TeamDivision>> {
        let row = sqlx::query("SELECT * FROM divisions WHERE match_id = ?")
            .bind(match_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        row.map(|row| Self::division_from_row(&row))
            .transpose()
            .map_err(|e| ServiceError::Storage(e.to_string()))
    }

    async fn insert_division(&self, division: &TeamDivision) -> ServiceResult<()> {
        sqlx::query(
            "INSERT INTO divisions (match_id, created_by, team_black, team_white, created_at, \
             updated_at, is_active) VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&division.match_id)
        .bind(&division.created_by)
        .bind(format_team(&division.team_black)?)
        .bind(format_team(&division.team_white)?)
        .bind(format_timestamp(&division.created_at))
        .bind(format_timestamp(&division.updated_at))
        .bind(division.active)
        .execute(&self.pool)
        .await
        .map_err(|e| ServiceError::Storage(e.to_string()))?;
        Ok(())
    }

    async fn update_division(&self, division: &TeamDivision) -> ServiceResult<()> {
        sqlx::query(
            "UPDATE divisions SET created_by = ?, team_black = ?, team_white = ?, \
             updated_at = ?, is_active = ? WHERE match_id = ?",
        )
        .bind(&division.created_by)
        .bind(format_team(&division.team_black)?)
        .bind(format_team(&division.team_white)?)
        .bind(format_timestamp(&division.updated_at))
        .bind(division.active)
        .bind(&division.match_id)
        .execute(&self.pool)
        .await
        .map_err(|e| ServiceError::Storage(e.to_string()))?;
        Ok(())
    }

    async fn delete_division(&self, match_id: &MatchId) -> ServiceResult<()> {
        sqlx::query("DELETE FROM divisions WHERE match_id = ?")
            .bind(match_id)
            .execute(&self.pool)
            .await
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_column_round_trip() {
        let team = vec!["p1".to_string(), "p2".to_string()];
        let text = format_team(&team).expect("Failed to format team");
        assert_eq!(text, r#"["p1","p2"]"#);
        assert_eq!(parse_team(text, "team_black").expect("Failed to parse"), team);
    }
}
