use pelada_core::FieldPosition;
use pelada_server_domain::{
    ServiceError, ServiceResult,
    player::{Player, PlayerId, PlayerRepository},
};
use sqlx::{Pool, Row, Sqlite, sqlite::SqliteRow};

use crate::create_db_pool;

pub struct SqlitePlayerRepository {
    pool: Pool<Sqlite>,
}

impl SqlitePlayerRepository {
    pub fn new() -> Self {
        let pool = create_db_pool();
        Self { pool }
    }

    fn player_from_row(row: &SqliteRow) -> sqlx::Result<Player> {
        let score: i64 = row.try_get("score")?;
        Ok(Player {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            score: score as u32,
            positions: parse_positions(row.try_get("positions")?),
            monthly_payer: row.try_get("monthly_payer")?,
            admin: row.try_get("is_admin")?,
            active: row.try_get("is_active")?,
        })
    }
}

/// Positions live in one TEXT column as comma-separated labels. Unknown
/// labels are skipped rather than failing the whole row.
fn parse_positions(labels: String) -> Vec<FieldPosition> {
    labels
        .split(',')
        .filter_map(FieldPosition::parse)
        .collect()
}

fn join_positions(positions: &[FieldPosition]) -> String {
    positions
        .iter()
        .map(|position| position.label())
        .collect::<Vec<_>>()
        .join(",")
}

#[async_trait::async_trait]
impl PlayerRepository for SqlitePlayerRepository {
    async fn get_player_by_id(&self, id: &PlayerId) -> ServiceResult<Option<Player>> {
        let row = sqlx::query("SELECT * FROM players WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        row.map(|row| Self::player_from_row(&row))
            .transpose()
            .map_err(|e| ServiceError::Storage(e.to_string()))
    }

    async fn get_players(&self) -> ServiceResult<Vec<Player>> {
        let rows = sqlx::query("SELECT * FROM players ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        rows.iter()
            .map(|row| {
                Self::player_from_row(row).map_err(|e| ServiceError::Storage(e.to_string()))
            })
            .collect::<ServiceResult<Vec<Player>>>()
    }

    async fn create_player(&self, player: &Player) -> ServiceResult<()> {
        sqlx::query(
            "INSERT INTO players (id, name, score, positions, monthly_payer, is_admin, is_active) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&player.id)
        .bind(&player.name)
        .bind(player.score as i64)
        .bind(join_positions(&player.positions))
        .bind(player.monthly_payer)
        .bind(player.admin)
        .bind(player.active)
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
    fn test_positions_column_round_trip() {
        let positions = vec![FieldPosition::Goalkeeper, FieldPosition::Fullback];
        assert_eq!(join_positions(&positions), "Goleiro,Lateral");
        assert_eq!(parse_positions("Goleiro,Lateral".to_string()), positions);
    }

    #[test]
    fn test_unknown_position_labels_are_skipped() {
        assert_eq!(
            parse_positions("Meia,libero".to_string()),
            vec![FieldPosition::Midfield]
        );
        assert!(parse_positions("".to_string()).is_empty());
    }
}
