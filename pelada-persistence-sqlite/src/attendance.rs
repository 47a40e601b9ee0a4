use pelada_server_domain::{
    ServiceError, ServiceResult,
    matches::MatchId,
    player::PlayerId,
    roster::{AttendanceEntry, AttendanceRepository},
};
use sqlx::{Pool, Row, Sqlite, sqlite::SqliteRow};

use crate::{create_db_pool, format_timestamp, parse_timestamp};

pub struct SqliteAttendanceRepository {
    pool: Pool<Sqlite>,
}

impl SqliteAttendanceRepository {
    pub fn new() -> Self {
        let pool = create_db_pool();
        Self { pool }
    }

    fn entry_from_row(row: &SqliteRow) -> sqlx::Result<AttendanceEntry> {
        let position: i64 = row.try_get("position")?;
        let joined_at: String = row.try_get("joined_at")?;
        Ok(AttendanceEntry {
            match_id: row.try_get("match_id")?,
            player_id: row.try_get("player_id")?,
            position: position as u32,
            joined_at: parse_timestamp(&joined_at, "joined_at")?,
        })
    }
}

#[async_trait::async_trait]
impl AttendanceRepository for SqliteAttendanceRepository {
    async fn get_entries(&self, match_id: &MatchId) -> ServiceResult<Vec<AttendanceEntry>> {
        let rows = sqlx::query("SELECT * FROM attendance WHERE match_id = ? ORDER BY position")
            .bind(match_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        rows.iter()
            .map(|row| Self::entry_from_row(row).map_err(|e| ServiceError::Storage(e.to_string())))
            .collect::<ServiceResult<Vec<AttendanceEntry>>>()
    }

    async fn get_entry(
        &self,
        match_id: &MatchId,
        player_id: &PlayerId,
    ) -> ServiceResult<Option<AttendanceEntry>> {
        let row = sqlx::query("SELECT * FROM attendance WHERE match_id = ? AND player_id = ?")
            .bind(match_id)
            .bind(player_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        row.map(|row| Self::entry_from_row(&row))
            .transpose()
            .map_err(|e| ServiceError::Storage(e.to_string()))
    }

    async fn create_entry(&self, entry: &AttendanceEntry) -> ServiceResult<()> {
        sqlx::query(
            "INSERT INTO attendance (match_id, player_id, position, joined_at) \
             VALUES (?, ?, ?, ?)",
        )
        .bind(&entry.match_id)
        .bind(&entry.player_id)
        .bind(entry.position as i64)
        .bind(format_timestamp(&entry.joined_at))
        .execute(&self.pool)
        .await
        .map_err(|e| ServiceError::Storage(e.to_string()))?;
        Ok(())
    }

    async fn delete_entry(&self, match_id: &MatchId, player_id: &PlayerId) -> ServiceResult<()> {
        sqlx::query("DELETE FROM attendance WHERE match_id = ? AND player_id = ?")
            .bind(match_id)
            .bind(player_id)
            .execute(&self.pool)
            .await
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        Ok(())
    }

    async fn update_positions(
        &self,
        match_id: &MatchId,
        positions: &[(PlayerId, u32)],
    ) -> ServiceResult<()> {
        // Renumbering must land as a whole or not at all, otherwise two
        // entries could briefly share a position.
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        for (player_id, position) in positions {
            sqlx::query("UPDATE attendance SET position = ? WHERE match_id = ? AND player_id = ?")
                .bind(*position as i64)
                .bind(match_id)
                .bind(player_id)
                .execute(&mut *tx)
                .await
                .map_err(|e| ServiceError::Storage(e.to_string()))?;
        }
        tx.commit()
            .await
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        Ok(())
    }
}
