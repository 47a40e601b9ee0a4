use chrono::{DateTime, Utc};
use sqlx::{
    Pool, Sqlite,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};

pub mod attendance;
pub mod divisions;
pub mod matches;
pub mod players;

pub use attendance::SqliteAttendanceRepository;
pub use divisions::SqliteDivisionRepository;
pub use matches::SqliteMatchRepository;
pub use players::SqlitePlayerRepository;

/// Lazy pool over the database at `PELADA_DB`. Connections are only opened
/// on first use, so repository construction stays synchronous.
pub fn create_db_pool() -> Pool<Sqlite> {
    let db_path = std::env::var("PELADA_DB").expect("PELADA_DB env var not set");
    let connect_options = SqliteConnectOptions::new()
        .filename(&db_path)
        .create_if_missing(true);
    SqlitePoolOptions::new().connect_lazy_with(connect_options)
}

/// Timestamps are stored as RFC 3339 text.
pub(crate) fn parse_timestamp(text: &str, column: &str) -> sqlx::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .map_err(|e| sqlx::Error::ColumnDecode {
            index: column.to_string(),
            source: Box::new(e),
        })
}

pub(crate) fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339()
}
