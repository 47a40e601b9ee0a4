use chrono::{Duration, Utc};
use sqlx::{
    Pool, Sqlite,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let db_path = std::env::var("PELADA_DB").expect("PELADA_DB env var not set");

    let connect_options = SqliteConnectOptions::new()
        .filename(&db_path)
        .create_if_missing(true);

    let conn = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(connect_options)
        .await
        .expect("Failed to create pool");

    create_tables(&conn).await;
    seed_players(&conn).await;
    seed_match(&conn).await;

    println!("Created database at [{}]", db_path);
}

async fn create_tables(conn: &Pool<Sqlite>) {
    let statements = [
        "DROP TABLE IF EXISTS players",
        "DROP TABLE IF EXISTS matches",
        "DROP TABLE IF EXISTS attendance",
        "DROP TABLE IF EXISTS divisions",
        "CREATE TABLE players (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            score INTEGER NOT NULL,
            positions TEXT NOT NULL,
            monthly_payer BOOLEAN NOT NULL,
            is_admin BOOLEAN NOT NULL,
            is_active BOOLEAN NOT NULL
        )",
        "CREATE TABLE matches (
            id TEXT PRIMARY KEY,
            location TEXT NOT NULL,
            scheduled_at TEXT NOT NULL,
            max_players INTEGER NOT NULL,
            player_count INTEGER NOT NULL,
            status TEXT NOT NULL
        )",
        "CREATE TABLE attendance (
            match_id TEXT NOT NULL,
            player_id TEXT NOT NULL,
            position INTEGER NOT NULL,
            joined_at TEXT NOT NULL,
            PRIMARY KEY (match_id, player_id)
        )",
        "CREATE TABLE divisions (
            match_id TEXT PRIMARY KEY,
            created_by TEXT NOT NULL,
            team_black TEXT NOT NULL,
            team_white TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            is_active BOOLEAN NOT NULL
        )",
    ];
    for statement in statements {
        sqlx::query(statement)
            .execute(conn)
            .await
            .expect("Failed to run schema statement");
    }
}

async fn seed_players(conn: &Pool<Sqlite>) {
    let players: [(&str, &str, i64, &str, bool, bool); 8] = [
        ("rafa", "Rafael", 95, "Goleiro", true, false),
        ("dudu", "Eduardo", 85, "Zagueiro,Lateral", true, true),
        ("nando", "Fernando", 80, "Meia", false, false),
        ("tiago", "Tiago", 75, "Atacante", true, false),
        ("beto", "Roberto", 70, "Zagueiro", false, false),
        ("caio", "Caio", 65, "Meia,Atacante", false, false),
        ("leo", "Leonardo", 60, "Lateral", true, false),
        ("vini", "Vinicius", 55, "Goleiro,Meia", false, false),
    ];
    for (id, name, score, positions, monthly_payer, is_admin) in players {
        sqlx::query(
            "INSERT INTO players (id, name, score, positions, monthly_payer, is_admin, is_active) \
             VALUES (?, ?, ?, ?, ?, ?, true)",
        )
        .bind(id)
        .bind(name)
        .bind(score)
        .bind(positions)
        .bind(monthly_payer)
        .bind(is_admin)
        .execute(conn)
        .await
        .expect("Failed to seed player");
        println!("Seeded player [{}]", id);
    }
}

async fn seed_match(conn: &Pool<Sqlite>) {
    let scheduled_at = (Utc::now() + Duration::days(2)).to_rfc3339();
    sqlx::query(
        "INSERT INTO matches (id, location, scheduled_at, max_players, player_count, status) \
         VALUES (?, ?, ?, ?, 0, 'scheduled')",
    )
    .bind("pelada-sabado")
    .bind("Campo do Parque")
    .bind(scheduled_at)
    .bind(10_i64)
    .execute(conn)
    .await
    .expect("Failed to seed match");
    println!("Seeded match [pelada-sabado]");
}
