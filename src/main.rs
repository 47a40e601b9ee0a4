use std::sync::Arc;

use log::info;
use pelada_persistence_sqlite::{
    SqliteAttendanceRepository, SqliteDivisionRepository, SqliteMatchRepository,
    SqlitePlayerRepository,
};
use pelada_server_domain::{
    app::construct_app,
    division::ArcDivisionRepository,
    matches::ArcMatchRepository,
    player::ArcPlayerRepository,
    roster::ArcAttendanceRepository,
};

mod attendance;
mod catalog;
mod division;
mod live;
mod logs;
mod server;

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received. Preparing graceful exit...");
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    logs::init_logger();

    let player_repository: ArcPlayerRepository = Arc::new(Box::new(SqlitePlayerRepository::new()));
    let match_repository: ArcMatchRepository = Arc::new(Box::new(SqliteMatchRepository::new()));
    let attendance_repository: ArcAttendanceRepository =
        Arc::new(Box::new(SqliteAttendanceRepository::new()));
    let division_repository: ArcDivisionRepository =
        Arc::new(Box::new(SqliteDivisionRepository::new()));

    let app = construct_app(
        player_repository,
        match_repository,
        attendance_repository,
        division_repository,
    );

    info!("Starting application");

    server::run(app, shutdown_signal()).await;
}
