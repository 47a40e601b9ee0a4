use axum::{
    Router,
    response::IntoResponse,
    routing::{delete, get, post},
};
use log::info;
use pelada_server_domain::{ServiceError, app::AppState};

use crate::{attendance, catalog, division, live};

pub async fn run(
    app: AppState,
    shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
) {
    let router = Router::new()
        .route(
            "/matches",
            get(catalog::get_matches).post(catalog::create_match),
        )
        .route(
            "/players",
            get(catalog::get_players).post(catalog::create_player),
        )
        .route(
            "/matches/{id}/attendance",
            get(attendance::get_list).post(attendance::join),
        )
        .route("/matches/{id}/attendance/{pid}", delete(attendance::leave))
        .route("/matches/{id}/division/generate", post(division::generate))
        .route(
            "/matches/{id}/division",
            get(division::get)
                .put(division::save)
                .delete(division::remove),
        )
        .route("/matches/{id}/live", get(live::ws_handler));

    let host = std::env::var("PELADA_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = std::env::var("PELADA_PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse::<u16>()
        .expect("PELADA_PORT must be a valid u16");

    let listener = tokio::net::TcpListener::bind(format!("{}:{}", host, port))
        .await
        .unwrap();

    info!("Server listening on {}:{}", host, port);
    axum::serve(listener, router.with_state(app))
        .with_graceful_shutdown(shutdown_signal)
        .await
        .unwrap();

    info!("Server shut down gracefully");
}

pub struct MyServiceError(pub ServiceError);

impl IntoResponse for MyServiceError {
    fn into_response(self) -> axum::http::Response<axum::body::Body> {
        let (status, msg) = match self.0 {
            ServiceError::AlreadyJoined(msg) => (axum::http::StatusCode::CONFLICT, msg),
            ServiceError::NotInList(msg) => (axum::http::StatusCode::CONFLICT, msg),
            ServiceError::PlayerNotFound(msg) => (axum::http::StatusCode::NOT_FOUND, msg),
            ServiceError::InvalidDivision(msg) => {
                (axum::http::StatusCode::UNPROCESSABLE_ENTITY, msg)
            }
            ServiceError::NotFound(msg) => (axum::http::StatusCode::NOT_FOUND, msg),
            ServiceError::Forbidden(msg) => (axum::http::StatusCode::FORBIDDEN, msg),
            ServiceError::Storage(msg) => (axum::http::StatusCode::INTERNAL_SERVER_ERROR, msg),
            ServiceError::Internal(msg) => (axum::http::StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        let body = serde_json::json!({ "error": msg });
        (status, axum::Json(body)).into_response()
    }
}

impl From<ServiceError> for MyServiceError {
    fn from(value: ServiceError) -> Self {
        MyServiceError(value)
    }
}
