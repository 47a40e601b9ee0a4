use axum::{
    extract::{
        Path, State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use pelada_server_domain::{
    app::AppState, division::TeamDivision, feed::Subscription, roster::AttendanceList,
};
use serde::Serialize;

use crate::{
    attendance::{JsonAttendanceList, json_list_from_list},
    division::JsonDivision,
    server::MyServiceError,
};

#[derive(Clone, Debug, Serialize)]
#[serde(
    tag = "type",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum LiveMessage {
    Attendance { list: JsonAttendanceList },
    Division { division: Option<JsonDivision> },
}

pub async fn ws_handler(
    Path(match_id): Path<String>,
    ws: WebSocketUpgrade,
    State(app): State<AppState>,
) -> Result<Response, MyServiceError> {
    // Subscribe before upgrading so an unknown match still fails as JSON.
    let roster_feed = app.roster_service.observe(&match_id).await?;
    let division_feed = app.division_service.observe(&match_id).await?;
    Ok(ws.on_upgrade(move |socket| live_loop(socket, match_id, roster_feed, division_feed)))
}

/// Pushes the current roster and division snapshots right away, then one
/// message per change until either side goes away.
async fn live_loop(
    socket: WebSocket,
    match_id: String,
    mut roster_feed: Subscription<AttendanceList>,
    mut division_feed: Subscription<Option<TeamDivision>>,
) {
    log::info!("Live feed for match [{}] opened", match_id);
    let (mut sender, mut receiver) = socket.split();
    loop {
        let message = tokio::select! {
            snapshot = roster_feed.next() => match snapshot {
                Some(list) => LiveMessage::Attendance {
                    list: json_list_from_list(&list),
                },
                None => break,
            },
            snapshot = division_feed.next() => match snapshot {
                Some(division) => LiveMessage::Division {
                    division: division.map(JsonDivision::from),
                },
                None => break,
            },
            inbound = receiver.next() => match inbound {
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => continue,
                Some(Err(e)) => {
                    log::error!("Live feed error on match [{}]: {}", match_id, e);
                    break;
                }
            },
        };
        let text = serde_json::to_string(&message).unwrap();
        if sender.send(Message::Text(text.into())).await.is_err() {
            break;
        }
    }
    log::info!("Live feed for match [{}] closed", match_id);
}
