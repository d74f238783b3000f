use std::convert::Infallible;

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    response::IntoResponse,
    routing::get,
    Router,
};
use futures_util::StreamExt;
use tokio_stream::wrappers::{errors::BroadcastStreamRecvError, BroadcastStream};
use tracing::warn;

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/discovery/stream", get(stream_events))
}

/// Relay discovery events as SSE, one `event:` name per payload kind.
async fn stream_events(State(state): State<AppState>) -> impl IntoResponse {
    let rx = state.ctx().subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|result| async move {
        match result {
            Ok(event) => match serde_json::to_string(&event) {
                Ok(data) => Some(Ok::<_, Infallible>(Event::default().event(event.name()).data(data))),
                Err(e) => {
                    warn!("Dropping unserializable event: {}", e);
                    None
                }
            },
            Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                Some(Ok(Event::default().event("lagged").data(skipped.to_string())))
            }
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
