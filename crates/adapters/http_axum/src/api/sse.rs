//! Server-Sent Events (SSE) stream of applied state changes.

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;

use lumenhub_app::ports::GroupStateCoordinator;

use crate::state::AppState;

/// `GET /api/updates/stream`: one `state` event per applied update,
/// transition ticks included.
///
/// The stream continues until the client disconnects or the event bus is
/// closed. Lagging clients skip changes instead of slowing transitions down.
pub async fn stream<C>(
    State(state): State<AppState<C>>,
) -> Sse<impl tokio_stream::Stream<Item = Result<Event, std::convert::Infallible>>>
where
    C: GroupStateCoordinator + Send + Sync + 'static,
{
    let receiver = state.event_bus.subscribe();
    let changes = BroadcastStream::new(receiver).filter_map(|result| match result {
        Ok(change) => match Event::default().event("state").json_data(change) {
            Ok(event) => Some(Ok(event)),
            Err(err) => {
                tracing::warn!(%err, "failed to serialize state change for SSE stream");
                None
            }
        },
        Err(BroadcastStreamRecvError::Lagged(skipped)) => {
            tracing::warn!(skipped, "SSE subscriber lagged, some state changes were dropped");
            None
        }
    });

    Sse::new(changes).keep_alive(KeepAlive::default())
}
