//! Server-push streaming of capped items over SSE
//!
//! The application mounts this router at both /v1/stream/items and
//! /v1/fun/stream/items; both surfaces share one service.

use axum::{
    Router,
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
};
use futures::{Stream, StreamExt};
use std::convert::Infallible;
use std::sync::Arc;

use crate::repository::CappedItemRepository;
use crate::service::ItemStreamService;

/// Create the streaming items router
pub fn router<R: CappedItemRepository + 'static>(service: ItemStreamService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(stream_items))
        .with_state(shared_service)
}

/// Tail the capped collection as an SSE stream.
///
/// Existing documents are replayed first, then the connection stays open
/// and new inserts are pushed as they happen. A storage fault emits an
/// error event and closes the connection; the stream never completes
/// successfully on its own.
async fn stream_items<R: CappedItemRepository + 'static>(
    State(service): State<Arc<ItemStreamService<R>>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let stream = async_stream::stream! {
        let mut tail = match service.tail().await {
            Ok(tail) => tail,
            Err(e) => {
                yield Ok(Event::default().event("error").data(e.to_string()));
                return;
            }
        };

        while let Some(next) = tail.next().await {
            match next {
                Ok(item) => match serde_json::to_string(&item) {
                    Ok(json) => yield Ok(Event::default().data(json)),
                    Err(e) => {
                        yield Ok(Event::default().event("error").data(e.to_string()));
                        return;
                    }
                },
                Err(e) => {
                    yield Ok(Event::default().event("error").data(e.to_string()));
                    return;
                }
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}
