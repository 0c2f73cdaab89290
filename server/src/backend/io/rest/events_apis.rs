//! # Server-Sent Events for Live Views
//!
//! Every open dashboard or big-screen display keeps one stream. Events carry
//! only the kind of change; clients re-fetch what they show.
//!
//! - `change`: a donor was added or the table was cleared
//! - `resync`: the stream fell behind and dropped events; refresh everything

use std::convert::Infallible;

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::{self, Stream};
use log::{error, info, warn};
use shared::DonorChangeEvent;
use tokio::sync::broadcast::{self, error::RecvError};

use crate::backend::AppState;

/// Turn the change feed into an SSE stream that ends when the feed closes
fn change_stream(
    receiver: broadcast::Receiver<DonorChangeEvent>,
) -> impl Stream<Item = Result<Event, Infallible>> {
    stream::unfold(receiver, |mut receiver| async move {
        loop {
            let event = match receiver.recv().await {
                Ok(change) => match Event::default().event("change").json_data(&change) {
                    Ok(event) => event,
                    Err(e) => {
                        error!("Failed to encode change event: {}", e);
                        continue;
                    }
                },
                Err(RecvError::Lagged(missed)) => {
                    warn!("Event stream lagged by {} changes", missed);
                    Event::default().event("resync").data(missed.to_string())
                }
                Err(RecvError::Closed) => return None,
            };
            return Some((Ok::<_, Infallible>(event), receiver));
        }
    })
}

pub async fn donor_events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    info!("GET /api/donors/events - subscriber connected");

    Sse::new(change_stream(state.donor_service.subscribe())).keep_alive(KeepAlive::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::storage::ChangeFeed;
    use futures::StreamExt;
    use shared::DonorChangeKind;

    #[tokio::test]
    async fn test_stream_yields_one_event_per_change() {
        let feed = ChangeFeed::new(8);
        let mut events = Box::pin(change_stream(feed.subscribe()));

        feed.publish(DonorChangeKind::Inserted);
        feed.publish(DonorChangeKind::Cleared);

        assert!(events.next().await.is_some());
        assert!(events.next().await.is_some());

        drop(feed);
        assert!(events.next().await.is_none());
    }

    #[tokio::test]
    async fn test_lagging_stream_resyncs_and_continues() {
        let feed = ChangeFeed::new(1);
        let mut events = Box::pin(change_stream(feed.subscribe()));

        feed.publish(DonorChangeKind::Inserted);
        feed.publish(DonorChangeKind::Inserted);
        feed.publish(DonorChangeKind::Cleared);

        // Lagged notice, then the one retained event
        assert!(events.next().await.is_some());
        assert!(events.next().await.is_some());

        drop(feed);
        assert!(events.next().await.is_none());
    }
}
