//! Central dispatcher loop.
//!
//! This task owns the `Dispatcher` (and with it every session and
//! room) and processes all `Request`s coming from connection tasks,
//! strictly one at a time in arrival order.

use chat_core::Dispatcher;
use tracing::info;

use crate::types::RequestRx;

/// Run the central dispatcher loop until every sender is dropped.
pub async fn run_dispatcher_loop(mut request_rx: RequestRx) {
    let mut dispatcher = Dispatcher::new();

    while let Some(request) = request_rx.recv().await {
        dispatcher.handle(request);
    }

    info!(
        sessions = dispatcher.session_count(),
        rooms = dispatcher.room_count(),
        "dispatcher loop shutting down (request channel closed)"
    );
}
