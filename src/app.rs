//! Teamboard Frontend App
//!
//! Top-level component: bootstraps the session, provides the board
//! store, notification feed and selection context, and wires the
//! realtime channel into the feed.

use leptos::prelude::*;
use leptos::task::spawn_local;
use reactive_stores::Store;

use crate::api;
use crate::components::{BoardView, NotificationBell, TaskDetail, ToastRegion};
use crate::notifications::NotificationFeed;
use crate::realtime::{ChannelStatus, RealtimeChannel};
use crate::session::Session;
use crate::store::{load_board, BoardState};

/// Currently open task detail, provided via context
#[derive(Clone, Copy)]
pub struct SelectedTask(pub RwSignal<Option<u64>>);

#[component]
pub fn App() -> impl IntoView {
    let session = Session::bootstrap();
    provide_context(session);

    let board = Store::new(BoardState::default());
    provide_context(board);

    let feed = RwSignal::new(NotificationFeed::default());
    provide_context(feed);

    let selected = SelectedTask(RwSignal::new(None));
    provide_context(selected);

    // Push events prepend to the feed; the channel reconnects on its own
    // until it gives up or the tab goes away
    let channel = RealtimeChannel::new(session.notifications_ws_url());
    channel.subscribe(move |notification| {
        let _ = feed.try_update(|f| f.push_front(notification.clone()));
    });
    channel.connect();
    let channel_status = channel.status();

    // Initial board load
    Effect::new(move |_| {
        let api = session.api();
        spawn_local(async move {
            if let Err(err) = load_board(&api, session.project_id, board).await {
                session.error(format!("Board load failed: {}", err));
            }
        });
    });

    // Initial notification fetch for the badge
    Effect::new(move |_| {
        let api = session.api();
        spawn_local(async move {
            match api::notifications::list(&api).await {
                Ok(items) => feed.update(|f| f.replace(items)),
                Err(err) => log::warn!("initial notification load failed: {}", err),
            }
        });
    });

    view! {
        <div class="app-layout">
            <header class="app-header">
                <h1>"Teamboard"</h1>
                <Show when=move || channel_status.get() == ChannelStatus::GaveUp>
                    <span class="channel-warning">
                        "Live updates are offline, reload to reconnect"
                    </span>
                </Show>
                <NotificationBell />
            </header>
            <main class="board-main">
                <BoardView />
            </main>
            <TaskDetail />
            <ToastRegion />
        </div>
    }
}
