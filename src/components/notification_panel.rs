//! Notification Bell + Panel
//!
//! Unread badge and the notification panel. Opening the panel reloads
//! the feed over REST, which is also the only recovery path for pushes
//! missed while the socket was down. Read flips are optimistic and never
//! rolled back.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api;
use crate::components::{PopupAnchor, PopupCoordinator, PopupKind, PopupShell};
use crate::notifications::NotificationFeed;
use crate::session::use_session;

#[component]
pub fn NotificationBell() -> impl IntoView {
    let session = use_session();
    let feed = expect_context::<RwSignal<NotificationFeed>>();
    let coordinator = PopupCoordinator::new();

    let badge = move || feed.with(|f| f.badge_text());

    let toggle_panel = move |ev: web_sys::MouseEvent| {
        ev.stop_propagation();
        if coordinator.toggle(PopupKind::Notifications, PopupAnchor::below(&ev)) {
            let api = session.api();
            spawn_local(async move {
                match api::notifications::list(&api).await {
                    Ok(items) => feed.update(|f| f.replace(items)),
                    Err(err) => session.error(format!("Could not load notifications: {}", err)),
                }
            });
        }
    };

    let mark_read = Callback::new(move |id: u64| {
        let changed = feed.try_update(|f| f.mark_read(id)).unwrap_or(false);
        if !changed {
            return;
        }
        let api = session.api();
        spawn_local(async move {
            // Lossy toward read: a failed confirm is logged, the local
            // flag stays set
            if let Err(err) = api::notifications::mark_read(&api, id).await {
                log::warn!("mark-read failed for notification {}: {}", id, err);
            }
        });
    });

    let mark_all = move |ev: web_sys::MouseEvent| {
        ev.stop_propagation();
        feed.update(|f| f.mark_all_read());
        let api = session.api();
        spawn_local(async move {
            if let Err(err) = api::notifications::mark_all_read(&api).await {
                log::warn!("mark-all-read failed: {}", err);
            }
        });
    };

    view! {
        <div class="notification-bell">
            <button class="bell-btn" on:click=toggle_panel>
                "🔔"
                {move || badge().map(|text| view! { <span class="badge">{text}</span> })}
            </button>
            <PopupShell coordinator=coordinator kind=PopupKind::Notifications title="Notifications">
                <button class="mark-all" on:click=mark_all>"Mark all read"</button>
                <ul class="notification-list">
                    <For
                        each=move || feed.with(|f| f.items().to_vec())
                        key=|n| (n.id, n.read, n.message.clone())
                        children=move |notification| {
                            let id = notification.id;
                            let class = if notification.read {
                                "notification read"
                            } else {
                                "notification unread"
                            };
                            let date = notification
                                .created_at
                                .map(|at| at.format("%Y-%m-%d %H:%M").to_string());
                            view! {
                                <li class=class on:click=move |_| mark_read.run(id)>
                                    <span class="notification-message">
                                        {notification.message.clone()}
                                    </span>
                                    {date.map(|d| view! {
                                        <span class="notification-date">{d}</span>
                                    })}
                                </li>
                            }
                        }
                    />
                </ul>
            </PopupShell>
        </div>
    }
}
