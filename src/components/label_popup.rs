//! Label Picker Popup
//!
//! Toggle project labels on a task, with the same debounced search and
//! stale-response handling as the member picker.

use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::JsCast;

use crate::api;
use crate::components::{PopupCoordinator, PopupKind, PopupShell};
use crate::models::Label;
use crate::session::use_session;
use crate::store::{
    find_task, store_patch_task, store_revert, use_board_store, BoardStateStoreFields,
};
use crate::timing::{Debouncer, TokenIssuer, SEARCH_DEBOUNCE_MS};

#[component]
pub fn LabelPopup(task_id: u64, coordinator: PopupCoordinator) -> impl IntoView {
    let session = use_session();
    let board = use_board_store();
    let (keyword, set_keyword) = signal(String::new());
    let (results, set_results) = signal(Vec::<Label>::new());
    let debounce = StoredValue::new_local(Debouncer::new(SEARCH_DEBOUNCE_MS));
    let tokens = TokenIssuer::default();

    let search = Callback::new(move |kw: String| {
        let token = tokens.issue();
        let issuer = tokens.clone();
        let api = session.api();
        spawn_local(async move {
            match api::projects::search_labels(&api, session.project_id, &kw).await {
                Ok(labels) => {
                    if issuer.is_current(token) {
                        set_results.set(labels);
                    } else {
                        log::debug!("stale label search response dropped");
                    }
                }
                Err(err) => log::warn!("label search failed: {}", err),
            }
        });
    });

    Effect::new(move |_| {
        if coordinator.is_open(PopupKind::Labels) {
            search.run(keyword.get_untracked());
        }
    });

    let toggle = Callback::new(move |label: Label| {
        let current = board
            .tasks()
            .with_untracked(|tasks| find_task(tasks, task_id).map(|t| t.labels.clone()));
        let Some(mut labels) = current else {
            return;
        };
        match labels.iter().position(|l| l.id == label.id) {
            Some(pos) => {
                labels.remove(pos);
            }
            None => labels.push(label),
        }
        let ids: Vec<u64> = labels.iter().map(|l| l.id).collect();
        let reversal = store_patch_task(&board, task_id, |t| t.labels = labels);
        let api = session.api();
        spawn_local(async move {
            if let Err(err) = api::tasks::set_labels(&api, task_id, &ids).await {
                session.error(format!("Could not update labels: {}", err));
                if let Some(reversal) = reversal {
                    store_revert(&board, reversal);
                }
            }
        });
    });

    view! {
        <PopupShell coordinator=coordinator kind=PopupKind::Labels title="Labels">
            <input
                class="popup-search"
                type="text"
                placeholder="Search labels..."
                prop:value=move || keyword.get()
                on:input=move |ev| {
                    let target = ev.target().unwrap();
                    let input = target.dyn_ref::<web_sys::HtmlInputElement>().unwrap();
                    set_keyword.set(input.value());
                    debounce.with_value(|d| d.run(move || search.run(keyword.get_untracked())));
                }
            />
            <ul class="popup-list">
                <For
                    each=move || results.get()
                    key=|label| label.id
                    children=move |label| {
                        let label_id = label.id;
                        let assigned = move || {
                            board.tasks().with(|tasks| {
                                find_task(tasks, task_id)
                                    .map(|t| t.labels.iter().any(|l| l.id == label_id))
                                    .unwrap_or(false)
                            })
                        };
                        let swatch = format!("background: {};", label.color);
                        let name = label.name.clone();
                        view! {
                            <li>
                                <button
                                    class=move || if assigned() { "popup-item assigned" } else { "popup-item" }
                                    on:click=move |ev| {
                                        ev.stop_propagation();
                                        toggle.run(label.clone());
                                    }
                                >
                                    <span class="label-swatch" style=swatch></span>
                                    {name}
                                    <Show when=assigned>
                                        <span class="assigned-mark">"✓"</span>
                                    </Show>
                                </button>
                            </li>
                        }
                    }
                />
            </ul>
        </PopupShell>
    }
}
