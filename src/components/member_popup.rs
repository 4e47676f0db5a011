//! Member Picker Popup
//!
//! Assign/unassign project members on a task, with a debounced keyword
//! search against the member-search endpoint. Stale search responses
//! are discarded by request token.

use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::JsCast;

use crate::api;
use crate::components::{PopupCoordinator, PopupKind, PopupShell};
use crate::models::Member;
use crate::session::use_session;
use crate::store::{
    find_task, store_patch_task, store_revert, use_board_store, BoardStateStoreFields,
};
use crate::timing::{Debouncer, TokenIssuer, SEARCH_DEBOUNCE_MS};

#[component]
pub fn MemberPopup(task_id: u64, coordinator: PopupCoordinator) -> impl IntoView {
    let session = use_session();
    let board = use_board_store();
    let (keyword, set_keyword) = signal(String::new());
    let (results, set_results) = signal(Vec::<Member>::new());
    let debounce = StoredValue::new_local(Debouncer::new(SEARCH_DEBOUNCE_MS));
    let tokens = TokenIssuer::default();

    let search = Callback::new(move |kw: String| {
        let token = tokens.issue();
        let issuer = tokens.clone();
        let api = session.api();
        spawn_local(async move {
            match api::projects::search_members(&api, session.project_id, &kw).await {
                Ok(members) => {
                    if issuer.is_current(token) {
                        set_results.set(members);
                    } else {
                        log::debug!("stale member search response dropped");
                    }
                }
                Err(err) => log::warn!("member search failed: {}", err),
            }
        });
    });

    // Unfiltered search whenever the popup opens
    Effect::new(move |_| {
        if coordinator.is_open(PopupKind::Members) {
            search.run(keyword.get_untracked());
        }
    });

    let toggle = Callback::new(move |member: Member| {
        let current = board
            .tasks()
            .with_untracked(|tasks| find_task(tasks, task_id).map(|t| t.members.clone()));
        let Some(mut members) = current else {
            return;
        };
        match members.iter().position(|m| m.user_id == member.user_id) {
            Some(pos) => {
                members.remove(pos);
            }
            None => members.push(member),
        }
        let ids: Vec<u64> = members.iter().map(|m| m.user_id).collect();
        let reversal = store_patch_task(&board, task_id, |t| t.members = members);
        let api = session.api();
        spawn_local(async move {
            if let Err(err) = api::tasks::set_members(&api, task_id, &ids).await {
                session.error(format!("Could not update members: {}", err));
                if let Some(reversal) = reversal {
                    store_revert(&board, reversal);
                }
            }
        });
    });

    view! {
        <PopupShell coordinator=coordinator kind=PopupKind::Members title="Members">
            <input
                class="popup-search"
                type="text"
                placeholder="Search members..."
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
                    key=|member| member.user_id
                    children=move |member| {
                        let user_id = member.user_id;
                        let assigned = move || {
                            board.tasks().with(|tasks| {
                                find_task(tasks, task_id)
                                    .map(|t| t.members.iter().any(|m| m.user_id == user_id))
                                    .unwrap_or(false)
                            })
                        };
                        let label = format!("{} <{}>", member.name, member.email);
                        view! {
                            <li>
                                <button
                                    class=move || if assigned() { "popup-item assigned" } else { "popup-item" }
                                    on:click=move |ev| {
                                        ev.stop_propagation();
                                        toggle.run(member.clone());
                                    }
                                >
                                    {label}
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
