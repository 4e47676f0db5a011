//! Task Detail Panel
//!
//! Side panel for the selected card: title edit, debounced description
//! save, date/member/label/attachment popups, delete, and the comment
//! thread. One popup coordinator covers the whole panel region.

use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::JsCast;

use crate::api;
use crate::app::SelectedTask;
use crate::components::{
    AttachmentList, AttachmentsPopup, CommentThread, ConfirmButton, DatePopup, LabelPopup,
    MemberPopup, PopupAnchor, PopupCoordinator, PopupKind,
};
use crate::session::use_session;
use crate::store::{
    find_task, store_patch_task, store_remove_task, store_revert, use_board_store,
    BoardStateStoreFields,
};
use crate::timing::{Debouncer, TokenIssuer, SEARCH_DEBOUNCE_MS};

#[component]
pub fn TaskDetail() -> impl IntoView {
    let selected = expect_context::<SelectedTask>();
    view! {
        {move || selected.0.get().map(|task_id| view! { <TaskDetailPanel task_id=task_id /> })}
    }
}

#[component]
fn TaskDetailPanel(task_id: u64) -> impl IntoView {
    let session = use_session();
    let board = use_board_store();
    let selected = expect_context::<SelectedTask>();
    let coordinator = PopupCoordinator::new();

    let Some(initial) =
        board.tasks().with_untracked(|tasks| find_task(tasks, task_id).cloned())
    else {
        return view! { <aside class="task-detail empty">"Card no longer exists"</aside> }.into_any();
    };

    // Title, saved on blur / Enter
    let (title, set_title) = signal(initial.title.clone());
    let save_title = move || {
        let text = title.get_untracked().trim().to_string();
        if text.is_empty() {
            return;
        }
        let unchanged = board.tasks().with_untracked(|tasks| {
            find_task(tasks, task_id).map(|t| t.title == text).unwrap_or(true)
        });
        if unchanged {
            return;
        }
        let request_text = text.clone();
        let reversal = store_patch_task(&board, task_id, move |t| t.title = text);
        let api = session.api();
        spawn_local(async move {
            if let Err(err) = api::tasks::save_title(&api, task_id, &request_text).await {
                session.error(format!("Could not rename card: {}", err));
                if let Some(reversal) = reversal {
                    store_revert(&board, reversal);
                }
            }
        });
    };

    // Description: debounced save; a save landing after a newer one was
    // issued is discarded by token
    let (description, set_description) = signal(initial.description.clone());
    let save_tokens = TokenIssuer::default();
    let debounce = StoredValue::new_local(Debouncer::new(SEARCH_DEBOUNCE_MS));
    let save_description = Callback::new(move |text: String| {
        let token = save_tokens.issue();
        let issuer = save_tokens.clone();
        let api = session.api();
        spawn_local(async move {
            match api::tasks::save_description(&api, task_id, &text).await {
                Ok(()) => {
                    if issuer.is_current(token) {
                        store_patch_task(&board, task_id, |t| t.description = text);
                    } else {
                        log::debug!("stale description save dropped");
                    }
                }
                Err(err) => {
                    if issuer.is_current(token) {
                        session.error(format!("Could not save description: {}", err));
                    }
                }
            }
        });
    });

    let delete_task = move |_: ()| {
        let reversal = store_remove_task(&board, task_id);
        let api = session.api();
        spawn_local(async move {
            match api::tasks::delete_task(&api, task_id).await {
                Ok(()) => selected.0.set(None),
                Err(err) => {
                    session.error(format!("Could not delete card: {}", err));
                    if let Some(reversal) = reversal {
                        store_revert(&board, reversal);
                    }
                }
            }
        });
    };

    let current = move || board.tasks().with(|tasks| find_task(tasks, task_id).cloned());
    let labels = move || current().map(|t| t.labels).unwrap_or_default();
    let members = move || current().map(|t| t.members).unwrap_or_default();
    let dates = move || {
        current().and_then(|t| match (t.start_date, t.due_date) {
            (None, None) => None,
            (start, due) => Some(format!(
                "{} → {}",
                start.map(|d| d.to_string()).unwrap_or_else(|| "…".into()),
                due.map(|d| d.to_string()).unwrap_or_else(|| "…".into()),
            )),
        })
    };
    let attachments = Signal::derive(move || current().map(|t| t.attachments).unwrap_or_default());

    view! {
        <aside
            class="task-detail"
            on:contextmenu=move |ev: web_sys::MouseEvent| {
                ev.prevent_default();
                ev.stop_propagation();
                coordinator.open(PopupKind::Labels, PopupAnchor::at(&ev));
            }
        >
            <header class="detail-header">
                <input
                    class="detail-title"
                    type="text"
                    prop:value=move || title.get()
                    on:input=move |ev| {
                        let target = ev.target().unwrap();
                        let input = target.dyn_ref::<web_sys::HtmlInputElement>().unwrap();
                        set_title.set(input.value());
                    }
                    on:blur=move |_| save_title()
                    on:keydown=move |ev: web_sys::KeyboardEvent| {
                        if ev.key() == "Enter" {
                            save_title();
                        }
                    }
                />
                <button class="detail-close" on:click=move |_| selected.0.set(None)>"×"</button>
            </header>

            <div class="detail-toolbar">
                <button on:click=move |ev| {
                    ev.stop_propagation();
                    coordinator.open(PopupKind::Members, PopupAnchor::below(&ev));
                }>"Members"</button>
                <button on:click=move |ev| {
                    ev.stop_propagation();
                    coordinator.open(PopupKind::Labels, PopupAnchor::below(&ev));
                }>"Labels"</button>
                <button on:click=move |ev| {
                    ev.stop_propagation();
                    coordinator.open(PopupKind::Dates, PopupAnchor::below(&ev));
                }>"Dates"</button>
                <button on:click=move |ev| {
                    ev.stop_propagation();
                    coordinator.open(PopupKind::Attachments, PopupAnchor::below(&ev));
                }>"Attachments"</button>
                <ConfirmButton button_class="detail-delete" on_confirm=delete_task />
            </div>

            <div class="detail-chips">
                {move || labels().into_iter().map(|label| view! {
                    <span class="label-chip wide" style=format!("background: {};", label.color)>
                        {label.name}
                    </span>
                }).collect_view()}
                {move || members().into_iter().map(|member| view! {
                    <span class="member-chip" title=member.email>{member.name}</span>
                }).collect_view()}
                {move || dates().map(|text| view! { <span class="date-chip">{text}</span> })}
            </div>

            <textarea
                class="detail-description"
                placeholder="Add a description..."
                prop:value=move || description.get()
                on:input=move |ev| {
                    let target = ev.target().unwrap();
                    let area = target.dyn_ref::<web_sys::HtmlTextAreaElement>().unwrap();
                    set_description.set(area.value());
                    debounce.with_value(|d| {
                        d.run(move || save_description.run(description.get_untracked()))
                    });
                }
            ></textarea>

            <h4>"Attachments"</h4>
            <AttachmentList attachments=attachments />

            <CommentThread task_id=task_id />

            <MemberPopup task_id=task_id coordinator=coordinator />
            <LabelPopup task_id=task_id coordinator=coordinator />
            <DatePopup task_id=task_id coordinator=coordinator />
            <AttachmentsPopup task_id=task_id coordinator=coordinator />
        </aside>
    }
    .into_any()
}
