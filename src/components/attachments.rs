//! Attachment Components
//!
//! One parametrized attachment list shared by every call site, plus the
//! upload popup. Uploads are confirm-first (no optimistic insert, the
//! file URL only exists once the server has it); deletes are optimistic
//! with rollback.

use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::JsCast;

use crate::api;
use crate::components::{ConfirmButton, PopupCoordinator, PopupKind, PopupShell};
use crate::models::Attachment;
use crate::session::use_session;
use crate::store::{
    find_task, store_patch_task, store_revert, use_board_store, BoardStateStoreFields,
};

/// The single attachment renderer. Call sites pass a delete callback or
/// get a read-only list.
#[component]
pub fn AttachmentList(
    #[prop(into)] attachments: Signal<Vec<Attachment>>,
    #[prop(optional, into)] on_delete: Option<Callback<u64>>,
) -> impl IntoView {
    view! {
        <ul class="attachment-list">
            <For
                each=move || attachments.get()
                key=|attachment| attachment.id
                children=move |attachment| {
                    let id = attachment.id;
                    view! {
                        <li class="attachment-row">
                            <a class="attachment-name" href=attachment.url.clone() target="_blank">
                                {attachment.file_name.clone()}
                            </a>
                            {attachment.uploaded_at.map(|at| view! {
                                <span class="attachment-date">{at.format("%Y-%m-%d").to_string()}</span>
                            })}
                            {on_delete.map(|on_delete| view! {
                                <ConfirmButton
                                    button_class="attachment-delete"
                                    on_confirm=move |_: ()| on_delete.run(id)
                                />
                            })}
                        </li>
                    }
                }
            />
        </ul>
    }
}

#[component]
pub fn AttachmentsPopup(task_id: u64, coordinator: PopupCoordinator) -> impl IntoView {
    let session = use_session();
    let board = use_board_store();
    let (uploading, set_uploading) = signal(false);

    let attachments = Signal::derive(move || {
        board.tasks().with(|tasks| {
            find_task(tasks, task_id)
                .map(|t| t.attachments.clone())
                .unwrap_or_default()
        })
    });

    // Refresh from the server when the popup opens
    Effect::new(move |_| {
        if coordinator.is_open(PopupKind::Attachments) {
            let api = session.api();
            spawn_local(async move {
                match api::tasks::list_attachments(&api, task_id).await {
                    Ok(fresh) => {
                        store_patch_task(&board, task_id, |t| t.attachments = fresh);
                    }
                    Err(err) => log::warn!("attachment refresh failed: {}", err),
                }
            });
        }
    });

    let upload = move |ev: web_sys::Event| {
        let target = ev.target().unwrap();
        let input = target.dyn_ref::<web_sys::HtmlInputElement>().unwrap().clone();
        let Some(file) = input.files().and_then(|files| files.get(0)) else {
            return;
        };
        set_uploading.set(true);
        let api = session.api();
        spawn_local(async move {
            match api::tasks::upload_attachment(&api, task_id, &file).await {
                Ok(attachment) => {
                    store_patch_task(&board, task_id, |t| t.attachments.push(attachment));
                }
                Err(err) => session.error(format!("Upload failed: {}", err)),
            }
            input.set_value("");
            set_uploading.set(false);
        });
    };

    let delete = Callback::new(move |attachment_id: u64| {
        let reversal = store_patch_task(&board, task_id, |t| {
            t.attachments.retain(|a| a.id != attachment_id);
        });
        let api = session.api();
        spawn_local(async move {
            if let Err(err) = api::tasks::delete_attachment(&api, task_id, attachment_id).await {
                session.error(format!("Could not delete attachment: {}", err));
                if let Some(reversal) = reversal {
                    store_revert(&board, reversal);
                }
            }
        });
    });

    view! {
        <PopupShell coordinator=coordinator kind=PopupKind::Attachments title="Attachments">
            <AttachmentList attachments=attachments on_delete=delete />
            <label class="attachment-upload">
                {move || if uploading.get() { "Uploading..." } else { "Upload a file" }}
                <input type="file" on:change=upload prop:disabled=move || uploading.get() />
            </label>
        </PopupShell>
    }
}
