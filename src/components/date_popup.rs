//! Date Editor Popup
//!
//! Due/start date editing for one task. Saves optimistically and rolls
//! back on failure.

use chrono::NaiveDate;
use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::JsCast;

use crate::api;
use crate::components::{PopupCoordinator, PopupKind, PopupShell};
use crate::session::use_session;
use crate::store::{
    find_task, store_patch_task, store_revert, use_board_store, BoardStateStoreFields,
};

const DATE_FORMAT: &str = "%Y-%m-%d";

fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format(DATE_FORMAT).to_string()).unwrap_or_default()
}

#[component]
pub fn DatePopup(task_id: u64, coordinator: PopupCoordinator) -> impl IntoView {
    let session = use_session();
    let board = use_board_store();
    let (due, set_due) = signal(String::new());
    let (start, set_start) = signal(String::new());

    // Re-seed the inputs from the cache each time the popup opens
    Effect::new(move |_| {
        if coordinator.is_open(PopupKind::Dates) {
            let dates = board
                .tasks()
                .with_untracked(|tasks| find_task(tasks, task_id).map(|t| (t.due_date, t.start_date)))
                .unwrap_or_default();
            set_due.set(format_date(dates.0));
            set_start.set(format_date(dates.1));
        }
    });

    let save = move |ev: web_sys::MouseEvent| {
        ev.stop_propagation();
        let due_date = NaiveDate::parse_from_str(&due.get(), DATE_FORMAT).ok();
        let start_date = NaiveDate::parse_from_str(&start.get(), DATE_FORMAT).ok();
        let reversal = store_patch_task(&board, task_id, |t| {
            t.due_date = due_date;
            t.start_date = start_date;
        });
        let api = session.api();
        spawn_local(async move {
            match api::tasks::save_dates(&api, task_id, due_date, start_date).await {
                Ok(()) => coordinator.close(),
                Err(err) => {
                    session.error(format!("Could not save dates: {}", err));
                    if let Some(reversal) = reversal {
                        store_revert(&board, reversal);
                    }
                }
            }
        });
    };

    view! {
        <PopupShell coordinator=coordinator kind=PopupKind::Dates title="Dates">
            <label class="popup-field">
                "Start"
                <input
                    type="date"
                    prop:value=move || start.get()
                    on:input=move |ev| {
                        let target = ev.target().unwrap();
                        let input = target.dyn_ref::<web_sys::HtmlInputElement>().unwrap();
                        set_start.set(input.value());
                    }
                />
            </label>
            <label class="popup-field">
                "Due"
                <input
                    type="date"
                    prop:value=move || due.get()
                    on:input=move |ev| {
                        let target = ev.target().unwrap();
                        let input = target.dyn_ref::<web_sys::HtmlInputElement>().unwrap();
                        set_due.set(input.value());
                    }
                />
            </label>
            <button class="popup-save" on:click=save>"Save"</button>
        </PopupShell>
    }
}
