//! Board View Component
//!
//! Columns of ordered cards with drag-and-drop reordering. A drop
//! mutates the cache optimistically, sends the move request, and then
//! either reconciles against a fresh server snapshot or rolls the cache
//! back. One move request at a time; drops landing while one is pending
//! are discarded.

use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::JsCast;

use leptos_dragdrop::{create_dnd_signals, DndSignals, DropSlot};

use crate::api;
use crate::components::{CardView, DropZone};
use crate::models::Column;
use crate::reorder::{resolve_drop_index, MoveOutcome, ReorderFlow};
use crate::session::use_session;
use crate::store::{
    find_column, load_board, store_insert_task, store_move_task, store_revert, tasks_in,
    use_board_store, BoardStateStoreFields,
};

#[component]
pub fn BoardView() -> impl IntoView {
    let session = use_session();
    let board = use_board_store();
    let dnd = create_dnd_signals();
    let flow = RwSignal::new(ReorderFlow::default());

    let on_drop = Callback::new(move |(task_id, slot): (u64, DropSlot)| {
        let mut f = flow.get_untracked();
        if !f.begin_drop(task_id) {
            log::debug!("move request in flight, drop ignored");
            return;
        }
        flow.set(f);

        let new_index = board
            .tasks()
            .with_untracked(|tasks| resolve_drop_index(tasks, task_id, slot.column_id, slot.index));
        let reversal = store_move_task(&board, task_id, slot.column_id, new_index);

        let api = session.api();
        spawn_local(async move {
            let outcome = match api::tasks::move_task(&api, task_id, slot.column_id, new_index).await
            {
                Ok(()) => {
                    // Reload wins: replace the optimistic guess with the
                    // authoritative server snapshot
                    if let Err(err) = load_board(&api, session.project_id, board).await {
                        session.error(format!("Board reload failed: {}", err));
                    }
                    MoveOutcome::Reconciled
                }
                Err(err) => {
                    let target = board
                        .columns()
                        .with_untracked(|columns| {
                            find_column(columns, slot.column_id).map(|c| c.name.clone())
                        })
                        .unwrap_or_else(|| "column".to_string());
                    session.error(format!("Could not move card to {}: {}", target, err));
                    if let Some(reversal) = reversal {
                        store_revert(&board, reversal);
                    }
                    MoveOutcome::RolledBack
                }
            };
            log::debug!("move of task {} settled: {:?}", task_id, outcome);
            flow.update(|f| f.settle());
        });
    });

    view! {
        <div class="board">
            <For
                each=move || board.columns().get()
                key=|column| (column.id, column.name.clone())
                children=move |column| {
                    view! { <ColumnView column=column dnd=dnd flow=flow on_drop=on_drop /> }
                }
            />
            <NewColumnForm />
        </div>
    }
}

#[component]
fn ColumnView(
    column: Column,
    dnd: DndSignals,
    flow: RwSignal<ReorderFlow>,
    on_drop: Callback<(u64, DropSlot)>,
) -> impl IntoView {
    let board = use_board_store();
    let column_id = column.id;
    let cards = move || board.tasks().with(|tasks| tasks_in(tasks, column_id));
    let head_slot = DropSlot { column_id, index: 0 };

    view! {
        <section class="column">
            <header class="column-header">
                <h2>{column.name.clone()}</h2>
                <span class="column-count">{move || cards().len()}</span>
            </header>
            <div class="column-cards">
                <DropZone dnd=dnd slot=head_slot on_drop=on_drop />
                <For
                    each=cards
                    key=|task| {
                        (
                            task.id,
                            task.order_index,
                            task.title.clone(),
                            task.due_date,
                            task.labels.len(),
                            task.members.len(),
                            task.attachments.len(),
                        )
                    }
                    children=move |task| {
                        let next_slot = DropSlot { column_id, index: task.order_index as usize + 1 };
                        view! {
                            <CardView task=task dnd=dnd flow=flow />
                            <DropZone dnd=dnd slot=next_slot on_drop=on_drop />
                        }
                    }
                />
            </div>
            <QuickAddForm column_id=column_id />
        </section>
    }
}

/// Quick-add: title only; the server assigns the tail position
#[component]
fn QuickAddForm(column_id: u64) -> impl IntoView {
    let session = use_session();
    let board = use_board_store();
    let (title, set_title) = signal(String::new());

    let create = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let text = title.get().trim().to_string();
        if text.is_empty() {
            return;
        }
        spawn_local(async move {
            match api::tasks::create_task(&session.api(), column_id, &text).await {
                Ok(task) => {
                    store_insert_task(&board, task);
                    set_title.set(String::new());
                }
                Err(err) => session.error(format!("Could not add card: {}", err)),
            }
        });
    };

    view! {
        <form class="quick-add" on:submit=create>
            <input
                type="text"
                placeholder="Add a card..."
                prop:value=move || title.get()
                on:input=move |ev| {
                    let target = ev.target().unwrap();
                    let input = target.dyn_ref::<web_sys::HtmlInputElement>().unwrap();
                    set_title.set(input.value());
                }
            />
            <button type="submit">"Add"</button>
        </form>
    }
}

#[component]
fn NewColumnForm() -> impl IntoView {
    let session = use_session();
    let board = use_board_store();
    let (name, set_name) = signal(String::new());

    let create = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let text = name.get().trim().to_string();
        if text.is_empty() {
            return;
        }
        spawn_local(async move {
            match api::tasks::create_column(&session.api(), session.project_id, &text).await {
                Ok(column) => {
                    board.columns().write().push(column);
                    set_name.set(String::new());
                }
                Err(err) => session.error(format!("Could not add column: {}", err)),
            }
        });
    };

    view! {
        <form class="new-column" on:submit=create>
            <input
                type="text"
                placeholder="Add a column..."
                prop:value=move || name.get()
                on:input=move |ev| {
                    let target = ev.target().unwrap();
                    let input = target.dyn_ref::<web_sys::HtmlInputElement>().unwrap();
                    set_name.set(input.value());
                }
            />
            <button type="submit">"Add"</button>
        </form>
    }
}
