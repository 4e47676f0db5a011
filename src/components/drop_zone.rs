//! Drop Zone Component
//!
//! A horizontal line drop zone between cards (and at the column tail)
//! for drag-and-drop reordering.

use leptos::prelude::*;

use leptos_dragdrop::{
    make_on_slot_dragleave, make_on_slot_dragover, make_on_slot_drop, DndSignals, DropSlot,
};

/// Drop zone shown while a card is dragged, marking one insert position
#[component]
pub fn DropZone(
    dnd: DndSignals,
    slot: DropSlot,
    /// Callback when a card is dropped here
    on_drop: Callback<(u64, DropSlot)>,
) -> impl IntoView {
    let on_dragover = make_on_slot_dragover(dnd, slot);
    let on_dragleave = make_on_slot_dragleave(dnd, slot);
    let on_drop_handler = make_on_slot_drop(dnd, slot, on_drop);

    let is_over = move || dnd.over.get() == Some(slot);
    // Only show while dragging
    let is_visible = move || dnd.dragging.get().is_some();

    view! {
        <div
            class=move || {
                let mut c = "drop-zone".to_string();
                if is_over() { c.push_str(" active"); }
                if !is_visible() { c.push_str(" hidden"); }
                c
            }
            on:dragover=on_dragover
            on:dragleave=on_dragleave
            on:drop=on_drop_handler
        />
    }
}
