//! Leptos DragDrop Utilities
//!
//! Signal plumbing for HTML5 drag-and-drop over a column/card board.
//! Cards are draggable; drop slots sit between cards and at the tail
//! of each column's card list.

use leptos::prelude::*;
use web_sys::DragEvent;

/// A drop position inside one column: insert before the card currently
/// at `index` (index == card count means the column tail).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DropSlot {
    pub column_id: u64,
    pub index: usize,
}

/// DnD state signals shared by every card and drop slot on the board
#[derive(Clone, Copy)]
pub struct DndSignals {
    /// Card currently being dragged (None when idle)
    pub dragging: RwSignal<Option<u64>>,
    /// Slot currently hovered by the drag
    pub over: RwSignal<Option<DropSlot>>,
}

pub fn create_dnd_signals() -> DndSignals {
    DndSignals {
        dragging: RwSignal::new(None),
        over: RwSignal::new(None),
    }
}

/// End drag operation, clearing all transient state
pub fn end_drag(dnd: &DndSignals) {
    dnd.dragging.set(None);
    dnd.over.set(None);
}

/// Create dragstart handler for a draggable card
pub fn make_on_dragstart(dnd: DndSignals, card_id: u64) -> impl Fn(DragEvent) + Copy + 'static {
    move |ev: DragEvent| {
        if let Some(dt) = ev.data_transfer() {
            dt.set_effect_allowed("move");
            let _ = dt.set_data("text/plain", &card_id.to_string());
        }
        dnd.dragging.set(Some(card_id));
    }
}

/// Create dragend handler for a draggable card
///
/// Fires after drop (or on cancel); clears state either way so an
/// aborted drag never leaves a stale highlight behind.
pub fn make_on_dragend(dnd: DndSignals) -> impl Fn(DragEvent) + Copy + 'static {
    move |_ev: DragEvent| {
        end_drag(&dnd);
    }
}

/// Create dragover handler for a drop slot
///
/// Must call prevent_default, otherwise the browser refuses the drop.
pub fn make_on_slot_dragover(dnd: DndSignals, slot: DropSlot) -> impl Fn(DragEvent) + Copy + 'static {
    move |ev: DragEvent| {
        ev.prevent_default();
        if dnd.dragging.get_untracked().is_some() {
            dnd.over.set(Some(slot));
        }
    }
}

/// Create dragleave handler for a drop slot
pub fn make_on_slot_dragleave(dnd: DndSignals, slot: DropSlot) -> impl Fn(DragEvent) + Copy + 'static {
    move |_ev: DragEvent| {
        // Only clear if this slot is still the hovered one
        if dnd.over.get_untracked() == Some(slot) {
            dnd.over.set(None);
        }
    }
}

/// Create drop handler for a drop slot
///
/// Invokes `on_drop(card_id, slot)` when a card is released over the slot.
pub fn make_on_slot_drop(
    dnd: DndSignals,
    slot: DropSlot,
    on_drop: Callback<(u64, DropSlot)>,
) -> impl Fn(DragEvent) + Copy + 'static {
    move |ev: DragEvent| {
        ev.prevent_default();
        let dragged = dnd.dragging.get_untracked();
        end_drag(&dnd);
        if let Some(card_id) = dragged {
            on_drop.run((card_id, slot));
        }
    }
}
