//! Drag Reorder Controller
//!
//! Tracks one drag interaction from drag start through drop to server
//! reconciliation or rollback. At most one move request is in flight at a
//! time; a drop landing while one is pending is ignored outright, not
//! queued.

use crate::models::Task;
use crate::store::tasks_in;

/// Lifecycle of a drag interaction
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReorderPhase {
    #[default]
    Idle,
    Dragging {
        task_id: u64,
    },
    /// Drop accepted, move request in flight
    Pending {
        task_id: u64,
    },
}

/// Reorder state machine: Idle → Dragging → Pending → Idle
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReorderFlow {
    phase: ReorderPhase,
}

impl ReorderFlow {
    pub fn phase(&self) -> ReorderPhase {
        self.phase
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.phase, ReorderPhase::Pending { .. })
    }

    pub fn drag_start(&mut self, task_id: u64) {
        if matches!(self.phase, ReorderPhase::Idle) {
            self.phase = ReorderPhase::Dragging { task_id };
        }
    }

    /// Drag released without a drop
    pub fn drag_end(&mut self) {
        if matches!(self.phase, ReorderPhase::Dragging { .. }) {
            self.phase = ReorderPhase::Idle;
        }
    }

    /// Accept a drop unless a move is already pending. Returns whether the
    /// caller may proceed with the optimistic mutation and request.
    pub fn begin_drop(&mut self, task_id: u64) -> bool {
        if self.is_pending() {
            return false;
        }
        self.phase = ReorderPhase::Pending { task_id };
        true
    }

    /// The pending move reconciled or rolled back; either way the flow
    /// returns to idle.
    pub fn settle(&mut self) {
        if self.is_pending() {
            self.phase = ReorderPhase::Idle;
        }
    }
}

/// Outcome of one settled move request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    Reconciled,
    RolledBack,
}

/// Translate a drop-slot index into the task's order index among its
/// siblings once the dragged card is taken out of its old position.
///
/// Slots sit before each card and after the last one, so a slot index can
/// point one past a card that is about to vanish from above it.
pub fn resolve_drop_index(tasks: &[Task], dragged_id: u64, column_id: u64, slot_index: usize) -> u32 {
    let siblings = tasks_in(tasks, column_id);
    let dragged_pos = siblings.iter().position(|t| t.id == dragged_id);
    let len_without_dragged = siblings.len() - usize::from(dragged_pos.is_some());

    let mut index = slot_index;
    if let Some(pos) = dragged_pos {
        if pos < index {
            index -= 1;
        }
    }
    index.min(len_without_dragged) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Task;

    fn make_task(id: u64, column_id: u64, order_index: u32) -> Task {
        Task {
            id,
            column_id,
            title: String::new(),
            description: String::new(),
            due_date: None,
            start_date: None,
            order_index,
            labels: Vec::new(),
            members: Vec::new(),
            attachments: Vec::new(),
        }
    }

    #[test]
    fn test_flow_happy_path() {
        let mut flow = ReorderFlow::default();
        assert_eq!(flow.phase(), ReorderPhase::Idle);

        flow.drag_start(7);
        assert_eq!(flow.phase(), ReorderPhase::Dragging { task_id: 7 });

        assert!(flow.begin_drop(7));
        assert!(flow.is_pending());

        flow.settle();
        assert_eq!(flow.phase(), ReorderPhase::Idle);
    }

    #[test]
    fn test_drop_while_pending_is_ignored() {
        let mut flow = ReorderFlow::default();
        assert!(flow.begin_drop(1));
        // Second drop while the first is still in flight
        assert!(!flow.begin_drop(2));
        assert_eq!(flow.phase(), ReorderPhase::Pending { task_id: 1 });
        flow.settle();
        assert!(flow.begin_drop(2));
    }

    #[test]
    fn test_drag_end_without_drop() {
        let mut flow = ReorderFlow::default();
        flow.drag_start(3);
        flow.drag_end();
        assert_eq!(flow.phase(), ReorderPhase::Idle);
    }

    #[test]
    fn test_resolve_drop_cross_column() {
        let tasks = vec![make_task(1, 1, 0), make_task(2, 2, 0), make_task(3, 2, 1)];
        // Dropping into column 2 at the tail slot
        assert_eq!(resolve_drop_index(&tasks, 1, 2, 2), 2);
        assert_eq!(resolve_drop_index(&tasks, 1, 2, 0), 0);
    }

    #[test]
    fn test_resolve_drop_same_column_below_self() {
        let tasks = vec![make_task(1, 1, 0), make_task(2, 1, 1), make_task(3, 1, 2)];
        // Card 1 dragged to the slot after card 2: its own removal shifts
        // the slot down by one.
        assert_eq!(resolve_drop_index(&tasks, 1, 1, 2), 1);
        // Tail slot
        assert_eq!(resolve_drop_index(&tasks, 1, 1, 3), 2);
    }

    #[test]
    fn test_resolve_drop_same_column_above_self() {
        let tasks = vec![make_task(1, 1, 0), make_task(2, 1, 1), make_task(3, 1, 2)];
        assert_eq!(resolve_drop_index(&tasks, 3, 1, 0), 0);
        assert_eq!(resolve_drop_index(&tasks, 3, 1, 1), 1);
    }

    #[test]
    fn test_resolve_drop_clamps_out_of_range_slot() {
        let tasks = vec![make_task(1, 1, 0)];
        assert_eq!(resolve_drop_index(&tasks, 2, 1, 9), 1);
    }
}
