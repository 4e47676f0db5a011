//! Board State Store
//!
//! Authoritative client-side cache of one project's columns and tasks,
//! wrapped in a Leptos reactive store so every mutation re-renders its
//! subscribers. Mutations apply optimistically and hand back a [`Reversal`]
//! that undoes them if the confirming network call fails.

use leptos::prelude::*;
use reactive_stores::Store;

use crate::api::{self, Api, ApiError};
use crate::models::{Column, Task};

/// Board cache with field-level reactivity
#[derive(Clone, Debug, Default, Store)]
pub struct BoardState {
    /// Columns of the current project, sorted by order index
    pub columns: Vec<Column>,
    /// All tasks of the current project, flat; grouped by `column_id`
    pub tasks: Vec<Task>,
}

/// Type alias for the store
pub type BoardStore = Store<BoardState>;

/// Get the board store from context
pub fn use_board_store() -> BoardStore {
    expect_context::<BoardStore>()
}

/// Undo token for one optimistic mutation.
///
/// Holds pre-images of every task the mutation touched; applying it
/// restores them (re-inserting deleted ones) and renumbers the affected
/// columns back to a dense sequence.
#[derive(Clone, Debug, PartialEq)]
pub struct Reversal {
    snapshot: Vec<Task>,
    renumber: Vec<u64>,
}

impl Reversal {
    pub fn apply(self, tasks: &mut Vec<Task>) {
        for pre in self.snapshot {
            match tasks.iter_mut().find(|t| t.id == pre.id) {
                Some(t) => *t = pre,
                None => tasks.push(pre),
            }
        }
        for column_id in self.renumber {
            renumber(tasks, column_id);
        }
    }
}

// ========================
// Pure cache operations
// ========================

/// Tasks of one column in display order
pub fn tasks_in(tasks: &[Task], column_id: u64) -> Vec<Task> {
    let mut out: Vec<Task> = tasks.iter().filter(|t| t.column_id == column_id).cloned().collect();
    out.sort_by_key(|t| t.order_index);
    out
}

pub fn find_task(tasks: &[Task], id: u64) -> Option<&Task> {
    tasks.iter().find(|t| t.id == id)
}

pub fn find_column(columns: &[Column], id: u64) -> Option<&Column> {
    columns.iter().find(|c| c.id == id)
}

/// Reassign a column's order indices to a dense 0..n-1 sequence
pub fn renumber(tasks: &mut [Task], column_id: u64) {
    let mut ids: Vec<(u32, u64)> = tasks
        .iter()
        .filter(|t| t.column_id == column_id)
        .map(|t| (t.order_index, t.id))
        .collect();
    ids.sort_by_key(|(order, _)| *order);
    for (i, (_, id)) in ids.into_iter().enumerate() {
        if let Some(t) = tasks.iter_mut().find(|t| t.id == id) {
            t.order_index = i as u32;
        }
    }
}

/// Move a task into `target_column_id` at `new_order_index`, renumbering
/// both affected columns densely. `new_order_index` is clamped to the
/// sibling count (tail insert).
pub fn move_task(
    tasks: &mut Vec<Task>,
    task_id: u64,
    target_column_id: u64,
    new_order_index: u32,
) -> Option<Reversal> {
    let source_column_id = find_task(tasks, task_id)?.column_id;
    let snapshot: Vec<Task> = tasks
        .iter()
        .filter(|t| t.column_id == source_column_id || t.column_id == target_column_id)
        .cloned()
        .collect();

    // Target siblings in display order, the moved task excluded
    let mut siblings: Vec<u64> = {
        let mut in_target: Vec<&Task> = tasks
            .iter()
            .filter(|t| t.column_id == target_column_id && t.id != task_id)
            .collect();
        in_target.sort_by_key(|t| t.order_index);
        in_target.into_iter().map(|t| t.id).collect()
    };
    let index = (new_order_index as usize).min(siblings.len());
    siblings.insert(index, task_id);

    if let Some(t) = tasks.iter_mut().find(|t| t.id == task_id) {
        t.column_id = target_column_id;
    }
    for (i, id) in siblings.iter().enumerate() {
        if let Some(t) = tasks.iter_mut().find(|t| t.id == *id) {
            t.order_index = i as u32;
        }
    }
    renumber(tasks, source_column_id);

    Some(Reversal {
        snapshot,
        renumber: vec![source_column_id, target_column_id],
    })
}

/// Apply an in-place edit to one task (title, description, dates, labels,
/// members), returning the undo token.
pub fn patch_task(
    tasks: &mut [Task],
    task_id: u64,
    patch: impl FnOnce(&mut Task),
) -> Option<Reversal> {
    let task = tasks.iter_mut().find(|t| t.id == task_id)?;
    let snapshot = vec![task.clone()];
    patch(task);
    Some(Reversal { snapshot, renumber: Vec::new() })
}

pub fn remove_task(tasks: &mut Vec<Task>, task_id: u64) -> Option<Reversal> {
    let task = find_task(tasks, task_id)?.clone();
    let column_id = task.column_id;
    let snapshot = vec![task];
    tasks.retain(|t| t.id != task_id);
    renumber(tasks, column_id);
    Some(Reversal { snapshot, renumber: vec![column_id] })
}

// ========================
// Store Helper Functions
// ========================

pub fn store_move_task(
    store: &BoardStore,
    task_id: u64,
    target_column_id: u64,
    new_order_index: u32,
) -> Option<Reversal> {
    let tasks_field = store.tasks();
    let mut tasks = tasks_field.write();
    move_task(&mut tasks, task_id, target_column_id, new_order_index)
}

pub fn store_patch_task(
    store: &BoardStore,
    task_id: u64,
    patch: impl FnOnce(&mut Task),
) -> Option<Reversal> {
    let tasks_field = store.tasks();
    let mut tasks = tasks_field.write();
    patch_task(&mut tasks, task_id, patch)
}

pub fn store_remove_task(store: &BoardStore, task_id: u64) -> Option<Reversal> {
    let tasks_field = store.tasks();
    let mut tasks = tasks_field.write();
    remove_task(&mut tasks, task_id)
}

pub fn store_insert_task(store: &BoardStore, task: Task) {
    store.tasks().write().push(task);
}

pub fn store_revert(store: &BoardStore, reversal: Reversal) {
    let tasks_field = store.tasks();
    let mut tasks = tasks_field.write();
    reversal.apply(&mut tasks);
}

/// Replace the whole cache from the server: columns first, then every
/// column's tasks. No partial merge, so a render always comes from one
/// consistent snapshot.
pub async fn load_board(api: &Api, project_id: u64, store: BoardStore) -> Result<(), ApiError> {
    let mut columns = api::tasks::list_columns(api, project_id).await?;
    columns.sort_by_key(|c| c.order_index);
    let mut tasks = Vec::new();
    for column in &columns {
        tasks.extend(api::tasks::list_tasks(api, column.id).await?);
    }
    *store.columns().write() = columns;
    *store.tasks().write() = tasks;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_task(id: u64, column_id: u64, order_index: u32) -> Task {
        Task {
            id,
            column_id,
            title: format!("Task {}", id),
            description: String::new(),
            due_date: None,
            start_date: None,
            order_index,
            labels: Vec::new(),
            members: Vec::new(),
            attachments: Vec::new(),
        }
    }

    fn indices(tasks: &[Task], column_id: u64) -> Vec<(u64, u32)> {
        tasks_in(tasks, column_id).iter().map(|t| (t.id, t.order_index)).collect()
    }

    fn assert_dense(tasks: &[Task], column_id: u64) {
        let column = tasks_in(tasks, column_id);
        for (i, t) in column.iter().enumerate() {
            assert_eq!(t.order_index, i as u32, "column {} not dense", column_id);
        }
    }

    #[test]
    fn test_move_across_columns_to_tail() {
        // Column 1 has 3 tasks, column 2 has 2; move task 11 (index 1) to the
        // tail of column 2.
        let mut tasks = vec![
            make_task(10, 1, 0),
            make_task(11, 1, 1),
            make_task(12, 1, 2),
            make_task(20, 2, 0),
            make_task(21, 2, 1),
        ];
        let reversal = move_task(&mut tasks, 11, 2, 2).unwrap();

        assert_eq!(indices(&tasks, 1), vec![(10, 0), (12, 1)]);
        assert_eq!(indices(&tasks, 2), vec![(20, 0), (21, 1), (11, 2)]);
        assert_dense(&tasks, 1);
        assert_dense(&tasks, 2);

        // Rollback restores the pre-drop layout exactly
        reversal.apply(&mut tasks);
        assert_eq!(indices(&tasks, 1), vec![(10, 0), (11, 1), (12, 2)]);
        assert_eq!(indices(&tasks, 2), vec![(20, 0), (21, 1)]);
    }

    #[test]
    fn test_move_within_column() {
        let mut tasks = vec![make_task(1, 1, 0), make_task(2, 1, 1), make_task(3, 1, 2)];
        move_task(&mut tasks, 3, 1, 0).unwrap();
        assert_eq!(indices(&tasks, 1), vec![(3, 0), (1, 1), (2, 2)]);
        assert_dense(&tasks, 1);
    }

    #[test]
    fn test_move_index_clamped_to_tail() {
        let mut tasks = vec![make_task(1, 1, 0), make_task(2, 2, 0)];
        move_task(&mut tasks, 1, 2, 99).unwrap();
        assert_eq!(indices(&tasks, 2), vec![(2, 0), (1, 1)]);
    }

    #[test]
    fn test_move_unknown_task_is_noop() {
        let mut tasks = vec![make_task(1, 1, 0)];
        assert!(move_task(&mut tasks, 42, 1, 0).is_none());
        assert_eq!(indices(&tasks, 1), vec![(1, 0)]);
    }

    #[test]
    fn test_find_column() {
        let columns = vec![
            Column { id: 1, name: "Todo".into(), order_index: 0 },
            Column { id: 2, name: "Done".into(), order_index: 1 },
        ];
        assert_eq!(find_column(&columns, 2).map(|c| c.name.as_str()), Some("Done"));
        assert!(find_column(&columns, 9).is_none());
    }

    #[test]
    fn test_density_after_move_sequence() {
        let mut tasks = vec![
            make_task(1, 1, 0),
            make_task(2, 1, 1),
            make_task(3, 1, 2),
            make_task(4, 2, 0),
        ];
        move_task(&mut tasks, 2, 2, 0).unwrap();
        move_task(&mut tasks, 1, 2, 2).unwrap();
        move_task(&mut tasks, 4, 1, 0).unwrap();
        move_task(&mut tasks, 3, 1, 1).unwrap();
        for column_id in [1, 2] {
            assert_dense(&tasks, column_id);
            let seen: std::collections::HashSet<u32> =
                tasks_in(&tasks, column_id).iter().map(|t| t.order_index).collect();
            assert_eq!(seen.len(), tasks_in(&tasks, column_id).len());
        }
    }

    #[test]
    fn test_patch_task_reversal() {
        let mut tasks = vec![make_task(1, 1, 0)];
        let reversal = patch_task(&mut tasks, 1, |t| t.title = "renamed".into()).unwrap();
        assert_eq!(tasks[0].title, "renamed");
        reversal.apply(&mut tasks);
        assert_eq!(tasks[0].title, "Task 1");
    }

    #[test]
    fn test_remove_task_reversal_reinserts() {
        let mut tasks = vec![make_task(1, 1, 0), make_task(2, 1, 1), make_task(3, 1, 2)];
        let reversal = remove_task(&mut tasks, 2).unwrap();
        assert_eq!(indices(&tasks, 1), vec![(1, 0), (3, 1)]);
        reversal.apply(&mut tasks);
        assert_eq!(indices(&tasks, 1), vec![(1, 0), (2, 1), (3, 2)]);
    }
}
