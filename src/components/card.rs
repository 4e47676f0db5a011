//! Card Component
//!
//! One task card: label chips, title, due date badge, member avatars,
//! attachment count. Draggable; clicking opens the task detail panel.

use leptos::prelude::*;

use leptos_dragdrop::{make_on_dragend, make_on_dragstart, DndSignals};

use crate::app::SelectedTask;
use crate::models::Task;
use crate::reorder::ReorderFlow;

/// First letters of the first two name words
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .take(2)
        .filter_map(|word| word.chars().next())
        .collect::<String>()
        .to_uppercase()
}

#[component]
pub fn CardView(task: Task, dnd: DndSignals, flow: RwSignal<ReorderFlow>) -> impl IntoView {
    let selected = expect_context::<SelectedTask>();
    let id = task.id;

    let dragstart = make_on_dragstart(dnd, id);
    let on_dragstart = move |ev: web_sys::DragEvent| {
        dragstart(ev);
        flow.update(|f| f.drag_start(id));
    };
    let dragend = make_on_dragend(dnd);
    let on_dragend = move |ev: web_sys::DragEvent| {
        dragend(ev);
        flow.update(|f| f.drag_end());
    };

    let is_dragging = move || dnd.dragging.get() == Some(id);
    let card_class = move || if is_dragging() { "card dragging" } else { "card" };

    let due_badge = task.due_date.map(|d| d.format("%b %e").to_string());
    let attachment_count = task.attachments.len();

    view! {
        <article
            class=card_class
            draggable="true"
            on:dragstart=on_dragstart
            on:dragend=on_dragend
            on:click=move |_| selected.0.set(Some(id))
        >
            <div class="card-labels">
                {task.labels.iter().map(|label| {
                    view! {
                        <span
                            class="label-chip"
                            style=format!("background: {};", label.color)
                            title=label.name.clone()
                        />
                    }
                }).collect_view()}
            </div>
            <h3 class="card-title">{task.title.clone()}</h3>
            <div class="card-meta">
                {due_badge.map(|badge| view! { <span class="due-badge">{badge}</span> })}
                {(attachment_count > 0).then(|| view! {
                    <span class="attachment-count">{format!("📎 {}", attachment_count)}</span>
                })}
                <span class="card-members">
                    {task.members.iter().map(|member| {
                        match &member.avatar_url {
                            Some(url) => view! {
                                <img class="member-avatar" src=url.clone() alt=member.name.clone() />
                            }.into_any(),
                            None => view! {
                                <span class="member-avatar initials" title=member.name.clone()>
                                    {initials(&member.name)}
                                </span>
                            }.into_any(),
                        }
                    }).collect_view()}
                </span>
            </div>
        </article>
    }
}

#[cfg(test)]
mod tests {
    use super::initials;

    #[test]
    fn test_initials() {
        assert_eq!(initials("Ana Torres"), "AT");
        assert_eq!(initials("ana"), "A");
        assert_eq!(initials("Ana Maria Ruiz"), "AM");
        assert_eq!(initials(""), "");
    }
}
