//! Comment Thread
//!
//! Comments and the activity log for one task, loaded together in a
//! single request. Top-level comments carry flat reply lists. Posting is
//! confirm-first: nothing renders until the server echoes the comment.
//!
//! The composer watches the caret for an `@` trigger and runs a
//! debounced member lookup; picked suggestions replace the trigger with
//! the member's literal email token and accumulate mention metadata
//! scoped to that composer.

use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::JsCast;

use crate::activity::activity_sentence;
use crate::api;
use crate::components::{
    ConfirmButton, MentionText, PopupAnchor, PopupCoordinator, PopupKind, PopupShell,
};
use crate::mentions::{apply_suggestion, mention_query_at, MentionAccumulator};
use crate::models::{Comment, Member, TaskThread};
use crate::session::use_session;
use crate::timing::{Debouncer, TokenIssuer, SEARCH_DEBOUNCE_MS};

#[component]
pub fn CommentThread(task_id: u64) -> impl IntoView {
    let session = use_session();
    let (thread, set_thread) = signal(TaskThread::default());
    let (reply_to, set_reply_to) = signal(None::<u64>);

    Effect::new(move |_| {
        let api = session.api();
        spawn_local(async move {
            match api::comments::load_thread(&api, task_id).await {
                Ok(loaded) => set_thread.set(loaded),
                Err(err) => session.error(format!("Could not load comments: {}", err)),
            }
        });
    });

    let on_posted = Callback::new(move |comment: Comment| {
        set_thread.update(|t| t.comments.push(comment));
        set_reply_to.set(None);
    });

    let delete = Callback::new(move |comment_id: u64| {
        let api = session.api();
        spawn_local(async move {
            match api::comments::delete_comment(&api, comment_id).await {
                Ok(()) => set_thread.update(|t| {
                    t.comments
                        .retain(|c| c.id != comment_id && c.parent_id != Some(comment_id));
                }),
                Err(err) => session.error(format!("Could not delete comment: {}", err)),
            }
        });
    });

    let top_level = move || {
        thread
            .get()
            .comments
            .into_iter()
            .filter(|c| c.parent_id.is_none())
            .collect::<Vec<_>>()
    };

    view! {
        <section class="comments">
            <h4>"Comments"</h4>
            <CommentComposer task_id=task_id on_posted=on_posted />
            <For
                each=top_level
                key=|comment| comment.id
                children=move |comment| {
                    let comment_id = comment.id;
                    let replies = move || {
                        thread
                            .get()
                            .comments
                            .into_iter()
                            .filter(|c| c.parent_id == Some(comment_id))
                            .collect::<Vec<_>>()
                    };
                    view! {
                        <div class="comment">
                            <CommentItem comment=comment on_delete=delete />
                            <button
                                class="reply-btn"
                                on:click=move |_| set_reply_to.set(Some(comment_id))
                            >
                                "Reply"
                            </button>
                            <Show when=move || reply_to.get() == Some(comment_id)>
                                <CommentComposer
                                    task_id=task_id
                                    parent_id=comment_id
                                    on_posted=on_posted
                                />
                            </Show>
                            <div class="replies">
                                <For
                                    each=replies
                                    key=|reply| reply.id
                                    children=move |reply| {
                                        view! { <CommentItem comment=reply on_delete=delete /> }
                                    }
                                />
                            </div>
                        </div>
                    }
                }
            />
            <section class="activity">
                <h4>"Activity"</h4>
                <ul>
                    <For
                        each=move || thread.get().activity
                        key=|entry| (entry.action.clone(), entry.actor_name.clone(), entry.timestamp)
                        children=move |entry| {
                            view! { <li class="activity-entry">{activity_sentence(&entry)}</li> }
                        }
                    />
                </ul>
            </section>
        </section>
    }
}

#[component]
fn CommentItem(comment: Comment, on_delete: Callback<u64>) -> impl IntoView {
    let session = use_session();
    let id = comment.id;
    let own = comment.author_id == session.user_id;
    let date = comment
        .created_at
        .map(|at| at.format("%Y-%m-%d %H:%M").to_string());

    view! {
        <div class="comment-item">
            <div class="comment-head">
                <span class="comment-author">{comment.author_name.clone()}</span>
                {date.map(|d| view! { <span class="comment-date">{d}</span> })}
                {own.then(|| view! {
                    <ConfirmButton
                        button_class="comment-delete"
                        on_confirm=move |_: ()| on_delete.run(id)
                    />
                })}
            </div>
            <div class="comment-body">
                <MentionText content=comment.content.clone() mentions=comment.mentions.clone() />
            </div>
        </div>
    }
}

#[component]
fn CommentComposer(
    task_id: u64,
    #[prop(into, optional)] parent_id: Option<u64>,
    on_posted: Callback<Comment>,
) -> impl IntoView {
    let session = use_session();
    // Each composer is its own popup region with its own accumulator, so
    // two open composers never mix suggestion boxes or metadata.
    let coordinator = PopupCoordinator::new();
    let (content, set_content) = signal(String::new());
    let (suggestions, set_suggestions) = signal(Vec::<Member>::new());
    let (posting, set_posting) = signal(false);
    let accumulator = RwSignal::new(MentionAccumulator::default());
    let debounce = StoredValue::new_local(Debouncer::new(SEARCH_DEBOUNCE_MS));
    let tokens = TokenIssuer::default();
    let textarea = NodeRef::<leptos::html::Textarea>::new();

    let lookup = Callback::new(move |query: String| {
        let token = tokens.issue();
        let issuer = tokens.clone();
        let api = session.api();
        spawn_local(async move {
            match api::projects::search_members(&api, session.project_id, &query).await {
                Ok(members) => {
                    if !issuer.is_current(token) {
                        log::debug!("stale mention lookup dropped");
                        return;
                    }
                    set_suggestions.set(members);
                    if let Some(area) = textarea.get_untracked() {
                        coordinator.open(PopupKind::MentionSuggest, PopupAnchor::below_element(&area));
                    }
                }
                Err(err) => log::warn!("mention lookup failed: {}", err),
            }
        });
    });

    let on_input = move |ev: web_sys::Event| {
        let target = ev.target().unwrap();
        let area = target.dyn_ref::<web_sys::HtmlTextAreaElement>().unwrap();
        let value = area.value();
        let caret = area
            .selection_start()
            .ok()
            .flatten()
            .unwrap_or(value.len() as u32);
        set_content.set(value.clone());
        match mention_query_at(&value, caret) {
            Some(query) => {
                debounce.with_value(|d| d.run(move || lookup.run(query.query)));
            }
            None => {
                debounce.with_value(|d| d.cancel());
                coordinator.close();
            }
        }
    };

    let pick = Callback::new(move |member: Member| {
        let Some(area) = textarea.get_untracked() else {
            return;
        };
        let value = area.value();
        let caret = area
            .selection_start()
            .ok()
            .flatten()
            .unwrap_or(value.len() as u32);
        if let Some((new_text, new_caret)) = apply_suggestion(&value, caret, &member) {
            area.set_value(&new_text);
            let _ = area.set_selection_range(new_caret, new_caret);
            let _ = area.focus();
            set_content.set(new_text);
            accumulator.update(|acc| acc.record(&member));
        }
        coordinator.close();
    });

    let post = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let text = content.get().trim().to_string();
        // Empty comments are blocked locally, before any network call
        if text.is_empty() || posting.get_untracked() {
            return;
        }
        set_posting.set(true);
        let mentions = accumulator.get_untracked().entries().to_vec();
        let api = session.api();
        spawn_local(async move {
            let result = match parent_id {
                Some(comment_id) => api::comments::post_reply(&api, comment_id, &text, &mentions).await,
                None => api::comments::post_comment(&api, task_id, &text, &mentions).await,
            };
            match result {
                Ok(comment) => {
                    set_content.set(String::new());
                    if let Some(area) = textarea.get_untracked() {
                        area.set_value("");
                    }
                    accumulator.update(|acc| {
                        acc.drain();
                    });
                    on_posted.run(comment);
                }
                // Unconfirmed, never partially applied: the draft stays
                // in the composer for a retry
                Err(err) => session.error(format!("Could not post comment: {}", err)),
            }
            set_posting.set(false);
        });
    };

    view! {
        <form class="comment-composer" on:submit=post>
            <textarea
                node_ref=textarea
                placeholder="Write a comment... use @ to mention"
                prop:value=move || content.get()
                on:input=on_input
            ></textarea>
            <button type="submit" prop:disabled=move || posting.get()>
                {move || {
                    if posting.get() {
                        "Posting..."
                    } else if parent_id.is_some() {
                        "Reply"
                    } else {
                        "Comment"
                    }
                }}
            </button>
            <PopupShell coordinator=coordinator kind=PopupKind::MentionSuggest title="Mention">
                <ul class="popup-list">
                    <For
                        each=move || suggestions.get()
                        key=|member| member.user_id
                        children=move |member| {
                            let label = format!("{} <{}>", member.name, member.email);
                            view! {
                                <li>
                                    <button
                                        type="button"
                                        class="popup-item"
                                        on:click=move |ev| {
                                            ev.stop_propagation();
                                            pick.run(member.clone());
                                        }
                                    >
                                        {label}
                                    </button>
                                </li>
                            }
                        }
                    />
                </ul>
            </PopupShell>
        </form>
    }
}
