//! Mention Text Component
//!
//! Renders comment text with mention tokens wrapped in highlights. User
//! mentions link to the member profile; the reserved tokens stay plain
//! highlights.

use leptos::prelude::*;

use crate::mentions::{highlight, Segment};
use crate::models::{Mention, MentionKind};

#[component]
pub fn MentionText(content: String, mentions: Vec<Mention>) -> impl IntoView {
    highlight(&content, &mentions)
        .into_iter()
        .map(|segment| match segment {
            Segment::Plain(text) => view! { <span>{text}</span> }.into_any(),
            Segment::Highlight { text, mention } => match mention.kind {
                MentionKind::User => view! {
                    <a
                        class="mention"
                        href=format!("#/profile/{}", mention.email)
                        title=mention.name.clone()
                    >
                        {text}
                    </a>
                }
                .into_any(),
                MentionKind::Special => view! { <span class="mention special">{text}</span> }.into_any(),
            },
        })
        .collect_view()
}
