//! Toast Region
//!
//! Transient error messages surfaced by failed mutations.

use leptos::prelude::*;

use crate::session::use_session;

#[component]
pub fn ToastRegion() -> impl IntoView {
    let session = use_session();
    view! {
        <div class="toast-region">
            {move || session.toast().get().map(|message| view! {
                <div class="toast error">{message}</div>
            })}
        </div>
    }
}
