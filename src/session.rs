//! Session Context
//!
//! One explicit session object per mounted app, provided via the Leptos
//! Context API: API endpoint, project and user identity, and the
//! transient toast slot. Components receive it from context instead of
//! reaching for module-level globals, so two boards (or tests) can run
//! independently.

use gloo_timers::callback::Timeout;
use leptos::prelude::*;

use crate::api::Api;

/// How long an error toast stays visible
const TOAST_DURATION_MS: u32 = 4_000;

#[derive(Clone, Copy)]
pub struct Session {
    api: StoredValue<Api>,
    pub project_id: u64,
    pub user_id: u64,
    toast: RwSignal<Option<String>>,
}

impl Session {
    pub fn new(api: Api, project_id: u64, user_id: u64) -> Self {
        Self {
            api: StoredValue::new(api),
            project_id,
            user_id,
            toast: RwSignal::new(None),
        }
    }

    /// Build the session from the page URL: `?project=`, `?user=` and an
    /// optional `?api=` base override.
    pub fn bootstrap() -> Self {
        let mut project_id = 1;
        let mut user_id = 1;
        let mut base = String::new();

        if let Some(window) = web_sys::window() {
            if let Ok(search) = window.location().search() {
                if let Ok(params) = web_sys::UrlSearchParams::new_with_str(&search) {
                    if let Some(id) = params.get("project").and_then(|v| v.parse().ok()) {
                        project_id = id;
                    }
                    if let Some(id) = params.get("user").and_then(|v| v.parse().ok()) {
                        user_id = id;
                    }
                    if let Some(api) = params.get("api") {
                        base = api;
                    }
                }
            }
        }
        Self::new(Api::new(base), project_id, user_id)
    }

    pub fn api(&self) -> Api {
        self.api.get_value()
    }

    pub fn toast(&self) -> RwSignal<Option<String>> {
        self.toast
    }

    /// Log a failure and surface it as a transient toast
    pub fn error(&self, message: impl Into<String>) {
        let message = message.into();
        log::warn!("{}", message);
        self.toast.set(Some(message));
        let toast = self.toast;
        Timeout::new(TOAST_DURATION_MS, move || toast.set(None)).forget();
    }

    /// Push endpoint for this user, scheme derived from the page
    pub fn notifications_ws_url(&self) -> String {
        let (scheme, host) = match web_sys::window().map(|w| w.location()) {
            Some(location) => {
                let protocol = location.protocol().unwrap_or_else(|_| "http:".into());
                let scheme = if protocol == "https:" { "wss" } else { "ws" };
                (scheme, location.host().unwrap_or_default())
            }
            None => ("ws", String::new()),
        };
        format!("{}://{}/ws/notifications/{}", scheme, host, self.user_id)
    }
}

/// Get the session from context
pub fn use_session() -> Session {
    expect_context::<Session>()
}
