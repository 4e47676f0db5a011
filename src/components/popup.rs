//! Popup Coordinator
//!
//! Shared open/close/position contract for every floating panel. One
//! coordinator owns one UI region; opening a popup hides whichever
//! sibling was open in that region. Popups close on their close button,
//! a click outside, or Escape.

use leptos::prelude::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::MouseEvent;

/// Floating panel identities within a region
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PopupKind {
    Members,
    Labels,
    Dates,
    Attachments,
    MentionSuggest,
    Notifications,
}

/// Top-left placement of a popup in viewport coordinates
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PopupAnchor {
    pub x: f64,
    pub y: f64,
}

impl PopupAnchor {
    /// Anchor under the trigger element's bounding rectangle
    pub fn below(ev: &MouseEvent) -> Self {
        let target = ev.current_target().or_else(|| ev.target());
        if let Some(element) = target.and_then(|t| t.dyn_into::<web_sys::Element>().ok()) {
            let rect = element.get_bounding_client_rect();
            return Self { x: rect.left(), y: rect.bottom() + 4.0 };
        }
        Self::at(ev)
    }

    /// Anchor under an element directly (composer textareas)
    pub fn below_element(element: &web_sys::Element) -> Self {
        let rect = element.get_bounding_client_rect();
        Self { x: rect.left(), y: rect.bottom() + 4.0 }
    }

    /// Anchor at explicit pointer coordinates (context-menu triggers)
    pub fn at(ev: &MouseEvent) -> Self {
        Self {
            x: ev.client_x() as f64,
            y: ev.client_y() as f64,
        }
    }
}

/// Single-open popup state for one UI region.
#[derive(Clone, Copy)]
pub struct PopupCoordinator {
    open: RwSignal<Option<(PopupKind, PopupAnchor)>>,
}

impl PopupCoordinator {
    pub fn new() -> Self {
        let coordinator = Self {
            open: RwSignal::new(None),
        };
        coordinator.bind_global_dismiss();
        coordinator
    }

    /// Replaces any sibling popup of this region
    pub fn open(&self, kind: PopupKind, anchor: PopupAnchor) {
        self.open.set(Some((kind, anchor)));
    }

    pub fn toggle(&self, kind: PopupKind, anchor: PopupAnchor) -> bool {
        if self.is_open_untracked(kind) {
            self.close();
            false
        } else {
            self.open(kind, anchor);
            true
        }
    }

    pub fn close(&self) {
        self.open.set(None);
    }

    pub fn is_open(&self, kind: PopupKind) -> bool {
        matches!(self.open.get(), Some((open, _)) if open == kind)
    }

    pub fn is_open_untracked(&self, kind: PopupKind) -> bool {
        matches!(self.open.get_untracked(), Some((open, _)) if open == kind)
    }

    /// Absolute placement for the open popup
    pub fn anchor_style(&self) -> String {
        match self.open.get() {
            Some((_, anchor)) => format!("left: {}px; top: {}px;", anchor.x, anchor.y),
            None => String::new(),
        }
    }

    /// Click outside and Escape close whatever is open. Clicks inside a
    /// popup (and on triggers) stop propagation and never get here.
    ///
    /// The listeners outlive the owning component; `try_set` makes them
    /// inert once the region's signal is disposed.
    fn bind_global_dismiss(&self) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        let open = self.open;
        let on_click = Closure::<dyn FnMut(MouseEvent)>::new(move |_| {
            let _ = open.try_set(None);
        });
        let on_keydown =
            Closure::<dyn FnMut(web_sys::KeyboardEvent)>::new(move |ev: web_sys::KeyboardEvent| {
                if ev.key() == "Escape" {
                    let _ = open.try_set(None);
                }
            });
        let _ = document.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref());
        let _ =
            document.add_event_listener_with_callback("keydown", on_keydown.as_ref().unchecked_ref());
        on_click.forget();
        on_keydown.forget();
    }
}

impl Default for PopupCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

/// Positioned popup chrome: title bar, close button, children
#[component]
pub fn PopupShell(
    coordinator: PopupCoordinator,
    kind: PopupKind,
    #[prop(into)] title: String,
    children: ChildrenFn,
) -> impl IntoView {
    view! {
        <Show when=move || coordinator.is_open(kind)>
            <div
                class="popup"
                style=move || coordinator.anchor_style()
                on:click=move |ev| ev.stop_propagation()
            >
                <div class="popup-header">
                    <span class="popup-title">{title.clone()}</span>
                    <button type="button" class="popup-close" on:click=move |_| coordinator.close()>
                        "×"
                    </button>
                </div>
                <div class="popup-body">{children()}</div>
            </div>
        </Show>
    }
}
