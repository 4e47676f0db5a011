//! Realtime Channel
//!
//! One receive-only WebSocket per session, carrying push notifications.
//! The socket reconnects on loss with capped exponential backoff and
//! jitter until the retry budget runs out or the owner calls `close()`.
//! Messages are dispatched to subscribers in network-arrival order; there
//! is no gap detection, the REST panel load is the backstop for events
//! missed while the socket was down.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use leptos::prelude::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{CloseEvent, MessageEvent, WebSocket};

use crate::models::Notification;

/// First retry fires after this delay; later ones double it
pub const BASE_RECONNECT_DELAY_MS: u32 = 5_000;
pub const MAX_RECONNECT_DELAY_MS: u32 = 60_000;
pub const MAX_RECONNECT_ATTEMPTS: u32 = 10;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ChannelStatus {
    #[default]
    Idle,
    Connecting,
    Open,
    /// Waiting out the backoff delay before attempt `attempt`
    Waiting {
        attempt: u32,
    },
    /// Retry budget exhausted; the owner surfaces this to the user
    GaveUp,
    Closed,
}

/// What a socket loss should lead to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReconnectDecision {
    Stop,
    GiveUp,
    Retry { attempt: u32 },
}

pub fn next_reconnect(attempts_so_far: u32, closed: bool) -> ReconnectDecision {
    if closed {
        ReconnectDecision::Stop
    } else if attempts_so_far >= MAX_RECONNECT_ATTEMPTS {
        ReconnectDecision::GiveUp
    } else {
        ReconnectDecision::Retry { attempt: attempts_so_far }
    }
}

/// Backoff schedule: base delay doubling per attempt, capped, then scaled
/// into `[cap/2, cap]` by `jitter` (a uniform sample in `[0, 1)`).
pub fn reconnect_delay_ms(attempt: u32, jitter: f64) -> u32 {
    let capped = BASE_RECONNECT_DELAY_MS
        .saturating_mul(1u32 << attempt.min(5))
        .min(MAX_RECONNECT_DELAY_MS);
    let half = capped / 2;
    half + (half as f64 * jitter.clamp(0.0, 1.0)) as u32
}

/// Parse one inbound frame. Payloads must be JSON objects carrying at
/// least `message`; anything else is dropped by the caller.
pub fn parse_push(text: &str) -> Option<Notification> {
    let value: serde_json::Value = serde_json::from_str(text).ok()?;
    let message = value.get("message")?.as_str()?.to_string();
    Some(match serde_json::from_value::<Notification>(value.clone()) {
        Ok(n) => n,
        // Minimal payload: keep the message, default the rest
        Err(_) => Notification { id: 0, message, read: false, created_at: None },
    })
}

type Subscriber = Box<dyn Fn(&Notification)>;

struct Inner {
    url: String,
    status: RwSignal<ChannelStatus>,
    socket: RefCell<Option<WebSocket>>,
    reconnect: RefCell<Option<Timeout>>,
    attempts: Cell<u32>,
    closed: Cell<bool>,
    subscribers: RefCell<Vec<Subscriber>>,
    // Keep the JS callbacks alive for the socket's lifetime
    on_open: RefCell<Option<Closure<dyn FnMut(web_sys::Event)>>>,
    on_message: RefCell<Option<Closure<dyn FnMut(MessageEvent)>>>,
    on_close: RefCell<Option<Closure<dyn FnMut(CloseEvent)>>>,
    on_error: RefCell<Option<Closure<dyn FnMut(web_sys::Event)>>>,
}

/// Push connection handle. Clone freely; all clones share one socket.
#[derive(Clone)]
pub struct RealtimeChannel {
    inner: Rc<Inner>,
}

impl RealtimeChannel {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            inner: Rc::new(Inner {
                url: url.into(),
                status: RwSignal::new(ChannelStatus::Idle),
                socket: RefCell::new(None),
                reconnect: RefCell::new(None),
                attempts: Cell::new(0),
                closed: Cell::new(false),
                subscribers: RefCell::new(Vec::new()),
                on_open: RefCell::new(None),
                on_message: RefCell::new(None),
                on_close: RefCell::new(None),
                on_error: RefCell::new(None),
            }),
        }
    }

    pub fn status(&self) -> RwSignal<ChannelStatus> {
        self.inner.status
    }

    pub fn subscribe(&self, subscriber: impl Fn(&Notification) + 'static) {
        self.inner.subscribers.borrow_mut().push(Box::new(subscriber));
    }

    pub fn connect(&self) {
        Inner::connect(&self.inner);
    }

    /// Cancellation primitive: closes the socket and stops the reconnect
    /// loop for good.
    pub fn close(&self) {
        let inner = &self.inner;
        inner.closed.set(true);
        // Dropping a pending Timeout cancels it
        inner.reconnect.borrow_mut().take();
        if let Some(socket) = inner.socket.borrow_mut().take() {
            detach_handlers(&socket);
            let _ = socket.close();
        }
        inner.status.set(ChannelStatus::Closed);
    }
}

fn detach_handlers(socket: &WebSocket) {
    socket.set_onopen(None);
    socket.set_onmessage(None);
    socket.set_onclose(None);
    socket.set_onerror(None);
}

impl Inner {
    fn connect(inner: &Rc<Self>) {
        if inner.closed.get() {
            return;
        }
        // Duplicate-socket guard: one connect in flight per channel
        if matches!(
            inner.status.get_untracked(),
            ChannelStatus::Connecting | ChannelStatus::Open
        ) {
            return;
        }
        // Drop any stale handle before opening a new one
        if let Some(old) = inner.socket.borrow_mut().take() {
            detach_handlers(&old);
            let _ = old.close();
        }
        inner.status.set(ChannelStatus::Connecting);

        let socket = match WebSocket::new(&inner.url) {
            Ok(socket) => socket,
            Err(_) => {
                log::warn!("notification socket failed to open: {}", inner.url);
                inner.status.set(ChannelStatus::Idle);
                Self::schedule_reconnect(inner);
                return;
            }
        };

        let handle = Rc::clone(inner);
        let on_open = Closure::<dyn FnMut(web_sys::Event)>::new(move |_| {
            handle.attempts.set(0);
            handle.status.set(ChannelStatus::Open);
            log::info!("notification channel open");
        });
        socket.set_onopen(Some(on_open.as_ref().unchecked_ref()));
        *inner.on_open.borrow_mut() = Some(on_open);

        let handle = Rc::clone(inner);
        let on_message = Closure::<dyn FnMut(MessageEvent)>::new(move |ev: MessageEvent| {
            let Some(text) = ev.data().as_string() else {
                return;
            };
            match parse_push(&text) {
                Some(notification) => {
                    for subscriber in handle.subscribers.borrow().iter() {
                        subscriber(&notification);
                    }
                }
                None => log::warn!("dropping malformed push payload: {}", text),
            }
        });
        socket.set_onmessage(Some(on_message.as_ref().unchecked_ref()));
        *inner.on_message.borrow_mut() = Some(on_message);

        let handle = Rc::clone(inner);
        let on_close = Closure::<dyn FnMut(CloseEvent)>::new(move |_| {
            handle.socket.borrow_mut().take();
            // onerror may already have moved the status to Waiting
            if matches!(
                handle.status.get_untracked(),
                ChannelStatus::Connecting | ChannelStatus::Open
            ) {
                handle.status.set(ChannelStatus::Idle);
            }
            Self::schedule_reconnect(&handle);
        });
        socket.set_onclose(Some(on_close.as_ref().unchecked_ref()));
        *inner.on_close.borrow_mut() = Some(on_close);

        let handle = Rc::clone(inner);
        let on_error = Closure::<dyn FnMut(web_sys::Event)>::new(move |_| {
            // onclose follows onerror; the pending-timer guard keeps this
            // at one reconnect per loss
            Self::schedule_reconnect(&handle);
        });
        socket.set_onerror(Some(on_error.as_ref().unchecked_ref()));
        *inner.on_error.borrow_mut() = Some(on_error);

        *inner.socket.borrow_mut() = Some(socket);
    }

    fn schedule_reconnect(inner: &Rc<Self>) {
        if inner.reconnect.borrow().is_some() {
            return;
        }
        match next_reconnect(inner.attempts.get(), inner.closed.get()) {
            ReconnectDecision::Stop => {}
            ReconnectDecision::GiveUp => {
                log::error!(
                    "notification channel gave up after {} attempts",
                    MAX_RECONNECT_ATTEMPTS
                );
                inner.status.set(ChannelStatus::GaveUp);
            }
            ReconnectDecision::Retry { attempt } => {
                inner.attempts.set(attempt + 1);
                let delay = reconnect_delay_ms(attempt, js_sys::Math::random());
                inner.status.set(ChannelStatus::Waiting { attempt: attempt + 1 });
                log::info!("notification channel lost, reconnecting in {} ms", delay);
                let handle = Rc::clone(inner);
                let timeout = Timeout::new(delay, move || {
                    handle.reconnect.borrow_mut().take();
                    Self::connect(&handle);
                });
                *inner.reconnect.borrow_mut() = Some(timeout);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reconnect_decision_sequence() {
        assert_eq!(next_reconnect(0, false), ReconnectDecision::Retry { attempt: 0 });
        assert_eq!(
            next_reconnect(MAX_RECONNECT_ATTEMPTS - 1, false),
            ReconnectDecision::Retry { attempt: MAX_RECONNECT_ATTEMPTS - 1 }
        );
        assert_eq!(next_reconnect(MAX_RECONNECT_ATTEMPTS, false), ReconnectDecision::GiveUp);
    }

    #[test]
    fn test_close_stops_reconnects() {
        assert_eq!(next_reconnect(0, true), ReconnectDecision::Stop);
        assert_eq!(next_reconnect(MAX_RECONNECT_ATTEMPTS + 5, true), ReconnectDecision::Stop);
    }

    #[test]
    fn test_backoff_first_attempt_bounds() {
        assert_eq!(reconnect_delay_ms(0, 0.0), BASE_RECONNECT_DELAY_MS / 2);
        assert_eq!(reconnect_delay_ms(0, 1.0), BASE_RECONNECT_DELAY_MS);
    }

    #[test]
    fn test_backoff_caps_with_jitter_range() {
        for attempt in 0..20 {
            for jitter in [0.0, 0.3, 0.99] {
                let delay = reconnect_delay_ms(attempt, jitter);
                assert!(delay <= MAX_RECONNECT_DELAY_MS);
                assert!(delay >= BASE_RECONNECT_DELAY_MS / 2);
            }
        }
        // Deep attempts sit in the top band
        assert!(reconnect_delay_ms(12, 0.0) >= MAX_RECONNECT_DELAY_MS / 2);
    }

    #[test]
    fn test_parse_push_full_payload() {
        let n = parse_push(r#"{"id": 4, "message": "Ana mentioned you", "read": false}"#).unwrap();
        assert_eq!(n.id, 4);
        assert_eq!(n.message, "Ana mentioned you");
        assert!(!n.read);
    }

    #[test]
    fn test_parse_push_message_only() {
        let n = parse_push(r#"{"message": "card moved"}"#).unwrap();
        assert_eq!(n.id, 0);
        assert_eq!(n.message, "card moved");
        assert!(!n.read);
    }

    #[test]
    fn test_parse_push_rejects_malformed() {
        assert!(parse_push("not json").is_none());
        assert!(parse_push(r#"{"event": "no message field"}"#).is_none());
        assert!(parse_push(r#"{"message": 7}"#).is_none());
    }
}
