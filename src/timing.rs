//! Debounce + Request Tokens
//!
//! Shared timing primitives: the 300 ms debounce used by every search
//! input and the description save, and monotonic request tokens that let
//! a completion detect it has been superseded.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use gloo_timers::callback::Timeout;

/// Debounce window for search inputs and mention lookup
pub const SEARCH_DEBOUNCE_MS: u32 = 300;

/// Trailing-edge debouncer; each `run` cancels the pending callback.
#[derive(Clone)]
pub struct Debouncer {
    delay_ms: u32,
    pending: Rc<RefCell<Option<Timeout>>>,
}

impl Debouncer {
    pub fn new(delay_ms: u32) -> Self {
        Self {
            delay_ms,
            pending: Rc::new(RefCell::new(None)),
        }
    }

    pub fn run(&self, callback: impl FnOnce() + 'static) {
        let pending = Rc::clone(&self.pending);
        let timeout = Timeout::new(self.delay_ms, move || {
            pending.borrow_mut().take();
            callback();
        });
        // Replacing the stored handle drops (and thereby cancels) the
        // previous timeout
        *self.pending.borrow_mut() = Some(timeout);
    }

    pub fn cancel(&self) {
        self.pending.borrow_mut().take();
    }
}

/// Token for one issued request of a logical operation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RequestToken(u64);

/// Monotonic token source, one per logical operation (member search,
/// label search, description save). Responses whose token is no longer
/// current are discarded instead of overwriting newer state.
#[derive(Clone, Default)]
pub struct TokenIssuer {
    current: Arc<AtomicU64>,
}

impl TokenIssuer {
    pub fn issue(&self) -> RequestToken {
        RequestToken(self.current.fetch_add(1, Ordering::Relaxed) + 1)
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        self.current.load(Ordering::Relaxed) == token.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_token_wins() {
        let issuer = TokenIssuer::default();
        let first = issuer.issue();
        assert!(issuer.is_current(first));

        let second = issuer.issue();
        assert!(!issuer.is_current(first));
        assert!(issuer.is_current(second));
    }

    #[test]
    fn test_clones_share_state() {
        let issuer = TokenIssuer::default();
        let other = issuer.clone();
        let token = issuer.issue();
        assert!(other.is_current(token));
        other.issue();
        assert!(!issuer.is_current(token));
    }
}
