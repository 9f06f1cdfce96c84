//! Current logged-in operator
//!
//! The session is owned by whoever composes the application and passed to the
//! operations that need it. Listeners are told about every change of the
//! current operator, including log-out.

use crate::app::models::Operator;
use std::fmt;
use tracing::debug;

/// Handle returned by [`Session::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn Fn(Option<&Operator>)>;

#[derive(Default)]
pub struct Session {
    current: Option<Operator>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener called with the new operator after each change
    pub fn subscribe(&mut self, listener: impl Fn(Option<&Operator>) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener; returns false if it was not registered
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// Replace the current operator, notifying listeners only if it changed
    pub fn set_current(&mut self, operator: Option<Operator>) {
        if self.current == operator {
            return;
        }

        debug!(
            "Session operator changed to {}",
            operator.as_ref().map_or("none", |op| op.username())
        );
        self.current = operator;
        for (_, listener) in &self.listeners {
            listener(self.current.as_ref());
        }
    }

    pub fn log_out(&mut self) {
        self.set_current(None);
    }

    pub fn is_logged_in(&self) -> bool {
        self.current.is_some()
    }

    pub fn current(&self) -> Option<&Operator> {
        self.current.as_ref()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("current", &self.current)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
