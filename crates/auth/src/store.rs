//! Shared session context.
//!
//! The store replaces ad hoc global auth state (a token in browser storage, logout
//! broadcast over untyped window events) with an explicit handle that is cloned into
//! every service client, plus a typed subscription for auth-state transitions.

use std::sync::{Arc, Mutex, RwLock, Weak};

use log::warn;

use crate::session::Session;

/// A change in authentication state, broadcast to subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStateChange {
    SignedIn,
    SignedOut,
    UserUpdated,
}

type Listener = Arc<dyn Fn(AuthStateChange) + Send + Sync + 'static>;

struct Listeners {
    next_id: u64,
    entries: Vec<(u64, Listener)>,
}

/// Shared session state, passed by handle to every service client.
///
/// Cloning is cheap and every clone observes the same session.
#[derive(Clone)]
pub struct SessionStore {
    session: Arc<RwLock<Option<Session>>>,
    listeners: Arc<Mutex<Listeners>>,
    clear_on_unauthorized: bool,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            session: Arc::new(RwLock::new(None)),
            listeners: Arc::new(Mutex::new(Listeners {
                next_id: 0,
                entries: Vec::new(),
            })),
            clear_on_unauthorized: true,
        }
    }

    /// Set whether a 401 from any service clears the session (on by default).
    pub fn with_clear_on_unauthorized(mut self, value: bool) -> Self {
        self.clear_on_unauthorized = value;
        self
    }

    /// The current session, if one is held.
    pub fn get(&self) -> Option<Session> {
        let guard = self.session.read().unwrap();
        guard.clone()
    }

    /// The current bearer token, if a session is held.
    pub fn access_token(&self) -> Option<String> {
        let guard = self.session.read().unwrap();
        guard.as_ref().map(|session| session.access_token.clone())
    }

    /// Store a session and broadcast `SignedIn`.
    pub fn set(&self, session: Session) {
        {
            let mut guard = self.session.write().unwrap();
            *guard = Some(session);
        }
        self.emit(AuthStateChange::SignedIn);
    }

    /// Drop the session. Broadcasts `SignedOut` only if a session was held.
    pub fn clear(&self) {
        let had_session = {
            let mut guard = self.session.write().unwrap();
            guard.take().is_some()
        };
        if had_session {
            self.emit(AuthStateChange::SignedOut);
        }
    }

    /// React to a 401 from the backend: the token is no longer usable, so the
    /// session is dropped and subscribers observe `SignedOut`.
    pub fn invalidate(&self) {
        if !self.clear_on_unauthorized {
            return;
        }
        if self.get().is_some() {
            warn!("request rejected with 401, dropping session");
        }
        self.clear();
    }

    /// Subscribe to auth-state changes. The subscription stays active until
    /// [`AuthSubscription::unsubscribe`] is called.
    pub fn on_auth_state_change<F>(&self, callback: F) -> AuthSubscription
    where
        F: Fn(AuthStateChange) + Send + Sync + 'static,
    {
        let mut guard = self.listeners.lock().unwrap();
        let id = guard.next_id;
        guard.next_id += 1;
        guard.entries.push((id, Arc::new(callback)));

        AuthSubscription {
            id,
            listeners: Arc::downgrade(&self.listeners),
        }
    }

    pub(crate) fn emit(&self, change: AuthStateChange) {
        // Snapshot the callbacks so none of them runs under the lock.
        let snapshot: Vec<Listener> = {
            let guard = self.listeners.lock().unwrap();
            guard
                .entries
                .iter()
                .map(|(_, listener)| Arc::clone(listener))
                .collect()
        };
        for listener in snapshot {
            listener(change);
        }
    }
}

/// Handle for a registered auth-state callback.
pub struct AuthSubscription {
    id: u64,
    listeners: Weak<Mutex<Listeners>>,
}

impl AuthSubscription {
    /// Remove the callback. Dropping the handle without calling this leaves the
    /// callback registered for the lifetime of the store.
    pub fn unsubscribe(self) {
        if let Some(listeners) = self.listeners.upgrade() {
            let mut guard = listeners.lock().unwrap();
            guard.entries.retain(|(id, _)| *id != self.id);
        }
    }
}
