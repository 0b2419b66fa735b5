// ── Session store ──
//
// Holds the signed-in principal. Written only by the identity bridge
// and the auth service; read by everything else.

use std::sync::Arc;

use crate::model::UserIdentity;
use crate::stream::StoreStream;

use super::slice::Slice;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub identity: Option<UserIdentity>,
    /// True until the identity provider has reported for the first time.
    pub auth_check_pending: bool,
    pub last_error: Option<String>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            identity: None,
            auth_check_pending: true,
            last_error: None,
        }
    }
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    SetSession(UserIdentity),
    ClearSession,
    SetAuthCheckPending(bool),
    SetError(Option<String>),
}

/// Pure session transition.
pub fn reduce(state: &SessionState, action: SessionAction) -> SessionState {
    match action {
        SessionAction::SetSession(identity) => SessionState {
            identity: Some(identity),
            auth_check_pending: false,
            last_error: None,
        },
        SessionAction::ClearSession => SessionState {
            identity: None,
            auth_check_pending: false,
            last_error: None,
        },
        SessionAction::SetAuthCheckPending(pending) => SessionState {
            auth_check_pending: pending,
            ..state.clone()
        },
        SessionAction::SetError(last_error) => SessionState {
            last_error,
            ..state.clone()
        },
    }
}

/// Reactive session store.
pub struct SessionStore {
    slice: Slice<SessionState>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            slice: Slice::new(SessionState::default()),
        }
    }

    pub fn dispatch(&self, action: SessionAction) -> bool {
        self.slice.apply(|state| reduce(state, action))
    }

    /// Replace the identity wholesale. Clears the pending flag and any error.
    pub fn set_session(&self, identity: UserIdentity) {
        self.dispatch(SessionAction::SetSession(identity));
    }

    pub fn clear_session(&self) {
        self.dispatch(SessionAction::ClearSession);
    }

    pub fn set_auth_check_pending(&self, pending: bool) {
        self.dispatch(SessionAction::SetAuthCheckPending(pending));
    }

    pub fn set_session_error(&self, message: impl Into<String>) {
        self.dispatch(SessionAction::SetError(Some(message.into())));
    }

    pub fn clear_session_error(&self) {
        self.dispatch(SessionAction::SetError(None));
    }

    // ── Reads ────────────────────────────────────────────────────────

    pub fn snapshot(&self) -> Arc<SessionState> {
        self.slice.snapshot()
    }

    pub fn subscribe(&self) -> StoreStream<SessionState> {
        self.slice.subscribe()
    }

    pub fn is_authenticated(&self) -> bool {
        self.snapshot().is_authenticated()
    }

    pub fn identity(&self) -> Option<UserIdentity> {
        self.snapshot().identity.clone()
    }
}
