//! Authentication session management with persisted rehydration.
//!
//! The session (admin profile plus bearer token) lives in a pure
//! [`SessionStore`] state machine wrapped in a signal, provided to the app
//! by [`AuthProvider`]. The store starts `Unknown` and only settles after
//! rehydration from durable storage, so consumers never mistake
//! "not loaded yet" for "logged out".

use dioxus::prelude::*;
use serde::{Deserialize, Serialize};

use crate::api_client::ApiClient;
use crate::endpoints::{admin_api_base, PUBLIC_API_BASE};
use crate::models::AdminUser;
use crate::storage;

/// Durable storage key for the serialized session.
pub const AUTH_STORAGE_KEY: &str = "auth";

/// The authenticated admin plus bearer token. Both travel as one record,
/// so one is never persisted or observed without the other.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub user: AdminUser,
    pub token: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum SessionState {
    /// Rehydration has not completed; treat as "not yet known", never as
    /// logged out.
    #[default]
    Unknown,
    Anonymous,
    Authenticated(Session),
}

impl SessionState {
    pub fn is_unknown(&self) -> bool {
        matches!(self, SessionState::Unknown)
    }

    pub fn session(&self) -> Option<&Session> {
        match self {
            SessionState::Authenticated(session) => Some(session),
            _ => None,
        }
    }
}

/// Pure session state machine; `AuthContext` wraps it in a signal.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionStore {
    state: SessionState,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Settle the store from persisted state. Only the first call after
    /// startup has an effect; later logins/logouts are not clobbered by a
    /// straggling rehydrate.
    pub fn rehydrate(&mut self, persisted: Option<Session>) {
        if self.state.is_unknown() {
            self.state = match persisted {
                Some(session) => SessionState::Authenticated(session),
                None => SessionState::Anonymous,
            };
        }
    }

    pub fn set_session(&mut self, session: Session) {
        self.state = SessionState::Authenticated(session);
    }

    pub fn clear(&mut self) {
        self.state = SessionState::Anonymous;
    }

    /// Overwrite with a state received from another context.
    pub fn apply(&mut self, state: SessionState) {
        self.state = state;
    }

    pub fn token(&self) -> Option<&str> {
        self.state.session().map(|s| s.token.as_str())
    }

    pub fn user(&self) -> Option<&AdminUser> {
        self.state.session().map(|s| &s.user)
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.session().is_some()
    }
}

/// Authentication context provided to the app
#[derive(Clone, Copy, Debug)]
pub struct AuthContext {
    pub store: Signal<SessionStore>,
}

/// Provider component that sets up auth context
#[component]
pub fn AuthProvider(children: Element) -> Element {
    let mut store = use_signal(SessionStore::new);

    // Rehydrate once, after the first render. Until this runs every
    // consumer observes `Unknown`, so no view redirects on a session that
    // simply has not loaded yet.
    use_effect(move || {
        if store.peek().state().is_unknown() {
            let persisted = storage::load::<Session>(AUTH_STORAGE_KEY);
            crate::log_info!(
                "session rehydrated: {}",
                if persisted.is_some() { "authenticated" } else { "anonymous" }
            );
            store.write().rehydrate(persisted);
        }
    });

    // Persist every settled state change.
    use_effect(move || match store.read().state() {
        SessionState::Unknown => {}
        SessionState::Anonymous => storage::remove(AUTH_STORAGE_KEY),
        SessionState::Authenticated(session) => {
            if !storage::save(AUTH_STORAGE_KEY, session) {
                crate::log_warn!("failed to persist session");
            }
        }
    });

    use_context_provider(|| AuthContext { store });

    children
}

impl AuthContext {
    /// Record a successful local login and announce it to other contexts.
    pub fn login(&mut self, session: Session) {
        self.store.write().set_session(session.clone());
        crate::auth_sync::broadcast_login(&session);
    }

    /// Clear the local session and announce the logout.
    pub fn logout(&mut self) {
        self.store.write().clear();
        crate::auth_sync::broadcast_logout();
    }

    /// Apply a state received over the sync channel without re-broadcasting.
    pub fn apply_remote(&mut self, state: SessionState) {
        self.store.write().apply(state);
    }

    pub fn is_authenticated(&self) -> bool {
        self.store.read().is_authenticated()
    }

    pub fn is_unknown(&self) -> bool {
        self.store.read().state().is_unknown()
    }

    pub fn user(&self) -> Option<AdminUser> {
        self.store.read().user().cloned()
    }

    pub fn token(&self) -> Option<String> {
        self.store.read().token().map(str::to_string)
    }

    /// Client for the admin API. Reads the bearer token at call time, so a
    /// token rotation takes effect on the very next request.
    pub fn admin_client(&self) -> ApiClient {
        ApiClient::new()
            .with_base_url(admin_api_base())
            .with_bearer(self.token())
    }

    /// Client for the public directory API (no authentication).
    pub fn public_client(&self) -> ApiClient {
        ApiClient::new().with_base_url(PUBLIC_API_BASE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::InstituteDetails;

    fn session(token: &str) -> Session {
        Session {
            user: AdminUser {
                name: "A".to_string(),
                email: "a@x.com".to_string(),
                mobile: "1".to_string(),
                status: "active".to_string(),
                institute: InstituteDetails::default(),
            },
            token: token.to_string(),
        }
    }

    #[test]
    fn user_and_token_are_set_and_cleared_together() {
        let mut store = SessionStore::new();
        store.rehydrate(None);
        assert!(store.user().is_none() && store.token().is_none());

        store.set_session(session("tok123"));
        assert!(store.user().is_some() && store.token().is_some());

        store.clear();
        assert!(store.user().is_none() && store.token().is_none());
    }

    #[test]
    fn state_is_unknown_until_rehydrated() {
        let mut store = SessionStore::new();
        assert!(store.state().is_unknown());
        assert!(!store.is_authenticated());

        store.rehydrate(Some(session("tok123")));
        assert_eq!(store.token(), Some("tok123"));
    }

    #[test]
    fn late_rehydrate_does_not_clobber_a_settled_state() {
        let mut store = SessionStore::new();
        store.rehydrate(None);
        store.set_session(session("fresh"));

        store.rehydrate(Some(session("persisted")));
        assert_eq!(store.token(), Some("fresh"));
    }

    #[test]
    fn session_round_trips_through_serde() {
        let original = session("tok123");
        let json = serde_json::to_string(&original).unwrap();
        let restored: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, original);
    }
}
