//! Cross-tab login/logout propagation.
//!
//! Browser tabs sharing one persisted session keep each other consistent
//! over a named `BroadcastChannel`. Delivery is fire-and-forget: no acks,
//! no ordering across senders. Receivers apply messages in arrival order,
//! so the session reflects the most recently applied message. Applying a
//! message that matches the current session is a harmless no-op on the
//! fields; the navigation side effect may still fire.
//!
//! Native builds have a single execution context; the transport half is a
//! no-op collaborator there and only the message/apply logic is shared.

use dioxus::prelude::*;
use serde::{Deserialize, Serialize};

use crate::auth_session::{Session, SessionState};

/// Shared channel name; all contexts on the same origin subscribe to it.
pub const CHANNEL_NAME: &str = "auth-sync";

/// Wire envelope: `{type: "LOGIN", payload: {...}}` or `{type: "LOGOUT"}`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum SyncMessage {
    #[serde(rename = "LOGIN")]
    Login { payload: Session },
    #[serde(rename = "LOGOUT")]
    Logout,
}

/// Where a context navigates after applying a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavTarget {
    Users,
    Login,
}

/// Compute the state transition for a received message.
///
/// The current state never vetoes a message: last applied wins, even when a
/// LOGOUT overtakes a LOGIN from the same rapid sequence.
pub fn apply_message(_current: &SessionState, message: &SyncMessage) -> (SessionState, NavTarget) {
    match message {
        SyncMessage::Login { payload } => (
            SessionState::Authenticated(payload.clone()),
            NavTarget::Users,
        ),
        SyncMessage::Logout => (SessionState::Anonymous, NavTarget::Login),
    }
}

/// Announce a successful local login to all other contexts.
pub fn broadcast_login(session: &Session) {
    broadcast(&SyncMessage::Login {
        payload: session.clone(),
    });
}

/// Announce a local logout to all other contexts.
pub fn broadcast_logout() {
    broadcast(&SyncMessage::Logout);
}

#[cfg(target_arch = "wasm32")]
fn broadcast(message: &SyncMessage) {
    use web_sys::BroadcastChannel;

    let Ok(json) = serde_json::to_string(message) else {
        return;
    };
    if let Ok(channel) = BroadcastChannel::new(CHANNEL_NAME) {
        if channel
            .post_message(&wasm_bindgen::JsValue::from_str(&json))
            .is_err()
        {
            crate::log_warn!("auth-sync broadcast failed");
        }
        channel.close();
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn broadcast(_message: &SyncMessage) {}

/// Subscribe this context to the sync channel. Must run under the router,
/// because applying a message navigates.
///
/// Browsers do not deliver a BroadcastChannel message back to its sender;
/// if a platform ever does, applying our own message is idempotent and the
/// navigation lands where the local action already went.
pub fn use_auth_sync() {
    #[cfg(target_arch = "wasm32")]
    {
        use wasm_bindgen::closure::Closure;
        use wasm_bindgen::JsCast;
        use web_sys::{BroadcastChannel, MessageEvent};

        let mut auth = use_context::<crate::auth_session::AuthContext>();
        let nav = use_navigator();

        use_hook(move || {
            let Ok(channel) = BroadcastChannel::new(CHANNEL_NAME) else {
                crate::log_warn!("auth-sync channel unavailable");
                return;
            };
            let onmessage = Closure::wrap(Box::new(move |event: MessageEvent| {
                let Some(text) = event.data().as_string() else {
                    return;
                };
                let Ok(message) = serde_json::from_str::<SyncMessage>(&text) else {
                    crate::log_warn!("unrecognized auth-sync message: {text}");
                    return;
                };
                let current = auth.store.peek().state().clone();
                let (next, target) = apply_message(&current, &message);
                auth.apply_remote(next);
                match target {
                    NavTarget::Users => {
                        nav.replace(crate::routes::Route::Users {});
                    }
                    NavTarget::Login => {
                        nav.replace(crate::routes::Route::Login {});
                    }
                }
            }) as Box<dyn FnMut(MessageEvent)>);
            channel.set_onmessage(Some(onmessage.as_ref().unchecked_ref()));
            // Channel and handler live for the lifetime of the tab.
            onmessage.forget();
            std::mem::forget(channel);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AdminUser, InstituteDetails};

    fn session(name: &str, token: &str) -> Session {
        Session {
            user: AdminUser {
                name: name.to_string(),
                email: "a@x.com".to_string(),
                mobile: "1".to_string(),
                status: "active".to_string(),
                institute: InstituteDetails::default(),
            },
            token: token.to_string(),
        }
    }

    #[test]
    fn envelope_matches_the_wire_format() {
        let json = serde_json::to_value(&SyncMessage::Logout).unwrap();
        assert_eq!(json, serde_json::json!({"type": "LOGOUT"}));

        let login = serde_json::to_value(&SyncMessage::Login {
            payload: session("A", "tok123"),
        })
        .unwrap();
        assert_eq!(login["type"], "LOGIN");
        assert_eq!(login["payload"]["token"], "tok123");
        assert_eq!(login["payload"]["user"]["name"], "A");
    }

    #[test]
    fn logout_converges_regardless_of_receiver_state() {
        for current in [
            SessionState::Unknown,
            SessionState::Anonymous,
            SessionState::Authenticated(session("B", "other")),
        ] {
            let (next, target) = apply_message(&current, &SyncMessage::Logout);
            assert_eq!(next, SessionState::Anonymous);
            assert_eq!(target, NavTarget::Login);
        }
    }

    #[test]
    fn login_overwrites_and_navigates_to_users() {
        let incoming = session("A", "tok123");
        let (next, target) = apply_message(
            &SessionState::Authenticated(session("B", "stale")),
            &SyncMessage::Login {
                payload: incoming.clone(),
            },
        );
        assert_eq!(next, SessionState::Authenticated(incoming));
        assert_eq!(target, NavTarget::Users);
    }

    #[test]
    fn reapplying_the_current_session_is_idempotent() {
        let current = SessionState::Authenticated(session("A", "tok123"));
        let (next, _) = apply_message(
            &current,
            &SyncMessage::Login {
                payload: session("A", "tok123"),
            },
        );
        assert_eq!(next, current);
    }

    #[test]
    fn last_applied_message_wins() {
        let mut state = SessionState::Anonymous;
        // LOGOUT arrives after the LOGIN it was sent before.
        for message in [
            SyncMessage::Login {
                payload: session("A", "tok123"),
            },
            SyncMessage::Logout,
        ] {
            state = apply_message(&state, &message).0;
        }
        assert_eq!(state, SessionState::Anonymous);
    }
}
