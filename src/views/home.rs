use dioxus::prelude::*;

use crate::auth_session::{AuthContext, SessionState};
use crate::Route;

/// Landing page: waits for rehydration, then forwards to the users list or
/// the login screen.
#[component]
pub fn Home() -> Element {
    let auth = use_context::<AuthContext>();
    let nav = use_navigator();

    use_effect(move || {
        let store = auth.store.read();
        match store.state() {
            SessionState::Unknown => {}
            SessionState::Authenticated(_) => {
                nav.replace(Route::Users {});
            }
            SessionState::Anonymous => {
                nav.replace(Route::Login {});
            }
        }
    });

    rsx! {
        div { class: "flex items-center justify-center min-h-screen text-gray-500",
            "Loading…"
        }
    }
}
