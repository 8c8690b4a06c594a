//! Outer layouts: themed shell with the auth-sync listener, and the
//! authenticated-area guard with the top navigation bar.

use dioxus::prelude::*;

use crate::auth_session::AuthContext;
use crate::auth_sync::use_auth_sync;
use crate::theme;
use crate::Route;

/// Root layout: subscribes this context to the auth-sync channel and
/// applies the theme background.
#[component]
pub fn AppShell() -> Element {
    use_auth_sync();

    let shell_class = if theme::is_dark() {
        "min-h-screen bg-gray-900 text-white"
    } else {
        "min-h-screen bg-white text-black"
    };

    rsx! {
        div { class: shell_class,
            Outlet::<Route> {}
        }
    }
}

/// Layout for the authenticated area.
///
/// While the session is still rehydrating the guard renders a neutral
/// loading state; it only redirects to the login screen once the store has
/// settled as anonymous.
#[component]
pub fn AuthGuard() -> Element {
    let auth = use_context::<AuthContext>();
    let nav = use_navigator();

    use_effect(move || {
        let store = auth.store.read();
        if !store.state().is_unknown() && !store.is_authenticated() {
            nav.replace(Route::Login {});
        }
    });

    if auth.is_unknown() {
        return rsx! {
            div { class: "flex items-center justify-center min-h-screen text-gray-500",
                "Loading…"
            }
        };
    }

    if !auth.is_authenticated() {
        // Redirect effect is in flight.
        return rsx! {
            div {}
        };
    }

    rsx! {
        NavBar {}
        Outlet::<Route> {}
    }
}

#[component]
fn NavBar() -> Element {
    let bar_class = if theme::is_dark() {
        "flex flex-row justify-evenly py-4 bg-gray-900 border-b border-gray-700"
    } else {
        "flex flex-row justify-evenly py-4 bg-white border-b border-gray-200"
    };

    rsx! {
        nav { class: bar_class,
            Link { class: "font-semibold", to: Route::Users {}, "Home" }
            Link { class: "font-semibold", to: Route::CreatePost {}, "Post" }
            Link { class: "font-semibold", to: Route::Profile {}, "Profile" }
        }
    }
}
