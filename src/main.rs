//! Instipay Admin Client - Main entry point
//!
//! A Dioxus application for the Instipay merchant admin.
//! Supports both web (WASM) and desktop platforms.

#![allow(non_snake_case)]

use dioxus::prelude::*;
use instipay::{api::ApiProvider, auth_session::AuthProvider, routes::Route, theme};

// Assets
const MAIN_CSS: Asset = asset!("/assets/styling/main.css");

fn main() {
    // Initialize tracing for desktop
    #[cfg(not(target_arch = "wasm32"))]
    {
        use tracing_subscriber::EnvFilter;
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("instipay=debug")),
            )
            .init();
    }

    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    // Restore the persisted theme before the first paint.
    use_hook(theme::load);

    rsx! {
        document::Link { rel: "stylesheet", href: MAIN_CSS }

        AuthProvider {
            ApiProvider {
                Router::<Route> {}
            }
        }
    }
}
