use dioxus::prelude::*;

use crate::api;
use crate::auth_session::AuthContext;
use crate::components::ui::{Button, ButtonVariant, InputType, TextInput};
use crate::error::login_error_message;
use crate::models::LoginRequest;
use crate::Route;

#[component]
pub fn Login() -> Element {
    let mut auth = use_context::<AuthContext>();
    let mut username = use_signal(|| "demo001".to_string());
    let mut password = use_signal(|| "12345678".to_string());
    let mut show_password = use_signal(|| false);
    let mut error = use_signal(|| None::<String>);
    let mut is_submitting = use_signal(|| false);
    let nav = use_navigator();

    // Already signed in, here or in another tab: skip the form.
    use_effect(move || {
        if auth.store.read().is_authenticated() {
            nav.replace(Route::Users {});
        }
    });

    rsx! {
        div { class: "flex-1 flex items-center justify-center min-h-screen px-6",
            div { class: "w-full max-w-md",
                h1 { class: "text-3xl font-bold text-center mb-10", "Login" }

                if let Some(e) = error.cloned() {
                    div { class: "mb-4 p-3 bg-red-500/10 border border-red-500/20 rounded-2xl",
                        p { class: "text-sm text-red-500", "{e}" }
                    }
                }

                form {
                    class: "space-y-4",
                    onsubmit: move |e| async move {
                        e.stop_propagation();
                        e.prevent_default();
                        if is_submitting() {
                            return;
                        }

                        // Required-field validation never reaches the
                        // network layer.
                        let username_value = username.read().trim().to_string();
                        let password_value = password.cloned();
                        if username_value.is_empty() {
                            error.set(Some("Username is required".to_string()));
                            return;
                        }
                        if password_value.is_empty() {
                            error.set(Some("Password is required".to_string()));
                            return;
                        }

                        is_submitting.set(true);
                        error.set(None);

                        let client = auth.admin_client();
                        let request = LoginRequest {
                            username: username_value,
                            password: password_value,
                        };

                        match api::auth::login(&client, &request).await {
                            Ok(session) => {
                                auth.login(session);
                                nav.replace(Route::Users {});
                            }
                            Err(err) => {
                                crate::log_error!("login failed: {err}");
                                error.set(Some(login_error_message(&err)));
                            }
                        }
                        is_submitting.set(false);
                    },

                    TextInput {
                        value: username(),
                        placeholder: "Username".to_string(),
                        oninput: move |e: FormEvent| username.set(e.value()),
                    }

                    div { class: "relative",
                        TextInput {
                            value: password(),
                            placeholder: "Password".to_string(),
                            input_type: if show_password() { InputType::Text } else { InputType::Password },
                            oninput: move |e: FormEvent| password.set(e.value()),
                        }
                        button {
                            class: "absolute right-4 top-3 text-sm text-gray-500",
                            r#type: "button",
                            onclick: move |_| show_password.set(!show_password()),
                            if show_password() { "Hide" } else { "Show" }
                        }
                    }

                    Button {
                        r#type: "submit".to_string(),
                        variant: ButtonVariant::Primary,
                        class: "w-full".to_string(),
                        disabled: is_submitting(),
                        if is_submitting() {
                            "Signing in…"
                        } else {
                            "Login"
                        }
                    }
                }
            }
        }
    }
}
