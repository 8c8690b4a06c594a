use dioxus::prelude::*;

use crate::auth_session::AuthContext;
use crate::components::ui::{Button, ButtonVariant, Card, InfoRow};
use crate::theme::{self, ThemeMode};
use crate::Route;

#[component]
pub fn Profile() -> Element {
    let mut auth = use_context::<AuthContext>();
    let nav = use_navigator();

    let Some(user) = auth.user() else {
        // Guard layout redirects; nothing to render meanwhile.
        return rsx! {
            div {}
        };
    };
    let institute = user.institute.clone();
    let dark = theme::is_dark();

    let tab = |active: bool| {
        if active {
            "w-[100px] h-10 flex items-center justify-center rounded-2xl bg-blue-500 text-white font-semibold"
        } else if dark {
            "w-[100px] h-10 flex items-center justify-center rounded-2xl text-white font-semibold"
        } else {
            "w-[100px] h-10 flex items-center justify-center rounded-2xl text-gray-800 font-semibold"
        }
    };

    rsx! {
        div { class: "flex flex-col items-center p-6",
            div { class: "w-full max-w-2xl",

                // Theme switch
                div { class: "mt-4 mb-6",
                    div {
                        class: if dark { "flex flex-row rounded-2xl p-1 bg-gray-800 w-fit" } else { "flex flex-row rounded-2xl p-1 bg-gray-200 w-fit" },
                        button {
                            class: tab(dark),
                            onclick: move |_| theme::set_theme(ThemeMode::Dark),
                            "Dark"
                        }
                        button {
                            class: tab(!dark),
                            onclick: move |_| theme::set_theme(ThemeMode::Light),
                            "Light"
                        }
                    }
                }

                Card { class: "mb-6".to_string(),
                    h2 { class: "text-xl font-bold mb-3", "Admin Info" }
                    InfoRow { label: "Name".to_string(), value: user.name.clone() }
                    InfoRow { label: "Email".to_string(), value: user.email.clone() }
                    InfoRow { label: "Mobile".to_string(), value: user.mobile.clone() }
                    InfoRow { label: "Status".to_string(), value: user.status.clone() }
                }

                Card { class: "mb-10".to_string(),
                    h2 { class: "text-xl font-bold mb-4", "Institute Details" }
                    if let Some(logo) = institute.logo.clone() {
                        div { class: "flex justify-center mb-4",
                            img { class: "w-24 h-24 rounded-full bg-white", src: "{logo}" }
                        }
                    }
                    InfoRow {
                        label: "Name".to_string(),
                        value: institute.institute_name.clone().unwrap_or_default(),
                    }
                    InfoRow {
                        label: "Address".to_string(),
                        value: institute.institute_address.clone().unwrap_or_default(),
                    }
                    InfoRow {
                        label: "Email".to_string(),
                        value: institute.institute_email.clone().unwrap_or_default(),
                    }
                    InfoRow {
                        label: "Contact".to_string(),
                        value: institute.institute_contact.clone().unwrap_or_default(),
                    }
                    InfoRow {
                        label: "Category".to_string(),
                        value: institute.institute_category.clone().unwrap_or_default(),
                    }
                    InfoRow {
                        label: "Type".to_string(),
                        value: institute.institute_type.clone().unwrap_or_default(),
                    }
                    InfoRow {
                        label: "Board".to_string(),
                        value: institute.institute_board.clone().unwrap_or_default(),
                    }
                    InfoRow {
                        label: "Gateway".to_string(),
                        value: institute.institute_gateway.clone().unwrap_or_default(),
                    }
                }

                Button {
                    variant: ButtonVariant::Danger,
                    class: "w-full".to_string(),
                    onclick: move |_| {
                        auth.logout();
                        nav.replace(Route::Login {});
                    },
                    "Logout"
                }
            }
        }
    }
}
