use dioxus::prelude::*;

use crate::theme;

#[derive(Props, Clone, PartialEq)]
pub struct CardProps {
    #[props(optional)]
    pub class: Option<String>,
    pub children: Element,
}

#[component]
pub fn Card(props: CardProps) -> Element {
    let base = if theme::is_dark() {
        "rounded-3xl bg-gray-800 shadow-md p-6"
    } else {
        "rounded-3xl bg-gray-100 shadow-md p-6"
    };
    let class = match props.class {
        Some(extra) if !extra.is_empty() => format!("{} {}", base, extra),
        _ => base.to_string(),
    };

    rsx! {
        div { class, {props.children} }
    }
}

#[derive(Props, Clone, PartialEq)]
pub struct InfoRowProps {
    pub label: String,
    pub value: String,
}

/// Label-over-value row used by the user-detail and profile cards.
#[component]
pub fn InfoRow(props: InfoRowProps) -> Element {
    let (label_class, value_class) = if theme::is_dark() {
        ("text-gray-400", "text-white text-lg font-semibold")
    } else {
        ("text-gray-600", "text-gray-800 text-lg font-semibold")
    };

    rsx! {
        div { class: "mb-2",
            p { class: label_class, "{props.label}" }
            p { class: value_class, "{props.value}" }
        }
    }
}
