use dioxus::prelude::*;

use crate::theme;

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ButtonVariant {
    Primary,
    Danger,
    Ghost,
}

impl Default for ButtonVariant {
    fn default() -> Self {
        Self::Primary
    }
}

#[derive(Props, Clone, PartialEq)]
pub struct ButtonProps {
    #[props(optional)]
    pub class: Option<String>,
    #[props(optional)]
    pub variant: Option<ButtonVariant>,
    #[props(optional)]
    pub r#type: Option<String>,
    #[props(optional)]
    pub disabled: Option<bool>,
    #[props(optional)]
    pub onclick: Option<EventHandler<MouseEvent>>,
    pub children: Element,
}

#[component]
pub fn Button(props: ButtonProps) -> Element {
    let variant = props.variant.unwrap_or_default();
    let disabled = props.disabled.unwrap_or(false);
    let dark = theme::is_dark();

    let base = "inline-flex items-center justify-center rounded-2xl px-4 py-3 text-sm font-semibold transition-colors focus:outline-none disabled:opacity-50 disabled:pointer-events-none";

    let variant_class = match (variant, dark) {
        (ButtonVariant::Primary, _) => "bg-blue-600 text-white hover:bg-blue-500",
        (ButtonVariant::Danger, _) => "bg-red-600 text-white hover:bg-red-500",
        (ButtonVariant::Ghost, false) => "bg-transparent text-gray-700 hover:bg-gray-100",
        (ButtonVariant::Ghost, true) => "bg-transparent text-gray-300 hover:bg-gray-800",
    };

    let class = match props.class {
        Some(extra) if !extra.is_empty() => format!("{} {} {}", base, variant_class, extra),
        _ => format!("{} {}", base, variant_class),
    };

    rsx! {
        button {
            class,
            r#type: props.r#type.unwrap_or_else(|| "button".to_string()),
            disabled,
            onclick: move |evt| {
                if disabled {
                    return;
                }
                if let Some(handler) = &props.onclick {
                    handler.call(evt);
                }
            },
            {props.children}
        }
    }
}
