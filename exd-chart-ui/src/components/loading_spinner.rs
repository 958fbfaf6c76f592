//! Loading indicator, either as a page block or laid over the chart canvas.

use dioxus::prelude::*;

#[derive(Props, Clone, PartialEq)]
pub struct LoadingSpinnerProps {
    /// Text shown while waiting
    #[props(default = "Cargando...".to_string())]
    pub message: String,
    /// Center over the enclosing positioned box instead of taking space
    #[props(default = false)]
    pub overlay: bool,
}

#[component]
pub fn LoadingSpinner(props: LoadingSpinnerProps) -> Element {
    let style = if props.overlay {
        "position: absolute; top: 50%; left: 50%; transform: translate(-50%, -50%); color: #666; pointer-events: none;"
    } else {
        "display: flex; justify-content: center; align-items: center; padding: 40px; color: #666;"
    };

    rsx! {
        div {
            role: "status",
            style: "{style}",
            "{props.message}"
        }
    }
}
