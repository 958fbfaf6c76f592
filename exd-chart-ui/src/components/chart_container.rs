//! Chart container component with loading state.

use super::LoadingSpinner;
use dioxus::prelude::*;

/// Props for ChartContainer
#[derive(Props, Clone, PartialEq)]
pub struct ChartContainerProps {
    /// The DOM id of the canvas (Chart.js binds to it)
    pub id: String,
    /// Whether a dataset is still loading
    #[props(default = false)]
    pub loading: bool,
    /// Optional height in pixels
    #[props(default = 400)]
    pub height: u32,
}

/// A fixed-height box holding the chart canvas, with a loading overlay.
#[component]
pub fn ChartContainer(props: ChartContainerProps) -> Element {
    let style = format!(
        "height: {}px; position: relative; width: 100%;",
        props.height
    );

    rsx! {
        div {
            style: "{style}",
            if props.loading {
                LoadingSpinner {
                    message: "Cargando datos...".to_string(),
                    overlay: true,
                }
            }
            canvas {
                id: "{props.id}",
            }
        }
    }
}
