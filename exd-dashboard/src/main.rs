//! Extremadura en Datos dashboard
//!
//! Displays a line chart for one statistical indicator at a time. The user
//! picks an indicator from a dropdown grouped by category; the app fetches
//! its processed JSON file and redraws the single chart.
//!
//! Data flow:
//! 1. On mount, the embedded catalog is grouped by category and the first
//!    dataset is selected, which triggers the first render.
//! 2. Each selection change fetches `data/processed/<id>.json` relative to
//!    the page.
//! 3. The selection pipeline sorts the records by date, maps them to
//!    month/value pairs and replaces the live Chart.js instance. A failed
//!    fetch raises a browser alert and leaves the previous chart in place.

use dioxus::prelude::*;
use exd_chart_ui::components::{
    ChartContainer, ChartHeader, DatasetSelector, ErrorDisplay, LoadingSpinner,
};
use exd_chart_ui::js_bridge;
use exd_chart_ui::state::AppState;
use exd_core::catalog::{catalog, find};

/// Canvas DOM element ID used by Chart.js to render into.
const CHART_ID: &str = "dataset-chart";

fn main() {
    dioxus_logger::init(dioxus_logger::tracing::Level::INFO).expect("failed to init logger");
    dioxus::LaunchBuilder::new()
        .with_cfg(dioxus::web::Config::new().rootname("exd-root"))
        .launch(App);
}

#[component]
fn App() -> Element {
    let mut state = use_context_provider(|| AppState::new(CHART_ID));

    // Populate the selector once; selecting the first entry triggers a render.
    use_effect(move || {
        js_bridge::init_charts();
        state.populate(catalog());
    });

    // Load and render whenever the selection changes
    use_effect(move || {
        let dataset_id = (state.selected_dataset)();
        if dataset_id.is_empty() {
            return;
        }
        let Some(dataset) = find(&dataset_id) else {
            log::warn!("Selected dataset {} is not in the catalog", dataset_id);
            return;
        };
        spawn(state.load_and_render(dataset.id.clone(), dataset.display_title()));
    });

    let subtitle = find(&(state.selected_dataset)())
        .map(|d| format!("{} · {} · INE tabla {}", d.periodicity, d.geo, d.id))
        .unwrap_or_default();

    rsx! {
        div {
            style: "padding: 16px; font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;",

            ChartHeader {
                title: "Extremadura en Datos".to_string(),
                subtitle: subtitle,
            }

            if let Some(err) = (state.error_msg)() {
                ErrorDisplay { message: err }
            } else if state.groups.read().is_empty() {
                LoadingSpinner {
                    message: "Cargando catálogo...".to_string(),
                }
            } else {
                DatasetSelector {}

                ChartContainer {
                    id: CHART_ID.to_string(),
                    loading: (state.loading)(),
                    height: 450,
                }
            }
        }
    }
}
