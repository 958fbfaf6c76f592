//! Application state managed via Dioxus context.
//!
//! `AppState` bundles all reactive signals into a single struct provided via
//! `use_context_provider`. Child components retrieve it with `use_context::<AppState>()`.

use crate::fetch::fetch_text;
use crate::renderer::{dashboard_pipeline, DashboardPipeline};
use dioxus::prelude::*;
use exd_core::catalog::{group_by_category, initial_selection, CategoryGroup, DatasetDescriptor};

/// Shared application state for the dashboard.
#[derive(Clone, Copy)]
pub struct AppState {
    /// Selection pipeline owning the single live chart
    pub pipeline: Signal<DashboardPipeline>,
    /// Whether a dataset fetch is in flight
    pub loading: Signal<bool>,
    /// Error message if the catalog could not be shown
    pub error_msg: Signal<Option<String>>,
    /// Currently selected dataset id (empty until populated)
    pub selected_dataset: Signal<String>,
    /// Catalog grouped by category, in first-occurrence order
    pub groups: Signal<Vec<CategoryGroup>>,
}

impl AppState {
    /// Create a new AppState whose chart renders into `canvas_id`.
    pub fn new(canvas_id: &str) -> Self {
        Self {
            pipeline: Signal::new(dashboard_pipeline(canvas_id)),
            loading: Signal::new(false),
            error_msg: Signal::new(None),
            selected_dataset: Signal::new(String::new()),
            groups: Signal::new(Vec::new()),
        }
    }

    /// Fill the selector from the catalog and select its first entry.
    pub fn populate(&mut self, datasets: &[DatasetDescriptor]) {
        let groups = group_by_category(datasets);
        match initial_selection(&groups).map(str::to_string) {
            Some(first) => {
                log::info!(
                    "Catalog loaded: {} datasets in {} categories",
                    datasets.len(),
                    groups.len()
                );
                self.groups.set(groups);
                self.selected_dataset.set(first);
            }
            None => {
                self.error_msg
                    .set(Some("El catálogo de datos está vacío.".to_string()));
            }
        }
    }

    /// Fetch a dataset file and hand the outcome to the pipeline.
    ///
    /// Stale fetches are not cancelled; whichever response arrives last wins.
    pub async fn load_and_render(mut self, dataset_id: String, title: String) {
        let request = self.pipeline.write().begin(&dataset_id, &title);
        self.loading.set(true);
        let response = fetch_text(&request.path).await;
        let still_pending = {
            let mut pipeline = self.pipeline.write();
            // Failures are logged and alerted by the pipeline.
            let _ = pipeline.complete(request, response);
            pipeline.pending() > 0
        };
        // An earlier, overlapping selection must not hide the overlay.
        self.loading.set(still_pending);
    }
}
