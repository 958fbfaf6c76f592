//! Reusable Dioxus RSX components for the dashboard.

mod chart_container;
mod chart_header;
mod dataset_selector;
mod error_display;
mod loading_spinner;

pub use chart_container::ChartContainer;
pub use chart_header::ChartHeader;
pub use dataset_selector::DatasetSelector;
pub use error_display::ErrorDisplay;
pub use loading_spinner::LoadingSpinner;
