//! Browser implementations of the pipeline's renderer and notifier seams.

use crate::js_bridge;
use exd_data::pipeline::{ChartHandle, ChartRenderer, Notifier, SelectionPipeline};
use exd_data::series::ChartSeries;
use log::error;

/// The pipeline as wired in the browser.
pub type DashboardPipeline = SelectionPipeline<JsChartRenderer, AlertNotifier>;

/// Handle to a Chart.js instance, identified by its canvas.
#[derive(Debug)]
pub struct JsChartHandle {
    canvas_id: String,
}

impl ChartHandle for JsChartHandle {
    fn dispose(self) {
        js_bridge::destroy_chart(&self.canvas_id);
    }
}

/// Renders through `window.renderLineChart`.
#[derive(Debug, Default)]
pub struct JsChartRenderer;

impl ChartRenderer for JsChartRenderer {
    type Handle = JsChartHandle;

    fn render(&mut self, canvas_id: &str, series: &ChartSeries) -> JsChartHandle {
        match series.to_json() {
            Ok(json) => js_bridge::render_line_chart(canvas_id, &json),
            Err(e) => error!("Failed to serialise chart series: {}", e),
        }
        JsChartHandle {
            canvas_id: canvas_id.to_string(),
        }
    }
}

/// Reports failures with `window.alert`.
#[derive(Debug, Default)]
pub struct AlertNotifier;

impl Notifier for AlertNotifier {
    fn alert(&mut self, message: &str) {
        js_bridge::alert(message);
    }
}

/// A browser pipeline bound to `canvas_id`.
pub fn dashboard_pipeline(canvas_id: &str) -> DashboardPipeline {
    SelectionPipeline::new(JsChartRenderer, AlertNotifier, canvas_id)
}
