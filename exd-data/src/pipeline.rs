//! Dataset selection to chart pipeline.
//!
//! A load is an explicit request/response exchange: [`SelectionPipeline::begin`]
//! yields the relative path to fetch, the caller performs the fetch however
//! its platform does (browser `fetch`, filesystem, HTTP client), and
//! [`SelectionPipeline::complete`] turns the response into a chart or an
//! error notification.
//!
//! Responses are applied in the order `complete` is called. A slow response
//! for an earlier selection can therefore replace the chart of a later one.

use crate::series::{build_series, ChartSeries};
use exd_core::catalog::dataset_path;
use exd_core::observation::ObservationRecord;
use log::{debug, error, info};
use std::fmt;

/// Raw result of fetching a data file.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

impl FetchResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// A 200 response with the given body.
    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(200, body)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Why a dataset could not be loaded.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadErrorKind {
    /// The server answered with a non-success status.
    Status(u16),
    /// The request never produced a response.
    Transport(String),
    /// The body was not a readable observation file.
    Parse(String),
}

/// Failure to fetch or parse a dataset file.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadError {
    pub dataset_id: String,
    pub kind: LoadErrorKind,
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            LoadErrorKind::Status(status) => write!(
                f,
                "Failed to load dataset {}: HTTP status {}",
                self.dataset_id, status
            ),
            LoadErrorKind::Transport(msg) => {
                write!(f, "Failed to fetch dataset {}: {}", self.dataset_id, msg)
            }
            LoadErrorKind::Parse(msg) => {
                write!(f, "Failed to parse dataset {}: {}", self.dataset_id, msg)
            }
        }
    }
}

impl std::error::Error for LoadError {}

/// A rendered chart that can be torn down.
pub trait ChartHandle {
    fn dispose(self);
}

/// Draws a line chart onto a page element.
pub trait ChartRenderer {
    type Handle: ChartHandle;

    fn render(&mut self, canvas_id: &str, series: &ChartSeries) -> Self::Handle;
}

/// Surfaces a failure to the user.
pub trait Notifier {
    fn alert(&mut self, message: &str);
}

/// Owner of at most one live chart.
#[derive(Debug)]
pub struct ChartSlot<H: ChartHandle> {
    current: Option<H>,
}

impl<H: ChartHandle> Default for ChartSlot<H> {
    fn default() -> Self {
        Self { current: None }
    }
}

impl<H: ChartHandle> ChartSlot<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_live(&self) -> bool {
        self.current.is_some()
    }

    pub fn current(&self) -> Option<&H> {
        self.current.as_ref()
    }

    /// Dispose the previous chart, then store `chart`.
    pub fn replace(&mut self, chart: H) {
        self.clear();
        self.current = Some(chart);
    }

    /// Dispose the previous chart before `create` runs, then store its result.
    ///
    /// Needed when the new chart binds to the same canvas as the old one.
    pub fn replace_with<F>(&mut self, create: F)
    where
        F: FnOnce() -> H,
    {
        self.clear();
        self.current = Some(create());
    }

    /// Dispose the live chart, if any.
    pub fn clear(&mut self) {
        if let Some(old) = self.current.take() {
            old.dispose();
        }
    }
}

/// Where the pipeline is in the current interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Loading { dataset_id: String },
    Rendered { dataset_id: String },
    Failed { dataset_id: String },
}

impl PipelineState {
    /// Whether a new selection can start without waiting.
    pub fn is_ready(&self) -> bool {
        !matches!(self, PipelineState::Loading { .. })
    }
}

/// An outstanding load: what to fetch and how to title the result.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadRequest {
    pub dataset_id: String,
    pub title: String,
    /// Relative path, e.g. "data/processed/50902.json"
    pub path: String,
}

impl LoadRequest {
    pub fn new(dataset_id: &str, title: &str) -> Self {
        Self {
            dataset_id: dataset_id.to_string(),
            title: title.to_string(),
            path: dataset_path(dataset_id),
        }
    }
}

/// Turn a fetch outcome into decoded observation records.
pub fn load_records(
    request: &LoadRequest,
    response: anyhow::Result<FetchResponse>,
) -> Result<Vec<ObservationRecord>, LoadError> {
    let fail = |kind| LoadError {
        dataset_id: request.dataset_id.clone(),
        kind,
    };

    let response = response.map_err(|e| fail(LoadErrorKind::Transport(format!("{:#}", e))))?;
    if !response.is_success() {
        return Err(fail(LoadErrorKind::Status(response.status)));
    }
    let records = ObservationRecord::parse_observations(&response.body)
        .map_err(|e| fail(LoadErrorKind::Parse(format!("{:#}", e))))?;
    debug!(
        "Dataset {} decoded {} records",
        request.dataset_id,
        records.len()
    );
    Ok(records)
}

/// Turn a fetch outcome into a chart series.
pub fn load_series(
    request: &LoadRequest,
    response: anyhow::Result<FetchResponse>,
) -> Result<ChartSeries, LoadError> {
    let records = load_records(request, response)?;
    Ok(build_series(&request.title, records))
}

/// Drives one chart canvas from dataset selections.
pub struct SelectionPipeline<R: ChartRenderer, N: Notifier> {
    renderer: R,
    notifier: N,
    slot: ChartSlot<R::Handle>,
    canvas_id: String,
    state: PipelineState,
    /// Requests handed out by `begin` and not yet completed
    pending: usize,
}

impl<R: ChartRenderer, N: Notifier> SelectionPipeline<R, N> {
    pub fn new(renderer: R, notifier: N, canvas_id: impl Into<String>) -> Self {
        Self {
            renderer,
            notifier,
            slot: ChartSlot::new(),
            canvas_id: canvas_id.into(),
            state: PipelineState::Idle,
            pending: 0,
        }
    }

    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    pub fn slot(&self) -> &ChartSlot<R::Handle> {
        &self.slot
    }

    /// Number of loads begun but not yet completed.
    ///
    /// Overlapping selections each hold one; a loading indicator should stay
    /// up until this drops to zero, not until the first response lands.
    pub fn pending(&self) -> usize {
        self.pending
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn canvas_id(&self) -> &str {
        &self.canvas_id
    }

    /// Start loading `dataset_id`; returns what the caller must fetch.
    pub fn begin(&mut self, dataset_id: &str, title: &str) -> LoadRequest {
        info!("Loading dataset {} ({})", dataset_id, title);
        self.pending += 1;
        self.state = PipelineState::Loading {
            dataset_id: dataset_id.to_string(),
        };
        LoadRequest::new(dataset_id, title)
    }

    /// Finish a load with the fetch outcome.
    ///
    /// On success the previous chart is disposed and the new one rendered.
    /// On failure the user is alerted once, the error is logged, and the
    /// previous chart (if any) stays on screen.
    pub fn complete(
        &mut self,
        request: LoadRequest,
        response: anyhow::Result<FetchResponse>,
    ) -> Result<(), LoadError> {
        self.pending = self.pending.saturating_sub(1);
        match load_series(&request, response) {
            Ok(series) => {
                let renderer = &mut self.renderer;
                let canvas_id = &self.canvas_id;
                self.slot
                    .replace_with(|| renderer.render(canvas_id, &series));
                info!(
                    "Rendered dataset {} with {} points",
                    request.dataset_id,
                    series.len()
                );
                self.state = PipelineState::Rendered {
                    dataset_id: request.dataset_id,
                };
                Ok(())
            }
            Err(e) => {
                error!("{}", e);
                self.notifier.alert(&format!(
                    "No se pudieron cargar los datos de «{}».",
                    request.title
                ));
                self.state = PipelineState::Failed {
                    dataset_id: request.dataset_id,
                };
                Err(e)
            }
        }
    }

    /// Dispose the live chart and return to idle.
    pub fn reset(&mut self) {
        self.slot.clear();
        self.state = PipelineState::Idle;
        self.pending = 0;
    }

    /// Dispose the live chart and give back the renderer and notifier.
    pub fn into_parts(mut self) -> (R, N) {
        self.slot.clear();
        (self.renderer, self.notifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Shared event log so tests can observe render/dispose ordering.
    type Events = Rc<RefCell<Vec<String>>>;

    struct FakeHandle {
        id: usize,
        events: Events,
    }

    impl ChartHandle for FakeHandle {
        fn dispose(self) {
            self.events.borrow_mut().push(format!("dispose {}", self.id));
        }
    }

    #[derive(Default)]
    struct FakeRenderer {
        events: Events,
        rendered: Vec<ChartSeries>,
    }

    impl FakeRenderer {
        fn live(&self) -> i64 {
            let events = self.events.borrow();
            let created = events.iter().filter(|e| e.starts_with("render")).count() as i64;
            let disposed = events.iter().filter(|e| e.starts_with("dispose")).count() as i64;
            created - disposed
        }
    }

    impl ChartRenderer for FakeRenderer {
        type Handle = FakeHandle;

        fn render(&mut self, canvas_id: &str, series: &ChartSeries) -> FakeHandle {
            let id = self.rendered.len() + 1;
            self.events
                .borrow_mut()
                .push(format!("render {} on {}", id, canvas_id));
            self.rendered.push(series.clone());
            FakeHandle {
                id,
                events: self.events.clone(),
            }
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        alerts: Vec<String>,
    }

    impl Notifier for RecordingNotifier {
        fn alert(&mut self, message: &str) {
            self.alerts.push(message.to_string());
        }
    }

    fn pipeline() -> SelectionPipeline<FakeRenderer, RecordingNotifier> {
        SelectionPipeline::new(
            FakeRenderer::default(),
            RecordingNotifier::default(),
            "chart",
        )
    }

    const UNSORTED: &str = r#"[{"Fecha":"2025-02-01","Valor":5},{"Fecha":"2025-01-01","Valor":3}]"#;

    #[test]
    fn test_begin_builds_relative_path() {
        let mut p = pipeline();
        let request = p.begin("50902", "IPC");
        assert_eq!(request.path, "data/processed/50902.json");
        assert_eq!(
            p.state(),
            &PipelineState::Loading {
                dataset_id: "50902".to_string()
            }
        );
        assert!(!p.state().is_ready());
    }

    #[test]
    fn test_successful_load_renders_sorted_series() {
        let mut p = pipeline();
        let request = p.begin("50902", "IPC");
        p.complete(request, Ok(FetchResponse::ok(UNSORTED))).unwrap();

        let rendered = &p.renderer().rendered;
        assert_eq!(rendered.len(), 1);
        assert_eq!(rendered[0].labels, vec!["ene 2025", "feb 2025"]);
        assert_eq!(rendered[0].values, vec![3.0, 5.0]);
        assert_eq!(rendered[0].title, "IPC");
        assert!(p.slot().is_live());
        assert!(p.notifier().alerts.is_empty());
        assert_eq!(
            p.state(),
            &PipelineState::Rendered {
                dataset_id: "50902".to_string()
            }
        );
    }

    #[test]
    fn test_non_success_status_alerts_once_and_renders_nothing() {
        let mut p = pipeline();
        let request = p.begin("404404", "Missing");
        let err = p
            .complete(request, Ok(FetchResponse::new(404, "Not Found")))
            .unwrap_err();

        assert_eq!(err.kind, LoadErrorKind::Status(404));
        assert_eq!(p.notifier().alerts.len(), 1);
        assert!(p.notifier().alerts[0].contains("Missing"));
        assert!(p.renderer().rendered.is_empty());
        assert!(!p.slot().is_live());
        assert_eq!(
            p.state(),
            &PipelineState::Failed {
                dataset_id: "404404".to_string()
            }
        );
        assert!(p.state().is_ready());
    }

    #[test]
    fn test_parse_failure_alerts_once() {
        let mut p = pipeline();
        let request = p.begin("1", "Broken");
        let err = p
            .complete(request, Ok(FetchResponse::ok("<html>oops</html>")))
            .unwrap_err();
        assert!(matches!(err.kind, LoadErrorKind::Parse(_)));
        assert_eq!(p.notifier().alerts.len(), 1);
        assert!(p.renderer().rendered.is_empty());
    }

    #[test]
    fn test_transport_failure_alerts_once() {
        let mut p = pipeline();
        let request = p.begin("1", "Offline");
        let err = p
            .complete(request, Err(anyhow::anyhow!("connection refused")))
            .unwrap_err();
        assert_eq!(
            err.kind,
            LoadErrorKind::Transport("connection refused".to_string())
        );
        assert_eq!(err.to_string(), "Failed to fetch dataset 1: connection refused");
        assert_eq!(p.notifier().alerts.len(), 1);
    }

    #[test]
    fn test_two_loads_leave_exactly_one_chart() {
        let mut p = pipeline();
        let first = p.begin("a", "A");
        p.complete(first, Ok(FetchResponse::ok(UNSORTED))).unwrap();
        let second = p.begin("b", "B");
        p.complete(second, Ok(FetchResponse::ok(UNSORTED))).unwrap();

        assert_eq!(p.renderer().live(), 1);
        assert_eq!(p.slot().current().map(|h| h.id), Some(2));
        let events = p.renderer().events.borrow().clone();
        assert_eq!(
            events,
            vec!["render 1 on chart", "dispose 1", "render 2 on chart"]
        );
    }

    #[test]
    fn test_failure_keeps_previous_chart() {
        let mut p = pipeline();
        let first = p.begin("a", "A");
        p.complete(first, Ok(FetchResponse::ok(UNSORTED))).unwrap();
        let second = p.begin("b", "B");
        let _ = p.complete(second, Ok(FetchResponse::new(500, "")));

        assert_eq!(p.renderer().live(), 1);
        assert_eq!(p.slot().current().map(|h| h.id), Some(1));
    }

    #[test]
    fn test_overlapping_loads_stay_pending_until_last_completes() {
        let mut p = pipeline();
        let first = p.begin("a", "A");
        let second = p.begin("b", "B");
        assert_eq!(p.pending(), 2);

        p.complete(first, Ok(FetchResponse::ok(UNSORTED))).unwrap();
        assert_eq!(p.pending(), 1);

        let _ = p.complete(second, Ok(FetchResponse::new(404, "")));
        assert_eq!(p.pending(), 0);
        assert_eq!(p.renderer().live(), 1);
    }

    #[test]
    fn test_reset_disposes_chart() {
        let mut p = pipeline();
        let request = p.begin("a", "A");
        p.complete(request, Ok(FetchResponse::ok("[]"))).unwrap();
        p.begin("b", "B");
        p.reset();
        assert_eq!(p.pending(), 0);
        assert_eq!(p.renderer().live(), 0);
        assert_eq!(p.state(), &PipelineState::Idle);
    }

    #[test]
    fn test_chart_slot_replace_disposes_previous() {
        let events: Events = Rc::default();
        let mut slot = ChartSlot::new();
        slot.replace(FakeHandle {
            id: 1,
            events: events.clone(),
        });
        slot.replace(FakeHandle {
            id: 2,
            events: events.clone(),
        });
        assert_eq!(events.borrow().as_slice(), ["dispose 1".to_string()]);
        assert_eq!(slot.current().map(|h| h.id), Some(2));
        slot.clear();
        assert!(!slot.is_live());
        assert_eq!(events.borrow().len(), 2);
    }
}
