//! `show`: run the selection pipeline for one dataset and print the chart series.

use crate::source::DatasetSource;
use exd_core::catalog::find;
use exd_data::pipeline::{ChartHandle, ChartRenderer, Notifier, SelectionPipeline};
use exd_data::series::ChartSeries;
use exd_utils::numbers::format_es;
use log::{debug, error};
use std::io::Write;

/// Canvas name used for terminal output.
const TERMINAL_CANVAS: &str = "stdout";

/// Handle for a series already written to the terminal.
#[derive(Debug)]
pub struct PrintedChart {
    pub points: usize,
}

impl ChartHandle for PrintedChart {
    fn dispose(self) {
        debug!("Discarding printed chart of {} points", self.points);
    }
}

/// Writes each rendered series as a table or as JSON.
pub struct TerminalRenderer<W: Write> {
    out: W,
    json: bool,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, json: bool) -> Self {
        Self { out, json }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_series(&mut self, series: &ChartSeries) -> anyhow::Result<()> {
        if self.json {
            writeln!(self.out, "{}", series.to_json()?)?;
            return Ok(());
        }
        writeln!(self.out, "{}", series.title)?;
        let width = series.labels.iter().map(|l| l.len()).max().unwrap_or(0);
        for (label, value) in series.labels.iter().zip(&series.values) {
            writeln!(self.out, "{:<width$}  {:>14}", label, format_es(*value, 2))?;
        }
        Ok(())
    }
}

impl<W: Write> ChartRenderer for TerminalRenderer<W> {
    type Handle = PrintedChart;

    fn render(&mut self, _canvas_id: &str, series: &ChartSeries) -> PrintedChart {
        if let Err(e) = self.write_series(series) {
            error!("Failed to write chart series: {}", e);
        }
        PrintedChart {
            points: series.len(),
        }
    }
}

/// Reports pipeline failures on stderr.
#[derive(Debug, Default)]
pub struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn alert(&mut self, message: &str) {
        eprintln!("{}", message);
    }
}

/// Title for a dataset id, falling back to the bare id when it is not catalogued.
pub fn title_for(id: &str) -> String {
    find(id)
        .map(|d| d.display_title())
        .unwrap_or_else(|| format!("Tabla {}", id))
}

pub async fn run_show(id: &str, source: &str, json: bool) -> anyhow::Result<()> {
    let source = DatasetSource::from_arg(source)?;
    if find(id).is_none() {
        log::warn!("Dataset {} is not in the catalog", id);
    }

    let renderer = TerminalRenderer::new(std::io::stdout().lock(), json);
    let mut pipeline = SelectionPipeline::new(renderer, StderrNotifier, TERMINAL_CANVAS);
    let request = pipeline.begin(id, &title_for(id));
    let response = source.fetch(&request.path).await;
    pipeline.complete(request, response)?;
    Ok(())
}
