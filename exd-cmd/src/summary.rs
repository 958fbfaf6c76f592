//! `summary`: latest value and change vs the previous period per dataset.

use crate::category_matches;
use crate::source::DatasetSource;
use exd_core::catalog::{catalog, DatasetDescriptor};
use exd_data::pipeline::{load_records, LoadRequest};
use exd_data::summary::{summarize, SeriesSummary};
use log::{info, warn};

/// Summarise every dataset whose category matches `category`.
///
/// Datasets that cannot be loaded or have no usable records are warned about
/// and skipped.
pub async fn collect_summaries(
    source: &DatasetSource,
    datasets: &[DatasetDescriptor],
    category: Option<&str>,
) -> Vec<(DatasetDescriptor, SeriesSummary)> {
    let mut summaries = Vec::new();
    for dataset in datasets
        .iter()
        .filter(|d| category_matches(&d.category, category))
    {
        let request = LoadRequest::new(&dataset.id, &dataset.display_title());
        let response = source.fetch(&request.path).await;
        let records = match load_records(&request, response) {
            Ok(records) => records,
            Err(e) => {
                warn!("{}. Skipping.", e);
                continue;
            }
        };
        match summarize(&records) {
            Some(summary) => summaries.push((dataset.clone(), summary)),
            None => warn!("No usable values in {}. Skipping.", source.locate(&request.path)),
        }
    }
    summaries
}

/// One line per summary: id, metric, period, value, change.
pub fn format_summary_line(dataset: &DatasetDescriptor, summary: &SeriesSummary) -> String {
    format!(
        "{:<8} {:<50} {:>7} {:>16}  {}",
        dataset.id,
        dataset.metric,
        summary.last_period,
        summary.value_text(),
        summary.delta_text()
    )
}

pub async fn run_summary(source: &str, category: Option<&str>) -> anyhow::Result<()> {
    let source = DatasetSource::from_arg(source)?;
    let summaries = collect_summaries(&source, catalog(), category).await;
    if summaries.is_empty() {
        anyhow::bail!("No datasets could be summarised");
    }
    for (dataset, summary) in &summaries {
        println!("{}", format_summary_line(dataset, summary));
    }
    info!("Summarised {} datasets", summaries.len());
    Ok(())
}
