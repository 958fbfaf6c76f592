//! `check`: load every catalog dataset and report the ones that fail.

use crate::source::DatasetSource;
use exd_core::catalog::{catalog, DatasetDescriptor};
use exd_data::pipeline::{load_series, LoadError, LoadRequest};

/// Load each dataset, returning its point count or the load error.
pub async fn check_datasets(
    source: &DatasetSource,
    datasets: &[DatasetDescriptor],
) -> Vec<(String, Result<usize, LoadError>)> {
    let mut results = Vec::with_capacity(datasets.len());
    for dataset in datasets {
        let request = LoadRequest::new(&dataset.id, &dataset.display_title());
        let response = source.fetch(&request.path).await;
        let outcome = load_series(&request, response).map(|series| series.len());
        results.push((dataset.id.clone(), outcome));
    }
    results
}

pub async fn run_check(source: &str) -> anyhow::Result<()> {
    let source = DatasetSource::from_arg(source)?;
    let datasets = catalog();
    let results = check_datasets(&source, datasets).await;

    let mut failed = 0;
    for (id, outcome) in &results {
        match outcome {
            Ok(points) => println!("OK    {:<8} {} points", id, points),
            Err(e) => {
                failed += 1;
                println!("FAIL  {:<8} {}", id, e);
            }
        }
    }
    if failed > 0 {
        anyhow::bail!("{} of {} datasets failed to load", failed, datasets.len());
    }
    Ok(())
}
