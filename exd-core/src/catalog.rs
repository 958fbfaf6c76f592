use crate::periodicity::Periodicity;
use csv::ReaderBuilder;
use log::error;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Embedded CSV listing every dataset the dashboard offers.
pub static CSV_OBJECT: &str = include_str!("../../fixtures/catalog.csv");

/// Directory, relative to the site root, holding the processed JSON files.
pub const DATA_DIR: &str = "data/processed";

/// Metadata for one statistical indicator.
///
/// `id` is the INE table identifier and also names the data file
/// (`data/processed/<id>.json`).
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct DatasetDescriptor {
    pub id: String,
    pub category: String,
    /// Display name of the metric
    pub metric: String,
    /// Periodicity as written in the catalog, e.g. "Mensual"
    pub periodicity: String,
    pub geo: String,
}

/// Datasets sharing a category, in catalog order.
#[derive(Debug, PartialEq, Clone)]
pub struct CategoryGroup {
    pub category: String,
    pub datasets: Vec<DatasetDescriptor>,
}

impl DatasetDescriptor {
    /// Parse a CSV string of catalog rows.
    ///
    /// Expected CSV columns: id, category, metric, periodicity, geo
    pub fn parse_catalog_csv(csv_object: &str) -> anyhow::Result<Vec<DatasetDescriptor>> {
        let mut rdr = ReaderBuilder::new()
            .delimiter(b',')
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(csv_object.as_bytes());
        let mut datasets = Vec::new();
        for row in rdr.deserialize() {
            let dataset: DatasetDescriptor = row?;
            datasets.push(dataset);
        }
        Ok(datasets)
    }

    pub fn periodicity(&self) -> Periodicity {
        Periodicity::from(self.periodicity.as_str())
    }

    /// Title handed to the chart: "<metric> (<geo>)".
    pub fn display_title(&self) -> String {
        if self.geo.is_empty() {
            self.metric.clone()
        } else {
            format!("{} ({})", self.metric, self.geo)
        }
    }

    /// Relative path of this dataset's processed JSON file.
    pub fn data_path(&self) -> String {
        dataset_path(&self.id)
    }
}

/// Relative path of the processed JSON file for `id`.
pub fn dataset_path(id: &str) -> String {
    format!("{}/{}.json", DATA_DIR, id)
}

/// The embedded catalog, parsed once, in fixture order.
pub fn catalog() -> &'static [DatasetDescriptor] {
    static CATALOG: OnceLock<Vec<DatasetDescriptor>> = OnceLock::new();
    CATALOG.get_or_init(|| {
        DatasetDescriptor::parse_catalog_csv(CSV_OBJECT).unwrap_or_else(|e| {
            error!("Failed to parse embedded catalog: {}", e);
            Vec::new()
        })
    })
}

/// Look up a dataset by id. The first entry wins if ids repeat.
pub fn find(id: &str) -> Option<&'static DatasetDescriptor> {
    catalog().iter().find(|d| d.id == id)
}

/// Group datasets by category, ordering groups by first occurrence.
pub fn group_by_category(datasets: &[DatasetDescriptor]) -> Vec<CategoryGroup> {
    let mut groups: Vec<CategoryGroup> = Vec::new();
    for dataset in datasets {
        match groups.iter_mut().find(|g| g.category == dataset.category) {
            Some(group) => group.datasets.push(dataset.clone()),
            None => groups.push(CategoryGroup {
                category: dataset.category.clone(),
                datasets: vec![dataset.clone()],
            }),
        }
    }
    groups
}

/// The dataset a freshly populated selector starts on: the first option of
/// the first group, which is also the first catalog entry.
pub fn initial_selection(groups: &[CategoryGroup]) -> Option<&str> {
    groups
        .iter()
        .find_map(|g| g.datasets.first())
        .map(|d| d.id.as_str())
}
