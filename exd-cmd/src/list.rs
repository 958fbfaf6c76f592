//! `list`: print the catalog grouped by category.

use crate::category_matches;
use exd_core::catalog::{catalog, group_by_category, CategoryGroup};
use std::fmt::Write;

/// Render grouped datasets as indented text, one category heading per group.
pub fn format_groups(groups: &[CategoryGroup]) -> String {
    let mut out = String::new();
    for group in groups {
        let _ = writeln!(out, "{} ({})", group.category, group.datasets.len());
        for dataset in &group.datasets {
            let _ = writeln!(
                out,
                "  {:<8} {} [{}, {}]",
                dataset.id, dataset.metric, dataset.periodicity, dataset.geo
            );
        }
    }
    out
}

pub fn run_list(category: Option<&str>) -> anyhow::Result<()> {
    let groups: Vec<CategoryGroup> = group_by_category(catalog())
        .into_iter()
        .filter(|g| category_matches(&g.category, category))
        .collect();
    if groups.is_empty() {
        anyhow::bail!("No categories match {:?}", category.unwrap_or_default());
    }
    print!("{}", format_groups(&groups));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::format_groups;
    use exd_core::catalog::{group_by_category, DatasetDescriptor};

    #[test]
    fn test_format_groups() {
        let datasets = DatasetDescriptor::parse_catalog_csv(
            "id,category,metric,periodicity,geo\n\
             1,Precios,IPC,Mensual,Extremadura\n\
             2,Turismo,Viajeros,Mensual,Extremadura\n\
             3,Precios,IPV,Trimestral,Extremadura\n",
        )
        .unwrap();
        let text = format_groups(&group_by_category(&datasets));
        assert_eq!(
            text,
            "Precios (2)\n\
             \x20 1        IPC [Mensual, Extremadura]\n\
             \x20 3        IPV [Trimestral, Extremadura]\n\
             Turismo (1)\n\
             \x20 2        Viajeros [Mensual, Extremadura]\n"
        );
    }
}
