//! Command implementations for the Extremadura en Datos CLI.
//!
//! Provides subcommands for browsing the dataset catalog and running the
//! chart pipeline against a local data directory or a published site.

use clap::Subcommand;

pub mod check;
pub mod list;
pub mod show;
pub mod source;
pub mod summary;

/// Where dataset files are read from unless `--source` is given.
pub const DEFAULT_SOURCE: &str = ".";

#[derive(Subcommand)]
pub enum Command {
    /// List the dataset catalog grouped by category
    List {
        /// Only show categories containing this text (case-insensitive)
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Load one dataset and print its chart series
    Show {
        /// Dataset id (INE table id)
        id: String,

        /// Site root: a directory or an http(s) base URL
        #[arg(short, long, default_value = DEFAULT_SOURCE)]
        source: String,

        /// Print the series as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Print the latest value and change vs the previous period for each dataset
    Summary {
        /// Site root: a directory or an http(s) base URL
        #[arg(short, long, default_value = DEFAULT_SOURCE)]
        source: String,

        /// Only summarise categories containing this text (case-insensitive)
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Verify that every catalog dataset has a readable data file
    Check {
        /// Site root: a directory or an http(s) base URL
        #[arg(short, long, default_value = DEFAULT_SOURCE)]
        source: String,
    },
}

pub async fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::List { category } => list::run_list(category.as_deref()),
        Command::Show { id, source, json } => show::run_show(&id, &source, json).await,
        Command::Summary { source, category } => {
            summary::run_summary(&source, category.as_deref()).await
        }
        Command::Check { source } => check::run_check(&source).await,
    }
}

/// Case-insensitive substring match used by the `--category` filters.
pub(crate) fn category_matches(category: &str, filter: Option<&str>) -> bool {
    match filter {
        Some(f) => category.to_lowercase().contains(&f.trim().to_lowercase()),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::category_matches;

    #[test]
    fn test_category_matches() {
        assert!(category_matches("Industria y Empresa", Some("industria")));
        assert!(category_matches("Industria y Empresa", Some(" EMPRESA ")));
        assert!(!category_matches("Turismo", Some("industria")));
        assert!(category_matches("Turismo", None));
    }
}
