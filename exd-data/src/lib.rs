//! Data processing for dataset observations.
//!
//! This crate turns decoded observation records into forms suitable for
//! charting and summary cards, and owns the selection pipeline that drives
//! the single live chart.

pub mod pipeline;

/// Chart-ready series built from observation records.
pub mod series {
    use exd_core::observation::ObservationRecord;
    use exd_utils::dates::short_month_label;
    use serde::Serialize;

    /// Label used for records whose date could not be parsed.
    pub const INVALID_DATE_LABEL: &str = "Invalid Date";

    /// Categorical labels and numeric values for one line chart.
    ///
    /// `values` may contain `NaN` for malformed records; it serialises as
    /// `null`, which the chart draws as a gap.
    #[derive(Debug, Clone, Serialize, PartialEq)]
    pub struct ChartSeries {
        pub title: String,
        pub labels: Vec<String>,
        pub values: Vec<f64>,
    }

    impl ChartSeries {
        pub fn len(&self) -> usize {
            self.labels.len()
        }

        pub fn is_empty(&self) -> bool {
            self.labels.is_empty()
        }

        pub fn to_json(&self) -> anyhow::Result<String> {
            Ok(serde_json::to_string(self)?)
        }
    }

    /// Stable ascending sort on the parsed date.
    ///
    /// Equal timestamps keep their input order; undated records go last.
    pub fn sort_by_date(records: &mut [ObservationRecord]) {
        records.sort_by(ObservationRecord::cmp_by_date);
    }

    /// Sort records by date and map them to (month label, value) pairs.
    pub fn build_series(title: &str, mut records: Vec<ObservationRecord>) -> ChartSeries {
        sort_by_date(&mut records);
        let (labels, values) = records
            .iter()
            .map(|r| {
                let label = r
                    .fecha
                    .as_ref()
                    .map(short_month_label)
                    .unwrap_or_else(|| INVALID_DATE_LABEL.to_string());
                (label, r.valor)
            })
            .unzip();
        ChartSeries {
            title: title.to_string(),
            labels,
            values,
        }
    }

}

/// Latest-value summaries for indicator cards.
pub mod summary {
    use exd_core::observation::ObservationRecord;
    use exd_utils::dates::format_period;
    use exd_utils::numbers::{format_es, pct_change};
    use serde::Serialize;

    /// Last observation of a series and its change against the one before.
    #[derive(Debug, Clone, Serialize, PartialEq)]
    pub struct SeriesSummary {
        /// "YYYY-MM"
        pub last_period: String,
        pub last_value: f64,
        pub previous_value: Option<f64>,
        pub delta_pct: Option<f64>,
    }

    impl SeriesSummary {
        pub fn value_text(&self) -> String {
            format_es(self.last_value, 2)
        }

        pub fn delta_text(&self) -> String {
            match self.delta_pct {
                Some(delta) if delta >= 0.0 => {
                    format!("▲ {}% vs periodo anterior", format_es(delta, 2))
                }
                Some(delta) => format!("▼ {}% vs periodo anterior", format_es(delta, 2)),
                None => "s/d (sin dato anterior)".to_string(),
            }
        }
    }

    /// Summarise a series, skipping undated or non-numeric records.
    ///
    /// Returns `None` when no usable record remains.
    pub fn summarize(records: &[ObservationRecord]) -> Option<SeriesSummary> {
        let mut usable: Vec<&ObservationRecord> = records
            .iter()
            .filter(|r| r.fecha.is_some() && r.valor.is_finite())
            .collect();
        usable.sort_by(|a, b| a.cmp_by_date(b));

        let last = usable.last()?;
        let previous_value = usable
            .len()
            .checked_sub(2)
            .and_then(|i| usable.get(i))
            .map(|r| r.valor);

        Some(SeriesSummary {
            last_period: last.fecha.as_ref().map(format_period).unwrap_or_default(),
            last_value: last.valor,
            previous_value,
            delta_pct: pct_change(last.valor, previous_value),
        })
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

        fn at(y: i32, m: u32) -> Option<NaiveDateTime> {
            NaiveDate::from_ymd_opt(y, m, 1).map(|d| d.and_time(NaiveTime::MIN))
        }

        #[test]
        fn test_summarize_delta() {
            let records = vec![
                ObservationRecord::new(at(2025, 2), 110.0),
                ObservationRecord::new(at(2025, 1), 100.0),
            ];
            let summary = summarize(&records).unwrap();
            assert_eq!(summary.last_period, "2025-02");
            assert_eq!(summary.last_value, 110.0);
            assert_eq!(summary.previous_value, Some(100.0));
            assert!((summary.delta_pct.unwrap() - 10.0).abs() < 1e-9);
            assert_eq!(summary.delta_text(), "▲ 10,00% vs periodo anterior");
        }

        #[test]
        fn test_summarize_previous_zero_has_no_delta() {
            let records = vec![
                ObservationRecord::new(at(2025, 1), 0.0),
                ObservationRecord::new(at(2025, 2), 4.0),
            ];
            let summary = summarize(&records).unwrap();
            assert_eq!(summary.delta_pct, None);
            assert_eq!(summary.delta_text(), "s/d (sin dato anterior)");
        }

        #[test]
        fn test_summarize_skips_unusable_records() {
            let records = vec![
                ObservationRecord::new(at(2025, 1), 1500.5),
                ObservationRecord::new(at(2025, 2), f64::NAN),
                ObservationRecord::new(None, 9.0),
            ];
            let summary = summarize(&records).unwrap();
            assert_eq!(summary.last_period, "2025-01");
            assert_eq!(summary.previous_value, None);
            assert_eq!(summary.value_text(), "1.500,50");
        }

        #[test]
        fn test_summarize_negative_delta() {
            let records = vec![
                ObservationRecord::new(at(2025, 1), 200.0),
                ObservationRecord::new(at(2025, 2), 150.0),
            ];
            let summary = summarize(&records).unwrap();
            assert_eq!(summary.delta_text(), "▼ -25,00% vs periodo anterior");
        }

        #[test]
        fn test_summarize_empty() {
            assert!(summarize(&[]).is_none());
        }
    }
}
