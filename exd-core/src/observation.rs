use anyhow::{bail, Context};
use chrono::NaiveDateTime;
use exd_utils::dates::{from_epoch_millis, parse_ine_period, parse_observation_date};
use exd_utils::numbers::parse_number;
use serde::Serialize;
use serde_json::Value;
use std::cmp::Ordering;

/// Keys that may carry the observation date, in lookup order.
const DATE_KEYS: [&str; 3] = ["Fecha", "Periodo", "period"];

/// Keys that may carry the observation value, in lookup order.
const VALUE_KEYS: [&str; 2] = ["Valor", "value"];

/// Numbers above this are epoch milliseconds; below it, a bare year.
const EPOCH_MILLIS_THRESHOLD: f64 = 10_000_000.0;

/// One time-stamped data point of a dataset.
///
/// Malformed rows are kept: `fecha` is `None` when no date could be parsed
/// and `valor` is `NaN` when the value is missing or not numeric. Other
/// dimensions in the source row are ignored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObservationRecord {
    pub fecha: Option<NaiveDateTime>,
    pub valor: f64,
}

impl ObservationRecord {
    pub fn new(fecha: Option<NaiveDateTime>, valor: f64) -> Self {
        Self { fecha, valor }
    }

    /// Ascending by date; records without a date order after all dated ones.
    pub fn cmp_by_date(&self, other: &Self) -> Ordering {
        match (&self.fecha, &other.fecha) {
            (Some(a), Some(b)) => a.cmp(b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }

    /// Decode a processed data file.
    ///
    /// Accepted shapes: a bare array of rows, `{"Data": [...]}`, or
    /// `[{"Data": [...]}]`.
    pub fn parse_observations(body: &str) -> anyhow::Result<Vec<ObservationRecord>> {
        let value: Value = serde_json::from_str(body).context("invalid JSON")?;
        let rows = match value {
            Value::Array(items) => {
                if items.len() == 1 && items[0].get("Data").is_some() {
                    let data = items
                        .into_iter()
                        .next()
                        .and_then(|mut wrapper| wrapper.get_mut("Data").map(Value::take));
                    expect_rows(data)?
                } else {
                    items
                }
            }
            Value::Object(mut wrapper) => expect_rows(wrapper.remove("Data"))?,
            other => bail!("expected a JSON array of observations, found {}", kind(&other)),
        };

        rows.iter()
            .enumerate()
            .map(|(i, row)| {
                ObservationRecord::try_from(row).with_context(|| format!("observation {}", i))
            })
            .collect()
    }
}

fn expect_rows(data: Option<Value>) -> anyhow::Result<Vec<Value>> {
    match data {
        Some(Value::Array(items)) => Ok(items),
        Some(other) => bail!("expected \"Data\" to be an array, found {}", kind(&other)),
        None => bail!("expected a JSON array or an object with a \"Data\" array"),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn first_present<'a>(row: &'a serde_json::Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| row.get(*k))
        .find(|v| !v.is_null())
}

fn date_from_json(value: &Value) -> Option<NaiveDateTime> {
    match value {
        Value::String(s) => parse_observation_date(s),
        Value::Number(n) => {
            let n = n.as_f64()?;
            if n > EPOCH_MILLIS_THRESHOLD {
                from_epoch_millis(n as i64)
            } else {
                parse_ine_period(&format!("{}", n as i64))
                    .ok()
                    .map(|d| d.and_time(chrono::NaiveTime::MIN))
            }
        }
        _ => None,
    }
}

fn value_from_json(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => parse_number(s).unwrap_or(f64::NAN),
        _ => f64::NAN,
    }
}

impl TryFrom<&Value> for ObservationRecord {
    type Error = anyhow::Error;

    fn try_from(row: &Value) -> Result<Self, Self::Error> {
        let Value::Object(fields) = row else {
            bail!("expected an object, found {}", kind(row));
        };
        let fecha = first_present(fields, &DATE_KEYS).and_then(date_from_json);
        let valor = first_present(fields, &VALUE_KEYS)
            .map(value_from_json)
            .unwrap_or(f64::NAN);
        Ok(ObservationRecord { fecha, valor })
    }
}

#[cfg(test)]
mod tests {
    use super::ObservationRecord;
    use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

    fn ymd(y: i32, m: u32, d: u32) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(y, m, d).map(|d| d.and_time(NaiveTime::MIN))
    }

    // Shape written by the data pipeline: records with ISO dates plus other dimensions.
    const PROCESSED: &str = r#"[
        {"Fecha":"2025-02-01T00:00:00.000","Comunidades y Ciudades Autónomas":"Extremadura","Valor":101.3},
        {"Fecha":"2025-01-01T00:00:00.000","Comunidades y Ciudades Autónomas":"Extremadura","Valor":100.9}
    ]"#;

    #[test]
    fn test_parse_processed_records() {
        let records = ObservationRecord::parse_observations(PROCESSED).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].fecha, ymd(2025, 2, 1));
        assert_eq!(records[0].valor, 101.3);
        assert_eq!(records[1].fecha, ymd(2025, 1, 1));
    }

    #[test]
    fn test_parse_data_wrappers() {
        let wrapped = r#"[{"Data":[{"Periodo":"2024M11","Valor":"1.234,5"}]}]"#;
        let records = ObservationRecord::parse_observations(wrapped).unwrap();
        assert_eq!(records, vec![ObservationRecord::new(ymd(2024, 11, 1), 1234.5)]);

        let object = r#"{"Data":[{"Fecha":1735689600000,"value":3}]}"#;
        let records = ObservationRecord::parse_observations(object).unwrap();
        assert_eq!(records, vec![ObservationRecord::new(ymd(2025, 1, 1), 3.0)]);
    }

    #[test]
    fn test_parse_month_period_spellings() {
        for period in ["2025-01", "01/2025", "2025/01", "2025 m 1", "2025m01"] {
            let body = format!(r#"[{{"period":"{}","value":3}}]"#, period);
            let records = ObservationRecord::parse_observations(&body).unwrap();
            assert_eq!(
                records,
                vec![ObservationRecord::new(ymd(2025, 1, 1), 3.0)],
                "period {}",
                period
            );
        }
    }

    #[test]
    fn test_malformed_rows_propagate() {
        let body = r#"[{"Fecha":"garbage","Valor":null},{"Valor":"n/a"},{"Fecha":"2025T2"}]"#;
        let records = ObservationRecord::parse_observations(body).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].fecha, None);
        assert!(records[0].valor.is_nan());
        assert_eq!(records[1].fecha, None);
        assert!(records[1].valor.is_nan());
        assert_eq!(records[2].fecha, ymd(2025, 4, 1));
        assert!(records[2].valor.is_nan());
    }

    #[test]
    fn test_parse_rejects_wrong_shapes() {
        assert!(ObservationRecord::parse_observations("not json").is_err());
        assert!(ObservationRecord::parse_observations("42").is_err());
        assert!(ObservationRecord::parse_observations(r#"{"rows":[]}"#).is_err());
        assert!(ObservationRecord::parse_observations(r#"[1, 2]"#).is_err());
    }

    #[test]
    fn test_empty_array_is_valid() {
        let records = ObservationRecord::parse_observations("[]").unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_cmp_by_date_puts_undated_last() {
        let dated = ObservationRecord::new(ymd(2025, 1, 1), 1.0);
        let undated = ObservationRecord::new(None, 2.0);
        assert_eq!(dated.cmp_by_date(&undated), std::cmp::Ordering::Less);
        assert_eq!(undated.cmp_by_date(&dated), std::cmp::Ordering::Greater);
    }
}
