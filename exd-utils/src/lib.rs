//! Shared utility functions for EXD crates.

/// Date utility functions
pub mod dates {
    use crate::error::DateError;
    use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime};

    /// Short Spanish month names, as rendered by `es-ES` locales.
    pub const MONTHS_ES: [&str; 12] = [
        "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sept", "oct", "nov", "dic",
    ];

    const DATETIME_FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
    ];

    /// Format a date-time as a short month/year label, e.g. "ene 2025".
    pub fn short_month_label(date: &NaiveDateTime) -> String {
        format!("{} {}", MONTHS_ES[date.month0() as usize], date.year())
    }

    /// Format a date-time as "YYYY-MM".
    pub fn format_period(date: &NaiveDateTime) -> String {
        date.format("%Y-%m").to_string()
    }

    /// Parse an ISO-8601 date or date-time.
    ///
    /// Offsets (`Z`, `+01:00`) are honoured by keeping the wall-clock time of
    /// the record's own offset, so "2025-01-01T00:00:00+01:00" stays in January.
    pub fn parse_iso(s: &str) -> anyhow::Result<NaiveDateTime> {
        let s = s.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(dt.naive_local());
        }
        for fmt in DATETIME_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
                return Ok(dt);
            }
        }
        let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")?;
        Ok(date.and_time(NaiveTime::MIN))
    }

    fn is_digits(s: &str, len: std::ops::RangeInclusive<usize>) -> bool {
        len.contains(&s.len()) && s.bytes().all(|b| b.is_ascii_digit())
    }

    /// Parse an INE period code into the first day of the period.
    ///
    /// Monthly periods look like `2025M09`, quarterly `2025T3`, annual `2025`.
    /// Case and inner whitespace are ignored, so `2025 m 9` is September too.
    pub fn parse_ine_period(s: &str) -> Result<NaiveDate, DateError> {
        let s = s.trim();
        let bad = || DateError(format!("unrecognised INE period '{}'", s));
        let compact: String = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_uppercase();

        let (year, month) = if let Some((year, month)) = compact.split_once('M') {
            if !is_digits(month, 1..=2) {
                return Err(bad());
            }
            (year, month.parse::<u32>().map_err(|_| bad())?)
        } else if let Some((year, quarter)) = compact.split_once('T') {
            let quarter = quarter.parse::<u32>().map_err(|_| bad())?;
            if !(1..=4).contains(&quarter) {
                return Err(bad());
            }
            (year, (quarter - 1) * 3 + 1)
        } else {
            (compact.as_str(), 1)
        };

        if !is_digits(year, 4..=4) {
            return Err(bad());
        }
        let year = year.parse::<i32>().map_err(|_| bad())?;
        NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(bad)
    }

    /// Parse a month written with a slash or dash: `2025-01`, `2025/1`,
    /// `01/2025` or `1-2025`. The four-digit side is the year.
    pub fn parse_month_period(s: &str) -> Result<NaiveDate, DateError> {
        let s = s.trim();
        let bad = || DateError(format!("unrecognised month period '{}'", s));
        let (left, right) = s.split_once(|c| c == '/' || c == '-').ok_or_else(bad)?;

        let (year, month) = if is_digits(left, 4..=4) && is_digits(right, 1..=2) {
            (left, right)
        } else if is_digits(left, 1..=2) && is_digits(right, 4..=4) {
            (right, left)
        } else {
            return Err(bad());
        };
        let year = year.parse::<i32>().map_err(|_| bad())?;
        let month = month.parse::<u32>().map_err(|_| bad())?;
        NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(bad)
    }

    /// Convert epoch milliseconds (UTC) into a naive date-time.
    pub fn from_epoch_millis(millis: i64) -> Option<NaiveDateTime> {
        DateTime::from_timestamp_millis(millis).map(|dt| dt.naive_utc())
    }

    /// Parse any textual date the data files carry: ISO-8601 first, then INE
    /// periods, then slash/dash month periods.
    pub fn parse_observation_date(s: &str) -> Option<NaiveDateTime> {
        if let Ok(dt) = parse_iso(s) {
            return Some(dt);
        }
        parse_ine_period(s)
            .or_else(|_| parse_month_period(s))
            .ok()
            .map(|date| date.and_time(NaiveTime::MIN))
    }

}

/// Number parsing and Spanish-style formatting
pub mod numbers {
    /// Parse a numeric string, accepting Spanish notation ("1.234,5").
    ///
    /// Strings containing a comma are read as Spanish (dots are thousands
    /// separators); anything else is parsed as a plain decimal.
    pub fn parse_number(s: &str) -> Option<f64> {
        let s = s.trim();
        if s.is_empty() || matches!(s.to_lowercase().as_str(), "nan" | "na" | "none") {
            return None;
        }
        if s.contains(',') {
            return s.replace('.', "").replace(',', ".").parse::<f64>().ok();
        }
        s.parse::<f64>().ok()
    }

    /// Format a value with Spanish separators, e.g. 1234.5 -> "1.234,50".
    pub fn format_es(value: f64, decimals: usize) -> String {
        if !value.is_finite() {
            return "s/d".to_string();
        }
        let fixed = format!("{:.*}", decimals, value.abs());
        let (int_part, frac_part) = match fixed.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (fixed.as_str(), None),
        };

        let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
        for (i, ch) in int_part.chars().enumerate() {
            if i > 0 && (int_part.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }

        let sign = if value < 0.0 && fixed.chars().any(|c| c != '0' && c != '.') {
            "-"
        } else {
            ""
        };
        match frac_part {
            Some(frac) => format!("{}{},{}", sign, grouped, frac),
            None => format!("{}{}", sign, grouped),
        }
    }

    /// Percentage change from `previous` to `last`; none when previous is missing or zero.
    pub fn pct_change(last: f64, previous: Option<f64>) -> Option<f64> {
        match previous {
            Some(prev) if prev != 0.0 && prev.is_finite() && last.is_finite() => {
                Some((last - prev) / prev * 100.0)
            }
            _ => None,
        }
    }

}

/// Error types
pub mod error {
    use std::fmt;

    #[derive(Debug)]
    pub struct DateError(pub String);

    impl fmt::Display for DateError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "Date error: {}", self.0)
        }
    }

    impl std::error::Error for DateError {}
}
