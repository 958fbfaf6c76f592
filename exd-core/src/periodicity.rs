use serde::{Deserialize, Serialize};
use std::fmt;

/// How often a dataset is published.
#[derive(Debug, PartialEq, Eq, Clone, Hash, Serialize, Deserialize)]
pub enum Periodicity {
    Monthly,
    Quarterly,
    Annual,
    Other(String),
}

impl From<&str> for Periodicity {
    fn from(raw: &str) -> Self {
        let lower = raw.trim().to_lowercase();
        if lower.contains("mensual") {
            Periodicity::Monthly
        } else if lower.contains("trimestral") {
            Periodicity::Quarterly
        } else if lower.contains("anual") {
            Periodicity::Annual
        } else {
            Periodicity::Other(raw.trim().to_string())
        }
    }
}

impl Periodicity {
    /// The INE Tempus `tip` code for this periodicity.
    pub fn ine_tip(&self) -> Option<&'static str> {
        match self {
            Periodicity::Monthly => Some("M"),
            Periodicity::Quarterly => Some("T"),
            Periodicity::Annual => Some("A"),
            Periodicity::Other(_) => None,
        }
    }
}

impl fmt::Display for Periodicity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Periodicity::Monthly => write!(f, "Mensual"),
            Periodicity::Quarterly => write!(f, "Trimestral"),
            Periodicity::Annual => write!(f, "Anual"),
            Periodicity::Other(raw) => write!(f, "{}", raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Periodicity;

    #[test]
    fn test_from_catalog_strings() {
        assert_eq!(Periodicity::from("Mensual"), Periodicity::Monthly);
        assert_eq!(Periodicity::from(" trimestral "), Periodicity::Quarterly);
        assert_eq!(Periodicity::from("Anual"), Periodicity::Annual);
        assert_eq!(
            Periodicity::from("Semestral"),
            Periodicity::Other("Semestral".to_string())
        );
    }

    #[test]
    fn test_ine_tip() {
        assert_eq!(Periodicity::Monthly.ine_tip(), Some("M"));
        assert_eq!(Periodicity::Quarterly.ine_tip(), Some("T"));
        assert_eq!(Periodicity::Other("x".into()).ine_tip(), None);
    }
}
