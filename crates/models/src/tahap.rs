use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

#[cfg(feature = "database")]
use sea_orm::Value;

/// Admission processing stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tahap {
    Satu,
    Dua,
}

impl Tahap {
    /// Compact form stored on registrant rows
    pub fn code(&self) -> &'static str {
        match self {
            Self::Satu => "1",
            Self::Dua => "2",
        }
    }

    /// Human-readable form used on graduation rows and in the dashboard
    pub fn label(&self) -> &'static str {
        match self {
            Self::Satu => "Tahap 1",
            Self::Dua => "Tahap 2",
        }
    }
}

impl FromStr for Tahap {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let number = trimmed
            .get(..5)
            .filter(|prefix| prefix.eq_ignore_ascii_case("tahap"))
            .map_or(trimmed, |_| trimmed[5..].trim());

        match number {
            "1" => Ok(Self::Satu),
            "2" => Ok(Self::Dua),
            _ => Err(format!("Unknown tahap: {s}")),
        }
    }
}

impl Display for Tahap {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.code())
    }
}

impl Serialize for Tahap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for Tahap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(feature = "database")]
impl sea_orm::sea_query::ValueType for Tahap {
    fn try_from(v: Value) -> Result<Self, sea_orm::sea_query::ValueTypeErr> {
        match v {
            Value::String(Some(s)) => s.parse().map_err(|_| sea_orm::sea_query::ValueTypeErr),
            _ => Err(sea_orm::sea_query::ValueTypeErr),
        }
    }

    fn type_name() -> String {
        "Tahap".to_string()
    }

    fn array_type() -> sea_orm::sea_query::ArrayType {
        sea_orm::sea_query::ArrayType::String
    }

    fn column_type() -> sea_orm::sea_query::ColumnType {
        sea_orm::sea_query::ColumnType::Text
    }
}

#[cfg(feature = "database")]
impl From<Tahap> for Value {
    fn from(tahap: Tahap) -> Self {
        Value::String(Some(Box::new(tahap.code().to_owned())))
    }
}

#[cfg(feature = "database")]
impl sea_orm::TryGetable for Tahap {
    fn try_get_by<I: sea_orm::ColIdx>(
        res: &sea_orm::QueryResult,
        index: I,
    ) -> Result<Self, sea_orm::TryGetError> {
        let val: String = res.try_get_by(index)?;

        val.parse().map_err(|e: String| {
            sea_orm::TryGetError::DbErr(sea_orm::DbErr::Type(format!(
                "Failed to parse Tahap: {e}"
            )))
        })
    }
}

#[cfg(feature = "database")]
impl sea_orm::sea_query::Nullable for Tahap {
    fn null() -> Value {
        Value::String(None)
    }
}

#[cfg(test)]
mod tests {
    use super::Tahap;
    use std::str::FromStr;

    #[test]
    fn test_tahap_parsing() {
        assert_eq!(Tahap::from_str("1").unwrap(), Tahap::Satu);
        assert_eq!(Tahap::from_str("Tahap 2").unwrap(), Tahap::Dua);
        assert_eq!(Tahap::from_str(" tahap 1 ").unwrap(), Tahap::Satu);
        assert!(Tahap::from_str("3").is_err());
        assert!(Tahap::from_str("Tahap").is_err());
    }

    #[test]
    fn test_tahap_forms() {
        assert_eq!(Tahap::Dua.to_string(), "2");
        assert_eq!(Tahap::Dua.label(), "Tahap 2");
    }

    #[test]
    fn test_tahap_serde_accepts_both_forms() {
        let parsed: Vec<Tahap> = serde_json::from_str(r#"["1", "Tahap 2"]"#).unwrap();
        assert_eq!(parsed, vec![Tahap::Satu, Tahap::Dua]);
        assert_eq!(serde_json::to_string(&Tahap::Satu).unwrap(), "\"1\"");
    }
}
