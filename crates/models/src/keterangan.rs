use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};
use strum::{EnumIter, EnumProperty, IntoEnumIterator};

#[cfg(feature = "database")]
use sea_orm::Value;

/// Where a registrant is in the registration / verification process
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumProperty, EnumIter,
)]
pub enum VerificationStatus {
    #[serde(rename = "Belum Daftar")]
    #[strum(props(display = "Belum Daftar"))]
    BelumDaftar,

    #[serde(rename = "Sudah Daftar")]
    #[strum(props(display = "Sudah Daftar"))]
    SudahDaftar,

    #[serde(rename = "Sudah Verifikasi")]
    #[strum(props(display = "Sudah Verifikasi"))]
    SudahVerifikasi,
}

impl VerificationStatus {
    pub fn as_str(&self) -> &'static str {
        self.get_str("display").unwrap_or_default()
    }
}

impl FromStr for VerificationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::iter()
            .find(|v| v.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown verification status: {s}"))
    }
}

impl Display for VerificationStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(feature = "database")]
impl sea_orm::sea_query::ValueType for VerificationStatus {
    fn try_from(v: Value) -> Result<Self, sea_orm::sea_query::ValueTypeErr> {
        match v {
            Value::String(Some(s)) => s.parse().map_err(|_| sea_orm::sea_query::ValueTypeErr),
            _ => Err(sea_orm::sea_query::ValueTypeErr),
        }
    }

    fn type_name() -> String {
        "VerificationStatus".to_string()
    }

    fn array_type() -> sea_orm::sea_query::ArrayType {
        sea_orm::sea_query::ArrayType::String
    }

    fn column_type() -> sea_orm::sea_query::ColumnType {
        sea_orm::sea_query::ColumnType::Text
    }
}

#[cfg(feature = "database")]
impl From<VerificationStatus> for Value {
    fn from(status: VerificationStatus) -> Self {
        Value::String(Some(Box::new(status.as_str().to_owned())))
    }
}

#[cfg(feature = "database")]
impl sea_orm::TryGetable for VerificationStatus {
    fn try_get_by<I: sea_orm::ColIdx>(
        res: &sea_orm::QueryResult,
        index: I,
    ) -> Result<Self, sea_orm::TryGetError> {
        let val: String = res.try_get_by(index)?;

        val.parse().map_err(|e: String| {
            sea_orm::TryGetError::DbErr(sea_orm::DbErr::Type(format!(
                "Failed to parse VerificationStatus: {e}"
            )))
        })
    }
}

#[cfg(feature = "database")]
impl sea_orm::sea_query::Nullable for VerificationStatus {
    fn null() -> Value {
        Value::String(None)
    }
}

#[cfg(test)]
mod tests {
    use super::VerificationStatus;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_verification_status_parsing() {
        assert_eq!(
            VerificationStatus::from_str("Sudah Verifikasi").unwrap(),
            VerificationStatus::SudahVerifikasi
        );
        assert_eq!(
            VerificationStatus::from_str(" belum daftar ").unwrap(),
            VerificationStatus::BelumDaftar
        );
        assert!(VerificationStatus::from_str("Diterima").is_err());
    }

    #[test]
    fn test_verification_status_round_trip() {
        for status in VerificationStatus::iter() {
            let parsed = VerificationStatus::from_str(&status.to_string()).unwrap();
            assert_eq!(status, parsed);
        }
    }

    #[test]
    fn test_verification_status_serializes_as_label() {
        let json = serde_json::to_string(&VerificationStatus::SudahDaftar).unwrap();
        assert_eq!(json, "\"Sudah Daftar\"");
    }
}
