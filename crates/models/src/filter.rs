/// Values that the dashboard sends when a dropdown filter is left on "everything"
const SENTINELS: [&str; 2] = ["semua", "all"];

/// A categorical or text filter coming from a query string
///
/// Absent values, blank values and the sentinels `semua` / `all` all mean
/// "do not filter on this field".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterValue(String);

impl FilterValue {
    /// Parses a raw query parameter, returning `None` when it should not filter
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        let value = raw?.trim();

        if value.is_empty()
            || SENTINELS
                .iter()
                .any(|sentinel| value.eq_ignore_ascii_case(sentinel))
        {
            return None;
        }

        Some(Self(value.to_owned()))
    }

    /// Same as [`FilterValue::parse`], but for free-text search boxes where the
    /// sentinels are legitimate search terms
    pub fn search(raw: Option<&str>) -> Option<Self> {
        let value = raw?.trim();
        (!value.is_empty()).then(|| Self(value.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `LIKE` pattern for a case-insensitive substring match against a lowercased column
    pub fn contains_pattern(&self) -> String {
        format!("%{}%", self.0.to_lowercase())
    }
}

impl From<FilterValue> for String {
    fn from(value: FilterValue) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::FilterValue;

    #[test]
    fn test_sentinels_are_not_filters() {
        assert_eq!(FilterValue::parse(None), None);
        assert_eq!(FilterValue::parse(Some("")), None);
        assert_eq!(FilterValue::parse(Some("   ")), None);
        assert_eq!(FilterValue::parse(Some("semua")), None);
        assert_eq!(FilterValue::parse(Some("SEMUA")), None);
        assert_eq!(FilterValue::parse(Some("all")), None);
    }

    #[test]
    fn test_real_values_are_trimmed() {
        let filter = FilterValue::parse(Some(" ZONASI ")).unwrap();
        assert_eq!(filter.as_str(), "ZONASI");
    }

    #[test]
    fn test_search_keeps_sentinel_words() {
        assert_eq!(
            FilterValue::search(Some("semua")).map(String::from),
            Some("semua".to_owned())
        );
        assert_eq!(FilterValue::search(Some(" ")), None);
    }

    #[test]
    fn test_contains_pattern_is_lowercase() {
        let filter = FilterValue::search(Some("SMP Negeri")).unwrap();
        assert_eq!(filter.contains_pattern(), "%smp negeri%");
    }
}
