use std::env;

/// Public mirror of the Kemendikbud school directory
pub const DEFAULT_SEKOLAH_API_URL: &str = "https://api-sekolah-indonesia.vercel.app";

/// Kabupaten Majalengka
pub const DEFAULT_KAB_KOTA: &str = "021600";

/// Where the school directory import reads from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryConfig {
    pub api_url: String,
    pub kab_kota: String,
}

impl DirectoryConfig {
    /// Reads `SEKOLAH_API_URL` and `SEKOLAH_KAB_KOTA`, loading `.env` first if present
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_values(
            env::var("SEKOLAH_API_URL").ok(),
            env::var("SEKOLAH_KAB_KOTA").ok(),
        )
    }

    fn from_values(api_url: Option<String>, kab_kota: Option<String>) -> Self {
        let api_url = api_url
            .map(|url| url.trim().trim_end_matches('/').to_owned())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_SEKOLAH_API_URL.to_owned());
        let kab_kota = kab_kota
            .map(|code| code.trim().to_owned())
            .filter(|code| !code.is_empty())
            .unwrap_or_else(|| DEFAULT_KAB_KOTA.to_owned());

        Self { api_url, kab_kota }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_and_overrides() {
        let config = DirectoryConfig::from_values(None, Some(" ".to_owned()));
        assert_eq!(config.api_url, DEFAULT_SEKOLAH_API_URL);
        assert_eq!(config.kab_kota, DEFAULT_KAB_KOTA);

        let config = DirectoryConfig::from_values(
            Some("http://localhost:8080/".to_owned()),
            Some("020800".to_owned()),
        );
        assert_eq!(config.api_url, "http://localhost:8080");
        assert_eq!(config.kab_kota, "020800");
    }
}
