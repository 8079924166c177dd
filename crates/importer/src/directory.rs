//! Client for the public school directory API
//!
//! The directory is paged; a page shorter than [`PER_PAGE`] is the last one.
//! Any failure ends the import early, keeping whatever was already written.

use crate::config::DirectoryConfig;
use database::services::sekolah::SekolahService;
use log::{error, info, warn};
use models::input::SekolahInput;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Deserializer};
use thiserror::Error;

pub const PER_PAGE: usize = 100;

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Body of `GET /sekolah`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DirectoryPage {
    pub status: Option<String>,
    #[serde(rename = "dataSekolah")]
    pub data_sekolah: Vec<DirectorySchool>,
}

/// One school as the directory reports it
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DirectorySchool {
    #[serde(deserialize_with = "scalar")]
    pub id: Option<String>,
    #[serde(deserialize_with = "scalar")]
    pub kode_prop: Option<String>,
    #[serde(deserialize_with = "scalar")]
    pub propinsi: Option<String>,
    #[serde(deserialize_with = "scalar")]
    pub kode_kab_kota: Option<String>,
    #[serde(deserialize_with = "scalar")]
    pub kabupaten_kota: Option<String>,
    #[serde(deserialize_with = "scalar")]
    pub kode_kec: Option<String>,
    #[serde(deserialize_with = "scalar")]
    pub kecamatan: Option<String>,
    #[serde(deserialize_with = "scalar")]
    pub npsn: Option<String>,
    #[serde(deserialize_with = "scalar")]
    pub sekolah: Option<String>,
    #[serde(deserialize_with = "scalar")]
    pub bentuk: Option<String>,
    #[serde(deserialize_with = "scalar")]
    pub status: Option<String>,
    #[serde(deserialize_with = "scalar")]
    pub alamat_jalan: Option<String>,
    #[serde(deserialize_with = "scalar")]
    pub lintang: Option<String>,
    #[serde(deserialize_with = "scalar")]
    pub bujur: Option<String>,
}

/// Coordinates and codes show up as either strings or numbers
fn scalar<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn trimmed(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_owned())
}

impl From<DirectorySchool> for SekolahInput {
    fn from(school: DirectorySchool) -> Self {
        Self {
            id: school.id,
            kode_prop: trimmed(school.kode_prop),
            propinsi: school.propinsi,
            kode_kab_kota: trimmed(school.kode_kab_kota),
            kabupaten_kota: school.kabupaten_kota,
            kode_kec: trimmed(school.kode_kec),
            kecamatan: school.kecamatan,
            npsn: school.npsn,
            sekolah: school.sekolah,
            bentuk: school.bentuk,
            status: school.status,
            alamat_jalan: school.alamat_jalan,
            lintang: school.lintang,
            bujur: school.bujur,
        }
    }
}

/// What to do with a fetched page
#[derive(Debug)]
pub enum PageOutcome {
    /// Import these and fetch the next page
    More(Vec<SekolahInput>),
    /// Import these and stop
    Last(Vec<SekolahInput>),
    /// Nothing usable; stop without importing
    Stop,
}

impl DirectoryPage {
    pub fn outcome(self) -> PageOutcome {
        if self.status.as_deref() != Some("success") || self.data_sekolah.is_empty() {
            return PageOutcome::Stop;
        }

        let full = self.data_sekolah.len() >= PER_PAGE;
        let schools = self.data_sekolah.into_iter().map(SekolahInput::from).collect();

        if full {
            PageOutcome::More(schools)
        } else {
            PageOutcome::Last(schools)
        }
    }
}

pub struct DirectoryClient {
    http: reqwest::Client,
    config: DirectoryConfig,
}

impl DirectoryClient {
    pub fn new(config: DirectoryConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    pub fn page_url(&self, page: usize) -> String {
        format!(
            "{}/sekolah?kab_kota={}&page={page}&perPage={PER_PAGE}",
            self.config.api_url, self.config.kab_kota
        )
    }

    pub async fn fetch_page(&self, page: usize) -> Result<DirectoryPage, DirectoryError> {
        let page = self
            .http
            .get(self.page_url(page))
            .send()
            .await?
            .error_for_status()?
            .json::<DirectoryPage>()
            .await?;

        Ok(page)
    }

    /// Walks the directory page by page and writes candidate schools.
    /// Returns the number of rows offered for insert. A failed request or a
    /// failed write ends the walk; pages already written stay written.
    pub async fn import_all(&self, db: &DatabaseConnection) -> usize {
        let mut page = 1;
        let mut total = 0;

        loop {
            info!("Fetching page {page} for kab/kota {}", self.config.kab_kota);

            let fetched = match self.fetch_page(page).await {
                Ok(fetched) => fetched,
                Err(err) => {
                    error!("Error on page {page}: {err}");
                    break;
                }
            };

            let (schools, more) = match fetched.outcome() {
                PageOutcome::More(schools) => (schools, true),
                PageOutcome::Last(schools) => (schools, false),
                PageOutcome::Stop => {
                    warn!("Page {page} had no data, stopping");
                    break;
                }
            };

            let Some(imported) = write_page(db, page, schools).await else {
                break;
            };
            total += imported;
            info!("Imported {imported} schools from page {page}, {total} so far");

            if !more {
                break;
            }
            page += 1;
        }

        total
    }
}

async fn write_page(
    db: &DatabaseConnection,
    page: usize,
    schools: Vec<SekolahInput>,
) -> Option<usize> {
    match SekolahService::import_directory(db, schools).await {
        Ok(imported) => Some(imported),
        Err(err) => {
            error!("Failed to write page {page}: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_of(len: usize) -> DirectoryPage {
        DirectoryPage {
            status: Some("success".to_owned()),
            data_sekolah: (0..len)
                .map(|i| DirectorySchool {
                    id: Some(format!("s{i}")),
                    ..Default::default()
                })
                .collect(),
        }
    }

    #[test]
    fn test_page_url() {
        let client = DirectoryClient::new(DirectoryConfig {
            api_url: "http://localhost".to_owned(),
            kab_kota: "021600".to_owned(),
        });
        assert_eq!(
            client.page_url(3),
            "http://localhost/sekolah?kab_kota=021600&page=3&perPage=100"
        );
    }

    #[test]
    fn test_stop_conditions() {
        assert!(matches!(page_of(PER_PAGE).outcome(), PageOutcome::More(s) if s.len() == PER_PAGE));
        assert!(matches!(page_of(7).outcome(), PageOutcome::Last(s) if s.len() == 7));
        assert!(matches!(page_of(0).outcome(), PageOutcome::Stop));

        let failed = DirectoryPage {
            status: Some("error".to_owned()),
            ..page_of(5)
        };
        assert!(matches!(failed.outcome(), PageOutcome::Stop));
    }

    #[test]
    fn test_parse_directory_page() {
        let body = r#"{
            "status": "success",
            "dataSekolah": [{
                "id": "ABC123",
                "kode_prop": "020000  ",
                "kode_kab_kota": " 021600",
                "kode_kec": "021601 ",
                "kecamatan": "Kec. Lemahsugih",
                "npsn": "20214444",
                "sekolah": "SMPN 1 LEMAHSUGIH",
                "bentuk": "SMP",
                "status": "N",
                "lintang": -7.01,
                "bujur": "108.1"
            }]
        }"#;

        let page: DirectoryPage = serde_json::from_str(body).unwrap();
        let PageOutcome::Last(schools) = page.outcome() else {
            panic!("expected a final page");
        };

        let school = &schools[0];
        assert_eq!(school.kode_prop.as_deref(), Some("020000"));
        assert_eq!(school.kode_kab_kota.as_deref(), Some("021600"));
        assert_eq!(school.kode_kec.as_deref(), Some("021601"));
        assert_eq!(school.lintang.as_deref(), Some("-7.01"));
        assert_eq!(school.propinsi, None);
    }

    #[tokio::test]
    async fn test_write_failure_stops_the_walk() {
        // no tables, so the insert fails
        let db = sea_orm::Database::connect("sqlite::memory:").await.unwrap();
        let schools = vec![SekolahInput {
            id: Some("s1".to_owned()),
            sekolah: Some("SMPN 1 Lemahsugih".to_owned()),
            bentuk: Some("SMP".to_owned()),
            ..Default::default()
        }];

        assert_eq!(write_page(&db, 1, schools).await, None);
        assert_eq!(write_page(&db, 2, Vec::new()).await, Some(0));
    }
}
