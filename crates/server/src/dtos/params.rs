use database::services::{
    kelulusan::KelulusanQuery, pendaftar::PendaftarQuery, sekolah::SekolahQuery,
    student::StudentQuery, user::UserQuery,
};
use models::{filter::FilterValue, pagination::Window};
use serde::Deserialize;
use utoipa::IntoParams;

/// Offset-paged student table
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct StudentListParams {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    /// Substring of the student's name
    pub search: Option<String>,
    /// Academic year tag; `semua` or `all` disables the filter
    pub tahun_ajaran: Option<String>,
}

impl From<StudentListParams> for StudentQuery {
    fn from(params: StudentListParams) -> Self {
        Self {
            window: Window::new(params.limit, params.offset),
            search: FilterValue::search(params.search.as_deref()),
            tahun_ajaran: FilterValue::parse(params.tahun_ajaran.as_deref()),
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PendaftarListParams {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub search: Option<String>,
    pub asal_sekolah: Option<String>,
    pub jalur_masuk: Option<String>,
}

impl From<PendaftarListParams> for PendaftarQuery {
    fn from(params: PendaftarListParams) -> Self {
        Self {
            window: Window::new(params.limit, params.offset),
            search: FilterValue::search(params.search.as_deref()),
            asal_sekolah: FilterValue::parse(params.asal_sekolah.as_deref()),
            jalur_masuk: FilterValue::parse(params.jalur_masuk.as_deref()),
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct SekolahListParams {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    /// Matches the school name, NPSN or district
    pub search: Option<String>,
    pub bentuk: Option<String>,
    pub status: Option<String>,
}

impl From<SekolahListParams> for SekolahQuery {
    fn from(params: SekolahListParams) -> Self {
        Self {
            window: Window::new(params.limit, params.offset),
            search: FilterValue::search(params.search.as_deref()),
            bentuk: FilterValue::parse(params.bentuk.as_deref()),
            status: FilterValue::parse(params.status.as_deref()),
        }
    }
}

/// The graduation table pages by page number rather than offset
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct KelulusanListParams {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    /// Matches the student's name, NISN or registration number
    pub search: Option<String>,
    pub tahap: Option<String>,
    pub jalur: Option<String>,
    pub status: Option<String>,
}

impl From<KelulusanListParams> for KelulusanQuery {
    fn from(params: KelulusanListParams) -> Self {
        Self {
            window: Window::from_page(params.page, params.limit),
            search: FilterValue::search(params.search.as_deref()),
            tahap: FilterValue::parse(params.tahap.as_deref()),
            jalur: FilterValue::parse(params.jalur.as_deref()),
            status: FilterValue::parse(params.status.as_deref()),
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct UserListParams {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub search: Option<String>,
    pub role: Option<String>,
}

impl From<UserListParams> for UserQuery {
    fn from(params: UserListParams) -> Self {
        Self {
            window: Window::new(params.limit, params.offset),
            search: FilterValue::search(params.search.as_deref()),
            role: FilterValue::parse(params.role.as_deref()),
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct SekolahSearchParams {
    pub query: Option<String>,
    /// District code the results must belong to
    pub kec_code: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LocationParams {
    pub query: Option<String>,
}

/// Free-text lookup used by pickers and the public result page
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TextQueryParams {
    pub q: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinels_disable_filters() {
        let query = StudentQuery::from(StudentListParams {
            limit: Some(25),
            offset: Some(50),
            search: Some("  ".to_owned()),
            tahun_ajaran: Some("semua".to_owned()),
        });

        assert_eq!(query.window, Window { limit: 25, offset: 50 });
        assert!(query.search.is_none());
        assert!(query.tahun_ajaran.is_none());
    }

    #[test]
    fn test_search_keeps_sentinel_words() {
        let query = UserQuery::from(UserListParams {
            search: Some("all".to_owned()),
            role: Some("all".to_owned()),
            ..Default::default()
        });

        assert_eq!(query.search.as_ref().map(FilterValue::as_str), Some("all"));
        assert!(query.role.is_none());
    }

    #[test]
    fn test_kelulusan_pages_by_number() {
        let query = KelulusanQuery::from(KelulusanListParams {
            page: Some(3),
            limit: Some(20),
            status: Some("LULUS".to_owned()),
            ..Default::default()
        });

        assert_eq!(query.window.offset, 40);
        assert_eq!(query.status.as_ref().map(FilterValue::as_str), Some("LULUS"));
    }
}
