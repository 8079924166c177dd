use models::{
    input::StudentImportRow,
    pagination::{Page, Window},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One window of a dashboard table
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page_count: u64,
}

impl<T> ListResponse<T> {
    pub fn new(page: Page<T>, window: Window) -> Self {
        Self {
            page_count: page.page_count(window.limit),
            items: page.items,
            total: page.total,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct IdResponse<T> {
    pub id: T,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeletedResponse {
    pub deleted: u64,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct IdsRequest {
    pub ids: Vec<String>,
}

/// Parsed spreadsheet rows sent by the import dialog
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct StudentImportRequest {
    pub students: Vec<StudentImportRow>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RoleRequest {
    pub role: String,
}

/// Account promoted by the first-user setup, if any account exists
#[derive(Debug, Serialize, ToSchema)]
pub struct ElevatedResponse {
    pub email: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MeResponse {
    pub sub: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_response_page_count() {
        let page = Page {
            items: vec!["a", "b"],
            total: 12,
        };
        let response = ListResponse::new(page, Window::new(Some(5), Some(10)));

        assert_eq!(response.total, 12);
        assert_eq!(response.page_count, 3);
        assert_eq!(response.items, vec!["a", "b"]);
    }

    #[test]
    fn test_import_request_tolerates_missing_rows() {
        let request: StudentImportRequest = serde_json::from_str("{}").unwrap();
        assert!(request.students.is_empty());

        let request: StudentImportRequest =
            serde_json::from_str(r#"{"students":[{"nm_siswa":"Ani","nisn":12345}]}"#).unwrap();
        assert_eq!(request.students[0].nisn.as_deref(), Some("12345"));
    }
}
