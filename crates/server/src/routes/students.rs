use crate::{
    dtos::{
        common::{
            DeletedResponse, IdResponse, IdsRequest, ListResponse, StudentImportRequest,
            SuccessResponse,
        },
        params::StudentListParams,
    },
    error::ApiResult,
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, Query, State},
};
use database::{
    entities::student,
    services::student::{ImportSummary, StudentQuery, StudentService},
};
use models::input::StudentInput;

/// One page of the student table
#[utoipa::path(
    get,
    path = "/api/students",
    params(StudentListParams),
    responses(
        (status = 200, description = "Students matching the filters", body = ListResponse<student::Model>),
        (status = 500, description = "Internal server error")
    ),
    security(("jwt" = [])),
    tag = "Students"
)]
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<StudentListParams>,
) -> ApiResult<ListResponse<student::Model>> {
    let query = StudentQuery::from(params);
    let window = query.window;
    let page = StudentService::list(&state.db, query).await?;

    Ok(Json(ListResponse::new(page, window)))
}

#[utoipa::path(
    post,
    path = "/api/students",
    request_body = StudentInput,
    responses(
        (status = 200, description = "Student created", body = IdResponse<String>),
        (status = 400, description = "Missing name or malformed date"),
        (status = 500, description = "Insert failed, e.g. duplicate NISN")
    ),
    security(("jwt" = [])),
    tag = "Students"
)]
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<StudentInput>,
) -> ApiResult<IdResponse<String>> {
    let id = StudentService::create(&state.db, input).await?;
    Ok(Json(IdResponse { id }))
}

#[utoipa::path(
    put,
    path = "/api/students/{id}",
    params(("id" = String, Path, description = "Student ID")),
    request_body = StudentInput,
    responses(
        (status = 200, description = "Student updated", body = SuccessResponse),
        (status = 400, description = "Missing name or malformed date"),
        (status = 404, description = "Student not found")
    ),
    security(("jwt" = [])),
    tag = "Students"
)]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<StudentInput>,
) -> ApiResult<SuccessResponse> {
    StudentService::update(&state.db, &id, input).await?;
    Ok(Json(SuccessResponse::ok()))
}

#[utoipa::path(
    delete,
    path = "/api/students/{id}",
    params(("id" = String, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student deleted along with its graduation record", body = SuccessResponse)
    ),
    security(("jwt" = [])),
    tag = "Students"
)]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<SuccessResponse> {
    StudentService::delete(&state.db, &id).await?;
    Ok(Json(SuccessResponse::ok()))
}

/// Deletes every listed student; reports 0 when the batch fails
#[utoipa::path(
    post,
    path = "/api/students/bulk-delete",
    request_body = IdsRequest,
    responses(
        (status = 200, description = "Number of deleted students", body = DeletedResponse)
    ),
    security(("jwt" = [])),
    tag = "Students"
)]
pub async fn bulk_delete(
    State(state): State<AppState>,
    Json(request): Json<IdsRequest>,
) -> Json<DeletedResponse> {
    let deleted = StudentService::bulk_delete(&state.db, &request.ids).await;
    Json(DeletedResponse { deleted })
}

/// Imports spreadsheet rows in chunks, counting rows from failed chunks as failed
#[utoipa::path(
    post,
    path = "/api/students/import",
    request_body = StudentImportRequest,
    responses(
        (status = 200, description = "Import summary", body = ImportSummary),
        (status = 400, description = "No rows to import")
    ),
    security(("jwt" = [])),
    tag = "Students"
)]
pub async fn import(
    State(state): State<AppState>,
    Json(request): Json<StudentImportRequest>,
) -> ApiResult<ImportSummary> {
    let summary = StudentService::import(&state.db, request.students).await?;
    Ok(Json(summary))
}

/// Imports rows as a single insert; the caller does its own chunking
#[utoipa::path(
    post,
    path = "/api/students/import-batch",
    request_body = StudentImportRequest,
    responses(
        (status = 200, description = "Import summary", body = ImportSummary)
    ),
    security(("jwt" = [])),
    tag = "Students"
)]
pub async fn import_batch(
    State(state): State<AppState>,
    Json(request): Json<StudentImportRequest>,
) -> ApiResult<ImportSummary> {
    let summary = StudentService::import_batch(&state.db, request.students).await?;
    Ok(Json(summary))
}

/// Distinct academic years present on student records, newest first
#[utoipa::path(
    get,
    path = "/api/students/tahun-ajaran",
    responses(
        (status = 200, description = "Academic year tags", body = Vec<String>)
    ),
    security(("jwt" = [])),
    tag = "Students"
)]
pub async fn tahun_ajaran_options(State(state): State<AppState>) -> ApiResult<Vec<String>> {
    Ok(Json(StudentService::tahun_ajaran_options(&state.db).await?))
}
