use crate::{
    dtos::{
        common::{IdResponse, SuccessResponse},
        params::{KelulusanListParams, TextQueryParams},
    },
    error::ApiResult,
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, Query, State},
};
use database::services::kelulusan::{
    BulkSummary, KelulusanList, KelulusanQuery, KelulusanService, StudentSummary,
};
use models::input::{BulkKelulusanInput, KelulusanInput, KelulusanUpdate};

/// Graduation rows joined with their students, newest first
#[utoipa::path(
    get,
    path = "/api/kelulusan",
    params(KelulusanListParams),
    responses(
        (status = 200, description = "One page of graduation records", body = KelulusanList)
    ),
    security(("jwt" = [])),
    tag = "Kelulusan"
)]
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<KelulusanListParams>,
) -> ApiResult<KelulusanList> {
    let list = KelulusanService::list(&state.db, KelulusanQuery::from(params)).await?;
    Ok(Json(list))
}

#[utoipa::path(
    post,
    path = "/api/kelulusan",
    request_body = KelulusanInput,
    responses(
        (status = 200, description = "Graduation record created", body = IdResponse<i32>),
        (status = 400, description = "Missing student, status or phase"),
        (status = 404, description = "Student not found"),
        (status = 409, description = "Student already has a graduation record")
    ),
    security(("jwt" = [])),
    tag = "Kelulusan"
)]
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<KelulusanInput>,
) -> ApiResult<IdResponse<i32>> {
    let id = KelulusanService::create(&state.db, input).await?;
    Ok(Json(IdResponse { id }))
}

/// Applies one outcome to many students, skipping those already recorded
#[utoipa::path(
    post,
    path = "/api/kelulusan/bulk",
    request_body = BulkKelulusanInput,
    responses(
        (status = 200, description = "Imported and skipped counts", body = BulkSummary),
        (status = 400, description = "Missing status or phase")
    ),
    security(("jwt" = [])),
    tag = "Kelulusan"
)]
pub async fn bulk_assign(
    State(state): State<AppState>,
    Json(input): Json<BulkKelulusanInput>,
) -> ApiResult<BulkSummary> {
    Ok(Json(KelulusanService::bulk_assign(&state.db, input).await?))
}

/// Student picker for the graduation form; needs at least two characters
#[utoipa::path(
    get,
    path = "/api/kelulusan/students",
    params(TextQueryParams),
    responses(
        (status = 200, description = "Up to 10 matching students", body = Vec<StudentSummary>)
    ),
    security(("jwt" = [])),
    tag = "Kelulusan"
)]
pub async fn search_students(
    State(state): State<AppState>,
    Query(params): Query<TextQueryParams>,
) -> ApiResult<Vec<StudentSummary>> {
    let q = params.q.unwrap_or_default();
    Ok(Json(KelulusanService::search_students(&state.db, &q).await?))
}

#[utoipa::path(
    put,
    path = "/api/kelulusan/{id}",
    params(("id" = i32, Path, description = "Graduation record ID")),
    request_body = KelulusanUpdate,
    responses(
        (status = 200, description = "Graduation record updated", body = SuccessResponse),
        (status = 404, description = "Graduation record not found")
    ),
    security(("jwt" = [])),
    tag = "Kelulusan"
)]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<KelulusanUpdate>,
) -> ApiResult<SuccessResponse> {
    KelulusanService::update(&state.db, id, input).await?;
    Ok(Json(SuccessResponse::ok()))
}

#[utoipa::path(
    delete,
    path = "/api/kelulusan/{id}",
    params(("id" = i32, Path, description = "Graduation record ID")),
    responses(
        (status = 200, description = "Graduation record deleted", body = SuccessResponse)
    ),
    security(("jwt" = [])),
    tag = "Kelulusan"
)]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<SuccessResponse> {
    KelulusanService::delete(&state.db, id).await?;
    Ok(Json(SuccessResponse::ok()))
}
