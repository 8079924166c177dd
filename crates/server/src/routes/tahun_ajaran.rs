use crate::{
    dtos::common::SuccessResponse,
    error::ApiResult,
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, State},
};
use database::{entities::tahun_ajaran, services::tahun_ajaran::TahunAjaranService};
use models::input::{TahunAjaranInput, TahunAjaranUpdate};

#[utoipa::path(
    get,
    path = "/api/tahun-ajaran",
    responses(
        (status = 200, description = "All academic years, newest first", body = Vec<tahun_ajaran::Model>)
    ),
    security(("jwt" = [])),
    tag = "Tahun Ajaran"
)]
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<tahun_ajaran::Model>> {
    Ok(Json(TahunAjaranService::list(&state.db).await?))
}

/// Creates an inactive academic year
#[utoipa::path(
    post,
    path = "/api/tahun-ajaran",
    request_body = TahunAjaranInput,
    responses(
        (status = 200, description = "Academic year created", body = tahun_ajaran::Model),
        (status = 400, description = "Blank year or malformed announcement date"),
        (status = 500, description = "Insert failed, e.g. duplicate year")
    ),
    security(("jwt" = [])),
    tag = "Tahun Ajaran"
)]
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<TahunAjaranInput>,
) -> ApiResult<tahun_ajaran::Model> {
    Ok(Json(TahunAjaranService::create(&state.db, input).await?))
}

#[utoipa::path(
    get,
    path = "/api/tahun-ajaran/active",
    responses(
        (status = 200, description = "The active academic year, or null when none is active", body = tahun_ajaran::Model)
    ),
    security(("jwt" = [])),
    tag = "Tahun Ajaran"
)]
pub async fn active(State(state): State<AppState>) -> ApiResult<Option<tahun_ajaran::Model>> {
    Ok(Json(TahunAjaranService::active(&state.db).await?))
}

#[utoipa::path(
    get,
    path = "/api/tahun-ajaran/options",
    responses(
        (status = 200, description = "Year tags, newest first", body = Vec<String>)
    ),
    security(("jwt" = [])),
    tag = "Tahun Ajaran"
)]
pub async fn options(State(state): State<AppState>) -> ApiResult<Vec<String>> {
    Ok(Json(TahunAjaranService::options(&state.db).await?))
}

#[utoipa::path(
    put,
    path = "/api/tahun-ajaran/{id}",
    params(("id" = String, Path, description = "Academic year ID")),
    request_body = TahunAjaranUpdate,
    responses(
        (status = 200, description = "Academic year updated", body = SuccessResponse),
        (status = 400, description = "Malformed announcement date"),
        (status = 404, description = "Academic year not found")
    ),
    security(("jwt" = [])),
    tag = "Tahun Ajaran"
)]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<TahunAjaranUpdate>,
) -> ApiResult<SuccessResponse> {
    TahunAjaranService::update(&state.db, &id, input).await?;
    Ok(Json(SuccessResponse::ok()))
}

#[utoipa::path(
    delete,
    path = "/api/tahun-ajaran/{id}",
    params(("id" = String, Path, description = "Academic year ID")),
    responses(
        (status = 200, description = "Academic year deleted", body = SuccessResponse),
        (status = 404, description = "Academic year not found")
    ),
    security(("jwt" = [])),
    tag = "Tahun Ajaran"
)]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<SuccessResponse> {
    TahunAjaranService::delete(&state.db, &id).await?;
    Ok(Json(SuccessResponse::ok()))
}

/// Makes this year the only active one and mirrors it into the settings
#[utoipa::path(
    post,
    path = "/api/tahun-ajaran/{id}/activate",
    params(("id" = String, Path, description = "Academic year ID")),
    responses(
        (status = 200, description = "The newly active year", body = tahun_ajaran::Model),
        (status = 404, description = "Academic year not found; the active year is unchanged")
    ),
    security(("jwt" = [])),
    tag = "Tahun Ajaran"
)]
pub async fn activate(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<tahun_ajaran::Model> {
    Ok(Json(TahunAjaranService::set_active(&state.db, &id).await?))
}
