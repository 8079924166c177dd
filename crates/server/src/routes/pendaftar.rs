use crate::{
    dtos::{
        common::{IdResponse, ListResponse, SuccessResponse},
        params::{PendaftarListParams, TextQueryParams},
    },
    error::ApiResult,
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, Query, State},
};
use database::{
    entities::{pendaftar, sekolah},
    services::pendaftar::{PendaftarQuery, PendaftarService, PendaftarStats},
};
use models::input::PendaftarInput;

#[utoipa::path(
    get,
    path = "/api/pendaftar",
    params(PendaftarListParams),
    responses(
        (status = 200, description = "Registrants matching the filters", body = ListResponse<pendaftar::Model>)
    ),
    security(("jwt" = [])),
    tag = "Pendaftar"
)]
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<PendaftarListParams>,
) -> ApiResult<ListResponse<pendaftar::Model>> {
    let query = PendaftarQuery::from(params);
    let window = query.window;
    let page = PendaftarService::list(&state.db, query).await?;

    Ok(Json(ListResponse::new(page, window)))
}

#[utoipa::path(
    get,
    path = "/api/pendaftar/stats",
    responses(
        (status = 200, description = "Registrant counters", body = PendaftarStats)
    ),
    security(("jwt" = [])),
    tag = "Pendaftar"
)]
pub async fn stats(State(state): State<AppState>) -> ApiResult<PendaftarStats> {
    Ok(Json(PendaftarService::stats(&state.db).await?))
}

/// Creates a registrant, or updates it when the body carries an id
#[utoipa::path(
    post,
    path = "/api/pendaftar",
    request_body = PendaftarInput,
    responses(
        (status = 200, description = "Registrant saved", body = IdResponse<String>),
        (status = 400, description = "Missing name or invalid status"),
        (status = 404, description = "Registrant to update not found")
    ),
    security(("jwt" = [])),
    tag = "Pendaftar"
)]
pub async fn save(
    State(state): State<AppState>,
    Json(input): Json<PendaftarInput>,
) -> ApiResult<IdResponse<String>> {
    let id = PendaftarService::save(&state.db, input).await?;
    Ok(Json(IdResponse { id }))
}

#[utoipa::path(
    delete,
    path = "/api/pendaftar/{id}",
    params(("id" = String, Path, description = "Registrant ID")),
    responses(
        (status = 200, description = "Registrant deleted", body = SuccessResponse)
    ),
    security(("jwt" = [])),
    tag = "Pendaftar"
)]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<SuccessResponse> {
    PendaftarService::delete(&state.db, &id).await?;
    Ok(Json(SuccessResponse::ok()))
}

/// Schools on record whose name resembles a registrant's school of origin
#[utoipa::path(
    get,
    path = "/api/pendaftar/school-candidates",
    params(TextQueryParams),
    responses(
        (status = 200, description = "Up to 50 matching SMP/MTS schools", body = Vec<sekolah::Model>)
    ),
    security(("jwt" = [])),
    tag = "Pendaftar"
)]
pub async fn school_candidates(
    State(state): State<AppState>,
    Query(params): Query<TextQueryParams>,
) -> ApiResult<Vec<sekolah::Model>> {
    let q = params.q.unwrap_or_default();
    Ok(Json(PendaftarService::school_candidates(&state.db, &q).await?))
}
