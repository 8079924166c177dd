use crate::{
    dtos::{
        common::{IdResponse, ListResponse, SuccessResponse},
        params::{LocationParams, SekolahListParams, SekolahSearchParams},
    },
    error::ApiResult,
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, Query, State},
};
use database::{
    entities::sekolah,
    services::sekolah::{Location, SekolahQuery, SekolahService},
};
use models::{filter::FilterValue, input::SekolahInput};

#[utoipa::path(
    get,
    path = "/api/sekolah",
    params(SekolahListParams),
    responses(
        (status = 200, description = "Schools matching the filters", body = ListResponse<sekolah::Model>)
    ),
    security(("jwt" = [])),
    tag = "Sekolah"
)]
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<SekolahListParams>,
) -> ApiResult<ListResponse<sekolah::Model>> {
    let query = SekolahQuery::from(params);
    let window = query.window;
    let page = SekolahService::list(&state.db, query).await?;

    Ok(Json(ListResponse::new(page, window)))
}

/// Creates a school, or updates it when the body carries an id
#[utoipa::path(
    post,
    path = "/api/sekolah",
    request_body = SekolahInput,
    responses(
        (status = 200, description = "School saved", body = IdResponse<String>),
        (status = 400, description = "Missing school name"),
        (status = 404, description = "School to update not found")
    ),
    security(("jwt" = [])),
    tag = "Sekolah"
)]
pub async fn save(
    State(state): State<AppState>,
    Json(input): Json<SekolahInput>,
) -> ApiResult<IdResponse<String>> {
    let id = SekolahService::save(&state.db, input).await?;
    Ok(Json(IdResponse { id }))
}

#[utoipa::path(
    get,
    path = "/api/sekolah/search",
    params(SekolahSearchParams),
    responses(
        (status = 200, description = "Up to 50 schools by name", body = Vec<sekolah::Model>)
    ),
    security(("jwt" = [])),
    tag = "Sekolah"
)]
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SekolahSearchParams>,
) -> ApiResult<Vec<sekolah::Model>> {
    let schools = SekolahService::search(
        &state.db,
        FilterValue::search(params.query.as_deref()),
        FilterValue::parse(params.kec_code.as_deref()),
    )
    .await?;

    Ok(Json(schools))
}

/// Districts whose name matches the query; empty for a blank query
#[utoipa::path(
    get,
    path = "/api/sekolah/locations",
    params(LocationParams),
    responses(
        (status = 200, description = "Up to 10 districts", body = Vec<Location>)
    ),
    security(("jwt" = [])),
    tag = "Sekolah"
)]
pub async fn locations(
    State(state): State<AppState>,
    Query(params): Query<LocationParams>,
) -> ApiResult<Vec<Location>> {
    let Some(query) = FilterValue::search(params.query.as_deref()) else {
        return Ok(Json(Vec::new()));
    };

    Ok(Json(SekolahService::locations(&state.db, &query).await?))
}

#[utoipa::path(
    delete,
    path = "/api/sekolah/{id}",
    params(("id" = String, Path, description = "School ID")),
    responses(
        (status = 200, description = "School deleted", body = SuccessResponse)
    ),
    security(("jwt" = [])),
    tag = "Sekolah"
)]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<SuccessResponse> {
    SekolahService::delete(&state.db, &id).await?;
    Ok(Json(SuccessResponse::ok()))
}
