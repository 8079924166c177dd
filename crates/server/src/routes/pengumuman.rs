use crate::{dtos::params::TextQueryParams, error::ApiResult, state::AppState};
use axum::{
    Json,
    extract::{Query, State},
};
use chrono::Utc;
use database::services::kelulusan::{KelulusanService, ResultLookup};

/// Public graduation lookup by NISN or registration number.
///
/// Reveals nothing until the announcement moment has passed.
#[utoipa::path(
    get,
    path = "/pengumuman",
    params(TextQueryParams),
    responses(
        (status = 200, description = "Lookup outcome", body = ResultLookup)
    ),
    tag = "Pengumuman"
)]
pub async fn lookup(
    State(state): State<AppState>,
    Query(params): Query<TextQueryParams>,
) -> ApiResult<ResultLookup> {
    let q = params.q.unwrap_or_default();
    let result = KelulusanService::lookup_result(&state.db, &q, Utc::now().naive_utc()).await?;
    Ok(Json(result))
}
