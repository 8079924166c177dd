use crate::dtos::common::MeResponse;
use axum::{Extension, Json, http::StatusCode};
use tower_oauth2_resource_server::claims::DefaultClaims;

/// Returns the subject identifier from the caller's JWT claims
#[utoipa::path(
    get,
    path = "/api/me",
    responses(
        (status = 200, description = "Successfully authenticated", body = MeResponse),
        (status = 401, description = "Unauthorized - invalid or missing JWT"),
        (status = 500, description = "Internal server error - missing subject in claims")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Authentication"
)]
pub async fn me(claims: Extension<DefaultClaims>) -> Result<Json<MeResponse>, StatusCode> {
    let sub = claims
        .sub
        .as_ref()
        .ok_or(StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(Json(MeResponse { sub: sub.clone() }))
}
