use crate::{
    dtos::{
        common::{ElevatedResponse, ListResponse, RoleRequest, SuccessResponse},
        params::UserListParams,
    },
    error::ApiResult,
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, Query, State},
};
use database::{
    entities::user,
    services::user::{UserQuery, UserService},
};

#[utoipa::path(
    get,
    path = "/api/users",
    params(UserListParams),
    responses(
        (status = 200, description = "Accounts matching the filters, newest first", body = ListResponse<user::Model>)
    ),
    security(("jwt" = [])),
    tag = "Users"
)]
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<UserListParams>,
) -> ApiResult<ListResponse<user::Model>> {
    let query = UserQuery::from(params);
    let window = query.window;
    let page = UserService::list(&state.db, query).await?;

    Ok(Json(ListResponse::new(page, window)))
}

#[utoipa::path(
    put,
    path = "/api/users/{id}/role",
    params(("id" = String, Path, description = "User ID")),
    request_body = RoleRequest,
    responses(
        (status = 200, description = "Role updated", body = SuccessResponse),
        (status = 400, description = "Role is neither admin nor user"),
        (status = 404, description = "User not found")
    ),
    security(("jwt" = [])),
    tag = "Users"
)]
pub async fn set_role(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<RoleRequest>,
) -> ApiResult<SuccessResponse> {
    UserService::set_role(&state.db, &id, &request.role).await?;
    Ok(Json(SuccessResponse::ok()))
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User removed", body = SuccessResponse),
        (status = 404, description = "User not found")
    ),
    security(("jwt" = [])),
    tag = "Users"
)]
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<SuccessResponse> {
    UserService::remove(&state.db, &id).await?;
    Ok(Json(SuccessResponse::ok()))
}

/// Promotes the earliest registered account to admin
#[utoipa::path(
    post,
    path = "/api/users/elevate-first",
    responses(
        (status = 200, description = "Promoted account, or null when there are none", body = ElevatedResponse)
    ),
    security(("jwt" = [])),
    tag = "Users"
)]
pub async fn elevate_first(State(state): State<AppState>) -> ApiResult<ElevatedResponse> {
    let email = UserService::elevate_first_user(&state.db).await?;
    Ok(Json(ElevatedResponse { email }))
}
