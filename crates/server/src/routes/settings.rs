use crate::{
    dtos::settings::{
        AnnouncementDateRequest, AnnouncementDateResponse, TahunAjaranSettingRequest,
        TahunAjaranSettingResponse,
    },
    error::{ApiError, ApiResult},
    state::AppState,
};
use axum::{Json, extract::State};
use database::{
    entities::setting, error::ServiceError, services::setting::SettingService,
};
use models::input::parse_datetime;

#[utoipa::path(
    get,
    path = "/api/settings",
    responses(
        (status = 200, description = "Every stored setting row", body = Vec<setting::Model>)
    ),
    security(("jwt" = [])),
    tag = "Settings"
)]
pub async fn all(State(state): State<AppState>) -> ApiResult<Vec<setting::Model>> {
    Ok(Json(SettingService::all(&state.db).await?))
}

#[utoipa::path(
    get,
    path = "/api/settings/announcement-date",
    responses(
        (status = 200, description = "Announcement date, or the default when unset", body = AnnouncementDateResponse)
    ),
    security(("jwt" = [])),
    tag = "Settings"
)]
pub async fn announcement_date(
    State(state): State<AppState>,
) -> ApiResult<AnnouncementDateResponse> {
    let setting = SettingService::announcement_date(&state.db).await?;
    Ok(Json(setting.into()))
}

#[utoipa::path(
    put,
    path = "/api/settings/announcement-date",
    request_body = AnnouncementDateRequest,
    responses(
        (status = 200, description = "Announcement date stored", body = AnnouncementDateResponse),
        (status = 400, description = "Missing or malformed date")
    ),
    security(("jwt" = [])),
    tag = "Settings"
)]
pub async fn update_announcement_date(
    State(state): State<AppState>,
    Json(request): Json<AnnouncementDateRequest>,
) -> ApiResult<AnnouncementDateResponse> {
    let raw = request.tanggal_pengumuman.trim();
    let value = parse_datetime("tanggalPengumuman", (!raw.is_empty()).then_some(raw))
        .map_err(ServiceError::Validation)?
        .ok_or_else(|| {
            ApiError::from(ServiceError::Validation(
                "Tanggal pengumuman tidak boleh kosong".to_owned(),
            ))
        })?;

    SettingService::update_announcement_date(&state.db, value).await?;
    let setting = SettingService::announcement_date(&state.db).await?;
    Ok(Json(setting.into()))
}

#[utoipa::path(
    get,
    path = "/api/settings/tahun-ajaran",
    responses(
        (status = 200, description = "Active academic year setting, or the default when unset", body = TahunAjaranSettingResponse)
    ),
    security(("jwt" = [])),
    tag = "Settings"
)]
pub async fn tahun_ajaran(State(state): State<AppState>) -> ApiResult<TahunAjaranSettingResponse> {
    let setting = SettingService::active_tahun_ajaran(&state.db).await?;
    Ok(Json(setting.into()))
}

#[utoipa::path(
    put,
    path = "/api/settings/tahun-ajaran",
    request_body = TahunAjaranSettingRequest,
    responses(
        (status = 200, description = "Setting stored", body = TahunAjaranSettingResponse),
        (status = 400, description = "Blank academic year")
    ),
    security(("jwt" = [])),
    tag = "Settings"
)]
pub async fn update_tahun_ajaran(
    State(state): State<AppState>,
    Json(request): Json<TahunAjaranSettingRequest>,
) -> ApiResult<TahunAjaranSettingResponse> {
    let tahun = request.tahun_ajaran.trim();
    if tahun.is_empty() {
        return Err(ServiceError::Validation("Tahun ajaran tidak boleh kosong".to_owned()).into());
    }

    SettingService::update_active_tahun_ajaran(&state.db, tahun).await?;
    let setting = SettingService::active_tahun_ajaran(&state.db).await?;
    Ok(Json(setting.into()))
}
