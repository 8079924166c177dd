use chrono::NaiveDateTime;
use database::services::setting::SettingValue;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The announcement moment, or its default when never configured
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementDateResponse {
    pub id: String,
    pub tanggal_pengumuman: NaiveDateTime,
    pub exists: bool,
}

impl From<SettingValue<NaiveDateTime>> for AnnouncementDateResponse {
    fn from(setting: SettingValue<NaiveDateTime>) -> Self {
        Self {
            id: setting.id.to_owned(),
            tanggal_pengumuman: setting.value,
            exists: setting.exists,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TahunAjaranSettingResponse {
    pub id: String,
    pub tahun_ajaran: String,
    pub exists: bool,
}

impl From<SettingValue<String>> for TahunAjaranSettingResponse {
    fn from(setting: SettingValue<String>) -> Self {
        Self {
            id: setting.id.to_owned(),
            tahun_ajaran: setting.value,
            exists: setting.exists,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementDateRequest {
    pub tanggal_pengumuman: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TahunAjaranSettingRequest {
    pub tahun_ajaran: String,
}
