use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[schema(as = TahunAjaran)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "tahun_ajaran")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub tahun: String, // e.g. "2026/2027"
    pub tahap: Option<String>,
    pub tanggal_pengumuman: Option<DateTime>,
    pub is_aktif: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
