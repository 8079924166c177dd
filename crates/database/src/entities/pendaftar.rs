use models::{keterangan::VerificationStatus, tahap::Tahap};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Applicant record, kept separate from `student` until enrollment
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[schema(as = Pendaftar)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "pendaftar")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub nm_lengkap: String,
    pub tempat_lahir: Option<String>,
    pub tanggal_lahir: Option<Date>,
    pub alamat: Option<String>,
    pub asal_sekolah: Option<String>, // Free text, matched against `sekolah` on demand
    pub no_handphone: Option<String>,
    pub tahun_lulus: Option<String>,
    pub jalur_masuk: Option<String>,
    #[schema(value_type = Option<String>)]
    pub keterangan: Option<VerificationStatus>,
    #[schema(value_type = Option<String>)]
    pub tahap: Option<Tahap>,
    pub tahun_ajaran: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
