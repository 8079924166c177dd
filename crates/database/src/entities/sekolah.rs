use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Candidate school reference data
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[schema(as = Sekolah)]
#[sea_orm(table_name = "sekolah")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub kode_prop: Option<String>,
    pub propinsi: Option<String>,
    pub kode_kab_kota: Option<String>,
    pub kabupaten_kota: Option<String>,
    pub kode_kec: Option<String>,
    pub kecamatan: Option<String>,
    pub npsn: Option<String>,
    pub sekolah: Option<String>,
    pub bentuk: Option<String>, // SMP, MTS, ...
    pub status: Option<String>, // N (negeri) or S (swasta)
    pub alamat_jalan: Option<String>,
    pub lintang: Option<String>,
    pub bujur: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
