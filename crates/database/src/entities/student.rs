use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[schema(as = Student)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "student")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub nis: Option<String>,
    #[sea_orm(unique)]
    pub nisn: Option<String>,
    pub no_daftar: Option<String>, // Registration number printed on the admission card
    pub nm_siswa: String,
    pub tempat_lahir: Option<String>,
    pub tanggal_lahir: Option<Date>,
    pub jenis_kelamin: Option<String>,
    pub agama: Option<String>,
    pub alamat_siswa: Option<String>,
    pub telepon_siswa: Option<String>,
    pub diterima_tanggal: Option<Date>,

    // Parent/guardian
    pub nm_ayah: Option<String>,
    pub nm_ibu: Option<String>,
    pub pekerjaan_ayah: Option<String>,
    pub pekerjaan_ibu: Option<String>,
    pub nm_wali: Option<String>,
    pub pekerjaan_wali: Option<String>,

    // Supplementary admission data
    pub status_dalam_kel: Option<String>,
    pub anak_ke: Option<String>,
    pub sekolah_asal: Option<String>,
    pub diterima_kelas: Option<String>,
    pub alamat_ortu: Option<String>,
    pub telepon_ortu: Option<String>,
    pub alamat_wali: Option<String>,
    pub telepon_wali: Option<String>,
    pub foto_siswa: Option<String>,
    pub no_ijasahnas: Option<String>,
    pub tgl_lulus: Option<Date>,
    pub no_transkrip: Option<String>,

    pub tahun_ajaran: Option<String>, // e.g. "2026/2027"
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::kelulusan::Entity")]
    Kelulusan,
}

impl Related<super::kelulusan::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Kelulusan.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
