use crate::{
    entities::{pendaftar, sekolah},
    error::{Result, ServiceError},
    services::{
        query::{fetch_window, ilike},
        sekolah::SekolahService,
        tahun_ajaran::TahunAjaranService,
    },
};
use chrono::Utc;
use log::info;
use models::{
    filter::FilterValue,
    input::{PendaftarInput, parse_date},
    keterangan::VerificationStatus,
    pagination::{Page, Window},
    tahap::Tahap,
};
use sea_orm::{
    ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect,
    sea_query::{Expr, Func, SimpleExpr},
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Default)]
pub struct PendaftarQuery {
    pub window: Window,
    pub search: Option<FilterValue>,
    pub asal_sekolah: Option<FilterValue>,
    pub jalur_masuk: Option<FilterValue>,
}

/// Dashboard counters for the registrant table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PendaftarStats {
    pub total: u64,
    pub verified: u64,
    pub unverified: u64,
    pub tahap1: u64,
    pub tahap2: u64,
}

/// `COUNT(CASE WHEN <condition> THEN 1 END)`
fn count_where(condition: SimpleExpr) -> SimpleExpr {
    Func::count(Expr::case(condition, Expr::val(1))).into()
}

pub struct PendaftarService;

impl PendaftarService {
    pub async fn list(
        db: &DatabaseConnection,
        query: PendaftarQuery,
    ) -> Result<Page<pendaftar::Model>, DbErr> {
        let mut condition = Condition::all();
        if let Some(search) = &query.search {
            condition = condition.add(ilike(pendaftar::Column::NmLengkap, search));
        }
        if let Some(asal) = &query.asal_sekolah {
            condition = condition.add(ilike(pendaftar::Column::AsalSekolah, asal));
        }
        if let Some(jalur) = &query.jalur_masuk {
            condition = condition.add(pendaftar::Column::JalurMasuk.eq(jalur.as_str()));
        }

        let select = pendaftar::Entity::find()
            .filter(condition)
            .order_by_asc(pendaftar::Column::NmLengkap)
            .order_by_asc(pendaftar::Column::Id);

        fetch_window(db, select, query.window).await
    }

    /// All counters come from one aggregate query, so they describe the same snapshot
    pub async fn stats(db: &DatabaseConnection) -> Result<PendaftarStats, DbErr> {
        let counts = pendaftar::Entity::find()
            .select_only()
            .column_as(Expr::col(pendaftar::Column::Id).count(), "total")
            .column_as(
                count_where(pendaftar::Column::Keterangan.eq(VerificationStatus::SudahVerifikasi)),
                "verified",
            )
            .column_as(count_where(pendaftar::Column::Tahap.eq(Tahap::Satu)), "tahap1")
            .column_as(count_where(pendaftar::Column::Tahap.eq(Tahap::Dua)), "tahap2")
            .into_tuple::<(i64, i64, i64, i64)>()
            .one(db)
            .await?;

        let Some((total, verified, tahap1, tahap2)) = counts else {
            return Ok(PendaftarStats::default());
        };
        let [total, verified, tahap1, tahap2] =
            [total, verified, tahap1, tahap2].map(|n| u64::try_from(n).unwrap_or_default());

        // Anything not verified counts as unverified, including rows with no status
        Ok(PendaftarStats {
            total,
            verified,
            unverified: total.saturating_sub(verified),
            tahap1,
            tahap2,
        })
    }

    /// Updates when the payload carries an id, inserts otherwise. Blank fields
    /// are stored as null.
    pub async fn save(db: &DatabaseConnection, input: PendaftarInput) -> Result<String> {
        let input = input.normalized();
        let nm_lengkap = input
            .validate()
            .map_err(ServiceError::Validation)?
            .to_owned();
        let keterangan = input.keterangan().map_err(ServiceError::Validation)?;
        let tahap = input.tahap().map_err(ServiceError::Validation)?;
        let tanggal_lahir = parse_date("tanggalLahir", input.tanggal_lahir.as_deref())
            .map_err(ServiceError::Validation)?;

        let now = Utc::now().naive_utc();
        let mut model = pendaftar::ActiveModel {
            nm_lengkap: Set(nm_lengkap),
            tempat_lahir: Set(input.tempat_lahir),
            tanggal_lahir: Set(tanggal_lahir),
            alamat: Set(input.alamat),
            asal_sekolah: Set(input.asal_sekolah),
            no_handphone: Set(input.no_handphone),
            tahun_lulus: Set(input.tahun_lulus),
            jalur_masuk: Set(input.jalur_masuk),
            keterangan: Set(keterangan),
            tahap: Set(tahap),
            updated_at: Set(now),
            ..Default::default()
        };

        match input.id {
            Some(id) => {
                if let Some(tahun) = input.tahun_ajaran {
                    model.tahun_ajaran = Set(Some(tahun));
                }

                let result = pendaftar::Entity::update_many()
                    .set(model)
                    .filter(pendaftar::Column::Id.eq(id.as_str()))
                    .exec(db)
                    .await?;

                if result.rows_affected == 0 {
                    return Err(ServiceError::NotFound(
                        "Pendaftar tidak ditemukan".to_owned(),
                    ));
                }

                info!("Updated pendaftar {id}");
                Ok(id)
            }
            None => {
                let tahun_ajaran = match input.tahun_ajaran {
                    Some(tahun) => Some(tahun),
                    None => TahunAjaranService::active_tahun(db).await?,
                };

                let id = Uuid::new_v4().to_string();
                model.id = Set(id.clone());
                model.tahun_ajaran = Set(tahun_ajaran);
                model.created_at = Set(now);

                pendaftar::Entity::insert(model)
                    .exec_without_returning(db)
                    .await?;

                info!("Created pendaftar {id}");
                Ok(id)
            }
        }
    }

    pub async fn delete(db: &DatabaseConnection, id: &str) -> Result<()> {
        pendaftar::Entity::delete_by_id(id).exec(db).await?;
        info!("Deleted pendaftar {id}");
        Ok(())
    }

    /// Schools on record whose name resembles a registrant's free-text school of origin
    pub async fn school_candidates(
        db: &DatabaseConnection,
        asal_sekolah: &str,
    ) -> Result<Vec<sekolah::Model>, DbErr> {
        SekolahService::search(db, FilterValue::search(Some(asal_sekolah)), None).await
    }
}
