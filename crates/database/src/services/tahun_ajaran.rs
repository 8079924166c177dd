use crate::{
    entities::tahun_ajaran,
    error::{Result, ServiceError},
    services::setting::SettingService,
};
use chrono::Utc;
use log::info;
use models::input::{TahunAjaranInput, TahunAjaranUpdate, blank_to_none};
use sea_orm::{
    ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, TransactionTrait, sea_query::Expr,
};
use uuid::Uuid;

pub struct TahunAjaranService;

impl TahunAjaranService {
    pub async fn list(db: &DatabaseConnection) -> Result<Vec<tahun_ajaran::Model>> {
        Ok(tahun_ajaran::Entity::find()
            .order_by_desc(tahun_ajaran::Column::Tahun)
            .all(db)
            .await?)
    }

    /// The academic year currently flagged active, if any
    pub async fn active(db: &DatabaseConnection) -> Result<Option<tahun_ajaran::Model>, DbErr> {
        tahun_ajaran::Entity::find()
            .filter(tahun_ajaran::Column::IsAktif.eq(true))
            .order_by_desc(tahun_ajaran::Column::UpdatedAt)
            .one(db)
            .await
    }

    /// The tag stamped on newly created students and registrants
    pub async fn active_tahun(db: &DatabaseConnection) -> Result<Option<String>, DbErr> {
        Ok(Self::active(db).await?.map(|year| year.tahun))
    }

    /// Creates an inactive academic year
    pub async fn create(
        db: &DatabaseConnection,
        input: TahunAjaranInput,
    ) -> Result<tahun_ajaran::Model> {
        input.validate().map_err(ServiceError::Validation)?;
        let tanggal_pengumuman = input
            .tanggal_pengumuman()
            .map_err(ServiceError::Validation)?;

        let now = Utc::now().naive_utc();
        let model = tahun_ajaran::Model {
            id: Uuid::new_v4().to_string(),
            tahun: input.tahun.trim().to_owned(),
            tahap: blank_to_none(input.tahap),
            tanggal_pengumuman,
            is_aktif: false,
            created_at: now,
            updated_at: now,
        };

        let active_model: tahun_ajaran::ActiveModel = model.clone().into();
        tahun_ajaran::Entity::insert(active_model)
            .exec_without_returning(db)
            .await?;

        info!("Created tahun ajaran {}", model.tahun);
        Ok(model)
    }

    pub async fn update(db: &DatabaseConnection, id: &str, input: TahunAjaranUpdate) -> Result<()> {
        let tanggal_pengumuman = input
            .tanggal_pengumuman()
            .map_err(ServiceError::Validation)?;

        let mut update = tahun_ajaran::Entity::update_many()
            .col_expr(
                tahun_ajaran::Column::UpdatedAt,
                Expr::value(Utc::now().naive_utc()),
            )
            .filter(tahun_ajaran::Column::Id.eq(id));

        if let Some(tahun) = blank_to_none(input.tahun) {
            update = update.col_expr(tahun_ajaran::Column::Tahun, Expr::value(tahun));
        }
        if let Some(tahap) = input.tahap {
            update = update.col_expr(tahun_ajaran::Column::Tahap, Expr::value(blank_to_none(tahap)));
        }
        if let Some(tanggal) = tanggal_pengumuman {
            update = update.col_expr(tahun_ajaran::Column::TanggalPengumuman, Expr::value(tanggal));
        }

        let result = update.exec(db).await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(
                "Tahun ajaran tidak ditemukan".to_owned(),
            ));
        }

        Ok(())
    }

    /// Makes `id` the only active academic year and mirrors its tag into the
    /// `tahun_ajaran_aktif` setting. Runs in one transaction, so an unknown id
    /// leaves the previous active year untouched.
    pub async fn set_active(db: &DatabaseConnection, id: &str) -> Result<tahun_ajaran::Model> {
        let txn = db.begin().await?;

        let Some(target) = tahun_ajaran::Entity::find_by_id(id).one(&txn).await? else {
            txn.rollback().await?;
            return Err(ServiceError::NotFound(
                "Tahun ajaran tidak ditemukan".to_owned(),
            ));
        };

        let now = Utc::now().naive_utc();
        tahun_ajaran::Entity::update_many()
            .col_expr(tahun_ajaran::Column::IsAktif, Expr::value(false))
            .col_expr(tahun_ajaran::Column::UpdatedAt, Expr::value(now))
            .filter(tahun_ajaran::Column::IsAktif.eq(true))
            .exec(&txn)
            .await?;

        tahun_ajaran::Entity::update_many()
            .col_expr(tahun_ajaran::Column::IsAktif, Expr::value(true))
            .col_expr(tahun_ajaran::Column::UpdatedAt, Expr::value(now))
            .filter(tahun_ajaran::Column::Id.eq(id))
            .exec(&txn)
            .await?;

        SettingService::update_active_tahun_ajaran(&txn, &target.tahun).await?;

        txn.commit().await?;

        info!("Activated tahun ajaran {}", target.tahun);
        Ok(tahun_ajaran::Model {
            is_aktif: true,
            updated_at: now,
            ..target
        })
    }

    pub async fn delete(db: &DatabaseConnection, id: &str) -> Result<()> {
        let result = tahun_ajaran::Entity::delete_by_id(id).exec(db).await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(
                "Tahun ajaran tidak ditemukan".to_owned(),
            ));
        }

        info!("Deleted tahun ajaran {id}");
        Ok(())
    }

    /// Year tags for dropdowns, newest first
    pub async fn options(db: &DatabaseConnection) -> Result<Vec<String>, DbErr> {
        tahun_ajaran::Entity::find()
            .select_only()
            .column(tahun_ajaran::Column::Tahun)
            .order_by_desc(tahun_ajaran::Column::Tahun)
            .into_tuple()
            .all(db)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_test_db;

    async fn create_year(db: &DatabaseConnection, tahun: &str) -> tahun_ajaran::Model {
        TahunAjaranService::create(
            db,
            TahunAjaranInput {
                tahun: tahun.to_owned(),
                ..Default::default()
            },
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_only_one_year_is_active() {
        let db = setup_test_db().await;
        let first = create_year(&db, "2025/2026").await;
        let second = create_year(&db, "2026/2027").await;

        TahunAjaranService::set_active(&db, &first.id).await.unwrap();
        TahunAjaranService::set_active(&db, &second.id).await.unwrap();

        let active: Vec<_> = TahunAjaranService::list(&db)
            .await
            .unwrap()
            .into_iter()
            .filter(|year| year.is_aktif)
            .collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, second.id);

        let mirrored = SettingService::active_tahun_ajaran(&db).await.unwrap();
        assert_eq!(mirrored.value, "2026/2027");
    }

    #[tokio::test]
    async fn test_activating_unknown_year_keeps_current() {
        let db = setup_test_db().await;
        let year = create_year(&db, "2026/2027").await;
        TahunAjaranService::set_active(&db, &year.id).await.unwrap();

        let err = TahunAjaranService::set_active(&db, "missing")
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));

        let active = TahunAjaranService::active_tahun(&db).await.unwrap();
        assert_eq!(active.as_deref(), Some("2026/2027"));
    }

    #[tokio::test]
    async fn test_update_can_clear_announcement() {
        let db = setup_test_db().await;
        let year = TahunAjaranService::create(
            &db,
            TahunAjaranInput {
                tahun: "2026/2027".to_owned(),
                tahap: None,
                tanggal_pengumuman: Some("2026-06-01T08:00".to_owned()),
            },
        )
        .await
        .unwrap();
        assert!(year.tanggal_pengumuman.is_some());

        let clear: TahunAjaranUpdate =
            serde_json::from_str(r#"{"tanggalPengumuman": null}"#).unwrap();
        TahunAjaranService::update(&db, &year.id, clear).await.unwrap();

        let stored = tahun_ajaran::Entity::find_by_id(year.id.as_str())
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.tanggal_pengumuman, None);
        assert_eq!(stored.tahun, "2026/2027");
    }

    #[tokio::test]
    async fn test_options_are_newest_first() {
        let db = setup_test_db().await;
        create_year(&db, "2024/2025").await;
        create_year(&db, "2026/2027").await;
        create_year(&db, "2025/2026").await;

        let options = TahunAjaranService::options(&db).await.unwrap();
        assert_eq!(options, vec!["2026/2027", "2025/2026", "2024/2025"]);
    }

    #[tokio::test]
    async fn test_create_requires_tahun() {
        let db = setup_test_db().await;
        let err = TahunAjaranService::create(&db, TahunAjaranInput::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }
}
