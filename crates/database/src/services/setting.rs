use crate::entities::setting;
use chrono::{NaiveDate, NaiveDateTime, Utc};
use log::info;
use sea_orm::{
    ActiveValue::Set, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, QueryOrder,
    sea_query::OnConflict,
};
use serde::Serialize;

/// Key of the announcement date row
pub const ANNOUNCEMENT_DATE_KEY: &str = "announcement_date";

/// Key of the row mirroring the active academic year
pub const ACTIVE_TAHUN_AJARAN_KEY: &str = "tahun_ajaran_aktif";

/// Academic year reported when none has been configured yet
pub const DEFAULT_TAHUN_AJARAN: &str = "2026/2027";

/// Announcement moment reported when none has been configured yet
pub fn default_announcement_date() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 6, 1)
        .and_then(|d| d.and_hms_opt(8, 0, 0))
        .unwrap_or_default()
}

/// A setting value, or its default when the row does not exist yet
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingValue<T> {
    pub id: &'static str,
    pub value: T,
    pub exists: bool,
}

pub struct SettingService;

impl SettingService {
    pub async fn announcement_date(
        db: &DatabaseConnection,
    ) -> Result<SettingValue<NaiveDateTime>, DbErr> {
        let row = setting::Entity::find_by_id(ANNOUNCEMENT_DATE_KEY).one(db).await?;

        Ok(match row.and_then(|r| r.tanggal_pengumuman) {
            Some(value) => SettingValue {
                id: ANNOUNCEMENT_DATE_KEY,
                value,
                exists: true,
            },
            None => SettingValue {
                id: ANNOUNCEMENT_DATE_KEY,
                value: default_announcement_date(),
                exists: false,
            },
        })
    }

    pub async fn update_announcement_date<C: ConnectionTrait>(
        db: &C,
        tanggal_pengumuman: NaiveDateTime,
    ) -> Result<NaiveDateTime, DbErr> {
        let now = Utc::now().naive_utc();
        let row = setting::ActiveModel {
            id: Set(ANNOUNCEMENT_DATE_KEY.to_owned()),
            tanggal_pengumuman: Set(Some(tanggal_pengumuman)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        setting::Entity::insert(row)
            .on_conflict(
                OnConflict::column(setting::Column::Id)
                    .update_columns([
                        setting::Column::TanggalPengumuman,
                        setting::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(db)
            .await?;

        info!("Announcement date set to {tanggal_pengumuman}");
        Ok(tanggal_pengumuman)
    }

    pub async fn active_tahun_ajaran(
        db: &DatabaseConnection,
    ) -> Result<SettingValue<String>, DbErr> {
        let row = setting::Entity::find_by_id(ACTIVE_TAHUN_AJARAN_KEY)
            .one(db)
            .await?;

        Ok(match row.and_then(|r| r.tahun_ajaran) {
            Some(value) => SettingValue {
                id: ACTIVE_TAHUN_AJARAN_KEY,
                value,
                exists: true,
            },
            None => SettingValue {
                id: ACTIVE_TAHUN_AJARAN_KEY,
                value: DEFAULT_TAHUN_AJARAN.to_owned(),
                exists: false,
            },
        })
    }

    /// Upserts the active-year mirror. Takes any connection so that activating an
    /// academic year can update it inside the same transaction.
    pub async fn update_active_tahun_ajaran<C: ConnectionTrait>(
        db: &C,
        tahun_ajaran: &str,
    ) -> Result<(), DbErr> {
        let now = Utc::now().naive_utc();
        let row = setting::ActiveModel {
            id: Set(ACTIVE_TAHUN_AJARAN_KEY.to_owned()),
            tahun_ajaran: Set(Some(tahun_ajaran.to_owned())),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        setting::Entity::insert(row)
            .on_conflict(
                OnConflict::column(setting::Column::Id)
                    .update_columns([setting::Column::TahunAjaran, setting::Column::UpdatedAt])
                    .to_owned(),
            )
            .exec_without_returning(db)
            .await?;

        info!("Active tahun ajaran setting set to {tahun_ajaran}");
        Ok(())
    }

    pub async fn all(db: &DatabaseConnection) -> Result<Vec<setting::Model>, DbErr> {
        setting::Entity::find()
            .order_by_asc(setting::Column::Id)
            .all(db)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_test_db;

    #[tokio::test]
    async fn test_announcement_date_defaults_until_set() {
        let db = setup_test_db().await;

        let initial = SettingService::announcement_date(&db).await.unwrap();
        assert!(!initial.exists);
        assert_eq!(initial.value, default_announcement_date());

        let date = NaiveDate::from_ymd_opt(2026, 7, 1)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        SettingService::update_announcement_date(&db, date)
            .await
            .unwrap();

        let stored = SettingService::announcement_date(&db).await.unwrap();
        assert!(stored.exists);
        assert_eq!(stored.value, date);
    }

    #[tokio::test]
    async fn test_upsert_keeps_a_single_row() {
        let db = setup_test_db().await;

        SettingService::update_active_tahun_ajaran(&db, "2026/2027")
            .await
            .unwrap();
        SettingService::update_active_tahun_ajaran(&db, "2027/2028")
            .await
            .unwrap();

        let active = SettingService::active_tahun_ajaran(&db).await.unwrap();
        assert_eq!(active.value, "2027/2028");

        let all = SettingService::all(&db).await.unwrap();
        assert_eq!(all.len(), 1);
    }
}
