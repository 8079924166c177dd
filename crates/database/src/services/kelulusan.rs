use crate::{
    entities::{kelulusan, student},
    error::{Result, ServiceError},
    services::{query::ilike, setting::SettingService, tahun_ajaran::TahunAjaranService},
};
use chrono::{NaiveDateTime, Utc};
use log::{debug, info};
use models::{
    filter::FilterValue,
    input::{BulkKelulusanInput, KelulusanInput, KelulusanUpdate, blank_to_none},
    pagination::{PaginationMeta, Window},
};
use sea_orm::{
    ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    FromQueryResult, JoinType, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait, TransactionTrait, sea_query::Expr,
};
use serde::Serialize;
use std::collections::HashSet;
use utoipa::ToSchema;

/// Shortest query the student picker searches for
const MIN_STUDENT_QUERY_LEN: usize = 2;
const STUDENT_SEARCH_LIMIT: u64 = 10;

#[derive(Debug, Clone, Default)]
pub struct KelulusanQuery {
    pub window: Window,
    pub search: Option<FilterValue>,
    pub tahap: Option<FilterValue>,
    pub jalur: Option<FilterValue>,
    pub status: Option<FilterValue>,
}

/// A graduation row joined with the student it belongs to
#[derive(Debug, Clone, PartialEq, Serialize, FromQueryResult, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct KelulusanRow {
    pub id: i32,
    pub jalur: Option<String>,
    pub status: String,
    pub tahap: String,
    pub student_id: String,
    pub student_name: Option<String>,
    pub student_nisn: Option<String>,
    pub no_daftar: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct KelulusanList {
    pub data: Vec<KelulusanRow>,
    pub pagination: PaginationMeta,
}

/// Minimal student projection for the graduation form's picker
#[derive(Debug, Clone, PartialEq, Serialize, FromQueryResult, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentSummary {
    pub id: String,
    pub nm_siswa: String,
    pub nisn: Option<String>,
    pub no_daftar: Option<String>,
}

/// Outcome of a bulk assignment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct BulkSummary {
    pub imported: usize,
    pub skipped: usize,
}

/// What the public result page shows for a lookup
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum ResultLookup {
    #[serde(rename_all = "camelCase")]
    NotYetAnnounced { tanggal_pengumuman: NaiveDateTime },
    #[serde(rename_all = "camelCase")]
    Found {
        nm_siswa: String,
        nisn: Option<String>,
        no_daftar: Option<String>,
        status: String,
        jalur: Option<String>,
        tahap: String,
    },
    NotFound,
}

pub struct KelulusanService;

impl KelulusanService {
    pub async fn list(db: &DatabaseConnection, query: KelulusanQuery) -> Result<KelulusanList, DbErr> {
        let mut condition = Condition::all();
        if let Some(search) = &query.search {
            condition = condition.add(Self::student_match(search));
        }
        if let Some(tahap) = &query.tahap {
            condition = condition.add(kelulusan::Column::Tahap.eq(tahap.as_str()));
        }
        if let Some(jalur) = &query.jalur {
            condition = condition.add(kelulusan::Column::Jalur.eq(jalur.as_str()));
        }
        if let Some(status) = &query.status {
            condition = condition.add(kelulusan::Column::Status.eq(status.as_str()));
        }

        let select = kelulusan::Entity::find()
            .select_only()
            .column(kelulusan::Column::Id)
            .column(kelulusan::Column::Jalur)
            .column(kelulusan::Column::Status)
            .column(kelulusan::Column::Tahap)
            .column(kelulusan::Column::StudentId)
            .column_as(student::Column::NmSiswa, "student_name")
            .column_as(student::Column::Nisn, "student_nisn")
            .column_as(student::Column::NoDaftar, "no_daftar")
            .join(JoinType::LeftJoin, kelulusan::Relation::Student.def())
            .filter(condition)
            .order_by_desc(kelulusan::Column::Id);

        let total = select.clone().count(db).await?;
        let data = select
            .limit(query.window.limit)
            .offset(query.window.offset)
            .into_model::<KelulusanRow>()
            .all(db)
            .await?;

        Ok(KelulusanList {
            data,
            pagination: PaginationMeta::new(query.window, total),
        })
    }

    /// Students matching `q` by name, NISN or registration number
    pub async fn search_students(
        db: &DatabaseConnection,
        q: &str,
    ) -> Result<Vec<StudentSummary>, DbErr> {
        let Some(needle) = FilterValue::search(Some(q))
            .filter(|n| n.as_str().chars().count() >= MIN_STUDENT_QUERY_LEN)
        else {
            return Ok(Vec::new());
        };

        student::Entity::find()
            .select_only()
            .column(student::Column::Id)
            .column(student::Column::NmSiswa)
            .column(student::Column::Nisn)
            .column(student::Column::NoDaftar)
            .filter(Self::student_match(&needle))
            .order_by_asc(student::Column::NmSiswa)
            .limit(STUDENT_SEARCH_LIMIT)
            .into_model::<StudentSummary>()
            .all(db)
            .await
    }

    /// Records one student's outcome. The duplicate check and the insert run
    /// in the same transaction.
    pub async fn create(db: &DatabaseConnection, input: KelulusanInput) -> Result<i32> {
        let input = input.normalized();
        input.validate().map_err(ServiceError::Validation)?;

        let txn = db.begin().await?;

        if student::Entity::find_by_id(input.student_id.as_str())
            .one(&txn)
            .await?
            .is_none()
        {
            txn.rollback().await?;
            return Err(ServiceError::NotFound("Siswa tidak ditemukan".to_owned()));
        }

        let existing = kelulusan::Entity::find()
            .filter(kelulusan::Column::StudentId.eq(input.student_id.as_str()))
            .count(&txn)
            .await?;
        if existing > 0 {
            txn.rollback().await?;
            return Err(ServiceError::Conflict(
                "Siswa ini sudah memiliki data kelulusan.".to_owned(),
            ));
        }

        let now = Utc::now().naive_utc();
        let result = kelulusan::Entity::insert(kelulusan::ActiveModel {
            student_id: Set(input.student_id.clone()),
            jalur: Set(input.jalur),
            status: Set(input.status),
            tahap: Set(input.tahap),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        })
        .exec(&txn)
        .await?;

        txn.commit().await?;

        info!(
            "Created kelulusan {} for student {}",
            result.last_insert_id, input.student_id
        );
        Ok(result.last_insert_id)
    }

    pub async fn update(db: &DatabaseConnection, id: i32, input: KelulusanUpdate) -> Result<()> {
        let mut update = kelulusan::Entity::update_many()
            .col_expr(
                kelulusan::Column::UpdatedAt,
                Expr::value(Utc::now().naive_utc()),
            )
            .filter(kelulusan::Column::Id.eq(id));

        if let Some(jalur) = input.jalur {
            update = update.col_expr(kelulusan::Column::Jalur, Expr::value(blank_to_none(jalur)));
        }
        if let Some(status) = input.status {
            let status = blank_to_none(Some(status)).ok_or_else(|| {
                ServiceError::Validation("Status kelulusan tidak boleh kosong".to_owned())
            })?;
            update = update.col_expr(kelulusan::Column::Status, Expr::value(status));
        }
        if let Some(tahap) = input.tahap {
            let tahap = blank_to_none(Some(tahap))
                .ok_or_else(|| ServiceError::Validation("Tahap tidak boleh kosong".to_owned()))?;
            update = update.col_expr(kelulusan::Column::Tahap, Expr::value(tahap));
        }

        let result = update.exec(db).await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(
                "Data kelulusan tidak ditemukan".to_owned(),
            ));
        }

        Ok(())
    }

    pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<()> {
        kelulusan::Entity::delete_by_id(id).exec(db).await?;
        info!("Deleted kelulusan {id}");
        Ok(())
    }

    /// Gives every listed student the same outcome, skipping students that
    /// already have one. Safe to repeat: a second call with the same ids
    /// inserts nothing.
    pub async fn bulk_assign(
        db: &DatabaseConnection,
        input: BulkKelulusanInput,
    ) -> Result<BulkSummary> {
        let input = input.normalized();
        if input.student_ids.is_empty() {
            return Ok(BulkSummary::default());
        }
        input.validate().map_err(ServiceError::Validation)?;

        let requested = input.student_ids.len();
        let txn = db.begin().await?;

        let existing: HashSet<String> = kelulusan::Entity::find()
            .select_only()
            .column(kelulusan::Column::StudentId)
            .filter(kelulusan::Column::StudentId.is_in(input.student_ids.iter().map(String::as_str)))
            .into_tuple::<String>()
            .all(&txn)
            .await?
            .into_iter()
            .collect();

        let mut seen = HashSet::new();
        let fresh: Vec<String> = input
            .student_ids
            .into_iter()
            .filter(|id| !existing.contains(id) && seen.insert(id.clone()))
            .collect();

        if fresh.is_empty() {
            txn.commit().await?;
            debug!("Bulk kelulusan: all {requested} students already assigned");
            return Ok(BulkSummary {
                imported: 0,
                skipped: requested,
            });
        }

        let now = Utc::now().naive_utc();
        let rows = fresh.iter().map(|student_id| kelulusan::ActiveModel {
            student_id: Set(student_id.clone()),
            jalur: Set(input.jalur.clone()),
            status: Set(input.status.clone()),
            tahap: Set(input.tahap.clone()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        });

        kelulusan::Entity::insert_many(rows)
            .exec_without_returning(&txn)
            .await?;
        txn.commit().await?;

        let summary = BulkSummary {
            imported: fresh.len(),
            skipped: requested - fresh.len(),
        };
        info!(
            "Bulk kelulusan: {} imported, {} skipped",
            summary.imported, summary.skipped
        );
        Ok(summary)
    }

    /// Public result lookup by exact NISN or registration number. Nothing is
    /// revealed before the announcement moment.
    pub async fn lookup_result(
        db: &DatabaseConnection,
        query: &str,
        now: NaiveDateTime,
    ) -> Result<ResultLookup, DbErr> {
        let announced_at = match TahunAjaranService::active(db)
            .await?
            .and_then(|year| year.tanggal_pengumuman)
        {
            Some(at) => at,
            None => SettingService::announcement_date(db).await?.value,
        };

        if now < announced_at {
            return Ok(ResultLookup::NotYetAnnounced {
                tanggal_pengumuman: announced_at,
            });
        }

        let query = query.trim();
        if query.is_empty() {
            return Ok(ResultLookup::NotFound);
        }

        let found = student::Entity::find()
            .filter(
                Condition::any()
                    .add(student::Column::Nisn.eq(query))
                    .add(student::Column::NoDaftar.eq(query)),
            )
            .find_also_related(kelulusan::Entity)
            .one(db)
            .await?;

        Ok(match found {
            Some((student, Some(outcome))) => ResultLookup::Found {
                nm_siswa: student.nm_siswa,
                nisn: student.nisn,
                no_daftar: student.no_daftar,
                status: outcome.status,
                jalur: outcome.jalur,
                tahap: outcome.tahap,
            },
            _ => ResultLookup::NotFound,
        })
    }

    fn student_match(needle: &FilterValue) -> Condition {
        Condition::any()
            .add(ilike((student::Entity, student::Column::NmSiswa), needle))
            .add(ilike((student::Entity, student::Column::Nisn), needle))
            .add(ilike((student::Entity, student::Column::NoDaftar), needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        services::student::StudentService,
        test_utils::{init_test_logging, setup_test_db},
    };
    use chrono::{Duration, NaiveDate};
    use models::input::{StudentInput, TahunAjaranInput};
    use sea_orm::Database;

    async fn add_student(db: &DatabaseConnection, name: &str, nisn: &str) -> String {
        StudentService::create(
            db,
            StudentInput {
                nm_siswa: Some(name.to_owned()),
                nisn: Some(nisn.to_owned()),
                no_daftar: Some(format!("REG-{nisn}")),
                ..Default::default()
            },
        )
        .await
        .unwrap()
    }

    fn outcome(student_id: &str) -> KelulusanInput {
        KelulusanInput {
            student_id: student_id.to_owned(),
            jalur: Some("ZONASI".to_owned()),
            status: "LULUS".to_owned(),
            tahap: "Tahap 1".to_owned(),
        }
    }

    fn bulk(ids: &[String]) -> BulkKelulusanInput {
        BulkKelulusanInput {
            student_ids: ids.to_vec(),
            jalur: Some("ZONASI".to_owned()),
            status: "LULUS".to_owned(),
            tahap: "Tahap 1".to_owned(),
        }
    }

    #[tokio::test]
    async fn test_bulk_assign_is_idempotent() {
        let db = setup_test_db().await;
        let mut ids = Vec::new();
        for i in 0..4 {
            ids.push(add_student(&db, &format!("Siswa {i}"), &format!("10{i}")).await);
        }

        let first = KelulusanService::bulk_assign(&db, bulk(&ids)).await.unwrap();
        assert_eq!(first, BulkSummary { imported: 4, skipped: 0 });

        let second = KelulusanService::bulk_assign(&db, bulk(&ids)).await.unwrap();
        assert_eq!(second, BulkSummary { imported: 0, skipped: 4 });

        assert_eq!(kelulusan::Entity::find().count(&db).await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_bulk_assign_empty_touches_nothing() {
        init_test_logging();
        // No tables exist, so any query would fail
        let db = Database::connect("sqlite::memory:").await.unwrap();

        let summary = KelulusanService::bulk_assign(&db, bulk(&[])).await.unwrap();
        assert_eq!(summary, BulkSummary::default());
    }

    #[tokio::test]
    async fn test_bulk_assign_skips_existing_rows() {
        let db = setup_test_db().await;
        let a = add_student(&db, "Ani", "201").await;
        let b = add_student(&db, "Budi", "202").await;
        let c = add_student(&db, "Citra", "203").await;
        KelulusanService::create(&db, outcome(&b)).await.unwrap();

        let ids = vec![a.clone(), b.clone(), c.clone()];
        let summary = KelulusanService::bulk_assign(&db, bulk(&ids)).await.unwrap();
        assert_eq!(summary, BulkSummary { imported: 2, skipped: 1 });

        for id in [&a, &b, &c] {
            let rows = kelulusan::Entity::find()
                .filter(kelulusan::Column::StudentId.eq(id.as_str()))
                .count(&db)
                .await
                .unwrap();
            assert_eq!(rows, 1);
        }
    }

    #[tokio::test]
    async fn test_bulk_assign_collapses_repeated_ids() {
        let db = setup_test_db().await;
        let a = add_student(&db, "Dewi", "301").await;

        let ids = vec![a.clone(), a.clone()];
        let summary = KelulusanService::bulk_assign(&db, bulk(&ids)).await.unwrap();
        assert_eq!(summary, BulkSummary { imported: 1, skipped: 1 });
        assert_eq!(kelulusan::Entity::find().count(&db).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_create_rejects_second_outcome() {
        let db = setup_test_db().await;
        let id = add_student(&db, "Eka", "401").await;

        KelulusanService::create(&db, outcome(&id)).await.unwrap();
        let err = KelulusanService::create(&db, outcome(&id)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
        assert_eq!(err.to_string(), "Siswa ini sudah memiliki data kelulusan.");

        let err = KelulusanService::create(&db, outcome("missing"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_joins_student_and_filters() {
        let db = setup_test_db().await;
        let a = add_student(&db, "Fajar", "501").await;
        let b = add_student(&db, "Gita", "502").await;
        KelulusanService::create(&db, outcome(&a)).await.unwrap();
        KelulusanService::create(
            &db,
            KelulusanInput {
                status: "CADANGAN".to_owned(),
                tahap: "Tahap 2".to_owned(),
                ..outcome(&b)
            },
        )
        .await
        .unwrap();

        let all = KelulusanService::list(
            &db,
            KelulusanQuery {
                status: FilterValue::parse(Some("all")),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(all.pagination.total, 2);
        // Newest first
        assert_eq!(all.data[0].student_name.as_deref(), Some("Gita"));

        let by_reg = KelulusanService::list(
            &db,
            KelulusanQuery {
                search: FilterValue::search(Some("reg-501")),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(by_reg.data.len(), 1);
        assert_eq!(by_reg.data[0].student_nisn.as_deref(), Some("501"));

        let cadangan = KelulusanService::list(
            &db,
            KelulusanQuery {
                status: FilterValue::parse(Some("CADANGAN")),
                tahap: FilterValue::parse(Some("Tahap 2")),
                window: Window::from_page(Some(1), Some(1)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(cadangan.pagination.page_count, 1);
        assert_eq!(cadangan.data[0].student_id, b);
    }

    #[tokio::test]
    async fn test_update_outcome() {
        let db = setup_test_db().await;
        let id = add_student(&db, "Hadi", "601").await;
        let row = KelulusanService::create(&db, outcome(&id)).await.unwrap();

        let change: KelulusanUpdate =
            serde_json::from_str(r#"{"status": "TIDAK LULUS", "jalur": null}"#).unwrap();
        KelulusanService::update(&db, row, change).await.unwrap();

        let stored = kelulusan::Entity::find_by_id(row)
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, "TIDAK LULUS");
        assert_eq!(stored.jalur, None);
        assert_eq!(stored.tahap, "Tahap 1");

        let err = KelulusanService::update(&db, row + 100, KelulusanUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_search_students_needs_two_characters() {
        let db = setup_test_db().await;
        add_student(&db, "Indah", "701").await;
        add_student(&db, "Indra", "702").await;

        assert!(KelulusanService::search_students(&db, "i").await.unwrap().is_empty());
        let found = KelulusanService::search_students(&db, "ind").await.unwrap();
        assert_eq!(found.len(), 2);
        let by_nisn = KelulusanService::search_students(&db, "702").await.unwrap();
        assert_eq!(by_nisn[0].nm_siswa, "Indra");
    }

    #[tokio::test]
    async fn test_lookup_result_respects_announcement() {
        let db = setup_test_db().await;
        let announce = NaiveDate::from_ymd_opt(2026, 6, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
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
        TahunAjaranService::set_active(&db, &year.id).await.unwrap();

        let id = add_student(&db, "Joko", "801").await;
        KelulusanService::create(&db, outcome(&id)).await.unwrap();
        add_student(&db, "Kiki", "802").await;

        let early = KelulusanService::lookup_result(&db, "801", announce - Duration::minutes(1))
            .await
            .unwrap();
        assert_eq!(
            early,
            ResultLookup::NotYetAnnounced {
                tanggal_pengumuman: announce
            }
        );

        let after = announce + Duration::hours(1);
        match KelulusanService::lookup_result(&db, "REG-801", after)
            .await
            .unwrap()
        {
            ResultLookup::Found {
                nm_siswa, status, ..
            } => {
                assert_eq!(nm_siswa, "Joko");
                assert_eq!(status, "LULUS");
            }
            other => panic!("unexpected lookup result: {other:?}"),
        }

        let no_outcome = KelulusanService::lookup_result(&db, "802", after)
            .await
            .unwrap();
        assert_eq!(no_outcome, ResultLookup::NotFound);

        let partial = KelulusanService::lookup_result(&db, "80", after)
            .await
            .unwrap();
        assert_eq!(partial, ResultLookup::NotFound);
    }
}
