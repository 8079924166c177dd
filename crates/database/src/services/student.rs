use crate::{
    entities::student,
    error::{Result, ServiceError},
    services::{
        query::{fetch_window, ilike},
        tahun_ajaran::TahunAjaranService,
    },
};
use chrono::{NaiveDateTime, Utc};
use log::{error, info, warn};
use models::{
    filter::FilterValue,
    input::{StudentImportRow, StudentInput, parse_date},
    pagination::{Page, Window},
};
use sea_orm::{
    ActiveValue::{NotSet, Set},
    ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use serde::Serialize;
use std::collections::HashSet;
use utoipa::ToSchema;
use uuid::Uuid;

/// Rows written per insert statement during a spreadsheet import
pub const IMPORT_CHUNK_SIZE: usize = 50;

#[derive(Debug, Clone, Default)]
pub struct StudentQuery {
    pub window: Window,
    pub search: Option<FilterValue>,
    pub tahun_ajaran: Option<FilterValue>,
}

/// Outcome of a spreadsheet import
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct ImportSummary {
    pub imported: usize,
    pub failed: usize,
    pub total: usize,
}

pub struct StudentService;

impl StudentService {
    pub async fn list(
        db: &DatabaseConnection,
        query: StudentQuery,
    ) -> Result<Page<student::Model>, DbErr> {
        let mut condition = Condition::all();
        if let Some(search) = &query.search {
            condition = condition.add(ilike(student::Column::NmSiswa, search));
        }
        if let Some(tahun) = &query.tahun_ajaran {
            condition = condition.add(student::Column::TahunAjaran.eq(tahun.as_str()));
        }

        let select = student::Entity::find()
            .filter(condition)
            .order_by_asc(student::Column::NmSiswa)
            .order_by_asc(student::Column::Id);

        fetch_window(db, select, query.window).await
    }

    /// Inserts a new student, stamping the active academic year when the
    /// payload does not name one
    pub async fn create(db: &DatabaseConnection, input: StudentInput) -> Result<String> {
        let input = input.normalized();
        input.validate().map_err(ServiceError::Validation)?;

        let tahun_ajaran = match input.tahun_ajaran.clone() {
            Some(tahun) => Some(tahun),
            None => TahunAjaranService::active_tahun(db).await?,
        };

        let id = Uuid::new_v4().to_string();
        let now = Utc::now().naive_utc();
        let mut model = Self::editable_columns(&input).map_err(ServiceError::Validation)?;
        model.id = Set(id.clone());
        model.no_daftar = Set(input.no_daftar);
        model.foto_siswa = Set(input.foto_siswa);
        model.tahun_ajaran = Set(tahun_ajaran);
        model.created_at = Set(now);
        model.updated_at = Set(now);

        student::Entity::insert(model)
            .exec_without_returning(db)
            .await?;

        info!("Created student {id}");
        Ok(id)
    }

    /// Overwrites the editable columns of an existing student
    pub async fn update(db: &DatabaseConnection, id: &str, input: StudentInput) -> Result<()> {
        let input = input.normalized();
        input.validate().map_err(ServiceError::Validation)?;

        let mut model = Self::editable_columns(&input).map_err(ServiceError::Validation)?;
        model.updated_at = Set(Utc::now().naive_utc());
        if let Some(no_daftar) = input.no_daftar {
            model.no_daftar = Set(Some(no_daftar));
        }
        if let Some(tahun) = input.tahun_ajaran {
            model.tahun_ajaran = Set(Some(tahun));
        }

        let result = student::Entity::update_many()
            .set(model)
            .filter(student::Column::Id.eq(id))
            .exec(db)
            .await?;

        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound("Siswa tidak ditemukan".to_owned()));
        }

        info!("Updated student {id}");
        Ok(())
    }

    /// Updates when the payload carries an id, inserts otherwise
    pub async fn save(db: &DatabaseConnection, input: StudentInput) -> Result<String> {
        match input.id.clone().filter(|id| !id.trim().is_empty()) {
            Some(id) => {
                Self::update(db, &id, input).await?;
                Ok(id)
            }
            None => Self::create(db, input).await,
        }
    }

    pub async fn delete(db: &DatabaseConnection, id: &str) -> Result<()> {
        student::Entity::delete_by_id(id).exec(db).await?;
        info!("Deleted student {id}");
        Ok(())
    }

    /// Deletes every listed student in one statement. A failed statement is
    /// logged and reported as nothing deleted.
    pub async fn bulk_delete(db: &DatabaseConnection, ids: &[String]) -> u64 {
        if ids.is_empty() {
            return 0;
        }

        match student::Entity::delete_many()
            .filter(student::Column::Id.is_in(ids.iter().map(String::as_str)))
            .exec(db)
            .await
        {
            Ok(result) => {
                info!("Bulk deleted {} students", result.rows_affected);
                result.rows_affected
            }
            Err(e) => {
                error!("Bulk delete failed: {e}");
                0
            }
        }
    }

    /// Imports spreadsheet rows in chunks of [`IMPORT_CHUNK_SIZE`].
    ///
    /// Chunks are inserted one after another; a chunk the database rejects is
    /// counted as failed in full and the remaining chunks still run.
    pub async fn import(
        db: &DatabaseConnection,
        rows: Vec<StudentImportRow>,
    ) -> Result<ImportSummary> {
        if rows.is_empty() {
            return Err(ServiceError::Validation("No data to import".to_owned()));
        }

        let total = rows.len();
        let tahun_ajaran = TahunAjaranService::active_tahun(db).await?;
        let (models, rejected) = Self::prepare_import(db, rows, tahun_ajaran).await?;

        let chunk_count = models.len().div_ceil(IMPORT_CHUNK_SIZE);
        info!(
            "Importing {} students in {} chunks of {} ({} rejected)",
            models.len(),
            chunk_count,
            IMPORT_CHUNK_SIZE,
            rejected
        );

        let mut summary = ImportSummary {
            imported: 0,
            failed: rejected,
            total,
        };

        for (idx, chunk) in models.chunks(IMPORT_CHUNK_SIZE).enumerate() {
            let start = idx * IMPORT_CHUNK_SIZE;
            info!(
                "Processing chunk {}/{}: rows {}-{}",
                idx + 1,
                chunk_count,
                start + 1,
                start + chunk.len()
            );

            match Self::insert_chunk(db, chunk).await {
                Ok(()) => summary.imported += chunk.len(),
                Err(e) => {
                    error!("Error in chunk {}: {}", idx + 1, e);
                    summary.failed += chunk.len();
                }
            }
        }

        info!(
            "Import finished: {} imported, {} failed, {} total",
            summary.imported, summary.failed, summary.total
        );
        Ok(summary)
    }

    /// Imports one client-sized batch as a single insert
    pub async fn import_batch(
        db: &DatabaseConnection,
        rows: Vec<StudentImportRow>,
    ) -> Result<ImportSummary> {
        if rows.is_empty() {
            return Ok(ImportSummary::default());
        }

        let total = rows.len();
        let tahun_ajaran = TahunAjaranService::active_tahun(db).await?;
        let (models, rejected) = Self::prepare_import(db, rows, tahun_ajaran).await?;

        if models.is_empty() {
            return Ok(ImportSummary {
                imported: 0,
                failed: rejected,
                total,
            });
        }

        Ok(match Self::insert_chunk(db, &models).await {
            Ok(()) => ImportSummary {
                imported: models.len(),
                failed: rejected,
                total,
            },
            Err(e) => {
                error!("Batch insert failed: {e}");
                ImportSummary {
                    imported: 0,
                    failed: total,
                    total,
                }
            }
        })
    }

    /// Distinct academic years present on student rows, newest first
    pub async fn tahun_ajaran_options(db: &DatabaseConnection) -> Result<Vec<String>, DbErr> {
        student::Entity::find()
            .select_only()
            .column(student::Column::TahunAjaran)
            .distinct()
            .filter(student::Column::TahunAjaran.is_not_null())
            .order_by_desc(student::Column::TahunAjaran)
            .into_tuple()
            .all(db)
            .await
    }

    async fn insert_chunk(db: &DatabaseConnection, chunk: &[student::Model]) -> Result<(), DbErr> {
        student::Entity::insert_many(chunk.iter().cloned().map(student::ActiveModel::from))
            .exec_without_returning(db)
            .await?;
        Ok(())
    }

    /// Turns sheet rows into models with fresh ids, dropping rows that could
    /// never be inserted: no name, an unreadable date, or an NISN that is
    /// already taken (in the table or earlier in the same sheet).
    /// Returns the insertable models and the number of rejected rows.
    async fn prepare_import(
        db: &DatabaseConnection,
        rows: Vec<StudentImportRow>,
        tahun_ajaran: Option<String>,
    ) -> Result<(Vec<student::Model>, usize), DbErr> {
        let rows: Vec<StudentImportRow> =
            rows.into_iter().map(StudentImportRow::normalized).collect();

        let nisns: Vec<&str> = rows.iter().filter_map(|r| r.nisn.as_deref()).collect();
        let mut taken: HashSet<String> = if nisns.is_empty() {
            HashSet::new()
        } else {
            student::Entity::find()
                .select_only()
                .column(student::Column::Nisn)
                .filter(student::Column::Nisn.is_in(nisns))
                .into_tuple::<Option<String>>()
                .all(db)
                .await?
                .into_iter()
                .flatten()
                .collect()
        };

        let now = Utc::now().naive_utc();
        let mut models = Vec::with_capacity(rows.len());
        let mut rejected = 0;

        for row in rows {
            if let Some(nisn) = &row.nisn
                && !taken.insert(nisn.clone())
            {
                warn!("Skipping student with duplicate NISN {nisn}");
                rejected += 1;
                continue;
            }

            let name = row.nm_siswa.clone();
            match Self::import_model(row, tahun_ajaran.clone(), now) {
                Ok(model) => models.push(model),
                Err(e) => {
                    warn!("Skipping student {}: {e}", name.as_deref().unwrap_or("-"));
                    rejected += 1;
                }
            }
        }

        Ok((models, rejected))
    }

    fn import_model(
        row: StudentImportRow,
        tahun_ajaran: Option<String>,
        now: NaiveDateTime,
    ) -> Result<student::Model, String> {
        let nm_siswa = row.validate()?.to_owned();
        let tanggal_lahir = parse_date("tanggal_lahir", row.tanggal_lahir.as_deref())?;
        let diterima_tanggal = parse_date("diterima_tanggal", row.diterima_tanggal.as_deref())?;

        Ok(student::Model {
            id: Uuid::new_v4().to_string(),
            nis: row.nis,
            nisn: row.nisn,
            no_daftar: row.no_daftar,
            nm_siswa,
            tempat_lahir: row.tempat_lahir,
            tanggal_lahir,
            jenis_kelamin: row.jenis_kelamin,
            agama: row.agama,
            alamat_siswa: row.alamat_siswa,
            telepon_siswa: row.telepon_siswa,
            diterima_tanggal,
            nm_ayah: row.nm_ayah,
            nm_ibu: row.nm_ibu,
            pekerjaan_ayah: row.pekerjaan_ayah,
            pekerjaan_ibu: row.pekerjaan_ibu,
            nm_wali: row.nm_wali,
            pekerjaan_wali: row.pekerjaan_wali,
            status_dalam_kel: None,
            anak_ke: None,
            sekolah_asal: None,
            diterima_kelas: None,
            alamat_ortu: None,
            telepon_ortu: None,
            alamat_wali: None,
            telepon_wali: None,
            foto_siswa: None,
            no_ijasahnas: None,
            tgl_lulus: None,
            no_transkrip: None,
            tahun_ajaran,
            created_at: now,
            updated_at: now,
        })
    }

    /// Columns the edit form owns. Identity, registration number, photo,
    /// academic year and timestamps are left `NotSet` for the caller.
    fn editable_columns(input: &StudentInput) -> Result<student::ActiveModel, String> {
        let nm_siswa = input.validate()?.to_owned();

        Ok(student::ActiveModel {
            id: NotSet,
            nis: Set(input.nis.clone()),
            nisn: Set(input.nisn.clone()),
            no_daftar: NotSet,
            nm_siswa: Set(nm_siswa),
            tempat_lahir: Set(input.tempat_lahir.clone()),
            tanggal_lahir: Set(parse_date("tanggalLahir", input.tanggal_lahir.as_deref())?),
            jenis_kelamin: Set(input.jenis_kelamin.clone()),
            agama: Set(input.agama.clone()),
            alamat_siswa: Set(input.alamat_siswa.clone()),
            telepon_siswa: Set(input.telepon_siswa.clone()),
            diterima_tanggal: Set(parse_date(
                "diterimaTanggal",
                input.diterima_tanggal.as_deref(),
            )?),
            nm_ayah: Set(input.nm_ayah.clone()),
            nm_ibu: Set(input.nm_ibu.clone()),
            pekerjaan_ayah: Set(input.pekerjaan_ayah.clone()),
            pekerjaan_ibu: Set(input.pekerjaan_ibu.clone()),
            nm_wali: Set(input.nm_wali.clone()),
            pekerjaan_wali: Set(input.pekerjaan_wali.clone()),
            status_dalam_kel: Set(input.status_dalam_kel.clone()),
            anak_ke: Set(input.anak_ke.clone()),
            sekolah_asal: Set(input.sekolah_asal.clone()),
            diterima_kelas: Set(input.diterima_kelas.clone()),
            alamat_ortu: Set(input.alamat_ortu.clone()),
            telepon_ortu: Set(input.telepon_ortu.clone()),
            alamat_wali: Set(input.alamat_wali.clone()),
            telepon_wali: Set(input.telepon_wali.clone()),
            foto_siswa: NotSet,
            no_ijasahnas: Set(input.no_ijasahnas.clone()),
            tgl_lulus: Set(parse_date("tglLulus", input.tgl_lulus.as_deref())?),
            no_transkrip: Set(input.no_transkrip.clone()),
            tahun_ajaran: NotSet,
            created_at: NotSet,
            updated_at: NotSet,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_test_db;
    use models::input::TahunAjaranInput;
    use sea_orm::{ConnectionTrait, PaginatorTrait};

    fn row(name: &str, nisn: Option<&str>) -> StudentImportRow {
        StudentImportRow {
            nm_siswa: Some(name.to_owned()),
            nisn: nisn.map(str::to_owned),
            ..Default::default()
        }
    }

    fn named(name: &str) -> StudentInput {
        StudentInput {
            nm_siswa: Some(name.to_owned()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_import_empty_is_rejected() {
        let db = setup_test_db().await;
        let err = StudentService::import(&db, Vec::new()).await.unwrap_err();
        assert_eq!(err.to_string(), "No data to import");
    }

    #[tokio::test]
    async fn test_import_counts_add_up_across_chunks() {
        let db = setup_test_db().await;
        let rows: Vec<_> = (0..120)
            .map(|i| row(&format!("Siswa {i:03}"), Some(&format!("00{i:08}"))))
            .collect();

        let summary = StudentService::import(&db, rows).await.unwrap();
        assert_eq!(
            summary,
            ImportSummary {
                imported: 120,
                failed: 0,
                total: 120
            }
        );
        assert_eq!(student::Entity::find().count(&db).await.unwrap(), 120);
    }

    #[tokio::test]
    async fn test_import_rejects_taken_nisn_and_blank_names() {
        let db = setup_test_db().await;
        StudentService::import(&db, vec![row("Ani", Some("111"))])
            .await
            .unwrap();

        let rows = vec![
            row("Ani Lagi", Some("111")),
            row("Budi", Some("222")),
            row("Budi Kembar", Some("222")),
            row(" ", None),
            StudentImportRow {
                tanggal_lahir: Some("bukan tanggal".to_owned()),
                ..row("Citra", None)
            },
            row("Dewi", None),
        ];

        let summary = StudentService::import(&db, rows).await.unwrap();
        assert_eq!(summary.imported, 2);
        assert_eq!(summary.failed, 4);
        assert_eq!(summary.imported + summary.failed, summary.total);
        assert_eq!(student::Entity::find().count(&db).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_import_stamps_active_year() {
        let db = setup_test_db().await;
        let year = TahunAjaranService::create(
            &db,
            TahunAjaranInput {
                tahun: "2026/2027".to_owned(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        TahunAjaranService::set_active(&db, &year.id).await.unwrap();

        StudentService::import_batch(&db, vec![row("Eka", None), row("Fajar", None)])
            .await
            .unwrap();

        let students = student::Entity::find().all(&db).await.unwrap();
        assert_eq!(students.len(), 2);
        assert!(
            students
                .iter()
                .all(|s| s.tahun_ajaran.as_deref() == Some("2026/2027"))
        );
        assert_ne!(students[0].id, students[1].id);
    }

    #[tokio::test]
    async fn test_import_batch_empty_is_a_no_op() {
        let db = setup_test_db().await;
        let summary = StudentService::import_batch(&db, Vec::new()).await.unwrap();
        assert_eq!(summary, ImportSummary::default());
    }

    #[tokio::test]
    async fn test_list_window_and_total() {
        let db = setup_test_db().await;
        for name in ["Budi", "Ani", "Citra", "Bayu", "Dewi"] {
            StudentService::create(&db, named(name)).await.unwrap();
        }

        let page = StudentService::list(
            &db,
            StudentQuery {
                window: Window::new(Some(2), Some(0)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(page.total, 5);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].nm_siswa, "Ani");

        for (limit, offset) in [(1, 0), (3, 3), (10, 20)] {
            let filtered = StudentService::list(
                &db,
                StudentQuery {
                    window: Window::new(Some(limit), Some(offset)),
                    search: FilterValue::search(Some("b")),
                    tahun_ajaran: FilterValue::parse(Some("semua")),
                },
            )
            .await
            .unwrap();
            assert!(filtered.items.len() as u64 <= limit);
            assert_eq!(filtered.total, 2);
        }
    }

    #[tokio::test]
    async fn test_update_and_missing_student() {
        let db = setup_test_db().await;
        let id = StudentService::create(&db, named("Gilang")).await.unwrap();

        let input = StudentInput {
            id: Some(id.clone()),
            nisn: Some("999".to_owned()),
            tanggal_lahir: Some("2011-03-09".to_owned()),
            agama: Some(String::new()),
            ..named("Gilang Pratama")
        };
        StudentService::save(&db, input).await.unwrap();

        let stored = student::Entity::find_by_id(id.as_str())
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.nm_siswa, "Gilang Pratama");
        assert_eq!(stored.nisn.as_deref(), Some("999"));
        assert_eq!(stored.agama, None);
        assert!(stored.tanggal_lahir.is_some());

        let err = StudentService::update(&db, "missing", named("X"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));

        let err = StudentService::update(&db, &id, named(""))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Nama Siswa tidak boleh kosong");
    }

    #[tokio::test]
    async fn test_bulk_delete() {
        let db = setup_test_db().await;
        let a = StudentService::create(&db, named("A")).await.unwrap();
        let b = StudentService::create(&db, named("B")).await.unwrap();
        StudentService::create(&db, named("C")).await.unwrap();

        assert_eq!(StudentService::bulk_delete(&db, &[]).await, 0);
        assert_eq!(StudentService::bulk_delete(&db, &[a, b]).await, 2);
        assert_eq!(student::Entity::find().count(&db).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_tahun_ajaran_options_are_distinct() {
        let db = setup_test_db().await;
        for (name, tahun) in [("A", "2025/2026"), ("B", "2026/2027"), ("C", "2025/2026")] {
            StudentService::create(
                &db,
                StudentInput {
                    tahun_ajaran: Some(tahun.to_owned()),
                    ..named(name)
                },
            )
            .await
            .unwrap();
        }

        let options = StudentService::tahun_ajaran_options(&db).await.unwrap();
        assert_eq!(options, vec!["2026/2027", "2025/2026"]);
    }

    async fn drop_student_tables(db: &DatabaseConnection) {
        db.execute_unprepared("DROP TABLE kelulusan").await.unwrap();
        db.execute_unprepared("DROP TABLE student").await.unwrap();
    }

    #[tokio::test]
    async fn test_import_counts_rejected_chunks_as_failed() {
        let db = setup_test_db().await;
        drop_student_tables(&db).await;

        let mut rows: Vec<StudentImportRow> =
            (0..117).map(|i| row(&format!("Siswa {i}"), None)).collect();
        rows.extend((0..3).map(|_| StudentImportRow::default()));

        let summary = StudentService::import(&db, rows).await.unwrap();
        assert_eq!(
            summary,
            ImportSummary {
                imported: 0,
                failed: 120,
                total: 120,
            }
        );
    }

    #[tokio::test]
    async fn test_import_batch_failure_fails_every_row() {
        let db = setup_test_db().await;
        drop_student_tables(&db).await;

        let rows = vec![row("Ani", None), row("Budi", None), StudentImportRow::default()];
        let summary = StudentService::import_batch(&db, rows).await.unwrap();
        assert_eq!(
            summary,
            ImportSummary {
                imported: 0,
                failed: 3,
                total: 3,
            }
        );
    }
}
