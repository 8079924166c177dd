use crate::{
    entities::sekolah,
    error::{Result, ServiceError},
    services::query::{fetch_window, ilike},
};
use log::info;
use models::{
    filter::FilterValue,
    input::SekolahInput,
    pagination::{Page, Window},
};
use sea_orm::{
    ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    FromQueryResult, QueryFilter, QueryOrder, QuerySelect, sea_query::OnConflict,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// School forms admitted as applicants' schools of origin
const CANDIDATE_FORMS: [&str; 2] = ["SMP", "MTS"];

const SEARCH_LIMIT: u64 = 50;
const LOCATION_LIMIT: u64 = 10;

#[derive(Debug, Clone, Default)]
pub struct SekolahQuery {
    pub window: Window,
    pub search: Option<FilterValue>,
    pub bentuk: Option<FilterValue>,
    pub status: Option<FilterValue>,
}

/// A kecamatan that has at least one school on record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromQueryResult, ToSchema)]
pub struct Location {
    pub code: Option<String>,
    pub name: Option<String>,
    pub kabupaten: Option<String>,
}

/// Whether a directory entry is a junior secondary school (SMP or MTS).
/// Some madrasahs are listed under another form, so the name is checked too.
pub fn is_candidate_school(bentuk: Option<&str>, name: Option<&str>) -> bool {
    bentuk.is_some_and(|b| CANDIDATE_FORMS.contains(&b)) || name.is_some_and(|n| n.contains("MTS"))
}

pub struct SekolahService;

impl SekolahService {
    pub async fn list(
        db: &DatabaseConnection,
        query: SekolahQuery,
    ) -> Result<Page<sekolah::Model>, DbErr> {
        let mut condition = Condition::all();
        if let Some(search) = &query.search {
            condition = condition.add(
                Condition::any()
                    .add(ilike(sekolah::Column::Sekolah, search))
                    .add(ilike(sekolah::Column::Npsn, search))
                    .add(ilike(sekolah::Column::Kecamatan, search)),
            );
        }
        if let Some(bentuk) = &query.bentuk {
            condition = condition.add(sekolah::Column::Bentuk.eq(bentuk.as_str()));
        }
        if let Some(status) = &query.status {
            condition = condition.add(sekolah::Column::Status.eq(status.as_str()));
        }

        let select = sekolah::Entity::find()
            .filter(condition)
            .order_by_asc(sekolah::Column::Sekolah)
            .order_by_asc(sekolah::Column::Id);

        fetch_window(db, select, query.window).await
    }

    /// Updates when the payload carries an id, inserts otherwise
    pub async fn save(db: &DatabaseConnection, input: SekolahInput) -> Result<String> {
        let input = input.normalized();
        input.validate().map_err(ServiceError::Validation)?;

        match input.id.clone() {
            Some(id) => {
                let result = sekolah::Entity::update_many()
                    .set(Self::columns(input))
                    .filter(sekolah::Column::Id.eq(id.as_str()))
                    .exec(db)
                    .await?;

                if result.rows_affected == 0 {
                    return Err(ServiceError::NotFound(
                        "Sekolah tidak ditemukan".to_owned(),
                    ));
                }

                info!("Updated sekolah {id}");
                Ok(id)
            }
            None => {
                let id = Uuid::new_v4().to_string();
                let mut model = Self::columns(input);
                model.id = Set(id.clone());

                sekolah::Entity::insert(model)
                    .exec_without_returning(db)
                    .await?;

                info!("Created sekolah {id}");
                Ok(id)
            }
        }
    }

    pub async fn delete(db: &DatabaseConnection, id: &str) -> Result<()> {
        sekolah::Entity::delete_by_id(id).exec(db).await?;
        info!("Deleted sekolah {id}");
        Ok(())
    }

    /// School-of-origin lookup. A kecamatan code takes precedence over the
    /// name query; with neither there is nothing to search for.
    pub async fn search(
        db: &DatabaseConnection,
        query: Option<FilterValue>,
        kec_code: Option<FilterValue>,
    ) -> Result<Vec<sekolah::Model>, DbErr> {
        let criterion = match (kec_code, query) {
            (Some(code), _) => sekolah::Column::KodeKec.eq(code.as_str()),
            (None, Some(query)) => ilike(sekolah::Column::Sekolah, &query),
            (None, None) => return Ok(Vec::new()),
        };

        sekolah::Entity::find()
            .filter(
                Condition::all()
                    .add(criterion)
                    .add(sekolah::Column::Bentuk.is_in(CANDIDATE_FORMS)),
            )
            .order_by_asc(sekolah::Column::Sekolah)
            .limit(SEARCH_LIMIT)
            .all(db)
            .await
    }

    /// Distinct kecamatan whose name matches `query`
    pub async fn locations(
        db: &DatabaseConnection,
        query: &FilterValue,
    ) -> Result<Vec<Location>, DbErr> {
        sekolah::Entity::find()
            .select_only()
            .column_as(sekolah::Column::KodeKec, "code")
            .column_as(sekolah::Column::Kecamatan, "name")
            .column_as(sekolah::Column::KabupatenKota, "kabupaten")
            .filter(ilike(sekolah::Column::Kecamatan, query))
            .group_by(sekolah::Column::KodeKec)
            .group_by(sekolah::Column::Kecamatan)
            .group_by(sekolah::Column::KabupatenKota)
            .order_by_asc(sekolah::Column::Kecamatan)
            .limit(LOCATION_LIMIT)
            .into_model::<Location>()
            .all(db)
            .await
    }

    /// Writes one page of the external school directory. Entries that are not
    /// candidate schools, or lack an id, are dropped; ids already on record
    /// are left as they are. Returns the number of rows offered for insert.
    pub async fn import_directory(
        db: &DatabaseConnection,
        schools: Vec<SekolahInput>,
    ) -> Result<usize, DbErr> {
        let rows: Vec<sekolah::ActiveModel> = schools
            .into_iter()
            .map(SekolahInput::normalized)
            .filter(|s| is_candidate_school(s.bentuk.as_deref(), s.sekolah.as_deref()))
            .filter_map(|s| {
                let id = s.id.clone()?;
                let mut model = Self::columns(s);
                model.id = Set(id);
                Some(model)
            })
            .collect();

        if rows.is_empty() {
            return Ok(0);
        }

        let count = rows.len();
        sekolah::Entity::insert_many(rows)
            .on_conflict(
                OnConflict::column(sekolah::Column::Id)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(db)
            .await?;

        Ok(count)
    }

    fn columns(input: SekolahInput) -> sekolah::ActiveModel {
        sekolah::ActiveModel {
            kode_prop: Set(input.kode_prop),
            propinsi: Set(input.propinsi),
            kode_kab_kota: Set(input.kode_kab_kota),
            kabupaten_kota: Set(input.kabupaten_kota),
            kode_kec: Set(input.kode_kec),
            kecamatan: Set(input.kecamatan),
            npsn: Set(input.npsn),
            sekolah: Set(input.sekolah),
            bentuk: Set(input.bentuk),
            status: Set(input.status),
            alamat_jalan: Set(input.alamat_jalan),
            lintang: Set(input.lintang),
            bujur: Set(input.bujur),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_test_db;

    fn school(id: &str, name: &str, bentuk: &str, kec: (&str, &str)) -> SekolahInput {
        SekolahInput {
            id: Some(id.to_owned()),
            sekolah: Some(name.to_owned()),
            bentuk: Some(bentuk.to_owned()),
            kode_kec: Some(kec.0.to_owned()),
            kecamatan: Some(kec.1.to_owned()),
            kabupaten_kota: Some("Kab. Majalengka".to_owned()),
            status: Some("N".to_owned()),
            ..Default::default()
        }
    }

    #[test]
    fn test_is_candidate_school() {
        assert!(is_candidate_school(Some("SMP"), Some("SMPN 1 Majalengka")));
        assert!(is_candidate_school(Some("MTS"), None));
        assert!(is_candidate_school(Some("SD"), Some("MTS Al-Ikhlas")));
        assert!(!is_candidate_school(Some("SD"), Some("SDN 2 Cigasong")));
        assert!(!is_candidate_school(None, None));
    }

    #[tokio::test]
    async fn test_import_directory_keeps_only_smp_and_mts() {
        let db = setup_test_db().await;
        let page = vec![
            school("1", "SDN 1 Majalengka", "SD", ("021601", "Majalengka")),
            school("2", "SMPN 1 Majalengka", "SMP", ("021601", "Majalengka")),
            school("3", "MTSN 1 Majalengka", "MTS", ("021601", "Majalengka")),
            school("4", "MTS Al-Ikhlas", "SD", ("021602", "Cigasong")),
        ];

        let written = SekolahService::import_directory(&db, page.clone())
            .await
            .unwrap();
        assert_eq!(written, 3);

        // A second pass over the same page must not fail on existing ids
        SekolahService::import_directory(&db, page).await.unwrap();

        let mut ids: Vec<String> = sekolah::Entity::find()
            .all(&db)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();
        ids.sort();
        assert_eq!(ids, vec!["2", "3", "4"]);
    }

    #[tokio::test]
    async fn test_search_prefers_kecamatan_code() {
        let db = setup_test_db().await;
        SekolahService::import_directory(
            &db,
            vec![
                school("1", "SMPN 1 Majalengka", "SMP", ("021601", "Majalengka")),
                school("2", "SMPN 1 Cigasong", "SMP", ("021602", "Cigasong")),
                school("3", "MTS Cigasong", "SD", ("021602", "Cigasong")),
            ],
        )
        .await
        .unwrap();

        let by_code = SekolahService::search(
            &db,
            FilterValue::search(Some("Majalengka")),
            FilterValue::search(Some("021602")),
        )
        .await
        .unwrap();
        // The SD-form madrasah is stored but not offered in the lookup
        assert_eq!(by_code.len(), 1);
        assert_eq!(by_code[0].id, "2");

        let by_name = SekolahService::search(&db, FilterValue::search(Some("majalengka")), None)
            .await
            .unwrap();
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].id, "1");

        assert!(SekolahService::search(&db, None, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_locations_are_distinct() {
        let db = setup_test_db().await;
        SekolahService::import_directory(
            &db,
            vec![
                school("1", "SMPN 1 Cigasong", "SMP", ("021602", "Cigasong")),
                school("2", "SMPN 2 Cigasong", "SMP", ("021602", "Cigasong")),
                school("3", "SMPN 1 Majalengka", "SMP", ("021601", "Majalengka")),
            ],
        )
        .await
        .unwrap();

        let locations = SekolahService::locations(&db, &FilterValue::search(Some("gasong")).unwrap())
            .await
            .unwrap();
        assert_eq!(
            locations,
            vec![Location {
                code: Some("021602".to_owned()),
                name: Some("Cigasong".to_owned()),
                kabupaten: Some("Kab. Majalengka".to_owned()),
            }]
        );
    }

    #[tokio::test]
    async fn test_list_filters_and_save() {
        let db = setup_test_db().await;
        let id = SekolahService::save(
            &db,
            SekolahInput {
                sekolah: Some("SMP Swasta Bina Putra".to_owned()),
                npsn: Some("20214567".to_owned()),
                bentuk: Some("SMP".to_owned()),
                status: Some("S".to_owned()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        SekolahService::save(
            &db,
            SekolahInput {
                sekolah: Some("SMPN 3 Majalengka".to_owned()),
                bentuk: Some("SMP".to_owned()),
                status: Some("N".to_owned()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let swasta = SekolahService::list(
            &db,
            SekolahQuery {
                status: FilterValue::parse(Some("S")),
                bentuk: FilterValue::parse(Some("semua")),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(swasta.total, 1);
        assert_eq!(swasta.items[0].id, id);

        let by_npsn = SekolahService::list(
            &db,
            SekolahQuery {
                search: FilterValue::search(Some("2021")),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(by_npsn.total, 1);

        let err = SekolahService::save(&db, SekolahInput::default())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Nama Sekolah tidak boleh kosong");
    }
}
