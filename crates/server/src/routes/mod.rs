use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get, post, put},
};

pub mod auth;
pub mod health;
pub mod kelulusan;
pub mod pendaftar;
pub mod pengumuman;
pub mod root;
pub mod sekolah;
pub mod settings;
pub mod students;
pub mod tahun_ajaran;
pub mod users;

/// Routes anyone can reach
pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/", get(root::root))
        .route("/health", get(health::health))
        .route("/pengumuman", get(pengumuman::lookup))
}

/// Admin routes, mounted under `/api` behind the JWT layer
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/me", get(auth::me))
        .route("/students", get(students::list).post(students::create))
        .route("/students/bulk-delete", post(students::bulk_delete))
        .route("/students/import", post(students::import))
        .route("/students/import-batch", post(students::import_batch))
        .route("/students/tahun-ajaran", get(students::tahun_ajaran_options))
        .route(
            "/students/{id}",
            put(students::update).delete(students::delete),
        )
        .route("/pendaftar", get(pendaftar::list).post(pendaftar::save))
        .route("/pendaftar/stats", get(pendaftar::stats))
        .route(
            "/pendaftar/school-candidates",
            get(pendaftar::school_candidates),
        )
        .route("/pendaftar/{id}", delete(pendaftar::delete))
        .route("/sekolah", get(sekolah::list).post(sekolah::save))
        .route("/sekolah/search", get(sekolah::search))
        .route("/sekolah/locations", get(sekolah::locations))
        .route("/sekolah/{id}", delete(sekolah::delete))
        .route("/kelulusan", get(kelulusan::list).post(kelulusan::create))
        .route("/kelulusan/bulk", post(kelulusan::bulk_assign))
        .route("/kelulusan/students", get(kelulusan::search_students))
        .route(
            "/kelulusan/{id}",
            put(kelulusan::update).delete(kelulusan::delete),
        )
        .route(
            "/tahun-ajaran",
            get(tahun_ajaran::list).post(tahun_ajaran::create),
        )
        .route("/tahun-ajaran/active", get(tahun_ajaran::active))
        .route("/tahun-ajaran/options", get(tahun_ajaran::options))
        .route(
            "/tahun-ajaran/{id}",
            put(tahun_ajaran::update).delete(tahun_ajaran::delete),
        )
        .route("/tahun-ajaran/{id}/activate", post(tahun_ajaran::activate))
        .route("/settings", get(settings::all))
        .route(
            "/settings/announcement-date",
            get(settings::announcement_date).put(settings::update_announcement_date),
        )
        .route(
            "/settings/tahun-ajaran",
            get(settings::tahun_ajaran).put(settings::update_tahun_ajaran),
        )
        .route("/users", get(users::list))
        .route("/users/elevate-first", post(users::elevate_first))
        .route("/users/{id}", delete(users::remove))
        .route("/users/{id}/role", put(users::set_role))
}
