use crate::routes::{
    auth, health, kelulusan, pendaftar, pengumuman, root, sekolah, settings, students,
    tahun_ajaran, users,
};
use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "jwt",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// API Documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        root::root,
        health::health,
        pengumuman::lookup,
        auth::me,
        students::list,
        students::create,
        students::update,
        students::delete,
        students::bulk_delete,
        students::import,
        students::import_batch,
        students::tahun_ajaran_options,
        pendaftar::list,
        pendaftar::stats,
        pendaftar::school_candidates,
        pendaftar::save,
        pendaftar::delete,
        sekolah::list,
        sekolah::save,
        sekolah::search,
        sekolah::locations,
        sekolah::delete,
        kelulusan::list,
        kelulusan::create,
        kelulusan::bulk_assign,
        kelulusan::search_students,
        kelulusan::update,
        kelulusan::delete,
        tahun_ajaran::list,
        tahun_ajaran::create,
        tahun_ajaran::active,
        tahun_ajaran::options,
        tahun_ajaran::update,
        tahun_ajaran::delete,
        tahun_ajaran::activate,
        settings::all,
        settings::announcement_date,
        settings::update_announcement_date,
        settings::tahun_ajaran,
        settings::update_tahun_ajaran,
        users::list,
        users::set_role,
        users::remove,
        users::elevate_first,
    ),
    components(schemas(crate::error::ErrorResponse)),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness endpoints"),
        (name = "Pengumuman", description = "Public graduation result lookup"),
        (name = "Authentication", description = "Authentication related endpoints"),
        (name = "Students", description = "Enrolled student records and spreadsheet import"),
        (name = "Pendaftar", description = "Registrant records"),
        (name = "Sekolah", description = "Feeder school directory"),
        (name = "Kelulusan", description = "Graduation outcomes"),
        (name = "Tahun Ajaran", description = "Academic years"),
        (name = "Settings", description = "Announcement date and active year"),
        (name = "Users", description = "Dashboard accounts"),
    ),
    info(
        title = "Admissions API",
        version = "1.0.0",
        description = "School admissions admin portal API",
        license(
            name = "MIT OR Apache-2.0",
        )
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_admin_and_public_paths() {
        let doc = ApiDoc::openapi();
        for path in ["/pengumuman", "/api/students/{id}", "/api/tahun-ajaran/{id}/activate"] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }

        let components = doc.components.unwrap();
        assert!(components.security_schemes.contains_key("jwt"));
    }
}
