use crate::entities::{kelulusan, pendaftar, sekolah, setting, student, tahun_ajaran, user};
use log::info;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr, Schema};
use std::env;

/// Reads `DATABASE_URL`, loading `.env` first if one is present
pub fn database_url() -> Result<String, DbErr> {
    dotenvy::dotenv().ok();

    env::var("DATABASE_URL").map_err(|_| DbErr::Custom("DATABASE_URL is not defined".to_owned()))
}

/// Creates a database connection from the environment
pub async fn create_connection() -> Result<DatabaseConnection, DbErr> {
    let url = database_url()?;
    Database::connect(url).await
}

/// Creates every table straight from the entity definitions.
///
/// Production databases are managed by the `migration` crate; this is for
/// throwaway SQLite databases in tests and local experiments.
pub async fn create_tables(db: &DatabaseConnection) -> Result<(), DbErr> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    // `kelulusan` references `student`, so it has to come after it
    let statements = [
        schema.create_table_from_entity(student::Entity),
        schema.create_table_from_entity(kelulusan::Entity),
        schema.create_table_from_entity(pendaftar::Entity),
        schema.create_table_from_entity(sekolah::Entity),
        schema.create_table_from_entity(tahun_ajaran::Entity),
        schema.create_table_from_entity(setting::Entity),
        schema.create_table_from_entity(user::Entity),
    ];

    for statement in &statements {
        db.execute(builder.build(statement)).await?;
    }

    info!("Created {} tables from entity definitions", statements.len());
    Ok(())
}
