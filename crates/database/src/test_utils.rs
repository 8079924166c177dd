use crate::db::create_tables;
use sea_orm::{Database, DatabaseConnection};

pub(crate) fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Fresh in-memory SQLite database with every table created
pub(crate) async fn setup_test_db() -> DatabaseConnection {
    init_test_logging();

    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");
    create_tables(&db).await.expect("Failed to create tables");
    db
}
