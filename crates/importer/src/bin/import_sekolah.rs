use database::db::create_connection;
use importer::{config::DirectoryConfig, directory::DirectoryClient};
use log::info;

#[tokio::main]
async fn main() {
    env_logger::init();

    let config = DirectoryConfig::from_env();
    let db = create_connection()
        .await
        .expect("Failed to connect to database");

    info!("Importing SMP and MTS schools for kab/kota {}", config.kab_kota);
    let client = DirectoryClient::new(config);
    let total = client.import_all(&db).await;

    info!("Done, {total} schools imported");
}
