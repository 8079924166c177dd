use database::{db::create_connection, services::user::UserService};
use log::{info, warn};

#[tokio::main]
async fn main() {
    env_logger::init();

    let db = create_connection()
        .await
        .expect("Failed to connect to database");

    match UserService::elevate_first_user(&db)
        .await
        .expect("Failed to update user role")
    {
        Some(email) => info!("{email} is now an admin"),
        None => warn!("No users to elevate; sign in once and run this again"),
    }
}
