use log::LevelFilter;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::time::Duration;

/// Maximum number of pooled connections shared by all requests
const MAX_CONNECTIONS: u32 = 10;

/// Creates a database connection pool
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(database_url);
    options
        .max_connections(MAX_CONNECTIONS)
        .connect_timeout(Duration::from_secs(8))
        .sqlx_logging_level(LevelFilter::Debug);

    Database::connect(options).await
}
