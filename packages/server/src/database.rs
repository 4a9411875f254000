use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use tracing::info;

/// Connect to PostgreSQL and synchronize the catalog schema.
///
/// Tables are created or altered directly from the entity definitions at
/// startup; there is no separate migration step.
pub async fn init_db(db_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(db_url.to_owned());
    options
        .max_connections(50)
        .min_connections(2)
        .connect_timeout(Duration::from_secs(10))
        .acquire_timeout(Duration::from_secs(10))
        .idle_timeout(Duration::from_secs(60))
        .sqlx_logging(false);

    let db = Database::connect(options).await?;

    db.get_schema_registry("server::entity::*")
        .sync(&db)
        .await?;

    info!("Database connected and schema synchronized");
    Ok(db)
}
