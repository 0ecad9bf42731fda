use std::time::Duration;

use sea_orm::sea_query::{Index, PostgresQueryBuilder, SqliteQueryBuilder};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbBackend, DbErr};
use tracing::{info, warn};

use crate::config::DatabaseConfig;
use crate::entity::enrollment;

/// Connect, sync the schema from the entity registry and ensure secondary indexes.
pub async fn init_db(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(config.url.to_owned());

    opt.max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
        .sqlx_logging(config.sqlx_logging);

    let db = Database::connect(opt).await?;
    db.get_schema_registry("training_server::entity::*")
        .sync(&db)
        .await?;
    ensure_indexes(&db).await?;

    info!(backend = ?db.get_database_backend(), "Database ready");
    Ok(db)
}

/// Ensure indexes that schema sync does not derive from the entities.
///
/// Lookups by participant are served by the `participant_class` unique key;
/// lookups by class need their own index.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    let stmt = Index::create()
        .if_not_exists()
        .name("idx_enrollments_class_id")
        .table(enrollment::Entity)
        .col(enrollment::Column::ClassId)
        .to_owned();

    let sql = match db.get_database_backend() {
        DbBackend::Sqlite => stmt.to_string(SqliteQueryBuilder),
        _ => stmt.to_string(PostgresQueryBuilder),
    };

    match db.execute_unprepared(&sql).await {
        Ok(_) => info!("Ensured index idx_enrollments_class_id exists"),
        Err(e) => warn!("Failed to create index idx_enrollments_class_id: {}", e),
    }

    Ok(())
}
