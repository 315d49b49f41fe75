use crate::migration::Migrator;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use sea_orm_migration::{MigratorTrait, SchemaManager};

pub async fn init(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(database_url.to_owned());
    opt.sqlx_logging_level(log::LevelFilter::Debug);
    if database_url.starts_with("sqlite:") {
        // Every pooled sqlite connection to `:memory:` would get its own database.
        opt.max_connections(1).min_connections(1);
    }
    let connection = Database::connect(opt).await?;
    log::info!("Connected to database...");

    let schema_manager = SchemaManager::new(&connection);
    Migrator::up(&connection, None).await?;
    for table in ["memberships", "triggers", "lock_statuses"] {
        if !schema_manager.has_table(table).await? {
            return Err(DbErr::Migration(format!("table {table} is missing")));
        }
    }
    log::info!("Applied migrations...");

    Ok(connection)
}
