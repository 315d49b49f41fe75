pub use sea_orm_migration::prelude::*;

mod m20251006_181204_create_memberships_table;
mod m20251006_182547_create_triggers_table;
mod m20251007_094410_create_lock_statuses_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20251006_181204_create_memberships_table::Migration),
            Box::new(m20251006_182547_create_triggers_table::Migration),
            Box::new(m20251007_094410_create_lock_statuses_table::Migration),
        ]
    }
}
