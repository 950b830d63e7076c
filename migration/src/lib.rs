pub use sea_orm_migration::prelude::*;

mod m20261017_000001_create_known_app_table;
mod m20261017_000002_create_user_app_table;
mod m20261017_000003_create_listener_role_table;
mod m20261017_000004_create_macro_entry_table;
mod m20261017_000005_create_autolog_channel_table;
mod m20261017_000006_create_sponsor_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261017_000001_create_known_app_table::Migration),
            Box::new(m20261017_000002_create_user_app_table::Migration),
            Box::new(m20261017_000003_create_listener_role_table::Migration),
            Box::new(m20261017_000004_create_macro_entry_table::Migration),
            Box::new(m20261017_000005_create_autolog_channel_table::Migration),
            Box::new(m20261017_000006_create_sponsor_tables::Migration),
        ]
    }
}
