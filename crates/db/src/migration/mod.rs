//! Schema migrations, applied in order by [`Migrator`].

pub use sea_orm_migration::prelude::*;

mod m20260301_000001_initial;
mod m20260301_000002_journals;

/// Runs every migration the schema needs.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_initial::Migration),
            Box::new(m20260301_000002_journals::Migration),
        ]
    }
}
