pub use sea_orm_migration::prelude::*;

pub mod entities;
mod m20251101_000001_catalog;
mod m20251101_000002_affiliate_clicks;
mod m20251101_000003_shopper;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20251101_000001_catalog::Migration),
            Box::new(m20251101_000002_affiliate_clicks::Migration),
            Box::new(m20251101_000003_shopper::Migration),
        ]
    }
}
