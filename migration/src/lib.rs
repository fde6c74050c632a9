pub use sea_orm_migration::prelude::*;

mod m20250601_000001_create_orders;
mod m20250601_000002_create_reservations;
mod m20250601_000003_create_ratings;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_create_orders::Migration),
            Box::new(m20250601_000002_create_reservations::Migration),
            Box::new(m20250601_000003_create_ratings::Migration),
        ]
    }
}

/// Column definition for a currency amount.
///
/// Postgres stores `NUMERIC(12, 2)`. SQLite has no exact decimal type and the
/// driver reads decimals back through `f64`, so the column gets REAL affinity
/// there; otherwise whole amounts come back as INTEGER and fail to decode.
pub(crate) fn money<T: IntoIden>(manager: &SchemaManager, col: T) -> ColumnDef {
    let mut def = ColumnDef::new(col);
    match manager.get_database_backend() {
        sea_orm_migration::sea_orm::DatabaseBackend::Sqlite => def.double(),
        _ => def.decimal_len(12, 2),
    };
    def
}
