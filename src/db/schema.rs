//! Table creation from entity definitions.

use crate::entities::{bills, prelude::*};
use sea_orm::sea_query::Index;
use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, Schema};
use tracing::info;

/// Unique index backing "one bill per student per period".
pub const BILL_PERIOD_INDEX: &str = "uq_bills_siswa_bulan_tahun";

/// Create all tables and indexes that do not exist yet.
///
/// Tables are created parents first so foreign keys resolve.
pub async fn create_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    create_table(db, Users).await?;
    create_table(db, Classes).await?;
    create_table(db, Students).await?;
    create_table(db, Bills).await?;
    create_table(db, Payments).await?;

    let backend = db.get_database_backend();
    let index = Index::create()
        .name(BILL_PERIOD_INDEX)
        .table(Bills)
        .col(bills::Column::IdSiswa)
        .col(bills::Column::Bulan)
        .col(bills::Column::Tahun)
        .unique()
        .if_not_exists()
        .to_owned();
    db.execute(backend.build(&index)).await?;

    info!("Database schema ready");
    Ok(())
}

async fn create_table<E: EntityTrait>(db: &DatabaseConnection, entity: E) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);
    let mut stmt = schema.create_table_from_entity(entity);
    stmt.if_not_exists();
    db.execute(backend.build(&stmt)).await?;
    Ok(())
}
