//! Database connection pool and utility functions.

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, PaginatorTrait};
use std::time::Duration;
use tracing::log::LevelFilter;

/// Create a new database connection with configured pool settings.
///
/// In-memory SQLite is pinned to a single connection so every query sees the
/// same database.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(database_url);
    if database_url.starts_with("sqlite") && database_url.contains(":memory:") {
        opt.max_connections(1).min_connections(1);
    } else {
        opt.max_connections(10).min_connections(1);
    }
    opt.connect_timeout(Duration::from_secs(10))
        .idle_timeout(Duration::from_secs(300))
        .sqlx_logging(true)
        .sqlx_logging_level(LevelFilter::Debug);

    Database::connect(opt).await
}

/// Test database connection by executing a simple query.
pub async fn test_connection(db: &DatabaseConnection) -> Result<(), DbErr> {
    db.execute_unprepared("SELECT 1").await?;
    Ok(())
}

/// Get record counts for all tables.
pub async fn get_table_counts(db: &DatabaseConnection) -> Result<TableCounts, DbErr> {
    use crate::entities::prelude::*;
    use sea_orm::EntityTrait;

    let students = Students::find().count(db).await?;
    let classes = Classes::find().count(db).await?;
    let bills = Bills::find().count(db).await?;
    let payments = Payments::find().count(db).await?;

    Ok(TableCounts {
        students,
        classes,
        bills,
        payments,
    })
}

/// Table record counts.
#[derive(Debug, Clone)]
pub struct TableCounts {
    pub students: u64,
    pub classes: u64,
    pub bills: u64,
    pub payments: u64,
}
