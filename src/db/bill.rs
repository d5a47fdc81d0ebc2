//! Bill repository for generation, listing and status updates.

use crate::entities::{bills, prelude::*, sea_orm_active_enums::BillStatus};
use crate::models::BillFilter;
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::*;
use std::collections::HashMap;

/// A bill to insert during generation.
#[derive(Debug, Clone)]
pub struct NewBill {
    pub id_siswa: String,
    pub bulan: String,
    pub tahun: i32,
    pub jumlah: i64,
}

/// Insert a batch of bills, skipping students who already have one for the period.
///
/// Uses ON CONFLICT DO NOTHING on (id_siswa, bulan, tahun).
/// Returns the count of inserted records.
pub async fn insert_batch<C: ConnectionTrait>(db: &C, records: &[NewBill]) -> Result<usize, DbErr> {
    let mut inserted = 0;

    for record in records {
        let model = bills::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            id_siswa: Set(record.id_siswa.clone()),
            bulan: Set(record.bulan.clone()),
            tahun: Set(record.tahun),
            jumlah: Set(record.jumlah),
            status: Set(BillStatus::Belum),
            created_at: Set(Utc::now()),
        };

        let result = Bills::insert(model)
            .on_conflict(
                OnConflict::columns([bills::Column::IdSiswa, bills::Column::Bulan, bills::Column::Tahun])
                    .do_nothing()
                    .to_owned(),
            )
            .exec(db)
            .await;

        match result {
            Ok(_) => inserted += 1,
            Err(DbErr::RecordNotInserted) => {}
            Err(e) => return Err(e),
        }
    }

    Ok(inserted)
}

/// List bills matching the filter, newest period first.
pub async fn list(db: &DatabaseConnection, filter: &BillFilter) -> Result<Vec<bills::Model>, DbErr> {
    let mut query = Bills::find();
    if let Some(status) = filter.status {
        query = query.filter(bills::Column::Status.eq(status));
    }
    if let Some(id_siswa) = &filter.id_siswa {
        query = query.filter(bills::Column::IdSiswa.eq(id_siswa.as_str()));
    }

    let mut bills = query.order_by_desc(bills::Column::CreatedAt).all(db).await?;
    crate::models::bill::sort_newest_first(&mut bills);
    Ok(bills)
}

/// Bills for one billing period, ordered by creation.
pub async fn list_by_period(db: &DatabaseConnection, bulan: &str, tahun: i32) -> Result<Vec<bills::Model>, DbErr> {
    Bills::find()
        .filter(bills::Column::Bulan.eq(bulan))
        .filter(bills::Column::Tahun.eq(tahun))
        .order_by_asc(bills::Column::CreatedAt)
        .all(db)
        .await
}

/// Get bill by ID.
pub async fn get_by_id<C: ConnectionTrait>(db: &C, id: &str) -> Result<Option<bills::Model>, DbErr> {
    Bills::find_by_id(id).one(db).await
}

/// Move a bill from `from` to `to` only if it is still in `from`.
///
/// Returns false when another request changed the bill first.
pub async fn transition<C: ConnectionTrait>(db: &C, id: &str, from: BillStatus, to: BillStatus) -> Result<bool, DbErr> {
    use sea_orm::sea_query::Expr;

    let result = Bills::update_many()
        .col_expr(bills::Column::Status, Expr::value(to.into_value()))
        .filter(bills::Column::Id.eq(id))
        .filter(bills::Column::Status.eq(from))
        .exec(db)
        .await?;
    Ok(result.rows_affected == 1)
}

/// Bills with the given IDs keyed by ID, for enriching payment rows.
pub async fn map_by_ids(db: &DatabaseConnection, ids: &[String]) -> Result<HashMap<String, bills::Model>, DbErr> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    Ok(Bills::find()
        .filter(bills::Column::Id.is_in(ids.iter().cloned()))
        .all(db)
        .await?
        .into_iter()
        .map(|b| (b.id.clone(), b))
        .collect())
}
