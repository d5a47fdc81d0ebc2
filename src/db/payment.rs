//! Payment repository.

use crate::entities::{payments, prelude::*, sea_orm_active_enums::PaymentStatus};
use chrono::{DateTime, Utc};
use sea_orm::*;

/// A payment to record.
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub id_tagihan: String,
    pub id_siswa: String,
    pub jumlah: i64,
    pub metode: String,
    pub status: PaymentStatus,
}

/// Insert a payment. Accepted payments are stamped as confirmed at the same instant.
pub async fn insert<C: ConnectionTrait>(db: &C, record: NewPayment) -> Result<payments::Model, DbErr> {
    let now = Utc::now();
    let model = payments::ActiveModel {
        id: Set(uuid::Uuid::new_v4().to_string()),
        id_tagihan: Set(record.id_tagihan),
        id_siswa: Set(record.id_siswa),
        jumlah: Set(record.jumlah),
        metode: Set(record.metode),
        tanggal_bayar: Set(now),
        tanggal_konfirmasi: Set((record.status == PaymentStatus::Diterima).then_some(now)),
        status: Set(record.status),
    };
    model.insert(db).await
}

/// List payments, optionally for one student, newest first.
pub async fn list(db: &DatabaseConnection, id_siswa: Option<&str>) -> Result<Vec<payments::Model>, DbErr> {
    let mut query = Payments::find();
    if let Some(id) = id_siswa {
        query = query.filter(payments::Column::IdSiswa.eq(id));
    }
    query.order_by_desc(payments::Column::TanggalBayar).all(db).await
}

/// Accepted payments with `tanggal_bayar` in `[start, end)`.
pub async fn list_accepted_between(
    db: &DatabaseConnection,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<Vec<payments::Model>, DbErr> {
    Payments::find()
        .filter(payments::Column::Status.eq(PaymentStatus::Diterima))
        .filter(payments::Column::TanggalBayar.gte(start))
        .filter(payments::Column::TanggalBayar.lt(end))
        .order_by_asc(payments::Column::TanggalBayar)
        .all(db)
        .await
}

/// All accepted payments.
pub async fn list_accepted(db: &DatabaseConnection) -> Result<Vec<payments::Model>, DbErr> {
    Payments::find()
        .filter(payments::Column::Status.eq(PaymentStatus::Diterima))
        .order_by_asc(payments::Column::TanggalBayar)
        .all(db)
        .await
}

/// The pending payment waiting on a bill, if any.
pub async fn find_pending_for_bill<C: ConnectionTrait>(db: &C, id_tagihan: &str) -> Result<Option<payments::Model>, DbErr> {
    Payments::find()
        .filter(payments::Column::IdTagihan.eq(id_tagihan))
        .filter(payments::Column::Status.eq(PaymentStatus::Pending))
        .one(db)
        .await
}

/// Mark a pending payment as accepted.
pub async fn accept<C: ConnectionTrait>(db: &C, payment: payments::Model) -> Result<payments::Model, DbErr> {
    let mut active: payments::ActiveModel = payment.into();
    active.status = Set(PaymentStatus::Diterima);
    active.tanggal_konfirmasi = Set(Some(Utc::now()));
    active.update(db).await
}

/// Remove pending payments of a bill. Returns the number removed.
pub async fn delete_pending_for_bill<C: ConnectionTrait>(db: &C, id_tagihan: &str) -> Result<u64, DbErr> {
    let result = Payments::delete_many()
        .filter(payments::Column::IdTagihan.eq(id_tagihan))
        .filter(payments::Column::Status.eq(PaymentStatus::Pending))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}
