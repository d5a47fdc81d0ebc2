//! Bill generation and the payment confirmation lifecycle.

use crate::config::BillingConfig;
use crate::db::bill::NewBill;
use crate::db::payment::NewPayment;
use crate::db::{bill, class, payment, student};
use crate::entities::sea_orm_active_enums::{BillStatus, PaymentStatus, Role};
use crate::entities::{bills, payments};
use crate::error::{AppError, Result};
use crate::models::{Bulan, CreatePayment};
use crate::notify::{Notifier, receipt_message};
use sea_orm::{DatabaseConnection, TransactionTrait};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// Result of a bill generation run.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateResult {
    pub generated: usize,
    pub skipped: usize,
    pub fallback_fee: usize,
}

impl GenerateResult {
    /// Message returned to the client.
    pub fn summary(&self) -> String {
        format!("Berhasil generate {} tagihan", self.generated)
    }
}

/// Outcome of an admin decision on a bill.
#[derive(Debug, Clone)]
pub struct ConfirmOutcome {
    pub bill: bills::Model,
    pub payment: Option<payments::Model>,
}

/// Who is acting on a bill.
#[derive(Debug, Clone, Copy)]
pub struct Actor<'a> {
    pub user_id: &'a str,
    pub role: Role,
}

/// Service owning bill state changes.
pub struct BillingService {
    db: DatabaseConnection,
    config: BillingConfig,
    notifier: Arc<Notifier>,
}

impl BillingService {
    pub fn new(db: DatabaseConnection, config: BillingConfig, notifier: Arc<Notifier>) -> Self {
        Self { db, config, notifier }
    }

    /// Create one `belum` bill per student that has none for the period.
    ///
    /// The amount is the student's class fee, or the configured default when
    /// the class no longer exists.
    pub async fn generate(&self, bulan: Bulan, tahun: i32) -> Result<GenerateResult> {
        crate::models::bill::validate_tahun(tahun).map_err(AppError::validation)?;

        let students = student::list_all(&self.db).await?;
        let fees: HashMap<String, i64> = class::list_all(&self.db)
            .await?
            .into_iter()
            .map(|c| (c.nama_kelas, c.nominal_spp))
            .collect();

        let mut fallback_fee = 0;
        let records: Vec<NewBill> = students
            .iter()
            .map(|s| {
                let jumlah = match fees.get(&s.kelas) {
                    Some(fee) => *fee,
                    None => {
                        fallback_fee += 1;
                        self.config.default_nominal_spp
                    }
                };
                NewBill {
                    id_siswa: s.id.clone(),
                    bulan: bulan.name().to_string(),
                    tahun,
                    jumlah,
                }
            })
            .collect();

        let txn = self.db.begin().await?;
        let generated = bill::insert_batch(&txn, &records).await?;
        txn.commit().await?;

        let result = GenerateResult {
            generated,
            skipped: records.len().saturating_sub(generated),
            fallback_fee,
        };
        info!(
            "Generated bills for {} {}: {} new, {} already present, {} at default fee",
            bulan, tahun, result.generated, result.skipped, result.fallback_fee
        );
        Ok(result)
    }

    /// Record a payment against a bill.
    ///
    /// A student's submission leaves the bill waiting for confirmation. An
    /// admin records money already received, so the bill is paid at once.
    pub async fn submit_payment(&self, actor: Actor<'_>, data: CreatePayment) -> Result<payments::Model> {
        data.validate().map_err(AppError::validation)?;

        let target = match actor.role {
            Role::Siswa => {
                if data.id_siswa != actor.user_id {
                    return Err(AppError::forbidden("Tidak dapat membayar tagihan siswa lain"));
                }
                BillStatus::MenungguKonfirmasi
            }
            Role::Admin => BillStatus::Lunas,
            Role::Kepsek => return Err(AppError::forbidden("Akses ditolak")),
        };

        let txn = self.db.begin().await?;

        let bill = bill::get_by_id(&txn, &data.id_tagihan)
            .await?
            .ok_or_else(|| AppError::not_found("Tagihan tidak ditemukan"))?;

        if bill.id_siswa != data.id_siswa {
            return Err(AppError::validation("Tagihan bukan milik siswa ini"));
        }
        match bill.status {
            BillStatus::Lunas => return Err(AppError::validation("Tagihan sudah lunas")),
            BillStatus::MenungguKonfirmasi => {
                return Err(AppError::conflict("Pembayaran tagihan ini sedang menunggu konfirmasi"));
            }
            BillStatus::Belum => {}
        }
        if data.jumlah != bill.jumlah {
            return Err(AppError::validation(format!(
                "Jumlah pembayaran harus sama dengan tagihan ({})",
                crate::export::format_rupiah(bill.jumlah)
            )));
        }

        if !bill::transition(&txn, &bill.id, BillStatus::Belum, target).await? {
            return Err(AppError::conflict("Status tagihan telah berubah, silakan muat ulang"));
        }

        let status = if target == BillStatus::Lunas {
            PaymentStatus::Diterima
        } else {
            PaymentStatus::Pending
        };
        let recorded = payment::insert(
            &txn,
            NewPayment {
                id_tagihan: bill.id.clone(),
                id_siswa: bill.id_siswa.clone(),
                jumlah: data.jumlah,
                metode: data.metode.trim().to_string(),
                status,
            },
        )
        .await?;

        txn.commit().await?;
        info!("Payment {} recorded for bill {} ({:?})", recorded.id, bill.id, status);

        if status == PaymentStatus::Diterima {
            self.notify_paid(&bill.id_siswa, &bill.bulan, bill.tahun, recorded.jumlah).await?;
        }
        Ok(recorded)
    }

    /// Apply an admin decision: `lunas` confirms, `belum` rejects a pending submission.
    pub async fn confirm(&self, bill_id: &str, target: BillStatus) -> Result<ConfirmOutcome> {
        let txn = self.db.begin().await?;

        let bill = bill::get_by_id(&txn, bill_id)
            .await?
            .ok_or_else(|| AppError::not_found("Tagihan tidak ditemukan"))?;

        // Only a student's submission may move a bill into waiting.
        if target == BillStatus::MenungguKonfirmasi || !bill.status.can_transition(target) {
            return Err(AppError::conflict(format!(
                "Tagihan berstatus {} tidak dapat diubah menjadi {}",
                bill.status, target
            )));
        }
        if !bill::transition(&txn, &bill.id, bill.status, target).await? {
            return Err(AppError::conflict("Status tagihan telah berubah, silakan muat ulang"));
        }

        let payment = match target {
            BillStatus::Lunas => {
                let accepted = match payment::find_pending_for_bill(&txn, &bill.id).await? {
                    Some(pending) => payment::accept(&txn, pending).await?,
                    None => {
                        payment::insert(
                            &txn,
                            NewPayment {
                                id_tagihan: bill.id.clone(),
                                id_siswa: bill.id_siswa.clone(),
                                jumlah: bill.jumlah,
                                metode: "tunai".to_string(),
                                status: PaymentStatus::Diterima,
                            },
                        )
                        .await?
                    }
                };
                Some(accepted)
            }
            _ => {
                let removed = payment::delete_pending_for_bill(&txn, &bill.id).await?;
                info!("Rejected payment for bill {} ({} pending removed)", bill.id, removed);
                None
            }
        };

        txn.commit().await?;

        let bill = bills::Model { status: target, ..bill };
        if let Some(paid) = &payment {
            info!("Bill {} confirmed as paid", bill.id);
            self.notify_paid(&bill.id_siswa, &bill.bulan, bill.tahun, paid.jumlah).await?;
        }
        Ok(ConfirmOutcome { bill, payment })
    }

    async fn notify_paid(&self, id_siswa: &str, bulan: &str, tahun: i32, jumlah: i64) -> Result<()> {
        if let Some(s) = student::get_by_id(&self.db, id_siswa).await? {
            let message = receipt_message(bulan, tahun, jumlah, &self.config.school_name);
            self.notifier.send_or_log(&s.no_wa, &message).await;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_summary() {
        let result = GenerateResult {
            generated: 12,
            skipped: 3,
            fallback_fee: 0,
        };
        assert_eq!(result.summary(), "Berhasil generate 12 tagihan");
    }
}
