//! Payment DTOs and enriched listing rows.

use super::student::StudentSummary;
use crate::entities::payments;
use serde::{Deserialize, Serialize};

fn default_metode() -> String {
    "transfer".to_string()
}

/// DTO for submitting or recording a payment against a bill.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePayment {
    pub id_tagihan: String,
    pub id_siswa: String,
    pub jumlah: i64,
    #[serde(default = "default_metode")]
    pub metode: String,
}

/// Query filter for payment listings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentFilter {
    pub id_siswa: Option<String>,
}

/// Billing period a payment belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillRef {
    pub bulan: String,
    pub tahun: i32,
}

/// Payment row with student and bill context.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentWithDetails {
    #[serde(flatten)]
    pub payment: payments::Model,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub siswa: Option<StudentSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tagihan: Option<BillRef>,
}

impl CreatePayment {
    pub fn validate(&self) -> Result<(), String> {
        if self.jumlah <= 0 {
            return Err("Jumlah pembayaran harus lebih dari 0".to_string());
        }
        if self.metode.trim().is_empty() {
            return Err("Metode pembayaran wajib diisi".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metode_defaults_to_transfer() {
        let dto: CreatePayment =
            serde_json::from_str(r#"{"id_tagihan":"b1","id_siswa":"s1","jumlah":500000}"#).unwrap();
        assert_eq!(dto.metode, "transfer");
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_rejects_non_positive_amount() {
        let dto = CreatePayment {
            id_tagihan: "b1".into(),
            id_siswa: "s1".into(),
            jumlah: 0,
            metode: "tunai".into(),
        };
        assert!(dto.validate().is_err());
    }
}
