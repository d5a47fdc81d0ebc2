//! Bill DTOs and enriched listing rows.

use super::period::Bulan;
use super::student::StudentSummary;
use crate::entities::{bills, sea_orm_active_enums::BillStatus};
use serde::{Deserialize, Serialize};

/// DTO for monthly bill generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillGenerate {
    pub bulan: Bulan,
    pub tahun: i32,
}

/// DTO for an admin status decision on a bill.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillConfirm {
    pub status: BillStatus,
}

/// Query filter for bill listings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BillFilter {
    pub status: Option<BillStatus>,
    pub id_siswa: Option<String>,
}

/// Query parameters naming one billing period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillPeriod {
    pub bulan: Bulan,
    pub tahun: i32,
}

/// Bill row with the owning student's summary.
#[derive(Debug, Clone, Serialize)]
pub struct BillWithStudent {
    #[serde(flatten)]
    pub bill: bills::Model,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub siswa: Option<StudentSummary>,
}

/// Validate a billing year.
pub fn validate_tahun(tahun: i32) -> Result<(), String> {
    if (2000..=2100).contains(&tahun) {
        Ok(())
    } else {
        Err(format!("Tahun tidak valid: {tahun}"))
    }
}

/// Newest period first: by year, then month number.
pub fn sort_newest_first(bills: &mut [bills::Model]) {
    bills.sort_by(|a, b| {
        let month = |bill: &bills::Model| bill.bulan.parse::<Bulan>().map(Bulan::number).unwrap_or(0);
        (b.tahun, month(b)).cmp(&(a.tahun, month(a)))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn bill(bulan: &str, tahun: i32) -> bills::Model {
        bills::Model {
            id: format!("{bulan}-{tahun}"),
            id_siswa: "s1".into(),
            bulan: bulan.into(),
            tahun,
            jumlah: 500_000,
            status: BillStatus::Belum,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_sort_newest_first() {
        let mut bills = vec![bill("Maret", 2024), bill("Januari", 2025), bill("Desember", 2024)];
        sort_newest_first(&mut bills);
        let ids: Vec<_> = bills.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, ["Januari-2025", "Desember-2024", "Maret-2024"]);
    }

    #[test]
    fn test_validate_tahun() {
        assert!(validate_tahun(2025).is_ok());
        assert!(validate_tahun(1999).is_err());
        assert!(validate_tahun(20250).is_err());
    }

    #[test]
    fn test_enriched_row_is_flat() {
        let row = BillWithStudent {
            bill: bill("Mei", 2025),
            siswa: Some(StudentSummary {
                nama: "Budi".into(),
                nis: "1".into(),
                kelas: "X-1".into(),
            }),
        };
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["bulan"], "Mei");
        assert_eq!(json["status"], "belum");
        assert_eq!(json["siswa"]["nama"], "Budi");
    }

    #[test]
    fn test_confirm_parses_status() {
        let dto: BillConfirm = serde_json::from_str(r#"{"status":"lunas"}"#).unwrap();
        assert_eq!(dto.status, BillStatus::Lunas);
        assert!(serde_json::from_str::<BillConfirm>(r#"{"status":"paid"}"#).is_err());
    }
}
