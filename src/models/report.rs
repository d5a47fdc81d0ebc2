//! Dashboard and report view models.

use super::payment::PaymentWithDetails;
use serde::Serialize;

/// Income for one `YYYY-MM` bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyPoint {
    pub bulan: String,
    pub pemasukan: i64,
}

/// Income for one calendar year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnualPoint {
    pub tahun: i32,
    pub pemasukan: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub total_siswa: u64,
    pub total_bulan_ini: i64,
    pub siswa_menunggak: usize,
    pub menunggu_konfirmasi: usize,
    pub chart_data: Vec<MonthlyPoint>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DailyReport {
    pub tanggal: String,
    pub total: i64,
    pub payments: Vec<PaymentWithDetails>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthlyReport {
    pub bulan: String,
    pub tahun: i32,
    pub total_pemasukan: i64,
    pub total_tagihan: usize,
    pub total_lunas: usize,
    pub total_menunggu_konfirmasi: usize,
    pub total_belum_lunas: usize,
    pub payments: Vec<PaymentWithDetails>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnnualReport {
    pub tahun: i32,
    pub total_pemasukan_tahun_ini: i64,
    pub chart_data: Vec<AnnualPoint>,
}
