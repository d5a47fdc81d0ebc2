//! Income aggregation for the dashboard and reports.
//!
//! Only accepted payments count as income. Payments are bucketed by
//! `tanggal_bayar` in the school's time zone.

use crate::db::{bill, payment, student};
use crate::entities::sea_orm_active_enums::BillStatus;
use crate::entities::{bills, payments, students};
use crate::error::Result;
use crate::models::payment::BillRef;
use crate::models::{
    AnnualPoint, AnnualReport, BillFilter, Bulan, DailyReport, DashboardStats, MonthlyPoint, MonthlyReport,
    PaymentWithDetails, StudentSummary,
};
use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Offset, TimeZone, Utc};
use sea_orm::DatabaseConnection;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Number of months shown on the dashboard chart.
pub const CHART_MONTHS: usize = 6;

/// Fixed offset for a whole-hour UTC offset. Out-of-range values fall back to UTC.
pub fn school_offset(utc_offset_hours: i32) -> FixedOffset {
    FixedOffset::east_opt(utc_offset_hours * 3600).unwrap_or_else(|| Utc.fix())
}

/// UTC instants bounding a local calendar day, `[start, end)`.
pub fn day_bounds(date: NaiveDate, offset: FixedOffset) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = local_midnight(date, offset);
    let end = local_midnight(date.succ_opt().unwrap_or(date), offset);
    (start, end)
}

/// UTC instants bounding a local calendar month, `[start, end)`.
pub fn month_bounds(tahun: i32, bulan: Bulan, offset: FixedOffset) -> (DateTime<Utc>, DateTime<Utc>) {
    let first = NaiveDate::from_ymd_opt(tahun, bulan.number(), 1).unwrap_or(NaiveDate::MIN);
    let next = if bulan == Bulan::Desember {
        NaiveDate::from_ymd_opt(tahun + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(tahun, bulan.number() + 1, 1)
    }
    .unwrap_or(NaiveDate::MAX);
    (local_midnight(first, offset), local_midnight(next, offset))
}

fn local_midnight(date: NaiveDate, offset: FixedOffset) -> DateTime<Utc> {
    let naive = date.and_hms_opt(0, 0, 0).unwrap_or_default();
    offset
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| naive.and_utc())
}

/// Sum of payment amounts.
pub fn total(payments: &[payments::Model]) -> i64 {
    payments.iter().map(|p| p.jumlah).sum()
}

/// Income per local `YYYY-MM`, in calendar order.
pub fn income_by_month(payments: &[payments::Model], offset: FixedOffset) -> Vec<MonthlyPoint> {
    let mut buckets: BTreeMap<String, i64> = BTreeMap::new();
    for p in payments {
        let key = p.tanggal_bayar.with_timezone(&offset).format("%Y-%m").to_string();
        *buckets.entry(key).or_default() += p.jumlah;
    }
    buckets
        .into_iter()
        .map(|(bulan, pemasukan)| MonthlyPoint { bulan, pemasukan })
        .collect()
}

/// Income per local calendar year, in order.
pub fn income_by_year(payments: &[payments::Model], offset: FixedOffset) -> Vec<AnnualPoint> {
    let mut buckets: BTreeMap<i32, i64> = BTreeMap::new();
    for p in payments {
        *buckets.entry(p.tanggal_bayar.with_timezone(&offset).year()).or_default() += p.jumlah;
    }
    buckets
        .into_iter()
        .map(|(tahun, pemasukan)| AnnualPoint { tahun, pemasukan })
        .collect()
}

/// Keep only the last `n` points.
pub fn last_points<T>(mut points: Vec<T>, n: usize) -> Vec<T> {
    let skip = points.len().saturating_sub(n);
    points.drain(..skip);
    points
}

/// Distinct students owning at least one bill in `status`.
pub fn students_with_status(bills: &[bills::Model], status: BillStatus) -> usize {
    bills
        .iter()
        .filter(|b| b.status == status)
        .map(|b| b.id_siswa.as_str())
        .collect::<HashSet<_>>()
        .len()
}

/// Bill counts for a period: (total, lunas, menunggu_konfirmasi).
pub fn status_counts(bills: &[bills::Model]) -> (usize, usize, usize) {
    let lunas = bills.iter().filter(|b| b.status == BillStatus::Lunas).count();
    let menunggu = bills
        .iter()
        .filter(|b| b.status == BillStatus::MenungguKonfirmasi)
        .count();
    (bills.len(), lunas, menunggu)
}

/// Attach student and bill context to payments.
pub fn enrich_payments(
    payments: Vec<payments::Model>,
    students: &HashMap<String, students::Model>,
    bills: &HashMap<String, bills::Model>,
) -> Vec<PaymentWithDetails> {
    payments
        .into_iter()
        .map(|p| PaymentWithDetails {
            siswa: students.get(&p.id_siswa).map(StudentSummary::from),
            tagihan: bills.get(&p.id_tagihan).map(|b| BillRef {
                bulan: b.bulan.clone(),
                tahun: b.tahun,
            }),
            payment: p,
        })
        .collect()
}

/// Load students and bills referenced by payments and enrich them.
pub async fn load_payment_details(
    db: &DatabaseConnection,
    payments: Vec<payments::Model>,
) -> Result<Vec<PaymentWithDetails>> {
    let students = student::map_by_id(db).await?;
    let bill_ids: Vec<String> = payments.iter().map(|p| p.id_tagihan.clone()).collect();
    let bills = bill::map_by_ids(db, &bill_ids).await?;
    Ok(enrich_payments(payments, &students, &bills))
}

/// Admin dashboard figures as of `now`.
pub async fn dashboard_stats(db: &DatabaseConnection, offset: FixedOffset, now: DateTime<Utc>) -> Result<DashboardStats> {
    let local_now = now.with_timezone(&offset);
    let this_month = Bulan::from_number(local_now.month()).unwrap_or(Bulan::Januari);
    let (start, end) = month_bounds(local_now.year(), this_month, offset);

    let accepted = payment::list_accepted(db).await?;
    let total_bulan_ini = accepted
        .iter()
        .filter(|p| p.tanggal_bayar >= start && p.tanggal_bayar < end)
        .map(|p| p.jumlah)
        .sum();

    let all_bills = bill::list(db, &BillFilter::default()).await?;

    Ok(DashboardStats {
        total_siswa: student::count_all(db).await?,
        total_bulan_ini,
        siswa_menunggak: students_with_status(&all_bills, BillStatus::Belum),
        menunggu_konfirmasi: all_bills
            .iter()
            .filter(|b| b.status == BillStatus::MenungguKonfirmasi)
            .count(),
        chart_data: last_points(income_by_month(&accepted, offset), CHART_MONTHS),
    })
}

/// Accepted payments made on the local day containing `now`.
pub async fn daily_report(db: &DatabaseConnection, offset: FixedOffset, now: DateTime<Utc>) -> Result<DailyReport> {
    let today = now.with_timezone(&offset).date_naive();
    let (start, end) = day_bounds(today, offset);
    let payments = payment::list_accepted_between(db, start, end).await?;

    Ok(DailyReport {
        tanggal: today.format("%Y-%m-%d").to_string(),
        total: total(&payments),
        payments: load_payment_details(db, payments).await?,
    })
}

/// Income and bill status counts for one billing period.
pub async fn monthly_report(db: &DatabaseConnection, bulan: Bulan, tahun: i32, offset: FixedOffset) -> Result<MonthlyReport> {
    let (start, end) = month_bounds(tahun, bulan, offset);
    let payments = payment::list_accepted_between(db, start, end).await?;
    let bills = bill::list_by_period(db, bulan.name(), tahun).await?;
    let (total_tagihan, total_lunas, total_menunggu_konfirmasi) = status_counts(&bills);

    Ok(MonthlyReport {
        bulan: bulan.name().to_string(),
        tahun,
        total_pemasukan: total(&payments),
        total_tagihan,
        total_lunas,
        total_menunggu_konfirmasi,
        total_belum_lunas: total_tagihan - total_lunas,
        payments: load_payment_details(db, payments).await?,
    })
}

/// Yearly income for the principal's dashboard.
pub async fn annual_report(db: &DatabaseConnection, offset: FixedOffset, now: DateTime<Utc>) -> Result<AnnualReport> {
    let tahun = now.with_timezone(&offset).year();
    let accepted = payment::list_accepted(db).await?;
    let chart_data = income_by_year(&accepted, offset);
    let total_pemasukan_tahun_ini = chart_data
        .iter()
        .find(|p| p.tahun == tahun)
        .map(|p| p.pemasukan)
        .unwrap_or(0);

    Ok(AnnualReport {
        tahun,
        total_pemasukan_tahun_ini,
        chart_data,
    })
}

/// One line of an exported period report.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub nis: String,
    pub nama: String,
    pub kelas: String,
    pub bulan: String,
    pub tahun: i32,
    pub jumlah: i64,
    pub status: BillStatus,
}

/// Bills of a period joined with their students, ordered by class then name.
///
/// Bills whose student no longer exists are left out.
pub async fn period_rows(db: &DatabaseConnection, bulan: Bulan, tahun: i32) -> Result<Vec<ReportRow>> {
    let bills = bill::list_by_period(db, bulan.name(), tahun).await?;
    let students = student::map_by_id(db).await?;
    Ok(build_rows(bills, &students))
}

pub fn build_rows(bills: Vec<bills::Model>, students: &HashMap<String, students::Model>) -> Vec<ReportRow> {
    let mut rows: Vec<ReportRow> = bills
        .into_iter()
        .filter_map(|b| {
            let s = students.get(&b.id_siswa)?;
            Some(ReportRow {
                nis: s.nis.clone(),
                nama: s.nama.clone(),
                kelas: s.kelas.clone(),
                bulan: b.bulan,
                tahun: b.tahun,
                jumlah: b.jumlah,
                status: b.status,
            })
        })
        .collect();
    rows.sort_by(|a, b| a.kelas.cmp(&b.kelas).then_with(|| a.nama.cmp(&b.nama)));
    rows
}

/// Total of paid rows.
pub fn paid_total(rows: &[ReportRow]) -> i64 {
    rows.iter()
        .filter(|r| r.status == BillStatus::Lunas)
        .map(|r| r.jumlah)
        .sum()
}
