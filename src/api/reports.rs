//! Daily, monthly and annual reports with Excel and PDF downloads.

use super::extract::{ApiQuery, AuthUser};
use super::state::AppState;
use crate::entities::sea_orm_active_enums::Role;
use crate::error::{AppError, Result};
use crate::export::{self, PDF_CONTENT_TYPE, XLSX_CONTENT_TYPE};
use crate::models::bill::validate_tahun;
use crate::models::{AnnualReport, BillPeriod, DailyReport, MonthlyReport};
use crate::report;
use axum::Json;
use axum::extract::State;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use tracing::info;

const REPORT_ROLES: [Role; 2] = [Role::Admin, Role::Kepsek];

pub async fn daily(auth: AuthUser, State(state): State<AppState>) -> Result<Json<DailyReport>> {
    auth.require(&REPORT_ROLES)?;
    Ok(Json(report::daily_report(&state.db, state.offset(), Utc::now()).await?))
}

pub async fn monthly(
    auth: AuthUser,
    State(state): State<AppState>,
    ApiQuery(period): ApiQuery<BillPeriod>,
) -> Result<Json<MonthlyReport>> {
    auth.require(&REPORT_ROLES)?;
    validate_tahun(period.tahun).map_err(AppError::validation)?;
    Ok(Json(
        report::monthly_report(&state.db, period.bulan, period.tahun, state.offset()).await?,
    ))
}

pub async fn annual(auth: AuthUser, State(state): State<AppState>) -> Result<Json<AnnualReport>> {
    auth.require(&REPORT_ROLES)?;
    Ok(Json(report::annual_report(&state.db, state.offset(), Utc::now()).await?))
}

pub async fn export_excel(
    auth: AuthUser,
    State(state): State<AppState>,
    ApiQuery(period): ApiQuery<BillPeriod>,
) -> Result<Response> {
    auth.require(&REPORT_ROLES)?;
    validate_tahun(period.tahun).map_err(AppError::validation)?;

    let rows = report::period_rows(&state.db, period.bulan, period.tahun).await?;
    let bytes = export::export_report_to_excel(&rows)?;
    let filename = export::export_filename(period.bulan.name(), period.tahun, "xlsx");
    info!("Exported {} rows to {}", rows.len(), filename);
    Ok(attachment(bytes, XLSX_CONTENT_TYPE, &filename))
}

pub async fn export_pdf(
    auth: AuthUser,
    State(state): State<AppState>,
    ApiQuery(period): ApiQuery<BillPeriod>,
) -> Result<Response> {
    auth.require(&REPORT_ROLES)?;
    validate_tahun(period.tahun).map_err(AppError::validation)?;

    let rows = report::period_rows(&state.db, period.bulan, period.tahun).await?;
    let bytes = export::export_report_to_pdf(
        &rows,
        period.bulan.name(),
        period.tahun,
        &state.config.billing.school_name,
    )?;
    let filename = export::export_filename(period.bulan.name(), period.tahun, "pdf");
    info!("Exported {} rows to {}", rows.len(), filename);
    Ok(attachment(bytes, PDF_CONTENT_TYPE, &filename))
}

fn attachment(bytes: Vec<u8>, content_type: &'static str, filename: &str) -> Response {
    (
        [
            (CONTENT_TYPE, content_type.to_string()),
            (CONTENT_DISPOSITION, format!("attachment; filename={filename}")),
        ],
        bytes,
    )
        .into_response()
}
