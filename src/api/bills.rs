//! Bill listing, monthly generation and admin confirmation.

use super::extract::{ApiJson, ApiQuery, AuthUser};
use super::state::AppState;
use crate::db::{bill, student};
use crate::entities::sea_orm_active_enums::{BillStatus, Role};
use crate::error::Result;
use crate::models::{BillConfirm, BillFilter, BillGenerate, BillWithStudent, StudentSummary};
use axum::Json;
use axum::extract::{Path, State};
use serde_json::{Value, json};

pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<BillFilter>,
) -> Result<Json<Vec<BillWithStudent>>> {
    auth.require(&[Role::Admin, Role::Kepsek])?;
    let bills = bill::list(&state.db, &filter).await?;
    let students = student::map_by_id(&state.db).await?;

    let rows = bills
        .into_iter()
        .map(|b| BillWithStudent {
            siswa: students.get(&b.id_siswa).map(StudentSummary::from),
            bill: b,
        })
        .collect();
    Ok(Json(rows))
}

pub async fn generate(
    auth: AuthUser,
    State(state): State<AppState>,
    ApiJson(req): ApiJson<BillGenerate>,
) -> Result<Json<Value>> {
    auth.require(&[Role::Admin])?;
    let result = state.billing.generate(req.bulan, req.tahun).await?;
    Ok(Json(json!({
        "message": result.summary(),
        "generated": result.generated,
        "skipped": result.skipped,
    })))
}

pub async fn confirm(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<BillConfirm>,
) -> Result<Json<Value>> {
    auth.require(&[Role::Admin])?;
    let outcome = state.billing.confirm(&id, req.status).await?;
    let message = match outcome.bill.status {
        BillStatus::Lunas => "Pembayaran dikonfirmasi",
        _ => "Pembayaran ditolak",
    };
    Ok(Json(json!({
        "message": message,
        "tagihan": outcome.bill,
        "payment": outcome.payment,
    })))
}
