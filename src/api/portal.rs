//! Student self-service endpoints.

use super::extract::AuthUser;
use super::state::AppState;
use crate::db::{bill, payment, student};
use crate::entities::{bills, students};
use crate::error::{AppError, Result};
use crate::models::{BillFilter, PaymentWithDetails};
use crate::report::load_payment_details;
use axum::Json;
use axum::extract::{Path, State};

pub async fn profile(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<students::Model>> {
    auth.require_self_or_admin(&id)?;
    let siswa = student::get_by_id(&state.db, &id)
        .await?
        .ok_or_else(|| AppError::not_found("Siswa tidak ditemukan"))?;
    Ok(Json(siswa))
}

pub async fn bills(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<bills::Model>>> {
    auth.require_self_or_admin(&id)?;
    let filter = BillFilter {
        status: None,
        id_siswa: Some(id),
    };
    Ok(Json(bill::list(&state.db, &filter).await?))
}

pub async fn payments(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<PaymentWithDetails>>> {
    auth.require_self_or_admin(&id)?;
    let payments = payment::list(&state.db, Some(&id)).await?;
    Ok(Json(load_payment_details(&state.db, payments).await?))
}
