//! Payment listing and submission.

use super::extract::{ApiJson, ApiQuery, AuthUser};
use super::state::AppState;
use crate::billing::Actor;
use crate::db::payment;
use crate::entities::sea_orm_active_enums::{PaymentStatus, Role};
use crate::error::Result;
use crate::models::{CreatePayment, PaymentFilter, PaymentWithDetails};
use crate::report::load_payment_details;
use axum::Json;
use axum::extract::State;
use serde_json::{Value, json};

pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<PaymentFilter>,
) -> Result<Json<Vec<PaymentWithDetails>>> {
    auth.require(&[Role::Admin, Role::Kepsek])?;
    let payments = payment::list(&state.db, filter.id_siswa.as_deref()).await?;
    Ok(Json(load_payment_details(&state.db, payments).await?))
}

pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    ApiJson(data): ApiJson<CreatePayment>,
) -> Result<Json<Value>> {
    auth.require(&[Role::Admin, Role::Siswa])?;
    let actor = Actor {
        user_id: auth.id(),
        role: auth.role(),
    };
    let recorded = state.billing.submit_payment(actor, data).await?;
    let message = match recorded.status {
        PaymentStatus::Pending => "Pembayaran berhasil dikirim, menunggu konfirmasi admin",
        PaymentStatus::Diterima => "Pembayaran berhasil dicatat",
    };
    Ok(Json(json!({ "message": message, "payment": recorded })))
}
