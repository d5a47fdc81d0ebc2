//! Manual WhatsApp message sending.

use super::extract::{ApiJson, AuthUser};
use super::state::AppState;
use crate::entities::sea_orm_active_enums::Role;
use crate::error::{AppError, Result};
use axum::Json;
use axum::extract::State;
use serde::Deserialize;
use serde_json::{Value, json};

#[derive(Debug, Deserialize)]
pub struct SendMessage {
    pub nomor: String,
    pub pesan: String,
}

pub async fn send(
    auth: AuthUser,
    State(state): State<AppState>,
    ApiJson(req): ApiJson<SendMessage>,
) -> Result<Json<Value>> {
    auth.require(&[Role::Admin])?;
    if req.nomor.trim().is_empty() || req.pesan.trim().is_empty() {
        return Err(AppError::validation("Nomor dan pesan wajib diisi"));
    }
    state.notifier.send(req.nomor.trim(), &req.pesan).await?;
    Ok(Json(json!({
        "message": "Pesan terkirim",
        "mock": state.notifier.is_mock(),
    })))
}
