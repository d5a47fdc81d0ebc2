//! Dashboard figures.

use super::extract::AuthUser;
use super::state::AppState;
use crate::entities::sea_orm_active_enums::Role;
use crate::error::Result;
use crate::models::DashboardStats;
use crate::report;
use axum::Json;
use axum::extract::State;
use chrono::Utc;

pub async fn stats(auth: AuthUser, State(state): State<AppState>) -> Result<Json<DashboardStats>> {
    auth.require(&[Role::Admin, Role::Kepsek])?;
    Ok(Json(report::dashboard_stats(&state.db, state.offset(), Utc::now()).await?))
}
