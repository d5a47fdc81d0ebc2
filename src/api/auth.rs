//! Login and current-identity endpoints.

use super::extract::{ApiJson, AuthUser};
use super::state::AppState;
use crate::auth::{Claims, verify_password};
use crate::db::{student, user};
use crate::entities::sea_orm_active_enums::Role;
use crate::error::{AppError, Result};
use crate::models::{LoginRequest, LoginResponse, UserInfo};
use axum::Json;
use axum::extract::State;
use tracing::{info, warn};

const INVALID_CREDENTIALS: &str = "Username atau password salah";

/// Staff accounts are checked before students.
pub async fn login(State(state): State<AppState>, ApiJson(req): ApiJson<LoginRequest>) -> Result<Json<LoginResponse>> {
    let username = req.username.trim();

    if let Some(staff) = user::get_by_username(&state.db, username).await?
        && verify_password(&req.password, &staff.password)
    {
        let token = state.keys.issue(&staff.id, staff.role)?;
        info!("[AUTH] {} logged in as {}", staff.username, staff.role.as_str());
        return Ok(Json(LoginResponse {
            token,
            user: UserInfo {
                id: staff.id,
                username: staff.username,
                nama: staff.nama,
                role: staff.role,
                nis: None,
            },
        }));
    }

    if let Some(siswa) = student::get_by_username(&state.db, username).await?
        && verify_password(&req.password, &siswa.password)
    {
        let token = state.keys.issue(&siswa.id, Role::Siswa)?;
        info!("[AUTH] Student {} logged in", siswa.nis);
        return Ok(Json(LoginResponse {
            token,
            user: UserInfo {
                id: siswa.id,
                username: siswa.username,
                nama: siswa.nama,
                role: Role::Siswa,
                nis: Some(siswa.nis),
            },
        }));
    }

    warn!("[AUTH] Failed login for '{}'", username);
    Err(AppError::unauthorized(INVALID_CREDENTIALS))
}

pub async fn me(auth: AuthUser) -> Json<Claims> {
    Json(auth.0)
}
