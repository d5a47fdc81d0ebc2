//! Student management endpoints.

use super::extract::{ApiJson, ApiQuery, AuthUser};
use super::state::AppState;
use crate::auth::hash_password;
use crate::db::{class, student};
use crate::entities::{sea_orm_active_enums::Role, students};
use crate::error::{AppError, Result};
use crate::models::{CreateStudent, StudentFilter, UpdateStudent};
use axum::Json;
use axum::extract::{Path, State};
use serde_json::{Value, json};
use tracing::info;

pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<StudentFilter>,
) -> Result<Json<Vec<students::Model>>> {
    auth.require(&[Role::Admin])?;
    let students = student::list_all(&state.db)
        .await?
        .into_iter()
        .filter(|s| filter.matches(s))
        .collect();
    Ok(Json(students))
}

pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    ApiJson(data): ApiJson<CreateStudent>,
) -> Result<Json<students::Model>> {
    auth.require(&[Role::Admin])?;
    data.validate().map_err(AppError::validation)?;
    check_unique(&state, &data.nis, &data.username, &data.kelas, None).await?;

    let hash = hash_password(&data.password)?;
    let created = student::create(&state.db, data, hash).await?;
    info!("Created student {} ({})", created.nama, created.nis);
    Ok(Json(created))
}

pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(data): ApiJson<UpdateStudent>,
) -> Result<Json<students::Model>> {
    auth.require(&[Role::Admin])?;
    data.validate().map_err(AppError::validation)?;
    if student::get_by_id(&state.db, &id).await?.is_none() {
        return Err(AppError::not_found("Siswa tidak ditemukan"));
    }
    check_unique(&state, &data.nis, &data.username, &data.kelas, Some(&id)).await?;

    let hash = data.new_password().map(hash_password).transpose()?;
    let updated = student::update(&state.db, &id, data, hash)
        .await?
        .ok_or_else(|| AppError::not_found("Siswa tidak ditemukan"))?;
    info!("Updated student {}", updated.nis);
    Ok(Json(updated))
}

pub async fn delete(auth: AuthUser, State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Value>> {
    auth.require(&[Role::Admin])?;
    if !student::delete(&state.db, &id).await? {
        return Err(AppError::not_found("Siswa tidak ditemukan"));
    }
    info!("Deleted student {} with their bills and payments", id);
    Ok(Json(json!({ "message": "Siswa berhasil dihapus" })))
}

async fn check_unique(state: &AppState, nis: &str, username: &str, kelas: &str, exclude_id: Option<&str>) -> Result<()> {
    if student::nis_exists(&state.db, nis, exclude_id).await? {
        return Err(AppError::validation("NIS sudah terdaftar"));
    }
    if student::username_exists(&state.db, username, exclude_id).await? {
        return Err(AppError::validation("Username sudah digunakan"));
    }
    if class::get_by_name(&state.db, kelas.trim()).await?.is_none() {
        return Err(AppError::validation(format!("Kelas {} tidak ditemukan", kelas.trim())));
    }
    Ok(())
}
