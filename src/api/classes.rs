//! Class management endpoints.

use super::extract::{ApiJson, ApiQuery, AuthUser};
use super::state::AppState;
use crate::db::class;
use crate::entities::{classes, sea_orm_active_enums::Role};
use crate::error::{AppError, Result};
use crate::models::{ClassFilter, CreateClass, UpdateClass};
use axum::Json;
use axum::extract::{Path, State};
use serde_json::{Value, json};
use tracing::info;

pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<ClassFilter>,
) -> Result<Json<Vec<classes::Model>>> {
    auth.require(&[Role::Admin, Role::Kepsek])?;
    let classes = class::list_all(&state.db)
        .await?
        .into_iter()
        .filter(|c| filter.matches(c))
        .collect();
    Ok(Json(classes))
}

pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    ApiJson(data): ApiJson<CreateClass>,
) -> Result<Json<classes::Model>> {
    auth.require(&[Role::Admin])?;
    data.validate().map_err(AppError::validation)?;
    if class::name_exists(&state.db, &data.nama_kelas, None).await? {
        return Err(AppError::validation("Nama kelas sudah ada"));
    }

    let created = class::create(&state.db, data).await?;
    info!("Created class {} (SPP {})", created.nama_kelas, created.nominal_spp);
    Ok(Json(created))
}

pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(data): ApiJson<UpdateClass>,
) -> Result<Json<classes::Model>> {
    auth.require(&[Role::Admin])?;
    data.validate().map_err(AppError::validation)?;
    if class::name_exists(&state.db, &data.nama_kelas, Some(&id)).await? {
        return Err(AppError::validation("Nama kelas sudah ada"));
    }

    let updated = class::update(&state.db, &id, data)
        .await?
        .ok_or_else(|| AppError::not_found("Kelas tidak ditemukan"))?;
    info!("Updated class {}", updated.nama_kelas);
    Ok(Json(updated))
}

pub async fn delete(auth: AuthUser, State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Value>> {
    auth.require(&[Role::Admin])?;
    let existing = class::get_by_id(&state.db, &id)
        .await?
        .ok_or_else(|| AppError::not_found("Kelas tidak ditemukan"))?;

    let in_use = class::count_students(&state.db, &existing.nama_kelas).await?;
    if in_use > 0 {
        return Err(AppError::validation(format!(
            "Kelas masih digunakan oleh {in_use} siswa"
        )));
    }

    class::delete(&state.db, &id).await?;
    info!("Deleted class {}", existing.nama_kelas);
    Ok(Json(json!({ "message": "Kelas berhasil dihapus" })))
}
