//! Student repository with CRUD operations.

use crate::entities::{bills, payments, prelude::*, students};
use crate::models::{CreateStudent, UpdateStudent};
use chrono::Utc;
use sea_orm::*;
use std::collections::HashMap;

/// List all students ordered by name.
pub async fn list_all(db: &DatabaseConnection) -> Result<Vec<students::Model>, DbErr> {
    Students::find()
        .order_by_asc(students::Column::Nama)
        .order_by_asc(students::Column::Nis)
        .all(db)
        .await
}

/// All students keyed by ID, for enriching bill and payment rows.
pub async fn map_by_id(db: &DatabaseConnection) -> Result<HashMap<String, students::Model>, DbErr> {
    Ok(Students::find()
        .all(db)
        .await?
        .into_iter()
        .map(|s| (s.id.clone(), s))
        .collect())
}

/// Get student by ID.
pub async fn get_by_id<C: ConnectionTrait>(db: &C, id: &str) -> Result<Option<students::Model>, DbErr> {
    Students::find_by_id(id).one(db).await
}

/// Find a student by login username.
pub async fn get_by_username(db: &DatabaseConnection, username: &str) -> Result<Option<students::Model>, DbErr> {
    Students::find()
        .filter(students::Column::Username.eq(username))
        .one(db)
        .await
}

/// Count all students.
pub async fn count_all(db: &DatabaseConnection) -> Result<u64, DbErr> {
    Students::find().count(db).await
}

/// Create a new student with an already hashed password.
pub async fn create(db: &DatabaseConnection, data: CreateStudent, password_hash: String) -> Result<students::Model, DbErr> {
    let model = students::ActiveModel {
        id: Set(uuid::Uuid::new_v4().to_string()),
        nis: Set(data.nis.trim().to_string()),
        nama: Set(data.nama.trim().to_string()),
        kelas: Set(data.kelas.trim().to_string()),
        no_wa: Set(data.no_wa.trim().to_string()),
        username: Set(data.username.trim().to_string()),
        password: Set(password_hash),
        created_at: Set(Utc::now()),
    };
    model.insert(db).await
}

/// Update an existing student. `password_hash` replaces the stored hash when given.
pub async fn update(
    db: &DatabaseConnection,
    id: &str,
    data: UpdateStudent,
    password_hash: Option<String>,
) -> Result<Option<students::Model>, DbErr> {
    let Some(existing) = Students::find_by_id(id).one(db).await? else {
        return Ok(None);
    };

    let mut active: students::ActiveModel = existing.into();
    active.nis = Set(data.nis.trim().to_string());
    active.nama = Set(data.nama.trim().to_string());
    active.kelas = Set(data.kelas.trim().to_string());
    active.no_wa = Set(data.no_wa.trim().to_string());
    active.username = Set(data.username.trim().to_string());
    if let Some(hash) = password_hash {
        active.password = Set(hash);
    }

    let updated = active.update(db).await?;
    Ok(Some(updated))
}

/// Delete a student together with their bills and payments.
pub async fn delete(db: &DatabaseConnection, id: &str) -> Result<bool, DbErr> {
    let txn = db.begin().await?;

    Payments::delete_many()
        .filter(payments::Column::IdSiswa.eq(id))
        .exec(&txn)
        .await?;
    Bills::delete_many().filter(bills::Column::IdSiswa.eq(id)).exec(&txn).await?;
    let result = Students::delete_by_id(id).exec(&txn).await?;

    txn.commit().await?;
    Ok(result.rows_affected > 0)
}

/// Check if a NIS is taken by another student.
pub async fn nis_exists(db: &DatabaseConnection, nis: &str, exclude_id: Option<&str>) -> Result<bool, DbErr> {
    let mut query = Students::find().filter(students::Column::Nis.eq(nis.trim()));
    if let Some(id) = exclude_id {
        query = query.filter(students::Column::Id.ne(id));
    }
    Ok(query.count(db).await? > 0)
}

/// Check if a username is taken by another student or by a staff account.
pub async fn username_exists(db: &DatabaseConnection, username: &str, exclude_id: Option<&str>) -> Result<bool, DbErr> {
    let username = username.trim();
    let mut query = Students::find().filter(students::Column::Username.eq(username));
    if let Some(id) = exclude_id {
        query = query.filter(students::Column::Id.ne(id));
    }
    if query.count(db).await? > 0 {
        return Ok(true);
    }
    Ok(crate::db::user::get_by_username(db, username).await?.is_some())
}
