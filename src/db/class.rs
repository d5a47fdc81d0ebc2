//! Class repository with CRUD operations.

use crate::entities::{classes, prelude::*, students};
use crate::models::CreateClass;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::*;

/// List all classes ordered by name.
pub async fn list_all(db: &DatabaseConnection) -> Result<Vec<classes::Model>, DbErr> {
    Classes::find().order_by_asc(classes::Column::NamaKelas).all(db).await
}

/// Get class by ID.
pub async fn get_by_id(db: &DatabaseConnection, id: &str) -> Result<Option<classes::Model>, DbErr> {
    Classes::find_by_id(id).one(db).await
}

/// Get class by name.
pub async fn get_by_name<C: ConnectionTrait>(db: &C, nama_kelas: &str) -> Result<Option<classes::Model>, DbErr> {
    Classes::find()
        .filter(classes::Column::NamaKelas.eq(nama_kelas))
        .one(db)
        .await
}

/// Create a new class.
pub async fn create(db: &DatabaseConnection, data: CreateClass) -> Result<classes::Model, DbErr> {
    let model = classes::ActiveModel {
        id: Set(uuid::Uuid::new_v4().to_string()),
        nama_kelas: Set(data.nama_kelas.trim().to_string()),
        nominal_spp: Set(data.nominal_spp),
        created_at: Set(Utc::now()),
    };
    model.insert(db).await
}

/// Update a class. A rename is carried over to every student in the class.
pub async fn update(db: &DatabaseConnection, id: &str, data: CreateClass) -> Result<Option<classes::Model>, DbErr> {
    let txn = db.begin().await?;

    let Some(existing) = Classes::find_by_id(id).one(&txn).await? else {
        return Ok(None);
    };

    let old_name = existing.nama_kelas.clone();
    let new_name = data.nama_kelas.trim().to_string();

    let mut active: classes::ActiveModel = existing.into();
    active.nama_kelas = Set(new_name.clone());
    active.nominal_spp = Set(data.nominal_spp);
    let updated = active.update(&txn).await?;

    if old_name != new_name {
        Students::update_many()
            .col_expr(students::Column::Kelas, Expr::value(new_name))
            .filter(students::Column::Kelas.eq(old_name))
            .exec(&txn)
            .await?;
    }

    txn.commit().await?;
    Ok(Some(updated))
}

/// Delete a class by ID.
pub async fn delete(db: &DatabaseConnection, id: &str) -> Result<bool, DbErr> {
    let result = Classes::delete_by_id(id).exec(db).await?;
    Ok(result.rows_affected > 0)
}

/// Check if class name exists (for validation).
pub async fn name_exists(db: &DatabaseConnection, nama_kelas: &str, exclude_id: Option<&str>) -> Result<bool, DbErr> {
    let mut query = Classes::find().filter(classes::Column::NamaKelas.eq(nama_kelas.trim()));

    if let Some(id) = exclude_id {
        query = query.filter(classes::Column::Id.ne(id));
    }

    let count = query.count(db).await?;
    Ok(count > 0)
}

/// Count students assigned to a class name.
pub async fn count_students(db: &DatabaseConnection, nama_kelas: &str) -> Result<u64, DbErr> {
    Students::find()
        .filter(students::Column::Kelas.eq(nama_kelas))
        .count(db)
        .await
}
