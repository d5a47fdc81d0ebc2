//! Staff account repository.

use crate::entities::{prelude::*, sea_orm_active_enums::Role, users};
use chrono::Utc;
use sea_orm::*;

/// Find a staff account by username.
pub async fn get_by_username(db: &DatabaseConnection, username: &str) -> Result<Option<users::Model>, DbErr> {
    Users::find().filter(users::Column::Username.eq(username)).one(db).await
}

/// Create a staff account with an already hashed password.
pub async fn create(
    db: &DatabaseConnection,
    username: &str,
    password_hash: &str,
    nama: &str,
    role: Role,
) -> Result<users::Model, DbErr> {
    let model = users::ActiveModel {
        id: Set(uuid::Uuid::new_v4().to_string()),
        username: Set(username.to_string()),
        password: Set(password_hash.to_string()),
        nama: Set(nama.to_string()),
        role: Set(role),
        created_at: Set(Utc::now()),
    };
    model.insert(db).await
}
