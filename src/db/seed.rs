//! Default accounts and sample classes for a fresh database.

use crate::auth::hash_password;
use crate::config::AuthConfig;
use crate::db::{class, user};
use crate::entities::sea_orm_active_enums::Role;
use crate::error::Result;
use crate::models::CreateClass;
use sea_orm::DatabaseConnection;
use tracing::info;

/// Sample classes created when `X-1` is missing.
const SAMPLE_CLASSES: [(&str, i64); 3] = [("X-1", 500_000), ("XI-1", 550_000), ("XII-1", 600_000)];

/// Ensure the admin and kepsek accounts and the sample classes exist.
pub async fn seed_defaults(db: &DatabaseConnection, auth: &AuthConfig) -> Result<()> {
    let staff = [
        ("admin", auth.default_admin_password.as_str(), "Administrator", Role::Admin),
        ("kepsek", auth.default_kepsek_password.as_str(), "Kepala Sekolah", Role::Kepsek),
    ];

    for (username, password, nama, role) in staff {
        if user::get_by_username(db, username).await?.is_none() {
            let hash = hash_password(password)?;
            user::create(db, username, &hash, nama, role).await?;
            info!("Created default {} account '{}'", role.as_str(), username);
        }
    }

    if class::get_by_name(db, SAMPLE_CLASSES[0].0).await?.is_none() {
        for (nama_kelas, nominal_spp) in SAMPLE_CLASSES {
            if class::get_by_name(db, nama_kelas).await?.is_none() {
                class::create(
                    db,
                    CreateClass {
                        nama_kelas: nama_kelas.to_string(),
                        nominal_spp,
                    },
                )
                .await?;
            }
        }
        info!("Created {} sample classes", SAMPLE_CLASSES.len());
    }

    Ok(())
}
