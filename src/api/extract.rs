//! Bearer token extraction and role checks.

use super::state::AppState;
use crate::auth::Claims;
use crate::entities::sea_orm_active_enums::Role;
use crate::error::AppError;
use axum::extract::{FromRequest, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

/// JSON body whose rejections use the API error shape.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Query string whose rejections use the API error shape.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);

/// Caller identity taken from a verified `Authorization: Bearer` token.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Token tidak ditemukan"))?;

        let token = header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::unauthorized("Token tidak valid"))?;

        state.keys.verify(token).map(AuthUser)
    }
}

impl AuthUser {
    pub fn id(&self) -> &str {
        &self.0.user_id
    }

    pub fn role(&self) -> Role {
        self.0.role
    }

    /// Reject callers whose role is not listed.
    pub fn require(&self, roles: &[Role]) -> Result<(), AppError> {
        if roles.contains(&self.0.role) {
            Ok(())
        } else {
            Err(AppError::forbidden("Akses ditolak"))
        }
    }

    /// Allow admins, and students acting on their own record.
    pub fn require_self_or_admin(&self, id_siswa: &str) -> Result<(), AppError> {
        match self.0.role {
            Role::Admin => Ok(()),
            Role::Siswa if self.0.user_id == id_siswa => Ok(()),
            _ => Err(AppError::forbidden("Akses ditolak")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str, role: Role) -> AuthUser {
        AuthUser(Claims {
            user_id: id.into(),
            role,
            iat: 0,
            exp: 0,
        })
    }

    #[test]
    fn test_require_roles() {
        let kepsek = user("k", Role::Kepsek);
        assert!(kepsek.require(&[Role::Admin, Role::Kepsek]).is_ok());
        assert!(matches!(kepsek.require(&[Role::Admin]), Err(AppError::Forbidden(_))));
    }

    #[test]
    fn test_self_or_admin() {
        assert!(user("s1", Role::Siswa).require_self_or_admin("s1").is_ok());
        assert!(user("s1", Role::Siswa).require_self_or_admin("s2").is_err());
        assert!(user("a", Role::Admin).require_self_or_admin("s2").is_ok());
        assert!(user("k", Role::Kepsek).require_self_or_admin("s2").is_err());
    }
}
