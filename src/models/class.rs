//! Class DTOs for create and update operations.

use crate::entities::classes;
use serde::{Deserialize, Serialize};

/// DTO for creating a class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateClass {
    pub nama_kelas: String,
    pub nominal_spp: i64,
}

/// DTO for updating a class. Same shape as create; both fields are replaced.
pub type UpdateClass = CreateClass;

/// Query filter for the class list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClassFilter {
    pub q: Option<String>,
}

impl CreateClass {
    pub fn validate(&self) -> Result<(), String> {
        if self.nama_kelas.trim().is_empty() {
            return Err("Nama kelas wajib diisi".to_string());
        }
        if self.nominal_spp <= 0 {
            return Err("Nominal SPP harus lebih dari 0".to_string());
        }
        Ok(())
    }
}

impl ClassFilter {
    pub fn matches(&self, class: &classes::Model) -> bool {
        match self.q.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            Some(term) => class.nama_kelas.to_lowercase().contains(&term.to_lowercase()),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_nominal() {
        let mut dto = CreateClass {
            nama_kelas: "X-2".into(),
            nominal_spp: 0,
        };
        assert!(dto.validate().is_err());

        dto.nominal_spp = 500_000;
        assert!(dto.validate().is_ok());

        dto.nama_kelas = " ".into();
        assert!(dto.validate().is_err());
    }
}
