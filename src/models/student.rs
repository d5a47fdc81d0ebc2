//! Student DTOs for create and update operations.

use crate::entities::students;
use serde::{Deserialize, Serialize};

/// DTO for creating a student.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateStudent {
    pub nis: String,
    pub nama: String,
    pub kelas: String,
    pub no_wa: String,
    pub username: String,
    pub password: String,
}

/// DTO for updating a student.
///
/// An absent or empty password keeps the stored hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStudent {
    pub nis: String,
    pub nama: String,
    pub kelas: String,
    pub no_wa: String,
    pub username: String,
    #[serde(default)]
    pub password: Option<String>,
}

/// Query filter for the student list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudentFilter {
    pub q: Option<String>,
}

/// Student fields embedded in bill and payment listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentSummary {
    pub nama: String,
    pub nis: String,
    pub kelas: String,
}

impl CreateStudent {
    pub fn validate(&self) -> Result<(), String> {
        require_fields(&[
            ("NIS", &self.nis),
            ("Nama", &self.nama),
            ("Kelas", &self.kelas),
            ("No WA", &self.no_wa),
            ("Username", &self.username),
            ("Password", &self.password),
        ])
    }
}

impl UpdateStudent {
    pub fn validate(&self) -> Result<(), String> {
        require_fields(&[
            ("NIS", &self.nis),
            ("Nama", &self.nama),
            ("Kelas", &self.kelas),
            ("No WA", &self.no_wa),
            ("Username", &self.username),
        ])
    }

    /// New password, if one was actually supplied.
    pub fn new_password(&self) -> Option<&str> {
        self.password.as_deref().filter(|p| !p.is_empty())
    }
}

impl StudentFilter {
    /// Match on name or class (case-insensitive) or NIS substring.
    pub fn matches(&self, student: &students::Model) -> bool {
        let Some(term) = self.q.as_deref().map(str::trim).filter(|t| !t.is_empty()) else {
            return true;
        };
        let term_lower = term.to_lowercase();
        student.nama.to_lowercase().contains(&term_lower)
            || student.nis.contains(term)
            || student.kelas.to_lowercase().contains(&term_lower)
    }
}

impl From<&students::Model> for StudentSummary {
    fn from(student: &students::Model) -> Self {
        Self {
            nama: student.nama.clone(),
            nis: student.nis.clone(),
            kelas: student.kelas.clone(),
        }
    }
}

fn require_fields(fields: &[(&str, &String)]) -> Result<(), String> {
    for (label, value) in fields {
        if value.trim().is_empty() {
            return Err(format!("{label} wajib diisi"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn student(nama: &str, nis: &str, kelas: &str) -> students::Model {
        students::Model {
            id: "s1".to_string(),
            nis: nis.to_string(),
            nama: nama.to_string(),
            kelas: kelas.to_string(),
            no_wa: "08123".to_string(),
            username: "budi".to_string(),
            password: "hash".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_filter_matches_name_nis_and_class() {
        let s = student("Budi Santoso", "2024001", "XI-1");

        assert!(StudentFilter { q: None }.matches(&s));
        assert!(StudentFilter { q: Some("  ".into()) }.matches(&s));
        assert!(StudentFilter { q: Some("budi".into()) }.matches(&s));
        assert!(StudentFilter { q: Some("24001".into()) }.matches(&s));
        assert!(StudentFilter { q: Some("xi-1".into()) }.matches(&s));
        assert!(!StudentFilter { q: Some("Siti".into()) }.matches(&s));
    }

    #[test]
    fn test_create_requires_all_fields() {
        let mut dto = CreateStudent {
            nis: "1".into(),
            nama: "Budi".into(),
            kelas: "X-1".into(),
            no_wa: "0812".into(),
            username: "budi".into(),
            password: "rahasia".into(),
        };
        assert!(dto.validate().is_ok());

        dto.password = String::new();
        assert_eq!(dto.validate(), Err("Password wajib diisi".to_string()));
    }

    #[test]
    fn test_update_empty_password_is_ignored() {
        let dto = UpdateStudent {
            nis: "1".into(),
            nama: "Budi".into(),
            kelas: "X-1".into(),
            no_wa: "0812".into(),
            username: "budi".into(),
            password: Some(String::new()),
        };
        assert!(dto.validate().is_ok());
        assert_eq!(dto.new_password(), None);
    }

    #[test]
    fn test_password_never_serialized() {
        let json = serde_json::to_value(student("Budi", "1", "X-1")).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["nama"], "Budi");
    }
}
