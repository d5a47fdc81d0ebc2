//! String-backed enums stored in status and role columns.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Account role carried in tokens.
///
/// Staff accounts are `Admin` or `Kepsek`; `Siswa` is implied by logging in
/// with a student record and is never stored in `users`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[sea_orm(string_value = "admin")]
    Admin,
    #[sea_orm(string_value = "kepsek")]
    Kepsek,
    #[sea_orm(string_value = "siswa")]
    Siswa,
}

/// Bill lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(24))")]
#[serde(rename_all = "snake_case")]
pub enum BillStatus {
    #[sea_orm(string_value = "belum")]
    Belum,
    #[sea_orm(string_value = "menunggu_konfirmasi")]
    MenungguKonfirmasi,
    #[sea_orm(string_value = "lunas")]
    Lunas,
}

/// Payment record state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "diterima")]
    Diterima,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Kepsek => "kepsek",
            Self::Siswa => "siswa",
        }
    }
}

impl BillStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Belum => "belum",
            Self::MenungguKonfirmasi => "menunggu_konfirmasi",
            Self::Lunas => "lunas",
        }
    }

    /// Whether the lifecycle allows moving from `self` to `to`.
    pub fn can_transition(self, to: BillStatus) -> bool {
        matches!(
            (self, to),
            (Self::Belum, Self::MenungguKonfirmasi)
                | (Self::Belum, Self::Lunas)
                | (Self::MenungguKonfirmasi, Self::Lunas)
                | (Self::MenungguKonfirmasi, Self::Belum)
        )
    }
}

impl std::fmt::Display for BillStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BillStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "belum" => Ok(Self::Belum),
            "menunggu_konfirmasi" => Ok(Self::MenungguKonfirmasi),
            "lunas" => Ok(Self::Lunas),
            other => Err(format!("Status tagihan tidak dikenal: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_transitions_allowed() {
        assert!(BillStatus::Belum.can_transition(BillStatus::MenungguKonfirmasi));
        assert!(BillStatus::MenungguKonfirmasi.can_transition(BillStatus::Lunas));
        assert!(BillStatus::Belum.can_transition(BillStatus::Lunas));
    }

    #[test]
    fn test_rejection_returns_to_belum() {
        assert!(BillStatus::MenungguKonfirmasi.can_transition(BillStatus::Belum));
    }

    #[test]
    fn test_lunas_is_final() {
        for to in [BillStatus::Belum, BillStatus::MenungguKonfirmasi, BillStatus::Lunas] {
            assert!(!BillStatus::Lunas.can_transition(to));
        }
    }

    #[test]
    fn test_same_state_rejected() {
        assert!(!BillStatus::Belum.can_transition(BillStatus::Belum));
        assert!(!BillStatus::MenungguKonfirmasi.can_transition(BillStatus::MenungguKonfirmasi));
    }

    #[test]
    fn test_status_parse_and_display() {
        assert_eq!("menunggu_konfirmasi".parse::<BillStatus>(), Ok(BillStatus::MenungguKonfirmasi));
        assert_eq!(BillStatus::Lunas.to_string(), "lunas");
        assert!("paid".parse::<BillStatus>().is_err());
    }

    #[test]
    fn test_serde_names_match_column_values() {
        assert_eq!(serde_json::to_string(&BillStatus::MenungguKonfirmasi).unwrap(), "\"menunggu_konfirmasi\"");
        assert_eq!(serde_json::to_string(&PaymentStatus::Diterima).unwrap(), "\"diterima\"");
        assert_eq!(serde_json::to_string(&Role::Kepsek).unwrap(), "\"kepsek\"");
    }
}
