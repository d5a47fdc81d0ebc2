//! Indonesian month names used for billing periods.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Calendar month as written on bills ("Januari" .. "Desember").
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Bulan {
    Januari,
    Februari,
    Maret,
    April,
    Mei,
    Juni,
    Juli,
    Agustus,
    September,
    Oktober,
    November,
    Desember,
}

impl Bulan {
    pub const ALL: [Bulan; 12] = [
        Bulan::Januari,
        Bulan::Februari,
        Bulan::Maret,
        Bulan::April,
        Bulan::Mei,
        Bulan::Juni,
        Bulan::Juli,
        Bulan::Agustus,
        Bulan::September,
        Bulan::Oktober,
        Bulan::November,
        Bulan::Desember,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Bulan::Januari => "Januari",
            Bulan::Februari => "Februari",
            Bulan::Maret => "Maret",
            Bulan::April => "April",
            Bulan::Mei => "Mei",
            Bulan::Juni => "Juni",
            Bulan::Juli => "Juli",
            Bulan::Agustus => "Agustus",
            Bulan::September => "September",
            Bulan::Oktober => "Oktober",
            Bulan::November => "November",
            Bulan::Desember => "Desember",
        }
    }

    /// Month number, 1-based.
    pub fn number(self) -> u32 {
        self as u32 + 1
    }

    pub fn from_number(number: u32) -> Option<Bulan> {
        Self::ALL.get(number.checked_sub(1)? as usize).copied()
    }
}

impl fmt::Display for Bulan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Bulan {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|b| b.name().eq_ignore_ascii_case(input))
            .ok_or_else(|| format!("Bulan tidak valid: {input}"))
    }
}

impl TryFrom<String> for Bulan {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Bulan> for String {
    fn from(value: Bulan) -> Self {
        value.name().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("januari".parse::<Bulan>(), Ok(Bulan::Januari));
        assert_eq!(" DESEMBER ".parse::<Bulan>(), Ok(Bulan::Desember));
    }

    #[test]
    fn test_english_names_rejected() {
        assert!("January".parse::<Bulan>().is_err());
        assert!("May".parse::<Bulan>().is_err());
    }

    #[test]
    fn test_numbers() {
        assert_eq!(Bulan::Januari.number(), 1);
        assert_eq!(Bulan::Agustus.number(), 8);
        assert_eq!(Bulan::from_number(12), Some(Bulan::Desember));
        assert_eq!(Bulan::from_number(0), None);
        assert_eq!(Bulan::from_number(13), None);
    }

    #[test]
    fn test_serde_uses_canonical_name() {
        let parsed: Bulan = serde_json::from_str("\"maret\"").unwrap();
        assert_eq!(parsed, Bulan::Maret);
        assert_eq!(serde_json::to_string(&parsed).unwrap(), "\"Maret\"");
        assert!(serde_json::from_str::<Bulan>("\"Smarch\"").is_err());
    }
}
