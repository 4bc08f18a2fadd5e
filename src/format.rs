use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Preset amounts (baht) offered as one-tap choices.
pub const QUICK_AMOUNTS: [u32; 8] = [20, 50, 100, 200, 500, 1000, 2000, 5000];

/// Kind of PromptPay identifier a user registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdKind {
    /// 13-digit national registration number.
    #[default]
    Citizen,
    /// 10-digit mobile number.
    Phone,
}

impl IdKind {
    pub fn max_digits(self) -> usize {
        match self {
            IdKind::Citizen => 13,
            IdKind::Phone => 10,
        }
    }

    /// Guess the kind from the digit count of an identifier.
    pub fn detect(raw: &str) -> Option<Self> {
        match digits_only(raw).len() {
            13 => Some(IdKind::Citizen),
            10 => Some(IdKind::Phone),
            _ => None,
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            IdKind::Citizen => "0-0000-00000-00-0",
            IdKind::Phone => "000-000-0000",
        }
    }
}

impl fmt::Display for IdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdKind::Citizen => write!(f, "citizen"),
            IdKind::Phone => write!(f, "phone"),
        }
    }
}

impl FromStr for IdKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "citizen" | "national" | "id" => Ok(IdKind::Citizen),
            "phone" | "mobile" => Ok(IdKind::Phone),
            other => Err(format!("unknown identifier kind: {}", other)),
        }
    }
}

fn digits_only(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Group digits for reading: `1-2345-67890-12-3` or `081-234-5678`.
///
/// Only complete identifiers are grouped; anything else comes back as
/// plain digits.
pub fn format_id_display(kind: IdKind, raw: &str) -> String {
    let d = digits_only(raw);
    match (kind, d.len()) {
        (IdKind::Citizen, 13) => format!(
            "{}-{}-{}-{}-{}",
            &d[..1],
            &d[1..5],
            &d[5..10],
            &d[10..12],
            &d[12..]
        ),
        (IdKind::Phone, 10) => format!("{}-{}-{}", &d[..3], &d[3..6], &d[6..]),
        _ => d,
    }
}

/// Accept identifier input only while it fits the kind's digit count.
pub fn accept_id_input(kind: IdKind, raw: &str) -> Option<String> {
    let d = digits_only(raw);
    (d.len() <= kind.max_digits()).then_some(d)
}

/// Human-readable amount line for a payload summary.
pub fn format_amount_display(amount: Option<f64>) -> String {
    match amount {
        Some(a) => format!("{} ฿", crate::protocol::format_amount(a)),
        None => "open amount (payer enters it)".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_citizen_grouping() {
        assert_eq!(
            format_id_display(IdKind::Citizen, "1234567890123"),
            "1-2345-67890-12-3"
        );
        // Incomplete input is left ungrouped
        assert_eq!(format_id_display(IdKind::Citizen, "12345"), "12345");
    }

    #[test]
    fn test_phone_grouping() {
        assert_eq!(format_id_display(IdKind::Phone, "0812345678"), "081-234-5678");
        assert_eq!(format_id_display(IdKind::Phone, "(081) 234 5678"), "081-234-5678");
        assert_eq!(format_id_display(IdKind::Phone, "081234"), "081234");
    }

    #[test]
    fn test_accept_id_input_limits_length() {
        assert_eq!(
            accept_id_input(IdKind::Phone, "081-234-5678").as_deref(),
            Some("0812345678")
        );
        assert_eq!(accept_id_input(IdKind::Phone, "08123456789"), None);
        assert!(accept_id_input(IdKind::Citizen, "08123456789").is_some());
    }

    #[test]
    fn test_detect_kind() {
        assert_eq!(IdKind::detect("1-2345-67890-12-3"), Some(IdKind::Citizen));
        assert_eq!(IdKind::detect("081-234-5678"), Some(IdKind::Phone));
        assert_eq!(IdKind::detect("12345"), None);
    }

    #[test]
    fn test_kind_parse_roundtrip() {
        for kind in [IdKind::Citizen, IdKind::Phone] {
            assert_eq!(kind.to_string().parse::<IdKind>(), Ok(kind));
        }
        assert!("bank".parse::<IdKind>().is_err());
    }

    #[test]
    fn test_amount_display() {
        assert_eq!(format_amount_display(Some(20.0)), "20.00 ฿");
        assert!(format_amount_display(None).starts_with("open amount"));
    }
}
