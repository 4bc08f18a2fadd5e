use serde::Serialize;
use thiserror::Error;

use super::crc::checksum;
use super::tags::*;
use super::tlv::{parse_fields, TlvBuilder, TlvError, TlvField};

/// Amount as handed over by a caller: a number, free text, or nothing.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AmountInput {
    #[default]
    Absent,
    Number(f64),
    Text(String),
}

impl AmountInput {
    /// Numeric value of the input, if it has one.
    pub fn value(&self) -> Option<f64> {
        match self {
            AmountInput::Absent => None,
            AmountInput::Number(n) => Some(*n).filter(|n| n.is_finite()),
            AmountInput::Text(s) => parse_amount(s),
        }
    }

    /// Value to embed in the payload: only strictly positive amounts qualify.
    pub fn payable(&self) -> Option<f64> {
        self.value().filter(|&n| n > 0.0)
    }
}

impl From<f64> for AmountInput {
    fn from(n: f64) -> Self {
        AmountInput::Number(n)
    }
}

impl From<u32> for AmountInput {
    fn from(n: u32) -> Self {
        AmountInput::Number(n as f64)
    }
}

impl From<&str> for AmountInput {
    fn from(s: &str) -> Self {
        AmountInput::Text(s.to_string())
    }
}

impl From<String> for AmountInput {
    fn from(s: String) -> Self {
        AmountInput::Text(s)
    }
}

impl<T: Into<AmountInput>> From<Option<T>> for AmountInput {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or_default()
    }
}

/// Strip formatting and add the country calling code to national IDs
/// (13 digits) and mobile numbers (10 digits). Other lengths pass through.
pub fn normalize_identifier(identifier: &str) -> String {
    let digits: String = identifier.chars().filter(|c| c.is_ascii_digit()).collect();
    match digits.len() {
        13 | 10 => format!("{}{}", COUNTRY_CALLING_CODE, digits),
        _ => digits,
    }
}

/// Read the longest leading decimal number of `input`, ignoring leading
/// whitespace and any trailing garbage. Returns `None` when there is no
/// number or the number is not finite.
pub fn parse_amount(input: &str) -> Option<f64> {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut mantissa_digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        mantissa_digits += frac_end - frac_start;
        end = frac_end;
    }
    if mantissa_digits == 0 {
        return None;
    }

    // Exponent only counts when at least one digit follows it
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > digits_start {
            end = exp_end;
        }
    }

    s[..end]
        .trim_end_matches('.')
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
}

/// Format with exactly two fraction digits, rounding half away from zero.
pub fn format_amount(amount: f64) -> String {
    // A double sits exactly on a half-cent only when its fraction is an odd
    // multiple of 1/8. Multiplying by powers of two is exact.
    let on_half_cent = (amount * 8.0).fract() == 0.0 && (amount * 4.0).fract() != 0.0;
    if on_half_cent {
        let cents = (amount.abs() * 100.0).ceil() as u64;
        let sign = if amount < 0.0 { "-" } else { "" };
        format!("{sign}{}.{:02}", cents / 100, cents % 100)
    } else {
        format!("{amount:.2}")
    }
}

/// Build the ordered top-level fields of a payload, without the checksum.
pub fn payload_fields(identifier: &str, amount: impl Into<AmountInput>) -> TlvBuilder {
    let amount = amount.into();
    let merchant = TlvBuilder::new()
        .field(SUB_TAG_APPLICATION_ID, PROMPTPAY_AID)
        .field(SUB_TAG_IDENTIFIER, normalize_identifier(identifier));

    TlvBuilder::new()
        .field(TAG_PAYLOAD_FORMAT, PAYLOAD_FORMAT_VERSION)
        .field(TAG_POINT_OF_INITIATION, POINT_OF_INITIATION_DYNAMIC)
        .nested(TAG_MERCHANT_ACCOUNT, merchant)
        .field(TAG_COUNTRY_CODE, COUNTRY_CODE_TH)
        .field_opt(TAG_AMOUNT, amount.payable().map(format_amount))
}

/// Generate the complete PromptPay payload string, checksum included.
///
/// Never fails: malformed identifiers pass through without the calling-code
/// prefix, and absent, non-numeric or non-positive amounts produce an
/// open-amount payload.
pub fn generate_payload(identifier: &str, amount: impl Into<AmountInput>) -> String {
    let mut payload = payload_fields(identifier, amount).build();
    payload.push_str(CRC_HEADER);
    let crc = checksum(&payload);
    payload.push_str(&crc);
    tracing::debug!(len = payload.len(), %crc, "Generated payload");
    payload
}

/// Fields recovered from a checked payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedPayload {
    pub fields: Vec<DecodedField>,
    pub application_id: Option<String>,
    pub identifier: Option<String>,
    pub country_code: Option<String>,
    pub amount: Option<String>,
    pub checksum: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedField {
    pub tag: String,
    pub length: usize,
    pub value: String,
}

impl From<&TlvField> for DecodedField {
    fn from(f: &TlvField) -> Self {
        Self {
            tag: f.tag.clone(),
            length: f.length(),
            value: f.value.clone(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VerifyError {
    #[error("payload does not end with a 6304 checksum field")]
    MissingChecksum,
    #[error("CRC mismatch: computed {computed}, payload carries {found}")]
    ChecksumMismatch { computed: String, found: String },
    #[error("malformed payload: {0}")]
    Tlv(#[from] TlvError),
    #[error("malformed merchant account field: {0}")]
    MerchantAccount(TlvError),
}

/// Parse a payload after validating its trailing checksum.
pub fn verify_payload(payload: &str) -> Result<DecodedPayload, VerifyError> {
    let payload = payload.trim();
    let char_count = payload.chars().count();
    if char_count < CRC_HEADER.len() + CRC_LEN {
        return Err(VerifyError::MissingChecksum);
    }

    let split = payload
        .char_indices()
        .nth(char_count - CRC_LEN)
        .map(|(i, _)| i)
        .ok_or(VerifyError::MissingChecksum)?;
    let (covered, found) = payload.split_at(split);
    if !covered.ends_with(CRC_HEADER) {
        return Err(VerifyError::MissingChecksum);
    }

    let computed = checksum(covered);
    if computed != found {
        return Err(VerifyError::ChecksumMismatch {
            computed,
            found: found.to_string(),
        });
    }

    let fields = parse_fields(payload)?;
    for field in &fields {
        tracing::debug!("Decoded {}", field);
    }
    // The trailing 6304 must be a field of its own, not the tail of a value
    match fields.last() {
        Some(last) if last.tag == TAG_CRC && last.length() == CRC_LEN => {}
        _ => return Err(VerifyError::MissingChecksum),
    }

    let find = |tag: &str| {
        fields
            .iter()
            .find(|f| f.tag == tag)
            .map(|f| f.value.clone())
    };

    let (application_id, identifier) = match find(TAG_MERCHANT_ACCOUNT) {
        Some(merchant) => {
            let inner = parse_fields(&merchant).map_err(VerifyError::MerchantAccount)?;
            let sub = |tag: &str| {
                inner
                    .iter()
                    .find(|f| f.tag == tag)
                    .map(|f| f.value.clone())
            };
            (sub(SUB_TAG_APPLICATION_ID), sub(SUB_TAG_IDENTIFIER))
        }
        None => (None, None),
    };

    Ok(DecodedPayload {
        fields: fields.iter().map(DecodedField::from).collect(),
        application_id,
        identifier,
        country_code: find(TAG_COUNTRY_CODE),
        amount: find(TAG_AMOUNT),
        checksum: found.to_string(),
    })
}
