//! Tag IDs and fixed values for the Thai PromptPay profile of the
//! EMVCo merchant-presented QR payload.

// Top-level tags
pub const TAG_PAYLOAD_FORMAT: &str = "00";
pub const TAG_POINT_OF_INITIATION: &str = "01";
pub const TAG_MERCHANT_ACCOUNT: &str = "29";
pub const TAG_AMOUNT: &str = "54";
pub const TAG_COUNTRY_CODE: &str = "58";
pub const TAG_CRC: &str = "63";

// Merchant account (tag 29) sub-tags
pub const SUB_TAG_APPLICATION_ID: &str = "00";
pub const SUB_TAG_IDENTIFIER: &str = "01";

// Fixed values
pub const PAYLOAD_FORMAT_VERSION: &str = "01";
pub const POINT_OF_INITIATION_DYNAMIC: &str = "12";
pub const PROMPTPAY_AID: &str = "A000000677010111";
pub const COUNTRY_CODE_TH: &str = "TH";
pub const COUNTRY_CALLING_CODE: &str = "0066";

/// The checksum value is always 4 hex digits.
pub const CRC_LEN: usize = 4;

/// Tag + length header that precedes the checksum value ("6304").
pub const CRC_HEADER: &str = "6304";
