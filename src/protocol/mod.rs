pub mod crc;
pub mod payload;
pub mod tags;
pub mod tlv;

pub use payload::{format_amount, generate_payload, verify_payload, AmountInput};
