use crc::{Crc, CRC_16_IBM_3740};

/// CRC-16/CCITT-FALSE: poly 0x1021, init 0xFFFF, no reflection, no final XOR.
const CRC: Crc<u16> = Crc::<u16>::new(&CRC_16_IBM_3740);

pub fn crc16_ccitt_false(data: &[u8]) -> u16 {
    CRC.checksum(data)
}

/// Checksum of a payload string, rendered as 4 uppercase hex digits.
///
/// Input is read as Unicode scalar values (`char`s), not UTF-16 code units;
/// each one contributes only the low 8 bits of its code point. The two
/// readings differ only outside the Basic Multilingual Plane.
pub fn checksum(data: &str) -> String {
    let bytes: Vec<u8> = data.chars().map(|c| (c as u32 & 0xFF) as u8).collect();
    format!("{:04X}", crc16_ccitt_false(&bytes))
}
