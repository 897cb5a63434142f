//! 位元測試與小端序指標讀取

use super::Rom;
use crate::core::error::Result;

/// 檢查 `byte` 的第 `bit` 位（0 = 最低位）是否為 1
#[inline]
pub fn is_bit_set(byte: u8, bit: u8) -> bool {
    (byte >> bit) & 0x01 != 0
}

/// 16 位元值拆成 [低位元組, 高位元組]
#[inline]
pub fn pointer_bytes_le(value: u16) -> [u8; 2] {
    [(value & 0x00FF) as u8, (value >> 8) as u8]
}

pub fn read_pointer_le(rom: &Rom, offset: usize) -> Result<u16> {
    let bytes = rom.slice(offset, 2)?;
    Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
}
