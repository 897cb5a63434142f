//! ROM 緩衝區、位元組工具與修補寫入

pub mod bits;
pub mod buffer;
pub mod patch;

pub use buffer::Rom;

/// 各關卡資料所在的 bank 起始位址
pub const BANK_OFFSETS: [usize; 7] = [
    0x24000, 0x28000, 0x2C000, 0x30000, 0x34000, 0x38000, 0x3C000,
];
