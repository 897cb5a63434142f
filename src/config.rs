//! 編輯器設定檔與修補腳本（JSON）
//!
//! 位址欄位可以是 JSON 數字，也可以是 "0x24000" / "$24000" 形式的字串。

use std::fs;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::core::error::{Error, Result};
use crate::core::gfx::tileset::TilesetLayout;
use crate::core::rom::{BANK_OFFSETS, Rom};
use crate::core::session::EditorSession;

#[derive(Deserialize)]
#[serde(untagged)]
enum RawOffset {
    Number(u64),
    Text(String),
}

/// 解析十進位、0x 或 $ 開頭的十六進位
pub fn parse_offset(text: &str) -> Option<usize> {
    let text = text.trim();
    let hex = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .or_else(|| text.strip_prefix('$'));
    match hex {
        Some(digits) => usize::from_str_radix(digits, 16).ok(),
        None => text.parse().ok(),
    }
}

impl RawOffset {
    fn resolve<E: serde::de::Error>(self) -> std::result::Result<usize, E> {
        match self {
            RawOffset::Number(n) => usize::try_from(n).map_err(E::custom),
            RawOffset::Text(s) => {
                parse_offset(&s).ok_or_else(|| E::custom(format!("invalid offset `{}`", s)))
            }
        }
    }
}

fn de_offset<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<usize, D::Error> {
    RawOffset::deserialize(d)?.resolve()
}

fn de_offset_list<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Vec<usize>, D::Error> {
    Vec::<RawOffset>::deserialize(d)?
        .into_iter()
        .map(RawOffset::resolve)
        .collect()
}

fn de_u16<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<u16, D::Error> {
    let value = RawOffset::deserialize(d)?.resolve::<D::Error>()?;
    u16::try_from(value).map_err(serde::de::Error::custom)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    #[serde(deserialize_with = "de_offset_list")]
    pub bank_offsets: Vec<usize>,
    #[serde(deserialize_with = "de_offset")]
    pub gfx_offset: usize,
    #[serde(deserialize_with = "de_offset")]
    pub metatile_offset: usize,
    pub tileset_width: usize,
    pub tileset_height: usize,
    pub log_path: Option<String>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        EditorConfig {
            bank_offsets: BANK_OFFSETS.to_vec(),
            gfx_offset: 0,
            metatile_offset: 0,
            tileset_width: 16,
            tileset_height: 16,
            log_path: None,
        }
    }
}

impl EditorConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        let config: EditorConfig = serde_json::from_str(text)?;
        if config.tileset_width == 0 || config.tileset_height == 0 {
            return Err(Error::Config("tileset size must be non-zero".to_string()));
        }
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// bank 索引 → 絕對位址
    pub fn bank(&self, index: usize) -> Result<usize> {
        self.bank_offsets
            .get(index)
            .copied()
            .ok_or(Error::BankOutOfRange {
                index,
                count: self.bank_offsets.len(),
            })
    }

    pub fn tileset_layout(&self) -> TilesetLayout {
        TilesetLayout {
            gfx_offset: self.gfx_offset,
            metatile_offset: self.metatile_offset,
            width: self.tileset_width,
            height: self.tileset_height,
        }
    }
}

/// 可接受修補寫入的對象
pub trait PatchTarget {
    fn rom(&self) -> &Rom;
    fn write(&mut self, offset: usize, values: &[u8]) -> Result<()>;
    fn write_range(&mut self, offset: usize, values: &[u8], start: usize, end: usize) -> Result<()>;
    fn write_pointer_le(&mut self, offset: usize, value: u16) -> Result<()>;
}

impl PatchTarget for Rom {
    fn rom(&self) -> &Rom {
        self
    }

    fn write(&mut self, offset: usize, values: &[u8]) -> Result<()> {
        Rom::write(self, offset, values)
    }

    fn write_range(&mut self, offset: usize, values: &[u8], start: usize, end: usize) -> Result<()> {
        Rom::write_range(self, offset, values, start, end)
    }

    fn write_pointer_le(&mut self, offset: usize, value: u16) -> Result<()> {
        Rom::write_pointer_le(self, offset, value)
    }
}

impl PatchTarget for EditorSession {
    fn rom(&self) -> &Rom {
        EditorSession::rom(self)
    }

    fn write(&mut self, offset: usize, values: &[u8]) -> Result<()> {
        EditorSession::write(self, offset, values)
    }

    fn write_range(&mut self, offset: usize, values: &[u8], start: usize, end: usize) -> Result<()> {
        EditorSession::write_range(self, offset, values, start, end)
    }

    fn write_pointer_le(&mut self, offset: usize, value: u16) -> Result<()> {
        EditorSession::write_pointer_le(self, offset, value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PatchEntry {
    Bytes {
        #[serde(deserialize_with = "de_offset")]
        offset: usize,
        bytes: Vec<u8>,
    },
    Range {
        #[serde(deserialize_with = "de_offset")]
        offset: usize,
        bytes: Vec<u8>,
        start: usize,
        end: usize,
    },
    Pointer {
        #[serde(deserialize_with = "de_offset")]
        offset: usize,
        #[serde(deserialize_with = "de_u16")]
        value: u16,
    },
}

impl PatchEntry {
    /// 只檢查，不寫入
    pub fn check(&self, rom: &Rom) -> Result<()> {
        match self {
            PatchEntry::Bytes { offset, bytes } => rom.check_range(*offset, bytes.len()),
            PatchEntry::Range {
                offset,
                bytes,
                start,
                end,
            } => {
                if start > end || *end > bytes.len() {
                    return Err(Error::InvalidRange {
                        start: *start,
                        end: *end,
                        len: bytes.len(),
                    });
                }
                rom.check_range(*offset, end - start)
            }
            PatchEntry::Pointer { offset, .. } => rom.check_range(*offset, 2),
        }
    }

    pub fn apply<T: PatchTarget + ?Sized>(&self, target: &mut T) -> Result<()> {
        match self {
            PatchEntry::Bytes { offset, bytes } => target.write(*offset, bytes),
            PatchEntry::Range {
                offset,
                bytes,
                start,
                end,
            } => target.write_range(*offset, bytes, *start, *end),
            PatchEntry::Pointer { offset, value } => target.write_pointer_le(*offset, *value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PatchScript {
    pub patches: Vec<PatchEntry>,
}

impl PatchScript {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    /// 先檢查全部項目，全部合法才依序寫入；回傳套用數
    pub fn apply<T: PatchTarget + ?Sized>(&self, target: &mut T) -> Result<usize> {
        for entry in &self.patches {
            entry.check(target.rom())?;
        }
        for entry in &self.patches {
            entry.apply(target)?;
        }
        Ok(self.patches.len())
    }
}
