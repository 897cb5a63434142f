use std::fmt::Write;

use crate::core::error::{Error, Result};

/// 目前編輯中的 ROM（平坦位元組陣列，所有偏移皆為絕對位址）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rom {
    data: Vec<u8>,
}

impl Rom {
    pub fn new(data: Vec<u8>) -> Self {
        Rom { data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// 確認 `offset..offset+len` 完全落在緩衝區內
    pub fn check_range(&self, offset: usize, len: usize) -> Result<()> {
        match offset.checked_add(len) {
            Some(end) if end <= self.data.len() => Ok(()),
            _ => Err(Error::OutOfBounds {
                offset,
                len,
                rom_len: self.data.len(),
            }),
        }
    }

    pub fn read_byte(&self, offset: usize) -> Result<u8> {
        self.check_range(offset, 1)?;
        Ok(self.data[offset])
    }

    pub fn slice(&self, offset: usize, len: usize) -> Result<&[u8]> {
        self.check_range(offset, len)?;
        Ok(&self.data[offset..offset + len])
    }

    /// 修補寫入專用
    pub(crate) fn bytes_mut(&mut self, offset: usize, len: usize) -> Result<&mut [u8]> {
        self.check_range(offset, len)?;
        Ok(&mut self.data[offset..offset + len])
    }

    /// 以 "XX " 形式輸出一段原始位元組，除錯用
    pub fn raw_data_string(&self, offset: usize, len: usize) -> Result<String> {
        let bytes = self.slice(offset, len)?;
        let mut out = String::with_capacity(len * 3);
        for b in bytes {
            let _ = write!(out, "{:02X} ", b);
        }
        Ok(out)
    }
}

impl From<Vec<u8>> for Rom {
    fn from(data: Vec<u8>) -> Self {
        Rom::new(data)
    }
}

impl AsRef<[u8]> for Rom {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}
