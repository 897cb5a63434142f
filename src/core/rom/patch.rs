//! 修補寫入：三種寫法都先檢查範圍再寫入，失敗時緩衝區保持不變

use super::Rom;
use super::bits::pointer_bytes_le;
use crate::core::error::{Error, Result};

impl Rom {
    /// 將整段 `values` 寫到 `offset`
    pub fn write(&mut self, offset: usize, values: &[u8]) -> Result<()> {
        let dst = self.bytes_mut(offset, values.len())?;
        dst.copy_from_slice(values);
        Ok(())
    }

    /// 將 `values[start..end]` 寫到 `offset`
    pub fn write_range(
        &mut self,
        offset: usize,
        values: &[u8],
        start: usize,
        end: usize,
    ) -> Result<()> {
        if start > end || end > values.len() {
            return Err(Error::InvalidRange {
                start,
                end,
                len: values.len(),
            });
        }
        self.write(offset, &values[start..end])
    }

    /// 小端序寫入 16 位元指標：offset = 低位元組, offset+1 = 高位元組
    pub fn write_pointer_le(&mut self, offset: usize, value: u16) -> Result<()> {
        self.write(offset, &pointer_bytes_le(value))
    }
}
