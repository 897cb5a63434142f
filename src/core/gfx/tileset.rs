//! Tileset：依列優先順序渲染 metatile 快取，並合成一張總覽圖

use super::metatile::{METATILE_BYTES, render_metatile};
use super::types::{METATILE_SIZE, PixelBlock, Point};
use crate::core::error::{Error, Result};
use crate::core::rom::Rom;

/// tileset 在 ROM 中的位置與格線大小
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TilesetLayout {
    pub gfx_offset: usize,
    pub metatile_offset: usize,
    pub width: usize,
    pub height: usize,
}

impl TilesetLayout {
    pub fn count(&self) -> usize {
        self.width * self.height
    }

    /// 第 `slot` 個 metatile 在表中的位址
    pub fn metatile_entry(&self, slot: usize) -> usize {
        self.metatile_offset + METATILE_BYTES * slot
    }
}

#[derive(Debug, Clone)]
pub struct Tileset {
    layout: TilesetLayout,
    metatiles: Vec<PixelBlock>,
    bitmap: PixelBlock,
}

impl Tileset {
    pub fn render(rom: &Rom, layout: TilesetLayout) -> Result<Self> {
        let mut metatiles = Vec::with_capacity(layout.count());
        for slot in 0..layout.count() {
            metatiles.push(render_metatile(
                rom,
                layout.gfx_offset,
                layout.metatile_entry(slot),
            )?);
        }

        let mut bitmap = PixelBlock::new(METATILE_SIZE * layout.width, METATILE_SIZE * layout.height);
        for (slot, block) in metatiles.iter().enumerate() {
            let (col, row) = (slot % layout.width, slot / layout.width);
            bitmap.blit(block, Point::new(METATILE_SIZE * col, METATILE_SIZE * row));
        }

        Ok(Tileset {
            layout,
            metatiles,
            bitmap,
        })
    }

    pub fn layout(&self) -> TilesetLayout {
        self.layout
    }

    pub fn bitmap(&self) -> &PixelBlock {
        &self.bitmap
    }

    pub fn metatiles(&self) -> &[PixelBlock] {
        &self.metatiles
    }

    pub fn len(&self) -> usize {
        self.metatiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metatiles.is_empty()
    }

    /// 依 metatile ID 查找；未渲染的 ID 為查找錯誤
    pub fn metatile(&self, id: u8) -> Result<&PixelBlock> {
        self.metatiles
            .get(id as usize)
            .ok_or(Error::MissingMetatile {
                id,
                cached: self.metatiles.len(),
            })
    }
}
