//! 256x256 畫面：16x16 個 metatile ID，每格 1 位元組

use super::tileset::Tileset;
use super::types::{METATILE_SIZE, PixelBlock, Point, SCREEN_SIZE};
use crate::core::error::Result;
use crate::core::rom::Rom;

/// 每邊 metatile 數
pub const SCREEN_CELLS: usize = 16;
/// 一個畫面的資料長度
pub const SCREEN_BYTES: usize = SCREEN_CELLS * SCREEN_CELLS;

/// 依畫面資料從 tileset 快取組出一張新的 256x256 點陣圖
pub fn compose_screen(rom: &Rom, tileset: &Tileset, screen_offset: usize) -> Result<PixelBlock> {
    let ids = rom.slice(screen_offset, SCREEN_BYTES)?;
    let mut screen = PixelBlock::new(SCREEN_SIZE, SCREEN_SIZE);
    for (cell, &id) in ids.iter().enumerate() {
        let (col, row) = (cell % SCREEN_CELLS, cell / SCREEN_CELLS);
        screen.blit(
            tileset.metatile(id)?,
            Point::new(METATILE_SIZE * col, METATILE_SIZE * row),
        );
    }
    Ok(screen)
}
