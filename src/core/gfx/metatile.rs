//! 16x16 metatile：四個圖塊索引（左上、右上、左下、右下）

use super::tile::{TILE_BYTES, draw_blank, draw_tile};
use super::types::{METATILE_SIZE, PixelBlock, Point, TILE_SIZE};
use crate::core::error::Result;
use crate::core::rom::Rom;

/// 一個 metatile 在表中佔 4 位元組
pub const METATILE_BYTES: usize = 4;

/// 圖塊索引 ≥ 0x80 代表「無圖塊」
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileRef {
    Tile(u8),
    Blank,
}

impl From<u8> for TileRef {
    fn from(byte: u8) -> Self {
        if byte <= 0x7F {
            TileRef::Tile(byte)
        } else {
            TileRef::Blank
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Metatile {
    pub quadrants: [TileRef; 4],
}

impl Metatile {
    pub fn read(rom: &Rom, meta_offset: usize) -> Result<Self> {
        let b = rom.slice(meta_offset, METATILE_BYTES)?;
        Ok(Metatile {
            quadrants: [b[0].into(), b[1].into(), b[2].into(), b[3].into()],
        })
    }

    pub fn draw(&self, rom: &Rom, gfx_offset: usize, dst: &mut PixelBlock, at: Point) -> Result<()> {
        for (i, quadrant) in self.quadrants.iter().enumerate() {
            let pos = at.offset(TILE_SIZE * (i % 2), TILE_SIZE * (i / 2));
            match *quadrant {
                TileRef::Tile(index) => {
                    draw_tile(rom, gfx_offset + TILE_BYTES * index as usize, dst, pos)?
                }
                TileRef::Blank => draw_blank(dst, pos),
            }
        }
        Ok(())
    }
}

pub fn draw_metatile(
    rom: &Rom,
    gfx_offset: usize,
    meta_offset: usize,
    dst: &mut PixelBlock,
    at: Point,
) -> Result<()> {
    Metatile::read(rom, meta_offset)?.draw(rom, gfx_offset, dst, at)
}

/// 建立一個新的 16x16 區塊並畫入 metatile
pub fn render_metatile(rom: &Rom, gfx_offset: usize, meta_offset: usize) -> Result<PixelBlock> {
    let mut block = PixelBlock::new(METATILE_SIZE, METATILE_SIZE);
    draw_metatile(rom, gfx_offset, meta_offset, &mut block, Point::ORIGIN)?;
    Ok(block)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::gfx::types::Shade;

    // 圖塊 0 全白；metatile 表位於 0x100
    fn white_tile_rom(meta: [u8; 4]) -> Rom {
        let mut data = vec![0u8; 0x200];
        for row in 0..8 {
            data[row * 2 + 1] = 0xFF;
        }
        data[0x100..0x104].copy_from_slice(&meta);
        Rom::new(data)
    }

    fn quadrant_is(block: &PixelBlock, qx: usize, qy: usize, shade: Shade) -> bool {
        block
            .region(Point::new(qx * 8, qy * 8), 8, 8)
            .pixels()
            .iter()
            .all(|&s| s == shade)
    }

    #[test]
    fn test_tile_ref_sentinel_threshold() {
        assert_eq!(TileRef::from(0x00), TileRef::Tile(0));
        assert_eq!(TileRef::from(0x7F), TileRef::Tile(0x7F));
        assert_eq!(TileRef::from(0x80), TileRef::Blank);
        assert_eq!(TileRef::from(0xFF), TileRef::Blank);
    }

    #[test]
    fn test_blank_sentinel_only_blacks_its_quadrant() {
        let rom = white_tile_rom([0x80, 0x00, 0x00, 0x00]);
        let block = render_metatile(&rom, 0, 0x100).unwrap();
        assert!(quadrant_is(&block, 0, 0, Shade::Black));
        assert!(quadrant_is(&block, 1, 0, Shade::White));
        assert!(quadrant_is(&block, 0, 1, Shade::White));
        assert!(quadrant_is(&block, 1, 1, Shade::White));
    }

    #[test]
    fn test_quadrant_order_is_tl_tr_bl_br() {
        let rom = white_tile_rom([0x80, 0x80, 0x80, 0x00]);
        let block = render_metatile(&rom, 0, 0x100).unwrap();
        assert!(quadrant_is(&block, 1, 1, Shade::White));
        assert!(quadrant_is(&block, 1, 0, Shade::Black));
        assert!(quadrant_is(&block, 0, 1, Shade::Black));
    }

    #[test]
    fn test_tile_index_scales_by_sixteen() {
        // 圖塊 1（0x10..0x20）全深灰
        let mut rom = white_tile_rom([0x01, 0x80, 0x80, 0x80]);
        rom.write(0x10, &[0xFF; 16]).unwrap();
        let block = render_metatile(&rom, 0, 0x100).unwrap();
        assert!(quadrant_is(&block, 0, 0, Shade::DarkGray));
    }

    #[test]
    fn test_all_blank_metatile_needs_no_graphics() {
        let rom = Rom::new(vec![0xFF; 4]);
        let block = render_metatile(&rom, 0x10_0000, 0).unwrap();
        assert!(block.pixels().iter().all(|&s| s == Shade::Black));
    }
}
