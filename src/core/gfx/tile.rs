//! 8x8 圖塊解碼（2bpp 平面格式，每列 2 位元組）

use super::types::{PixelBlock, Point, Shade, TILE_SIZE};
use crate::core::error::{Error, Result};
use crate::core::rom::Rom;
use crate::core::rom::bits::is_bit_set;

/// 一個圖塊佔 16 位元組
pub const TILE_BYTES: usize = 16;

/// (low, top) 兩個位元 → 灰階
fn shade_of(low: bool, top: bool) -> Shade {
    match (low, top) {
        (false, false) => Shade::Black,
        (true, false) => Shade::LightGray,
        (false, true) => Shade::White,
        (true, true) => Shade::DarkGray,
    }
}

/// 解碼 `offset` 處的圖塊並畫到 `dst` 的 `at` 位置
pub fn draw_tile(rom: &Rom, offset: usize, dst: &mut PixelBlock, at: Point) -> Result<()> {
    let data = rom.slice(offset, TILE_BYTES)?;
    for (row, pair) in data.chunks_exact(2).enumerate() {
        let (low, top) = (pair[0], pair[1]);
        for col in 0..TILE_SIZE {
            let bit = (7 - col) as u8;
            dst.set(
                at.x + col,
                at.y + row,
                shade_of(is_bit_set(low, bit), is_bit_set(top, bit)),
            );
        }
    }
    Ok(())
}

/// 「無圖塊」：整塊塗黑
pub fn draw_blank(dst: &mut PixelBlock, at: Point) {
    dst.fill_rect(at, TILE_SIZE, TILE_SIZE, Shade::Black);
}

/// 連續圖塊依列優先排成 `tiles_wide` x `tiles_high` 的圖表
pub fn draw_tile_sheet(
    rom: &Rom,
    offset: usize,
    dst: &mut PixelBlock,
    at: Point,
    tiles_wide: usize,
    tiles_high: usize,
) -> Result<()> {
    let len = tiles_wide
        .checked_mul(tiles_high)
        .and_then(|n| n.checked_mul(TILE_BYTES))
        .ok_or(Error::OutOfBounds {
            offset,
            len: usize::MAX,
            rom_len: rom.len(),
        })?;
    rom.check_range(offset, len)?;
    let mut count = 0;
    for row in 0..tiles_high {
        for col in 0..tiles_wide {
            draw_tile(
                rom,
                offset + TILE_BYTES * count,
                dst,
                at.offset(TILE_SIZE * col, TILE_SIZE * row),
            )?;
            count += 1;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tile_rom(low: u8, top: u8) -> Rom {
        let mut data = Vec::with_capacity(TILE_BYTES);
        for _ in 0..8 {
            data.push(low);
            data.push(top);
        }
        Rom::new(data)
    }

    fn decode(rom: &Rom) -> PixelBlock {
        let mut block = PixelBlock::filled(8, 8, Shade::White);
        draw_tile(rom, 0, &mut block, Point::ORIGIN).unwrap();
        block
    }

    #[test]
    fn test_single_low_bit_is_light_gray() {
        let block = decode(&tile_rom(0b1000_0000, 0x00));
        assert_eq!(block.get(0, 0), Some(Shade::LightGray));
        assert_eq!(block.get(1, 0), Some(Shade::Black));
    }

    #[test]
    fn test_full_planes_map_to_exact_shades() {
        let all = |rom: Rom, shade: Shade| decode(&rom).pixels().iter().all(|&s| s == shade);
        assert!(all(tile_rom(0xFF, 0xFF), Shade::DarkGray));
        assert!(all(tile_rom(0x00, 0x00), Shade::Black));
        assert!(all(tile_rom(0x00, 0xFF), Shade::White));
        assert!(all(tile_rom(0xFF, 0x00), Shade::LightGray));
    }

    #[test]
    fn test_decoding_is_deterministic() {
        let rom = Rom::new((0u8..16).map(|b| b.wrapping_mul(37)).collect());
        assert_eq!(decode(&rom), decode(&rom));
    }

    #[test]
    fn test_rows_read_two_bytes_each() {
        let mut data = vec![0u8; TILE_BYTES];
        // 第 3 列最右邊的像素：low=1, top=1
        data[6] = 0x01;
        data[7] = 0x01;
        let block = decode(&Rom::new(data));
        assert_eq!(block.get(7, 3), Some(Shade::DarkGray));
        assert_eq!(block.get(7, 2), Some(Shade::Black));
    }

    #[test]
    fn test_tile_past_end_is_indexing_error() {
        let rom = Rom::new(vec![0; 20]);
        let mut block = PixelBlock::new(8, 8);
        assert!(draw_tile(&rom, 4, &mut block, Point::ORIGIN).is_ok());
        assert!(draw_tile(&rom, 5, &mut block, Point::ORIGIN).is_err());
    }

    #[test]
    fn test_tile_sheet_is_row_major() {
        let mut data = vec![0u8; TILE_BYTES * 3];
        // 第 2 個圖塊全白
        for row in 0..8 {
            data[TILE_BYTES + row * 2 + 1] = 0xFF;
        }
        let rom = Rom::new(data);
        let mut sheet = PixelBlock::new(16, 16);
        draw_tile_sheet(&rom, 0, &mut sheet, Point::ORIGIN, 2, 1).unwrap();
        assert_eq!(sheet.get(0, 0), Some(Shade::Black));
        assert_eq!(sheet.get(8, 0), Some(Shade::White));
        assert!(draw_tile_sheet(&rom, 0, &mut sheet, Point::ORIGIN, 2, 2).is_err());
        assert!(draw_tile_sheet(&rom, 0, &mut sheet, Point::ORIGIN, usize::MAX, 2).is_err());
    }
}
