//! 選取範圍與 metatile 圖章

use crate::core::error::{Error, Result};
use crate::core::gfx::screen::{SCREEN_BYTES, SCREEN_CELLS};
use crate::core::gfx::tileset::TilesetLayout;
use crate::core::rom::Rom;

/// 以格為單位的矩形
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    /// 涵蓋兩個矩形的最小範圍（含兩端，所以寬高 +1）；極端值飽和而不溢位
    pub fn unite(self, other: Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(
            x,
            y,
            right.saturating_sub(x).saturating_add(1),
            bottom.saturating_sub(y).saturating_add(1),
        )
    }

    fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// 從格子 `a` 拖曳到格子 `b` 的選取範圍
    pub fn span(a: (i32, i32), b: (i32, i32)) -> Rect {
        Rect::new(a.0, a.1, 0, 0).unite(Rect::new(b.0, b.1, 0, 0))
    }

    fn check_within(&self, cols: usize, rows: usize) -> Result<()> {
        let within = |start: i32, extent: i32, limit: usize| {
            start >= 0
                && extent > 0
                && start
                    .checked_add(extent)
                    .is_some_and(|end| end as usize <= limit)
        };
        let fits = within(self.x, self.width, cols) && within(self.y, self.height, rows);
        if fits {
            Ok(())
        } else {
            Err(Error::SelectionOutOfBounds {
                x: self.x,
                y: self.y,
                width: self.width,
                height: self.height,
            })
        }
    }
}

/// 一塊矩形的 metatile ID（列優先）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    width: usize,
    height: usize,
    tiles: Vec<u8>,
}

impl Selection {
    pub fn new(width: usize, height: usize, tiles: Vec<u8>) -> Result<Self> {
        let cells = width.checked_mul(height).unwrap_or(usize::MAX);
        if tiles.len() != cells {
            return Err(Error::InvalidRange {
                start: 0,
                end: cells,
                len: tiles.len(),
            });
        }
        Ok(Selection {
            width,
            height,
            tiles,
        })
    }

    /// 從 tileset 格線挑選；ID 與 tileset 的列優先編號一致
    pub fn from_tileset(rect: Rect, layout: &TilesetLayout) -> Result<Self> {
        rect.check_within(layout.width, layout.height)?;
        let mut tiles = Vec::with_capacity((rect.width * rect.height) as usize);
        for row in rect.y..rect.y + rect.height {
            for col in rect.x..rect.x + rect.width {
                let id = row as usize * layout.width + col as usize;
                let id = u8::try_from(id).map_err(|_| Error::SelectionOutOfBounds {
                    x: rect.x,
                    y: rect.y,
                    width: rect.width,
                    height: rect.height,
                })?;
                tiles.push(id);
            }
        }
        Selection::new(rect.width as usize, rect.height as usize, tiles)
    }

    /// 從畫面資料複製一塊
    pub fn from_screen(rom: &Rom, screen_offset: usize, rect: Rect) -> Result<Self> {
        rect.check_within(SCREEN_CELLS, SCREEN_CELLS)?;
        let data = rom.slice(screen_offset, SCREEN_BYTES)?;
        let mut tiles = Vec::with_capacity((rect.width * rect.height) as usize);
        for row in rect.y..rect.y + rect.height {
            let start = row as usize * SCREEN_CELLS + rect.x as usize;
            tiles.extend_from_slice(&data[start..start + rect.width as usize]);
        }
        Selection::new(rect.width as usize, rect.height as usize, tiles)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn tiles(&self) -> &[u8] {
        &self.tiles
    }

    pub fn get(&self, col: usize, row: usize) -> Option<u8> {
        if col < self.width && row < self.height {
            Some(self.tiles[row * self.width + col])
        } else {
            None
        }
    }

    /// 蓋到畫面資料的 (col, row)，超出畫面邊緣的部分捨棄；回傳寫入格數
    pub fn stamp(&self, rom: &mut Rom, screen_offset: usize, col: usize, row: usize) -> Result<usize> {
        rom.check_range(screen_offset, SCREEN_BYTES)?;
        if col >= SCREEN_CELLS || row >= SCREEN_CELLS {
            return Ok(0);
        }
        let visible = self.width.min(SCREEN_CELLS - col);
        let mut written = 0;
        for r in 0..self.height.min(SCREEN_CELLS - row) {
            let src = &self.tiles[r * self.width..r * self.width + visible];
            rom.write(screen_offset + (row + r) * SCREEN_CELLS + col, src)?;
            written += visible;
        }
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unite_adds_inclusive_extent() {
        let r = Rect::new(3, 4, 2, 2).unite(Rect::new(1, 5, 1, 3));
        assert_eq!(r, Rect::new(1, 4, 5, 5));
        assert_eq!(Rect::span((2, 3), (0, 1)), Rect::new(0, 1, 3, 3));
        assert_eq!(Rect::span((5, 5), (5, 5)), Rect::new(5, 5, 1, 1));
    }

    #[test]
    fn test_extreme_rects_are_rejected_without_overflow() {
        let layout = TilesetLayout {
            gfx_offset: 0,
            metatile_offset: 0,
            width: 16,
            height: 16,
        };
        assert!(matches!(
            Selection::from_tileset(Rect::new(i32::MAX, 0, 1, 1), &layout),
            Err(Error::SelectionOutOfBounds { x: i32::MAX, .. })
        ));
        assert!(Selection::from_tileset(Rect::new(0, 1, 1, i32::MAX), &layout).is_err());
        let rom = Rom::new(vec![0u8; 0x100]);
        assert!(Selection::from_screen(&rom, 0, Rect::new(1, 1, i32::MAX, 1)).is_err());

        let wide = Rect::new(i32::MIN, 0, 0, 0).unite(Rect::new(i32::MAX, 0, 0, 0));
        assert_eq!((wide.x, wide.width), (i32::MIN, i32::MAX));
        assert!(Selection::new(usize::MAX, 2, vec![0]).is_err());
    }

    #[test]
    fn test_from_tileset_uses_row_major_ids() {
        let layout = TilesetLayout {
            gfx_offset: 0,
            metatile_offset: 0,
            width: 8,
            height: 4,
        };
        let sel = Selection::from_tileset(Rect::span((1, 1), (2, 2)), &layout).unwrap();
        assert_eq!(sel.tiles(), &[9, 10, 17, 18]);
        assert!(Selection::from_tileset(Rect::new(7, 0, 2, 1), &layout).is_err());
        assert!(Selection::from_tileset(Rect::new(-1, 0, 1, 1), &layout).is_err());
    }

    #[test]
    fn test_from_screen_copies_block() {
        let mut data = vec![0u8; 0x200];
        for (i, b) in data[0x100..0x200].iter_mut().enumerate() {
            *b = i as u8;
        }
        let rom = Rom::new(data);
        let sel = Selection::from_screen(&rom, 0x100, Rect::new(14, 1, 2, 2)).unwrap();
        assert_eq!(sel.tiles(), &[30, 31, 46, 47]);
        assert_eq!(sel.get(1, 1), Some(47));
        assert_eq!(sel.get(2, 0), None);
    }

    #[test]
    fn test_stamp_clips_at_screen_edge() {
        let mut rom = Rom::new(vec![0u8; 0x100]);
        let sel = Selection::new(3, 2, vec![1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(sel.stamp(&mut rom, 0, 14, 15).unwrap(), 2);
        assert_eq!(&rom.as_bytes()[0xFE..0x100], &[1, 2]);
        assert_eq!(sel.stamp(&mut rom, 0, 0, 0).unwrap(), 6);
        assert_eq!(&rom.as_bytes()[0x00..0x03], &[1, 2, 3]);
        assert_eq!(&rom.as_bytes()[0x10..0x13], &[4, 5, 6]);
        assert_eq!(sel.stamp(&mut rom, 0, 16, 0).unwrap(), 0);
    }

    #[test]
    fn test_stamp_checks_screen_bounds_first() {
        let mut rom = Rom::new(vec![0u8; 0xFF]);
        let sel = Selection::new(1, 1, vec![9]).unwrap();
        assert!(sel.stamp(&mut rom, 0, 0, 0).is_err());
        assert!(rom.as_bytes().iter().all(|&b| b == 0));
    }
}
