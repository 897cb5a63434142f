//! 區域：一個 bank 內最多 59 個畫面，依指標表排成 16x16 格
//!
//! bank 配置：
//!   bank + 0x000  畫面指標表（每格 2 位元組，取第 2 個位元組）
//!   bank + 0x500  畫面資料（每個畫面 0x100 位元組）

use super::screen::{SCREEN_BYTES, compose_screen};
use super::tileset::Tileset;
use super::types::{PixelBlock, Point, SCREEN_SIZE};
use crate::core::error::{Error, Result};
use crate::core::rom::Rom;

/// 每個 bank 的快取畫面數
pub const SCREEN_SLOTS: usize = 59;
/// 畫面資料相對 bank 的起點
pub const SCREEN_DATA_OFFSET: usize = 0x500;
/// 指標值減去此值得到畫面索引
pub const SCREEN_POINTER_BASE: u8 = 0x45;
/// 區域每邊的畫面數
pub const AREA_CELLS: usize = 16;
/// 完整區域點陣圖邊長
pub const AREA_SIZE: usize = SCREEN_SIZE * AREA_CELLS;

/// 第 `slot` 個畫面資料的絕對位址
pub fn screen_offset(bank: usize, slot: usize) -> usize {
    bank + SCREEN_DATA_OFFSET + SCREEN_BYTES * slot
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenRef {
    Screen(usize),
    Empty,
}

impl ScreenRef {
    /// 指標位元組 < 0x45 代表空白區
    pub fn from_pointer(pointer: u8) -> Self {
        match pointer.checked_sub(SCREEN_POINTER_BASE) {
            Some(slot) => ScreenRef::Screen(slot as usize),
            None => ScreenRef::Empty,
        }
    }
}

/// 區域畫面索引表，以 [col][row] 存放原始指標位元組
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AreaMap {
    pointers: [[u8; AREA_CELLS]; AREA_CELLS],
}

impl AreaMap {
    pub fn read(rom: &Rom, bank: usize) -> Result<Self> {
        let table = rom.slice(bank, 2 * AREA_CELLS * AREA_CELLS)?;
        let mut pointers = [[0u8; AREA_CELLS]; AREA_CELLS];
        for cell in 0..AREA_CELLS * AREA_CELLS {
            let (col, row) = (cell % AREA_CELLS, cell / AREA_CELLS);
            pointers[col][row] = table[cell * 2 + 1];
        }
        Ok(AreaMap { pointers })
    }

    pub fn pointer(&self, col: usize, row: usize) -> u8 {
        self.pointers[col][row]
    }

    pub fn get(&self, col: usize, row: usize) -> ScreenRef {
        ScreenRef::from_pointer(self.pointers[col][row])
    }

    pub fn empty_cells(&self) -> usize {
        self.pointers
            .iter()
            .flatten()
            .filter(|&&p| ScreenRef::from_pointer(p) == ScreenRef::Empty)
            .count()
    }
}

/// 單一 bank 的畫面快取
#[derive(Debug, Clone)]
pub struct ScreenCache {
    bank: usize,
    screens: Vec<PixelBlock>,
}

impl ScreenCache {
    pub fn build(rom: &Rom, tileset: &Tileset, bank: usize) -> Result<Self> {
        let mut screens = Vec::with_capacity(SCREEN_SLOTS);
        for slot in 0..SCREEN_SLOTS {
            screens.push(compose_screen(rom, tileset, screen_offset(bank, slot))?);
        }
        Ok(ScreenCache { bank, screens })
    }

    pub fn bank(&self) -> usize {
        self.bank
    }

    pub fn screen(&self, slot: usize) -> Result<&PixelBlock> {
        self.screens.get(slot).ok_or(Error::MissingScreen { slot })
    }

    /// 只重畫單一畫面，整塊替換舊的快取
    pub fn update(&mut self, rom: &Rom, tileset: &Tileset, slot: usize) -> Result<()> {
        if slot >= self.screens.len() {
            return Err(Error::MissingScreen { slot });
        }
        self.screens[slot] = compose_screen(rom, tileset, screen_offset(self.bank, slot))?;
        Ok(())
    }

    /// 依索引表把畫面貼到 `dst`；空白格不繪製
    pub fn composite(&self, map: &AreaMap, dst: &mut PixelBlock, at: Point) -> Result<()> {
        for row in 0..AREA_CELLS {
            for col in 0..AREA_CELLS {
                if let ScreenRef::Screen(slot) = map.get(col, row) {
                    dst.blit(
                        self.screen(slot)?,
                        at.offset(SCREEN_SIZE * col, SCREEN_SIZE * row),
                    );
                }
            }
        }
        Ok(())
    }
}
