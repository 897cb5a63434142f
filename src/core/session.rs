//! 編輯工作階段：擁有目前的 ROM 與 tileset / 畫面快取
//!
//! 快取只在明確呼叫重建時更新。修補 ROM 後需自行呼叫
//! `render_tileset` / `rebuild_screens` / `update_screen`。

use crate::core::error::{Error, Result};
use crate::core::gfx::area::{AREA_SIZE, AreaMap, ScreenCache, screen_offset};
use crate::core::gfx::screen::compose_screen;
use crate::core::gfx::tileset::{Tileset, TilesetLayout};
use crate::core::gfx::types::{PixelBlock, Point};
use crate::core::rom::Rom;
use crate::core::selection::Selection;
use crate::utils::logger::log_to_file;

#[derive(Debug)]
pub struct EditorSession {
    rom: Rom,
    tileset: Option<Tileset>,
    screens: Option<ScreenCache>,
    /// (bank, 索引表)
    area_map: Option<(usize, AreaMap)>,
}

impl EditorSession {
    pub fn new(rom: Rom) -> Self {
        log_to_file(&format!("[SESSION] open rom size={:#X}", rom.len()));
        EditorSession {
            rom,
            tileset: None,
            screens: None,
            area_map: None,
        }
    }

    pub fn rom(&self) -> &Rom {
        &self.rom
    }

    pub fn into_rom(self) -> Rom {
        self.rom
    }

    pub fn tileset(&self) -> Option<&Tileset> {
        self.tileset.as_ref()
    }

    pub fn screens(&self) -> Option<&ScreenCache> {
        self.screens.as_ref()
    }

    pub fn area_map(&self) -> Option<&AreaMap> {
        self.area_map.as_ref().map(|(_, map)| map)
    }

    fn require_tileset(&self) -> Result<&Tileset> {
        self.tileset.as_ref().ok_or(Error::TilesetNotRendered)
    }

    fn require_screens(&self, bank: usize) -> Result<&ScreenCache> {
        match &self.screens {
            Some(cache) if cache.bank() == bank => Ok(cache),
            _ => Err(Error::ScreensNotRendered { bank }),
        }
    }

    /// 重建 tileset 快取並回傳總覽圖；舊快取整個丟棄
    pub fn render_tileset(&mut self, layout: TilesetLayout) -> Result<&PixelBlock> {
        log_to_file(&format!(
            "[TILESET] gfx={:#X} meta={:#X} {}x{}",
            layout.gfx_offset, layout.metatile_offset, layout.width, layout.height
        ));
        // 新 tileset 會使舊的畫面快取失效
        self.screens = None;
        self.tileset = None;
        let tileset = Tileset::render(&self.rom, layout)?;
        Ok(self.tileset.insert(tileset).bitmap())
    }

    /// 不經快取，直接組出一張畫面
    pub fn compose_screen(&self, screen_offset: usize) -> Result<PixelBlock> {
        compose_screen(&self.rom, self.require_tileset()?, screen_offset)
    }

    /// 重建指定 bank 的 59 個畫面
    pub fn rebuild_screens(&mut self, bank: usize) -> Result<()> {
        log_to_file(&format!("[SCREENS] rebuild bank={:#X}", bank));
        self.screens = None;
        let cache = ScreenCache::build(&self.rom, self.require_tileset()?, bank)?;
        self.screens = Some(cache);
        Ok(())
    }

    /// 只重畫單一畫面
    pub fn update_screen(&mut self, slot: usize, bank: usize) -> Result<()> {
        log_to_file(&format!("[SCREENS] update bank={:#X} slot={}", bank, slot));
        self.require_screens(bank)?;
        let tileset = self.tileset.as_ref().ok_or(Error::TilesetNotRendered)?;
        match self.screens.as_mut() {
            Some(cache) => cache.update(&self.rom, tileset, slot),
            None => Err(Error::ScreensNotRendered { bank }),
        }
    }

    pub fn read_area_map(&mut self, bank: usize) -> Result<&AreaMap> {
        self.area_map = None;
        let map = AreaMap::read(&self.rom, bank)?;
        Ok(&self.area_map.insert((bank, map)).1)
    }

    /// 用現有快取與索引表合成區域
    pub fn composite_area(&self, bank: usize, dst: &mut PixelBlock, at: Point) -> Result<()> {
        let cache = self.require_screens(bank)?;
        let map = match &self.area_map {
            Some((map_bank, map)) if *map_bank == bank => map,
            _ => return Err(Error::AreaMapNotRead { bank }),
        };
        log_to_file(&format!(
            "[AREA] composite bank={:#X} empty_cells={}",
            bank,
            map.empty_cells()
        ));
        cache.composite(map, dst, at)
    }

    /// 重建畫面快取、讀取索引表，再合成到 `dst`
    pub fn render_area(&mut self, bank: usize, dst: &mut PixelBlock, at: Point) -> Result<()> {
        self.rebuild_screens(bank)?;
        self.read_area_map(bank)?;
        self.composite_area(bank, dst, at)
    }

    /// 產生一張新的完整區域點陣圖
    pub fn render_area_bitmap(&mut self, bank: usize) -> Result<PixelBlock> {
        let mut canvas = PixelBlock::new(AREA_SIZE, AREA_SIZE);
        self.render_area(bank, &mut canvas, Point::ORIGIN)?;
        Ok(canvas)
    }

    pub fn write(&mut self, offset: usize, values: &[u8]) -> Result<()> {
        self.rom.write(offset, values)?;
        log_to_file(&format!("[PATCH] write offset={:#X} len={}", offset, values.len()));
        Ok(())
    }

    pub fn write_range(&mut self, offset: usize, values: &[u8], start: usize, end: usize) -> Result<()> {
        self.rom.write_range(offset, values, start, end)?;
        log_to_file(&format!(
            "[PATCH] write_range offset={:#X} len={}",
            offset,
            end - start
        ));
        Ok(())
    }

    pub fn write_pointer_le(&mut self, offset: usize, value: u16) -> Result<()> {
        self.rom.write_pointer_le(offset, value)?;
        log_to_file(&format!("[PATCH] pointer offset={:#X} value={:#06X}", offset, value));
        Ok(())
    }

    /// 把選取的 metatile 蓋到畫面資料並刷新該畫面的快取
    pub fn paste_selection(
        &mut self,
        bank: usize,
        slot: usize,
        col: usize,
        row: usize,
        selection: &Selection,
    ) -> Result<usize> {
        self.require_screens(bank)?.screen(slot)?;
        // 先確認每個 ID 都在 tileset 內，失敗時 ROM 與快取都不動
        let tileset = self.require_tileset()?;
        for &id in selection.tiles() {
            tileset.metatile(id)?;
        }
        let written = selection.stamp(&mut self.rom, screen_offset(bank, slot), col, row)?;
        log_to_file(&format!(
            "[PATCH] paste bank={:#X} slot={} at=({}, {}) cells={}",
            bank, slot, col, row, written
        ));
        self.update_screen(slot, bank)?;
        Ok(written)
    }

    pub fn raw_data_string(&self, offset: usize, len: usize) -> Result<String> {
        self.rom.raw_data_string(offset, len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::gfx::area::{SCREEN_SLOTS, screen_offset};
    use crate::core::gfx::types::Shade;
    use crate::core::selection::Rect;

    const BANK: usize = 0x1000;

    // 圖塊 1 全白；metatile 0 全黑、1 全白；畫面 0 左上格為白
    fn session() -> EditorSession {
        let mut data = vec![0u8; screen_offset(BANK, SCREEN_SLOTS)];
        for row in 0..8 {
            data[0x10 + row * 2 + 1] = 0xFF;
        }
        data[0x44..0x48].copy_from_slice(&[1, 1, 1, 1]);
        data[screen_offset(BANK, 0)] = 1;
        data[BANK + 1] = 0x45;
        EditorSession::new(Rom::new(data))
    }

    fn layout() -> TilesetLayout {
        TilesetLayout {
            gfx_offset: 0,
            metatile_offset: 0x40,
            width: 2,
            height: 1,
        }
    }

    #[test]
    fn test_composite_before_rebuild_is_refused() {
        let mut s = session();
        let mut canvas = PixelBlock::new(256, 256);
        assert!(matches!(
            s.rebuild_screens(BANK),
            Err(Error::TilesetNotRendered)
        ));
        s.render_tileset(layout()).unwrap();
        assert!(matches!(
            s.composite_area(BANK, &mut canvas, Point::ORIGIN),
            Err(Error::ScreensNotRendered { bank: BANK })
        ));
        s.rebuild_screens(BANK).unwrap();
        assert!(matches!(
            s.update_screen(0, BANK + 0x4000),
            Err(Error::ScreensNotRendered { .. })
        ));
    }

    #[test]
    fn test_new_tileset_drops_screen_cache() {
        let mut s = session();
        s.render_tileset(layout()).unwrap();
        s.rebuild_screens(BANK).unwrap();
        assert!(s.screens().is_some());
        s.render_tileset(layout()).unwrap();
        assert!(s.screens().is_none());
    }

    #[test]
    fn test_render_area_bitmap_full_size() {
        let mut s = session();
        s.render_tileset(layout()).unwrap();
        let area = s.render_area_bitmap(BANK).unwrap();
        assert_eq!((area.width(), area.height()), (4096, 4096));
        assert_eq!(area.get(0, 0), Some(Shade::White));
        assert_eq!(area.get(16, 0), Some(Shade::Black));
        assert_eq!(s.area_map().unwrap().empty_cells(), 255);
    }

    #[test]
    fn test_patch_then_update_screen_refreshes_one_slot() {
        let mut s = session();
        s.render_tileset(layout()).unwrap();
        s.rebuild_screens(BANK).unwrap();
        s.write(screen_offset(BANK, 0) + 1, &[1]).unwrap();
        assert_eq!(s.screens().unwrap().screen(0).unwrap().get(16, 0), Some(Shade::Black));
        s.update_screen(0, BANK).unwrap();
        assert_eq!(s.screens().unwrap().screen(0).unwrap().get(16, 0), Some(Shade::White));
    }

    #[test]
    fn test_paste_selection_writes_rom_and_updates_screen() {
        let mut s = session();
        s.render_tileset(layout()).unwrap();
        s.rebuild_screens(BANK).unwrap();
        let sel = Selection::from_tileset(Rect::new(1, 0, 1, 1), &layout()).unwrap();
        assert_eq!(s.paste_selection(BANK, 2, 3, 4, &sel).unwrap(), 1);
        assert_eq!(s.rom().as_bytes()[screen_offset(BANK, 2) + 4 * 16 + 3], 1);
        let screen = s.screens().unwrap().screen(2).unwrap();
        assert_eq!(screen.get(48, 64), Some(Shade::White));
        assert!(s.paste_selection(BANK, SCREEN_SLOTS, 0, 0, &sel).is_err());
    }

    #[test]
    fn test_composite_needs_area_map_of_same_bank() {
        const OTHER: usize = 0x6000;
        let mut data = session().into_rom().into_bytes();
        data.resize(screen_offset(OTHER, SCREEN_SLOTS), 0);
        data[OTHER + 1] = 0x45;
        data[BANK + 1] = 0;
        let mut s = EditorSession::new(Rom::new(data));
        s.render_tileset(layout()).unwrap();
        let mut canvas = PixelBlock::filled(256, 256, Shade::LightGray);

        s.read_area_map(BANK).unwrap();
        s.rebuild_screens(OTHER).unwrap();
        assert!(matches!(
            s.composite_area(OTHER, &mut canvas, Point::ORIGIN),
            Err(Error::AreaMapNotRead { bank: OTHER })
        ));
        assert_eq!(canvas.get(0, 0), Some(Shade::LightGray));

        s.read_area_map(OTHER).unwrap();
        s.composite_area(OTHER, &mut canvas, Point::ORIGIN).unwrap();
        assert_eq!(canvas.get(0, 0), Some(Shade::Black));
    }

    #[test]
    fn test_paste_with_unknown_metatile_changes_nothing() {
        let mut s = session();
        s.render_tileset(layout()).unwrap();
        s.rebuild_screens(BANK).unwrap();
        let before = s.rom().clone();
        let sel = Selection::new(1, 1, vec![5]).unwrap();
        assert!(matches!(
            s.paste_selection(BANK, 0, 1, 0, &sel),
            Err(Error::MissingMetatile { id: 5, cached: 2 })
        ));
        assert_eq!(s.rom(), &before);
        assert_eq!(s.screens().unwrap().screen(0).unwrap().get(16, 0), Some(Shade::Black));
    }

    #[test]
    fn test_failed_patch_changes_nothing() {
        let mut s = session();
        let before = s.rom().clone();
        let len = before.len();
        assert!(s.write(len - 1, &[1, 2]).is_err());
        assert!(s.write_pointer_le(len - 1, 0x1234).is_err());
        assert_eq!(s.rom(), &before);
        s.write_pointer_le(0, 0x1234).unwrap();
        assert_eq!(s.raw_data_string(0, 2).unwrap(), "34 12 ");
    }
}
