use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::core::error::{Error, Result};
use crate::core::rom::Rom;
use crate::utils::logger::log_to_file;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartridgeHeader {
    pub title: String,
    pub cartridge_type: u8,
    pub rom_size: u8,
    pub ram_size: u8,
}

pub fn parse_rom_header(rom_data: &[u8]) -> Result<CartridgeHeader> {
    if rom_data.len() < 0x150 {
        return Err(Error::OutOfBounds {
            offset: 0x134,
            len: 0x1C,
            rom_len: rom_data.len(),
        });
    }

    let title_bytes: Vec<u8> = rom_data[0x0134..0x0143]
        .iter()
        .cloned()
        .filter(|&b| b != 0)
        .collect();
    let title = String::from_utf8_lossy(&title_bytes).trim().to_string();

    Ok(CartridgeHeader {
        title,
        cartridge_type: rom_data[0x0147],
        rom_size: rom_data[0x0148],
        ram_size: rom_data[0x0149],
    })
}

pub fn read_rom_file<P: AsRef<Path>>(path: P) -> Result<Rom> {
    let path = path.as_ref();
    let data = fs::read(path)?;
    log_to_file(&format!("[ROM] load {} ({} bytes)", path.display(), data.len()));
    Ok(Rom::new(data))
}

pub fn save_rom<P: AsRef<Path>>(path: P, rom: &Rom) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, rom.as_bytes())?;
    log_to_file(&format!("[ROM] save {} ({} bytes)", path.display(), rom.len()));
    Ok(())
}

/// 視窗標題："<檔名> - gb_area_editor"
pub fn title_for<P: AsRef<Path>>(path: P) -> String {
    let stem = path
        .as_ref()
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("{} - gb_area_editor", stem)
}

/// 遞迴尋找 .gb / .gbc 檔案，依路徑排序
pub fn find_roms<P: AsRef<Path>>(dir: P) -> Vec<PathBuf> {
    let mut roms: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext.eq_ignore_ascii_case("gb") || ext.eq_ignore_ascii_case("gbc"))
                .unwrap_or(false)
        })
        .collect();
    roms.sort();
    roms
}
