#[cfg(feature = "viewer")]
mod sdl3;

use std::path::Path;
use std::process::ExitCode;

use gb_area_editor::config::{EditorConfig, PatchScript, parse_offset};
use gb_area_editor::core::gfx::area::AreaMap;
use gb_area_editor::core::gfx::tile::{TILE_BYTES, draw_tile_sheet};
use gb_area_editor::core::gfx::types::TILE_SIZE;
use gb_area_editor::rom::{find_roms, parse_rom_header, read_rom_file, save_rom};
use gb_area_editor::utils::logger::set_log_path;
use gb_area_editor::{EditorSession, PixelBlock, Point, Shade};

const USAGE: &str = "用法:
  gb_area_editor info <ROM 或資料夾> [config.json]
  gb_area_editor dump <ROM> <offset> <length>
  gb_area_editor patch <ROM> <patch.json> [輸出路徑]
  gb_area_editor sheet <ROM> <offset> <寬(圖塊)> <高(圖塊)>
  gb_area_editor config
  gb_area_editor view <ROM> [config.json]";

fn load_config(path: Option<&String>) -> gb_area_editor::Result<EditorConfig> {
    let config = match path {
        Some(path) => EditorConfig::load(path)?,
        None => EditorConfig::default(),
    };
    if let Some(log_path) = &config.log_path {
        set_log_path(log_path);
    }
    Ok(config)
}

fn print_info(path: &Path, config: &EditorConfig) -> gb_area_editor::Result<()> {
    let rom = read_rom_file(path)?;
    let title = parse_rom_header(rom.as_bytes())
        .map(|h| h.title)
        .unwrap_or_else(|_| "<no header>".to_string());
    println!("{}: \"{}\" {} bytes", path.display(), title, rom.len());
    for (index, &bank) in config.bank_offsets.iter().enumerate() {
        match AreaMap::read(&rom, bank) {
            Ok(map) => println!(
                "  bank {} @ {:#07X}: {} screen cell(s)",
                index,
                bank,
                256 - map.empty_cells()
            ),
            Err(err) => println!("  bank {} @ {:#07X}: {}", index, bank, err),
        }
    }
    Ok(())
}

fn parse_arg(text: &str) -> gb_area_editor::Result<usize> {
    parse_offset(text).ok_or_else(|| gb_area_editor::Error::Config(format!("invalid number `{}`", text)))
}

/// 每個像素一個字元，由亮到暗
fn shade_char(shade: Shade) -> char {
    match shade {
        Shade::White => ' ',
        Shade::LightGray => '░',
        Shade::DarkGray => '▓',
        Shade::Black => '█',
    }
}

fn print_sheet(sheet: &PixelBlock) {
    for y in 0..sheet.height() {
        let line: String = (0..sheet.width())
            .filter_map(|x| sheet.get(x, y))
            .map(shade_char)
            .collect();
        println!("{}", line);
    }
}

fn run(args: &[String]) -> gb_area_editor::Result<()> {
    match args.get(1).map(String::as_str) {
        Some("info") if args.len() >= 3 => {
            let config = load_config(args.get(3))?;
            let target = Path::new(&args[2]);
            if target.is_dir() {
                for path in find_roms(target) {
                    print_info(&path, &config)?;
                }
            } else {
                print_info(target, &config)?;
            }
            Ok(())
        }
        Some("dump") if args.len() >= 5 => {
            let (Some(offset), Some(len)) = (parse_offset(&args[3]), parse_offset(&args[4])) else {
                return Err(gb_area_editor::Error::Config(format!(
                    "invalid offset/length `{} {}`",
                    args[3], args[4]
                )));
            };
            let session = EditorSession::new(read_rom_file(&args[2])?);
            println!("{}", session.raw_data_string(offset, len)?);
            Ok(())
        }
        Some("patch") if args.len() >= 4 => {
            let mut rom = read_rom_file(&args[2])?;
            let script = PatchScript::load(&args[3])?;
            let applied = script.apply(&mut rom)?;
            let out = args.get(4).unwrap_or(&args[2]);
            save_rom(out, &rom)?;
            println!("已套用 {} 個修補 → {}", applied, out);
            Ok(())
        }
        Some("sheet") if args.len() >= 6 => {
            let offset = parse_arg(&args[3])?;
            let tiles_wide = parse_arg(&args[4])?;
            let tiles_high = parse_arg(&args[5])?;
            if tiles_wide == 0 || tiles_high == 0 {
                return Err(gb_area_editor::Error::Config("empty tile sheet".to_string()));
            }
            let rom = read_rom_file(&args[2])?;
            // 先檢查範圍，避免為過大的尺寸配置畫布
            let len = tiles_wide
                .checked_mul(tiles_high)
                .and_then(|n| n.checked_mul(TILE_BYTES))
                .unwrap_or(usize::MAX);
            rom.check_range(offset, len)?;
            let mut sheet = PixelBlock::new(tiles_wide * TILE_SIZE, tiles_high * TILE_SIZE);
            draw_tile_sheet(&rom, offset, &mut sheet, Point::ORIGIN, tiles_wide, tiles_high)?;
            print_sheet(&sheet);
            Ok(())
        }
        Some("config") => {
            println!("{}", EditorConfig::default().to_json()?);
            Ok(())
        }
        #[cfg(feature = "viewer")]
        Some("view") if args.len() >= 3 => {
            let config = load_config(args.get(3))?;
            let rom_path = std::path::absolute(&args[2])?;
            sdl3::main(&rom_path, config)
        }
        #[cfg(not(feature = "viewer"))]
        Some("view") => Err(gb_area_editor::Error::Viewer(
            "built without the `viewer` feature".to_string(),
        )),
        _ => {
            println!("{}", USAGE);
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("錯誤: {}", err);
            ExitCode::FAILURE
        }
    }
}
