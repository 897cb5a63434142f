extern crate sdl3;

use std::path::Path;
use std::time::Duration;

use sdl3::event::Event;
use sdl3::keyboard::Keycode;
use sdl3::pixels::PixelFormat;

use gb_area_editor::config::EditorConfig;
use gb_area_editor::core::gfx::area::AREA_CELLS;
use gb_area_editor::core::gfx::types::SCREEN_SIZE;
use gb_area_editor::rom::{read_rom_file, save_rom, title_for};
use gb_area_editor::worker::{Reply, Request, SessionWorker};
use gb_area_editor::{EditorSession, Error, PixelBlock, Point, Result};

/// 視窗一次顯示 2x2 個畫面
const VIEW_SCREENS: usize = 2;
const VIEW_SIZE: usize = SCREEN_SIZE * VIEW_SCREENS;

fn sdl_err<E: std::fmt::Display>(err: E) -> Error {
    Error::Viewer(err.to_string())
}

fn request_area(worker: &SessionWorker, bank: usize) -> Result<PixelBlock> {
    match worker.request(Request::RenderArea { bank })? {
        Reply::Area { bitmap, .. } => Ok(bitmap),
        other => Err(Error::Viewer(format!("unexpected reply {:?}", other))),
    }
}

pub fn main(rom_path: &Path, config: EditorConfig) -> Result<()> {
    let sdl_context = sdl3::init().map_err(sdl_err)?;
    let video_subsystem = sdl_context.video().map_err(sdl_err)?;

    let worker = SessionWorker::spawn(EditorSession::new(read_rom_file(rom_path)?));
    worker.request(Request::RenderTileset(config.tileset_layout()))?;

    let mut bank_index = 0;
    let mut area = request_area(&worker, config.bank(bank_index)?)?;
    let (mut view_col, mut view_row) = (0usize, 0usize);

    let window = video_subsystem
        .window(&title_for(rom_path), VIEW_SIZE as u32, VIEW_SIZE as u32)
        .position_centered()
        .build()
        .map_err(sdl_err)?;

    let mut canvas = window.into_canvas();
    let texture_creator = canvas.texture_creator();
    let mut stream_tex = texture_creator
        .create_texture_streaming(PixelFormat::ABGR8888, VIEW_SIZE as u32, VIEW_SIZE as u32)
        .map_err(sdl_err)?;

    let mut event_pump = sdl_context.event_pump().map_err(sdl_err)?;
    'running: loop {
        for event in event_pump.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => break 'running,
                Event::KeyDown {
                    keycode: Some(key), ..
                } => match key {
                    Keycode::Left => view_col = view_col.saturating_sub(1),
                    Keycode::Right => view_col = (view_col + 1).min(AREA_CELLS - VIEW_SCREENS),
                    Keycode::Up => view_row = view_row.saturating_sub(1),
                    Keycode::Down => view_row = (view_row + 1).min(AREA_CELLS - VIEW_SCREENS),
                    Keycode::PageUp | Keycode::PageDown => {
                        let count = config.bank_offsets.len().max(1);
                        bank_index = if key == Keycode::PageUp {
                            (bank_index + count - 1) % count
                        } else {
                            (bank_index + 1) % count
                        };
                        area = request_area(&worker, config.bank(bank_index)?)?;
                        let _ = canvas.window_mut().set_title(&format!(
                            "{} [bank {}]",
                            title_for(rom_path),
                            bank_index
                        ));
                    }
                    Keycode::S => {
                        if let Reply::Rom(rom) = worker.request(Request::Snapshot)? {
                            save_rom(rom_path, &rom)?;
                        }
                    }
                    _ => {}
                },
                _ => {}
            }
        }

        // --- 裁出視窗範圍並上傳到串流貼圖 ---
        let view = area.region(
            Point::new(view_col * SCREEN_SIZE, view_row * SCREEN_SIZE),
            VIEW_SIZE,
            VIEW_SIZE,
        );
        stream_tex
            .update(None, &view.to_rgba(), view.width() * 4)
            .map_err(sdl_err)?;
        canvas.copy(&stream_tex, None, None).map_err(sdl_err)?;
        canvas.present();

        ::std::thread::sleep(Duration::new(0, 1_000_000_000u32 / 60));
    }

    worker.shutdown()?;
    Ok(())
}
