//! 工作階段執行緒
//!
//! 一個 `EditorSession` 只屬於一條 worker 執行緒，其他執行緒透過
//! crossbeam channel 送出請求；快取重建中的狀態不會被外部看到。

use std::thread::{self, JoinHandle};

use crossbeam::channel::{self, Receiver, Sender};

use crate::config::PatchScript;
use crate::core::error::{Error, Result};
use crate::core::gfx::area::AREA_SIZE;
use crate::core::gfx::tileset::TilesetLayout;
use crate::core::gfx::types::{PixelBlock, Point};
use crate::core::rom::Rom;
use crate::core::session::EditorSession;
use crate::utils::logger::log_to_file;

#[derive(Debug)]
pub enum Request {
    RenderTileset(TilesetLayout),
    /// 重建畫面快取並合成整個區域
    RenderArea { bank: usize },
    /// 只用現有快取重新合成
    CompositeArea { bank: usize },
    UpdateScreen { bank: usize, slot: usize },
    Patch(PatchScript),
    Snapshot,
    Shutdown,
}

#[derive(Debug)]
pub enum Reply {
    Tileset(PixelBlock),
    Area { bank: usize, bitmap: PixelBlock },
    ScreenUpdated { bank: usize, slot: usize },
    Patched(usize),
    Rom(Rom),
    Failed(Error),
}

#[derive(Debug)]
pub struct SessionWorker {
    requests: Sender<Request>,
    replies: Receiver<Reply>,
    handle: Option<JoinHandle<EditorSession>>,
}

fn serve(session: &mut EditorSession, request: Request) -> Result<Reply> {
    match request {
        Request::RenderTileset(layout) => Ok(Reply::Tileset(session.render_tileset(layout)?.clone())),
        Request::RenderArea { bank } => Ok(Reply::Area {
            bank,
            bitmap: session.render_area_bitmap(bank)?,
        }),
        Request::CompositeArea { bank } => {
            let mut bitmap = PixelBlock::new(AREA_SIZE, AREA_SIZE);
            session.composite_area(bank, &mut bitmap, Point::ORIGIN)?;
            Ok(Reply::Area { bank, bitmap })
        }
        Request::UpdateScreen { bank, slot } => {
            session.update_screen(slot, bank)?;
            Ok(Reply::ScreenUpdated { bank, slot })
        }
        Request::Patch(script) => Ok(Reply::Patched(script.apply(session)?)),
        Request::Snapshot => Ok(Reply::Rom(session.rom().clone())),
        // 由 run 迴圈處理
        Request::Shutdown => Err(Error::WorkerDisconnected),
    }
}

fn run(mut session: EditorSession, requests: Receiver<Request>, replies: Sender<Reply>) -> EditorSession {
    log_to_file("[WORKER] start");
    for request in requests.iter() {
        if let Request::Shutdown = request {
            break;
        }
        let reply = serve(&mut session, request).unwrap_or_else(Reply::Failed);
        if replies.send(reply).is_err() {
            break;
        }
    }
    log_to_file("[WORKER] stop");
    session
}

impl SessionWorker {
    pub fn spawn(session: EditorSession) -> Self {
        let (req_tx, req_rx) = channel::unbounded();
        let (reply_tx, reply_rx) = channel::unbounded();
        let handle = thread::spawn(move || run(session, req_rx, reply_tx));
        SessionWorker {
            requests: req_tx,
            replies: reply_rx,
            handle: Some(handle),
        }
    }

    pub fn send(&self, request: Request) -> Result<()> {
        self.requests
            .send(request)
            .map_err(|_| Error::WorkerDisconnected)
    }

    pub fn recv(&self) -> Result<Reply> {
        self.replies.recv().map_err(|_| Error::WorkerDisconnected)
    }

    /// 送出請求並等待回覆；`Reply::Failed` 轉成錯誤
    pub fn request(&self, request: Request) -> Result<Reply> {
        self.send(request)?;
        match self.recv()? {
            Reply::Failed(err) => Err(err),
            reply => Ok(reply),
        }
    }

    /// 結束 worker 並取回工作階段
    pub fn shutdown(mut self) -> Result<EditorSession> {
        let _ = self.requests.send(Request::Shutdown);
        let handle = self.handle.take().ok_or(Error::WorkerDisconnected)?;
        handle.join().map_err(|_| Error::WorkerDisconnected)
    }
}
