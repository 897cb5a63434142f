//! Game Boy 關卡區域 ROM 編輯器核心
//!
//! 將 ROM 內的 2bpp 圖塊 → 16x16 metatile → 256x256 畫面 → 區域地圖
//! 逐層解碼成像素緩衝區，並支援直接修補 ROM 位元組。

pub mod config;
pub mod core;
pub mod rom;
pub mod utils;
pub mod worker;

pub use crate::core::error::{Error, Result};
pub use crate::core::gfx::types::{PixelBlock, Point, Shade};
pub use crate::core::rom::Rom;
pub use crate::core::session::EditorSession;
