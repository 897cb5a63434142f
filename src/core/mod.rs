pub mod error;
pub mod gfx;
pub mod rom;
pub mod selection;
pub mod session;

// 這裡僅公開核心模組，結構與方法請分別在各自模組內定義與實作。
