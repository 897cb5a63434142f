//! 圖形解碼管線：圖塊 → metatile → tileset / 畫面 → 區域

pub mod area;
pub mod metatile;
pub mod screen;
pub mod tile;
pub mod tileset;
pub mod types;
