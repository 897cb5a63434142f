//! 圖形共用型別

/// 單一圖塊邊長 (8x8)
pub const TILE_SIZE: usize = 8;
/// metatile 邊長 (2x2 圖塊)
pub const METATILE_SIZE: usize = 16;
/// 畫面邊長 (16x16 metatile)
pub const SCREEN_SIZE: usize = 256;

/// DMG 4 階灰階
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Shade {
    White = 0,
    LightGray = 1,
    DarkGray = 2,
    #[default]
    Black = 3,
}

impl Shade {
    /// 灰階值（$FF, $AA, $55, $00）
    pub fn level(self) -> u8 {
        match self {
            Shade::White => 0xFF,
            Shade::LightGray => 0xAA,
            Shade::DarkGray => 0x55,
            Shade::Black => 0x00,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: usize,
    pub y: usize,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0, y: 0 };

    pub fn new(x: usize, y: usize) -> Self {
        Point { x, y }
    }

    pub fn offset(self, dx: usize, dy: usize) -> Self {
        Point {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// 具明確寬高的索引色像素區塊
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBlock {
    width: usize,
    height: usize,
    pixels: Vec<Shade>,
}

impl PixelBlock {
    /// 建立全黑的區塊
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, Shade::Black)
    }

    pub fn filled(width: usize, height: usize, shade: Shade) -> Self {
        PixelBlock {
            width,
            height,
            pixels: vec![shade; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[Shade] {
        &self.pixels
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Shade> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    /// 超出範圍的座標直接忽略
    pub fn set(&mut self, x: usize, y: usize, shade: Shade) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = shade;
        }
    }

    pub fn fill_rect(&mut self, at: Point, width: usize, height: usize, shade: Shade) {
        let x_end = (at.x + width).min(self.width);
        let y_end = (at.y + height).min(self.height);
        for y in at.y.min(y_end)..y_end {
            let row = y * self.width;
            self.pixels[row + at.x.min(x_end)..row + x_end].fill(shade);
        }
    }

    /// 將 `src` 整塊複製到 `at`，超出目的地的部分裁掉
    pub fn blit(&mut self, src: &PixelBlock, at: Point) {
        if at.x >= self.width || at.y >= self.height {
            return;
        }
        let w = src.width.min(self.width - at.x);
        let h = src.height.min(self.height - at.y);
        for y in 0..h {
            let s = y * src.width;
            let d = (at.y + y) * self.width + at.x;
            self.pixels[d..d + w].copy_from_slice(&src.pixels[s..s + w]);
        }
    }

    /// 取出一塊子區域（複本），超出部分裁掉
    pub fn region(&self, at: Point, width: usize, height: usize) -> PixelBlock {
        let w = width.min(self.width.saturating_sub(at.x));
        let h = height.min(self.height.saturating_sub(at.y));
        let mut out = PixelBlock::new(w, h);
        for y in 0..h {
            let s = (at.y + y) * self.width + at.x;
            out.pixels[y * w..(y + 1) * w].copy_from_slice(&self.pixels[s..s + w]);
        }
        out
    }

    /// 展開成 RGBA8888，供 framebuffer 上傳
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut rgba = vec![0u8; self.pixels.len() * 4];
        for (i, shade) in self.pixels.iter().enumerate() {
            let level = shade.level();
            let dst = i * 4;
            rgba[dst] = level;
            rgba[dst + 1] = level;
            rgba[dst + 2] = level;
            rgba[dst + 3] = 0xFF;
        }
        rgba
    }
}
