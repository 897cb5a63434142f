use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    /// 讀寫範圍超出 ROM 緩衝區
    OutOfBounds {
        offset: usize,
        len: usize,
        rom_len: usize,
    },
    /// 畫面資料引用了尚未渲染的 metatile
    MissingMetatile { id: u8, cached: usize },
    /// 畫面指標指向 59 個快取畫面之外
    MissingScreen { slot: usize },
    /// write_range 的來源範圍不合法
    InvalidRange { start: usize, end: usize, len: usize },
    /// 選取範圍超出來源格線
    SelectionOutOfBounds {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },
    TilesetNotRendered,
    ScreensNotRendered { bank: usize },
    /// 尚未讀取此 bank 的索引表（或留著的是別的 bank）
    AreaMapNotRead { bank: usize },
    BankOutOfRange { index: usize, count: usize },
    /// 工作階段執行緒已結束
    WorkerDisconnected,
    Io(std::io::Error),
    Json(serde_json::Error),
    Config(String),
    Viewer(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::OutOfBounds {
                offset,
                len,
                rom_len,
            } => write!(
                f,
                "access of {} byte(s) at {:#07X} exceeds ROM size {:#07X}",
                len, offset, rom_len
            ),
            Error::MissingMetatile { id, cached } => write!(
                f,
                "metatile {:#04X} is not in the tileset cache ({} entries)",
                id, cached
            ),
            Error::MissingScreen { slot } => write!(f, "screen slot {} is not cached", slot),
            Error::InvalidRange { start, end, len } => write!(
                f,
                "source range {}..{} is invalid for {} byte(s)",
                start, end, len
            ),
            Error::SelectionOutOfBounds {
                x,
                y,
                width,
                height,
            } => write!(
                f,
                "selection {}x{} at ({}, {}) is outside the grid",
                width, height, x, y
            ),
            Error::TilesetNotRendered => write!(f, "tileset has not been rendered"),
            Error::ScreensNotRendered { bank } => {
                write!(f, "screens for bank {:#07X} have not been rendered", bank)
            }
            Error::AreaMapNotRead { bank } => {
                write!(f, "area map for bank {:#07X} has not been read", bank)
            }
            Error::BankOutOfRange { index, count } => {
                write!(f, "bank index {} out of range (0..{})", index, count)
            }
            Error::WorkerDisconnected => write!(f, "session worker has stopped"),
            Error::Io(err) => write!(f, "I/O error: {}", err),
            Error::Json(err) => write!(f, "JSON error: {}", err),
            Error::Config(msg) => write!(f, "config error: {}", msg),
            Error::Viewer(msg) => write!(f, "viewer error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_bounds_message_names_offset_and_size() {
        let err = Error::OutOfBounds {
            offset: 0x10,
            len: 2,
            rom_len: 0x11,
        };
        let msg = err.to_string();
        assert!(msg.contains("0x00010"));
        assert!(msg.contains("0x00011"));
    }

    #[test]
    fn test_io_error_converts_and_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(std::error::Error::source(&err).is_some());
    }
}
