use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

const DEFAULT_LOG_PATH: &str = "logs/editor.log";

// 全域 log 檔案鎖，避免 worker 與主執行緒同時寫入
lazy_static::lazy_static! {
    static ref LOG_PATH: Mutex<PathBuf> = Mutex::new(PathBuf::from(DEFAULT_LOG_PATH));
}

/// 變更 log 檔案位置（設定檔 log_path）
pub fn set_log_path<P: AsRef<Path>>(path: P) {
    if let Ok(mut current) = LOG_PATH.lock() {
        *current = path.as_ref().to_path_buf();
    }
}

/// 將訊息附加到 log 檔案 (預設 logs/editor.log)
pub fn log_to_file(msg: &str) {
    let Ok(path) = LOG_PATH.lock() else {
        return;
    };
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            let _ = std::fs::create_dir_all(dir);
        }
    }
    if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(&*path) {
        let _ = writeln!(file, "{}", msg);
    }
}
