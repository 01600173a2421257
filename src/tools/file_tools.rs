use log::debug;
use std::fs;
use std::io;
use std::path::Path;

/// 移動檔案；`rename` 失敗時（例如跨檔案系統）改為複製後刪除
pub fn move_file(source: &Path, target: &Path) -> io::Result<()> {
    match fs::rename(source, target) {
        Ok(()) => Ok(()),
        Err(e) => {
            debug!(
                "rename 失敗，改用複製後刪除 {} -> {}: {e}",
                source.display(),
                target.display()
            );
            fs::copy(source, target)?;
            fs::remove_file(source)
        }
    }
}

pub fn copy_file(source: &Path, target: &Path) -> io::Result<()> {
    fs::copy(source, target).map(|_| ())
}
