use std::path::{Path, PathBuf};

/// 回傳第一個不存在的目標路徑
///
/// 目標不存在時原樣回傳；否則依序嘗試 `name (1).ext`、`name (2).ext`……
/// 檢查與後續寫入之間並非原子操作，僅在單一執行者時保證唯一。
#[must_use]
pub fn resolve_collision(candidate: &Path) -> PathBuf {
    if !candidate.exists() {
        return candidate.to_path_buf();
    }

    let parent = candidate.parent().unwrap_or_else(|| Path::new(""));
    let stem = candidate
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = candidate
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    (1_u64..)
        .map(|counter| parent.join(format!("{stem} ({counter}){extension}")))
        .find(|path| !path.exists())
        .unwrap_or_else(|| candidate.to_path_buf())
}
