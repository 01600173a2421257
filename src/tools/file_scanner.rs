use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 可處理的截圖副檔名（不分大小寫）
pub const SCREENSHOT_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenshotFile {
    pub path: PathBuf,
    pub file_name: String,
}

#[must_use]
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SCREENSHOT_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
}

/// 掃描資料夾第一層的截圖檔案，依檔名排序
///
/// 子資料夾（包含 Archive 與已整理的日期資料夾）不會被進入，
/// 非圖片檔案直接忽略且不計入。
pub fn scan_screenshot_files(directory: &Path) -> io::Result<Vec<ScreenshotFile>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(directory)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .sort_by_file_name()
    {
        let entry = entry?;
        if !entry.file_type().is_file() || !is_supported_image(entry.path()) {
            continue;
        }

        // 非 UTF-8 檔名不可能符合命名規則，仍保留以便回報跳過
        let file_name = entry.file_name().to_string_lossy().into_owned();
        files.push(ScreenshotFile {
            path: entry.into_path(),
            file_name,
        });
    }

    Ok(files)
}
