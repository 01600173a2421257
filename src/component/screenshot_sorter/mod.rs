//! 截圖整理元件
//!
//! 依檔名中的拍攝日期、區域與角色名稱整理截圖，
//! 可選擇移動並備份或複製到其他資料夾，並可加上浮水印

pub mod filename_parser;
mod main;
pub mod path_router;
pub mod sort_engine;

pub use filename_parser::{FilenameParser, LegacyParser, ParseError, ScreenshotMetadata, parse};
pub use main::ScreenshotSorter;
pub use path_router::{RoutedPath, route, sanitize_segment};
pub use sort_engine::{
    ARCHIVE_DIR_NAME, RunState, RunSummary, SortEngine, SortError, SortEvent, SortMode,
    SortOutcome, SortRequest,
};
