//! 截圖整理引擎
//!
//! 依序處理來源資料夾中的截圖：解析、計算路徑、避免重名、移動或複製、
//! 選擇性加上浮水印，並逐檔回報結果。

use super::filename_parser::{FilenameParser, ParseError, ScreenshotMetadata};
use super::path_router::route;
use crate::config::{ParserScheme, WatermarkConfig};
use crate::tools::{
    ScreenshotFile, Watermark, copy_file, ensure_directory_exists, move_file, resolve_collision,
    scan_screenshot_files,
};
use log::{debug, info, warn};
use rayon::prelude::*;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// 來源資料夾下的備份資料夾名稱
pub const ARCHIVE_DIR_NAME: &str = "Archive";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortMode {
    /// 在來源資料夾內整理並備份到 `Archive`
    MoveAndArchive,
    /// 複製到另一個資料夾，來源保持不變
    CopyToDestination(PathBuf),
}

#[derive(Debug, Clone)]
pub struct SortRequest {
    pub source: PathBuf,
    pub mode: SortMode,
    pub watermark: WatermarkConfig,
    pub scheme: ParserScheme,
}

impl SortRequest {
    #[must_use]
    pub fn new(source: impl Into<PathBuf>, mode: SortMode) -> Self {
        Self {
            source: source.into(),
            mode,
            watermark: WatermarkConfig::default(),
            scheme: ParserScheme::default(),
        }
    }

    #[must_use]
    pub fn with_watermark(mut self, watermark: WatermarkConfig) -> Self {
        self.watermark = watermark;
        self
    }

    #[must_use]
    pub const fn with_scheme(mut self, scheme: ParserScheme) -> Self {
        self.scheme = scheme;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Validating,
    Running,
    Completed,
    Aborted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortOutcome {
    Moved,
    Copied,
    Skipped(String),
    /// 檔案已放到目標位置，但浮水印未套用
    WatermarkFailed(String),
}

impl SortOutcome {
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::Moved => "MOVED",
            Self::Copied => "COPIED",
            Self::Skipped(_) => "SKIPPED",
            Self::WatermarkFailed(_) => "WATERMARK FAILED",
        }
    }

    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Skipped(reason) | Self::WatermarkFailed(reason) => Some(reason),
            Self::Moved | Self::Copied => None,
        }
    }

    #[must_use]
    pub const fn is_placed(&self) -> bool {
        !matches!(self, Self::Skipped(_))
    }
}

/// 每個檔案處理完成後送出的事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortEvent {
    /// 從 1 開始的進度
    pub index: usize,
    pub total: usize,
    pub file_name: String,
    pub outcome: SortOutcome,
    /// 相對於輸出根目錄的路徑
    pub relative_path: Option<PathBuf>,
    /// 相對於來源資料夾的備份路徑（僅移動模式）
    pub archive_path: Option<PathBuf>,
}

impl fmt::Display for SortEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.outcome.tag(), self.file_name)?;
        if let Some(path) = &self.relative_path {
            write!(f, " → {}", path.display())?;
        }
        if let Some(reason) = self.outcome.reason() {
            write!(f, " – {reason}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub succeeded: usize,
    pub skipped: usize,
    /// 已放置但浮水印失敗的檔案，同時計入 `succeeded`
    pub watermark_failed: usize,
}

impl RunSummary {
    fn record(&mut self, outcome: &SortOutcome) {
        match outcome {
            SortOutcome::Moved | SortOutcome::Copied => self.succeeded += 1,
            SortOutcome::WatermarkFailed(_) => {
                self.succeeded += 1;
                self.watermark_failed += 1;
            }
            SortOutcome::Skipped(_) => self.skipped += 1,
        }
    }
}

#[derive(Debug, Error)]
pub enum SortError {
    #[error("Please select a valid Source Folder: {0}")]
    SourceNotFound(PathBuf),
    #[error("Please select a valid Destination Folder: {0}")]
    DestinationNotFound(PathBuf),
    #[error("File operation failed on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> SortError + '_ {
    move |source| SortError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// 單次執行時的浮水印狀態；無法載入時每個檔案都會回報失敗原因
enum WatermarkStage {
    Disabled,
    Ready(Watermark),
    Unavailable(String),
}

struct Placement {
    outcome: SortOutcome,
    relative_path: PathBuf,
    archive_path: Option<PathBuf>,
}

pub struct SortEngine {
    request: SortRequest,
    state: RunState,
}

impl SortEngine {
    #[must_use]
    pub const fn new(request: SortRequest) -> Self {
        Self {
            request,
            state: RunState::Idle,
        }
    }

    #[must_use]
    pub const fn state(&self) -> RunState {
        self.state
    }

    #[must_use]
    pub const fn request(&self) -> &SortRequest {
        &self.request
    }

    fn transition(&mut self, next: RunState) {
        debug!("狀態 {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    /// 執行整理，每處理完一個檔案呼叫一次 `on_event`
    ///
    /// 驗證失敗時不會動到任何檔案；移動或複製時的 I/O 錯誤會中止剩餘批次，
    /// 已處理的檔案保留在新位置。
    pub fn run<F>(&mut self, mut on_event: F) -> Result<RunSummary, SortError>
    where
        F: FnMut(&SortEvent),
    {
        self.transition(RunState::Validating);
        if let Err(e) = self.validate() {
            warn!("驗證失敗: {e}");
            self.transition(RunState::Aborted);
            return Err(e);
        }

        self.transition(RunState::Running);
        match self.run_batch(&mut on_event) {
            Ok(summary) => {
                self.transition(RunState::Completed);
                info!(
                    "整理完成 - 總數: {}, 成功: {}, 跳過: {}, 浮水印失敗: {}",
                    summary.total, summary.succeeded, summary.skipped, summary.watermark_failed
                );
                Ok(summary)
            }
            Err(e) => {
                warn!("整理中止: {e}");
                self.transition(RunState::Aborted);
                Err(e)
            }
        }
    }

    fn validate(&self) -> Result<(), SortError> {
        if !self.request.source.is_dir() {
            return Err(SortError::SourceNotFound(self.request.source.clone()));
        }
        if let SortMode::CopyToDestination(destination) = &self.request.mode
            && !destination.is_dir()
        {
            return Err(SortError::DestinationNotFound(destination.clone()));
        }
        Ok(())
    }

    fn output_root(&self) -> &Path {
        match &self.request.mode {
            SortMode::MoveAndArchive => &self.request.source,
            SortMode::CopyToDestination(destination) => destination,
        }
    }

    fn archive_dir(&self) -> Option<PathBuf> {
        match self.request.mode {
            SortMode::MoveAndArchive => Some(self.request.source.join(ARCHIVE_DIR_NAME)),
            SortMode::CopyToDestination(_) => None,
        }
    }

    fn run_batch<F>(&self, on_event: &mut F) -> Result<RunSummary, SortError>
    where
        F: FnMut(&SortEvent),
    {
        let source = &self.request.source;
        info!("開始掃描目錄: {}", source.display());
        let files = scan_screenshot_files(source).map_err(io_error(source))?;

        let total = files.len();
        let mut summary = RunSummary {
            total,
            ..RunSummary::default()
        };
        info!("找到 {total} 個截圖檔案");

        if let Some(archive_dir) = self.archive_dir() {
            ensure_directory_exists(&archive_dir).map_err(io_error(&archive_dir))?;
        }

        let parser = FilenameParser::for_batch(
            self.request.scheme,
            files.first().map(|f| f.file_name.as_str()),
        );

        // 解析只依賴檔名，可以平行處理；放置檔案仍依序進行
        let parsed: Vec<Result<ScreenshotMetadata, ParseError>> = files
            .par_iter()
            .map(|file| parser.parse(&file.file_name))
            .collect();

        let watermark = self.prepare_watermark();

        for (position, (file, metadata)) in files.iter().zip(parsed).enumerate() {
            let event = match metadata {
                Ok(metadata) => {
                    let placement = self.place(file, &metadata, &watermark)?;
                    SortEvent {
                        index: position + 1,
                        total,
                        file_name: file.file_name.clone(),
                        outcome: placement.outcome,
                        relative_path: Some(placement.relative_path),
                        archive_path: placement.archive_path,
                    }
                }
                Err(reason) => {
                    info!("跳過 {}: {reason}", file.file_name);
                    SortEvent {
                        index: position + 1,
                        total,
                        file_name: file.file_name.clone(),
                        outcome: SortOutcome::Skipped(reason.to_string()),
                        relative_path: None,
                        archive_path: None,
                    }
                }
            };

            summary.record(&event.outcome);
            on_event(&event);
        }

        Ok(summary)
    }

    fn prepare_watermark(&self) -> WatermarkStage {
        let Some(image_path) = self.request.watermark.active_image() else {
            return WatermarkStage::Disabled;
        };

        match Watermark::load(image_path) {
            Ok(watermark) => WatermarkStage::Ready(watermark),
            Err(e) => {
                warn!("無法載入浮水印: {e}");
                WatermarkStage::Unavailable(e.to_string())
            }
        }
    }

    fn place(
        &self,
        file: &ScreenshotFile,
        metadata: &ScreenshotMetadata,
        watermark: &WatermarkStage,
    ) -> Result<Placement, SortError> {
        let root = self.output_root();
        let routed = route(metadata);
        let target_dir = root.join(routed.relative_dir());
        ensure_directory_exists(&target_dir).map_err(io_error(&target_dir))?;

        let file_name = file
            .path
            .file_name()
            .map_or_else(|| file.file_name.clone().into(), |name| name.to_os_string());
        let destination = resolve_collision(&target_dir.join(&file_name));

        let mut outcome = match self.request.mode {
            SortMode::MoveAndArchive => {
                move_file(&file.path, &destination).map_err(io_error(&file.path))?;
                SortOutcome::Moved
            }
            SortMode::CopyToDestination(_) => {
                copy_file(&file.path, &destination).map_err(io_error(&file.path))?;
                SortOutcome::Copied
            }
        };
        debug!(
            "{} {} -> {}",
            outcome.tag(),
            file.path.display(),
            destination.display()
        );

        if let Some(reason) = self.apply_watermark(&destination, watermark) {
            warn!("浮水印失敗 {}: {reason}", destination.display());
            outcome = SortOutcome::WatermarkFailed(reason);
        }

        let archive_path = match self.archive_dir() {
            Some(archive_dir) => {
                let archive_name = destination.file_name().unwrap_or(&file_name);
                let archived = resolve_collision(&archive_dir.join(archive_name));
                copy_file(&destination, &archived).map_err(io_error(&destination))?;
                Some(relative_to(&archived, &self.request.source))
            }
            None => None,
        };

        Ok(Placement {
            outcome,
            relative_path: relative_to(&destination, root),
            archive_path,
        })
    }

    /// 失敗時回傳原因，檔案保留原本的像素內容
    fn apply_watermark(&self, destination: &Path, watermark: &WatermarkStage) -> Option<String> {
        match watermark {
            WatermarkStage::Disabled => None,
            WatermarkStage::Unavailable(reason) => Some(reason.clone()),
            WatermarkStage::Ready(mark) => mark
                .apply_to_file(
                    destination,
                    self.request.watermark.corner,
                    self.request.watermark.effective_opacity(),
                )
                .err()
                .map(|e| e.to_string()),
        }
    }
}

fn relative_to(path: &Path, root: &Path) -> PathBuf {
    path.strip_prefix(root)
        .map_or_else(|_| path.to_path_buf(), Path::to_path_buf)
}
