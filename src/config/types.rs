use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// 最近使用路徑的保留數量
pub const MAX_RECENT_PATHS: usize = 10;

/// 浮水印透明度的允許範圍與預設值（百分比）
pub const MIN_OPACITY_PERCENT: u8 = 5;
pub const MAX_OPACITY_PERCENT: u8 = 100;
pub const DEFAULT_OPACITY_PERCENT: u8 = 70;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Language {
    #[default]
    #[serde(rename = "en-US")]
    English,
    #[serde(rename = "zh-TW")]
    TraditionalChinese,
}

impl Language {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::English => "en-US",
            Self::TraditionalChinese => "zh-TW",
        }
    }

    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::English => "English",
            Self::TraditionalChinese => "繁體中文",
        }
    }
}

/// 執行模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ModeKind {
    /// 在來源資料夾內移動並備份到 Archive
    #[default]
    MoveArchive,
    /// 複製到目的資料夾，來源不變
    Copy,
}

impl fmt::Display for ModeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MoveArchive => write!(f, "move-archive"),
            Self::Copy => write!(f, "copy"),
        }
    }
}

/// 檔名解析方案
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ParserScheme {
    #[default]
    Primary,
    /// 舊版以位置切割的命名方式，日期取自批次中第一個檔案
    Legacy,
}

impl fmt::Display for ParserScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary => write!(f, "primary"),
            Self::Legacy => write!(f, "legacy"),
        }
    }
}

/// 浮水印放置的角落
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    #[default]
    BottomRight,
}

impl Corner {
    #[must_use]
    pub const fn all() -> [Self; 4] {
        [
            Self::TopLeft,
            Self::TopRight,
            Self::BottomLeft,
            Self::BottomRight,
        ]
    }
}

impl fmt::Display for Corner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::TopLeft => "top-left",
            Self::TopRight => "top-right",
            Self::BottomLeft => "bottom-left",
            Self::BottomRight => "bottom-right",
        };
        write!(f, "{name}")
    }
}

/// 浮水印設定，在一次執行期間對核心為唯讀
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatermarkConfig {
    pub enabled: bool,
    pub image_path: Option<PathBuf>,
    pub corner: Corner,
    pub opacity_percent: u8,
}

impl Default for WatermarkConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            image_path: None,
            corner: Corner::default(),
            opacity_percent: DEFAULT_OPACITY_PERCENT,
        }
    }
}

impl WatermarkConfig {
    /// 夾在 [5, 100] 之間的透明度
    #[must_use]
    pub fn effective_opacity(&self) -> u8 {
        clamp_opacity(self.opacity_percent)
    }

    /// 啟用且有指定圖片時才回傳圖片路徑
    #[must_use]
    pub fn active_image(&self) -> Option<&PathBuf> {
        if self.enabled {
            self.image_path.as_ref()
        } else {
            None
        }
    }
}

#[must_use]
pub fn clamp_opacity(value: u8) -> u8 {
    value.clamp(MIN_OPACITY_PERCENT, MAX_OPACITY_PERCENT)
}

/// 解析使用者輸入的透明度；非數字時使用預設值 70
#[must_use]
pub fn parse_opacity(input: &str) -> u8 {
    input
        .trim()
        .parse::<i64>()
        .map_or(DEFAULT_OPACITY_PERCENT, |value| {
            value.clamp(
                i64::from(MIN_OPACITY_PERCENT),
                i64::from(MAX_OPACITY_PERCENT),
            ) as u8
        })
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    pub language: Language,
    pub recent_paths: Vec<String>,
    pub recent_destinations: Vec<String>,
    pub last_mode: ModeKind,
    pub parser_scheme: ParserScheme,
    pub watermark: WatermarkConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub settings: UserSettings,
}
