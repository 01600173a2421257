//! 截圖檔名解析模組
//!
//! 從檔名取出拍攝日期、區域與角色名稱，不讀取檔案內容

use crate::config::ParserScheme;
use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

/// `YYYY-MM-DD_HH-MM-SS.mmm-<zone>-<character>.<ext>`
///
/// 區域為貪婪匹配，可以包含 `-`；角色為最後一段，不可包含 `-`。
static REGEX_SCREENSHOT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(\d{4}-\d{2}-\d{2})_\d{2}-\d{2}-\d{2}\.\d{3}-(.+)-([^-]+)\.(?:png|jpg|jpeg)$")
        .expect("Invalid regex")
});

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Filename does not match the expected pattern")]
    PatternMismatch,
    #[error("Capture date is not a valid calendar date: {0}")]
    InvalidDate(String),
    #[error("Filename has an empty {0} field")]
    EmptyField(&'static str),
    #[error("Filename does not have the legacy segment layout")]
    LegacyLayout,
    #[error("Cannot derive the batch date from the first file: {0}")]
    MissingBatchDate(String),
}

/// 解析成功的截圖資訊
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenshotMetadata {
    pub capture_date: NaiveDate,
    pub zone: String,
    pub character: String,
}

impl ScreenshotMetadata {
    fn from_fields(date: &str, zone: &str, character: &str) -> Result<Self, ParseError> {
        let date = date.trim();
        let capture_date = NaiveDate::parse_from_str(date, DATE_FORMAT)
            .map_err(|_| ParseError::InvalidDate(date.to_string()))?;

        let zone = zone.trim();
        if zone.is_empty() {
            return Err(ParseError::EmptyField("zone"));
        }
        let character = character.trim();
        if character.is_empty() {
            return Err(ParseError::EmptyField("character"));
        }

        Ok(Self {
            capture_date,
            zone: zone.to_string(),
            character: character.to_string(),
        })
    }
}

/// 以主要命名規則解析
pub fn parse(filename: &str) -> Result<ScreenshotMetadata, ParseError> {
    let captures = REGEX_SCREENSHOT
        .captures(filename)
        .ok_or(ParseError::PatternMismatch)?;

    ScreenshotMetadata::from_fields(&captures[1], &captures[2], &captures[3])
}

/// 舊版命名規則
///
/// 日期只取自批次中第一個檔案 `_` 之前的部分；其餘檔名以 `-` 切成
/// 時、分、秒、區域，之後全部視為角色名稱。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyParser {
    batch_date: String,
}

impl LegacyParser {
    pub fn from_first_file(filename: &str) -> Result<Self, ParseError> {
        let token = filename
            .split_once('_')
            .map(|(date, _)| date)
            .ok_or_else(|| ParseError::MissingBatchDate(filename.to_string()))?;

        NaiveDate::parse_from_str(token.trim(), DATE_FORMAT)
            .map_err(|_| ParseError::MissingBatchDate(filename.to_string()))?;

        Ok(Self {
            batch_date: token.trim().to_string(),
        })
    }

    pub fn parse(&self, filename: &str) -> Result<ScreenshotMetadata, ParseError> {
        let stem = filename
            .rsplit_once('.')
            .map_or(filename, |(stem, _)| stem);
        let (_, rest) = stem.split_once('_').ok_or(ParseError::LegacyLayout)?;

        let segments: Vec<&str> = rest.splitn(5, '-').collect();
        let [_, _, _, zone, character] = segments.as_slice() else {
            return Err(ParseError::LegacyLayout);
        };

        ScreenshotMetadata::from_fields(&self.batch_date, zone, character)
    }
}

/// 一次執行中使用的解析器，兩種規則不會同時啟用
#[derive(Debug, Clone)]
pub enum FilenameParser {
    Primary,
    Legacy(Result<LegacyParser, ParseError>),
}

impl FilenameParser {
    /// 建立批次解析器；舊版規則需要批次中的第一個檔名
    #[must_use]
    pub fn for_batch(scheme: ParserScheme, first_filename: Option<&str>) -> Self {
        match scheme {
            ParserScheme::Primary => Self::Primary,
            ParserScheme::Legacy => Self::Legacy(
                first_filename
                    .ok_or_else(|| ParseError::MissingBatchDate(String::new()))
                    .and_then(LegacyParser::from_first_file),
            ),
        }
    }

    pub fn parse(&self, filename: &str) -> Result<ScreenshotMetadata, ParseError> {
        match self {
            Self::Primary => parse(filename),
            Self::Legacy(Ok(parser)) => parser.parse(filename),
            Self::Legacy(Err(e)) => Err(e.clone()),
        }
    }
}
