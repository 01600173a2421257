//! 目標路徑計算
//!
//! 由截圖資訊產生 `dd-mm-yyyy/區域/角色` 三層資料夾

use super::filename_parser::ScreenshotMetadata;
use regex::Regex;
use std::fmt;
use std::path::PathBuf;
use std::sync::LazyLock;

static REGEX_UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[<>:"/\\|?*\x00-\x1F\x7F]"#).expect("Invalid regex"));

static REGEX_MULTIPLE_SPACES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Invalid regex"));

/// 清理後為空時使用的資料夾名稱
pub const FALLBACK_SEGMENT: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutedPath {
    pub date_folder: String,
    pub zone: String,
    pub character: String,
}

impl RoutedPath {
    #[must_use]
    pub fn relative_dir(&self) -> PathBuf {
        [&self.date_folder, &self.zone, &self.character]
            .iter()
            .collect()
    }
}

impl fmt::Display for RoutedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.date_folder, self.zone, self.character)
    }
}

#[must_use]
pub fn route(metadata: &ScreenshotMetadata) -> RoutedPath {
    RoutedPath {
        date_folder: metadata.capture_date.format("%d-%m-%Y").to_string(),
        zone: sanitize_segment(&metadata.zone),
        character: sanitize_segment(&metadata.character),
    }
}

/// 將區域或角色名稱轉為安全的單一路徑片段
///
/// 不合法字元換成空白，連續空白合併，去除前後的空白與點。
#[must_use]
pub fn sanitize_segment(raw: &str) -> String {
    let replaced = REGEX_UNSAFE_CHARS.replace_all(raw, " ");
    let collapsed = REGEX_MULTIPLE_SPACES.replace_all(&replaced, " ");
    let trimmed = collapsed.trim_matches(|c: char| c == ' ' || c == '.');

    if trimmed.is_empty() {
        FALLBACK_SEGMENT.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::screenshot_sorter::filename_parser::parse;
    use chrono::NaiveDate;
    use std::path::Path;

    fn metadata(zone: &str, character: &str) -> ScreenshotMetadata {
        ScreenshotMetadata {
            capture_date: NaiveDate::from_ymd_opt(2024, 3, 7).unwrap(),
            zone: zone.to_string(),
            character: character.to_string(),
        }
    }

    #[test]
    fn test_route_reverses_date() {
        let meta = parse("2024-03-07_18-22-01.123-Limsa Lominsa-Warrior of Light.png").unwrap();
        let routed = route(&meta);

        assert_eq!(routed.date_folder, "07-03-2024");
        assert_eq!(
            routed.relative_dir(),
            Path::new("07-03-2024")
                .join("Limsa Lominsa")
                .join("Warrior of Light")
        );
        assert_eq!(routed.to_string(), "07-03-2024/Limsa Lominsa/Warrior of Light");
    }

    #[test]
    fn test_route_keeps_safe_names_verbatim() {
        let routed = route(&metadata("Ul'dah - Steps of Nald", "Y'shtola Rhul"));
        assert_eq!(routed.zone, "Ul'dah - Steps of Nald");
        assert_eq!(routed.character, "Y'shtola Rhul");
    }

    #[test]
    fn test_sanitize_unsafe_characters() {
        assert_eq!(sanitize_segment("Zone: The <Rising> Stones?"), "Zone The Rising Stones");
        assert_eq!(sanitize_segment("a/b\\c"), "a b c");
        assert_eq!(sanitize_segment("tab\there"), "tab here");
    }

    #[test]
    fn test_sanitize_dot_segments() {
        assert_eq!(sanitize_segment(".."), FALLBACK_SEGMENT);
        assert_eq!(sanitize_segment("."), FALLBACK_SEGMENT);
        assert_eq!(sanitize_segment("Name."), "Name");
        assert_eq!(sanitize_segment("???"), FALLBACK_SEGMENT);
    }

    #[test]
    fn test_route_is_deterministic() {
        let meta = metadata("Kugane", "Hien");
        assert_eq!(route(&meta), route(&meta));
    }
}
