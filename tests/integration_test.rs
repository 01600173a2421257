//! 整合測試 - 驗證解析、路徑與重名處理的組合行為

use std::fs;
use std::path::Path;

use screenshot_sorter::component::screenshot_sorter::{
    ParseError, SortEngine, SortMode, SortOutcome, SortRequest, parse, route,
};
use screenshot_sorter::config::{Corner, WatermarkConfig};
use screenshot_sorter::tools::{resolve_collision, scan_screenshot_files};
use tempfile::TempDir;

/// 測試 1: 解析後的路徑是反轉的日期加上區域、角色
#[test]
fn test_parse_then_route() {
    let cases = [
        (
            "2024-03-07_18-22-01.123-Limsa Lominsa-Warrior of Light.png",
            "07-03-2024/Limsa Lominsa/Warrior of Light",
        ),
        (
            "2024-01-02_09-00-00.000-The Ruby Sea-Aymeric.jpg",
            "02-01-2024/The Ruby Sea/Aymeric",
        ),
        (
            "1999-12-31_00-00-00.000-Old Sharlayan-G'raha Tia.JPEG",
            "31-12-1999/Old Sharlayan/G'raha Tia",
        ),
    ];

    for (filename, expected) in cases {
        let routed = route(&parse(filename).unwrap());
        assert_eq!(routed.to_string(), expected, "{filename}");
    }
}

/// 測試 2: 不符合規則的檔案被跳過，且沒有寫入任何檔案
#[test]
fn test_unrecognized_files_cause_no_writes() {
    let temp_dir = TempDir::new().unwrap();
    let source = temp_dir.path().join("src");
    let destination = temp_dir.path().join("dst");
    fs::create_dir_all(&source).unwrap();
    fs::create_dir_all(&destination).unwrap();

    let names = [
        "screenshot.png",
        "2024-03-07_18-22-01.123-Limsa.png",
        "2024-03-07 18-22-01.123-Limsa-Warrior.png",
        "2024-03-07_18-22-01.123--Warrior.png",
    ];
    for name in names {
        fs::write(source.join(name), "x").unwrap();
    }

    let request = SortRequest::new(&source, SortMode::CopyToDestination(destination.clone()));
    let mut events = Vec::new();
    let summary = SortEngine::new(request)
        .run(|event| events.push(event.clone()))
        .unwrap();

    assert_eq!(summary.total, names.len());
    assert_eq!(summary.skipped, names.len());
    assert_eq!(summary.succeeded, 0);
    assert!(
        events
            .iter()
            .all(|e| matches!(e.outcome, SortOutcome::Skipped(_)))
    );
    assert_eq!(fs::read_dir(&destination).unwrap().count(), 0);
}

/// 測試 3: 重名處理在連續放入時保持唯一
#[test]
fn test_collision_resolution_sequence() {
    let temp_dir = TempDir::new().unwrap();
    let candidate = temp_dir.path().join("shot.png");

    let mut placed = Vec::new();
    for _ in 0..5 {
        let path = resolve_collision(&candidate);
        assert!(!path.exists());
        fs::write(&path, "x").unwrap();
        placed.push(path.file_name().unwrap().to_string_lossy().into_owned());
    }

    assert_eq!(
        placed,
        vec![
            "shot.png",
            "shot (1).png",
            "shot (2).png",
            "shot (3).png",
            "shot (4).png"
        ]
    );
}

/// 測試 4: 同名檔案複製兩次時不覆蓋
#[test]
fn test_copy_twice_keeps_both() {
    let temp_dir = TempDir::new().unwrap();
    let source = temp_dir.path().join("src");
    let destination = temp_dir.path().join("dst");
    fs::create_dir_all(&source).unwrap();
    fs::create_dir_all(&destination).unwrap();

    let name = "2024-01-02_09-00-00.000-The Ruby Sea-Aymeric.jpg";
    fs::write(source.join(name), "x").unwrap();

    for _ in 0..2 {
        let request = SortRequest::new(&source, SortMode::CopyToDestination(destination.clone()));
        SortEngine::new(request).run(|_| {}).unwrap();
    }

    let target = destination.join("02-01-2024/The Ruby Sea/Aymeric");
    let mut files: Vec<String> = fs::read_dir(&target)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    files.sort();

    assert_eq!(
        files,
        vec![
            "2024-01-02_09-00-00.000-The Ruby Sea-Aymeric (1).jpg".to_string(),
            name.to_string()
        ]
    );
    assert!(source.join(name).exists());
}

/// 測試 5: 已整理的資料夾不會被再次掃描
#[test]
fn test_rerun_move_mode_is_idempotent() {
    let temp_dir = TempDir::new().unwrap();
    let source = temp_dir.path();
    let name = "2024-01-02_09-00-00.000-The Ruby Sea-Aymeric.jpg";
    fs::write(source.join(name), "x").unwrap();

    let first = SortEngine::new(SortRequest::new(source, SortMode::MoveAndArchive))
        .run(|_| {})
        .unwrap();
    let second = SortEngine::new(SortRequest::new(source, SortMode::MoveAndArchive))
        .run(|_| {})
        .unwrap();

    assert_eq!(first.succeeded, 1);
    assert_eq!(second.total, 0);
    assert!(scan_screenshot_files(source).unwrap().is_empty());
    assert_eq!(fs::read_dir(source.join("Archive")).unwrap().count(), 1);
}

/// 測試 6: 路徑中不安全的字元被清理
#[cfg(unix)]
#[test]
fn test_unsafe_zone_is_sanitized() {
    let temp_dir = TempDir::new().unwrap();
    let source = temp_dir.path();
    let name = "2024-01-02_09-00-00.000-Zone: Alpha?-..png";
    fs::write(source.join(name), "x").unwrap();

    let mut events = Vec::new();
    SortEngine::new(SortRequest::new(source, SortMode::MoveAndArchive))
        .run(|event| events.push(event.clone()))
        .unwrap();

    assert_eq!(events[0].outcome, SortOutcome::Moved);
    assert!(source.join("02-01-2024/Zone Alpha/Unknown").join(name).exists());
}

/// 測試 7: 不合法的日期視為無法辨識
#[test]
fn test_invalid_date_is_skipped() {
    assert!(matches!(
        parse("2024-02-30_09-00-00.000-Kugane-Hien.png"),
        Err(ParseError::InvalidDate(_))
    ));
}

/// 測試 8: 停用浮水印時即使設定了圖片也不處理
#[test]
fn test_disabled_watermark_is_ignored() {
    let temp_dir = TempDir::new().unwrap();
    let source = temp_dir.path();
    let name = "2024-01-02_09-00-00.000-The Ruby Sea-Aymeric.jpg";
    fs::write(source.join(name), "not really a jpeg").unwrap();

    let watermark = WatermarkConfig {
        enabled: false,
        image_path: Some(Path::new("does-not-exist.png").to_path_buf()),
        corner: Corner::TopRight,
        opacity_percent: 70,
    };
    let request = SortRequest::new(source, SortMode::MoveAndArchive).with_watermark(watermark);

    let mut events = Vec::new();
    let summary = SortEngine::new(request)
        .run(|event| events.push(event.clone()))
        .unwrap();

    assert_eq!(events[0].outcome, SortOutcome::Moved);
    assert_eq!(summary.watermark_failed, 0);
}
