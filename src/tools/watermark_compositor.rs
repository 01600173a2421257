//! 浮水印合成
//!
//! 將半透明浮水印貼到截圖的指定角落，並寫回原檔案（路徑與副檔名不變）

use crate::config::{Corner, clamp_opacity};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageError, ImageFormat, ImageReader, RgbaImage};
use log::debug;
use std::fs;
use std::io::{self, Cursor, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

/// 浮水印與邊緣的固定距離（像素）
pub const MARGIN: u32 = 10;
/// 無 alpha 格式的輸出品質
pub const JPEG_QUALITY: u8 = 95;

#[derive(Debug, Error)]
pub enum WatermarkError {
    #[error("Cannot load screenshot {path}: {source}")]
    LoadBase {
        path: PathBuf,
        #[source]
        source: ImageError,
    },
    #[error("Cannot load watermark image {path}: {source}")]
    LoadWatermark {
        path: PathBuf,
        #[source]
        source: ImageError,
    },
    #[error("Cannot encode {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: ImageError,
    },
    #[error("Cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// 已裁切透明邊框的浮水印
#[derive(Debug, Clone)]
pub struct Watermark {
    image: RgbaImage,
}

impl Watermark {
    pub fn load(path: &Path) -> Result<Self, WatermarkError> {
        let image = load_rgba(path).map_err(|source| WatermarkError::LoadWatermark {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_image(image))
    }

    /// 去除四周完全透明的像素，讓浮水印貼齊角落
    #[must_use]
    pub fn from_image(image: RgbaImage) -> Self {
        let image = match alpha_bounding_box(&image) {
            Some((x, y, width, height)) => imageops::crop_imm(&image, x, y, width, height).to_image(),
            None => image,
        };
        Self { image }
    }

    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// 在記憶體中將浮水印合成到底圖上
    pub fn blend_onto(&self, base: &mut RgbaImage, corner: Corner, opacity_percent: u8) {
        let (base_width, base_height) = base.dimensions();
        let (mark_width, mark_height) = scaled_size(base_width, self.image.dimensions());

        let mut mark = imageops::resize(&self.image, mark_width, mark_height, FilterType::Lanczos3);
        scale_alpha(&mut mark, clamp_opacity(opacity_percent));

        let (x, y) = placement_offset(
            corner,
            (base_width, base_height),
            (mark_width, mark_height),
        );
        debug!("浮水印 {mark_width}x{mark_height} 放置於 ({x}, {y})");

        imageops::overlay(base, &mark, x, y);
    }

    /// 讀取截圖、合成浮水印後寫回同一路徑
    ///
    /// 任何一步失敗時原檔案內容不會被修改。
    pub fn apply_to_file(
        &self,
        base_path: &Path,
        corner: Corner,
        opacity_percent: u8,
    ) -> Result<(), WatermarkError> {
        let mut base = load_rgba(base_path).map_err(|source| WatermarkError::LoadBase {
            path: base_path.to_path_buf(),
            source,
        })?;

        self.blend_onto(&mut base, corner, opacity_percent);

        let bytes = encode_for_path(base, base_path).map_err(|source| WatermarkError::Encode {
            path: base_path.to_path_buf(),
            source,
        })?;

        replace_file(base_path, &bytes).map_err(|source| WatermarkError::Write {
            path: base_path.to_path_buf(),
            source,
        })
    }
}

/// 先寫入同資料夾的暫存檔，再以 rename 取代目標
///
/// 寫入中途失敗時暫存檔會被刪除，目標檔案保持原樣。
fn replace_file(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut temp = NamedTempFile::new_in(parent)?;
    temp.write_all(bytes)?;
    temp.as_file().sync_all()?;

    // 暫存檔預設權限為 0600，沿用原檔案的權限
    if let Ok(metadata) = fs::metadata(path) {
        fs::set_permissions(temp.path(), metadata.permissions())?;
    }

    temp.persist(path).map(|_| ()).map_err(|e| e.error)
}

/// 單次合成：載入浮水印並套用到 `base_path`
pub fn composite(
    base_path: &Path,
    watermark_path: &Path,
    corner: Corner,
    opacity_percent: u8,
) -> Result<(), WatermarkError> {
    Watermark::load(watermark_path)?.apply_to_file(base_path, corner, opacity_percent)
}

fn load_rgba(path: &Path) -> Result<RgbaImage, ImageError> {
    let image = ImageReader::open(path)?.with_guessed_format()?.decode()?;
    Ok(image.to_rgba8())
}

/// 非完全透明像素的最小外框 `(x, y, width, height)`
fn alpha_bounding_box(image: &RgbaImage) -> Option<(u32, u32, u32, u32)> {
    let mut bounds: Option<(u32, u32, u32, u32)> = None;

    for (x, y, pixel) in image.enumerate_pixels() {
        if pixel.0[3] == 0 {
            continue;
        }
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((min_x, min_y, max_x, max_y)) => {
                (min_x.min(x), min_y.min(y), max_x.max(x), max_y.max(y))
            }
        });
    }

    bounds.map(|(min_x, min_y, max_x, max_y)| (min_x, min_y, max_x - min_x + 1, max_y - min_y + 1))
}

/// 浮水印寬度為底圖寬度的三分之一，維持長寬比，最小 1 像素
#[must_use]
pub fn scaled_size(base_width: u32, (mark_width, mark_height): (u32, u32)) -> (u32, u32) {
    let width = (base_width / 3).max(1);
    let ratio = f64::from(mark_height) / f64::from(mark_width.max(1));
    let height = (f64::from(width) * ratio).round().max(1.0) as u32;
    (width, height)
}

#[must_use]
pub fn placement_offset(
    corner: Corner,
    (base_width, base_height): (u32, u32),
    (mark_width, mark_height): (u32, u32),
) -> (i64, i64) {
    let margin = i64::from(MARGIN);
    let right = i64::from(base_width) - i64::from(mark_width) - margin;
    let bottom = i64::from(base_height) - i64::from(mark_height) - margin;

    match corner {
        Corner::TopLeft => (margin, margin),
        Corner::TopRight => (right, margin),
        Corner::BottomLeft => (margin, bottom),
        Corner::BottomRight => (right, bottom),
    }
}

fn scale_alpha(image: &mut RgbaImage, opacity_percent: u8) {
    let factor = f32::from(opacity_percent) / 100.0;
    for pixel in image.pixels_mut() {
        pixel.0[3] = (f32::from(pixel.0[3]) * factor).round() as u8;
    }
}

fn is_opaque_format(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("jpeg"))
}

fn encode_for_path(image: RgbaImage, path: &Path) -> Result<Vec<u8>, ImageError> {
    let mut buffer = Cursor::new(Vec::new());

    if is_opaque_format(path) {
        let rgb = DynamicImage::ImageRgba8(image).to_rgb8();
        let mut encoder = JpegEncoder::new_with_quality(&mut buffer, JPEG_QUALITY);
        encoder.encode_image(&rgb)?;
    } else {
        let format = ImageFormat::from_path(path).unwrap_or(ImageFormat::Png);
        image.write_to(&mut buffer, format)?;
    }

    Ok(buffer.into_inner())
}
