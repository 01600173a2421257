mod collision_resolver;
mod file_scanner;
mod file_tools;
mod path_validator;
mod watermark_compositor;

pub use collision_resolver::resolve_collision;
pub use file_scanner::{
    SCREENSHOT_EXTENSIONS, ScreenshotFile, is_supported_image, scan_screenshot_files,
};
pub use file_tools::{copy_file, move_file};
pub use path_validator::{ensure_directory_exists, validate_directory_exists};
pub use watermark_compositor::{
    JPEG_QUALITY, MARGIN, Watermark, WatermarkError, composite, placement_offset, scaled_size,
};
