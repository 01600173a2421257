pub mod load;
pub mod save;
pub mod types;

pub use types::{
    Config, Corner, DEFAULT_OPACITY_PERCENT, Language, MAX_OPACITY_PERCENT, MAX_RECENT_PATHS,
    MIN_OPACITY_PERCENT, ModeKind, ParserScheme, UserSettings, WatermarkConfig, clamp_opacity,
    parse_opacity,
};
