// src/constants.rs

// Window geometry floors - configured minimums are clamped to these,
// never rejected
pub const HARD_MIN_WIDTH: u32 = 340;
pub const HARD_MIN_HEIGHT: u32 = 185;

// Configuration defaults
pub const DEFAULT_MIN_WIDTH: u32 = 680;
pub const DEFAULT_MIN_HEIGHT: u32 = 370;
pub const DEFAULT_FONT: &str = "monospace 10";
pub const DEFAULT_OPACITY: f64 = 1.0;
pub const DEFAULT_CONFIG_PATH: &str = "termleek.toml";

pub const WINDOW_TITLE: &str = "TermLeek";

// Approximate monospace cell metrics used to derive a PTY grid size
// from a pixel allocation
pub const CELL_WIDTH_PX: u32 = 8;
pub const CELL_HEIGHT_PX: u32 = 16;

// OSC title payloads longer than this are discarded as garbage
pub const MAX_OSC_TITLE_LEN: usize = 2048;
