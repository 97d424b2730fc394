// src/config.rs
//! Configuration loading and resolution.
//!
//! The on-disk format is a small TOML file with `[background]` and
//! `[terminal]` sections. Every key has a default, so an empty file (or
//! an empty section) is valid. Resolution clamps the configured minimum
//! window size to the hard floor and verifies that referenced files
//! actually exist; a missing file is fatal before any window work starts.

use crate::constants::{
    DEFAULT_FONT, DEFAULT_MIN_HEIGHT, DEFAULT_MIN_WIDTH, DEFAULT_OPACITY, HARD_MIN_HEIGHT,
    HARD_MIN_WIDTH,
};
use crate::error::{ShellError, ShellResult};

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawConfig {
    background: RawBackground,
    terminal: RawTerminal,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawBackground {
    source: String,
    preserve_aspect_ratio: bool,
}

impl Default for RawBackground {
    fn default() -> Self {
        Self {
            source: String::new(),
            preserve_aspect_ratio: false,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawTerminal {
    font: String,
    min_width: u32,
    min_height: u32,
    opacity: f64,
    icon: String,
}

impl Default for RawTerminal {
    fn default() -> Self {
        Self {
            font: DEFAULT_FONT.to_string(),
            min_width: DEFAULT_MIN_WIDTH,
            min_height: DEFAULT_MIN_HEIGHT,
            opacity: DEFAULT_OPACITY,
            icon: String::new(),
        }
    }
}

/// Resolved configuration, immutable after load.
#[derive(Debug, Clone)]
pub struct ShellConfig {
    pub background_source: Option<PathBuf>,
    pub preserve_aspect_ratio: bool,
    pub font: String,
    /// Clamped to at least `HARD_MIN_WIDTH`.
    pub min_width: u32,
    /// Clamped to at least `HARD_MIN_HEIGHT`.
    pub min_height: u32,
    /// Expected in [0.0, 1.0]; passed through unvalidated.
    pub opacity: f64,
    pub icon: Option<PathBuf>,
}

impl Default for ShellConfig {
    fn default() -> Self {
        RawConfig::default().resolve_paths_unchecked()
    }
}

impl RawConfig {
    /// Resolve without touching the filesystem. Used for defaults and
    /// builder-style test configs; `ShellConfig::load` validates paths
    /// on top of this.
    fn resolve_paths_unchecked(self) -> ShellConfig {
        ShellConfig {
            background_source: opt_path(&self.background.source),
            preserve_aspect_ratio: self.background.preserve_aspect_ratio,
            font: self.terminal.font,
            min_width: self.terminal.min_width.max(HARD_MIN_WIDTH),
            min_height: self.terminal.min_height.max(HARD_MIN_HEIGHT),
            opacity: self.terminal.opacity,
            icon: opt_path(&self.terminal.icon),
        }
    }
}

fn opt_path(raw: &str) -> Option<PathBuf> {
    if raw.is_empty() {
        None
    } else {
        Some(PathBuf::from(raw))
    }
}

impl ShellConfig {
    /// Load and resolve configuration from a TOML file.
    pub fn load(path: &Path) -> ShellResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| ShellError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let config = Self::parse(&text).map_err(|message| ShellError::Config {
            path: path.to_path_buf(),
            message,
        })?;
        config.validate_paths()?;
        debug!(
            "loaded configuration from {}: min {}x{}, background={:?}",
            path.display(),
            config.min_width,
            config.min_height,
            config.background_source
        );
        Ok(config)
    }

    /// Parse TOML text into a resolved (clamped) configuration.
    /// Does not validate referenced paths.
    pub fn parse(text: &str) -> Result<Self, String> {
        let raw: RawConfig = toml::from_str(text).map_err(|e| e.to_string())?;
        Ok(raw.resolve_paths_unchecked())
    }

    /// Verify that every referenced file exists. Missing files are
    /// fatal: there is no degraded mode without the asset the user
    /// asked for.
    pub fn validate_paths(&self) -> ShellResult<()> {
        for path in [&self.background_source, &self.icon].into_iter().flatten() {
            if !path.exists() {
                return Err(ShellError::MissingFile { path: path.clone() });
            }
        }
        Ok(())
    }

    pub fn with_background(mut self, source: &Path, preserve_aspect_ratio: bool) -> Self {
        self.background_source = Some(source.to_path_buf());
        self.preserve_aspect_ratio = preserve_aspect_ratio;
        self
    }

    pub fn with_min_size(mut self, width: u32, height: u32) -> Self {
        self.min_width = width.max(HARD_MIN_WIDTH);
        self.min_height = height.max(HARD_MIN_HEIGHT);
        self
    }

    pub fn with_font(mut self, descriptor: &str) -> Self {
        self.font = descriptor.to_string();
        self
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }
}
