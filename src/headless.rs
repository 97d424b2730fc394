// src/headless.rs
//! Recording implementations of the capability traits, for tests and
//! display-less operation. Each one stores what was asked of it so
//! callers can assert on the exact sequence of surface and provider
//! interactions without a toolkit in the loop.

use crate::error::{ShellError, ShellResult};
use crate::events::Extent;
use crate::image::{ImageProvider, ScaledImage, SourceImage};
use crate::surface::WindowSurface;
use crate::terminal::TerminalHost;

use std::cell::Cell;
use std::path::{Path, PathBuf};

/// Window surface that records every call.
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    pub titles: Vec<String>,
    pub minimum: Option<Extent>,
    pub icon: Option<PathBuf>,
    pub background: Option<ScaledImage>,
    pub background_request: Option<Extent>,
    pub background_swaps: usize,
    pub terminal_request: Option<Extent>,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recently set title, if any.
    pub fn title(&self) -> Option<&str> {
        self.titles.last().map(String::as_str)
    }
}

impl WindowSurface for HeadlessSurface {
    fn set_title(&mut self, title: &str) {
        self.titles.push(title.to_string());
    }

    fn set_minimum_size(&mut self, extent: Extent) {
        self.minimum = Some(extent);
    }

    fn set_icon(&mut self, path: &Path) -> ShellResult<()> {
        self.icon = Some(path.to_path_buf());
        Ok(())
    }

    fn mount_background(&mut self, image: ScaledImage, request: Extent) {
        self.background = Some(image);
        self.background_request = Some(request);
    }

    fn swap_background(&mut self, image: ScaledImage) {
        self.background = Some(image);
        self.background_swaps += 1;
    }

    fn mount_terminal_view(&mut self, request: Extent) {
        self.terminal_request = Some(request);
    }

    fn resize_terminal_view(&mut self, extent: Extent) {
        self.terminal_request = Some(extent);
    }
}

/// Terminal host that records configuration and never starts a process.
#[derive(Debug, Default)]
pub struct HeadlessTerminalHost {
    pub spawned_shell: Option<String>,
    pub opacity: Option<f64>,
    pub font: Option<String>,
    pub resizes: Vec<Extent>,
    /// When set, `spawn` fails, for exercising the fatal path.
    pub fail_spawn: bool,
}

impl HeadlessTerminalHost {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TerminalHost for HeadlessTerminalHost {
    fn spawn(&mut self, shell: Option<&str>) -> ShellResult<()> {
        let program = shell.unwrap_or("<default>").to_string();
        if self.fail_spawn {
            return Err(ShellError::Spawn {
                program,
                message: "headless host configured to fail".to_string(),
            });
        }
        self.spawned_shell = Some(program);
        Ok(())
    }

    fn set_opacity(&mut self, opacity: f64) {
        self.opacity = Some(opacity);
    }

    fn set_font(&mut self, descriptor: &str) {
        self.font = Some(descriptor.to_string());
    }

    fn resize(&mut self, extent: Extent) {
        self.resizes.push(extent);
    }
}

/// Image provider that fabricates solid buffers in memory and counts
/// calls; no file I/O. The path is ignored beyond being recorded.
#[derive(Debug, Default)]
pub struct FlatImageProvider {
    pub loads: Cell<usize>,
    pub rescales: Cell<usize>,
    /// When set, `rescale` fails, for exercising the fatal path.
    pub fail_rescale: bool,
    /// Natural size reported for aspect-fit loads.
    pub natural: Option<Extent>,
}

impl FlatImageProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_natural_size(mut self, natural: Extent) -> Self {
        self.natural = Some(natural);
        self
    }

    fn flat_pixels(extent: Extent) -> Vec<u8> {
        vec![0x7f; (extent.width * extent.height * 4) as usize]
    }
}

impl ImageProvider for FlatImageProvider {
    fn load(
        &self,
        _path: &Path,
        target: Extent,
        preserve_aspect_ratio: bool,
    ) -> ShellResult<SourceImage> {
        self.loads.set(self.loads.get() + 1);
        let dims = match (preserve_aspect_ratio, self.natural) {
            (true, Some(natural)) => {
                let scale = f64::min(
                    target.width as f64 / natural.width as f64,
                    target.height as f64 / natural.height as f64,
                );
                Extent::new(
                    ((natural.width as f64 * scale).round() as u32).max(1),
                    ((natural.height as f64 * scale).round() as u32).max(1),
                )
            }
            _ => target,
        };
        Ok(SourceImage::from_rgba(
            dims.width,
            dims.height,
            Self::flat_pixels(dims),
        ))
    }

    fn rescale(&self, _source: &SourceImage, target: Extent) -> ShellResult<ScaledImage> {
        self.rescales.set(self.rescales.get() + 1);
        if self.fail_rescale {
            return Err(ShellError::Scale {
                width: target.width,
                height: target.height,
                message: "headless provider configured to fail".to_string(),
            });
        }
        Ok(ScaledImage::from_rgba(
            target.width,
            target.height,
            Self::flat_pixels(target),
        ))
    }
}
