// src/compositor.rs
//! Window compositor - owns window geometry policy and keeps the
//! displayed background in sync with the window allocation.
//!
//! Construction builds the whole widget arrangement: window floor size,
//! title, icon, the optional background image and the terminal view,
//! and starts the shell. Afterwards the compositor is driven purely by
//! events: resize allocations and title reports, one at a time.

use crate::config::ShellConfig;
use crate::constants::WINDOW_TITLE;
use crate::error::ShellResult;
use crate::events::Extent;
use crate::image::{ImageProvider, SourceImage};
use crate::surface::WindowSurface;
use crate::terminal::TerminalHost;

use tracing::{debug, info};

pub struct WindowCompositor<S, I, T>
where
    S: WindowSurface,
    I: ImageProvider,
    T: TerminalHost,
{
    surface: S,
    images: I,
    terminal: T,
    /// Decoded once at startup; the single source of truth for rescales.
    source: Option<SourceImage>,
    /// Dimensions of the image currently on screen.
    displayed: Option<Extent>,
}

impl<S, I, T> WindowCompositor<S, I, T>
where
    S: WindowSurface,
    I: ImageProvider,
    T: TerminalHost,
{
    /// Build the window arrangement and start the terminal session.
    pub fn new(config: &ShellConfig, mut surface: S, images: I, mut terminal: T) -> ShellResult<Self> {
        let floor = Extent::new(config.min_width, config.min_height);

        surface.set_title(WINDOW_TITLE);
        surface.set_minimum_size(floor);
        if let Some(icon) = &config.icon {
            surface.set_icon(icon)?;
        }

        terminal.set_font(&config.font);
        terminal.set_opacity(config.opacity);
        terminal.spawn(None)?;

        let (source, displayed) = match &config.background_source {
            Some(path) => {
                let source = images.load(path, floor, config.preserve_aspect_ratio)?;
                let initial = source.to_displayed();
                let dims = initial.extent();
                // Background goes in first so the terminal view sits on top.
                surface.mount_background(initial, floor);
                info!("background mounted at {}", dims);
                (Some(source), Some(dims))
            }
            None => (None, None),
        };
        surface.mount_terminal_view(floor);

        Ok(Self {
            surface,
            images,
            terminal,
            source,
            displayed,
        })
    }

    /// React to a new window allocation. Without a background this does
    /// nothing; with one, any allocation differing from the displayed
    /// image in either dimension triggers a full rescale from the
    /// source, and the terminal view tracks the same allocation.
    pub fn handle_resize(&mut self, allocation: Extent) -> ShellResult<()> {
        let Some(source) = &self.source else {
            return Ok(());
        };
        if self.displayed == Some(allocation) {
            return Ok(());
        }

        debug!(
            "allocation {} differs from displayed {:?}, rescaling",
            allocation, self.displayed
        );
        let scaled = self.images.rescale(source, allocation)?;
        self.surface.swap_background(scaled);
        self.surface.resize_terminal_view(allocation);
        self.terminal.resize(allocation);
        self.displayed = Some(allocation);
        Ok(())
    }

    /// Propagate a reported title to the window, verbatim.
    pub fn set_title(&mut self, title: &str) {
        self.surface.set_title(title);
    }

    pub fn displayed_extent(&self) -> Option<Extent> {
        self.displayed
    }

    pub fn has_background(&self) -> bool {
        self.source.is_some()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn terminal(&self) -> &T {
        &self.terminal
    }

    pub fn images(&self) -> &I {
        &self.images
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ShellConfig;
    use crate::headless::{FlatImageProvider, HeadlessSurface, HeadlessTerminalHost};
    use std::path::Path;

    fn compositor_with_background(
    ) -> WindowCompositor<HeadlessSurface, FlatImageProvider, HeadlessTerminalHost> {
        let config = ShellConfig::default().with_background(Path::new("bg.png"), false);
        WindowCompositor::new(
            &config,
            HeadlessSurface::new(),
            FlatImageProvider::new(),
            HeadlessTerminalHost::new(),
        )
        .unwrap()
    }

    #[test]
    fn construction_applies_window_policy() {
        let config = ShellConfig::default()
            .with_font("monospace 12")
            .with_opacity(0.8);
        let compositor = WindowCompositor::new(
            &config,
            HeadlessSurface::new(),
            FlatImageProvider::new(),
            HeadlessTerminalHost::new(),
        )
        .unwrap();

        assert_eq!(compositor.surface().title(), Some(WINDOW_TITLE));
        assert_eq!(compositor.surface().minimum, Some(Extent::new(680, 370)));
        assert_eq!(compositor.terminal().font.as_deref(), Some("monospace 12"));
        assert_eq!(compositor.terminal().opacity, Some(0.8));
        assert!(compositor.terminal().spawned_shell.is_some());
    }

    #[test]
    fn no_background_mounts_terminal_only() {
        let config = ShellConfig::default();
        let compositor = WindowCompositor::new(
            &config,
            HeadlessSurface::new(),
            FlatImageProvider::new(),
            HeadlessTerminalHost::new(),
        )
        .unwrap();

        assert!(!compositor.has_background());
        assert!(compositor.surface().background.is_none());
        assert_eq!(
            compositor.surface().terminal_request,
            Some(Extent::new(680, 370))
        );
        assert_eq!(compositor.images().loads.get(), 0);
    }

    #[test]
    fn background_is_loaded_once_at_floor_size() {
        let compositor = compositor_with_background();
        assert_eq!(compositor.images().loads.get(), 1);
        assert_eq!(compositor.displayed_extent(), Some(Extent::new(680, 370)));
        assert_eq!(
            compositor.surface().background_request,
            Some(Extent::new(680, 370))
        );
    }

    #[test]
    fn resize_without_background_never_touches_provider() {
        let config = ShellConfig::default();
        let mut compositor = WindowCompositor::new(
            &config,
            HeadlessSurface::new(),
            FlatImageProvider::new(),
            HeadlessTerminalHost::new(),
        )
        .unwrap();

        for extent in [Extent::new(800, 600), Extent::new(1024, 768)] {
            compositor.handle_resize(extent).unwrap();
        }
        assert_eq!(compositor.images().loads.get(), 0);
        assert_eq!(compositor.images().rescales.get(), 0);
    }

    #[test]
    fn resize_rescales_to_exact_allocation() {
        let mut compositor = compositor_with_background();
        compositor.handle_resize(Extent::new(800, 400)).unwrap();

        assert_eq!(compositor.displayed_extent(), Some(Extent::new(800, 400)));
        let surface = compositor.surface();
        assert_eq!(
            surface.background.as_ref().unwrap().extent(),
            Extent::new(800, 400)
        );
        assert_eq!(surface.terminal_request, Some(Extent::new(800, 400)));
        assert_eq!(surface.background_swaps, 1);
        assert_eq!(compositor.terminal().resizes, vec![Extent::new(800, 400)]);
    }

    #[test]
    fn repeated_allocation_is_idempotent() {
        let mut compositor = compositor_with_background();
        compositor.handle_resize(Extent::new(800, 400)).unwrap();
        compositor.handle_resize(Extent::new(800, 400)).unwrap();

        assert_eq!(compositor.images().rescales.get(), 1);
        assert_eq!(compositor.surface().background_swaps, 1);
    }

    #[test]
    fn single_axis_change_rescales_both_dimensions() {
        let mut compositor = compositor_with_background();
        compositor.handle_resize(Extent::new(800, 400)).unwrap();
        compositor.handle_resize(Extent::new(800, 500)).unwrap();

        assert_eq!(compositor.displayed_extent(), Some(Extent::new(800, 500)));
        assert_eq!(compositor.images().rescales.get(), 2);
    }

    #[test]
    fn aspect_fit_applies_only_to_initial_load() {
        let config = ShellConfig::default()
            .with_background(Path::new("bg.png"), true)
            .with_min_size(680, 370);
        let provider = FlatImageProvider::new().with_natural_size(Extent::new(1000, 1000));
        let mut compositor = WindowCompositor::new(
            &config,
            HeadlessSurface::new(),
            provider,
            HeadlessTerminalHost::new(),
        )
        .unwrap();

        // Square image fitted into 680x370 lands at 370x370.
        assert_eq!(compositor.displayed_extent(), Some(Extent::new(370, 370)));

        // The first resize stretches to the exact allocation; the ratio
        // is not re-preserved.
        compositor.handle_resize(Extent::new(800, 400)).unwrap();
        assert_eq!(compositor.displayed_extent(), Some(Extent::new(800, 400)));
    }

    #[test]
    fn rescale_failure_propagates() {
        let config = ShellConfig::default().with_background(Path::new("bg.png"), false);
        let provider = FlatImageProvider {
            fail_rescale: true,
            ..FlatImageProvider::new()
        };
        let mut compositor = WindowCompositor::new(
            &config,
            HeadlessSurface::new(),
            provider,
            HeadlessTerminalHost::new(),
        )
        .unwrap();

        assert!(compositor.handle_resize(Extent::new(900, 500)).is_err());
    }

    #[test]
    fn spawn_failure_aborts_construction() {
        let config = ShellConfig::default();
        let terminal = HeadlessTerminalHost {
            fail_spawn: true,
            ..HeadlessTerminalHost::new()
        };
        let result = WindowCompositor::new(
            &config,
            HeadlessSurface::new(),
            FlatImageProvider::new(),
            terminal,
        );
        assert!(result.is_err());
    }

    #[test]
    fn set_title_passes_through_verbatim() {
        let mut compositor = compositor_with_background();
        compositor.set_title("user@host:~");
        assert_eq!(compositor.surface().title(), Some("user@host:~"));
    }
}
