// src/surface.rs
//! Window-surface capability.
//!
//! The compositor composes against this trait instead of subclassing a
//! toolkit window type. A backend implementation owns the real top-level
//! window and its absolute-position layout; both the background image and
//! the terminal view are anchored at (0,0), with the background behind
//! the (semi-transparent) terminal surface.

use crate::error::ShellResult;
use crate::events::Extent;
use crate::image::ScaledImage;
use std::path::Path;

pub trait WindowSurface {
    /// Replace the window title, verbatim.
    fn set_title(&mut self, title: &str);

    /// Apply the resolved minimum window size; the window itself stays
    /// resizable above this floor.
    fn set_minimum_size(&mut self, extent: Extent);

    /// Install a window icon from an image file.
    fn set_icon(&mut self, path: &Path) -> ShellResult<()>;

    /// Place the background image into the layout at (0,0) with the
    /// given size request. Called at most once, before the terminal view
    /// is mounted so the image stays underneath it.
    fn mount_background(&mut self, image: ScaledImage, request: Extent);

    /// Replace the displayed background buffer after a rescale.
    fn swap_background(&mut self, image: ScaledImage);

    /// Place the scrollable terminal view into the layout at (0,0) with
    /// the given size request. Called exactly once.
    fn mount_terminal_view(&mut self, request: Extent);

    /// Update the terminal view's size request to track the allocation.
    fn resize_terminal_view(&mut self, extent: Extent);
}
