//! TermLeek - a single-window terminal shell with a background image
//! that tracks the window size.
//!
//! The crate is organized around three capability seams so the core
//! stays toolkit-agnostic:
//! - an image provider (load/scale pixel buffers),
//! - a terminal host (shell process, exit and title events),
//! - a window surface (title, layout, size requests).
//!
//! `WindowCompositor` composes the three; `AppController` runs the
//! single-threaded event loop on top.

pub mod app;
pub mod compositor;
pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod headless;
pub mod image;
pub mod surface;
pub mod terminal;

// Re-export main types
pub use app::{AppController, ExitReason};
pub use compositor::WindowCompositor;
pub use config::ShellConfig;
pub use error::{ShellError, ShellResult};
pub use events::{Extent, ShellEvent};
pub use image::{BilinearScaler, ImageProvider, ScaledImage, SourceImage};
pub use surface::WindowSurface;
pub use terminal::{PtyTerminalHost, TerminalHost};
