// src/app.rs
//! Application controller - wires cross-component events.
//!
//! Owns the compositor and the receiving end of the event channel and
//! runs the single-threaded dispatch loop: one event is fully handled
//! before the next is taken, so resize handling needs no locking. Window
//! destruction and terminal child exit both end the session; there is no
//! restart path.

use crate::compositor::WindowCompositor;
use crate::error::ShellResult;
use crate::events::{EventReceiver, ShellEvent};
use crate::image::ImageProvider;
use crate::surface::WindowSurface;
use crate::terminal::TerminalHost;

use tracing::{debug, info};

/// Why the event loop stopped. Both reasons are graceful.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    WindowClosed,
    ChildExited,
}

pub struct AppController<S, I, T>
where
    S: WindowSurface,
    I: ImageProvider,
    T: TerminalHost,
{
    compositor: WindowCompositor<S, I, T>,
    events: EventReceiver,
}

impl<S, I, T> AppController<S, I, T>
where
    S: WindowSurface,
    I: ImageProvider,
    T: TerminalHost,
{
    pub fn new(compositor: WindowCompositor<S, I, T>, events: EventReceiver) -> Self {
        Self { compositor, events }
    }

    /// Run until the window closes or the shell exits. Errors from
    /// resize handling propagate out; they are fatal to the program.
    pub fn run(&mut self) -> ShellResult<ExitReason> {
        loop {
            let event = match self.events.recv_blocking() {
                Ok(event) => event,
                // Every sender gone means no window and no shell remain.
                Err(_) => return Ok(ExitReason::WindowClosed),
            };
            if let Some(reason) = self.dispatch(event)? {
                info!("session ended: {:?}", reason);
                return Ok(reason);
            }
        }
    }

    /// Handle a single event to completion.
    pub fn dispatch(&mut self, event: ShellEvent) -> ShellResult<Option<ExitReason>> {
        match event {
            ShellEvent::Resized(extent) => {
                self.compositor.handle_resize(extent)?;
                Ok(None)
            }
            ShellEvent::TitleChanged(title) => {
                debug!("title changed to {:?}", title);
                self.compositor.set_title(&title);
                Ok(None)
            }
            ShellEvent::WindowClosed => Ok(Some(ExitReason::WindowClosed)),
            ShellEvent::ChildExited => Ok(Some(ExitReason::ChildExited)),
        }
    }

    pub fn compositor(&self) -> &WindowCompositor<S, I, T> {
        &self.compositor
    }
}
