// src/events.rs
//! Plain-data events exchanged between the providers and the dispatch
//! loop. Nothing toolkit-specific crosses this boundary: dimensions,
//! strings and exit notifications only.

/// An on-screen pixel size, as assigned to the window by the windowing
/// system at a given moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extent {
    pub width: u32,
    pub height: u32,
}

impl Extent {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl std::fmt::Display for Extent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Events delivered to the application loop, one at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellEvent {
    /// The window surface was given a new allocation.
    Resized(Extent),
    /// The window was destroyed by the user or the window manager.
    WindowClosed,
    /// The terminal child process exited. Fires once; terminal state.
    ChildExited,
    /// The child reported a new window title (OSC 0/2).
    TitleChanged(String),
}

pub type EventSender = async_channel::Sender<ShellEvent>;
pub type EventReceiver = async_channel::Receiver<ShellEvent>;

/// Create the event channel shared by all event sources.
pub fn channel() -> (EventSender, EventReceiver) {
    async_channel::unbounded()
}
