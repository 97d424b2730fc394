// src/terminal.rs
//! Terminal host - owns the single child-process-backed terminal session.
//!
//! `PtyTerminalHost` spawns the configured shell on a PTY, watches for
//! child exit on a background thread, and extracts OSC 0/2 window-title
//! reports from the output stream. Everything it learns is delivered to
//! the dispatch loop as plain `ShellEvent`s; it never blocks the loop.
//!
//! Full terminal emulation (grid state, escape-sequence rendering) is
//! the embedded widget's business, not this host's. The only byte-level
//! work done here is the title scan, because the title is a window-level
//! concern.

use crate::constants::{CELL_HEIGHT_PX, CELL_WIDTH_PX, MAX_OSC_TITLE_LEN};
use crate::error::{ShellError, ShellResult};
use crate::events::{Extent, EventSender, ShellEvent};

use portable_pty::{native_pty_system, CommandBuilder, MasterPty, PtySize};
use std::io::Read;
use std::thread;
use tracing::{debug, info, warn};

/// Terminal capability consumed by the compositor.
pub trait TerminalHost {
    /// Launch the shell asynchronously. `shell` falls back to `$SHELL`,
    /// then to the platform default. Failure is fatal to the program: a
    /// terminal that cannot start a shell has no purpose.
    fn spawn(&mut self, shell: Option<&str>) -> ShellResult<()>;

    /// Surface opacity for the terminal view, applied once at startup.
    fn set_opacity(&mut self, opacity: f64);

    /// Font descriptor for the terminal view, applied once at startup.
    fn set_font(&mut self, descriptor: &str);

    /// Track a new window allocation (resizes the PTY grid).
    fn resize(&mut self, extent: Extent);
}

/// Production host over a native PTY.
pub struct PtyTerminalHost {
    events: EventSender,
    master: Option<Box<dyn MasterPty>>,
    opacity: f64,
    font: String,
}

impl PtyTerminalHost {
    pub fn new(events: EventSender) -> Self {
        Self {
            events,
            master: None,
            opacity: 1.0,
            font: String::new(),
        }
    }

    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    pub fn font(&self) -> &str {
        &self.font
    }

    fn resolve_shell(shell: Option<&str>) -> String {
        if let Some(shell) = shell {
            return shell.to_string();
        }
        if let Ok(shell) = std::env::var("SHELL") {
            if !shell.is_empty() {
                return shell;
            }
        }
        if cfg!(windows) {
            "cmd.exe".to_string()
        } else {
            "/bin/sh".to_string()
        }
    }
}

impl TerminalHost for PtyTerminalHost {
    fn spawn(&mut self, shell: Option<&str>) -> ShellResult<()> {
        let program = Self::resolve_shell(shell);
        debug!("spawning shell {}", program);

        let spawn_err = |message: String| ShellError::Spawn {
            program: program.clone(),
            message,
        };

        let pty_system = native_pty_system();
        let pair = pty_system
            .openpty(PtySize {
                rows: 24,
                cols: 80,
                pixel_width: 0,
                pixel_height: 0,
            })
            .map_err(|e| spawn_err(e.to_string()))?;

        let mut cmd = CommandBuilder::new(&program);
        cmd.env("TERM", "xterm-256color");
        let mut child = pair
            .slave
            .spawn_command(cmd)
            .map_err(|e| spawn_err(e.to_string()))?;
        // Keep the master only; holding the slave open would mask EOF.
        drop(pair.slave);

        let mut reader = pair
            .master
            .try_clone_reader()
            .map_err(|e| spawn_err(e.to_string()))?;
        self.master = Some(pair.master);

        let title_events = self.events.clone();
        thread::spawn(move || {
            let mut scanner = TitleScanner::new();
            let mut buf = [0u8; 4096];
            loop {
                match reader.read(&mut buf) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => {
                        for title in scanner.feed(&buf[..n]) {
                            if title_events
                                .send_blocking(ShellEvent::TitleChanged(title))
                                .is_err()
                            {
                                return;
                            }
                        }
                    }
                }
            }
            debug!("PTY output stream closed");
        });

        let exit_events = self.events.clone();
        thread::spawn(move || {
            match child.wait() {
                Ok(status) => info!("shell exited with {:?}", status),
                Err(e) => warn!("failed to wait for shell: {}", e),
            }
            let _ = exit_events.send_blocking(ShellEvent::ChildExited);
        });

        info!("shell {} spawned", program);
        Ok(())
    }

    fn set_opacity(&mut self, opacity: f64) {
        self.opacity = opacity;
    }

    fn set_font(&mut self, descriptor: &str) {
        self.font = descriptor.to_string();
    }

    fn resize(&mut self, extent: Extent) {
        let Some(master) = &self.master else { return };
        let cols = (extent.width / CELL_WIDTH_PX).max(1);
        let rows = (extent.height / CELL_HEIGHT_PX).max(1);
        if let Err(e) = master.resize(PtySize {
            rows: rows as u16,
            cols: cols as u16,
            pixel_width: extent.width as u16,
            pixel_height: extent.height as u16,
        }) {
            warn!("failed to resize PTY to {}: {}", extent, e);
        }
    }
}

/// Incremental scanner for OSC 0/2 title reports (`ESC ] 0 ; title BEL`
/// or ST-terminated). Keeps state across reads so sequences split over
/// chunk boundaries still resolve.
#[derive(Debug, Default)]
pub struct TitleScanner {
    state: ScanState,
    payload: Vec<u8>,
}

#[derive(Debug, Default, PartialEq)]
enum ScanState {
    #[default]
    Ground,
    Escape,
    Collect,
    CollectEscape,
}

impl TitleScanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk of PTY output; returns any titles completed by it,
    /// in order.
    pub fn feed(&mut self, data: &[u8]) -> Vec<String> {
        let mut titles = Vec::new();
        let mut i = 0;
        while i < data.len() {
            let byte = data[i];
            match self.state {
                ScanState::Ground => {
                    // Skip straight to the next ESC.
                    match memchr::memchr(0x1b, &data[i..]) {
                        Some(offset) => {
                            i += offset;
                            self.state = ScanState::Escape;
                        }
                        None => break,
                    }
                }
                ScanState::Escape => {
                    if byte == b']' {
                        self.payload.clear();
                        self.state = ScanState::Collect;
                    } else if byte == 0x1b {
                        // Stay in Escape: a fresh ESC restarts the match.
                    } else {
                        self.state = ScanState::Ground;
                    }
                }
                ScanState::Collect => {
                    if byte == 0x07 {
                        self.finish(&mut titles);
                    } else if byte == 0x1b {
                        self.state = ScanState::CollectEscape;
                    } else {
                        self.push_payload(byte);
                    }
                }
                ScanState::CollectEscape => {
                    if byte == b'\\' {
                        self.finish(&mut titles);
                    } else {
                        // Not an ST; the sequence is malformed. Drop it
                        // and reconsider this byte from the Escape state.
                        self.payload.clear();
                        self.state = ScanState::Escape;
                        continue;
                    }
                }
            }
            i += 1;
        }
        titles
    }

    fn push_payload(&mut self, byte: u8) {
        if self.payload.len() >= MAX_OSC_TITLE_LEN {
            warn!("discarding oversized OSC payload");
            self.payload.clear();
            self.state = ScanState::Ground;
        } else {
            self.payload.push(byte);
        }
    }

    fn finish(&mut self, titles: &mut Vec<String>) {
        if let Some(split) = self.payload.iter().position(|&b| b == b';') {
            let (code, title) = self.payload.split_at(split);
            if code == b"0" || code == b"2" {
                titles.push(String::from_utf8_lossy(&title[1..]).into_owned());
            }
        }
        self.payload.clear();
        self.state = ScanState::Ground;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bel_terminated_title_is_extracted() {
        let mut scanner = TitleScanner::new();
        let titles = scanner.feed(b"\x1b]0;user@host:~\x07");
        assert_eq!(titles, vec!["user@host:~".to_string()]);
    }

    #[test]
    fn st_terminated_title_is_extracted() {
        let mut scanner = TitleScanner::new();
        let titles = scanner.feed(b"\x1b]2;hello\x1b\\");
        assert_eq!(titles, vec!["hello".to_string()]);
    }

    #[test]
    fn title_split_across_reads_is_reassembled() {
        let mut scanner = TitleScanner::new();
        assert!(scanner.feed(b"\x1b]0;user@").is_empty());
        assert!(scanner.feed(b"host").is_empty());
        let titles = scanner.feed(b":~\x07");
        assert_eq!(titles, vec!["user@host:~".to_string()]);
    }

    #[test]
    fn non_title_osc_codes_are_ignored() {
        let mut scanner = TitleScanner::new();
        // OSC 52 (clipboard) must not surface as a title.
        assert!(scanner.feed(b"\x1b]52;c;aGVsbG8=\x07").is_empty());
    }

    #[test]
    fn interleaved_output_yields_titles_in_order() {
        let mut scanner = TitleScanner::new();
        let titles = scanner.feed(b"ls -la\x1b]0;first\x07 more text \x1b]2;second\x07 done");
        assert_eq!(titles, vec!["first".to_string(), "second".to_string()]);
    }

    #[test]
    fn plain_output_produces_nothing() {
        let mut scanner = TitleScanner::new();
        assert!(scanner.feed(b"just some regular output\nwith lines\n").is_empty());
    }

    #[test]
    fn oversized_payload_is_discarded() {
        let mut scanner = TitleScanner::new();
        let mut data = b"\x1b]0;".to_vec();
        data.extend(std::iter::repeat(b'x').take(MAX_OSC_TITLE_LEN + 10));
        data.push(0x07);
        assert!(scanner.feed(&data).is_empty());
        // Scanner must recover afterwards.
        assert_eq!(scanner.feed(b"\x1b]0;ok\x07"), vec!["ok".to_string()]);
    }

    #[test]
    fn empty_title_is_reported_verbatim() {
        let mut scanner = TitleScanner::new();
        assert_eq!(scanner.feed(b"\x1b]0;\x07"), vec![String::new()]);
    }

    #[test]
    fn shell_fallback_prefers_explicit_over_env() {
        assert_eq!(PtyTerminalHost::resolve_shell(Some("/bin/zsh")), "/bin/zsh");
    }
}
