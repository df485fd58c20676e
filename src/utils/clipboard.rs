//! Clipboard access.
//!
//! The clipboard seeds a search from pasted text and receives each successful
//! summary. [`SystemClipboard`] talks to the desktop; [`MemoryClipboard`] keeps
//! the text in-process for tests and headless runs.
//!
//! On Linux the process that last set the clipboard has to serve its
//! contents. A write therefore blocks until a clipboard manager (or any other
//! client) takes ownership, for at most [`LINUX_HANDOFF_TIMEOUT`]. Without a
//! clipboard manager the text is gone once the process exits.

use std::sync::Mutex;
use std::time::{Duration, Instant};

/// How long a Linux write waits for another client to take the contents
pub const LINUX_HANDOFF_TIMEOUT: Duration = Duration::from_secs(1);

/// Deadline for a write started at `now`
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn handoff_deadline(now: Instant) -> Instant {
    now + LINUX_HANDOFF_TIMEOUT
}

/// Errors that can occur when using the clipboard
#[derive(Debug, thiserror::Error)]
pub enum ClipboardError {
    /// No clipboard could be opened (no display server, unsupported platform)
    #[error("Clipboard unavailable: {0}")]
    Unavailable(String),

    /// The clipboard was opened but reading or writing failed
    #[error("Clipboard access failed: {0}")]
    Access(String),
}

/// Read and write plain text on a clipboard
pub trait Clipboard: std::fmt::Debug {
    fn read(&self) -> Result<String, ClipboardError>;

    /// Replace the clipboard contents
    fn write(&self, text: &str) -> Result<(), ClipboardError>;
}

/// The desktop clipboard, held open for the lifetime of the value.
pub struct SystemClipboard {
    inner: Mutex<arboard::Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Result<Self, ClipboardError> {
        let clipboard =
            arboard::Clipboard::new().map_err(|e| ClipboardError::Unavailable(e.to_string()))?;
        Ok(Self {
            inner: Mutex::new(clipboard),
        })
    }
}

impl std::fmt::Debug for SystemClipboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemClipboard").finish_non_exhaustive()
    }
}

impl Clipboard for SystemClipboard {
    fn read(&self) -> Result<String, ClipboardError> {
        let mut clipboard = self
            .inner
            .lock()
            .map_err(|e| ClipboardError::Access(e.to_string()))?;
        clipboard
            .get_text()
            .map_err(|e| ClipboardError::Access(e.to_string()))
    }

    fn write(&self, text: &str) -> Result<(), ClipboardError> {
        let mut clipboard = self
            .inner
            .lock()
            .map_err(|e| ClipboardError::Access(e.to_string()))?;

        #[cfg(target_os = "linux")]
        let result = {
            use arboard::SetExtLinux;
            clipboard
                .set()
                .wait_until(handoff_deadline(Instant::now()))
                .text(text.to_string())
        };
        #[cfg(not(target_os = "linux"))]
        let result = clipboard.set_text(text.to_string());

        result.map_err(|e| ClipboardError::Access(e.to_string()))
    }
}

/// In-process clipboard
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: Mutex<String>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            contents: Mutex::new(text.into()),
        }
    }

    /// Current contents
    pub fn contents(&self) -> String {
        self.contents.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl Clipboard for MemoryClipboard {
    fn read(&self) -> Result<String, ClipboardError> {
        self.contents
            .lock()
            .map(|c| c.clone())
            .map_err(|e| ClipboardError::Access(e.to_string()))
    }

    fn write(&self, text: &str) -> Result<(), ClipboardError> {
        let mut guard = self
            .contents
            .lock()
            .map_err(|e| ClipboardError::Access(e.to_string()))?;
        *guard = text.to_string();
        Ok(())
    }
}
