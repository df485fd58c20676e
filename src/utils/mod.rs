//! Utility modules supporting citation lookup.
//!
//! - [`Transport`] / [`HttpClient`]: fetch a URL and return its body, with bounded timeouts
//! - [`format_summary`]: render a [`Citation`](crate::models::Citation) as a filename-safe string
//! - [`Clipboard`]: read the search term from, and publish results to, a clipboard
//!
//! # Formatting
//!
//! ```rust
//! use cite_finder::models::Citation;
//! use cite_finder::utils::format_summary;
//!
//! let citation = Citation {
//!     first_author: "He".into(),
//!     last_author: "Sun".into(),
//!     source: "CVPR".into(),
//!     year: "2016".into(),
//!     title: "Deep Residual Learning for Image Recognition".into(),
//! };
//! assert_eq!(
//!     format_summary(&citation),
//!     "He Sun (CVPR 2016) Deep Residual Learning for Image Recognition"
//! );
//! ```

mod cite;
mod clipboard;
mod http;

pub use cite::{format_summary, remove_special_characters, UNSAFE_FILENAME_CHARS};
pub use clipboard::{Clipboard, ClipboardError, MemoryClipboard, SystemClipboard};
pub use http::{HttpClient, Transport};
