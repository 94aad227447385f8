//! Client access layer for the SciLog electronic logbook.
//!
//! - [`models`]: snippet kinds, ACL placeholders, [`LogbookMessage`](models::LogbookMessage).
//! - [`scilog`]: the [`SciLog`] facade, logbook pinning, attachments and the
//!   HTTP transport.
//! - [`config`]: connection settings.

pub mod config;
pub mod error;
pub mod models;
pub mod scilog;

pub use error::{Error, Result};
pub use scilog::SciLog;
