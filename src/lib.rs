//! Fetch an RSS feed, parse it, and find the items not seen before.
//!
//! - [`feed`] - HTTP fetch, CDATA handling, XML tree and RSS extraction
//! - [`novelty`] - Watermark capture and new-item detection
//! - [`present`] - Console rendering
//! - [`config`] - Optional TOML configuration

pub mod config;
pub mod feed;
pub mod novelty;
pub mod present;
pub mod util;
