//! Text helpers for printing untrusted feed content to a terminal.

mod text;

pub use text::{strip_control_chars, truncate_to_width};
