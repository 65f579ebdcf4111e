//! cellpaint-vt: an `alacritty_terminal` grid as a compositor input.
//!
//! Parses PTY output into a terminal grid and exposes it as a
//! [`cellpaint::GridSnapshot`]: rows encoded as UTF-16 with one style per
//! column, the cursor, and the palette merged with colors set by the
//! application.

pub mod screen;
pub mod terminal;

pub use screen::{VtRow, VtSnapshot};
pub use terminal::VtTerminal;
