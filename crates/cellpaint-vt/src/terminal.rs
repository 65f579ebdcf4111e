use alacritty_terminal::event::VoidListener;
use alacritty_terminal::grid::Dimensions;
use alacritty_terminal::term::{Config, Term};
use alacritty_terminal::vte::ansi;

use cellpaint::Palette;

use crate::screen::VtSnapshot;

/// Dimensions helper for creating / resizing the terminal.
struct TermSize {
    columns: usize,
    screen_lines: usize,
}

impl Dimensions for TermSize {
    fn total_lines(&self) -> usize {
        self.screen_lines
    }

    fn screen_lines(&self) -> usize {
        self.screen_lines
    }

    fn columns(&self) -> usize {
        self.columns
    }
}

/// A terminal emulator whose screen can be handed to the compositor.
///
/// Wraps `alacritty_terminal::Term` and a VTE parser. Rendering goes through
/// [`VtTerminal::snapshot`], which borrows the terminal for one pass.
pub struct VtTerminal {
    term: Term<VoidListener>,
    parser: ansi::Processor,
    palette: Palette,
    reverse_video: bool,
}

impl VtTerminal {
    /// Create a new terminal with the given dimensions.
    ///
    /// Uses 10,000 lines of scrollback history by default.
    pub fn new(cols: u16, rows: u16) -> Self {
        let config = Config {
            scrolling_history: 10_000,
            ..Config::default()
        };

        let size = TermSize {
            columns: cols as usize,
            screen_lines: rows as usize,
        };

        Self {
            term: Term::new(config, &size, VoidListener),
            parser: ansi::Processor::new(),
            palette: Palette::default(),
            reverse_video: false,
        }
    }

    /// Feed raw PTY output bytes into the terminal.
    pub fn write(&mut self, bytes: &[u8]) {
        self.parser.advance(&mut self.term, bytes);
    }

    /// Resize the terminal to new dimensions.
    pub fn resize(&mut self, cols: u16, rows: u16) {
        let size = TermSize {
            columns: cols as usize,
            screen_lines: rows as usize,
        };
        self.term.resize(size);
        log::debug!("terminal resized to {cols}x{rows}");
    }

    /// Replace the color scheme. Colors the application set through escape
    /// sequences still take precedence.
    pub fn set_palette(&mut self, palette: Palette) {
        self.palette = palette;
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Render the whole screen in reverse video.
    pub fn set_reverse_video(&mut self, reverse_video: bool) {
        self.reverse_video = reverse_video;
    }

    /// Number of lines currently held in scrollback.
    pub fn history_size(&self) -> usize {
        self.term.grid().history_size()
    }

    /// Get a read-only snapshot of the terminal screen.
    pub fn snapshot(&self) -> VtSnapshot<'_, VoidListener> {
        VtSnapshot::new(&self.term, &self.palette, self.reverse_video)
    }

    /// Get a reference to the underlying alacritty Term.
    ///
    /// Escape hatch for advanced use cases.
    pub fn inner(&self) -> &Term<VoidListener> {
        &self.term
    }
}
