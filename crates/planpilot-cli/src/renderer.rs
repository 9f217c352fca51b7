//! Terminal rendering for the markdown produced by the core display types.
//!
//! termimad renders tables, lists and inline styles. `--no-color` prints the
//! markdown unchanged.

use anyhow::Result;
use planpilot_core::display::{OperationStatus, StatusKind};
use termimad::{crossterm::style::Color, MadSkin};

/// Terminal renderer that can switch between rich and plain text output
pub struct TerminalRenderer {
    rich_enabled: bool,
    skin: MadSkin,
}

impl TerminalRenderer {
    pub fn new(rich_enabled: bool) -> Self {
        let mut skin = MadSkin::default();

        skin.set_headers_fg(Color::Blue);
        skin.bold.set_fg(Color::Yellow);
        skin.italic.set_fg(Color::Magenta);
        skin.inline_code.set_bg(Color::AnsiValue(238));
        skin.table.set_fg(Color::AnsiValue(246));

        Self { rich_enabled, skin }
    }

    /// Render markdown text to the terminal.
    ///
    /// Headings keep their hash marks so the step structure stays visible;
    /// everything between two headings is rendered as one block so tables
    /// are laid out together.
    pub fn render(&self, markdown: &str) -> Result<()> {
        if !self.rich_enabled {
            print!("{markdown}");
            return Ok(());
        }

        let mut block = String::new();
        for line in markdown.lines() {
            if line.starts_with('#') {
                self.flush(&mut block);
                println!("\x1b[34m{line}\x1b[0m");
            } else {
                block.push_str(line);
                block.push('\n');
            }
        }
        self.flush(&mut block);
        Ok(())
    }

    /// Render a one-line status, coloured by its kind.
    pub fn status(&self, status: &OperationStatus) -> Result<()> {
        if !self.rich_enabled {
            print!("{status}");
            return Ok(());
        }
        let color = match status.kind {
            StatusKind::Success => "32",
            StatusKind::Notice => "33",
            StatusKind::Failure => "31",
        };
        print!("\x1b[{color}m{status}\x1b[0m");
        Ok(())
    }

    fn flush(&self, block: &mut String) {
        if !block.is_empty() {
            print!("{}", self.skin.term_text(block));
            block.clear();
        }
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new(true)
    }
}
