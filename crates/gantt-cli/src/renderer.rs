//! Terminal rendering module for rich markdown output
//!
//! Renders the markdown produced by the core display types with termimad,
//! or prints it unchanged when color is disabled.

use anyhow::Result;
use termimad::{crossterm::style::Color, MadSkin};

/// Terminal renderer that can switch between rich and plain text output
pub struct TerminalRenderer {
    rich_enabled: bool,
    skin: MadSkin,
}

fn is_table_line(line: &str) -> bool {
    line.trim_start().starts_with('|')
}

impl TerminalRenderer {
    /// Create a new terminal renderer
    pub fn new(rich_enabled: bool) -> Self {
        let mut skin = MadSkin::default();

        skin.set_headers_fg(Color::Blue);
        skin.bold.set_fg(Color::Yellow);
        skin.italic.set_fg(Color::Magenta);
        skin.inline_code.set_bg(Color::AnsiValue(238));

        Self { rich_enabled, skin }
    }

    /// Render markdown text to terminal
    ///
    /// Header lines keep their hash marks, tables are laid out as a whole
    /// and every other line is rendered inline.
    pub fn render(&self, markdown: &str) -> Result<()> {
        if !self.rich_enabled {
            print!("{markdown}");
            return Ok(());
        }

        let mut table = Vec::new();
        for line in markdown.lines() {
            if is_table_line(line) {
                table.push(line);
                continue;
            }
            self.flush_table(&mut table);

            if line.starts_with('#') {
                println!("\x1b[34m{line}\x1b[0m");
            } else {
                self.skin.print_inline(line);
                println!();
            }
        }
        self.flush_table(&mut table);
        Ok(())
    }

    fn flush_table(&self, table: &mut Vec<&str>) {
        if !table.is_empty() {
            self.skin.print_text(&table.join("\n"));
            table.clear();
        }
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_renderer() {
        let renderer = TerminalRenderer::new(false);
        assert!(!renderer.rich_enabled);
    }

    #[test]
    fn test_default_is_rich() {
        let renderer = TerminalRenderer::default();
        assert!(renderer.rich_enabled);
    }

    #[test]
    fn test_table_lines() {
        assert!(is_table_line("| 0 | ▸ Base-Step-1 |"));
        assert!(is_table_line("  |--:|:-----|"));
        assert!(!is_table_line("## Visible rows"));
        assert!(!is_table_line("- Expanded **Base-Step-1**"));
    }
}
