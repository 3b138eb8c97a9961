//! Terminal rendering for markdown output.
//!
//! Rich output goes through termimad; `--no-color` falls back to
//! printing the markdown as plain text.

use termimad::{crossterm::style::Color, MadSkin};

/// Terminal renderer that can switch between rich and plain text output.
pub struct Renderer {
    rich: bool,
    skin: MadSkin,
}

impl Renderer {
    /// Create a renderer; `rich` enables colored termimad output.
    pub fn new(rich: bool) -> Self {
        let mut skin = MadSkin::default();
        skin.set_headers_fg(Color::Cyan);
        skin.bold.set_fg(Color::Green);
        skin.italic.set_fg(Color::Magenta);
        skin.inline_code.set_bg(Color::AnsiValue(236));
        skin.code_block.set_bg(Color::AnsiValue(236));

        Self { rich, skin }
    }

    /// Render markdown text to the terminal.
    pub fn render(&self, markdown: &str) {
        if self.rich {
            self.skin.print_text(markdown);
        } else {
            print!("{markdown}");
        }
    }
}
