//! `ScreenPainter`: Paints a VT surface onto the host terminal.

use crate::surface::VtSurface;
use crate::theme::{Rgb, Theme};
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::queue;
use crossterm::style::{Attribute, Print, SetAttribute, SetBackgroundColor, SetForegroundColor};
use std::io::{self, Write};

/// Cell attributes the painter tracks between cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct Style {
    fg: Option<Rgb>,
    bg: Option<Rgb>,
    bold: bool,
    italic: bool,
    underline: bool,
}

/// Paints the visible part of a [`VtSurface`].
///
/// A frame is built in memory and flushed in a single `write()`, so the
/// host terminal never shows a half-painted screen.
pub struct ScreenPainter {
    data: Vec<u8>,
    style: Style,
}

impl ScreenPainter {
    /// Create a painter with the given buffer capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            style: Style::default(),
        }
    }

    /// Create a painter sized for a typical terminal.
    pub fn new() -> Self {
        Self::with_capacity(16 * 1024)
    }

    /// Bytes of the last frame built.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Build a frame for `surface`.
    pub fn build(&mut self, surface: &VtSurface) -> io::Result<()> {
        self.data.clear();
        self.style = Style::default();
        let theme = surface.theme();
        let screen = surface.screen();
        let (rows, cols) = screen.size();

        queue!(self.data, Hide, SetAttribute(Attribute::Reset))?;
        for row in 0..rows {
            queue!(self.data, MoveTo(0, row))?;
            for col in 0..cols {
                let Some(cell) = screen.cell(row, col) else {
                    self.paint_blank(theme)?;
                    continue;
                };
                if cell.is_wide_continuation() {
                    continue;
                }
                let (mut fg, mut bg) = (theme.fg(cell.fgcolor()), theme.bg(cell.bgcolor()));
                if cell.inverse() {
                    std::mem::swap(&mut fg, &mut bg);
                }
                self.apply(Style {
                    fg: Some(fg),
                    bg: Some(bg),
                    bold: cell.bold(),
                    italic: cell.italic(),
                    underline: cell.underline(),
                })?;
                if cell.has_contents() {
                    queue!(self.data, Print(cell.contents()))?;
                } else {
                    queue!(self.data, Print(' '))?;
                }
            }
        }
        queue!(self.data, SetAttribute(Attribute::Reset))?;

        // The cursor only makes sense on the live screen.
        if !screen.hide_cursor() && surface.is_pinned() {
            let (row, col) = screen.cursor_position();
            queue!(self.data, MoveTo(col, row), Show)?;
        }
        Ok(())
    }

    /// Build a frame for `surface` and write it to `writer`.
    pub fn paint<W: Write>(&mut self, surface: &VtSurface, writer: &mut W) -> io::Result<()> {
        self.build(surface)?;
        writer.write_all(&self.data)?;
        writer.flush()
    }

    fn paint_blank(&mut self, theme: &Theme) -> io::Result<()> {
        self.apply(Style {
            fg: Some(theme.foreground),
            bg: Some(theme.background),
            ..Style::default()
        })?;
        queue!(self.data, Print(' '))
    }

    /// Emit only the attribute changes between the current style and `next`.
    fn apply(&mut self, next: Style) -> io::Result<()> {
        let prev = self.style;
        if (prev.bold, prev.italic, prev.underline) != (next.bold, next.italic, next.underline) {
            queue!(self.data, SetAttribute(Attribute::Reset))?;
            if next.bold {
                queue!(self.data, SetAttribute(Attribute::Bold))?;
            }
            if next.italic {
                queue!(self.data, SetAttribute(Attribute::Italic))?;
            }
            if next.underline {
                queue!(self.data, SetAttribute(Attribute::Underlined))?;
            }
            // Reset dropped the colors too.
            self.style = Style::default();
        }
        if let Some(fg) = next.fg.filter(|fg| self.style.fg != Some(*fg)) {
            queue!(self.data, SetForegroundColor(fg.into()))?;
        }
        if let Some(bg) = next.bg.filter(|bg| self.style.bg != Some(*bg)) {
            queue!(self.data, SetBackgroundColor(bg.into()))?;
        }
        self.style = next;
        Ok(())
    }
}

impl Default for ScreenPainter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FontConfig;
    use crate::layout::GridSize;
    use crate::surface::Surface;

    fn painted(output: &str) -> String {
        let mut surface = VtSurface::new(GridSize::new(20, 4), FontConfig::default(), Theme::DARK, 100);
        surface.write(output, Box::new(|| {}));
        let mut painter = ScreenPainter::new();
        painter.build(&surface).unwrap();
        String::from_utf8_lossy(painter.as_bytes()).into_owned()
    }

    #[test]
    fn test_paints_text_and_cursor() {
        let frame = painted("hello");
        assert!(frame.contains("hello"));
        assert!(frame.ends_with("\x1b[1;6H\x1b[?25h"));
    }

    #[test]
    fn test_uses_theme_colors() {
        let frame = painted("\x1b[31mred");
        let red = Theme::DARK.ansi[1];
        assert!(frame.contains(&format!("\x1b[38;2;{};{};{}m", red.r, red.g, red.b)));
    }

    #[test]
    fn test_hidden_cursor_stays_hidden() {
        let frame = painted("\x1b[?25lquiet");
        assert!(!frame.contains("\x1b[?25h"));
    }
}
