use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{poll, read, Event, KeyCode, KeyEventKind},
    execute, queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{
        disable_raw_mode, enable_raw_mode, size, Clear, ClearType, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use std::io::{self, stdout, Write};
use std::time::Duration;
use unicode_width::UnicodeWidthChar;

/// Terminal abstraction for rendering
pub struct Terminal {
    width: u16,
    height: u16,
    buffer: Vec<Vec<Glyph>>,
    alternate_screen: bool,
}

/// A single styled character in the back buffer
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Glyph {
    pub ch: char,
    /// 256-color palette index
    pub fg: Option<u8>,
    pub bold: bool,
}

impl Default for Glyph {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: None,
            bold: false,
        }
    }
}

/// Palette index used for pot outlines and message text
pub const TEXT_COLOR: u8 = 7;

impl Terminal {
    /// Initialize the terminal for drawing
    pub fn new(alternate_screen: bool) -> io::Result<Self> {
        let (width, height) = size()?;

        if alternate_screen {
            enable_raw_mode()?;
            execute!(stdout(), EnterAlternateScreen, Hide)?;
        }

        Ok(Self::with_size(width, height, alternate_screen))
    }

    /// Buffer-only terminal of a fixed size, never touching the tty
    pub fn headless(width: u16, height: u16) -> Self {
        Self::with_size(width, height, false)
    }

    fn with_size(width: u16, height: u16, alternate_screen: bool) -> Self {
        Self {
            width,
            height,
            buffer: vec![vec![Glyph::default(); width as usize]; height as usize],
            alternate_screen,
        }
    }

    /// Get terminal dimensions
    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    /// Clear the buffer
    pub fn clear(&mut self) {
        for row in &mut self.buffer {
            row.fill(Glyph::default());
        }
    }

    /// Clear the actual terminal
    pub fn clear_screen(&self) -> io::Result<()> {
        execute!(stdout(), Clear(ClearType::All))?;
        Ok(())
    }

    pub fn get(&self, x: i32, y: i32) -> Option<Glyph> {
        if x < 0 || y < 0 {
            return None;
        }
        self.buffer.get(y as usize)?.get(x as usize).copied()
    }

    /// Set a character at position with optional color
    pub fn set(&mut self, x: i32, y: i32, ch: char, fg: Option<u8>, bold: bool) {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            self.buffer[y as usize][x as usize] = Glyph { ch, fg, bold };
        }
    }

    /// Set a string starting at position, skipping spaces
    pub fn set_str(&mut self, x: i32, y: i32, s: &str, fg: Option<u8>, bold: bool) {
        for (i, ch) in s.chars().enumerate() {
            if ch != ' ' {
                self.set(x + i as i32, y, ch, fg, bold);
            }
        }
    }

    /// Draw a single cell into the buffer and straight to the screen (live mode)
    pub fn draw_cell(&mut self, x: i32, y: i32, ch: char, fg: Option<u8>, bold: bool) -> io::Result<()> {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            self.set(x, y, ch, fg, bold);
            let mut out = stdout();
            queue!(out, MoveTo(x as u16, y as u16))?;
            queue_glyph(&mut out, &Glyph { ch, fg, bold })?;
        }
        Ok(())
    }

    /// Flush queued live-mode output
    pub fn present(&self) -> io::Result<()> {
        stdout().flush()
    }

    /// Render the entire buffer to screen
    pub fn render(&self) -> io::Result<()> {
        let mut out = stdout();

        for (y, row) in self.buffer.iter().enumerate() {
            queue!(out, MoveTo(0, y as u16))?;
            for glyph in visible(row) {
                queue_glyph(&mut out, glyph)?;
            }
        }

        out.flush()?;
        Ok(())
    }

    /// Check for keypress (non-blocking)
    pub fn check_key(&self) -> io::Result<Option<KeyCode>> {
        self.wait_key(0)
    }

    /// Wait for a keypress with timeout
    pub fn wait_key(&self, timeout_ms: u64) -> io::Result<Option<KeyCode>> {
        if poll(Duration::from_millis(timeout_ms))? {
            if let Event::Key(key_event) = read()? {
                if key_event.kind != KeyEventKind::Release {
                    return Ok(Some(key_event.code));
                }
            }
        }
        Ok(None)
    }

    /// Buffer rows as ANSI 256-color text (for print mode)
    pub fn ansi_lines(&self) -> Vec<String> {
        let last_row = self
            .buffer
            .iter()
            .rposition(|row| row.iter().any(|g| g.ch != ' '))
            .map_or(0, |i| i + 1);

        self.buffer[..last_row]
            .iter()
            .map(|row| {
                let end = row.iter().rposition(|g| g.ch != ' ').map_or(0, |i| i + 1);
                let mut line = String::new();
                for glyph in visible(&row[..end]) {
                    if glyph.ch == ' ' {
                        line.push(' ');
                        continue;
                    }
                    if glyph.bold {
                        line.push_str("\x1b[1m");
                    }
                    if let Some(index) = glyph.fg {
                        line.push_str(&format!("\x1b[38;5;{}m", index));
                    }
                    line.push(glyph.ch);
                    line.push_str("\x1b[0m");
                }
                line
            })
            .collect()
    }

    /// Print buffer to stdout with ANSI colors (for print mode)
    pub fn print_to_stdout(&self) -> io::Result<()> {
        let mut out = stdout().lock();
        for line in self.ansi_lines() {
            writeln!(out, "{}", line)?;
        }
        out.flush()
    }
}

/// Glyphs of a row as printed: a wide glyph covers the column after it
fn visible(row: &[Glyph]) -> impl Iterator<Item = &Glyph> {
    let mut covered = 0;
    row.iter().filter(move |glyph| {
        if covered > 0 {
            covered -= 1;
            return false;
        }
        covered = glyph.ch.width().unwrap_or(1).saturating_sub(1);
        true
    })
}

fn queue_glyph(out: &mut impl Write, glyph: &Glyph) -> io::Result<()> {
    if glyph.bold {
        queue!(out, SetAttribute(Attribute::Bold))?;
    }

    if let Some(index) = glyph.fg {
        queue!(out, SetForegroundColor(Color::AnsiValue(index)), Print(glyph.ch), ResetColor)?;
    } else {
        queue!(out, Print(glyph.ch))?;
    }

    if glyph.bold {
        queue!(out, SetAttribute(Attribute::Reset))?;
    }
    Ok(())
}

impl Drop for Terminal {
    fn drop(&mut self) {
        if self.alternate_screen {
            let _ = execute!(stdout(), Show, LeaveAlternateScreen);
            let _ = disable_raw_mode();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_ignores_out_of_bounds() {
        let mut term = Terminal::headless(4, 2);
        term.set(-1, 0, 'x', None, false);
        term.set(4, 0, 'x', None, false);
        term.set(0, 2, 'x', None, false);
        term.set(3, 1, 'y', Some(2), true);
        assert_eq!(term.get(3, 1), Some(Glyph { ch: 'y', fg: Some(2), bold: true }));
        assert_eq!(term.get(4, 0), None);
    }

    #[test]
    fn ansi_lines_trim_blank_tail() {
        let mut term = Terminal::headless(6, 4);
        term.set(1, 1, '&', Some(10), true);
        let lines = term.ansi_lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "");
        assert_eq!(lines[1], " \x1b[1m\x1b[38;5;10m&\x1b[0m");
    }

    #[test]
    fn wide_glyph_covers_next_column() {
        let mut term = Terminal::headless(4, 1);
        term.set(0, 0, '🌸', None, false);
        term.set(2, 0, 'a', None, false);
        assert_eq!(term.ansi_lines(), vec!["🌸\x1b[0ma\x1b[0m".to_string()]);
    }

    #[test]
    fn clear_resets_buffer() {
        let mut term = Terminal::headless(3, 3);
        term.set_str(0, 0, "a b", None, false);
        assert_eq!(term.get(1, 0).map(|g| g.ch), Some(' '));
        term.clear();
        assert!(term.ansi_lines().is_empty());
    }
}
