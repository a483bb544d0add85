use crate::terminal::Terminal;
use crossterm::cursor::MoveTo;
use crossterm::event::KeyCode;
use crossterm::queue;
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};
use std::io::{self, stdout, Write};

/// Key help shown while a tree is on screen
pub const HELP: &str = "\
BONSAI
─────────────────
q/Esc  Quit
?      Close help";

/// Box-drawn rows for a help text, padded to equal width
pub fn help_box(help_text: &str) -> Vec<String> {
    let lines: Vec<&str> = help_text.lines().collect();
    let max_width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let bar = "─".repeat(max_width + 2);

    let mut rows = Vec::with_capacity(lines.len() + 2);
    rows.push(format!("┌{}┐", bar));
    for line in &lines {
        let padding = max_width.saturating_sub(line.chars().count());
        rows.push(format!("│ {}{} │", line, " ".repeat(padding)));
    }
    rows.push(format!("└{}┘", bar));
    rows
}

/// Show a modal help overlay without modifying the back buffer.
/// Returns true if the user requested quit (q/Esc) while the overlay is open.
pub fn show_help_modal(term: &mut Terminal, help_text: &str) -> io::Result<bool> {
    if help_text.is_empty() {
        return Ok(false);
    }

    let (width, height) = term.size();
    let rows = help_box(help_text);
    let box_width = rows[0].chars().count();
    let start_x = (width as usize).saturating_sub(box_width) / 2;
    let start_y = (height as usize).saturating_sub(rows.len()) / 2;

    let mut out = stdout();
    queue!(out, SetForegroundColor(Color::White))?;
    for (i, row) in rows.iter().enumerate() {
        queue!(out, MoveTo(start_x as u16, (start_y + i) as u16), Print(row))?;
    }
    queue!(out, SetAttribute(Attribute::Reset), ResetColor)?;
    out.flush()?;

    loop {
        if let Some(code) = term.wait_key(50)? {
            match code {
                KeyCode::Char('?') => break,
                KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
                _ => {}
            }
        }
    }

    // Restore previous frame from back buffer.
    term.render()?;
    Ok(false)
}
