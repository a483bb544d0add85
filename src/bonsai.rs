//! The bonsai program: lays out the screen, grows trees and plays them back

use crate::config::{BonsaiConfig, GrowthConfig, Palette};
use crate::dice::entropy_seed;
use crate::grow::{grow, Cell, Tree};
use crate::help::{show_help_modal, HELP};
use crate::persist::{self, Progress};
use crate::playback::{Mode, Playback};
use crate::terminal::{Terminal, TEXT_COLOR};
use crossterm::event::KeyCode;
use std::io;
use std::time::{Duration, Instant};

/// How a tree's playback ended
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Outcome {
    Grown,
    Quit,
}

/// Screen rectangle, used to keep tree cells off the message box
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }
}

/// Run the bonsai tree generator
pub fn run(config: BonsaiConfig) -> io::Result<()> {
    let mut progress = None;
    if let Some(path) = &config.load {
        progress = Some(persist::load(path).map_err(io::Error::other)?);
    }

    if config.print {
        run_print_mode(&config, progress)
    } else {
        run_interactive(&config, progress)
    }
}

/// Rows occupied by the pot art
pub fn base_height(base_type: u8) -> i32 {
    match base_type {
        1 => 4,
        2 => 3,
        _ => 0,
    }
}

/// Tree grid `(height, width)` for a screen, leaving room for the base
pub fn tree_grid(term_width: u16, term_height: u16, base_type: u8) -> (i32, i32) {
    let height = (term_height as i32 - base_height(base_type)).max(1);
    (height, term_width as i32)
}

fn seeded(growth: &GrowthConfig, seed: u64) -> GrowthConfig {
    GrowthConfig {
        seed,
        ..growth.clone()
    }
}

fn first_seed(config: &BonsaiConfig, progress: Option<Progress>) -> u64 {
    match progress {
        Some(progress) => progress.seed,
        None if config.growth.seed != 0 => config.growth.seed,
        None => entropy_seed(),
    }
}

/// Draw base, tree and message into the back buffer
fn compose(term: &mut Terminal, config: &BonsaiConfig, seed: u64) -> (Tree, Option<Rect>) {
    let (width, height) = term.size();
    let (tree_height, tree_width) = tree_grid(width, height, config.base_type);
    let tree = grow(tree_height, tree_width, &seeded(&config.growth, seed));

    draw_base(term, config.base_type, &config.growth.palette);
    let message_box = config.message.as_deref().map(|msg| draw_message(term, msg));
    (tree, message_box)
}

fn paint(term: &mut Terminal, cells: &[Cell], message_box: Option<Rect>) {
    for cell in cells {
        if !message_box.is_some_and(|r| r.contains(cell.x, cell.y)) {
            term.set(cell.x, cell.y, cell.ch, Some(cell.color), cell.bold);
        }
    }
}

fn run_print_mode(config: &BonsaiConfig, progress: Option<Progress>) -> io::Result<()> {
    let mut seed = first_seed(config, progress);
    let (width, height) = crossterm::terminal::size().unwrap_or((80, 24));

    loop {
        let mut term = Terminal::headless(width, height);
        let (tree, message_box) = compose(&mut term, config, seed);
        paint(&mut term, &tree.cells, message_box);
        term.print_to_stdout()?;
        save_progress(config, seed, tree.counters.branches);

        if !config.infinite {
            break;
        }

        std::thread::sleep(Duration::try_from_secs_f64(config.time_wait).unwrap_or(Duration::ZERO));
        seed = entropy_seed();
    }

    Ok(())
}

fn run_interactive(config: &BonsaiConfig, progress: Option<Progress>) -> io::Result<()> {
    let mut seed = first_seed(config, progress);
    let mut resume = progress.map_or(0, |p| p.branches);
    let mut term = Terminal::new(true)?;

    loop {
        term.clear();
        term.clear_screen()?;

        let (tree, message_box) = compose(&mut term, config, seed);
        term.render()?;

        let mode = if config.live { Mode::Live } else { Mode::Instant };
        let mut playback = Playback::new(tree.cells.clone(), mode, config.time_step);
        if resume > 0 {
            playback.skip_to(tree.cells_before_branch(resume));
            resume = 0;
        }

        let outcome = play(&mut term, &mut playback, config, message_box)?;
        save_progress(config, seed, tree.branches_started(playback.revealed()));
        if outcome == Outcome::Quit {
            break;
        }

        if !config.infinite {
            wait_for_exit(&mut term, config)?;
            break;
        }

        // Infinite mode: wait between trees
        let wait_ms = (config.time_wait.max(0.0) * 1000.0) as u64;
        if let Some(code) = term.wait_key(wait_ms)? {
            if quits(config, code) {
                break;
            }
        }

        seed = entropy_seed();
        tracing::info!(seed, "growing next tree");
    }

    Ok(())
}

/// Frame loop: tick playback with measured time and draw what it reveals
fn play(
    term: &mut Terminal,
    playback: &mut Playback,
    config: &BonsaiConfig,
    message_box: Option<Rect>,
) -> io::Result<Outcome> {
    let frame = if config.time_step > 0.0 {
        config.time_step.min(0.05)
    } else {
        0.01
    };
    let mut previous = Instant::now();

    loop {
        let now = Instant::now();
        playback.tick(now.duration_since(previous).as_secs_f64());
        previous = now;

        for cell in playback.pending_reveals() {
            if !message_box.is_some_and(|r| r.contains(cell.x, cell.y)) {
                term.draw_cell(cell.x, cell.y, cell.ch, Some(cell.color), cell.bold)?;
            }
        }
        term.present()?;

        if playback.is_finished() {
            return Ok(Outcome::Grown);
        }

        if let Some(code) = term.check_key()? {
            if code == KeyCode::Char('?') && !config.screensaver {
                if show_help_modal(term, HELP)? {
                    return Ok(Outcome::Quit);
                }
                previous = Instant::now();
            } else if quits(config, code) {
                return Ok(Outcome::Quit);
            }
        }

        std::thread::sleep(Duration::from_secs_f64(frame));
    }
}

fn wait_for_exit(term: &mut Terminal, config: &BonsaiConfig) -> io::Result<()> {
    loop {
        if let Some(code) = term.wait_key(100)? {
            if code == KeyCode::Char('?') && !config.screensaver {
                if show_help_modal(term, HELP)? {
                    return Ok(());
                }
            } else if quits(config, code) {
                return Ok(());
            }
        }
    }
}

/// Screensaver mode quits on any key
fn quits(config: &BonsaiConfig, code: KeyCode) -> bool {
    config.screensaver || matches!(code, KeyCode::Char('q') | KeyCode::Esc)
}

fn save_progress(config: &BonsaiConfig, seed: u64, branches: u32) {
    if let Some(path) = &config.save {
        if let Err(err) = persist::save(path, &Progress { seed, branches }) {
            tracing::warn!(label = err.as_label(), %err, "could not save progress");
        }
    }
}

const LARGE_POT: [&str; 3] = [
    " \\                           / ",
    "  \\_________________________/ ",
    "  (_)                     (_)",
];

const SMALL_POT: [&str; 2] = [" (           ) ", "  (_________)  "];

/// Draw the pot centered on the bottom rows
pub fn draw_base(term: &mut Terminal, base_type: u8, palette: &Palette) {
    let (width, height) = term.size();
    let rows = base_height(base_type);
    let (rim, body) = match base_type {
        1 => (
            vec![
                (":", TEXT_COLOR, true),
                ("___________", palette.light_leaf(), false),
                ("./~~~\\.", palette.light_wood(), true),
                ("___________", palette.light_leaf(), false),
                (":", TEXT_COLOR, false),
            ],
            &LARGE_POT[..],
        ),
        2 => (
            vec![
                ("(", TEXT_COLOR, false),
                ("---", palette.light_leaf(), false),
                ("./~~~\\.", palette.light_wood(), true),
                ("---", palette.light_leaf(), false),
                (")", TEXT_COLOR, false),
            ],
            &SMALL_POT[..],
        ),
        _ => return,
    };

    let pot_width: i32 = rim.iter().map(|(s, _, _)| s.chars().count() as i32).sum();
    let start_x = ((width as i32 - pot_width) / 2).max(0);
    let start_y = height as i32 - rows;

    let mut x = start_x;
    for (segment, color, bold) in rim {
        term.set_str(x, start_y, segment, Some(color), bold);
        x += segment.chars().count() as i32;
    }
    for (i, line) in body.iter().enumerate() {
        term.set_str(start_x, start_y + 1 + i as i32, line, Some(TEXT_COLOR), false);
    }
}

/// Draw a bordered message box right of the tree and return its area
pub fn draw_message(term: &mut Terminal, message: &str) -> Rect {
    let (width, height) = term.size();
    let max_box_width = (width as f32 * 0.25) as usize;
    let box_width = max_box_width.max(20).min(message.chars().count() + 4);

    let wrapped = word_wrap(message, box_width - 4);
    let box_height = wrapped.len() + 2;

    let box_x = ((width as f32 * 0.7) as i32).min(width as i32 - box_width as i32).max(0);
    let box_y = ((height as f32 * 0.7) as i32 - box_height as i32 / 2).max(0);
    let border = Some(TEXT_COLOR);
    let right = box_x + box_width as i32 - 1;
    let bottom = box_y + box_height as i32 - 1;

    for y in [box_y, bottom] {
        term.set(box_x, y, '+', border, false);
        for x in box_x + 1..right {
            term.set(x, y, '-', border, false);
        }
        term.set(right, y, '+', border, false);
    }

    for (i, line) in wrapped.iter().enumerate() {
        let y = box_y + 1 + i as i32;
        term.set(box_x, y, '|', border, false);
        term.set_str(box_x + 2, y, line, Some(TEXT_COLOR), true);
        term.set(right, y, '|', border, false);
    }

    Rect {
        x: box_x,
        y: box_y,
        width: box_width as i32,
        height: box_height as i32,
    }
}

fn word_wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current_line = String::new();

    for word in text.split_whitespace() {
        if current_line.is_empty() {
            current_line = word.to_string();
        } else if current_line.chars().count() + 1 + word.chars().count() <= width {
            current_line.push(' ');
            current_line.push_str(word);
        } else {
            lines.push(current_line);
            current_line = word.to_string();
        }
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(term: &Terminal, y: i32) -> String {
        let (width, _) = term.size();
        (0..width as i32)
            .map(|x| term.get(x, y).map_or(' ', |g| g.ch))
            .collect::<String>()
            .trim_end()
            .to_string()
    }

    #[test]
    fn grid_leaves_room_for_base() {
        assert_eq!(tree_grid(80, 24, 1), (20, 80));
        assert_eq!(tree_grid(80, 24, 2), (21, 80));
        assert_eq!(tree_grid(80, 24, 0), (24, 80));
        assert_eq!(tree_grid(10, 2, 1), (1, 10));
    }

    #[test]
    fn large_pot_is_centered_at_bottom() {
        let mut term = Terminal::headless(41, 10);
        draw_base(&mut term, 1, &Palette::default());
        assert_eq!(row(&term, 6), "     :___________./~~~\\.___________:");
        assert_eq!(row(&term, 9), "       (_)                     (_)");
        assert_eq!(term.get(5, 6).and_then(|g| g.fg), Some(TEXT_COLOR));
        assert_eq!(term.get(6, 6).and_then(|g| g.fg), Some(10));
    }

    #[test]
    fn small_pot_and_no_pot() {
        let mut term = Terminal::headless(15, 5);
        draw_base(&mut term, 2, &Palette::default());
        assert_eq!(row(&term, 2), "(---./~~~\\.---)");

        let mut bare = Terminal::headless(15, 5);
        draw_base(&mut bare, 0, &Palette::default());
        assert!(bare.ansi_lines().is_empty());
    }

    #[test]
    fn message_box_wraps_and_reports_area() {
        let mut term = Terminal::headless(80, 24);
        let area = draw_message(&mut term, "a small tree grows slowly in the terminal");
        assert_eq!(term.get(area.x, area.y).map(|g| g.ch), Some('+'));
        assert!(area.height > 3);
        assert!(area.x + area.width <= 80);
        assert!(area.contains(area.x + 1, area.y + 1));
        assert!(!area.contains(area.x + area.width, area.y));
    }

    #[test]
    fn word_wrap_breaks_on_width() {
        assert_eq!(word_wrap("one two three", 7), vec!["one two", "three"]);
        assert_eq!(word_wrap("", 5), vec![String::new()]);
    }

    #[test]
    fn painted_tree_skips_message_area() {
        let mut term = Terminal::headless(4, 1);
        let cells = [
            Cell { x: 0, y: 0, ch: '/', color: 3, bold: false },
            Cell { x: 2, y: 0, ch: '&', color: 2, bold: false },
        ];
        let message_box = Rect { x: 2, y: 0, width: 2, height: 1 };
        paint(&mut term, &cells, Some(message_box));
        assert_eq!(row(&term, 0), "/");
    }

    #[test]
    fn loaded_progress_seeds_first_tree() {
        let config = BonsaiConfig::default();
        let progress = Progress { seed: 9, branches: 4 };
        assert_eq!(first_seed(&config, Some(progress)), 9);

        let mut seeded_config = BonsaiConfig::default();
        seeded_config.growth.seed = 5;
        assert_eq!(first_seed(&seeded_config, None), 5);
        assert_ne!(first_seed(&config, None), 0);
    }
}
