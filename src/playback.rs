//! Incremental reveal of a grown tree.
//!
//! `Playback` owns a fixed cell sequence and a cursor. It is advanced only
//! by an outside frame loop calling [`Playback::tick`]; cells revealed since
//! the last frame are drained with [`Playback::pending_reveals`].

use crate::grow::Cell;

/// How cells are revealed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Everything at once on the first drain
    Instant,
    /// One primer cell, then one cell per elapsed step
    Live,
}

pub struct Playback {
    cells: Vec<Cell>,
    mode: Mode,
    step: f64,
    next: usize,
    pending: Vec<usize>,
    accumulator: f64,
    started: bool,
    finished: bool,
    drawn: bool,
}

impl Playback {
    pub fn new(cells: Vec<Cell>, mode: Mode, step: f64) -> Self {
        let mut playback = Self {
            cells,
            mode,
            step,
            next: 0,
            pending: Vec::new(),
            accumulator: 0.0,
            started: false,
            finished: false,
            drawn: false,
        };
        playback.start();
        playback
    }

    /// Rewind to the beginning of the sequence
    pub fn start(&mut self) {
        self.next = 0;
        self.pending.clear();
        self.accumulator = 0.0;
        self.started = false;
        self.finished = self.cells.is_empty();
        self.drawn = false;
    }

    /// Advance by `dt` seconds
    pub fn tick(&mut self, dt: f64) {
        if self.mode == Mode::Instant || self.finished {
            return;
        }

        if !self.started {
            if self.next < self.cells.len() {
                self.reveal_next();
                self.started = true;
            } else {
                self.finished = true;
                return;
            }
        }

        if self.step <= 0.0 || !self.step.is_finite() {
            while self.next < self.cells.len() {
                self.reveal_next();
            }
            self.finished = true;
            return;
        }

        self.accumulator += dt.max(0.0);
        while self.accumulator >= self.step && self.next < self.cells.len() {
            self.reveal_next();
            self.accumulator -= self.step;
        }

        if self.next >= self.cells.len() {
            self.finished = true;
        }
    }

    /// Reveal every cell before `index` at once (resuming saved progress)
    pub fn skip_to(&mut self, index: usize) {
        let index = index.min(self.cells.len());
        while self.next < index {
            self.reveal_next();
        }
        if self.next > 0 {
            self.started = true;
        }
        if self.next >= self.cells.len() {
            self.finished = true;
        }
    }

    /// Cells revealed since the previous call, in sequence order
    pub fn pending_reveals(&mut self) -> Vec<Cell> {
        if self.mode == Mode::Instant {
            if self.drawn {
                return Vec::new();
            }
            self.drawn = true;
            self.finished = true;
            self.pending.clear();
            self.next = self.cells.len();
            return self.cells.clone();
        }

        self.pending.drain(..).map(|index| self.cells[index]).collect()
    }

    /// Done once the cursor hit the end and nothing is left to draw
    pub fn is_finished(&self) -> bool {
        match self.mode {
            Mode::Instant => self.finished && self.drawn,
            Mode::Live => self.finished && self.pending.is_empty(),
        }
    }

    /// Number of cells revealed so far
    pub fn revealed(&self) -> usize {
        self.next
    }

    fn reveal_next(&mut self) {
        self.pending.push(self.next);
        self.next += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(n: usize) -> Vec<Cell> {
        (0..n)
            .map(|i| Cell {
                x: i as i32,
                y: 0,
                ch: '&',
                color: 2,
                bold: false,
            })
            .collect()
    }

    #[test]
    fn instant_reveals_everything_once() {
        let mut playback = Playback::new(cells(5), Mode::Instant, 0.03);
        playback.tick(1.0);
        assert!(!playback.is_finished());
        assert_eq!(playback.pending_reveals(), cells(5));
        assert!(playback.is_finished());
        assert!(playback.pending_reveals().is_empty());
    }

    #[test]
    fn first_tick_primes_one_cell() {
        let mut playback = Playback::new(cells(5), Mode::Live, 0.25);
        playback.tick(0.0);
        assert_eq!(playback.pending_reveals().len(), 1);
        assert_eq!(playback.revealed(), 1);
    }

    #[test]
    fn long_tick_catches_up() {
        let mut playback = Playback::new(cells(10), Mode::Live, 0.25);
        playback.tick(0.0);
        playback.tick(1.0);
        assert_eq!(playback.revealed(), 5);
        assert_eq!(playback.pending_reveals(), cells(5));
    }

    #[test]
    fn revealed_count_follows_elapsed_time() {
        let mut playback = Playback::new(cells(100), Mode::Live, 0.125);
        let ticks = [0.0, 0.5, 0.0625, 0.0625, 0.25, 0.375];
        let total: f64 = ticks.iter().sum();
        for dt in ticks {
            playback.tick(dt);
        }
        assert_eq!(playback.revealed(), (total / 0.125) as usize + 1);
    }

    #[test]
    fn zero_step_reveals_all() {
        let mut playback = Playback::new(cells(7), Mode::Live, 0.0);
        playback.tick(0.0);
        assert_eq!(playback.pending_reveals().len(), 7);
        assert!(playback.is_finished());

        let mut negative = Playback::new(cells(3), Mode::Live, -1.0);
        negative.tick(0.0);
        assert_eq!(negative.revealed(), 3);
    }

    #[test]
    fn non_finite_step_reveals_all() {
        for step in [f64::NAN, f64::INFINITY] {
            let mut playback = Playback::new(cells(5), Mode::Live, step);
            playback.tick(1.0);
            assert_eq!(playback.pending_reveals(), cells(5));
            assert!(playback.is_finished());
        }
    }

    #[test]
    fn not_finished_until_drained() {
        let mut playback = Playback::new(cells(2), Mode::Live, 0.5);
        playback.tick(0.0);
        playback.tick(0.5);
        assert!(!playback.is_finished());
        assert_eq!(playback.pending_reveals().len(), 2);
        assert!(playback.is_finished());
    }

    #[test]
    fn drains_preserve_order_without_duplicates() {
        let mut playback = Playback::new(cells(20), Mode::Live, 0.25);
        let mut seen = Vec::new();
        while !playback.is_finished() {
            playback.tick(0.375);
            seen.extend(playback.pending_reveals());
        }
        assert_eq!(seen, cells(20));
    }

    #[test]
    fn empty_sequence_finishes_live() {
        let mut playback = Playback::new(Vec::new(), Mode::Live, 0.1);
        assert!(playback.is_finished());
        playback.tick(1.0);
        assert!(playback.pending_reveals().is_empty());
    }

    #[test]
    fn skip_reveals_prefix() {
        let mut playback = Playback::new(cells(10), Mode::Live, 0.5);
        playback.skip_to(4);
        assert_eq!(playback.pending_reveals(), cells(4));
        playback.tick(0.0);
        assert!(playback.pending_reveals().is_empty());
        playback.tick(0.5);
        assert_eq!(playback.pending_reveals()[0].x, 4);
    }

    #[test]
    fn restart_rewinds() {
        let mut playback = Playback::new(cells(3), Mode::Live, 0.0);
        playback.tick(0.0);
        playback.pending_reveals();
        playback.start();
        assert_eq!(playback.revealed(), 0);
        assert!(!playback.is_finished());
    }
}
