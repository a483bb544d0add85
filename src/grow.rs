//! Bonsai growth engine.
//!
//! Turns a seed, a life budget and grid dimensions into an ordered list of
//! [`Cell`]s. Growth is a depth-first branching process: a branch that
//! spawns a child lets the child grow to completion before it takes its own
//! step, so the cell order matches a recursive walk while the call stack
//! stays flat.

use crate::config::{BranchType, Counters, GrowthConfig};
use crate::dice::Dice;
use crate::glyph::{choose_color, choose_glyph};
use unicode_width::UnicodeWidthChar;

/// One positioned, colored glyph of the tree
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
    pub ch: char,
    pub color: u8,
    pub bold: bool,
}

/// Result of a growth run
#[derive(Clone, Debug, Default)]
pub struct Tree {
    pub cells: Vec<Cell>,
    pub counters: Counters,
    /// Seed actually used (entropy-derived when the config said 0)
    pub seed: u64,
    /// Index into `cells` where each started branch began emitting
    pub branch_starts: Vec<usize>,
}

impl Tree {
    /// Number of cells emitted before branch `count` started
    pub fn cells_before_branch(&self, count: u32) -> usize {
        if count == 0 {
            return 0;
        }
        self.branch_starts
            .get(count as usize)
            .copied()
            .unwrap_or(self.cells.len())
    }

    /// Branches whose first cell lies before `revealed`
    pub fn branches_started(&self, revealed: usize) -> u32 {
        self.branch_starts
            .iter()
            .take_while(|&&start| start < revealed)
            .count() as u32
    }
}

/// A branch in progress
struct BranchTask {
    x: i32,
    y: i32,
    branch_type: BranchType,
    life: i32,
    shoot_cooldown: i32,
    /// Move computed before a child was spawned, applied once it finishes
    pending: Option<(i32, i32)>,
}

/// Grow a tree and return its cells in growth order
pub fn generate(height: i32, width: i32, config: &GrowthConfig) -> Vec<Cell> {
    grow(height, width, config).cells
}

/// Grow a tree, keeping counters and branch boundaries alongside the cells
pub fn grow(height: i32, width: i32, config: &GrowthConfig) -> Tree {
    let dice = Dice::new(config.seed);
    let seed = dice.seed();
    if height <= 0 || width <= 0 {
        return Tree {
            seed,
            ..Tree::default()
        };
    }

    let mut grower = Grower {
        config,
        multiplier: config.multiplier.max(1),
        height,
        width,
        dice,
        tree: Tree {
            seed,
            ..Tree::default()
        },
    };
    grower.tree.counters.shoot_counter = grower.dice.roll(1000);
    grower.run(height - 1, width / 2);

    let tree = grower.tree;
    tracing::debug!(
        seed = tree.seed,
        branches = tree.counters.branches,
        shoots = tree.counters.shoots,
        cells = tree.cells.len(),
        "tree grown"
    );
    tree
}

struct Grower<'a> {
    config: &'a GrowthConfig,
    multiplier: i32,
    height: i32,
    width: i32,
    dice: Dice,
    tree: Tree,
}

impl Grower<'_> {
    fn run(&mut self, start_y: i32, start_x: i32) {
        let mut stack: Vec<BranchTask> = Vec::with_capacity(64);
        if let Some(trunk) = self.start_branch(start_x, start_y, self.config.life_start, BranchType::Trunk) {
            stack.push(trunk);
        }

        while let Some(task) = stack.last_mut() {
            if let Some((dx, dy)) = task.pending.take() {
                task.shoot_cooldown -= 1;
                task.x = (task.x + dx).clamp(0, self.width - 1);
                task.y = (task.y + dy).clamp(0, self.height - 1);

                let (x, y, branch_type, life) = (task.x, task.y, task.branch_type, task.life);
                let (color, bold) = choose_color(&mut self.dice, &self.config.palette, branch_type);
                let glyph = choose_glyph(&mut self.dice, &self.config.leaves, branch_type, life, dx, dy);
                emit(&mut self.tree.cells, self.width, self.height, x, y, glyph, color, bold);
                continue;
            }

            if task.life <= 0 {
                stack.pop();
                continue;
            }

            task.life -= 1;
            let age = self.config.life_start - task.life;
            let (dx, mut dy) = deltas(&mut self.dice, task.branch_type, task.life, age, self.multiplier);

            if dy > 0 && task.y > self.height - 2 {
                dy -= 1;
            }
            task.pending = Some((dx, dy));

            let child = self.spawn(task);
            if let Some(child) = child {
                stack.push(child);
            }
        }
    }

    /// Decide whether the branch forks before its next move
    fn spawn(&mut self, task: &mut BranchTask) -> Option<BranchTask> {
        let (x, y, life) = (task.x, task.y, task.life);
        let multiplier = self.multiplier;

        if life < 3 {
            return self.start_branch(x, y, life, BranchType::Dead);
        }

        let trunk = task.branch_type == BranchType::Trunk;
        if (trunk || task.branch_type.is_shoot()) && life < multiplier + 2 {
            return self.start_branch(x, y, life, BranchType::Dying);
        }

        if trunk && (self.dice.roll(3) == 0 || life % multiplier == 0) {
            if self.dice.roll(8) == 0 && life > 7 {
                task.shoot_cooldown = multiplier * 2;
                let extra_life = self.dice.roll(5) - 2;
                return self.start_branch(x, y, life + extra_life, BranchType::Trunk);
            } else if task.shoot_cooldown <= 0 {
                task.shoot_cooldown = multiplier * 2;
                let counters = &mut self.tree.counters;
                counters.shoots += 1;
                counters.shoot_counter += 1;
                let shoot_type = if counters.shoot_counter % 2 == 0 {
                    BranchType::ShootRight
                } else {
                    BranchType::ShootLeft
                };
                return self.start_branch(x, y, life + multiplier, shoot_type);
            }
        }

        None
    }

    fn start_branch(&mut self, x: i32, y: i32, life: i32, branch_type: BranchType) -> Option<BranchTask> {
        if life <= 0 {
            return None;
        }
        self.tree.counters.branches += 1;
        self.tree.branch_starts.push(self.tree.cells.len());
        Some(BranchTask {
            x,
            y,
            branch_type,
            life,
            shoot_cooldown: self.multiplier,
            pending: None,
        })
    }
}

/// Append one cell per character, advancing by display width
#[allow(clippy::too_many_arguments)]
fn emit(cells: &mut Vec<Cell>, width: i32, height: i32, x: i32, y: i32, glyph: &str, color: u8, bold: bool) {
    let mut current_x = x;
    for ch in glyph.chars() {
        let advance = ch.width().unwrap_or(0).max(1) as i32;
        if (0..width).contains(&current_x) && (0..height).contains(&y) {
            cells.push(Cell {
                x: current_x,
                y,
                ch,
                color,
                bold,
            });
        }
        current_x += advance;
    }
}

/// Movement policy: `(dx, dy)` for one step of a branch
fn deltas(dice: &mut Dice, branch_type: BranchType, life: i32, age: i32, multiplier: i32) -> (i32, i32) {
    match branch_type {
        BranchType::Trunk => {
            if age <= 2 || life < 4 {
                // Young or spent trunk: lateral jitter only
                (dice.roll(3) - 1, 0)
            } else if age < multiplier * 3 {
                let step = ((multiplier as f32 * 0.5) as i32).max(1);
                let dy = if age % step == 0 { -1 } else { 0 };
                let dx = match dice.roll(10) {
                    0 => -2,
                    1..=3 => -1,
                    4..=5 => 0,
                    6..=8 => 1,
                    _ => 2,
                };
                (dx, dy)
            } else {
                let dy = if dice.roll(10) > 2 { -1 } else { 0 };
                (dice.roll(3) - 1, dy)
            }
        }
        BranchType::ShootLeft | BranchType::ShootRight => {
            let dy = match dice.roll(10) {
                0..=1 => -1,
                2..=7 => 0,
                _ => 1,
            };
            let dx = match dice.roll(10) {
                0..=1 => 2,
                2..=5 => 1,
                6..=8 => 0,
                _ => -1,
            };
            if branch_type == BranchType::ShootLeft {
                (-dx, dy)
            } else {
                (dx, dy)
            }
        }
        BranchType::Dying => {
            let dy = match dice.roll(10) {
                0..=1 => -1,
                2..=8 => 0,
                _ => 1,
            };
            let dx = match dice.roll(15) {
                0 => -3,
                1..=2 => -2,
                3..=5 => -1,
                6..=8 => 0,
                9..=11 => 1,
                12..=13 => 2,
                _ => 3,
            };
            (dx, dy)
        }
        BranchType::Dead => {
            let dy = match dice.roll(10) {
                0..=2 => -1,
                3..=6 => 0,
                _ => 1,
            };
            (dice.roll(3) - 1, dy)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Leaves;

    fn config(seed: u64) -> GrowthConfig {
        GrowthConfig {
            seed,
            ..GrowthConfig::default()
        }
    }

    #[test]
    fn same_seed_same_tree() {
        let a = generate(30, 60, &config(1234));
        let b = generate(30, 60, &config(1234));
        assert!(!a.is_empty());
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_differ() {
        let a = generate(30, 60, &config(1));
        let b = generate(30, 60, &config(2));
        assert_ne!(a, b);
    }

    #[test]
    fn cells_stay_inside_grid() {
        for seed in 1..40 {
            for &(h, w) in &[(1, 1), (3, 5), (10, 20), (24, 80)] {
                for cell in generate(h, w, &config(seed)) {
                    assert!((0..w).contains(&cell.x), "x {} outside {}", cell.x, w);
                    assert!((0..h).contains(&cell.y), "y {} outside {}", cell.y, h);
                }
            }
        }
    }

    #[test]
    fn empty_grid_yields_nothing() {
        assert!(generate(0, 20, &config(5)).is_empty());
        assert!(generate(20, 0, &config(5)).is_empty());
        assert!(generate(-3, 20, &config(5)).is_empty());
    }

    #[test]
    fn zero_life_yields_nothing() {
        let mut cfg = config(5);
        cfg.life_start = 0;
        let tree = grow(20, 40, &cfg);
        assert!(tree.cells.is_empty());
        assert_eq!(tree.counters.branches, 0);

        cfg.life_start = -10;
        assert!(generate(20, 40, &cfg).is_empty());
    }

    #[test]
    fn large_budget_terminates() {
        let mut cfg = config(77);
        cfg.life_start = 200;
        cfg.multiplier = 20;
        let tree = grow(50, 120, &cfg);
        assert!(tree.counters.branches > 1);
    }

    #[test]
    fn zero_multiplier_is_treated_as_one() {
        let mut cfg = config(8);
        cfg.multiplier = 0;
        let zero = generate(20, 40, &cfg);
        cfg.multiplier = 1;
        let one = generate(20, 40, &cfg);
        assert_eq!(zero, one);
    }

    #[test]
    fn empty_leaf_set_uses_default_leaf() {
        let mut cfg = config(21);
        cfg.leaves = Leaves::new(Vec::<String>::new());
        let cells = generate(24, 80, &cfg);
        let leaf_colors = [cfg.palette.dark_leaf(), cfg.palette.light_leaf()];
        let leaf_cells: Vec<&Cell> = cells.iter().filter(|c| leaf_colors.contains(&c.color)).collect();
        assert!(!leaf_cells.is_empty());
        assert!(leaf_cells.iter().all(|c| c.ch == '&'));
    }

    #[test]
    fn wide_leaves_advance_by_display_width() {
        let mut cells = Vec::new();
        emit(&mut cells, 10, 2, 0, 1, "🌸a", 3, false);
        assert_eq!(cells.len(), 2);
        assert_eq!(cells[0].x, 0);
        assert_eq!(cells[1].x, 2);
    }

    #[test]
    fn zero_width_chars_still_advance() {
        let mut cells = Vec::new();
        emit(&mut cells, 10, 2, 0, 0, "a\u{301}b", 3, false);
        let xs: Vec<i32> = cells.iter().map(|c| c.x).collect();
        assert_eq!(xs, vec![0, 1, 2]);
    }

    #[test]
    fn emit_drops_cells_past_right_edge() {
        let mut cells = Vec::new();
        emit(&mut cells, 3, 2, 2, 0, "/|\\", 3, true);
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].ch, '/');
    }

    #[test]
    fn branch_starts_track_counters() {
        let tree = grow(24, 80, &config(99));
        assert_eq!(tree.branch_starts.len() as u32, tree.counters.branches);
        assert_eq!(tree.branch_starts[0], 0);
        assert!(tree.branch_starts.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(tree.cells_before_branch(0), 0);
        assert_eq!(tree.cells_before_branch(u32::MAX), tree.cells.len());
        assert_eq!(tree.branches_started(tree.cells.len()), tree.counters.branches);
    }

    #[test]
    fn trunks_sprout_shoots() {
        let shoots: u32 = (1..20).map(|seed| grow(40, 100, &config(seed)).counters.shoots).sum();
        assert!(shoots > 0);
    }
}
