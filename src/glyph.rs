//! Glyph and color choice for a single growth step.
//!
//! Both functions consume draws from the shared [`Dice`]; the number and
//! order of draws is part of what makes a seeded tree reproducible.

use crate::config::{BranchType, Leaves, Palette};
use crate::dice::Dice;

/// Pick the string drawn at a branch's new position.
///
/// Branches with fewer than four steps of life left are drawn as leaves
/// regardless of their structural type.
pub fn choose_glyph<'a>(
    dice: &mut Dice,
    leaves: &'a Leaves,
    branch_type: BranchType,
    life: i32,
    dx: i32,
    dy: i32,
) -> &'a str {
    let branch_type = if life < 4 { BranchType::Dying } else { branch_type };

    match branch_type {
        BranchType::Trunk => {
            if dy == 0 {
                "/~"
            } else if dx < 0 {
                "\\|"
            } else if dx == 0 {
                "/|\\"
            } else {
                "|/"
            }
        }
        BranchType::ShootLeft => match (dy.signum(), dx.signum()) {
            (1, _) => "\\",
            (0, _) => "\\_",
            (_, -1) => "\\|",
            (_, 0) => "/|",
            _ => "/",
        },
        BranchType::ShootRight => match (dy.signum(), dx.signum()) {
            (1, _) => "/",
            (0, _) => "_/",
            (_, -1) => "\\|",
            (_, 0) => "/|",
            _ => "/",
        },
        BranchType::Dying | BranchType::Dead => {
            let index = dice.roll(leaves.len() as i32);
            leaves.get(index as usize)
        }
    }
}

/// Pick `(palette index, bold)` for a branch type
pub fn choose_color(dice: &mut Dice, palette: &Palette, branch_type: BranchType) -> (u8, bool) {
    match branch_type {
        BranchType::Trunk | BranchType::ShootLeft | BranchType::ShootRight => {
            if dice.roll(2) == 0 {
                (palette.light_wood(), true)
            } else {
                (palette.dark_wood(), false)
            }
        }
        BranchType::Dying => (palette.light_leaf(), dice.roll(10) == 0),
        BranchType::Dead => (palette.dark_leaf(), dice.roll(3) == 0),
    }
}
