//! Terminal bonsai trees.
//!
//! - [`grow`] turns a seed and a life budget into an ordered list of cells.
//! - [`glyph`] picks the characters and colors those cells carry.
//! - [`playback`] paces the reveal of a grown tree, instantly or live.
//! - [`bonsai`] wires those to a crossterm [`terminal`] for the binary.

pub mod bonsai;
pub mod config;
pub mod dice;
pub mod error;
pub mod glyph;
pub mod grow;
pub mod help;
pub mod persist;
pub mod playback;
pub mod settings;
pub mod terminal;

pub use config::{BonsaiConfig, BranchType, Counters, GrowthConfig, Leaves, Palette};
pub use grow::{generate, grow, Cell, Tree};
pub use playback::{Mode, Playback};
