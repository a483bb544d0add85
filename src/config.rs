use crate::error::{PaletteError, TimeError};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Leaf glyph used when the configured set is empty or undecodable
pub const DEFAULT_LEAF: &str = "&";

/// Four palette indices: dark leaf, dark wood, light leaf, light wood
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette(pub [u8; 4]);

impl Palette {
    pub fn dark_leaf(&self) -> u8 {
        self.0[0]
    }

    pub fn dark_wood(&self) -> u8 {
        self.0[1]
    }

    pub fn light_leaf(&self) -> u8 {
        self.0[2]
    }

    pub fn light_wood(&self) -> u8 {
        self.0[3]
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self([2, 3, 10, 11])
    }
}

impl FromStr for Palette {
    type Err = PaletteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').filter(|p| !p.is_empty()).collect();
        if parts.len() != 4 {
            return Err(PaletteError::WrongCount(parts.len()));
        }

        let mut indices = [0u8; 4];
        for (slot, part) in indices.iter_mut().zip(&parts) {
            *slot = part
                .trim()
                .parse::<u8>()
                .map_err(|_| PaletteError::InvalidIndex(part.to_string()))?;
        }
        Ok(Self(indices))
    }
}

/// Non-empty set of leaf glyph strings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Leaves(Vec<String>);

impl Leaves {
    /// Drops empty entries, falling back to [`DEFAULT_LEAF`]
    pub fn new<I, S>(leaves: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let kept: Vec<String> = leaves
            .into_iter()
            .map(Into::into)
            .filter(|leaf| !leaf.is_empty())
            .collect();

        if kept.is_empty() {
            Self(vec![DEFAULT_LEAF.to_string()])
        } else {
            Self(kept)
        }
    }

    /// Decode raw byte strings as UTF-8, skipping invalid sequences
    pub fn from_bytes<I, B>(raw: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: AsRef<[u8]>,
    {
        Self::new(raw.into_iter().map(|bytes| {
            bytes
                .as_ref()
                .utf8_chunks()
                .map(|chunk| chunk.valid())
                .collect::<String>()
        }))
    }

    /// Split a comma-delimited list as given on the command line
    pub fn parse_list(list: impl AsRef<[u8]>) -> Self {
        Self::from_bytes(list.as_ref().split(|&b| b == b','))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> &str {
        self.0.get(index).map(String::as_str).unwrap_or(DEFAULT_LEAF)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl Default for Leaves {
    fn default() -> Self {
        Self(vec![DEFAULT_LEAF.to_string()])
    }
}

/// A positive number of seconds that a `Duration` can hold
pub fn checked_seconds(seconds: f64) -> Option<f64> {
    if seconds > 0.0 && Duration::try_from_secs_f64(seconds).is_ok() {
        Some(seconds)
    } else {
        None
    }
}

/// `-t/--time` value parser
pub fn parse_step(s: &str) -> Result<f64, TimeError> {
    parse_seconds(s).ok_or_else(|| TimeError::Step(s.to_string()))
}

/// `-w/--wait` value parser
pub fn parse_wait(s: &str) -> Result<f64, TimeError> {
    parse_seconds(s).ok_or_else(|| TimeError::Wait(s.to_string()))
}

fn parse_seconds(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().and_then(checked_seconds)
}

/// Immutable input to a growth run
#[derive(Clone, Debug)]
pub struct GrowthConfig {
    pub life_start: i32,
    pub multiplier: i32,
    pub palette: Palette,
    pub leaves: Leaves,
    /// 0 draws a seed from entropy
    pub seed: u64,
}

impl Default for GrowthConfig {
    fn default() -> Self {
        Self {
            life_start: 32,
            multiplier: 5,
            palette: Palette::default(),
            leaves: Leaves::default(),
            seed: 0,
        }
    }
}

/// Configuration for the bonsai program around the growth core
#[derive(Clone, Debug)]
pub struct BonsaiConfig {
    pub growth: GrowthConfig,
    pub live: bool,
    pub infinite: bool,
    pub screensaver: bool,
    pub print: bool,
    pub time_step: f64,
    pub time_wait: f64,
    pub base_type: u8,
    pub message: Option<String>,
    pub save: Option<PathBuf>,
    pub load: Option<PathBuf>,
}

impl Default for BonsaiConfig {
    fn default() -> Self {
        Self {
            growth: GrowthConfig::default(),
            live: false,
            infinite: false,
            screensaver: false,
            print: false,
            time_step: 0.03,
            time_wait: 4.0,
            base_type: 1,
            message: None,
            save: None,
            load: None,
        }
    }
}

/// Branch types for bonsai tree
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BranchType {
    Trunk,
    ShootLeft,
    ShootRight,
    Dying,
    Dead,
}

impl BranchType {
    pub fn is_shoot(self) -> bool {
        matches!(self, BranchType::ShootLeft | BranchType::ShootRight)
    }
}

/// Counters shared across one whole growth run
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Counters {
    pub branches: u32,
    pub shoots: u32,
    pub shoot_counter: i32,
}
