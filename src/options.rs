use crate::error::{Error, Result};

pub const DEFAULT_MAX_LEVEL: usize = 32;
pub const DEFAULT_PROBABILITY: f64 = 0.5;

/// Shape parameters of a [`SkipMap`](crate::SkipMap).
///
/// `max_level` bounds the height of every node, `probability` is the chance
/// that a freshly inserted node climbs one more level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Options {
    pub max_level: usize,
    pub probability: f64,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            max_level: DEFAULT_MAX_LEVEL,
            probability: DEFAULT_PROBABILITY,
        }
    }
}

impl Options {
    pub fn with_max_level(mut self, max_level: usize) -> Self {
        self.max_level = max_level;
        self
    }

    pub fn with_probability(mut self, probability: f64) -> Self {
        self.probability = probability;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_level < 1 {
            return Err(Error::InvalidConfiguration(format!(
                "max_level must be at least 1, got {}",
                self.max_level
            )));
        }
        // NaN fails both comparisons
        if !(self.probability > 0.0 && self.probability < 1.0) {
            return Err(Error::InvalidConfiguration(format!(
                "probability must be in (0, 1), got {}",
                self.probability
            )));
        }
        Ok(())
    }
}
