//! An in-memory ordered map built on a randomized skiplist.
//!
//! Search, insert and delete run in expected `O(log n)`; iteration walks the
//! bottom level in ascending key order. The map is single threaded and has no
//! interior locking.

mod error;
mod iterator;
mod options;
mod skipmap;
mod utils;

#[cfg(test)]
mod datadriven;

pub use error::{Error, Result};
pub use iterator::{Iter, Keys, Values};
pub use options::{Options, DEFAULT_MAX_LEVEL, DEFAULT_PROBABILITY};
pub use skipmap::SkipMap;
