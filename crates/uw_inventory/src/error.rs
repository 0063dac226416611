//! Inventory errors

use thiserror::Error;
use uw_savegame::SaveError;

/// Inventory errors
///
/// Only hard failures are errors. Soft failures of user actions (container
/// full, wrong item class, no free quick-slot) are reported as `false`/`None`
/// by the operation itself and leave the inventory unchanged.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// Object pool reached the 16-bit index limit
    #[error("Inventory object pool exhausted; already at maximum size of {0} entries")]
    PoolExhausted(usize),
    /// IO error while reading data files
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Savegame stream error
    #[error("Savegame error: {0}")]
    Save(#[from] SaveError),
    /// Loaded or checked inventory data is inconsistent
    #[error("Corrupt inventory data: {0}")]
    Corrupt(String),
    /// Combine rule data ends in the middle of a record
    #[error("Combine rule table truncated: {0} trailing bytes")]
    CombineTableTruncated(usize),
    /// Object property table could not be parsed
    #[error("Invalid object property table: {0}")]
    Properties(#[from] toml::de::Error),
}
