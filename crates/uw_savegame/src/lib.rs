//! Underworld Savegame - savegame streams and slots
//!
//! This crate provides the persistence layer the game state is written through.
//!
//! # Features
//!
//! - Section-framed binary streams (`begin_section`/`end_section`)
//! - Little-endian 8/16/32-bit integers and length-prefixed strings
//! - Versioned savegame header (title, game prefix, player name, timestamp)
//! - Gzip-compressed savegame files with numbered slots and a quicksave slot
//!
//! # Example
//!
//! ```ignore
//! use uw_savegame::prelude::*;
//!
//! let mut sg = SavegameWriter::new(SaveHeader::new("Before the Abyss"));
//! sg.begin_section("inventory");
//! sg.write_u16(0x0100);
//! sg.end_section();
//!
//! let mut manager = SaveManager::new("saves");
//! manager.save("uasave00001", sg)?;
//! ```

pub mod save;
pub mod stream;

pub mod prelude {
    pub use crate::save::{SaveError, SaveHeader, SaveManager, SaveSlot};
    pub use crate::stream::{SavegameReader, SavegameWriter, CURRENT_VERSION};
}

pub use prelude::*;
