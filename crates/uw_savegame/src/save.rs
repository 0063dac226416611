//! Savegame header and slot management

use crate::stream::{SavegameReader, SavegameWriter};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::collections::HashMap;
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Save system errors
#[derive(Debug, Error)]
pub enum SaveError {
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Section name read differs from the expected one
    #[error("Section name mismatch: expected {expected:?}, found {found:?}")]
    SectionMismatch { expected: String, found: String },
    /// Stream ended in the middle of a value
    #[error("Unexpected end of savegame at offset {offset} (wanted {wanted} bytes)")]
    UnexpectedEof { offset: usize, wanted: usize },
    /// String bytes are not UTF-8
    #[error("Invalid string at offset {offset}")]
    InvalidString { offset: usize },
    /// Version mismatch
    #[error("Version mismatch: save version {0}, current version {1}")]
    VersionMismatch(u32, u32),
    /// Slot not found
    #[error("Save slot not found: {0}")]
    SlotNotFound(String),
    /// Gzip layer failed
    #[error("Compression error: {0}")]
    Compression(String),
}

/// Savegame header, shown in the savegames screen
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveHeader {
    /// Savegame title
    pub title: String,
    /// Prefix of the game the savegame belongs to (e.g. "uw1")
    pub game_prefix: String,
    /// Save timestamp (Unix timestamp); stored since version 2
    pub timestamp: u64,
    /// Player name; stored since version 3
    pub player_name: String,
}

impl SaveHeader {
    /// Create a new header stamped with the current time
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            game_prefix: String::new(),
            timestamp: std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
            player_name: String::new(),
        }
    }

    /// Set game prefix
    pub fn with_game_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.game_prefix = prefix.into();
        self
    }

    /// Set player name
    pub fn with_player_name(mut self, name: impl Into<String>) -> Self {
        self.player_name = name.into();
        self
    }

    pub(crate) fn write(&self, sg: &mut SavegameWriter) {
        sg.write_string(&self.title);
        sg.write_string(&self.game_prefix);
        sg.write_u32(self.timestamp as u32);
        sg.write_u32((self.timestamp >> 32) as u32);
        sg.write_string(&self.player_name);
    }

    pub(crate) fn read(sg: &mut SavegameReader) -> Result<Self, SaveError> {
        let mut header = Self {
            title: sg.read_string()?,
            game_prefix: sg.read_string()?,
            ..Self::default()
        };

        if sg.version() >= 2 {
            let low = sg.read_u32()? as u64;
            let high = sg.read_u32()? as u64;
            header.timestamp = high << 32 | low;
        }

        if sg.version() >= 3 {
            header.player_name = sg.read_string()?;
        }

        Ok(header)
    }
}

/// Save slot info (for displaying in UI)
#[derive(Debug, Clone)]
pub struct SaveSlot {
    /// Slot identifier
    pub id: String,
    /// Save header (or None if empty)
    pub header: Option<SaveHeader>,
    /// File path
    pub path: PathBuf,
}

impl SaveSlot {
    /// Create an empty slot
    pub fn empty(id: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            id: id.into(),
            header: None,
            path: path.into(),
        }
    }

    /// Create an occupied slot
    pub fn occupied(id: impl Into<String>, path: impl Into<PathBuf>, header: SaveHeader) -> Self {
        Self {
            id: id.into(),
            header: Some(header),
            path: path.into(),
        }
    }

    /// Whether slot is occupied
    pub fn is_occupied(&self) -> bool {
        self.header.is_some()
    }
}

/// Slot id of the quicksave savegame
pub const QUICKSAVE_SLOT: &str = "quicksave";

/// File extension of savegames
const SAVEGAME_EXT: &str = "uas";

/// Save manager
///
/// Savegames are stored gzip-compressed as `<slot>.uas` in one folder.
/// Numbered slots are named `uasave00001`, `uasave00002`, ...
pub struct SaveManager {
    /// Base save directory
    save_dir: PathBuf,
    /// Cached slot info
    slots: HashMap<String, SaveSlot>,
}

impl SaveManager {
    /// Create a new save manager
    pub fn new(save_dir: impl Into<PathBuf>) -> Self {
        Self {
            save_dir: save_dir.into(),
            slots: HashMap::new(),
        }
    }

    /// Get the save directory
    pub fn save_dir(&self) -> &Path {
        &self.save_dir
    }

    /// Ensure save directory exists
    pub fn ensure_dir(&self) -> Result<(), SaveError> {
        fs::create_dir_all(&self.save_dir)?;
        Ok(())
    }

    /// Slot id of the numbered slot `index`
    pub fn numbered_slot(index: u32) -> String {
        format!("uasave{:05}", index)
    }

    /// Get save file path for a slot
    fn slot_path(&self, slot: &str) -> PathBuf {
        self.save_dir.join(format!("{}.{}", slot, SAVEGAME_EXT))
    }

    /// Save game to slot
    pub fn save(&mut self, slot: &str, savegame: SavegameWriter) -> Result<PathBuf, SaveError> {
        self.ensure_dir()?;

        let path = self.slot_path(slot);
        let header = savegame.header().clone();

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder
            .write_all(&savegame.finish())
            .map_err(|e| SaveError::Compression(e.to_string()))?;
        let bytes = encoder
            .finish()
            .map_err(|e| SaveError::Compression(e.to_string()))?;

        fs::write(&path, bytes)?;
        log::info!("saved game {:?} to {}", header.title, path.display());

        self.slots
            .insert(slot.to_string(), SaveSlot::occupied(slot, path.clone(), header));

        Ok(path)
    }

    /// Load game from slot
    pub fn load(&self, slot: &str) -> Result<SavegameReader, SaveError> {
        let path = self.slot_path(slot);

        if !path.exists() {
            return Err(SaveError::SlotNotFound(slot.to_string()));
        }

        let compressed = fs::read(&path)?;
        let mut bytes = Vec::new();
        GzDecoder::new(compressed.as_slice())
            .read_to_end(&mut bytes)
            .map_err(|e| SaveError::Compression(e.to_string()))?;

        let reader = SavegameReader::new(bytes)?;
        log::info!(
            "loading game {:?} (version {}) from {}",
            reader.header().title,
            reader.version(),
            path.display()
        );

        Ok(reader)
    }

    /// Delete a save slot
    pub fn delete(&mut self, slot: &str) -> Result<(), SaveError> {
        let path = self.slot_path(slot);

        if path.exists() {
            fs::remove_file(&path)?;
        }

        self.slots.remove(slot);
        Ok(())
    }

    /// Check if slot exists
    pub fn exists(&self, slot: &str) -> bool {
        self.slot_path(slot).exists()
    }

    /// Get slot info
    pub fn get_slot(&mut self, slot: &str) -> Result<SaveSlot, SaveError> {
        if let Some(cached) = self.slots.get(slot) {
            return Ok(cached.clone());
        }

        let path = self.slot_path(slot);

        if !path.exists() {
            return Ok(SaveSlot::empty(slot, path));
        }

        let reader = self.load(slot)?;
        let slot_info = SaveSlot::occupied(slot, path, reader.header().clone());
        self.slots.insert(slot.to_string(), slot_info.clone());

        Ok(slot_info)
    }

    /// List all save slots, newest first
    pub fn list_slots(&mut self) -> Result<Vec<SaveSlot>, SaveError> {
        self.ensure_dir()?;

        let mut slots = Vec::new();

        for entry in fs::read_dir(&self.save_dir)? {
            let path = entry?.path();

            if path.extension().map(|e| e == SAVEGAME_EXT).unwrap_or(false) {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    match self.get_slot(stem) {
                        Ok(slot) => slots.push(slot),
                        Err(e) => log::warn!("skipping unreadable savegame {}: {}", path.display(), e),
                    }
                }
            }
        }

        slots.sort_by(|a, b| {
            let ts_a = a.header.as_ref().map(|h| h.timestamp).unwrap_or(0);
            let ts_b = b.header.as_ref().map(|h| h.timestamp).unwrap_or(0);
            ts_b.cmp(&ts_a)
        });

        Ok(slots)
    }

    /// Id of the first numbered slot without a savegame
    pub fn next_free_slot(&self) -> String {
        (1..)
            .map(Self::numbered_slot)
            .find(|slot| !self.exists(slot))
            .unwrap_or_else(|| Self::numbered_slot(1))
    }

    /// Quick save
    pub fn quicksave(&mut self, savegame: SavegameWriter) -> Result<PathBuf, SaveError> {
        self.save(QUICKSAVE_SLOT, savegame)
    }

    /// Quick load
    pub fn quickload(&self) -> Result<SavegameReader, SaveError> {
        self.load(QUICKSAVE_SLOT)
    }

    /// Check if a quicksave savegame is available
    pub fn has_quicksave(&self) -> bool {
        self.exists(QUICKSAVE_SLOT)
    }
}
