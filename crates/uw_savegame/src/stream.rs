//! Section-framed savegame streams
//!
//! A savegame is a flat little-endian byte stream. Every logical block starts
//! with `begin_section(name)`, which writes the section name as a
//! length-prefixed string; loading reads the name back and fails if it doesn't
//! match. The first section is always the `"header"` section carrying the
//! savegame version and the [`SaveHeader`].

use crate::save::{SaveError, SaveHeader};

/// Current savegame version; older versions can still be loaded
pub const CURRENT_VERSION: u32 = 3;

/// Name of the header section
const HEADER_SECTION: &str = "header";

/// Savegame stream opened for saving
#[derive(Debug)]
pub struct SavegameWriter {
    buffer: Vec<u8>,
    header: SaveHeader,
    section: Option<String>,
}

impl SavegameWriter {
    /// Create a new savegame stream and write its header section
    pub fn new(header: SaveHeader) -> Self {
        let mut writer = Self {
            buffer: Vec::with_capacity(4096),
            header,
            section: None,
        };

        writer.begin_section(HEADER_SECTION);
        writer.write_u32(CURRENT_VERSION);
        let header = writer.header.clone();
        header.write(&mut writer);
        writer.end_section();

        writer
    }

    /// Savegame version written by this stream
    pub fn version(&self) -> u32 {
        CURRENT_VERSION
    }

    /// Get the header
    pub fn header(&self) -> &SaveHeader {
        &self.header
    }

    /// Start a new section
    pub fn begin_section(&mut self, name: &str) {
        debug_assert!(self.section.is_none(), "section {:?} not ended", self.section);
        self.write_string(name);
        self.section = Some(name.to_string());
    }

    /// End the current section
    pub fn end_section(&mut self) {
        debug_assert!(self.section.is_some(), "no section to end");
        self.section = None;
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buffer.push(value);
    }

    pub fn write_u16(&mut self, value: u16) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_u32(&mut self, value: u32) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    /// Write a string with a 16-bit length prefix
    ///
    /// Longer strings are truncated at 65535 bytes.
    pub fn write_string(&mut self, text: &str) {
        let bytes = text.as_bytes();
        let len = bytes.len().min(u16::MAX as usize);
        self.write_u16(len as u16);
        self.buffer.extend_from_slice(&bytes[..len]);
    }

    /// Number of bytes written so far
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Finish the stream and return the raw bytes
    pub fn finish(self) -> Vec<u8> {
        debug_assert!(self.section.is_none(), "section {:?} not ended", self.section);
        self.buffer
    }
}

/// Savegame stream opened for loading
#[derive(Debug)]
pub struct SavegameReader {
    buffer: Vec<u8>,
    cursor: usize,
    version: u32,
    header: SaveHeader,
}

impl SavegameReader {
    /// Open a savegame stream and read its header section
    pub fn new(buffer: Vec<u8>) -> Result<Self, SaveError> {
        let mut reader = Self {
            buffer,
            cursor: 0,
            version: CURRENT_VERSION,
            header: SaveHeader::default(),
        };

        reader.begin_section(HEADER_SECTION)?;
        let version = reader.read_u32()?;
        if version > CURRENT_VERSION {
            log::warn!(
                "cannot load savegames of newer version {} (only up to {} is supported)",
                version,
                CURRENT_VERSION
            );
            return Err(SaveError::VersionMismatch(version, CURRENT_VERSION));
        }
        reader.version = version;
        reader.header = SaveHeader::read(&mut reader)?;
        reader.end_section();

        Ok(reader)
    }

    /// Version of the savegame being loaded
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Get the header
    pub fn header(&self) -> &SaveHeader {
        &self.header
    }

    /// Start reading a section; fails when the stored name differs
    pub fn begin_section(&mut self, name: &str) -> Result<(), SaveError> {
        let found = self.read_string()?;
        if found != name {
            return Err(SaveError::SectionMismatch {
                expected: name.to_string(),
                found,
            });
        }
        Ok(())
    }

    /// End the current section
    pub fn end_section(&mut self) {}

    fn take(&mut self, count: usize) -> Result<&[u8], SaveError> {
        let end = self.cursor + count;
        if end > self.buffer.len() {
            return Err(SaveError::UnexpectedEof {
                offset: self.cursor,
                wanted: count,
            });
        }
        let bytes = &self.buffer[self.cursor..end];
        self.cursor = end;
        Ok(bytes)
    }

    pub fn read_u8(&mut self) -> Result<u8, SaveError> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, SaveError> {
        let bytes = self.take(2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    pub fn read_u32(&mut self) -> Result<u32, SaveError> {
        let bytes = self.take(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Read a string with a 16-bit length prefix
    pub fn read_string(&mut self) -> Result<String, SaveError> {
        let len = self.read_u16()? as usize;
        let bytes = self.take(len)?.to_vec();
        String::from_utf8(bytes).map_err(|_| SaveError::InvalidString {
            offset: self.cursor - len,
        })
    }

    /// Number of bytes not read yet
    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.cursor
    }
}
