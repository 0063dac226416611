//! Object pool
//!
//! A growable array of [`ObjectRecord`]s addressed by 16-bit [`ObjectPos`].
//! Positions below [`SLOT_MAX`] are the fixed slots; everything above is
//! handed out by [`ObjectPool::allocate`].

use crate::error::InventoryError;
use crate::object::ObjectRecord;
use crate::slots::SLOT_MAX;
use uw_core::ObjectPos;

/// Pool size a new inventory starts with
pub const INITIAL_POOL_SIZE: usize = 0x100;

/// Largest possible pool; `0xffff` is reserved as the "no slot" sentinel
pub const MAX_POOL_SIZE: usize = 0xffff;

/// Growable array of object records
#[derive(Debug, Clone)]
pub struct ObjectPool {
    records: Vec<ObjectRecord>,
}

impl ObjectPool {
    /// Create a pool with `size` free records
    pub fn new(size: usize) -> Self {
        let size = size.clamp(SLOT_MAX as usize + 1, MAX_POOL_SIZE);
        Self {
            records: vec![ObjectRecord::default(); size],
        }
    }

    /// Create a pool from already populated records
    pub(crate) fn from_records(records: Vec<ObjectRecord>) -> Self {
        debug_assert!(records.len() <= MAX_POOL_SIZE);
        Self { records }
    }

    /// Number of records, used or not
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records in use
    pub fn used(&self) -> usize {
        self.records.iter().filter(|r| !r.is_free()).count()
    }

    /// Find a free dynamic record
    ///
    /// The record is not reserved: the caller must populate it (set an item
    /// id) before allocating again. Grows the pool by a quarter when no free
    /// record is left.
    pub fn allocate(&mut self) -> Result<ObjectPos, InventoryError> {
        let start = SLOT_MAX as usize;
        if let Some(offset) = self.records[start..].iter().position(ObjectRecord::is_free) {
            return Ok(ObjectPos::new((start + offset) as u16));
        }

        let old_size = self.records.len();
        if old_size >= MAX_POOL_SIZE {
            log::error!("object pool exhausted at {} entries", old_size);
            return Err(InventoryError::PoolExhausted(MAX_POOL_SIZE));
        }

        let new_size = (old_size + (old_size / 4).max(1)).min(MAX_POOL_SIZE);
        log::debug!("growing object pool from {} to {} entries", old_size, new_size);
        self.records.resize(new_size, ObjectRecord::default());

        Ok(ObjectPos::new(old_size as u16))
    }

    /// Reset a record to the free state
    ///
    /// # Panics
    ///
    /// Panics when the record is still linked to a sibling.
    pub fn free(&mut self, pos: ObjectPos) {
        let record = self.get_mut(pos);
        assert!(
            record.link.is_none(),
            "object at {} must be unlinked before it is freed",
            pos
        );
        *record = ObjectRecord::default();
    }

    /// Check if a position addresses a record of this pool
    pub fn contains(&self, pos: ObjectPos) -> bool {
        pos.index() < self.records.len()
    }

    /// Get a record
    ///
    /// # Panics
    ///
    /// Panics when the position is out of range.
    pub fn get(&self, pos: ObjectPos) -> &ObjectRecord {
        assert!(self.contains(pos), "object position {} out of range", pos);
        &self.records[pos.index()]
    }

    /// Get a mutable record
    ///
    /// # Panics
    ///
    /// Panics when the position is out of range.
    pub fn get_mut(&mut self, pos: ObjectPos) -> &mut ObjectRecord {
        assert!(self.contains(pos), "object position {} out of range", pos);
        &mut self.records[pos.index()]
    }

    /// Exchange two records
    pub fn swap(&mut self, a: ObjectPos, b: ObjectPos) {
        assert!(self.contains(a) && self.contains(b));
        self.records.swap(a.index(), b.index());
    }

    /// Iterate over all records with their positions
    pub fn iter(&self) -> impl Iterator<Item = (ObjectPos, &ObjectRecord)> {
        self.records
            .iter()
            .enumerate()
            .map(|(index, record)| (ObjectPos::new(index as u16), record))
    }

    /// Walk a membership chain starting at `head`
    pub fn chain(&self, head: Option<ObjectPos>) -> Chain<'_> {
        Chain {
            pool: self,
            next: head,
            steps: 0,
        }
    }
}

/// Iterator over a membership chain
///
/// The walk is lazy and can be restarted by cloning. A chain never visits
/// more records than the pool holds; a longer walk means the links form a
/// cycle and panics.
#[derive(Debug, Clone)]
pub struct Chain<'a> {
    pool: &'a ObjectPool,
    next: Option<ObjectPos>,
    steps: usize,
}

impl<'a> Iterator for Chain<'a> {
    type Item = ObjectPos;

    fn next(&mut self) -> Option<ObjectPos> {
        let pos = self.next?;
        self.steps += 1;
        assert!(
            self.steps <= self.pool.len(),
            "membership chain through {} does not terminate",
            pos
        );
        self.next = self.pool.get(pos).link;
        Some(pos)
    }
}
