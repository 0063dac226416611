//! Object records

use serde::Serialize;
use uw_core::{ItemId, ObjectPos};

/// Quantity field of an object record
///
/// The same 16-bit field holds either a stack count or, for containers, the
/// head of the membership chain of its contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ObjectQuantity {
    /// Number of stacked items
    Amount(u16),
    /// First contained object, `None` when empty
    Contents(Option<ObjectPos>),
}

impl Default for ObjectQuantity {
    fn default() -> Self {
        Self::Amount(0)
    }
}

/// One entry of the inventory object pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectRecord {
    /// Item kind; [`ItemId::NONE`] marks a free record
    pub item_id: ItemId,
    /// Next sibling in the membership chain holding this object
    pub link: Option<ObjectPos>,
    pub quality: u16,
    pub owner: u16,
    pub quantity: ObjectQuantity,
    /// Game-specific flag bits
    pub flags: u16,
    pub enchanted: bool,
    pub hidden: bool,
}

impl Default for ObjectRecord {
    fn default() -> Self {
        Self {
            item_id: ItemId::NONE,
            link: None,
            quality: 0,
            owner: 0,
            quantity: ObjectQuantity::default(),
            flags: 0,
            enchanted: false,
            hidden: false,
        }
    }
}

impl ObjectRecord {
    /// Create a single item of the given kind
    pub fn new(item_id: ItemId) -> Self {
        Self {
            item_id,
            quantity: ObjectQuantity::Amount(1),
            ..Default::default()
        }
    }

    /// Create an empty container of the given kind
    pub fn container(item_id: ItemId) -> Self {
        Self {
            item_id,
            quantity: ObjectQuantity::Contents(None),
            ..Default::default()
        }
    }

    /// Set the stack count
    pub fn with_amount(mut self, amount: u16) -> Self {
        self.quantity = ObjectQuantity::Amount(amount);
        self
    }

    pub fn with_quality(mut self, quality: u16) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_owner(mut self, owner: u16) -> Self {
        self.owner = owner;
        self
    }

    pub fn with_flags(mut self, flags: u16) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_enchanted(mut self, enchanted: bool) -> Self {
        self.enchanted = enchanted;
        self
    }

    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    /// Check if the record is unused
    pub fn is_free(&self) -> bool {
        self.item_id.is_none()
    }

    /// Check if the quantity field holds a contents chain
    pub fn has_contents_field(&self) -> bool {
        matches!(self.quantity, ObjectQuantity::Contents(_))
    }

    /// Head of the contents chain, `None` for items and empty containers
    pub fn contents(&self) -> Option<ObjectPos> {
        match self.quantity {
            ObjectQuantity::Contents(head) => head,
            ObjectQuantity::Amount(_) => None,
        }
    }

    /// Stack count, `None` for containers
    pub fn amount(&self) -> Option<u16> {
        match self.quantity {
            ObjectQuantity::Amount(amount) => Some(amount),
            ObjectQuantity::Contents(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_record_is_free() {
        let record = ObjectRecord::default();
        assert!(record.is_free());
        assert_eq!(record.link, None);
        assert_eq!(record.amount(), Some(0));
    }

    #[test]
    fn test_container_record() {
        let record = ObjectRecord::container(ItemId::new(0x0080)).with_quality(40);
        assert!(!record.is_free());
        assert!(record.has_contents_field());
        assert_eq!(record.contents(), None);
        assert_eq!(record.amount(), None);
        assert_eq!(record.quality, 40);
    }
}
