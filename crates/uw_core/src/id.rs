//! Item kinds and object positions

use core::fmt;

/// Kind of an object, an index into the static object property tables
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ItemId(u16);

impl ItemId {
    /// Item id of an unused object record
    pub const NONE: ItemId = ItemId(0xffff);

    /// Create an item id from its raw value
    #[inline]
    pub const fn new(raw: u16) -> Self {
        Self(raw)
    }

    /// Get the raw value
    #[inline]
    pub const fn raw(&self) -> u16 {
        self.0
    }

    /// Check if this is the "no item" sentinel
    #[inline]
    pub const fn is_none(&self) -> bool {
        self.0 == Self::NONE.0
    }

    /// Check if this names an actual item kind
    #[inline]
    pub const fn is_some(&self) -> bool {
        !self.is_none()
    }

    /// Check if the raw value lies in `[start, end)`
    #[inline]
    pub const fn in_range(&self, start: u16, end: u16) -> bool {
        self.0 >= start && self.0 < end
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::NONE
    }
}

impl From<u16> for ItemId {
    fn from(raw: u16) -> Self {
        Self(raw)
    }
}

impl fmt::Debug for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            write!(f, "ItemId(none)")
        } else {
            write!(f, "ItemId({:#06x})", self.0)
        }
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            write!(f, "none")
        } else {
            write!(f, "{:#06x}", self.0)
        }
    }
}

/// Position of an object record inside an inventory object pool
///
/// Pools are addressed with 16-bit indices. Two raw values are reserved:
/// `0xffff` is the "no slot" sentinel, and `0` terminates a membership chain
/// (position 0 is a fixed quick-slot and never a chained member, so it is
/// safe to reuse as the terminator).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ObjectPos(u16);

impl ObjectPos {
    /// Raw "no slot" sentinel
    pub const NONE_RAW: u16 = 0xffff;

    /// Raw chain terminator
    pub const END_OF_CHAIN: u16 = 0;

    /// Highest addressable position
    pub const MAX: ObjectPos = ObjectPos(0xfffe);

    /// Create a position from a raw index
    ///
    /// The "no slot" sentinel is not a valid position.
    #[inline]
    pub const fn new(raw: u16) -> Self {
        debug_assert!(raw != Self::NONE_RAW);
        Self(raw)
    }

    /// Decode a raw value where `0xffff` means "no slot"
    #[inline]
    pub const fn from_raw(raw: u16) -> Option<Self> {
        if raw == Self::NONE_RAW {
            None
        } else {
            Some(Self(raw))
        }
    }

    /// Encode an optional position, using `0xffff` for "no slot"
    #[inline]
    pub const fn to_raw(pos: Option<Self>) -> u16 {
        match pos {
            Some(pos) => pos.0,
            None => Self::NONE_RAW,
        }
    }

    /// Decode a chain link where `0` terminates the chain
    #[inline]
    pub const fn from_link(raw: u16) -> Option<Self> {
        if raw == Self::END_OF_CHAIN {
            None
        } else {
            Some(Self(raw))
        }
    }

    /// Encode a chain link, using `0` for the end of the chain
    #[inline]
    pub const fn to_link(pos: Option<Self>) -> u16 {
        match pos {
            Some(pos) => pos.0,
            None => Self::END_OF_CHAIN,
        }
    }

    /// Get the raw value
    #[inline]
    pub const fn raw(&self) -> u16 {
        self.0
    }

    /// Get the position as a slice index
    #[inline]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }
}

impl From<u16> for ObjectPos {
    fn from(raw: u16) -> Self {
        Self::new(raw)
    }
}

impl fmt::Debug for ObjectPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectPos({:#06x})", self.0)
    }
}

impl fmt::Display for ObjectPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_id_sentinel() {
        assert!(ItemId::NONE.is_none());
        assert!(ItemId::default().is_none());
        assert!(ItemId::new(0x0080).is_some());
        assert!(ItemId::new(0x0080).in_range(0x0080, 0x008f));
        assert!(!ItemId::new(0x008f).in_range(0x0080, 0x008f));
    }

    #[test]
    fn test_position_encoding() {
        assert_eq!(ObjectPos::from_raw(0xffff), None);
        assert_eq!(ObjectPos::from_raw(5), Some(ObjectPos::new(5)));
        assert_eq!(ObjectPos::to_raw(None), 0xffff);

        assert_eq!(ObjectPos::from_link(0), None);
        assert_eq!(ObjectPos::from_link(19), Some(ObjectPos::new(19)));
        assert_eq!(ObjectPos::to_link(None), 0);
        assert_eq!(ObjectPos::to_link(Some(ObjectPos::new(19))), 19);
    }
}
