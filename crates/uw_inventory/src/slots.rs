//! Fixed inventory slots
//!
//! The first [`SLOT_MAX`] pool positions are fixed slots: 8 topmost
//! quick-slots followed by the paperdoll. Fixed slots are never chained into
//! a container.

use crate::properties::ArmourCategory;
use serde::{Deserialize, Serialize};
use uw_core::ObjectPos;

/// Number of topmost quick-slots
pub const TOPMOST_SLOT_COUNT: u16 = 8;

/// First paperdoll position
pub const SLOT_PLAYER_OBJECTS_START: u16 = 8;

/// First armour-only paperdoll position
pub const SLOT_PAPERDOLL_START: u16 = 14;

/// Number of fixed slots; dynamic records start here
pub const SLOT_MAX: u16 = 19;

/// Paperdoll slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaperdollSlot {
    LeftHand = 8,
    RightHand,
    LeftShoulder,
    RightShoulder,
    LeftFinger,
    RightFinger,
    Legs,
    Chest,
    Hands,
    Feet,
    Head,
}

impl PaperdollSlot {
    /// Get all paperdoll slots, in position order
    pub fn all() -> [Self; 11] {
        [
            Self::LeftHand,
            Self::RightHand,
            Self::LeftShoulder,
            Self::RightShoulder,
            Self::LeftFinger,
            Self::RightFinger,
            Self::Legs,
            Self::Chest,
            Self::Hands,
            Self::Feet,
            Self::Head,
        ]
    }

    /// Pool position of this slot
    pub fn pos(self) -> ObjectPos {
        ObjectPos::new(self as u16)
    }

    /// Look up the paperdoll slot at a pool position
    pub fn from_pos(pos: ObjectPos) -> Option<Self> {
        let raw = pos.raw();
        if !(SLOT_PLAYER_OBJECTS_START..SLOT_MAX).contains(&raw) {
            return None;
        }
        Some(Self::all()[(raw - SLOT_PLAYER_OBJECTS_START) as usize])
    }

    /// Check if this is a hand or shoulder slot, which holds anything
    pub fn is_free_form(&self) -> bool {
        matches!(
            self,
            Self::LeftHand | Self::RightHand | Self::LeftShoulder | Self::RightShoulder
        )
    }

    /// Check if this is a ring slot
    pub fn is_finger(&self) -> bool {
        matches!(self, Self::LeftFinger | Self::RightFinger)
    }

    /// Armour category an object needs to be placed in this slot
    pub fn required_category(&self) -> Option<ArmourCategory> {
        match self {
            Self::LeftFinger | Self::RightFinger => Some(ArmourCategory::Ring),
            Self::Legs => Some(ArmourCategory::Leggings),
            Self::Chest => Some(ArmourCategory::BodyArmour),
            Self::Hands => Some(ArmourCategory::Gloves),
            Self::Feet => Some(ArmourCategory::Boots),
            Self::Head => Some(ArmourCategory::Hat),
            _ => None,
        }
    }
}

/// Check if a position is one of the topmost quick-slots
pub fn is_topmost(pos: ObjectPos) -> bool {
    pos.raw() < TOPMOST_SLOT_COUNT
}

/// Check if a position is a fixed slot
pub fn is_fixed(pos: ObjectPos) -> bool {
    pos.raw() < SLOT_MAX
}

/// Iterate over the topmost quick-slot positions
pub fn topmost_positions() -> impl Iterator<Item = ObjectPos> {
    (0..TOPMOST_SLOT_COUNT).map(ObjectPos::new)
}

/// Iterate over all fixed slot positions
pub fn fixed_positions() -> impl Iterator<Item = ObjectPos> {
    (0..SLOT_MAX).map(ObjectPos::new)
}
