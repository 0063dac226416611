//! Underworld Inventory - Player Inventory Engine
//!
//! This crate tracks every portable object the player carries.
//!
//! # Features
//!
//! - Growable object pool addressed by 16-bit positions
//! - 8 topmost quick-slots and 11 paperdoll slots
//! - Arbitrarily nested containers (bags in bags) as linked chains
//! - Container navigation stack with a rebuilt-on-demand slot list
//! - A single floating (cursor-held) object for drag and drop
//! - Data-driven item combining
//! - Weight and capacity checks against the static object property table
//! - Savegame loading and saving
//!
//! # Example
//!
//! ```ignore
//! use uw_inventory::prelude::*;
//!
//! let mut inventory = Inventory::new();
//!
//! // put a bag into the first free quick-slot
//! let bag = inventory.insert_item(ObjectRecord::container(ItemId::new(0x0080)))?;
//! let bag = inventory.add_to_container(bag, None).unwrap();
//!
//! // pick up a new item and drop it into the bag
//! inventory.insert_floating_item(ObjectRecord::new(ItemId::new(0x0001)))?;
//! inventory.drop_floating_object(Some(bag), None);
//! ```

pub mod combine;
pub mod error;
pub mod inventory;
pub mod object;
pub mod persist;
pub mod pool;
pub mod properties;
pub mod slots;

pub mod prelude {
    pub use crate::combine::{CombineEffect, CombineMatch, CombineRule, CombineRuleEngine};
    pub use crate::error::InventoryError;
    pub use crate::inventory::{Inventory, InventoryConfig, InventorySnapshot};
    pub use crate::object::{ObjectQuantity, ObjectRecord};
    pub use crate::pool::{Chain, ObjectPool};
    pub use crate::properties::{
        AcceptedClass, ArmourCategory, ArmourProperty, CommonObjectProperty, ContainerProperty,
        ObjectProperties,
    };
    pub use crate::slots::{PaperdollSlot, SLOT_MAX, TOPMOST_SLOT_COUNT};
    pub use uw_core::{ItemId, ObjectPos};
}

pub use prelude::*;
