//! Static object properties
//!
//! Read-only per-kind data the inventory consults for weight, container
//! capacity and paperdoll placement. Tables are usually loaded from a TOML
//! file:
//!
//! ```toml
//! [[common]]
//! item_id = 0x0080
//! mass = 10
//! can_be_picked_up = true
//!
//! [[container]]
//! item_id = 0x0080
//! capacity = 40
//! accepts = "any"
//!
//! [[armour]]
//! item_id = 0x0020
//! protection = 3
//! durability = 12
//! category = "body_armour"
//! ```

use crate::error::InventoryError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use uw_core::ItemId;

/// First container kind
pub const CONTAINER_START: u16 = 0x0080;
/// One past the last container kind
pub const CONTAINER_END: u16 = 0x008f;

/// First armour kind
pub const ARMOUR_START: u16 = 0x0020;
/// One past the last armour kind
pub const ARMOUR_END: u16 = 0x0040;

/// Check if an item kind is a container
pub fn is_container(item_id: ItemId) -> bool {
    item_id.in_range(CONTAINER_START, CONTAINER_END)
}

/// Check if an item kind is an armour or wearable
pub fn is_armour(item_id: ItemId) -> bool {
    item_id.in_range(ARMOUR_START, ARMOUR_END)
}

/// Properties shared by all object kinds
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommonObjectProperty {
    pub height: u8,
    pub radius: u8,
    /// Mass in tenths of a stone
    pub mass: u16,
    pub quality_class: u8,
    pub quality_type: u8,
    pub can_have_owner: bool,
    pub can_be_looked_at: bool,
    pub can_be_picked_up: bool,
    pub is_container: bool,
}

/// Paperdoll category of armour and wearables
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArmourCategory {
    #[default]
    None,
    BodyArmour,
    Leggings,
    Gloves,
    Boots,
    Hat,
    Ring,
}

/// Properties of armour and wearables
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArmourProperty {
    pub protection: u8,
    pub durability: u8,
    pub category: ArmourCategory,
}

/// Object class a container accepts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcceptedClass {
    #[default]
    Any,
    Runes,
    Ammunition,
    Scrolls,
    Edibles,
}

impl AcceptedClass {
    /// Check if an item kind belongs to this class
    pub fn accepts(&self, item_id: ItemId) -> bool {
        let raw = item_id.raw();
        match self {
            Self::Any => true,
            Self::Runes => (0x00e8..=0x00ff).contains(&raw),
            Self::Ammunition => raw == 0x0151 || raw == 0x0152,
            Self::Scrolls => (0x0138..=0x013f).contains(&raw),
            Self::Edibles => (0x00b0..=0x00bf).contains(&raw),
        }
    }
}

/// Properties of containers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerProperty {
    /// Capacity in tenths of a stone, 0 means unlimited
    pub capacity: u16,
    pub accepts: AcceptedClass,
}

#[derive(Debug, Deserialize)]
struct CommonEntry {
    item_id: u16,
    #[serde(flatten)]
    property: CommonObjectProperty,
}

#[derive(Debug, Deserialize)]
struct ContainerEntry {
    item_id: u16,
    #[serde(flatten)]
    property: ContainerProperty,
}

#[derive(Debug, Deserialize)]
struct ArmourEntry {
    item_id: u16,
    #[serde(flatten)]
    property: ArmourProperty,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PropertyFile {
    common: Vec<CommonEntry>,
    container: Vec<ContainerEntry>,
    armour: Vec<ArmourEntry>,
}

/// Static object property tables
///
/// Kinds without an entry get the default property, so an empty table
/// describes weightless objects, unlimited containers and category-less
/// armour.
#[derive(Debug, Clone, Default)]
pub struct ObjectProperties {
    common: HashMap<ItemId, CommonObjectProperty>,
    containers: HashMap<ItemId, ContainerProperty>,
    armour: HashMap<ItemId, ArmourProperty>,
    default_common: CommonObjectProperty,
    default_container: ContainerProperty,
    default_armour: ArmourProperty,
}

impl ObjectProperties {
    /// Create empty property tables
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse property tables from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, InventoryError> {
        let file: PropertyFile = toml::from_str(text)?;

        let mut properties = Self::new();
        for entry in file.common {
            properties.set_common(ItemId::new(entry.item_id), entry.property);
        }
        for entry in file.container {
            properties.set_container(ItemId::new(entry.item_id), entry.property);
        }
        for entry in file.armour {
            properties.set_armour(ItemId::new(entry.item_id), entry.property);
        }

        log::debug!(
            "loaded {} common, {} container and {} armour properties",
            properties.common.len(),
            properties.containers.len(),
            properties.armour.len()
        );
        Ok(properties)
    }

    /// Load property tables from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, InventoryError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        log::info!("loading object properties from {}", path.display());
        Self::from_toml_str(&text)
    }

    pub fn set_common(&mut self, item_id: ItemId, property: CommonObjectProperty) {
        self.common.insert(item_id, property);
    }

    pub fn set_container(&mut self, item_id: ItemId, property: ContainerProperty) {
        debug_assert!(is_container(item_id), "{} is not a container kind", item_id);
        self.containers.insert(item_id, property);
    }

    pub fn set_armour(&mut self, item_id: ItemId, property: ArmourProperty) {
        debug_assert!(is_armour(item_id), "{} is not an armour kind", item_id);
        self.armour.insert(item_id, property);
    }

    /// Builder shortcut for setting only the mass of a kind
    pub fn with_mass(mut self, item_id: ItemId, mass: u16) -> Self {
        self.common.entry(item_id).or_default().mass = mass;
        self
    }

    /// Builder shortcut for a container's capacity and accepted class
    pub fn with_container(mut self, item_id: ItemId, capacity: u16, accepts: AcceptedClass) -> Self {
        self.set_container(item_id, ContainerProperty { capacity, accepts });
        self
    }

    /// Builder shortcut for an armour category
    pub fn with_armour_category(mut self, item_id: ItemId, category: ArmourCategory) -> Self {
        self.armour.entry(item_id).or_default().category = category;
        self
    }

    pub fn common(&self, item_id: ItemId) -> &CommonObjectProperty {
        self.common.get(&item_id).unwrap_or(&self.default_common)
    }

    pub fn container(&self, item_id: ItemId) -> &ContainerProperty {
        self.containers.get(&item_id).unwrap_or(&self.default_container)
    }

    pub fn armour(&self, item_id: ItemId) -> &ArmourProperty {
        self.armour.get(&item_id).unwrap_or(&self.default_armour)
    }

    /// Paperdoll category of a kind; non-armour kinds have none
    pub fn armour_category(&self, item_id: ItemId) -> ArmourCategory {
        if is_armour(item_id) {
            self.armour(item_id).category
        } else {
            ArmourCategory::None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_range() {
        assert!(is_container(ItemId::new(0x0080)));
        assert!(is_container(ItemId::new(0x008e)));
        assert!(!is_container(ItemId::new(0x008f)));
        assert!(!is_container(ItemId::NONE));
    }

    #[test]
    fn test_accepted_classes() {
        assert!(AcceptedClass::Any.accepts(ItemId::new(0x0001)));
        assert!(AcceptedClass::Runes.accepts(ItemId::new(0x00e8)));
        assert!(!AcceptedClass::Runes.accepts(ItemId::new(0x00e7)));
        assert!(AcceptedClass::Ammunition.accepts(ItemId::new(0x0152)));
        assert!(!AcceptedClass::Ammunition.accepts(ItemId::new(0x0153)));
        assert!(AcceptedClass::Scrolls.accepts(ItemId::new(0x013f)));
        assert!(AcceptedClass::Edibles.accepts(ItemId::new(0x00b0)));
        assert!(!AcceptedClass::Edibles.accepts(ItemId::new(0x00c0)));
    }

    #[test]
    fn test_defaults_for_unknown_kinds() {
        let properties = ObjectProperties::new();
        assert_eq!(properties.common(ItemId::new(0x0001)).mass, 0);
        assert_eq!(properties.container(ItemId::new(0x0080)).capacity, 0);
        assert_eq!(properties.armour_category(ItemId::new(0x0020)), ArmourCategory::None);
    }

    #[test]
    fn test_parse_toml_tables() {
        let properties = ObjectProperties::from_toml_str(
            r#"
            [[common]]
            item_id = 0x0080
            mass = 10
            can_be_picked_up = true

            [[container]]
            item_id = 0x0081
            capacity = 40
            accepts = "runes"

            [[armour]]
            item_id = 0x0020
            protection = 3
            category = "body_armour"
            "#,
        )
        .unwrap();

        assert_eq!(properties.common(ItemId::new(0x0080)).mass, 10);
        assert!(properties.common(ItemId::new(0x0080)).can_be_picked_up);
        assert_eq!(properties.container(ItemId::new(0x0081)).capacity, 40);
        assert_eq!(properties.container(ItemId::new(0x0081)).accepts, AcceptedClass::Runes);
        assert_eq!(properties.armour(ItemId::new(0x0020)).protection, 3);
        assert_eq!(
            properties.armour_category(ItemId::new(0x0020)),
            ArmourCategory::BodyArmour
        );
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let result = ObjectProperties::from_toml_str("[[container]]\nitem_id = 0x0080\naccepts = \"potions\"");
        assert!(matches!(result, Err(InventoryError::Properties(_))));
    }
}
