//! Inventory savegame section
//!
//! ```text
//! section "inventory":
//!   u16 object count
//!   object count x record   // u16 item id; the rest only for used records:
//!                           // u8 flags, u16 quality, u16 link, u16 owner,
//!                           // u16 quantity, u16 object flags
//!   u16 container stack depth
//!   depth x u16             // outermost first
//!   u16 floating object     // 0xffff if none
//! ```

use crate::error::InventoryError;
use crate::inventory::Inventory;
use crate::object::{ObjectQuantity, ObjectRecord};
use crate::pool::{ObjectPool, MAX_POOL_SIZE};
use crate::slots::{self, SLOT_MAX};
use uw_core::{ItemId, ObjectPos};
use uw_savegame::{SavegameReader, SavegameWriter};

/// Name of the savegame section
pub const INVENTORY_SECTION: &str = "inventory";

const FLAG_ENCHANTED: u8 = 0x01;
const FLAG_IS_QUANTITY: u8 = 0x02;
const FLAG_HIDDEN: u8 = 0x04;

impl ObjectRecord {
    fn save(&self, sg: &mut SavegameWriter) {
        sg.write_u16(self.item_id.raw());
        if self.is_free() {
            return;
        }

        let mut flags = 0;
        if self.enchanted {
            flags |= FLAG_ENCHANTED;
        }
        if !self.has_contents_field() {
            flags |= FLAG_IS_QUANTITY;
        }
        if self.hidden {
            flags |= FLAG_HIDDEN;
        }
        sg.write_u8(flags);

        sg.write_u16(self.quality);
        sg.write_u16(ObjectPos::to_link(self.link));
        sg.write_u16(self.owner);
        sg.write_u16(match self.quantity {
            ObjectQuantity::Amount(amount) => amount,
            ObjectQuantity::Contents(head) => ObjectPos::to_link(head),
        });
        sg.write_u16(self.flags);
    }

    fn load(sg: &mut SavegameReader) -> Result<Self, InventoryError> {
        let item_id = ItemId::new(sg.read_u16()?);
        if item_id.is_none() {
            return Ok(Self::default());
        }

        let flags = sg.read_u8()?;
        let quality = sg.read_u16()?;
        let link = ObjectPos::from_link(sg.read_u16()?);
        let owner = sg.read_u16()?;
        let quantity = sg.read_u16()?;
        let object_flags = sg.read_u16()?;

        Ok(Self {
            item_id,
            link,
            quality,
            owner,
            quantity: if flags & FLAG_IS_QUANTITY != 0 {
                ObjectQuantity::Amount(quantity)
            } else {
                ObjectQuantity::Contents(ObjectPos::from_link(quantity))
            },
            flags: object_flags,
            enchanted: flags & FLAG_ENCHANTED != 0,
            hidden: flags & FLAG_HIDDEN != 0,
        })
    }
}

impl Inventory {
    /// Write the inventory section
    pub fn save(&self, sg: &mut SavegameWriter) {
        sg.begin_section(INVENTORY_SECTION);

        sg.write_u16(self.pool.len() as u16);
        for (_, record) in self.pool.iter() {
            record.save(sg);
        }

        sg.write_u16(self.container_stack.len() as u16);
        for pos in &self.container_stack {
            sg.write_u16(pos.raw());
        }

        sg.write_u16(ObjectPos::to_raw(self.floating));

        sg.end_section();
        log::info!(
            "saved inventory: {} objects, {} open containers",
            self.pool.used(),
            self.container_stack.len()
        );
    }

    /// Read the inventory section, replacing the current contents
    ///
    /// The section is read and validated completely before anything is
    /// replaced; on error the inventory is left unchanged.
    pub fn load(&mut self, sg: &mut SavegameReader) -> Result<(), InventoryError> {
        sg.begin_section(INVENTORY_SECTION)?;

        let count = sg.read_u16()? as usize;
        if count <= SLOT_MAX as usize || count > MAX_POOL_SIZE {
            return Err(InventoryError::Corrupt(format!("invalid object count {}", count)));
        }
        let records = (0..count)
            .map(|_| ObjectRecord::load(sg))
            .collect::<Result<Vec<_>, _>>()?;

        let depth = sg.read_u16()? as usize;
        let mut container_stack = Vec::with_capacity(depth);
        for _ in 0..depth {
            let pos = ObjectPos::from_raw(sg.read_u16()?)
                .ok_or_else(|| InventoryError::Corrupt("open container is \"no slot\"".into()))?;
            container_stack.push(pos);
        }

        let floating = ObjectPos::from_raw(sg.read_u16()?);

        sg.end_section();

        validate(&records, &container_stack, floating)?;

        self.pool = ObjectPool::from_records(records);
        self.container_stack = container_stack;
        self.floating = floating;
        self.build_slot_list();

        log::info!(
            "loaded inventory: {} objects, {} open containers",
            self.pool.used(),
            self.container_stack.len()
        );
        Ok(())
    }
}

/// Check that every stored position addresses the loaded pool
fn validate(
    records: &[ObjectRecord],
    container_stack: &[ObjectPos],
    floating: Option<ObjectPos>,
) -> Result<(), InventoryError> {
    let in_range = |pos: ObjectPos| pos.index() < records.len();

    for (index, record) in records.iter().enumerate() {
        let mut targets = record.link.into_iter().chain(record.contents());
        if let Some(pos) = targets.find(|&pos| !in_range(pos)) {
            return Err(InventoryError::Corrupt(format!(
                "object {} links to {} outside of pool",
                index, pos
            )));
        }
    }

    for &pos in container_stack {
        let is_container = in_range(pos) && {
            let record = &records[pos.index()];
            Inventory::is_container(record.item_id) && record.has_contents_field()
        };
        if !is_container {
            return Err(InventoryError::Corrupt(format!(
                "open container {} is not a container",
                pos
            )));
        }
    }

    if let Some(pos) = floating {
        let valid = in_range(pos)
            && !slots::is_fixed(pos)
            && !records[pos.index()].is_free()
            && records[pos.index()].link.is_none();
        if !valid {
            return Err(InventoryError::Corrupt(format!("invalid floating object {}", pos)));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uw_savegame::SaveHeader;

    fn round_trip(inventory: &Inventory) -> Inventory {
        let mut sg = SavegameWriter::new(SaveHeader::new("test"));
        inventory.save(&mut sg);

        let mut sg = SavegameReader::new(sg.finish()).unwrap();
        let mut loaded = Inventory::new();
        loaded.load(&mut sg).unwrap();
        loaded
    }

    #[test]
    fn test_record_fields_survive() {
        let mut inventory = Inventory::new();
        *inventory.object_info_mut(ObjectPos::new(2)) = ObjectRecord::new(ItemId::new(0x0010))
            .with_amount(12)
            .with_quality(40)
            .with_owner(3)
            .with_flags(0x0123)
            .with_enchanted(true)
            .with_hidden(true);

        let loaded = round_trip(&inventory);
        assert_eq!(
            loaded.object_info(ObjectPos::new(2)),
            inventory.object_info(ObjectPos::new(2))
        );
        assert_eq!(loaded.pool().len(), inventory.pool().len());
    }

    #[test]
    fn test_free_records_store_only_the_item_id() {
        let inventory = Inventory::new();
        let mut sg = SavegameWriter::new(SaveHeader::new("test"));
        let before = sg.len();
        inventory.save(&mut sg);

        // name, count, one u16 per record, stack depth, floating
        let name = 2 + INVENTORY_SECTION.len();
        assert_eq!(sg.len() - before, name + 2 + inventory.pool().len() * 2 + 2 + 2);
    }

    #[test]
    fn test_wrong_section_fails() {
        let mut sg = SavegameWriter::new(SaveHeader::new("test"));
        sg.begin_section("player");
        sg.end_section();

        let mut sg = SavegameReader::new(sg.finish()).unwrap();
        let mut inventory = Inventory::new();
        assert!(matches!(
            inventory.load(&mut sg),
            Err(InventoryError::Save(_))
        ));
    }

    #[test]
    fn test_stack_entry_must_be_container() {
        let mut sg = SavegameWriter::new(SaveHeader::new("test"));
        sg.begin_section(INVENTORY_SECTION);
        sg.write_u16(SLOT_MAX + 1);
        for _ in 0..=SLOT_MAX {
            sg.write_u16(ItemId::NONE.raw());
        }
        sg.write_u16(1);
        sg.write_u16(0);
        sg.write_u16(ObjectPos::NONE_RAW);
        sg.end_section();

        let mut sg = SavegameReader::new(sg.finish()).unwrap();
        let mut inventory = Inventory::new();
        let pool_size = inventory.pool().len();
        assert!(matches!(
            inventory.load(&mut sg),
            Err(InventoryError::Corrupt(_))
        ));
        // unchanged on failure
        assert_eq!(inventory.pool().len(), pool_size);
    }
}
