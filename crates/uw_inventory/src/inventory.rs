//! Player inventory
//!
//! The [`Inventory`] owns an [`ObjectPool`] and arranges its records into:
//!
//! - the 8 topmost quick-slots and the paperdoll (fixed positions)
//! - container contents, as membership chains threaded through `link`
//! - the floating object held by the cursor
//!
//! A stack of opened containers selects which chain the slot list shows.

use crate::combine::{CombineEffect, CombineRuleEngine};
use crate::error::InventoryError;
use crate::object::{ObjectQuantity, ObjectRecord};
use crate::pool::{Chain, ObjectPool, INITIAL_POOL_SIZE};
use crate::properties::{self, ObjectProperties};
use crate::slots::{self, PaperdollSlot, SLOT_MAX};
use serde::{Deserialize, Serialize, Serializer};
use std::sync::Arc;
use uw_core::{ItemId, ObjectPos};

/// Inventory configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryConfig {
    /// Number of pool records a new inventory starts with
    pub initial_pool_size: usize,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            initial_pool_size: INITIAL_POOL_SIZE,
        }
    }
}

/// Player inventory
#[derive(Debug, Clone)]
pub struct Inventory {
    pub(crate) pool: ObjectPool,
    /// Positions shown for the open container, or the 8 quick-slots
    pub(crate) slot_list: Vec<ObjectPos>,
    /// Opened containers, outermost first
    pub(crate) container_stack: Vec<ObjectPos>,
    pub(crate) floating: Option<ObjectPos>,
    properties: Arc<ObjectProperties>,
    combine_rules: Arc<CombineRuleEngine>,
    config: InventoryConfig,
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new()
    }
}

impl Inventory {
    /// Create an empty inventory with default configuration
    pub fn new() -> Self {
        Self::with_config(InventoryConfig::default())
    }

    /// Create an empty inventory
    pub fn with_config(config: InventoryConfig) -> Self {
        let mut inventory = Self {
            pool: ObjectPool::new(config.initial_pool_size),
            slot_list: Vec::new(),
            container_stack: Vec::new(),
            floating: None,
            properties: Arc::new(ObjectProperties::new()),
            combine_rules: Arc::new(CombineRuleEngine::new()),
            config,
        };
        inventory.build_slot_list();
        inventory
    }

    /// Use a shared object property table
    pub fn with_properties(mut self, properties: Arc<ObjectProperties>) -> Self {
        self.properties = properties;
        self
    }

    /// Use a shared combine rule table
    pub fn with_combine_rules(mut self, combine_rules: Arc<CombineRuleEngine>) -> Self {
        self.combine_rules = combine_rules;
        self
    }

    pub fn properties(&self) -> &ObjectProperties {
        &self.properties
    }

    pub fn combine_rules(&self) -> &CombineRuleEngine {
        &self.combine_rules
    }

    /// Add a single combine rule
    ///
    /// The rule table is copied first if it is shared with other inventories.
    pub fn add_combine_rule(&mut self, first: ItemId, second: ItemId, result: ItemId, mask: u8) {
        Arc::make_mut(&mut self.combine_rules).add_rule(first, second, result, mask);
    }

    pub fn config(&self) -> &InventoryConfig {
        &self.config
    }

    /// Reset to an empty inventory with a freshly sized pool
    pub fn create(&mut self) {
        self.pool = ObjectPool::new(self.config.initial_pool_size);
        self.container_stack.clear();
        self.floating = None;
        self.build_slot_list();
    }

    /// Drop all objects and shrink the pool to the fixed slots
    pub fn destroy(&mut self) {
        log::debug!("destroying inventory with {} objects", self.pool.used());
        self.pool = ObjectPool::new(0);
        self.container_stack.clear();
        self.floating = None;
        self.build_slot_list();
    }

    // Object pool

    /// Find a free dynamic record; see [`ObjectPool::allocate`]
    pub fn allocate(&mut self) -> Result<ObjectPos, InventoryError> {
        self.pool.allocate()
    }

    /// Free an unlinked record
    pub fn free(&mut self, pos: ObjectPos) {
        assert!(self.floating != Some(pos), "cannot free the floating object at {}", pos);
        self.pool.free(pos);
    }

    pub fn pool(&self) -> &ObjectPool {
        &self.pool
    }

    pub fn object_info(&self, pos: ObjectPos) -> &ObjectRecord {
        self.pool.get(pos)
    }

    /// Get a mutable record
    ///
    /// Changing links through this accessor does not update the slot list.
    pub fn object_info_mut(&mut self, pos: ObjectPos) -> &mut ObjectRecord {
        self.pool.get_mut(pos)
    }

    /// Allocate a detached record holding `record`
    pub fn insert_item(&mut self, mut record: ObjectRecord) -> Result<ObjectPos, InventoryError> {
        assert!(!record.is_free(), "cannot insert an empty object record");
        record.link = None;

        let pos = self.pool.allocate()?;
        *self.pool.get_mut(pos) = record;
        Ok(pos)
    }

    /// Allocate a record and make it the floating object
    ///
    /// Returns `None` when an object is already floating.
    pub fn insert_floating_item(
        &mut self,
        record: ObjectRecord,
    ) -> Result<Option<ObjectPos>, InventoryError> {
        if let Some(floating) = self.floating {
            log::warn!("cannot insert {} while {} is floating", record.item_id, floating);
            return Ok(None);
        }

        let pos = self.insert_item(record)?;
        self.floating = Some(pos);
        Ok(Some(pos))
    }

    // Slot list

    /// Number of entries in the slot list; always 8 for the topmost view
    pub fn num_slots(&self) -> usize {
        self.slot_list.len()
    }

    /// Position shown at `index` of the slot list
    ///
    /// Topmost entries may be free records.
    pub fn slot_list_pos(&self, index: usize) -> ObjectPos {
        assert!(index < self.slot_list.len(), "slot list index {} out of range", index);
        self.slot_list[index]
    }

    pub fn slot_list(&self) -> &[ObjectPos] {
        &self.slot_list
    }

    pub(crate) fn build_slot_list(&mut self) {
        self.slot_list = match self.container_pos() {
            Some(container) => self.contents(container).collect(),
            None => slots::topmost_positions().collect(),
        };
    }

    // Containers

    /// Check if an item kind is a container
    pub fn is_container(item_id: ItemId) -> bool {
        properties::is_container(item_id)
    }

    fn is_container_record(&self, pos: ObjectPos) -> bool {
        let record = self.pool.get(pos);
        Self::is_container(record.item_id) && record.has_contents_field()
    }

    /// Currently open container, `None` for the topmost view
    pub fn container_pos(&self) -> Option<ObjectPos> {
        self.container_stack.last().copied()
    }

    /// Container the open container was opened from
    pub fn parent_container_pos(&self) -> Option<ObjectPos> {
        let depth = self.container_stack.len();
        if depth < 2 {
            None
        } else {
            Some(self.container_stack[depth - 2])
        }
    }

    pub fn container_stack(&self) -> &[ObjectPos] {
        &self.container_stack
    }

    /// Walk the contents of a container
    pub fn contents(&self, container: ObjectPos) -> Chain<'_> {
        self.pool.chain(self.pool.get(container).contents())
    }

    /// Open a container and show its contents
    ///
    /// Containers on the paperdoll start a new stack.
    pub fn open_container(&mut self, pos: ObjectPos) {
        assert!(self.is_container_record(pos), "object at {} is not a container", pos);
        assert!(
            self.container_pos() != Some(pos),
            "container at {} is already open",
            pos
        );
        assert!(
            self.floating.map_or(true, |floating| !self.subtree_contains(floating, pos)),
            "container at {} is part of the floating object",
            pos
        );

        if PaperdollSlot::from_pos(pos).is_some() {
            self.container_stack.clear();
        }
        self.container_stack.push(pos);

        log::debug!("opened container {} (depth {})", pos, self.container_stack.len());
        self.build_slot_list();
    }

    /// Close the open container and return to its parent view
    pub fn close_container(&mut self) {
        let closed = self.container_stack.pop();
        assert!(closed.is_some(), "no container is open");

        self.build_slot_list();
    }

    /// Add an unlinked object to a container
    ///
    /// With `container` set to `None` the object is copied into the first free
    /// quick-slot and its record freed; otherwise it is appended to the end of
    /// the container's contents. Returns the object's new position, or `None`
    /// when no quick-slot is free.
    pub fn add_to_container(
        &mut self,
        pos: ObjectPos,
        container: Option<ObjectPos>,
    ) -> Option<ObjectPos> {
        assert!(
            self.pool.get(pos).link.is_none(),
            "object at {} is still linked",
            pos
        );

        let Some(container) = container else {
            return self.add_to_topmost(pos);
        };

        assert!(
            self.is_container_record(container),
            "object at {} is not a container",
            container
        );
        assert!(!slots::is_fixed(pos), "fixed slot {} cannot be put into a container", pos);
        assert!(
            !self.subtree_contains(pos, container),
            "cannot put object at {} into itself",
            pos
        );

        let tail = self.contents(container).last();
        match tail {
            Some(tail) => {
                log::debug!("adding {} to container {} after {}", pos, container, tail);
                self.pool.get_mut(tail).link = Some(pos);
            }
            None => {
                log::debug!("adding {} to empty container {}", pos, container);
                self.pool.get_mut(container).quantity = ObjectQuantity::Contents(Some(pos));
            }
        }

        self.build_slot_list();
        Some(pos)
    }

    fn add_to_topmost(&mut self, pos: ObjectPos) -> Option<ObjectPos> {
        let free_slot = slots::topmost_positions().find(|&slot| self.pool.get(slot).is_free());
        let Some(slot) = free_slot else {
            log::warn!("no free topmost slot for object at {}", pos);
            return None;
        };

        let record = self.pool.get(pos).clone();
        *self.pool.get_mut(slot) = record;
        self.pool.free(pos);

        log::debug!("moved object at {} to topmost slot {}", pos, slot);
        self.build_slot_list();
        Some(slot)
    }

    /// Remove an object from a container
    ///
    /// Removing from the topmost view (`container` is `None`) frees the
    /// quick-slot; removing from a container only unlinks the record.
    ///
    /// # Panics
    ///
    /// Panics when the object is a container that still holds objects, or
    /// when it is not a member of `container`.
    pub fn remove_from_container(&mut self, pos: ObjectPos, container: Option<ObjectPos>) {
        assert!(
            self.pool.get(pos).contents().is_none(),
            "cannot remove container at {} that still holds objects",
            pos
        );

        match container {
            Some(container) => self.unlink(container, pos),
            None => {
                assert!(slots::is_topmost(pos), "object at {} is not in a topmost slot", pos);
                self.pool.free(pos);
            }
        }

        self.build_slot_list();
    }

    /// Splice `pos` out of the contents of `container`
    fn unlink(&mut self, container: ObjectPos, pos: ObjectPos) {
        let next = self.pool.get(pos).link;
        self.replace_member(container, pos, next);
        self.pool.get_mut(pos).link = None;
    }

    /// Make whatever pointed at `member` point at `replacement` instead
    fn replace_member(
        &mut self,
        container: ObjectPos,
        member: ObjectPos,
        replacement: Option<ObjectPos>,
    ) {
        if self.pool.get(container).contents() == Some(member) {
            self.pool.get_mut(container).quantity = ObjectQuantity::Contents(replacement);
            return;
        }

        let prev = self
            .contents(container)
            .find(|&prev| self.pool.get(prev).link == Some(member))
            .unwrap_or_else(|| panic!("object at {} is not in container {}", member, container));
        self.pool.get_mut(prev).link = replacement;
    }

    /// Find the container whose contents include `pos`
    fn find_parent(&self, pos: ObjectPos) -> Option<ObjectPos> {
        self.pool
            .iter()
            .filter(|(_, record)| record.contents().is_some())
            .map(|(container, _)| container)
            .find(|&container| self.contents(container).any(|member| member == pos))
    }

    fn subtree_contains(&self, root: ObjectPos, pos: ObjectPos) -> bool {
        root == pos || self.contents(root).any(|member| self.subtree_contains(member, pos))
    }

    // Floating object

    pub fn floating_object_pos(&self) -> Option<ObjectPos> {
        self.floating
    }

    /// Pick up an object with the cursor
    ///
    /// Objects in fixed slots are moved to a new dynamic record first, so the
    /// floating object is always a detached dynamic record. Containers keep
    /// their contents; if one of them is open, it is closed.
    pub fn float_object(&mut self, pos: ObjectPos) -> Result<ObjectPos, InventoryError> {
        assert!(
            self.floating.is_none(),
            "cannot float {} while another object is floating",
            pos
        );
        assert!(!self.pool.get(pos).is_free(), "cannot float empty slot {}", pos);

        let floating = if slots::is_fixed(pos) {
            let record = self.pool.get(pos).clone();
            let floating = self.insert_item(record)?;
            *self.pool.get_mut(pos) = ObjectRecord::default();
            floating
        } else {
            match self.find_parent(pos) {
                Some(container) => self.unlink(container, pos),
                None => assert!(
                    self.pool.get(pos).link.is_none(),
                    "object at {} is linked but not in a container",
                    pos
                ),
            }
            pos
        };

        let closed = self
            .container_stack
            .iter()
            .position(|&open| open == pos || self.subtree_contains(floating, open));
        if let Some(depth) = closed {
            self.container_stack.truncate(depth);
        }

        log::debug!("floating object at {} (picked up from {})", floating, pos);
        self.floating = Some(floating);
        self.build_slot_list();
        Ok(floating)
    }

    /// Place the floating object
    ///
    /// - `(None, None)`: append to the parent of the open container, or to a
    ///   free quick-slot
    /// - `(Some(c), None)`: append to container `c`
    /// - `(_, Some(t))`: drop onto `t`; an empty slot takes the object, a
    ///   container receives it, anything else is combined with it or swapped
    ///
    /// Every placement is checked against the container or slot the object
    /// actually lands in. Returns `false` and keeps the object floating when
    /// it can't be placed.
    pub fn drop_floating_object(
        &mut self,
        container: Option<ObjectPos>,
        target: Option<ObjectPos>,
    ) -> bool {
        let Some(floating) = self.floating else {
            log::warn!("no floating object to drop");
            return false;
        };

        match target {
            None => {
                let destination = container.or_else(|| self.parent_container_pos());
                if !self.check_drop(floating, destination) {
                    return false;
                }
                self.append_floating(floating, destination)
            }
            Some(target) => {
                if !self.check_drop(floating, Some(target)) {
                    return false;
                }
                self.drop_on_object(floating, container, target)
            }
        }
    }

    /// [`Self::can_drop_item_on_pos`], logging refusals
    fn check_drop(&self, floating: ObjectPos, pos: Option<ObjectPos>) -> bool {
        if self.can_drop_item_on_pos(floating, pos) {
            return true;
        }
        log::warn!(
            "cannot drop {} on {}",
            self.pool.get(floating).item_id,
            pos.map_or_else(|| "topmost".to_string(), |pos| pos.to_string())
        );
        false
    }

    fn append_floating(&mut self, floating: ObjectPos, container: Option<ObjectPos>) -> bool {
        if self.add_to_container(floating, container).is_none() {
            return false;
        }
        self.floating = None;
        true
    }

    fn drop_on_object(
        &mut self,
        floating: ObjectPos,
        container: Option<ObjectPos>,
        target: ObjectPos,
    ) -> bool {
        assert!(target != floating, "cannot drop the floating object onto itself");

        let target_record = self.pool.get(target);
        if target_record.is_free() {
            if !slots::is_fixed(target) {
                // free dynamic records are never chained
                if !self.check_drop(floating, container) {
                    return false;
                }
                return self.append_floating(floating, container);
            }

            let record = self.pool.get(floating).clone();
            *self.pool.get_mut(target) = record;
            self.pool.free(floating);
            self.floating = None;

            log::debug!("dropped object into empty slot {}", target);
            self.build_slot_list();
            return true;
        }

        if self.is_container_record(target) {
            return self.append_floating(floating, Some(target));
        }

        if self.try_combine_items(target, floating) {
            return true;
        }

        self.swap_with_floating(container, target)
    }

    /// Combine `second` into `first` if a rule matches
    fn try_combine_items(&mut self, first: ObjectPos, second: ObjectPos) -> bool {
        let first_id = self.pool.get(first).item_id;
        let second_id = self.pool.get(second).item_id;

        let Some(found) = self.combine_rules.find(first_id, second_id) else {
            return false;
        };
        if found.effect != CombineEffect::ReplaceSecond && !self.slot_accepts(found.result, first) {
            log::debug!("combined {} doesn't fit slot {}", found.result, first);
            return false;
        }
        log::debug!(
            "combining {} and {} into {} ({:?})",
            first_id,
            second_id,
            found.result,
            found.effect
        );

        match found.effect {
            CombineEffect::ReplaceFirst => self.pool.get_mut(first).item_id = found.result,
            CombineEffect::ReplaceSecond => self.pool.get_mut(second).item_id = found.result,
            CombineEffect::ReplaceFirstConsumeSecond => {
                self.pool.get_mut(first).item_id = found.result;
                self.consume(second);
            }
        }

        self.build_slot_list();
        true
    }

    /// Remove an object from wherever it is held and free it
    fn consume(&mut self, pos: ObjectPos) {
        assert!(
            self.pool.get(pos).contents().is_none(),
            "cannot consume container at {} that still holds objects",
            pos
        );

        if self.floating == Some(pos) {
            self.floating = None;
        } else if slots::is_fixed(pos) {
            *self.pool.get_mut(pos) = ObjectRecord::default();
            return;
        } else if let Some(container) = self.find_parent(pos) {
            self.unlink(container, pos);
        }
        self.pool.free(pos);
    }

    /// Exchange the floating object with the object at `target`
    ///
    /// Returns `false` when the container holding `target` won't take the
    /// floating object in its place.
    fn swap_with_floating(&mut self, container: Option<ObjectPos>, target: ObjectPos) -> bool {
        let Some(floating) = self.floating else {
            return false;
        };

        if slots::is_fixed(target) {
            // both records are unchained, so a plain exchange keeps every link
            self.pool.swap(target, floating);
        } else {
            let parent = container
                .filter(|&c| self.contents(c).any(|member| member == target))
                .or_else(|| self.find_parent(target))
                .unwrap_or_else(|| panic!("object at {} is not in any container", target));

            if !self.container_accepts(parent, floating, Some(target)) {
                log::warn!(
                    "cannot swap {} into container {}",
                    self.pool.get(floating).item_id,
                    parent
                );
                return false;
            }

            let next = self.pool.get(target).link;
            self.replace_member(parent, target, Some(floating));
            self.pool.get_mut(floating).link = next;
            self.pool.get_mut(target).link = None;
            self.floating = Some(target);
        }

        log::debug!("swapped floating object with {}", target);
        self.build_slot_list();
        true
    }

    /// Check if the object at `object` may be dropped on `pos`
    ///
    /// Containers must accept the object's class and have room for its
    /// weight; paperdoll slots only take objects of their armour category.
    /// Dropping without a target is always allowed.
    pub fn can_drop_item_on_pos(&self, object: ObjectPos, pos: Option<ObjectPos>) -> bool {
        let Some(pos) = pos else {
            return true;
        };
        if self.is_container_record(pos) && !self.container_accepts(pos, object, None) {
            return false;
        }

        self.slot_accepts(self.pool.get(object).item_id, pos)
    }

    /// Check class and capacity of `container` for `object`, with `leaving`
    /// taken out of it first
    fn container_accepts(
        &self,
        container: ObjectPos,
        object: ObjectPos,
        leaving: Option<ObjectPos>,
    ) -> bool {
        let item_id = self.pool.get(object).item_id;
        let container_id = self.pool.get(container).item_id;
        let property = self.properties.container(container_id);

        if !property.accepts.accepts(item_id) {
            log::debug!("container {} doesn't accept {}", container_id, item_id);
            return false;
        }

        if property.capacity != 0 {
            let remaining = self.contents_weight(container)
                - leaving.map_or(0, |pos| self.object_weight(pos));
            let weight = remaining + self.object_weight(object);
            if weight > u32::from(property.capacity) {
                log::debug!(
                    "container {} is full ({} of {} tenths)",
                    container_id,
                    weight,
                    property.capacity
                );
                return false;
            }
        }

        true
    }

    fn slot_accepts(&self, item_id: ItemId, pos: ObjectPos) -> bool {
        match PaperdollSlot::from_pos(pos).and_then(|slot| slot.required_category()) {
            Some(category) => self.properties.armour_category(item_id) == category,
            None => true,
        }
    }

    // Weight

    /// Weight of an object and everything inside it, in tenths of a stone
    pub fn object_weight(&self, pos: ObjectPos) -> u32 {
        let record = self.pool.get(pos);
        if record.is_free() {
            return 0;
        }

        let mass = u32::from(self.properties.common(record.item_id).mass);
        if Self::is_container(record.item_id) {
            mass + self.contents_weight(pos)
        } else {
            mass
        }
    }

    /// Weight of everything inside a container
    pub fn contents_weight(&self, container: ObjectPos) -> u32 {
        self.contents(container)
            .map(|member| self.object_weight(member))
            .sum()
    }

    /// Weight carried in the quick-slots and on the paperdoll
    pub fn inventory_weight(&self) -> u32 {
        slots::fixed_positions()
            .map(|pos| self.object_weight(pos))
            .sum()
    }

    // Consistency

    /// Verify the object graph
    ///
    /// Every used dynamic record must be reachable exactly once from the
    /// fixed slots or the floating object, the container stack must hold
    /// only containers, and unchained records must not carry a link.
    pub fn check_invariants(&self) -> Result<(), InventoryError> {
        for &open in &self.container_stack {
            if !self.pool.contains(open) || !self.is_container_record(open) {
                return Err(corrupt(format!("open container {} is not a container", open)));
            }
        }

        let mut seen = vec![false; self.pool.len()];

        if let Some(floating) = self.floating {
            if !self.pool.contains(floating) || slots::is_fixed(floating) {
                return Err(corrupt(format!("invalid floating object {}", floating)));
            }
            if self.pool.get(floating).is_free() {
                return Err(corrupt(format!("floating object {} is free", floating)));
            }
            seen[floating.index()] = true;
        }

        let roots = slots::fixed_positions().chain(self.floating);
        for root in roots {
            let record = self.pool.get(root);
            if record.link.is_some() {
                return Err(corrupt(format!("unchained object {} has a link", root)));
            }
            self.mark_contents(root, &mut seen)?;
        }

        let orphan = self
            .pool
            .iter()
            .skip(SLOT_MAX as usize)
            .find(|(pos, record)| !record.is_free() && !seen[pos.index()]);
        if let Some((pos, record)) = orphan {
            return Err(corrupt(format!(
                "object {} at {} is not reachable",
                record.item_id, pos
            )));
        }

        Ok(())
    }

    fn mark_contents(&self, container: ObjectPos, seen: &mut [bool]) -> Result<(), InventoryError> {
        let mut next = self.pool.get(container).contents();
        while let Some(member) = next {
            if !self.pool.contains(member) {
                return Err(corrupt(format!("dangling link {} in {}", member, container)));
            }
            if slots::is_fixed(member) {
                return Err(corrupt(format!("fixed slot {} is chained in {}", member, container)));
            }
            if seen[member.index()] {
                return Err(corrupt(format!("object at {} is reachable twice", member)));
            }
            seen[member.index()] = true;

            let record = self.pool.get(member);
            if record.is_free() {
                return Err(corrupt(format!("free record {} is chained in {}", member, container)));
            }
            self.mark_contents(member, seen)?;
            next = record.link;
        }
        Ok(())
    }

    /// Capture the used records and navigation state
    pub fn snapshot(&self) -> InventorySnapshot {
        InventorySnapshot {
            pool_size: self.pool.len(),
            weight: self.inventory_weight(),
            objects: self
                .pool
                .iter()
                .filter(|(_, record)| !record.is_free())
                .map(|(pos, record)| SnapshotObject {
                    pos,
                    record: record.clone(),
                })
                .collect(),
            container_stack: self.container_stack.clone(),
            slot_list: self.slot_list.clone(),
            floating: self.floating,
        }
    }
}

fn corrupt(message: String) -> InventoryError {
    InventoryError::Corrupt(message)
}

/// Used object record with its position
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotObject {
    pub pos: ObjectPos,
    #[serde(flatten)]
    pub record: ObjectRecord,
}

/// Serializable view of an inventory
#[derive(Debug, Clone, Serialize)]
pub struct InventorySnapshot {
    pub pool_size: usize,
    /// Carried weight in tenths of a stone
    pub weight: u32,
    pub objects: Vec<SnapshotObject>,
    pub container_stack: Vec<ObjectPos>,
    pub slot_list: Vec<ObjectPos>,
    pub floating: Option<ObjectPos>,
}

impl Serialize for Inventory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.snapshot().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BAG: ItemId = ItemId::new(0x0080);
    const APPLE: ItemId = ItemId::new(0x00b0);

    fn bag_in_slot(inventory: &mut Inventory, slot: u16) -> ObjectPos {
        let pos = ObjectPos::new(slot);
        *inventory.object_info_mut(pos) = ObjectRecord::container(BAG);
        pos
    }

    #[test]
    fn test_topmost_view_has_eight_slots() {
        let inventory = Inventory::new();
        assert_eq!(inventory.num_slots(), 8);
        assert_eq!(inventory.slot_list_pos(7), ObjectPos::new(7));
        assert_eq!(inventory.container_pos(), None);
        assert!(inventory.check_invariants().is_ok());
    }

    #[test]
    fn test_open_and_close_container() {
        let mut inventory = Inventory::new();
        let bag = bag_in_slot(&mut inventory, 0);
        let apple = inventory.insert_item(ObjectRecord::new(APPLE)).unwrap();
        inventory.add_to_container(apple, Some(bag));

        inventory.open_container(bag);
        assert_eq!(inventory.container_pos(), Some(bag));
        assert_eq!(inventory.slot_list(), &[apple]);

        inventory.close_container();
        assert_eq!(inventory.num_slots(), 8);
    }

    #[test]
    fn test_paperdoll_container_starts_new_stack() {
        let mut inventory = Inventory::new();
        let quick_bag = bag_in_slot(&mut inventory, 0);
        let shoulder_bag = bag_in_slot(&mut inventory, PaperdollSlot::LeftShoulder as u16);

        inventory.open_container(quick_bag);
        inventory.open_container(shoulder_bag);
        assert_eq!(inventory.container_stack(), &[shoulder_bag]);
        assert_eq!(inventory.parent_container_pos(), None);
    }

    #[test]
    #[should_panic]
    fn test_open_non_container_panics() {
        let mut inventory = Inventory::new();
        *inventory.object_info_mut(ObjectPos::new(0)) = ObjectRecord::new(APPLE);
        inventory.open_container(ObjectPos::new(0));
    }

    #[test]
    #[should_panic]
    fn test_close_topmost_panics() {
        Inventory::new().close_container();
    }

    #[test]
    fn test_weight_includes_contents() {
        let properties = ObjectProperties::new().with_mass(BAG, 10).with_mass(APPLE, 3);
        let mut inventory = Inventory::new().with_properties(Arc::new(properties));
        let bag = bag_in_slot(&mut inventory, 0);
        for _ in 0..2 {
            let apple = inventory.insert_item(ObjectRecord::new(APPLE)).unwrap();
            inventory.add_to_container(apple, Some(bag));
        }

        assert_eq!(inventory.contents_weight(bag), 6);
        assert_eq!(inventory.object_weight(bag), 16);
        assert_eq!(inventory.inventory_weight(), 16);
    }

    #[test]
    fn test_check_invariants_finds_orphans() {
        let mut inventory = Inventory::new();
        inventory.insert_item(ObjectRecord::new(APPLE)).unwrap();
        assert!(matches!(
            inventory.check_invariants(),
            Err(InventoryError::Corrupt(_))
        ));
    }

    #[test]
    fn test_destroy_and_create() {
        let mut inventory = Inventory::new();
        bag_in_slot(&mut inventory, 0);
        inventory.open_container(ObjectPos::new(0));

        inventory.destroy();
        assert_eq!(inventory.pool().used(), 0);
        assert_eq!(inventory.container_pos(), None);

        inventory.create();
        assert_eq!(inventory.pool().len(), INITIAL_POOL_SIZE);
        assert_eq!(inventory.num_slots(), 8);
    }

    #[test]
    fn test_snapshot_lists_used_objects() {
        let mut inventory = Inventory::new();
        bag_in_slot(&mut inventory, 3);
        let snapshot = inventory.snapshot();
        assert_eq!(snapshot.objects.len(), 1);
        assert_eq!(snapshot.objects[0].pos, ObjectPos::new(3));
        assert_eq!(snapshot.floating, None);
    }
}
