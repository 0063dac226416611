//! Item combining
//!
//! Dropping one item onto another consults a table of combine rules. A rule
//! names two item kinds, the resulting kind and which of the two operands
//! is transformed or consumed.

use crate::error::InventoryError;
use uw_core::ItemId;

/// Size of one combine rule record in bytes
pub const COMBINE_RECORD_SIZE: usize = 6;

/// Bit of an item field that flags "destroyed on match"
const DESTROYED_BIT: u16 = 0x8000;

/// What happens to the two operands of a matching rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CombineEffect {
    /// First operand becomes the result
    ReplaceFirst,
    /// Second operand becomes the result
    ReplaceSecond,
    /// First operand becomes the result and the second is consumed
    ReplaceFirstConsumeSecond,
}

impl CombineEffect {
    /// Decode a destroyed mask; valid masks are 1, 2 and 3
    pub fn from_mask(mask: u8) -> Option<Self> {
        match mask {
            1 => Some(Self::ReplaceFirst),
            2 => Some(Self::ReplaceSecond),
            3 => Some(Self::ReplaceFirstConsumeSecond),
            _ => None,
        }
    }

    pub fn mask(&self) -> u8 {
        match self {
            Self::ReplaceFirst => 1,
            Self::ReplaceSecond => 2,
            Self::ReplaceFirstConsumeSecond => 3,
        }
    }

    /// Effect with the roles of both operands exchanged
    pub fn swapped(&self) -> Self {
        match self {
            Self::ReplaceFirst => Self::ReplaceSecond,
            Self::ReplaceSecond => Self::ReplaceFirst,
            Self::ReplaceFirstConsumeSecond => Self::ReplaceFirstConsumeSecond,
        }
    }
}

/// A single combine rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CombineRule {
    pub first: ItemId,
    pub second: ItemId,
    pub result: ItemId,
    pub effect: CombineEffect,
}

/// Result of a rule lookup, already oriented to the queried operand order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CombineMatch {
    pub result: ItemId,
    pub effect: CombineEffect,
}

/// Table of combine rules
#[derive(Debug, Clone, Default)]
pub struct CombineRuleEngine {
    rules: Vec<CombineRule>,
}

impl CombineRuleEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule
    ///
    /// # Panics
    ///
    /// Panics when `mask` is not 1, 2 or 3.
    pub fn add_rule(&mut self, first: ItemId, second: ItemId, result: ItemId, mask: u8) {
        let effect = CombineEffect::from_mask(mask)
            .unwrap_or_else(|| panic!("invalid combine destroyed mask {}", mask));
        self.rules.push(CombineRule {
            first,
            second,
            result,
            effect,
        });
    }

    /// Builder form of [`add_rule`](Self::add_rule)
    pub fn with_rule(mut self, first: ItemId, second: ItemId, result: ItemId, mask: u8) -> Self {
        self.add_rule(first, second, result, mask);
        self
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn rules(&self) -> &[CombineRule] {
        &self.rules
    }

    /// Find the rule combining `first` with `second`
    ///
    /// Rules match in either operand order; a rule matched in reverse order
    /// reports its effect with swapped roles.
    pub fn find(&self, first: ItemId, second: ItemId) -> Option<CombineMatch> {
        self.rules.iter().find_map(|rule| {
            if rule.first == first && rule.second == second {
                Some(CombineMatch {
                    result: rule.result,
                    effect: rule.effect,
                })
            } else if rule.first == second && rule.second == first {
                Some(CombineMatch {
                    result: rule.result,
                    effect: rule.effect.swapped(),
                })
            } else {
                None
            }
        })
    }

    /// Read a rule table of 6-byte little-endian records
    ///
    /// Each record is `item1, item2, result`; bit 15 of an item field flags
    /// that operand as destroyed. An all-zero record ends the table.
    pub fn from_bytes(data: &[u8]) -> Result<Self, InventoryError> {
        let mut engine = Self::new();

        for record in data.chunks(COMBINE_RECORD_SIZE) {
            if record.len() < COMBINE_RECORD_SIZE {
                return Err(InventoryError::CombineTableTruncated(record.len()));
            }

            let field = |i: usize| u16::from_le_bytes([record[i * 2], record[i * 2 + 1]]);
            let (item1, item2, result) = (field(0), field(1), field(2));
            if item1 == 0 && item2 == 0 && result == 0 {
                break;
            }

            let mask = u8::from(item1 & DESTROYED_BIT != 0)
                | (u8::from(item2 & DESTROYED_BIT != 0) << 1);
            let first = ItemId::new(item1 & !DESTROYED_BIT);
            let second = ItemId::new(item2 & !DESTROYED_BIT);

            match CombineEffect::from_mask(mask) {
                Some(effect) => engine.rules.push(CombineRule {
                    first,
                    second,
                    result: ItemId::new(result),
                    effect,
                }),
                None => log::warn!(
                    "ignoring combine rule {} + {} -> {:#06x} without destroyed operand",
                    first,
                    second,
                    result
                ),
            }
        }

        log::debug!("loaded {} combine rules", engine.len());
        Ok(engine)
    }
}
