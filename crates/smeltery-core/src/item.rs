use crate::id::{EffectId, ItemKind, SourceKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An item as the host hands it over: placed furnaces, drops, and smelt
/// results. Effects are the enchantment-like levels the item carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    pub item: ItemKind,
    pub quantity: u32,
    #[serde(default)]
    pub effects: BTreeMap<EffectId, i32>,
}

impl ItemStack {
    pub fn new(item: ItemKind, quantity: u32) -> Self {
        Self {
            item,
            quantity,
            effects: BTreeMap::new(),
        }
    }

    /// Builder-style effect assignment.
    pub fn with_effect(mut self, effect: EffectId, level: i32) -> Self {
        self.effects.insert(effect, level);
        self
    }

    /// Level of an effect, zero if absent.
    pub fn effect(&self, effect: EffectId) -> i32 {
        self.effects.get(&effect).copied().unwrap_or(0)
    }
}

/// Contents of one furnace slot as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotStack {
    pub item: ItemKind,
    pub variant: u16,
    pub quantity: u32,
    pub max_stack: u32,
}

impl SlotStack {
    pub fn new(item: ItemKind, quantity: u32, max_stack: u32) -> Self {
        Self {
            item,
            variant: 0,
            quantity,
            max_stack,
        }
    }

    pub fn source_kind(&self) -> SourceKind {
        SourceKind::new(self.item, self.variant)
    }

    /// Whether the stack can take `extra` more units.
    pub fn has_room_for(&self, extra: u32) -> bool {
        self.quantity.saturating_add(extra) <= self.max_stack
    }
}

/// The three slots of a furnace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FurnaceSlots {
    pub input: Option<SlotStack>,
    pub fuel: Option<SlotStack>,
    pub output: Option<SlotStack>,
}

impl FurnaceSlots {
    /// Whether the output slot can accept one more smelted unit.
    pub fn output_has_room(&self) -> bool {
        self.output.is_none_or(|out| out.has_room_for(1))
    }

    /// Input quantity, zero when empty.
    pub fn input_quantity(&self) -> u32 {
        self.input.map_or(0, |s| s.quantity)
    }

    pub fn has_fuel(&self) -> bool {
        self.fuel.is_some_and(|s| s.quantity > 0)
    }
}
