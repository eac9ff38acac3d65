//! Per-furnace state: modifier levels and the pause/resume machine.
//!
//! A furnace with fuel saving pauses when it runs out of work: the remaining
//! burn time of its current fuel is parked and the host's burn counter is
//! zeroed. It resumes once input is available again, restoring the parked
//! burn time instead of consuming a fresh fuel item.

use crate::id::Location;
use crate::item::{FurnaceSlots, ItemStack};
use crate::modifier::ModifierLevels;
use crate::ticks::Ticks;
use crate::world::FurnaceBlock;
use serde::{Deserialize, Serialize};

/// Observable phase of a registered furnace. A destroyed furnace has no
/// state at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FurnacePhase {
    Active,
    Paused,
}

/// State of one furnace. Levels are fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FurnaceState {
    location: Location,
    item: ItemStack,
    levels: ModifierLevels,
    paused: bool,
    frozen_burn: Ticks,
}

impl FurnaceState {
    pub fn new(location: Location, item: ItemStack, levels: ModifierLevels) -> Self {
        Self {
            location,
            item,
            levels,
            paused: false,
            frozen_burn: 0,
        }
    }

    pub fn location(&self) -> Location {
        self.location
    }

    /// The item this furnace was placed from.
    pub fn item(&self) -> &ItemStack {
        &self.item
    }

    pub fn levels(&self) -> ModifierLevels {
        self.levels
    }

    pub fn burn_modifier(&self) -> i32 {
        self.levels.burn
    }

    pub fn cook_modifier(&self) -> i32 {
        self.levels.cook
    }

    pub fn fortune(&self) -> u32 {
        self.levels.fortune
    }

    pub fn can_pause(&self) -> bool {
        self.levels.fuel_saving
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Burn ticks parked while paused.
    pub fn frozen_burn(&self) -> Ticks {
        self.frozen_burn
    }

    pub fn phase(&self) -> FurnacePhase {
        if self.paused {
            FurnacePhase::Paused
        } else {
            FurnacePhase::Active
        }
    }

    /// Whether the furnace should pause given its slots.
    ///
    /// `incoming` is the output quantity of a smelt that has not yet been
    /// applied to the slots, or zero outside a smelt. A pending smelt
    /// consumes one input unit and adds `incoming` output units, which is
    /// more than one when fortune overrode the result.
    pub fn should_pause(&self, slots: &FurnaceSlots, incoming: u32) -> bool {
        if !self.can_pause() || self.paused {
            return false;
        }
        let input_left = slots.input_quantity().saturating_sub(u32::from(incoming > 0));
        if input_left == 0 {
            return true;
        }
        slots
            .output
            .is_some_and(|out| !out.has_room_for(incoming.saturating_add(1)))
    }

    /// Park the block's remaining burn time. Returns false if this furnace
    /// cannot pause or is already paused.
    pub fn pause(&mut self, block: &mut dyn FurnaceBlock) -> bool {
        if !self.can_pause() || self.paused {
            return false;
        }
        self.frozen_burn = block.burn_time().max(0);
        block.set_burn_time(0);
        self.paused = true;
        true
    }

    /// Leave the paused phase if there is work to do and something to burn.
    ///
    /// Returns true only when parked burn time was handed back to the block,
    /// meaning the host must not burn a new fuel item. With nothing parked
    /// the fuel slot must hold fuel; the furnace then becomes active and the
    /// host's own fuel accounting takes over.
    pub fn resume(&mut self, block: &mut dyn FurnaceBlock) -> bool {
        if !self.paused {
            return false;
        }
        let slots = block.slots();
        if slots.input_quantity() == 0 || !slots.output_has_room() {
            return false;
        }
        if self.frozen_burn <= 0 && !slots.has_fuel() {
            return false;
        }

        self.paused = false;
        if self.frozen_burn <= 0 {
            self.frozen_burn = 0;
            return false;
        }
        block.set_burn_time(self.frozen_burn);
        self.frozen_burn = 0;
        true
    }

    pub fn to_record(&self) -> FurnaceRecord {
        FurnaceRecord {
            location: self.location,
            item: self.item.clone(),
            levels: self.levels,
            paused: self.paused,
            frozen_burn: self.frozen_burn,
        }
    }

    pub fn from_record(record: FurnaceRecord) -> Self {
        Self {
            location: record.location,
            item: record.item,
            levels: record.levels,
            paused: record.paused,
            frozen_burn: record.frozen_burn.max(0),
        }
    }
}

/// Persisted form of a [`FurnaceState`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FurnaceRecord {
    pub location: Location,
    pub item: ItemStack,
    pub levels: ModifierLevels,
    #[serde(default)]
    pub paused: bool,
    #[serde(default)]
    pub frozen_burn: Ticks,
}
