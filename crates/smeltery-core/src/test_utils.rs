//! Shared test helpers for integration tests and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so these helpers
//! are available in unit tests, integration tests, and benchmarks (via the
//! `test-utils` feature).

use crate::config::SmelteryConfig;
use crate::controller::Controller;
use crate::id::*;
use crate::item::{FurnaceSlots, ItemStack, SlotStack};
use crate::modifier::EffectTable;
use crate::recipe::{RecipeBook, RecipeBookBuilder, Variant};
use crate::rng::DrawSource;
use crate::ticks::Ticks;
use crate::world::{FurnaceBlock, World};
use std::collections::{HashMap, VecDeque};

// ===========================================================================
// Item kinds (ids match registration order in `recipe_book`)
// ===========================================================================

pub fn iron_ore() -> ItemKind {
    ItemKind(0)
}
pub fn iron_ingot() -> ItemKind {
    ItemKind(1)
}
pub fn sand() -> ItemKind {
    ItemKind(2)
}
pub fn glass() -> ItemKind {
    ItemKind(3)
}
pub fn furnace() -> ItemKind {
    ItemKind(4)
}

// ===========================================================================
// Effects
// ===========================================================================

pub const BURN: EffectId = EffectId(1);
pub const COOK: EffectId = EffectId(2);
pub const FORTUNE: EffectId = EffectId(3);
pub const FUEL_SAVING: EffectId = EffectId(4);

pub fn effect_table() -> EffectTable {
    EffectTable {
        burn: BURN,
        cook: COOK,
        fortune: FORTUNE,
        fuel_saving: FUEL_SAVING,
    }
}

/// A furnace item carrying the given modifier levels.
pub fn furnace_item(burn: i32, cook: i32, fortune: i32, fuel_saving: bool) -> ItemStack {
    let mut item = ItemStack::new(furnace(), 1);
    for (effect, level) in [
        (BURN, burn),
        (COOK, cook),
        (FORTUNE, fortune),
        (FUEL_SAVING, i32::from(fuel_saving)),
    ] {
        if level != 0 {
            item = item.with_effect(effect, level);
        }
    }
    item
}

// ===========================================================================
// Recipes
// ===========================================================================

pub fn recipe_book() -> RecipeBook {
    let mut b = RecipeBookBuilder::new();
    let ore = b.register_item("iron_ore");
    let ingot = b.register_item("iron_ingot");
    let sand = b.register_item("sand");
    let glass = b.register_item("glass");
    b.register_item("furnace");
    b.register_recipe(ore, Variant::Any, ingot);
    b.register_recipe(sand, Variant::Exact(0), glass);
    match b.build() {
        Ok(book) => book,
        Err(err) => panic!("fixture recipe book is invalid: {err}"),
    }
}

// ===========================================================================
// Locations and stacks
// ===========================================================================

pub fn loc(x: i32, z: i32) -> Location {
    Location::new(WorldId(0), x, 64, z)
}

pub fn ore_source() -> SourceKind {
    SourceKind::plain(iron_ore())
}

pub fn ore_slot(quantity: u32) -> Option<SlotStack> {
    Some(SlotStack::new(iron_ore(), quantity, 64))
}

pub fn ingot_slot(quantity: u32) -> Option<SlotStack> {
    Some(SlotStack::new(iron_ingot(), quantity, 64))
}

pub fn ingot_stack(quantity: u32) -> ItemStack {
    ItemStack::new(iron_ingot(), quantity)
}

// ===========================================================================
// Mock host
// ===========================================================================

/// A furnace block with plain public counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockFurnace {
    pub location: Location,
    pub burn_time: Ticks,
    pub cook_time: Ticks,
    /// `None` until the engine writes a cycle length.
    pub cook_time_total: Option<Ticks>,
    pub slots: FurnaceSlots,
}

impl MockFurnace {
    pub fn new(location: Location) -> Self {
        Self {
            location,
            burn_time: 0,
            cook_time: 0,
            cook_time_total: None,
            slots: FurnaceSlots::default(),
        }
    }
}

impl FurnaceBlock for MockFurnace {
    fn location(&self) -> Location {
        self.location
    }

    fn burn_time(&self) -> Ticks {
        self.burn_time
    }

    fn set_burn_time(&mut self, ticks: Ticks) {
        self.burn_time = ticks;
    }

    fn cook_time(&self) -> Ticks {
        self.cook_time
    }

    fn set_cook_time(&mut self, ticks: Ticks) {
        self.cook_time = ticks;
    }

    fn set_cook_time_total(&mut self, ticks: Ticks) {
        self.cook_time_total = Some(ticks);
    }

    fn slots(&self) -> FurnaceSlots {
        self.slots
    }
}

/// A host world holding mock furnaces by location.
#[derive(Debug, Default)]
pub struct MockWorld {
    furnaces: HashMap<Location, MockFurnace>,
}

impl MockWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place an empty furnace block, replacing any at `at`.
    pub fn add(&mut self, at: Location) -> &mut MockFurnace {
        self.furnaces.insert(at, MockFurnace::new(at));
        self.furnace_mut_mock(at)
    }

    pub fn furnace(&self, at: Location) -> &MockFurnace {
        match self.furnaces.get(&at) {
            Some(f) => f,
            None => panic!("no mock furnace at {at:?}"),
        }
    }

    pub fn furnace_mut_mock(&mut self, at: Location) -> &mut MockFurnace {
        match self.furnaces.get_mut(&at) {
            Some(f) => f,
            None => panic!("no mock furnace at {at:?}"),
        }
    }

    pub fn remove(&mut self, at: Location) -> Option<MockFurnace> {
        self.furnaces.remove(&at)
    }
}

impl World for MockWorld {
    fn furnace_mut(&mut self, at: Location) -> Option<&mut dyn FurnaceBlock> {
        self.furnaces
            .get_mut(&at)
            .map(|f| f as &mut dyn FurnaceBlock)
    }
}

// ===========================================================================
// Draws
// ===========================================================================

/// Returns scripted values in order, clamped into the requested range.
/// Returns `low` once the script runs out.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDraw {
    values: VecDeque<i32>,
}

impl ScriptedDraw {
    pub fn new(values: impl IntoIterator<Item = i32>) -> Self {
        Self {
            values: values.into_iter().collect(),
        }
    }
}

impl DrawSource for ScriptedDraw {
    fn draw(&mut self, low: i32, high: i32) -> i32 {
        if high <= low {
            return low;
        }
        self.values
            .pop_front()
            .map_or(low, |v| v.clamp(low, high - 1))
    }
}

// ===========================================================================
// Controller
// ===========================================================================

/// A controller with default config, the fixture recipes and effects, and
/// scripted fortune draws.
pub fn controller(draws: Vec<i32>) -> Controller {
    controller_with(SmelteryConfig::default(), draws)
}

pub fn controller_with(config: SmelteryConfig, draws: Vec<i32>) -> Controller {
    Controller::new(config, Box::new(recipe_book()), Box::new(effect_table()))
        .with_rng(Box::new(ScriptedDraw::new(draws)))
}
