//! Event-driven orchestration of enchanted furnaces.
//!
//! The host pushes one notification at a time. The controller looks the
//! furnace up by location, applies tick modifiers and fortune, and queues
//! the writes that must wait for the next tick. [`Controller::run_tick`]
//! drains those writes at the start of each host tick.
//!
//! # Threading
//!
//! All calls must come from the host's single simulation thread. The
//! controller does no locking of its own.
//!
//! # Failure handling
//!
//! Nothing here fails the host's notification. Missing recipes, storage
//! errors, and actions aimed at furnaces that no longer exist are logged
//! and skipped for that furnace only.

use crate::config::SmelteryConfig;
use crate::deferred::{DeferredAction, DeferredQueue};
use crate::fortune;
use crate::id::{FurnaceId, Location, RegionId, SourceKind};
use crate::item::ItemStack;
use crate::modifier::ModifierLevelLookup;
use crate::persist::{FurnaceStore, MemoryStore};
use crate::recipe::RecipeLookup;
use crate::registry::FurnaceRegistry;
use crate::rng::{DrawSource, SimRng};
use crate::state::{FurnaceRecord, FurnaceState};
use crate::ticks::Ticks;
use crate::world::{FurnaceBlock, World};
use tracing::{debug, error};

// ---------------------------------------------------------------------------
// Decisions handed back to the host
// ---------------------------------------------------------------------------

/// What the host should do with a fuel item it is about to burn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FuelDecision {
    /// Not an enchanted furnace; burn as usual.
    Default,
    /// Burn the fuel for this many ticks instead.
    Override(Ticks),
    /// Do not consume the fuel; parked burn time was restored.
    Cancel,
}

/// What the host should place in the output slot for a finished smelt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SmeltDecision {
    Default,
    /// Replace the whole result, quantity included.
    Override(ItemStack),
}

impl SmeltDecision {
    /// The stack the host should produce given what it proposed.
    pub fn resolve(self, proposed: ItemStack) -> ItemStack {
        match self {
            SmeltDecision::Default => proposed,
            SmeltDecision::Override(stack) => stack,
        }
    }
}

/// Who broke the furnace and whether the block would normally drop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BreakContext {
    pub creative: bool,
    /// Whether the breaker's tool would harvest the block.
    pub harvestable: bool,
}

/// What the host should do with a broken furnace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DestroyOutcome {
    /// Not an enchanted furnace; break as usual.
    Unmanaged,
    /// Cancel the default break, clear the block, and drop `drop` if set.
    Replace { drop: Option<ItemStack> },
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

pub struct Controller {
    config: SmelteryConfig,
    registry: FurnaceRegistry,
    deferred: DeferredQueue,
    store: Box<dyn FurnaceStore>,
    recipes: Box<dyn RecipeLookup>,
    modifiers: Box<dyn ModifierLevelLookup>,
    rng: Box<dyn DrawSource>,
    tick: u64,
}

impl Controller {
    /// Create a controller with an in-memory store and a zero-seeded RNG.
    pub fn new(
        config: SmelteryConfig,
        recipes: Box<dyn RecipeLookup>,
        modifiers: Box<dyn ModifierLevelLookup>,
    ) -> Self {
        Self {
            config,
            registry: FurnaceRegistry::new(),
            deferred: DeferredQueue::new(),
            store: Box::new(MemoryStore::new()),
            recipes,
            modifiers,
            rng: Box::new(SimRng::new(0)),
            tick: 0,
        }
    }

    pub fn with_store(mut self, store: Box<dyn FurnaceStore>) -> Self {
        self.store = store;
        self
    }

    pub fn with_rng(mut self, rng: Box<dyn DrawSource>) -> Self {
        self.rng = rng;
        self
    }

    pub fn with_history(mut self, max_history: usize) -> Self {
        self.deferred = DeferredQueue::with_max_history(max_history);
        self
    }

    pub fn config(&self) -> &SmelteryConfig {
        &self.config
    }

    pub fn registry(&self) -> &FurnaceRegistry {
        &self.registry
    }

    pub fn deferred(&self) -> &DeferredQueue {
        &self.deferred
    }

    /// Ticks run so far.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn pending_actions(&self) -> usize {
        self.deferred.pending_count()
    }

    // -----------------------------------------------------------------------
    // Notifications
    // -----------------------------------------------------------------------

    /// A furnace is about to burn a fuel item for `proposed` ticks.
    pub fn on_fuel_consume(
        &mut self,
        world: &mut dyn World,
        at: Location,
        proposed: Ticks,
    ) -> FuelDecision {
        let Some(state) = self.registry.get_mut(at) else {
            return FuelDecision::Default;
        };

        if state.is_paused()
            && let Some(block) = world.furnace_mut(at)
            && state.resume(block)
        {
            debug!(?at, "resumed with parked fuel");
            return FuelDecision::Cancel;
        }

        FuelDecision::Override(self.config.burn_ticks(proposed, &state.levels()))
    }

    /// A furnace finished smelting one unit of `source`.
    pub fn on_smelt_complete(
        &mut self,
        world: &mut dyn World,
        at: Location,
        source: SourceKind,
        proposed: &ItemStack,
    ) -> SmeltDecision {
        let Some(id) = self.registry.id_at(at) else {
            return SmeltDecision::Default;
        };
        let Some(state) = self.registry.get(at) else {
            return SmeltDecision::Default;
        };
        let Some(block) = world.furnace_mut(at) else {
            debug!(?at, "smelt reported for a missing block");
            return SmeltDecision::Default;
        };
        let levels = state.levels();
        let slots = block.slots();

        let mut decision = SmeltDecision::Default;
        if levels.fortune > 0 && self.config.fortune.applies(source.item) {
            let bonus = fortune::compute_bonus(
                levels.fortune,
                slots.output.as_ref(),
                source,
                self.recipes.as_ref(),
                self.rng.as_mut(),
            );
            if let Some(mut stack) = bonus {
                // Keep the host's item data when the kind is unchanged.
                if stack.item == proposed.item {
                    stack.effects = proposed.effects.clone();
                }
                decision = SmeltDecision::Override(stack);
            }
        }

        let incoming = match &decision {
            SmeltDecision::Override(stack) => stack.quantity,
            SmeltDecision::Default => proposed.quantity.max(1),
        };
        if state.should_pause(&slots, incoming) {
            self.deferred
                .schedule(self.tick, DeferredAction::Pause { id, at });
        } else if levels.cook != 0 {
            self.deferred.schedule(
                self.tick,
                DeferredAction::CorrectCookTime {
                    id,
                    at,
                    cook_level: levels.cook,
                },
            );
        }

        decision
    }

    /// Items moved into or out of a furnace's inventory.
    pub fn on_inventory_changed(&mut self, at: Location) {
        let Some(id) = self.registry.id_at(at) else {
            return;
        };
        let Some(state) = self.registry.get(at) else {
            return;
        };
        let cook_level = state.cook_modifier();
        if cook_level == 0 && !state.can_pause() {
            return;
        }
        self.deferred
            .schedule(self.tick, DeferredAction::ContentsChanged { id, at, cook_level });
    }

    /// A furnace was placed from `item`. Items without any furnace modifier
    /// are not tracked.
    pub fn on_entity_placed(&mut self, at: Location, item: &ItemStack) -> Option<FurnaceId> {
        let levels = self.modifiers.levels(item);
        if levels.is_neutral() {
            return None;
        }
        let mut placed = item.clone();
        placed.quantity = 1;
        let id = self.registry.create(at, placed, levels);
        debug!(?at, ?levels, "enchanted furnace placed");
        Some(id)
    }

    /// A furnace was broken.
    pub fn on_entity_destroyed(&mut self, at: Location, breaker: BreakContext) -> DestroyOutcome {
        let Some(state) = self.registry.remove(at) else {
            return DestroyOutcome::Unmanaged;
        };
        if let Err(err) = self.store.remove(at) {
            error!(?at, %err, "failed to delete furnace record");
        }

        let drop = if breaker.creative || !breaker.harvestable {
            None
        } else {
            Some(state.item().clone())
        };
        debug!(?at, dropped = drop.is_some(), "enchanted furnace destroyed");
        DestroyOutcome::Replace { drop }
    }

    /// A region loaded. Returns how many furnaces were registered.
    pub fn on_region_load(&mut self, region: RegionId) -> usize {
        match self.store.load_region(region) {
            Ok(records) => self.registry.load_region(region, records),
            Err(err) => {
                // Left unloaded so an unload cannot overwrite the stored blob.
                error!(?region, %err, "failed to load furnaces");
                0
            }
        }
    }

    /// A region is unloading. Returns how many furnaces were evicted.
    pub fn on_region_unload(&mut self, region: RegionId) -> usize {
        if !self.registry.is_region_loaded(region) {
            return 0;
        }
        let evicted = self.registry.evict_region(region);
        let records: Vec<FurnaceRecord> = evicted.iter().map(FurnaceState::to_record).collect();
        if let Err(err) = self.store.save_region(region, &records) {
            error!(?region, %err, "failed to save furnaces");
        }
        evicted.len()
    }

    /// Persist and evict every loaded region, as on host shutdown.
    pub fn unload_all(&mut self) -> usize {
        self.registry
            .loaded_regions()
            .into_iter()
            .map(|region| self.on_region_unload(region))
            .sum()
    }

    // -----------------------------------------------------------------------
    // Tick
    // -----------------------------------------------------------------------

    /// Start the next host tick: run every action deferred from earlier
    /// ticks, in the order scheduled.
    pub fn run_tick(&mut self, world: &mut dyn World) {
        self.tick += 1;
        for action in self.deferred.drain_due(self.tick) {
            self.apply(world, action);
        }
    }

    fn apply(&mut self, world: &mut dyn World, action: DeferredAction) {
        let at = action.location();
        // Destroyed, evicted, or replaced since scheduling.
        let Some(state) = self.registry.get_mut_by_id(action.furnace()) else {
            debug!(?action, "furnace gone, skipping deferred action");
            return;
        };
        let Some(block) = world.furnace_mut(at) else {
            debug!(?action, "block gone, skipping deferred action");
            return;
        };

        match action {
            DeferredAction::Pause { .. } => {
                // The host may have refilled or emptied the slots since.
                if state.should_pause(&block.slots(), 0) && state.pause(block) {
                    debug!(?at, parked = state.frozen_burn(), "paused");
                }
            }
            DeferredAction::CorrectCookTime { cook_level, .. } => {
                correct_cook_time(block, self.config.cook_cycle(cook_level));
            }
            DeferredAction::ContentsChanged { cook_level, .. } => {
                if cook_level != 0 {
                    correct_cook_time(block, self.config.cook_cycle(cook_level));
                }
                if state.is_paused() {
                    if state.resume(block) {
                        debug!(?at, "resumed after inventory change");
                    }
                } else if state.should_pause(&block.slots(), 0) && state.pause(block) {
                    debug!(?at, parked = state.frozen_burn(), "paused");
                }
            }
        }
    }
}

/// Overwrite the cycle length. Some hosts' lag compensation leaves the
/// progress counter negative, which would stall the smelt.
fn correct_cook_time(block: &mut dyn FurnaceBlock, total: Ticks) {
    if block.cook_time() < 0 {
        block.set_cook_time(0);
    }
    block.set_cook_time_total(total);
}
