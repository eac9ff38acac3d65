//! Host-side furnace access.
//!
//! The engine never holds a block between calls. Every access goes through
//! [`World::furnace_mut`] with a location, so a furnace that has been broken
//! or unloaded simply resolves to `None`.

use crate::id::Location;
use crate::item::FurnaceSlots;
use crate::ticks::Ticks;

/// A live furnace block on the host.
pub trait FurnaceBlock {
    fn location(&self) -> Location;

    /// Remaining ticks of the fuel item currently burning.
    fn burn_time(&self) -> Ticks;
    fn set_burn_time(&mut self, ticks: Ticks);

    /// Progress counter of the current smelt.
    fn cook_time(&self) -> Ticks;
    fn set_cook_time(&mut self, ticks: Ticks);

    /// Full duration of one smelt cycle.
    fn set_cook_time_total(&mut self, ticks: Ticks);

    fn slots(&self) -> FurnaceSlots;
}

/// Resolves furnace blocks by location.
pub trait World {
    fn furnace_mut(&mut self, at: Location) -> Option<&mut dyn FurnaceBlock>;
}
