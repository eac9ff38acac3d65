//! Smeltery Core -- enchanted furnace behavior for block-world hosts.
//!
//! A furnace placed from an item that carries modifier effects gets per-block
//! state: burn and cook speed levels, a fortune level for bonus output, and
//! optional fuel saving. The host forwards its furnace notifications to a
//! [`controller::Controller`], which answers each one synchronously and
//! queues whatever must wait for the next tick.
//!
//! # Notification Flow
//!
//! 1. **Fuel burn** -- the fuel duration is rescaled, or a paused furnace
//!    resumes on its parked burn time and the new fuel is not consumed.
//! 2. **Smelt complete** -- fortune may replace the output stack; a pause or
//!    cook-time correction is deferred.
//! 3. **Inventory change** -- a re-check is deferred.
//! 4. **Tick start** -- [`controller::Controller::run_tick`] applies every
//!    deferred action from earlier ticks, re-resolving each furnace by
//!    location.
//!
//! Region loads and unloads move furnace state between the live
//! [`registry::FurnaceRegistry`] and a [`persist::FurnaceStore`].
//!
//! # Key Types
//!
//! - [`ticks::Fraction`] -- exact per-level scale used by tick modifiers.
//! - [`fortune::compute_bonus`] -- bonus-yield draw and stack capping.
//! - [`state::FurnaceState`] -- levels plus the pause/resume machine.
//! - [`deferred::DeferredQueue`] -- next-tick actions keyed by location.
//! - [`recipe::RecipeBook`] -- immutable smelting recipes (frozen at startup).

pub mod config;
pub mod controller;
pub mod deferred;
pub mod fortune;
pub mod id;
pub mod item;
pub mod modifier;
pub mod persist;
pub mod recipe;
pub mod registry;
pub mod rng;
pub mod state;
pub mod ticks;
pub mod world;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
