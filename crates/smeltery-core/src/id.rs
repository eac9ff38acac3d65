use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    /// Handle to a furnace in the registry arena.
    pub struct FurnaceId;
}

/// Opaque item-kind token. Cheap to copy and compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemKind(pub u32);

/// Identifies a smelting recipe in the recipe book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecipeId(pub u32);

/// Identifies an enchantment-like effect carried by an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EffectId(pub u32);

/// Identifies a world (dimension) on the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WorldId(pub u32);

/// The kind of item being smelted. `variant` is the data sub-kind; exact
/// recipes compare it, wildcard recipes ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SourceKind {
    pub item: ItemKind,
    pub variant: u16,
}

impl SourceKind {
    pub fn new(item: ItemKind, variant: u16) -> Self {
        Self { item, variant }
    }

    /// A source with the default (zero) variant.
    pub fn plain(item: ItemKind) -> Self {
        Self { item, variant: 0 }
    }
}

/// Block position of a furnace. This is the stable identity every lookup
/// and deferred action is keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Location {
    pub world: WorldId,
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Location {
    pub fn new(world: WorldId, x: i32, y: i32, z: i32) -> Self {
        Self { world, x, y, z }
    }

    /// The region (16x16 column) containing this location.
    pub fn region(&self) -> RegionId {
        RegionId {
            world: self.world,
            x: self.x >> 4,
            z: self.z >> 4,
        }
    }
}

/// A coarse spatial partition loaded and unloaded as a unit by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RegionId {
    pub world: WorldId,
    pub x: i32,
    pub z: i32,
}

impl RegionId {
    pub fn new(world: WorldId, x: i32, z: i32) -> Self {
        Self { world, x, z }
    }

    /// Whether `at` lies inside this region.
    pub fn contains(&self, at: Location) -> bool {
        at.region() == *self
    }
}
