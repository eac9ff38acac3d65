//! Registry of active furnaces.
//!
//! States live in a slotmap arena. Two indexes sit on top: location to
//! handle for per-event lookups, and region to handles so a region can be
//! loaded or evicted in time proportional to the furnaces inside it. The
//! registry only ever holds furnaces whose region is loaded.

use crate::id::{FurnaceId, Location, RegionId};
use crate::item::ItemStack;
use crate::modifier::ModifierLevels;
use crate::state::{FurnaceRecord, FurnaceState};
use slotmap::SlotMap;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Default)]
pub struct FurnaceRegistry {
    furnaces: SlotMap<FurnaceId, FurnaceState>,
    by_location: HashMap<Location, FurnaceId>,
    by_region: HashMap<RegionId, HashSet<FurnaceId>>,
    loaded_regions: HashSet<RegionId>,
}

impl FurnaceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a newly placed furnace, replacing any state at the same
    /// location. Placing a block implies its region is loaded.
    pub fn create(
        &mut self,
        location: Location,
        item: ItemStack,
        levels: ModifierLevels,
    ) -> FurnaceId {
        self.loaded_regions.insert(location.region());
        self.insert(FurnaceState::new(location, item, levels))
    }

    fn insert(&mut self, state: FurnaceState) -> FurnaceId {
        let location = state.location();
        self.remove(location);
        let id = self.furnaces.insert(state);
        self.by_location.insert(location, id);
        self.by_region.entry(location.region()).or_default().insert(id);
        id
    }

    pub fn id_at(&self, location: Location) -> Option<FurnaceId> {
        self.by_location.get(&location).copied()
    }

    pub fn get(&self, location: Location) -> Option<&FurnaceState> {
        self.id_at(location).and_then(|id| self.furnaces.get(id))
    }

    pub fn get_mut(&mut self, location: Location) -> Option<&mut FurnaceState> {
        let id = self.id_at(location)?;
        self.furnaces.get_mut(id)
    }

    /// Look up by handle. Handles of removed or evicted furnaces never
    /// resolve, even once another furnace takes their location.
    pub fn get_mut_by_id(&mut self, id: FurnaceId) -> Option<&mut FurnaceState> {
        self.furnaces.get_mut(id)
    }

    /// Remove the furnace at a location, returning its final state.
    pub fn remove(&mut self, location: Location) -> Option<FurnaceState> {
        let id = self.by_location.remove(&location)?;
        let region = location.region();
        if let Some(ids) = self.by_region.get_mut(&region) {
            ids.remove(&id);
            if ids.is_empty() {
                self.by_region.remove(&region);
            }
        }
        self.furnaces.remove(id)
    }

    /// Mark a region loaded and register its persisted furnaces. Records
    /// outside the region are ignored. Returns how many were registered.
    pub fn load_region(
        &mut self,
        region: RegionId,
        records: impl IntoIterator<Item = FurnaceRecord>,
    ) -> usize {
        self.loaded_regions.insert(region);
        let mut loaded = 0;
        for record in records {
            if !region.contains(record.location) {
                continue;
            }
            self.insert(FurnaceState::from_record(record));
            loaded += 1;
        }
        loaded
    }

    /// Remove every furnace in a region and mark it unloaded. Returned
    /// states are ordered by location.
    pub fn evict_region(&mut self, region: RegionId) -> Vec<FurnaceState> {
        self.loaded_regions.remove(&region);
        let Some(ids) = self.by_region.remove(&region) else {
            return Vec::new();
        };
        let mut evicted: Vec<FurnaceState> = ids
            .into_iter()
            .filter_map(|id| self.furnaces.remove(id))
            .collect();
        for state in &evicted {
            self.by_location.remove(&state.location());
        }
        evicted.sort_by_key(|s| s.location());
        evicted
    }

    pub fn is_region_loaded(&self, region: RegionId) -> bool {
        self.loaded_regions.contains(&region)
    }

    /// Every loaded region, sorted.
    pub fn loaded_regions(&self) -> Vec<RegionId> {
        let mut regions: Vec<RegionId> = self.loaded_regions.iter().copied().collect();
        regions.sort();
        regions
    }

    /// Furnaces in a region, ordered by location.
    pub fn in_region(&self, region: RegionId) -> Vec<&FurnaceState> {
        let mut states: Vec<&FurnaceState> = self
            .by_region
            .get(&region)
            .into_iter()
            .flatten()
            .filter_map(|id| self.furnaces.get(*id))
            .collect();
        states.sort_by_key(|s| s.location());
        states
    }

    pub fn iter(&self) -> impl Iterator<Item = (FurnaceId, &FurnaceState)> {
        self.furnaces.iter()
    }

    pub fn len(&self) -> usize {
        self.furnaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.furnaces.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::{ItemKind, WorldId};

    fn loc(x: i32, z: i32) -> Location {
        Location::new(WorldId(0), x, 64, z)
    }

    fn item() -> ItemStack {
        ItemStack::new(ItemKind(100), 1)
    }

    fn levels(cook: i32) -> ModifierLevels {
        ModifierLevels {
            cook,
            ..Default::default()
        }
    }

    #[test]
    fn create_and_lookup() {
        let mut reg = FurnaceRegistry::new();
        let id = reg.create(loc(1, 1), item(), levels(2));
        assert_eq!(reg.id_at(loc(1, 1)), Some(id));
        assert_eq!(reg.get(loc(1, 1)).unwrap().cook_modifier(), 2);
        assert!(reg.get(loc(2, 2)).is_none());
        assert!(reg.is_region_loaded(loc(1, 1).region()));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn create_replaces_existing() {
        let mut reg = FurnaceRegistry::new();
        let first = reg.create(loc(1, 1), item(), levels(1));
        let second = reg.create(loc(1, 1), item(), levels(3));
        assert_ne!(first, second);
        assert!(reg.get_mut_by_id(first).is_none());
        assert_eq!(reg.get_mut_by_id(second).unwrap().cook_modifier(), 3);
        assert_eq!(reg.get(loc(1, 1)).unwrap().cook_modifier(), 3);
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.in_region(loc(1, 1).region()).len(), 1);
    }

    #[test]
    fn remove_clears_indexes() {
        let mut reg = FurnaceRegistry::new();
        reg.create(loc(1, 1), item(), levels(1));
        let removed = reg.remove(loc(1, 1)).unwrap();
        assert_eq!(removed.location(), loc(1, 1));
        assert!(reg.get(loc(1, 1)).is_none());
        assert!(reg.in_region(loc(1, 1).region()).is_empty());
        assert!(reg.remove(loc(1, 1)).is_none());
        assert!(reg.is_empty());
    }

    #[test]
    fn evict_region_only_touches_that_region() {
        let mut reg = FurnaceRegistry::new();
        reg.create(loc(1, 1), item(), levels(1));
        reg.create(loc(2, 3), item(), levels(1));
        reg.create(loc(40, 1), item(), levels(1));

        let region = loc(1, 1).region();
        let evicted = reg.evict_region(region);
        assert_eq!(evicted.len(), 2);
        assert_eq!(evicted[0].location(), loc(1, 1));
        assert!(reg.get(loc(1, 1)).is_none());
        assert!(reg.get(loc(2, 3)).is_none());
        assert!(reg.get(loc(40, 1)).is_some());
        assert!(!reg.is_region_loaded(region));
        assert!(reg.is_region_loaded(loc(40, 1).region()));
    }

    #[test]
    fn evict_empty_region() {
        let mut reg = FurnaceRegistry::new();
        assert!(reg.evict_region(loc(0, 0).region()).is_empty());
    }

    #[test]
    fn load_region_restores_records() {
        let mut reg = FurnaceRegistry::new();
        reg.create(loc(1, 1), item(), levels(2));
        let region = loc(1, 1).region();
        let records: Vec<_> = reg
            .evict_region(region)
            .iter()
            .map(FurnaceState::to_record)
            .collect();

        let loaded = reg.load_region(region, records);
        assert_eq!(loaded, 1);
        assert!(reg.is_region_loaded(region));
        assert_eq!(reg.get(loc(1, 1)).unwrap().cook_modifier(), 2);
    }

    #[test]
    fn load_region_ignores_foreign_records() {
        let mut reg = FurnaceRegistry::new();
        let stray = FurnaceState::new(loc(100, 100), item(), levels(1)).to_record();
        let loaded = reg.load_region(loc(0, 0).region(), [stray]);
        assert_eq!(loaded, 0);
        assert!(reg.is_empty());
    }

    #[test]
    fn loading_twice_does_not_duplicate() {
        let mut reg = FurnaceRegistry::new();
        let record = FurnaceState::new(loc(1, 1), item(), levels(1)).to_record();
        let region = loc(1, 1).region();
        reg.load_region(region, [record.clone()]);
        reg.load_region(region, [record]);
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.in_region(region).len(), 1);
    }

    #[test]
    fn iter_visits_every_furnace() {
        let mut reg = FurnaceRegistry::new();
        reg.create(loc(1, 1), item(), levels(1));
        reg.create(loc(200, 1), item(), levels(1));
        assert_eq!(reg.iter().count(), 2);
    }
}
