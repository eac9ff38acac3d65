//! Modifier levels and the lookup that derives them from placed items.

use crate::id::EffectId;
use crate::item::ItemStack;
use serde::{Deserialize, Serialize};

/// Modifier levels of one furnace. Fixed for the lifetime of its state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModifierLevels {
    /// Positive burns fuel longer, negative burns it faster.
    pub burn: i32,
    /// Positive smelts faster, negative smelts slower.
    pub cook: i32,
    /// Bonus-yield strength.
    pub fortune: u32,
    /// Whether the furnace parks unused fuel when it runs out of work.
    pub fuel_saving: bool,
}

impl ModifierLevels {
    /// True when no modifier has any effect.
    pub fn is_neutral(&self) -> bool {
        self.burn == 0 && self.cook == 0 && self.fortune == 0 && !self.fuel_saving
    }
}

/// Resolves modifier levels from a host item.
pub trait ModifierLevelLookup {
    fn levels(&self, item: &ItemStack) -> ModifierLevels;
}

/// Maps item effects onto the four furnace modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectTable {
    pub burn: EffectId,
    pub cook: EffectId,
    pub fortune: EffectId,
    pub fuel_saving: EffectId,
}

impl ModifierLevelLookup for EffectTable {
    fn levels(&self, item: &ItemStack) -> ModifierLevels {
        ModifierLevels {
            burn: item.effect(self.burn),
            cook: item.effect(self.cook),
            fortune: item.effect(self.fortune).max(0) as u32,
            fuel_saving: item.effect(self.fuel_saving) > 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::ItemKind;

    fn table() -> EffectTable {
        EffectTable {
            burn: EffectId(0),
            cook: EffectId(1),
            fortune: EffectId(2),
            fuel_saving: EffectId(3),
        }
    }

    #[test]
    fn plain_item_is_neutral() {
        let levels = table().levels(&ItemStack::new(ItemKind(9), 1));
        assert!(levels.is_neutral());
    }

    #[test]
    fn effects_map_to_levels() {
        let item = ItemStack::new(ItemKind(9), 1)
            .with_effect(EffectId(0), 3)
            .with_effect(EffectId(1), -2)
            .with_effect(EffectId(2), 4)
            .with_effect(EffectId(3), 1);
        let levels = table().levels(&item);
        assert_eq!(
            levels,
            ModifierLevels {
                burn: 3,
                cook: -2,
                fortune: 4,
                fuel_saving: true,
            }
        );
        assert!(!levels.is_neutral());
    }

    #[test]
    fn negative_fortune_clamps_to_zero() {
        let item = ItemStack::new(ItemKind(9), 1).with_effect(EffectId(2), -5);
        assert_eq!(table().levels(&item).fortune, 0);
    }

    #[test]
    fn fuel_saving_alone_is_not_neutral() {
        let item = ItemStack::new(ItemKind(9), 1).with_effect(EffectId(3), 1);
        assert!(!table().levels(&item).is_neutral());
    }
}
