//! Engine configuration.

use crate::fortune::FortuneFilter;
use crate::modifier::ModifierLevels;
use crate::ticks::{self, Fraction, Ticks};
use serde::{Deserialize, Serialize};

/// Base length of one smelt cycle on the host.
pub const DEFAULT_COOK_TICKS: Ticks = 200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmelteryConfig {
    /// Which smelted items may receive a fortune bonus.
    pub fortune: FortuneFilter,
    /// Scale of each burn-modifier level.
    pub burn_fraction: Fraction,
    /// Scale of each cook-modifier level.
    pub cook_fraction: Fraction,
    /// Unmodified smelt cycle length.
    pub base_cook_ticks: Ticks,
}

impl Default for SmelteryConfig {
    fn default() -> Self {
        Self {
            fortune: FortuneFilter::default(),
            burn_fraction: Fraction::ONE_FIFTH,
            cook_fraction: Fraction::ONE_HALF,
            base_cook_ticks: DEFAULT_COOK_TICKS,
        }
    }
}

impl SmelteryConfig {
    /// Burn duration for a fuel item with both modifiers applied.
    pub fn burn_ticks(&self, base: Ticks, levels: &ModifierLevels) -> Ticks {
        ticks::compose_burn(
            base,
            levels.burn,
            levels.cook,
            self.burn_fraction,
            self.cook_fraction,
        )
    }

    /// Length of one smelt cycle at a cook level.
    pub fn cook_cycle(&self, cook_level: i32) -> Ticks {
        ticks::adjust(self.base_cook_ticks, cook_level, self.cook_fraction)
    }
}
