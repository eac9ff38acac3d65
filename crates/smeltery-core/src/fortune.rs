//! Bonus output for furnaces with a fortune level.
//!
//! A successful smelt always yields one unit. With fortune, the engine draws
//! a bonus in `[-1, fortune)`: both `-1` and `0` mean "no bonus", so no bonus
//! carries twice the weight of any single positive amount. The bonus is
//! capped so the output stack keeps room for the guaranteed unit.

use crate::id::{ItemKind, SourceKind};
use crate::item::{ItemStack, SlotStack};
use crate::recipe::RecipeLookup;
use crate::rng::DrawSource;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::warn;

/// Compute the full replacement output for a smelt, or `None` to leave the
/// host's output alone.
///
/// The returned quantity is the total (one base unit plus the bonus), not a
/// delta. A missing recipe for the fallback result kind is logged and treated
/// as no bonus.
pub fn compute_bonus(
    fortune: u32,
    output: Option<&SlotStack>,
    source: SourceKind,
    recipes: &dyn RecipeLookup,
    draw: &mut dyn DrawSource,
) -> Option<ItemStack> {
    if fortune == 0 {
        return None;
    }

    let mut bonus = draw.draw(-1, fortune.min(i32::MAX as u32) as i32) as i64;
    if bonus <= 0 {
        return None;
    }

    let result = match output {
        Some(existing) => {
            // One unit is already guaranteed, so cap against max - 1.
            let headroom = existing.max_stack as i64 - 1 - existing.quantity as i64;
            if bonus > headroom {
                bonus = headroom;
                if bonus <= 0 {
                    return None;
                }
            }
            existing.item
        }
        None => match recipes.smelt_result(source) {
            Ok(kind) => kind,
            Err(err) => {
                warn!(?source, %err, "unable to resolve fortune result, skipping bonus");
                return None;
            }
        },
    };

    Some(ItemStack::new(result, 1 + bonus as u32))
}

/// Whether the fortune list names the items fortune applies to, or the
/// items it never applies to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListMode {
    Allow,
    #[default]
    Deny,
}

/// Which smelted items may receive a fortune bonus.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FortuneFilter {
    pub mode: ListMode,
    #[serde(default)]
    pub items: BTreeSet<ItemKind>,
}

impl FortuneFilter {
    pub fn allow(items: impl IntoIterator<Item = ItemKind>) -> Self {
        Self {
            mode: ListMode::Allow,
            items: items.into_iter().collect(),
        }
    }

    pub fn deny(items: impl IntoIterator<Item = ItemKind>) -> Self {
        Self {
            mode: ListMode::Deny,
            items: items.into_iter().collect(),
        }
    }

    /// Whether fortune applies to a smelted item. Variants are ignored.
    pub fn applies(&self, item: ItemKind) -> bool {
        let listed = self.items.contains(&item);
        match self.mode {
            ListMode::Allow => listed,
            ListMode::Deny => !listed,
        }
    }
}
