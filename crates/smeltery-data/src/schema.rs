//! Serde data file structs for smeltery content.
//!
//! These structs define the on-disk format for items, smelting recipes, and
//! engine settings. They are deserialized from RON, JSON, or TOML data files
//! and then resolved into engine types by the loader.

use serde::Deserialize;
use smeltery_core::fortune::ListMode;

// ===========================================================================
// Items
// ===========================================================================

/// An item kind definition in a data file.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemData {
    pub name: String,
}

// ===========================================================================
// Recipes
// ===========================================================================

/// A smelting recipe definition in a data file.
#[derive(Debug, Clone, Deserialize)]
pub struct RecipeData {
    pub name: String,
    pub input: String,
    /// Exact input variant. Absent means any variant matches.
    #[serde(default)]
    pub variant: Option<u16>,
    pub result: String,
}

// ===========================================================================
// Settings
// ===========================================================================

/// Engine settings. Every field is optional; absent fields keep the engine
/// defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SettingsData {
    pub fortune: FortuneData,
    /// Per-level scale, as `"1/5"` or `"0.2"`.
    pub burn_fraction: Option<String>,
    pub cook_fraction: Option<String>,
    pub base_cook_ticks: Option<i32>,
    /// Host effect ids carried by furnace items.
    pub effects: Option<EffectsData>,
}

/// The fortune allow/deny list, by item name.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FortuneData {
    pub mode: ListMode,
    pub items: Vec<String>,
}

/// Effect ids for the four furnace modifiers.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct EffectsData {
    pub burn: u32,
    pub cook: u32,
    pub fortune: u32,
    pub fuel_saving: u32,
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recipe_from_ron() {
        let ron = r#"(name: "smelt_iron", input: "iron_ore", result: "iron_ingot")"#;
        let recipe: RecipeData = ron::from_str(ron).unwrap();
        assert_eq!(recipe.input, "iron_ore");
        assert_eq!(recipe.variant, None);
    }

    #[test]
    fn recipe_with_variant_from_json() {
        let json = r#"{"name": "red_sand", "input": "sand", "variant": 1, "result": "glass"}"#;
        let recipe: RecipeData = serde_json::from_str(json).unwrap();
        assert_eq!(recipe.variant, Some(1));
    }

    #[test]
    fn empty_settings_are_defaults() {
        let settings: SettingsData = toml::from_str("").unwrap();
        assert_eq!(settings.fortune.mode, ListMode::Deny);
        assert!(settings.fortune.items.is_empty());
        assert!(settings.burn_fraction.is_none());
        assert!(settings.effects.is_none());
    }

    #[test]
    fn settings_from_toml() {
        let toml_str = r#"
            cook_fraction = "1/4"
            base_cook_ticks = 160

            [fortune]
            mode = "allow"
            items = ["iron_ore", "gold_ore"]

            [effects]
            burn = 1
            cook = 2
            fortune = 3
            fuel_saving = 4
        "#;
        let settings: SettingsData = toml::from_str(toml_str).unwrap();
        assert_eq!(settings.fortune.mode, ListMode::Allow);
        assert_eq!(settings.fortune.items.len(), 2);
        assert_eq!(settings.cook_fraction.as_deref(), Some("1/4"));
        assert_eq!(settings.base_cook_ticks, Some(160));
        assert_eq!(settings.effects.unwrap().fuel_saving, 4);
    }
}
