//! Resolution pipeline: reads data files, resolves names, builds the recipe
//! book and engine configuration.
//!
//! Provides format detection (RON/JSON/TOML), file discovery, and deserialization
//! helpers used by [`load_smeltery_data`].

use crate::schema::{ItemData, RecipeData, SettingsData};
use serde::de::DeserializeOwned;
use smeltery_core::config::SmelteryConfig;
use smeltery_core::fortune::FortuneFilter;
use smeltery_core::id::{EffectId, ItemKind, RecipeId};
use smeltery_core::modifier::EffectTable;
use smeltery_core::recipe::{RecipeBook, RecipeBookBuilder, RecipeError, Variant};
use smeltery_core::ticks::{Fraction, FractionError, MAX_TICKS, MIN_TICKS};
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use tracing::debug;

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur during data loading.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// A required data file was not found in the given directory.
    #[error("required file '{file}' not found in {dir}")]
    MissingRequired { file: &'static str, dir: PathBuf },

    /// The file has an extension we don't support.
    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// Two files with the same base name but different formats exist.
    #[error("conflicting formats: {a} and {b}")]
    ConflictingFormats { a: PathBuf, b: PathBuf },

    /// A deserialization error occurred.
    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// A name reference could not be resolved.
    #[error("unresolved {expected_kind} reference '{name}' in {file}")]
    UnresolvedRef {
        file: PathBuf,
        name: String,
        expected_kind: &'static str,
    },

    /// A duplicate name was found.
    #[error("duplicate name '{name}' in {file}")]
    DuplicateName { file: PathBuf, name: String },

    /// A setting parsed but is out of range.
    #[error("invalid {field} in {file}: {detail}")]
    InvalidValue {
        file: PathBuf,
        field: &'static str,
        detail: String,
    },

    /// The resolved recipes failed validation.
    #[error(transparent)]
    Recipe(#[from] RecipeError),

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Format detection
// ===========================================================================

/// Supported data file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

/// Detect the format of a file based on its extension.
pub fn detect_format(path: &Path) -> Result<Format, DataLoadError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => Ok(Format::Ron),
        Some("toml") => Ok(Format::Toml),
        Some("json") => Ok(Format::Json),
        _ => Err(DataLoadError::UnsupportedFormat {
            file: path.to_path_buf(),
        }),
    }
}

// ===========================================================================
// File discovery
// ===========================================================================

/// Scan a directory for a data file with the given base name (without extension).
///
/// Looks for `{base_name}.ron`, `{base_name}.toml`, and `{base_name}.json`.
/// Returns `Ok(None)` if no file is found, or `Err(ConflictingFormats)` if
/// multiple formats exist for the same base name.
pub fn find_data_file(dir: &Path, base_name: &str) -> Result<Option<PathBuf>, DataLoadError> {
    let mut found: Option<PathBuf> = None;

    for ext in ["ron", "toml", "json"] {
        let candidate = dir.join(format!("{base_name}.{ext}"));
        if candidate.exists() {
            if let Some(existing) = found {
                return Err(DataLoadError::ConflictingFormats {
                    a: existing,
                    b: candidate,
                });
            }
            found = Some(candidate);
        }
    }

    Ok(found)
}

/// Like [`find_data_file`], but returns an error if no file is found.
pub fn require_data_file(dir: &Path, base_name: &'static str) -> Result<PathBuf, DataLoadError> {
    find_data_file(dir, base_name)?.ok_or_else(|| DataLoadError::MissingRequired {
        file: base_name,
        dir: dir.to_path_buf(),
    })
}

// ===========================================================================
// Deserialization
// ===========================================================================

fn parse_error(path: &Path, err: impl std::fmt::Display) -> DataLoadError {
    DataLoadError::Parse {
        file: path.to_path_buf(),
        detail: err.to_string(),
    }
}

/// Read a file and deserialize it according to its format (detected from extension).
pub fn deserialize_file<T: DeserializeOwned>(path: &Path) -> Result<T, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;

    match format {
        Format::Ron => ron::from_str(&content).map_err(|e| parse_error(path, e)),
        Format::Json => serde_json::from_str(&content).map_err(|e| parse_error(path, e)),
        Format::Toml => toml::from_str(&content).map_err(|e| parse_error(path, e)),
    }
}

/// Deserialize a list from a file. For TOML files, extracts the array at the
/// given `toml_key` from a top-level table. For RON and JSON, deserializes
/// directly as `Vec<T>`.
pub fn deserialize_list<T: DeserializeOwned>(
    path: &Path,
    toml_key: &str,
) -> Result<Vec<T>, DataLoadError> {
    if detect_format(path)? != Format::Toml {
        return deserialize_file(path);
    }

    let content = std::fs::read_to_string(path)?;
    let mut table: toml::Table = toml::from_str(&content).map_err(|e| parse_error(path, e))?;
    let array = table
        .remove(toml_key)
        .ok_or_else(|| parse_error(path, format!("missing key '{toml_key}' in TOML file")))?;
    array
        .try_into()
        .map_err(|e: toml::de::Error| parse_error(path, e))
}

// ===========================================================================
// Name resolution helpers
// ===========================================================================

/// Look up a name in a map, returning an `UnresolvedRef` error if not found.
pub fn resolve_name<'a, V>(
    map: &'a HashMap<String, V>,
    name: &str,
    file: &Path,
    expected_kind: &'static str,
) -> Result<&'a V, DataLoadError> {
    map.get(name).ok_or_else(|| DataLoadError::UnresolvedRef {
        file: file.to_path_buf(),
        name: name.to_string(),
        expected_kind,
    })
}

/// Check whether a name already exists in a map, returning a `DuplicateName`
/// error if so.
pub fn check_duplicate<V>(
    map: &HashMap<String, V>,
    name: &str,
    file: &Path,
) -> Result<(), DataLoadError> {
    if map.contains_key(name) {
        Err(DataLoadError::DuplicateName {
            file: file.to_path_buf(),
            name: name.to_string(),
        })
    } else {
        Ok(())
    }
}

// ===========================================================================
// Pipeline
// ===========================================================================

/// Everything a host needs to construct a controller.
#[derive(Debug)]
pub struct SmelteryData {
    pub config: SmelteryConfig,
    pub recipes: RecipeBook,
    /// Present when the settings file names the host's effect ids.
    pub effects: Option<EffectTable>,
}

/// Load `items.*`, `recipes.*`, and the optional `smeltery.*` from a
/// directory.
pub fn load_smeltery_data(dir: &Path) -> Result<SmelteryData, DataLoadError> {
    let mut builder = RecipeBookBuilder::new();

    // Items.
    let items_path = require_data_file(dir, "items")?;
    let items: Vec<ItemData> = deserialize_list(&items_path, "items")?;
    let mut item_ids: HashMap<String, ItemKind> = HashMap::new();
    for item in &items {
        check_duplicate(&item_ids, &item.name, &items_path)?;
        let id = builder.register_item(&item.name);
        item_ids.insert(item.name.clone(), id);
    }

    // Recipes.
    let recipes_path = require_data_file(dir, "recipes")?;
    let recipes: Vec<RecipeData> = deserialize_list(&recipes_path, "recipes")?;
    let mut recipe_ids: HashMap<String, RecipeId> = HashMap::new();
    for recipe in &recipes {
        check_duplicate(&recipe_ids, &recipe.name, &recipes_path)?;
        let input = *resolve_name(&item_ids, &recipe.input, &recipes_path, "item")?;
        let result = *resolve_name(&item_ids, &recipe.result, &recipes_path, "item")?;
        let variant = recipe.variant.map_or(Variant::Any, Variant::Exact);
        let id = builder.register_recipe(input, variant, result);
        recipe_ids.insert(recipe.name.clone(), id);
    }
    let recipes = builder.build()?;

    // Settings.
    let (config, effects) = match find_data_file(dir, "smeltery")? {
        Some(path) => {
            let settings: SettingsData = deserialize_file(&path)?;
            resolve_settings(settings, &item_ids, &path)?
        }
        None => (SmelteryConfig::default(), None),
    };

    debug!(
        items = recipes.item_count(),
        recipes = recipes.recipe_count(),
        "smeltery data loaded"
    );

    Ok(SmelteryData {
        config,
        recipes,
        effects,
    })
}

fn resolve_settings(
    settings: SettingsData,
    item_ids: &HashMap<String, ItemKind>,
    file: &Path,
) -> Result<(SmelteryConfig, Option<EffectTable>), DataLoadError> {
    let mut config = SmelteryConfig::default();

    let items = settings
        .fortune
        .items
        .iter()
        .map(|name| resolve_name(item_ids, name, file, "item").copied())
        .collect::<Result<BTreeSet<ItemKind>, _>>()?;
    config.fortune = FortuneFilter {
        mode: settings.fortune.mode,
        items,
    };

    if let Some(raw) = &settings.burn_fraction {
        config.burn_fraction = parse_fraction(raw, "burn_fraction", file)?;
    }
    if let Some(raw) = &settings.cook_fraction {
        config.cook_fraction = parse_fraction(raw, "cook_fraction", file)?;
    }
    if let Some(ticks) = settings.base_cook_ticks {
        if !(MIN_TICKS..=MAX_TICKS).contains(&ticks) {
            return Err(DataLoadError::InvalidValue {
                file: file.to_path_buf(),
                field: "base_cook_ticks",
                detail: format!("{ticks} is outside {MIN_TICKS}..={MAX_TICKS}"),
            });
        }
        config.base_cook_ticks = ticks;
    }

    let effects = settings.effects.map(|e| EffectTable {
        burn: EffectId(e.burn),
        cook: EffectId(e.cook),
        fortune: EffectId(e.fortune),
        fuel_saving: EffectId(e.fuel_saving),
    });

    Ok((config, effects))
}

fn parse_fraction(raw: &str, field: &'static str, file: &Path) -> Result<Fraction, DataLoadError> {
    raw.parse().map_err(|e: FractionError| DataLoadError::InvalidValue {
        file: file.to_path_buf(),
        field,
        detail: e.to_string(),
    })
}

// ===========================================================================
// Tests
// ===========================================================================
