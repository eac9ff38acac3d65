use crate::id::{ItemKind, RecipeId, SourceKind};
use std::collections::HashMap;

/// Which input variants a recipe accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    /// Only this exact variant.
    Exact(u16),
    /// Any variant of the input item.
    Any,
}

/// A smelting recipe: one input kind to one result kind.
#[derive(Debug, Clone)]
pub struct SmeltRecipe {
    pub input: ItemKind,
    pub variant: Variant,
    pub result: ItemKind,
}

/// Finds the result kind a source smelts into.
pub trait RecipeLookup {
    fn smelt_result(&self, source: SourceKind) -> Result<ItemKind, RecipeError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecipeError {
    #[error("no smelting recipe for {0:?}")]
    NoMatch(SourceKind),
    #[error("invalid item reference: {0:?}")]
    InvalidItemRef(ItemKind),
}

/// Builder for an immutable [`RecipeBook`]. Items and recipes are
/// registered, then `build()` validates references and freezes.
#[derive(Debug, Default)]
pub struct RecipeBookBuilder {
    items: Vec<String>,
    item_name_to_id: HashMap<String, ItemKind>,
    recipes: Vec<SmeltRecipe>,
}

impl RecipeBookBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an item kind by name. Returns its id.
    pub fn register_item(&mut self, name: &str) -> ItemKind {
        if let Some(id) = self.item_name_to_id.get(name) {
            return *id;
        }
        let id = ItemKind(self.items.len() as u32);
        self.items.push(name.to_string());
        self.item_name_to_id.insert(name.to_string(), id);
        id
    }

    /// Register a recipe. Returns its id.
    pub fn register_recipe(
        &mut self,
        input: ItemKind,
        variant: Variant,
        result: ItemKind,
    ) -> RecipeId {
        let id = RecipeId(self.recipes.len() as u32);
        self.recipes.push(SmeltRecipe {
            input,
            variant,
            result,
        });
        id
    }

    pub fn item_id(&self, name: &str) -> Option<ItemKind> {
        self.item_name_to_id.get(name).copied()
    }

    /// Finalize. Validates item references and builds the match indexes.
    pub fn build(self) -> Result<RecipeBook, RecipeError> {
        let item_count = self.items.len();
        let mut exact = HashMap::new();
        let mut wildcard = HashMap::new();

        for recipe in &self.recipes {
            for item in [recipe.input, recipe.result] {
                if item.0 as usize >= item_count {
                    return Err(RecipeError::InvalidItemRef(item));
                }
            }
            match recipe.variant {
                // First exact match wins.
                Variant::Exact(v) => {
                    exact
                        .entry(SourceKind::new(recipe.input, v))
                        .or_insert(recipe.result);
                }
                // Last wildcard wins.
                Variant::Any => {
                    wildcard.insert(recipe.input, recipe.result);
                }
            }
        }

        Ok(RecipeBook {
            items: self.items,
            item_name_to_id: self.item_name_to_id,
            recipe_count: self.recipes.len(),
            exact,
            wildcard,
        })
    }
}

/// Immutable recipe book. Frozen after build().
#[derive(Debug)]
pub struct RecipeBook {
    items: Vec<String>,
    item_name_to_id: HashMap<String, ItemKind>,
    recipe_count: usize,
    exact: HashMap<SourceKind, ItemKind>,
    wildcard: HashMap<ItemKind, ItemKind>,
}

impl RecipeBook {
    pub fn item_id(&self, name: &str) -> Option<ItemKind> {
        self.item_name_to_id.get(name).copied()
    }

    pub fn item_name(&self, id: ItemKind) -> Option<&str> {
        self.items.get(id.0 as usize).map(String::as_str)
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn recipe_count(&self) -> usize {
        self.recipe_count
    }
}

impl RecipeLookup for RecipeBook {
    fn smelt_result(&self, source: SourceKind) -> Result<ItemKind, RecipeError> {
        self.exact
            .get(&source)
            .or_else(|| self.wildcard.get(&source.item))
            .copied()
            .ok_or(RecipeError::NoMatch(source))
    }
}
