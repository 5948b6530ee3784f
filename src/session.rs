//! Editing rules for an in-memory project.
//!
//! Every operation takes the [`Project`] by value and returns the next one.
//! A caller that wants to compare before and after keeps a clone; nothing
//! here can reach back and change a value the caller still holds.
//!
//! ```text
//! let project = session::add_item(project);
//! let project = session::patch_item(project, 0, ItemPatch { name: Some("Lamp".into()), ..Default::default() });
//! let project = session::remove_item(project, 0); // cascades into recipes
//! ```
//!
//! Indices are positions in `items`, `recipes`, or a recipe's `ingredients`.
//! Passing one that is out of bounds is a bug in the caller and panics, the
//! same as slice indexing.
//!
//! ## Cascade Delete
//!
//! Removing an item strips every ingredient with that item's `asset_id` from
//! every recipe. Recipes themselves are kept, even when left with no
//! ingredients. An item with an empty `asset_id` cascades nothing.

use crate::schema::{Ingredient, Item, ItemType, Project, Recipe};
use uuid::Uuid;

/// Field-level changes to an [`Item`]. `None` leaves a field as it is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemPatch {
    pub asset_id: Option<String>,
    pub name: Option<String>,
    pub item_type: Option<ItemType>,
    pub vendor_price: Option<f64>,
    pub tags: Option<Vec<String>>,
    pub thumbnail_path: Option<String>,
}

impl ItemPatch {
    fn apply(self, item: &mut Item) {
        if let Some(asset_id) = self.asset_id {
            item.asset_id = asset_id;
        }
        if let Some(name) = self.name {
            item.name = name;
        }
        if let Some(item_type) = self.item_type {
            item.item_type = item_type;
        }
        if let Some(price) = self.vendor_price {
            item.vendor_price = price;
        }
        if let Some(tags) = self.tags {
            item.tags = tags;
        }
        if let Some(path) = self.thumbnail_path {
            item.thumbnail_path = path;
        }
    }
}

/// Field-level changes to a [`Recipe`]. The id is fixed at creation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipePatch {
    pub result_asset_id: Option<String>,
    pub ingredients: Option<Vec<Ingredient>>,
}

/// Field-level changes to an [`Ingredient`].
///
/// `qty` is signed so raw user input can be passed straight through; anything
/// below 1 is raised to 1.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngredientPatch {
    pub asset_id: Option<String>,
    pub qty: Option<i64>,
}

fn clamp_qty(qty: i64) -> u32 {
    u32::try_from(qty.max(1)).unwrap_or(u32::MAX)
}

fn check_index(what: &str, index: usize, len: usize) {
    assert!(
        index < len,
        "{what} index {index} out of bounds (have {len})"
    );
}

// ============================================================================
// Items
// ============================================================================

/// Append a blank `Free` item.
pub fn add_item(mut project: Project) -> Project {
    project.items.push(Item::default());
    project
}

pub fn patch_item(mut project: Project, index: usize, patch: ItemPatch) -> Project {
    check_index("item", index, project.items.len());
    patch.apply(&mut project.items[index]);
    project
}

/// Remove an item and cascade the removal into every recipe's ingredients.
pub fn remove_item(mut project: Project, index: usize) -> Project {
    check_index("item", index, project.items.len());
    let removed = project.items.remove(index);
    if !removed.asset_id.is_empty() {
        for recipe in &mut project.recipes {
            recipe
                .ingredients
                .retain(|g| g.asset_id != removed.asset_id);
        }
    }
    project
}

// ============================================================================
// Recipes
// ============================================================================

/// Append an empty recipe with a fresh random id.
pub fn add_recipe(mut project: Project) -> Project {
    project.recipes.push(Recipe {
        id: Uuid::new_v4().to_string(),
        result_asset_id: String::new(),
        ingredients: Vec::new(),
    });
    project
}

pub fn patch_recipe(mut project: Project, index: usize, patch: RecipePatch) -> Project {
    check_index("recipe", index, project.recipes.len());
    let recipe = &mut project.recipes[index];
    if let Some(result) = patch.result_asset_id {
        recipe.result_asset_id = result;
    }
    if let Some(ingredients) = patch.ingredients {
        recipe.ingredients = ingredients;
    }
    project
}

pub fn remove_recipe(mut project: Project, index: usize) -> Project {
    check_index("recipe", index, project.recipes.len());
    project.recipes.remove(index);
    project
}

// ============================================================================
// Ingredients
// ============================================================================

/// Append a blank ingredient (`qty` 1) to a recipe.
pub fn add_ingredient(mut project: Project, recipe: usize) -> Project {
    check_index("recipe", recipe, project.recipes.len());
    project.recipes[recipe].ingredients.push(Ingredient {
        asset_id: String::new(),
        qty: 1,
    });
    project
}

pub fn patch_ingredient(
    mut project: Project,
    recipe: usize,
    index: usize,
    patch: IngredientPatch,
) -> Project {
    check_index("recipe", recipe, project.recipes.len());
    let ingredients = &mut project.recipes[recipe].ingredients;
    check_index("ingredient", index, ingredients.len());
    let ingredient = &mut ingredients[index];
    if let Some(asset_id) = patch.asset_id {
        ingredient.asset_id = asset_id;
    }
    if let Some(qty) = patch.qty {
        ingredient.qty = clamp_qty(qty);
    }
    project
}

pub fn remove_ingredient(mut project: Project, recipe: usize, index: usize) -> Project {
    check_index("recipe", recipe, project.recipes.len());
    let ingredients = &mut project.recipes[recipe].ingredients;
    check_index("ingredient", index, ingredients.len());
    ingredients.remove(index);
    project
}

// ============================================================================
// Input helpers
// ============================================================================

/// Split comma-separated tag input, trimming and dropping blanks.
///
/// `"oak, , dark ,oak"` → `["oak", "dark", "oak"]`. Duplicates are kept.
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

/// Whether an export would contain anything: at least one item has a
/// non-blank asset id.
pub fn can_export(project: &Project) -> bool {
    project
        .items
        .iter()
        .any(|i| !i.asset_id.trim().is_empty())
}
