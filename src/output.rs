//! CLI output formatting.
//!
//! # Information-First Display
//!
//! Output is **catalog-centric, not file-centric**. Every entity leads with its
//! 1-based position (the same number the editing commands take) and its
//! display identity; secondary details follow as indented context lines.
//!
//! # Output Format
//!
//! ## List
//!
//! ```text
//! Items
//! 001 Lamp [lamp1]
//!     FloorLamp, price 5
//!     Tags: light
//!     Thumbnail: assets/thumbnails/lamp.png
//! 002 Wood [wood]
//!     Material (not placeable), price 0
//!
//! Recipes
//! 001 lamp1 ← 2 wood, 4 nail
//!     Id: 6f0c…
//! ```
//!
//! ## Check
//!
//! ```text
//! Project is valid: 3 items, 2 recipes
//! Export will drop:
//!     item 004 [lamp1]: duplicate asset id
//!     recipe 002: ingredient 1 has no asset id
//! ```
//!
//! ## Export
//!
//! ```text
//! Exported 3 items, 2 recipes, 1 thumbnail
//!     Database: exports/hw/database.txt
//!     Thumbnails: exports/hw/thumbnails/
//! ```
//!
//! # Architecture
//!
//! Each view has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure.
//!
//! Formatters take any [`Project`], not only ones that passed validation.
//! Editing operations produce blank items, blank ingredients and recipes
//! without a result; those render with placeholders (`(unnamed)`,
//! `(no asset id)`, `(no result)`) and show up in the check's drop list.

use crate::export::ExportLayout;
use crate::schema::{Item, Project, Recipe};
use std::collections::HashSet;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `1 item`, `2 items`.
fn count(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("{n} {noun}")
    } else {
        format!("{n} {noun}s")
    }
}

fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.is_empty() { placeholder } else { value }
}

/// Item header: position, name, and asset id in brackets.
///
/// ```text
/// 001 Lamp [lamp1]
/// 002 (unnamed) [(no asset id)]
/// ```
fn item_header(index: usize, item: &Item) -> String {
    format!(
        "{} {} [{}]",
        format_index(index),
        or_placeholder(&item.name, "(unnamed)"),
        or_placeholder(&item.asset_id, "(no asset id)")
    )
}

/// Recipe header: position, result, and ingredient list.
///
/// ```text
/// 001 lamp1 ← 2 wood, 4 nail
/// 002 (no result) ← (no ingredients)
/// ```
fn recipe_header(index: usize, recipe: &Recipe) -> String {
    let ingredients = if recipe.ingredients.is_empty() {
        "(no ingredients)".to_string()
    } else {
        recipe
            .ingredients
            .iter()
            .map(|g| format!("{} {}", g.qty, or_placeholder(&g.asset_id, "?")))
            .collect::<Vec<_>>()
            .join(", ")
    };
    format!(
        "{} {} ← {}",
        format_index(index),
        or_placeholder(&recipe.result_asset_id, "(no result)"),
        ingredients
    )
}

// ============================================================================
// List
// ============================================================================

/// Format the full catalog: items, then recipes.
pub fn format_project(project: &Project) -> Vec<String> {
    let mut lines = vec!["Items".to_string()];
    if project.items.is_empty() {
        lines.push(format!("{}(none)", indent(1)));
    }
    for (i, item) in project.items.iter().enumerate() {
        lines.push(item_header(i + 1, item));
        let placeable = if item.is_placeable() {
            ""
        } else {
            " (not placeable)"
        };
        lines.push(format!(
            "{}{}{}, price {}",
            indent(1),
            item.item_type,
            placeable,
            item.vendor_price
        ));
        if !item.tags.is_empty() {
            lines.push(format!("{}Tags: {}", indent(1), item.tags.join(", ")));
        }
        if !item.thumbnail_path.is_empty() {
            lines.push(format!("{}Thumbnail: {}", indent(1), item.thumbnail_path));
        }
    }

    lines.push(String::new());
    lines.push("Recipes".to_string());
    if project.recipes.is_empty() {
        lines.push(format!("{}(none)", indent(1)));
    }
    for (i, recipe) in project.recipes.iter().enumerate() {
        lines.push(recipe_header(i + 1, recipe));
        lines.push(format!("{}Id: {}", indent(1), recipe.id));
    }
    lines
}

/// Print the catalog to stdout.
pub fn print_project(project: &Project) {
    for line in format_project(project) {
        println!("{}", line);
    }
}

// ============================================================================
// Check
// ============================================================================

/// Explain, per entry, what an export would silently drop.
fn export_drops(project: &Project) -> Vec<String> {
    let mut notes = Vec::new();
    let mut seen = HashSet::new();
    for (i, item) in project.items.iter().enumerate() {
        if item.asset_id.is_empty() {
            notes.push(format!("item {}: no asset id", format_index(i + 1)));
        } else if !seen.insert(item.asset_id.as_str()) {
            notes.push(format!(
                "item {} [{}]: duplicate asset id",
                format_index(i + 1),
                item.asset_id
            ));
        }
    }
    for (i, recipe) in project.recipes.iter().enumerate() {
        if recipe.result_asset_id.is_empty() {
            notes.push(format!("recipe {}: no result asset id", format_index(i + 1)));
        }
        for (g, ingredient) in recipe.ingredients.iter().enumerate() {
            if ingredient.asset_id.is_empty() {
                notes.push(format!(
                    "recipe {}: ingredient {} has no asset id",
                    format_index(i + 1),
                    g + 1
                ));
            }
        }
    }
    notes
}

/// Format the result of validating a project, with export warnings.
pub fn format_check(project: &Project) -> Vec<String> {
    let mut lines = vec![format!(
        "Project is valid: {}, {}",
        count(project.items.len(), "item"),
        count(project.recipes.len(), "recipe")
    )];
    let drops = export_drops(project);
    if !drops.is_empty() {
        lines.push("Export will drop:".to_string());
        lines.extend(drops.into_iter().map(|d| format!("{}{}", indent(1), d)));
    }
    lines
}

/// Print check output to stdout.
pub fn print_check(project: &Project) {
    for line in format_check(project) {
        println!("{}", line);
    }
}

// ============================================================================
// Export
// ============================================================================

/// Format an export summary with the bundle's paths.
pub fn format_export(layout: &ExportLayout) -> Vec<String> {
    vec![
        format!(
            "Exported {}, {}, {}",
            count(layout.item_count, "item"),
            count(layout.recipe_count, "recipe"),
            count(layout.thumbnail_count, "thumbnail")
        ),
        format!("{}Database: {}", indent(1), layout.database_file.display()),
        format!(
            "{}Thumbnails: {}/",
            indent(1),
            layout.thumbnails_dir.display()
        ),
    ]
}

/// Print export output to stdout.
pub fn print_export(layout: &ExportLayout) {
    for line in format_export(layout) {
        println!("{}", line);
    }
}
