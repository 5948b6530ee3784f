//! Shared test utilities for the item-world-db test suite.
//!
//! Provides image fixture writers, document builders, and lookup helpers
//! that work with [`Project`] values.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let project = sample_project();
//! let lamp = find_item(&project, "lamp1");
//! assert_eq!(lamp.name, "Lamp");
//!
//! let tmp = tempfile::TempDir::new().unwrap();
//! write_png(&tmp.path().join("lamp.png"), 64, 64);
//! ```

use std::path::Path;

use crate::schema::{Ingredient, Item, ItemType, Project, Recipe};
use image::{ImageFormat, RgbImage};

// =========================================================================
// Image fixtures
// =========================================================================

fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    })
}

/// Write a real PNG of the given size, creating parent directories.
pub fn write_png(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    gradient(width, height)
        .save_with_format(path, ImageFormat::Png)
        .unwrap();
}

/// Write a real JPEG of the given size regardless of the path's extension.
pub fn write_jpeg(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    gradient(width, height)
        .save_with_format(path, ImageFormat::Jpeg)
        .unwrap();
}

/// Cut a PNG written by [`write_png`] halfway through its image data,
/// leaving the signature and header chunk intact.
pub fn truncate_pixel_data(path: &Path) {
    // 8-byte signature + 25-byte IHDR chunk.
    const HEADER_LEN: usize = 33;
    let bytes = std::fs::read(path).unwrap();
    assert!(bytes.len() > HEADER_LEN + 16, "PNG too small to truncate");
    let keep = HEADER_LEN + (bytes.len() - HEADER_LEN) / 2;
    std::fs::write(path, &bytes[..keep]).unwrap();
}

// =========================================================================
// Document builders
// =========================================================================

/// A minimal valid item of type `Free`.
pub fn item(asset_id: &str, name: &str) -> Item {
    Item {
        asset_id: asset_id.to_string(),
        name: name.to_string(),
        ..Item::default()
    }
}

/// An item with a thumbnail path set.
pub fn item_with_thumbnail(asset_id: &str, thumbnail_path: &str) -> Item {
    Item {
        thumbnail_path: thumbnail_path.to_string(),
        ..item(asset_id, asset_id)
    }
}

/// A recipe from `(asset_id, qty)` pairs.
pub fn recipe(id: &str, result: &str, ingredients: &[(&str, u32)]) -> Recipe {
    Recipe {
        id: id.to_string(),
        result_asset_id: result.to_string(),
        ingredients: ingredients
            .iter()
            .map(|(asset_id, qty)| Ingredient {
                asset_id: asset_id.to_string(),
                qty: *qty,
            })
            .collect(),
    }
}

/// Lamp, wood and nails, with two recipes that both use wood.
pub fn sample_project() -> Project {
    Project {
        items: vec![
            Item {
                item_type: ItemType::FloorLamp,
                vendor_price: 5.0,
                ..item("lamp1", "Lamp")
            },
            Item {
                item_type: ItemType::Material,
                tags: vec!["raw".into()],
                ..item("wood", "Wood")
            },
            Item {
                item_type: ItemType::Material,
                ..item("nail", "Nail")
            },
        ],
        recipes: vec![
            recipe("r1", "lamp1", &[("wood", 2), ("nail", 4)]),
            recipe("r2", "nail", &[("wood", 1)]),
        ],
    }
}

// =========================================================================
// Lookups: panic with a clear message on miss
// =========================================================================

/// Find an item by asset id. Panics if not found.
pub fn find_item<'a>(project: &'a Project, asset_id: &str) -> &'a Item {
    project
        .items
        .iter()
        .find(|i| i.asset_id == asset_id)
        .unwrap_or_else(|| {
            let ids: Vec<&str> = project.items.iter().map(|i| i.asset_id.as_str()).collect();
            panic!("item '{asset_id}' not found. Available: {ids:?}")
        })
}

/// All ingredient asset ids of a recipe, in order.
pub fn ingredient_ids(recipe: &Recipe) -> Vec<&str> {
    recipe
        .ingredients
        .iter()
        .map(|g| g.asset_id.as_str())
        .collect()
}

/// Names of the entries in a directory, sorted.
pub fn dir_entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}
