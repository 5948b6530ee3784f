//! Export bundle generation for the game engine.
//!
//! Takes a validated [`Project`] and writes a self-contained bundle:
//!
//! ```text
//! exports/hw/
//! ├── database.txt            # {"v":1,"items":[...],"recipes":[...]}
//! └── thumbnails/
//!     ├── lamp1.png           # Renamed to the item's asset id
//!     └── wood.png
//! ```
//!
//! ## Filtering
//!
//! Editing is lenient; export is where integrity is enforced.
//!
//! - **Items** are deduplicated by `asset_id`, first occurrence in list order
//!   wins. Items with an empty `asset_id` are dropped.
//! - **Recipes** survive only if `result_asset_id` is non-empty and *every*
//!   ingredient has a non-empty `asset_id`. A recipe with one bad ingredient is
//!   dropped whole, never trimmed. Ingredient ids are not checked against the
//!   item list.
//!
//! Both filters are silent: dropped entries are policy, not errors.
//!
//! ## Thumbnails
//!
//! For each surviving item with a `thumbnail_path`, the source is resolved
//! against the project directory. A missing source is skipped silently; an
//! existing one is re-checked by the square-PNG guard and copied to
//! `thumbnails/{asset_id}.png`. A thumbnail left over from an earlier export
//! for an item that no longer gets one is removed.
//!
//! Thumbnails are handled one at a time, in item order.
//!
//! A surviving asset id doubles as a file name, so it must be a single plain
//! path component (no `/`, `\`, `.` or `..`). Export refuses the whole
//! project with [`ExportError::UnsafeAssetId`] before touching the output
//! directory otherwise.
//!
//! ## Payload Shape
//!
//! Items lose `thumbnailPath`; recipes lose `id`. Everything else is carried
//! through unchanged.
//!
//! The export never writes to the project directory. A failure partway through
//! leaves whatever was already written in the output directory.

use crate::imaging::{ImageBackend, RustBackend};
use crate::schema::{Ingredient, Item, ItemType, Project, Recipe};
use crate::store::{self, StoreError};
use crate::thumbnail::{self, ThumbnailError};
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// File name of the JSON payload inside the output directory.
pub const DATABASE_FILENAME: &str = "database.txt";

/// Format version written as `v` in the payload.
pub const EXPORT_FORMAT_VERSION: u32 = 1;

const THUMBNAILS_DIR: &str = "thumbnails";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Thumbnail(#[from] ThumbnailError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Asset id '{0}' cannot be used as a thumbnail file name")]
    UnsafeAssetId(String),
}

/// Where an export wrote its files, and how much went into them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportLayout {
    pub out_dir: PathBuf,
    pub database_file: PathBuf,
    pub thumbnails_dir: PathBuf,
    pub item_count: usize,
    pub recipe_count: usize,
    pub thumbnail_count: usize,
}

/// An item as the engine sees it.
#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExportItem<'a> {
    pub asset_id: &'a str,
    pub name: &'a str,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    pub vendor_price: f64,
    pub tags: &'a [String],
}

/// A recipe as the engine sees it.
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExportRecipe<'a> {
    pub result_asset_id: &'a str,
    pub ingredients: &'a [Ingredient],
}

/// The full `database.txt` document.
#[derive(Debug, Serialize, PartialEq)]
pub struct Payload<'a> {
    pub v: u32,
    pub items: Vec<ExportItem<'a>>,
    pub recipes: Vec<ExportRecipe<'a>>,
}

/// Items that survive export: non-empty ids, first occurrence of each id.
pub fn dedupe_items(items: &[Item]) -> Vec<&Item> {
    let mut seen = HashSet::new();
    items
        .iter()
        .filter(|i| !i.asset_id.is_empty() && seen.insert(i.asset_id.as_str()))
        .collect()
}

/// Whether a recipe is complete enough to export.
pub fn is_exportable(recipe: &Recipe) -> bool {
    !recipe.result_asset_id.is_empty() && recipe.ingredients.iter().all(|g| !g.asset_id.is_empty())
}

/// Recipes that survive export, in order.
pub fn exportable_recipes(recipes: &[Recipe]) -> Vec<&Recipe> {
    recipes.iter().filter(|r| is_exportable(r)).collect()
}

/// Project the surviving items and recipes into the payload shape.
pub fn build_payload<'a>(items: &[&'a Item], recipes: &[&'a Recipe]) -> Payload<'a> {
    Payload {
        v: EXPORT_FORMAT_VERSION,
        items: items
            .iter()
            .map(|i| ExportItem {
                asset_id: &i.asset_id,
                name: &i.name,
                item_type: i.item_type,
                vendor_price: i.vendor_price,
                tags: &i.tags,
            })
            .collect(),
        recipes: recipes
            .iter()
            .map(|r| ExportRecipe {
                result_asset_id: &r.result_asset_id,
                ingredients: &r.ingredients,
            })
            .collect(),
    }
}

/// Write the export bundle for `project` into `out_dir`.
pub fn export(
    project: &Project,
    project_dir: &Path,
    out_dir: &Path,
) -> Result<ExportLayout, ExportError> {
    export_with_backend(&RustBackend::new(), project, project_dir, out_dir)
}

/// Export using a specific image backend (allows testing with mock).
pub fn export_with_backend(
    backend: &impl ImageBackend,
    project: &Project,
    project_dir: &Path,
    out_dir: &Path,
) -> Result<ExportLayout, ExportError> {
    let items = dedupe_items(&project.items);
    let recipes = exportable_recipes(&project.recipes);
    if let Some(item) = items.iter().find(|i| !is_plain_file_stem(&i.asset_id)) {
        return Err(ExportError::UnsafeAssetId(item.asset_id.clone()));
    }

    let thumbnails_dir = out_dir.join(THUMBNAILS_DIR);
    fs::create_dir_all(out_dir)?;
    fs::create_dir_all(&thumbnails_dir)?;
    tracing::debug!(
        items_in = project.items.len(),
        items_out = items.len(),
        recipes_in = project.recipes.len(),
        recipes_out = recipes.len(),
        "filtered project for export"
    );

    let mut thumbnail_count = 0;
    for item in &items {
        let destination = thumbnails_dir.join(format!("{}.png", item.asset_id));
        if copy_thumbnail(backend, item, project_dir, &destination)? {
            thumbnail_count += 1;
        } else {
            remove_stale(&destination)?;
        }
    }

    let payload = build_payload(&items, &recipes);
    let database_file = out_dir.join(DATABASE_FILENAME);
    fs::write(&database_file, serde_json::to_string(&payload)?)?;

    tracing::info!(
        out_dir = %out_dir.display(),
        items = items.len(),
        recipes = recipes.len(),
        thumbnails = thumbnail_count,
        "export complete"
    );

    Ok(ExportLayout {
        out_dir: out_dir.to_path_buf(),
        database_file,
        thumbnails_dir,
        item_count: items.len(),
        recipe_count: recipes.len(),
        thumbnail_count,
    })
}

/// Load the project stored in `project_dir` and export it into `out_dir`.
pub fn export_project(project_dir: &Path, out_dir: &Path) -> Result<ExportLayout, ExportError> {
    let project = store::load(project_dir)?;
    export(&project, project_dir, out_dir)
}

/// Whether `asset_id` names a file directly inside the thumbnails folder:
/// one normal path component, no separators.
fn is_plain_file_stem(asset_id: &str) -> bool {
    if asset_id.contains(['/', '\\']) {
        return false;
    }
    let mut components = Path::new(asset_id).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(name)), None) if name == OsStr::new(asset_id)
    )
}

/// Copy an item's thumbnail into the bundle. Returns false when the item has
/// none to copy.
fn copy_thumbnail(
    backend: &impl ImageBackend,
    item: &Item,
    project_dir: &Path,
    destination: &Path,
) -> Result<bool, ExportError> {
    if item.thumbnail_path.is_empty() {
        return Ok(false);
    }
    let source = project_dir.join(&item.thumbnail_path);
    if !source.exists() {
        tracing::debug!(
            asset_id = %item.asset_id,
            source = %source.display(),
            "thumbnail source missing, skipping"
        );
        return Ok(false);
    }
    thumbnail::ensure_square_png_with(backend, &source)?;
    fs::copy(&source, destination)?;
    Ok(true)
}

fn remove_stale(path: &Path) -> Result<(), ExportError> {
    match fs::remove_file(path) {
        Ok(()) => {
            tracing::debug!(path = %path.display(), "removed stale thumbnail");
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}
