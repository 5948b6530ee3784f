//! End-to-end tests: build a project through the editing operations, persist
//! it, attach thumbnails, and check the bundle the game engine would load.

use image::{ImageFormat, RgbImage};
use item_world_db::schema::{ItemType, Project};
use item_world_db::session::{self, IngredientPatch, ItemPatch, RecipePatch};
use item_world_db::{export, store};
use serde_json::{Value, json};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_png(path: &Path, width: u32, height: u32) {
    RgbImage::from_pixel(width, height, image::Rgb([200, 120, 40]))
        .save_with_format(path, ImageFormat::Png)
        .unwrap();
}

fn new_item(project: Project, asset_id: &str, name: &str, item_type: ItemType) -> Project {
    let project = session::add_item(project);
    let index = project.items.len() - 1;
    session::patch_item(
        project,
        index,
        ItemPatch {
            asset_id: Some(asset_id.into()),
            name: Some(name.into()),
            item_type: Some(item_type),
            vendor_price: Some(5.0),
            ..Default::default()
        },
    )
}

fn new_recipe(project: Project, result: &str, ingredients: &[(&str, i64)]) -> Project {
    let mut project = session::add_recipe(project);
    let recipe = project.recipes.len() - 1;
    project = session::patch_recipe(
        project,
        recipe,
        RecipePatch {
            result_asset_id: Some(result.into()),
            ingredients: None,
        },
    );
    for (asset_id, qty) in ingredients {
        project = session::add_ingredient(project, recipe);
        let index = project.recipes[recipe].ingredients.len() - 1;
        project = session::patch_ingredient(
            project,
            recipe,
            index,
            IngredientPatch {
                asset_id: Some((*asset_id).into()),
                qty: Some(*qty),
            },
        );
    }
    project
}

fn read_database(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn lamp_catalog_round_trips_through_store_and_exports() {
    let tmp = TempDir::new().unwrap();
    let project_dir = tmp.path().join("project");
    store::open(&project_dir).unwrap();

    let source = tmp.path().join("lamp.png");
    write_png(&source, 64, 64);

    let mut project = store::load(&project_dir).unwrap();
    assert_eq!(project, Project::default());

    project = new_item(project, "lamp1", "Lamp", ItemType::FloorLamp);
    project = new_item(project, "wood", "Wood", ItemType::Material);
    project = new_recipe(project, "lamp1", &[("wood", 2)]);

    let rel = store::attach_thumbnail(&project_dir, &source).unwrap();
    assert_eq!(rel, "assets/thumbnails/lamp.png");
    project = session::patch_item(
        project,
        0,
        ItemPatch {
            thumbnail_path: Some(rel),
            ..Default::default()
        },
    );
    assert!(session::can_export(&project));

    store::save(&project_dir, &project).unwrap();
    let reloaded = store::load(&project_dir).unwrap();
    assert_eq!(reloaded, project);

    let out_dir = tmp.path().join("out");
    let layout = export::export_project(&project_dir, &out_dir).unwrap();
    assert_eq!(layout.item_count, 2);
    assert_eq!(layout.recipe_count, 1);
    assert_eq!(layout.thumbnail_count, 1);

    assert_eq!(
        read_database(&out_dir.join("database.txt")),
        json!({
            "v": 1,
            "items": [
                {"assetId": "lamp1", "name": "Lamp", "type": "FloorLamp", "vendorPrice": 5.0, "tags": []},
                {"assetId": "wood", "name": "Wood", "type": "Material", "vendorPrice": 5.0, "tags": []}
            ],
            "recipes": [
                {"resultAssetId": "lamp1", "ingredients": [{"assetId": "wood", "qty": 2}]}
            ]
        })
    );
    assert_eq!(
        fs::read(out_dir.join("thumbnails/lamp1.png")).unwrap(),
        fs::read(&source).unwrap()
    );
    assert!(!out_dir.join("thumbnails/wood.png").exists());
}

#[test]
fn cascade_delete_survives_save_and_export() {
    let tmp = TempDir::new().unwrap();
    let project_dir = tmp.path().join("project");

    let mut project = Project::default();
    project = new_item(project, "chair", "Chair", ItemType::DiningChair);
    project = new_item(project, "wood", "Wood", ItemType::Material);
    project = new_item(project, "nail", "Nail", ItemType::Material);
    project = new_recipe(project, "chair", &[("wood", 4), ("nail", 8)]);

    project = session::remove_item(project, 2);
    store::save(&project_dir, &project).unwrap();

    let reloaded = store::load(&project_dir).unwrap();
    assert_eq!(reloaded.items.len(), 2);
    assert_eq!(reloaded.recipes[0].ingredients.len(), 1);
    assert_eq!(reloaded.recipes[0].ingredients[0].asset_id, "wood");

    let out_dir = tmp.path().join("out");
    export::export_project(&project_dir, &out_dir).unwrap();
    let db = read_database(&out_dir.join("database.txt"));
    assert_eq!(
        db["recipes"],
        json!([{"resultAssetId": "chair", "ingredients": [{"assetId": "wood", "qty": 4}]}])
    );
}

#[test]
fn missing_thumbnail_is_skipped_and_stale_copy_removed() {
    let tmp = TempDir::new().unwrap();
    let project_dir = tmp.path().join("project");
    let out_dir = tmp.path().join("out");

    let source = tmp.path().join("plant.png");
    write_png(&source, 32, 32);
    let rel = store::attach_thumbnail(&project_dir, &source).unwrap();

    let mut project = new_item(Project::default(), "plant", "Plant", ItemType::Plant);
    project = session::patch_item(
        project,
        0,
        ItemPatch {
            thumbnail_path: Some(rel.clone()),
            ..Default::default()
        },
    );
    store::save(&project_dir, &project).unwrap();

    export::export_project(&project_dir, &out_dir).unwrap();
    assert!(out_dir.join("thumbnails/plant.png").exists());

    fs::remove_file(project_dir.join(&rel)).unwrap();
    let layout = export::export_project(&project_dir, &out_dir).unwrap();

    assert_eq!(layout.item_count, 1);
    assert_eq!(layout.thumbnail_count, 0);
    assert!(!out_dir.join("thumbnails/plant.png").exists());
}

#[test]
fn replaced_thumbnail_that_is_no_longer_square_fails_export() {
    let tmp = TempDir::new().unwrap();
    let project_dir = tmp.path().join("project");

    let source = tmp.path().join("wall.png");
    write_png(&source, 16, 16);
    let rel = store::attach_thumbnail(&project_dir, &source).unwrap();

    let mut project = new_item(Project::default(), "wall", "Wall", ItemType::Wall);
    project.items[0].thumbnail_path = rel.clone();
    store::save(&project_dir, &project).unwrap();

    write_png(&project_dir.join(&rel), 16, 8);

    let err = export::export_project(&project_dir, &tmp.path().join("out")).unwrap_err();
    assert!(err.to_string().contains("16x8"), "{err}");
}

#[test]
fn invalid_document_blocks_export() {
    let tmp = TempDir::new().unwrap();
    let project_dir = tmp.path().join("project");
    store::open(&project_dir).unwrap();
    fs::write(
        project_dir.join(store::DOCUMENT_FILENAME),
        r#"{"version":2,"items":[],"recipes":[]}"#,
    )
    .unwrap();

    let out_dir = tmp.path().join("out");
    assert!(export::export_project(&project_dir, &out_dir).is_err());
    assert!(!out_dir.join("database.txt").exists());
}
