use clap::{Args, Parser, Subcommand};
use item_world_db::config::{self, ToolConfig};
use item_world_db::schema::{self, ItemType, Project, UnknownItemType};
use item_world_db::session::{self, IngredientPatch, ItemPatch, RecipePatch};
use item_world_db::{export, logging, output, store};
use std::error::Error;
use std::path::{Path, PathBuf};

type CliResult<T> = Result<T, Box<dyn Error>>;

#[derive(Parser)]
#[command(name = "item-world-db")]
#[command(version)]
#[command(about = "Author an item and recipe catalog and export it for the game engine")]
#[command(long_about = "\
Author an item and recipe catalog and export it for the game engine

A project is a directory holding one JSON document plus its thumbnails:

  ItemWorldProject/
  ├── db.json                  # Items and recipes
  ├── config.toml              # Optional settings (see gen-config)
  ├── assets/thumbnails/       # Square PNGs attached to items
  └── exports/hw/              # Export output
      ├── database.txt         # {v:1, items, recipes}
      └── thumbnails/          # {assetId}.png

Items and recipes are addressed by the 1-based position shown by 'list'.
Export keeps the first item for each asset id and drops recipes with a
missing result or ingredient id.")]
struct Cli {
    /// Project directory [default: per-user data folder]
    #[arg(long, env = "ITEM_WORLD_PROJECT", global = true)]
    project: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

/// Fields for a new item.
#[derive(Args)]
struct NewItem {
    /// Asset id, the item's key in the exported database
    asset_id: String,
    /// Display name
    name: String,
    /// Bed, DiningChair, DiningTable, FloorLamp, Free, Plant, Wall or Material
    #[arg(long = "type", value_parser = parse_item_type, default_value = "Free")]
    item_type: ItemType,
    /// Vendor price
    #[arg(long, value_parser = parse_price, default_value = "0")]
    price: f64,
    /// Comma-separated tags
    #[arg(long, default_value = "")]
    tags: String,
}

impl NewItem {
    fn into_patch(self) -> ItemPatch {
        ItemPatch {
            asset_id: Some(self.asset_id),
            name: Some(self.name),
            item_type: Some(self.item_type),
            vendor_price: Some(self.price),
            tags: Some(session::parse_tags(&self.tags)),
            thumbnail_path: None,
        }
    }
}

/// Item fields to change; omitted flags are left as they are.
#[derive(Args)]
struct ItemFields {
    #[arg(long)]
    asset_id: Option<String>,
    #[arg(long)]
    name: Option<String>,
    #[arg(long = "type", value_parser = parse_item_type)]
    item_type: Option<ItemType>,
    #[arg(long, value_parser = parse_price)]
    price: Option<f64>,
    /// Comma-separated tags, replacing the current ones
    #[arg(long)]
    tags: Option<String>,
}

impl ItemFields {
    fn into_patch(self) -> ItemPatch {
        ItemPatch {
            asset_id: self.asset_id,
            name: self.name,
            item_type: self.item_type,
            vendor_price: self.price,
            tags: self.tags.as_deref().map(session::parse_tags),
            thumbnail_path: None,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Create the project directory and an empty document if missing
    Init,
    /// Validate the project document and report what export would drop
    Check,
    /// List items and recipes
    List,
    /// Add an item
    AddItem(NewItem),
    /// Change fields of an item
    EditItem {
        /// Item position
        item: usize,
        #[command(flatten)]
        fields: ItemFields,
    },
    /// Remove an item and strip it from every recipe's ingredients
    RemoveItem {
        /// Item position
        item: usize,
    },
    /// Add a recipe
    AddRecipe {
        /// Asset id the recipe produces
        result: String,
        /// Ingredient as ASSET_ID[:QTY]; repeat for more
        #[arg(short, long = "ingredient", value_parser = parse_ingredient)]
        ingredients: Vec<(String, i64)>,
    },
    /// Change what a recipe produces
    EditRecipe {
        /// Recipe position
        recipe: usize,
        /// New result asset id
        #[arg(long)]
        result: String,
    },
    /// Remove a recipe
    RemoveRecipe {
        /// Recipe position
        recipe: usize,
    },
    /// Add an ingredient to a recipe
    AddIngredient {
        /// Recipe position
        recipe: usize,
        /// Ingredient asset id
        asset_id: String,
        /// Quantity; values below 1 become 1
        #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
        qty: i64,
    },
    /// Change an ingredient of a recipe
    EditIngredient {
        /// Recipe position
        recipe: usize,
        /// Ingredient position within the recipe
        ingredient: usize,
        #[arg(long)]
        asset_id: Option<String>,
        /// Quantity; values below 1 become 1
        #[arg(long, allow_negative_numbers = true)]
        qty: Option<i64>,
    },
    /// Remove an ingredient from a recipe
    RemoveIngredient {
        /// Recipe position
        recipe: usize,
        /// Ingredient position within the recipe
        ingredient: usize,
    },
    /// Validate a square PNG, copy it into the project, and set it on an item
    AttachThumbnail {
        /// Item position
        item: usize,
        /// PNG file to attach
        source: PathBuf,
    },
    /// Write database.txt and thumbnails for the game engine
    Export {
        /// Output directory [default: export.dir from config.toml]
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);
    let project = cli.project.as_deref();

    match cli.command {
        Command::Init => {
            let dir = resolve_project_dir(project)?;
            println!("Project ready: {}", dir.display());
        }
        Command::Check => {
            let dir = resolve_project_dir(project)?;
            output::print_check(&store::load(&dir)?);
        }
        Command::List => {
            let dir = resolve_project_dir(project)?;
            output::print_project(&store::load(&dir)?);
        }
        Command::AddItem(new_item) => edit(project, |_, p| {
            let p = session::add_item(p);
            let index = p.items.len() - 1;
            Ok(session::patch_item(p, index, new_item.into_patch()))
        })?,
        Command::EditItem { item, fields } => edit(project, |_, p| {
            let index = position(item, p.items.len(), "item")?;
            Ok(session::patch_item(p, index, fields.into_patch()))
        })?,
        Command::RemoveItem { item } => edit(project, |_, p| {
            let index = position(item, p.items.len(), "item")?;
            Ok(session::remove_item(p, index))
        })?,
        Command::AddRecipe {
            result,
            ingredients,
        } => edit(project, |_, p| {
            let mut p = session::add_recipe(p);
            let recipe = p.recipes.len() - 1;
            p = session::patch_recipe(
                p,
                recipe,
                RecipePatch {
                    result_asset_id: Some(result),
                    ingredients: None,
                },
            );
            for (asset_id, qty) in ingredients {
                p = append_ingredient(p, recipe, asset_id, qty);
            }
            Ok(p)
        })?,
        Command::EditRecipe { recipe, result } => edit(project, |_, p| {
            let index = position(recipe, p.recipes.len(), "recipe")?;
            Ok(session::patch_recipe(
                p,
                index,
                RecipePatch {
                    result_asset_id: Some(result),
                    ingredients: None,
                },
            ))
        })?,
        Command::RemoveRecipe { recipe } => edit(project, |_, p| {
            let index = position(recipe, p.recipes.len(), "recipe")?;
            Ok(session::remove_recipe(p, index))
        })?,
        Command::AddIngredient {
            recipe,
            asset_id,
            qty,
        } => edit(project, |_, p| {
            let index = position(recipe, p.recipes.len(), "recipe")?;
            Ok(append_ingredient(p, index, asset_id, qty))
        })?,
        Command::EditIngredient {
            recipe,
            ingredient,
            asset_id,
            qty,
        } => edit(project, |_, p| {
            let r = position(recipe, p.recipes.len(), "recipe")?;
            let g = position(ingredient, p.recipes[r].ingredients.len(), "ingredient")?;
            Ok(session::patch_ingredient(
                p,
                r,
                g,
                IngredientPatch { asset_id, qty },
            ))
        })?,
        Command::RemoveIngredient { recipe, ingredient } => edit(project, |_, p| {
            let r = position(recipe, p.recipes.len(), "recipe")?;
            let g = position(ingredient, p.recipes[r].ingredients.len(), "ingredient")?;
            Ok(session::remove_ingredient(p, r, g))
        })?,
        Command::AttachThumbnail { item, source } => edit(project, |dir, p| {
            let index = position(item, p.items.len(), "item")?;
            let rel = store::attach_thumbnail(dir, &source)?;
            println!("Attached {}", rel);
            Ok(session::patch_item(
                p,
                index,
                ItemPatch {
                    thumbnail_path: Some(rel),
                    ..Default::default()
                },
            ))
        })?,
        Command::Export { out } => {
            let dir = resolve_project_dir(project)?;
            let out_dir = match out {
                Some(out) => out,
                None => ToolConfig::load(&dir)?.export_dir(&dir),
            };
            output::print_export(&export::export_project(&dir, &out_dir)?);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// The `--project` directory if given, otherwise the per-user default.
fn resolve_project_dir(project: Option<&Path>) -> Result<PathBuf, store::StoreError> {
    match project {
        Some(dir) => store::open(dir),
        None => store::default_project_dir(),
    }
}

/// Load the project, apply one editing command, and save it back.
///
/// The result is validated before saving so the tool never writes a
/// document it could not load again.
fn edit(
    project: Option<&Path>,
    apply: impl FnOnce(&Path, Project) -> CliResult<Project>,
) -> CliResult<()> {
    let dir = resolve_project_dir(project)?;
    let edited = apply(&dir, store::load(&dir)?)?;
    schema::validate(&serde_json::to_value(&edited)?)?;
    store::save(&dir, &edited)?;
    println!("Saved {}", dir.join(store::DOCUMENT_FILENAME).display());
    Ok(())
}

fn append_ingredient(project: Project, recipe: usize, asset_id: String, qty: i64) -> Project {
    let project = session::add_ingredient(project, recipe);
    let index = project.recipes[recipe].ingredients.len() - 1;
    session::patch_ingredient(
        project,
        recipe,
        index,
        IngredientPatch {
            asset_id: Some(asset_id),
            qty: Some(qty),
        },
    )
}

/// Convert a 1-based position from the command line into an index.
fn position(n: usize, len: usize, what: &str) -> CliResult<usize> {
    if n == 0 || n > len {
        return Err(format!("no {what} at position {n} (have {len})").into());
    }
    Ok(n - 1)
}

fn parse_item_type(s: &str) -> Result<ItemType, UnknownItemType> {
    s.parse()
}

fn parse_price(s: &str) -> Result<f64, String> {
    let price: f64 = s.parse().map_err(|e| format!("invalid price '{s}': {e}"))?;
    if !price.is_finite() || price < 0.0 {
        return Err(format!("price must be a number zero or greater, got {s}"));
    }
    Ok(price)
}

/// Parse `ASSET_ID[:QTY]`, defaulting the quantity to 1.
fn parse_ingredient(s: &str) -> Result<(String, i64), String> {
    let (asset_id, qty) = match s.rsplit_once(':') {
        Some((id, qty)) => {
            let qty = qty
                .parse()
                .map_err(|e| format!("invalid quantity in '{s}': {e}"))?;
            (id, qty)
        }
        None => (s, 1),
    };
    if asset_id.is_empty() {
        return Err(format!("ingredient '{s}' has no asset id"));
    }
    Ok((asset_id.to_string(), qty))
}
