//! Project document schema and validation.
//!
//! A project is persisted as a single JSON document:
//!
//! ```text
//! { "version": 1, "items": [Item...], "recipes": [Recipe...] }
//! ```
//!
//! Loading never trusts the document's shape. [`validate`] walks an untyped
//! [`serde_json::Value`] and either returns a fully-typed [`Project`] or a
//! [`ValidationError`] listing every violation it found, each tagged with the
//! field path (`items[2].vendorPrice`) and what was wrong with it. There is
//! no partial result.
//!
//! ## Defaults
//!
//! Only three item fields may be omitted:
//!
//! | Field | Default |
//! |---|---|
//! | `vendorPrice` | `0` |
//! | `tags` | `[]` |
//! | `thumbnailPath` | `""` |
//!
//! Everything else is required. An explicit `null` is a type mismatch, not an
//! omission, and no value is ever coerced (`"5"` is not a number). Unknown
//! keys are ignored.
//!
//! ## Serde Integration
//!
//! [`Project`] serializes to the document above and deserializes *through*
//! [`validate`], so `serde_json::from_str::<Project>` enforces the same rules
//! as the project store.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The only document version this build understands.
pub const PROJECT_VERSION: u32 = 1;

// ============================================================================
// Item types
// ============================================================================

/// Closed set of catalog item types.
///
/// `Material` is the only non-placeable type; see [`ItemType::is_placeable`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum ItemType {
    Bed,
    DiningChair,
    DiningTable,
    FloorLamp,
    #[default]
    Free,
    Plant,
    Wall,
    Material,
}

impl ItemType {
    /// Every variant, in the order the editor offers them.
    pub const ALL: [ItemType; 8] = [
        ItemType::Bed,
        ItemType::DiningChair,
        ItemType::DiningTable,
        ItemType::FloorLamp,
        ItemType::Free,
        ItemType::Plant,
        ItemType::Wall,
        ItemType::Material,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ItemType::Bed => "Bed",
            ItemType::DiningChair => "DiningChair",
            ItemType::DiningTable => "DiningTable",
            ItemType::FloorLamp => "FloorLamp",
            ItemType::Free => "Free",
            ItemType::Plant => "Plant",
            ItemType::Wall => "Wall",
            ItemType::Material => "Material",
        }
    }

    /// Whether an item of this type can be placed in the world.
    pub fn is_placeable(self) -> bool {
        match self {
            ItemType::Material => false,
            ItemType::Bed
            | ItemType::DiningChair
            | ItemType::DiningTable
            | ItemType::FloorLamp
            | ItemType::Free
            | ItemType::Plant
            | ItemType::Wall => true,
        }
    }

    fn allowed_list() -> String {
        ItemType::ALL
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown item type '{0}' (expected one of: {allowed})", allowed = ItemType::allowed_list())]
pub struct UnknownItemType(pub String);

impl FromStr for ItemType {
    type Err = UnknownItemType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ItemType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownItemType(s.to_string()))
    }
}

// ============================================================================
// Document types
// ============================================================================

/// A catalog entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Primary key. Unique only after export deduplication.
    pub asset_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    pub vendor_price: f64,
    pub tags: Vec<String>,
    /// Posix-style path relative to the project directory, or empty.
    pub thumbnail_path: String,
}

impl Item {
    pub fn is_placeable(&self) -> bool {
        self.item_type.is_placeable()
    }
}

/// One input of a recipe. References an item by asset id, unchecked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    pub asset_id: String,
    pub qty: u32,
}

/// A crafting rule producing `result_asset_id` from its ingredients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    /// Generated once at creation, never edited.
    pub id: String,
    pub result_asset_id: String,
    pub ingredients: Vec<Ingredient>,
}

/// The whole editable document.
///
/// The version tag is implicit: every `Project` value is a version
/// [`PROJECT_VERSION`] document, and serialization always writes it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Project {
    pub items: Vec<Item>,
    pub recipes: Vec<Recipe>,
}

impl Serialize for Project {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut doc = serializer.serialize_struct("Project", 3)?;
        doc.serialize_field("version", &PROJECT_VERSION)?;
        doc.serialize_field("items", &self.items)?;
        doc.serialize_field("recipes", &self.recipes)?;
        doc.end()
    }
}

impl<'de> Deserialize<'de> for Project {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        validate(&value).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Violations
// ============================================================================

/// What was wrong with a single field.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ViolationKind {
    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    #[error("required field is missing")]
    Missing,
    #[error("'{value}' is not one of: {allowed}")]
    InvalidEnum { value: String, allowed: String },
    #[error("{0}")]
    Constraint(&'static str),
    #[error("version must be {}, found {found}", PROJECT_VERSION)]
    VersionMismatch { found: String },
}

/// A violation located at a field path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Dotted path with array indices, e.g. `recipes[0].ingredients[1].qty`.
    /// Empty for the document root.
    pub path: String,
    pub kind: ViolationKind,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "(root): {}", self.kind)
        } else {
            write!(f, "{}: {}", self.path, self.kind)
        }
    }
}

/// The document does not conform to the schema.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid project document: {}", summarize(.violations))]
pub struct ValidationError {
    pub violations: Vec<Violation>,
}

impl ValidationError {
    /// Whether any violation was reported at exactly `path`.
    pub fn has_violation_at(&self, path: &str) -> bool {
        self.violations.iter().any(|v| v.path == path)
    }
}

fn summarize(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(Violation::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

// ============================================================================
// Validator
// ============================================================================

/// Validate a parsed JSON value as a project document.
///
/// Collects every violation rather than stopping at the first. The input is
/// never modified.
pub fn validate(value: &Value) -> Result<Project, ValidationError> {
    let mut validator = Validator::default();
    match validator.project(value) {
        Some(project) if validator.violations.is_empty() => Ok(project),
        _ => Err(ValidationError {
            violations: validator.violations,
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn field_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}

type Object = Map<String, Value>;

#[derive(Default)]
struct Validator {
    violations: Vec<Violation>,
}

impl Validator {
    fn push(&mut self, path: &str, kind: ViolationKind) {
        self.violations.push(Violation {
            path: path.to_string(),
            kind,
        });
    }

    fn mismatch(&mut self, path: &str, expected: &'static str, found: &Value) {
        self.push(
            path,
            ViolationKind::TypeMismatch {
                expected,
                found: json_kind(found),
            },
        );
    }

    fn object<'a>(&mut self, path: &str, value: &'a Value) -> Option<&'a Object> {
        let object = value.as_object();
        if object.is_none() {
            self.mismatch(path, "object", value);
        }
        object
    }

    fn required<'a>(&mut self, object: &'a Object, path: &str, key: &str) -> Option<&'a Value> {
        let value = object.get(key);
        if value.is_none() {
            self.push(&field_path(path, key), ViolationKind::Missing);
        }
        value
    }

    fn string(&mut self, path: &str, value: &Value) -> Option<String> {
        match value.as_str() {
            Some(s) => Some(s.to_string()),
            None => {
                self.mismatch(path, "string", value);
                None
            }
        }
    }

    fn non_empty_string(&mut self, object: &Object, path: &str, key: &str) -> Option<String> {
        let value = self.required(object, path, key)?;
        let path = field_path(path, key);
        let s = self.string(&path, value)?;
        if s.is_empty() {
            self.push(&path, ViolationKind::Constraint("must not be empty"));
            return None;
        }
        Some(s)
    }

    /// Validate every element of an array, keeping going past bad elements so
    /// all of their violations are reported.
    fn elements<T>(
        &mut self,
        path: &str,
        value: &Value,
        mut each: impl FnMut(&mut Self, &str, &Value) -> Option<T>,
    ) -> Option<Vec<T>> {
        let Some(values) = value.as_array() else {
            self.mismatch(path, "array", value);
            return None;
        };
        let mut out = Vec::with_capacity(values.len());
        let mut complete = true;
        for (i, element) in values.iter().enumerate() {
            match each(self, &format!("{path}[{i}]"), element) {
                Some(v) => out.push(v),
                None => complete = false,
            }
        }
        complete.then_some(out)
    }

    fn required_array<T>(
        &mut self,
        object: &Object,
        path: &str,
        key: &str,
        each: impl FnMut(&mut Self, &str, &Value) -> Option<T>,
    ) -> Option<Vec<T>> {
        let value = self.required(object, path, key)?;
        self.elements(&field_path(path, key), value, each)
    }

    fn project(&mut self, value: &Value) -> Option<Project> {
        let object = self.object("", value)?;
        self.version(object);
        let items = self.required_array(object, "", "items", Self::item);
        let recipes = self.required_array(object, "", "recipes", Self::recipe);
        Some(Project {
            items: items?,
            recipes: recipes?,
        })
    }

    fn version(&mut self, object: &Object) {
        let Some(value) = self.required(object, "", "version") else {
            return;
        };
        if value.as_f64() != Some(f64::from(PROJECT_VERSION)) {
            self.push(
                "version",
                ViolationKind::VersionMismatch {
                    found: value.to_string(),
                },
            );
        }
    }

    fn item(&mut self, path: &str, value: &Value) -> Option<Item> {
        let object = self.object(path, value)?;
        let asset_id = self.non_empty_string(object, path, "assetId");
        let name = self.non_empty_string(object, path, "name");
        let item_type = self.item_type(object, path);
        let vendor_price = match object.get("vendorPrice") {
            None => Some(0.0),
            Some(v) => self.vendor_price(&field_path(path, "vendorPrice"), v),
        };
        let tags = match object.get("tags") {
            None => Some(Vec::new()),
            Some(v) => self.elements(&field_path(path, "tags"), v, Self::string),
        };
        let thumbnail_path = match object.get("thumbnailPath") {
            None => Some(String::new()),
            Some(v) => self.string(&field_path(path, "thumbnailPath"), v),
        };
        Some(Item {
            asset_id: asset_id?,
            name: name?,
            item_type: item_type?,
            vendor_price: vendor_price?,
            tags: tags?,
            thumbnail_path: thumbnail_path?,
        })
    }

    fn item_type(&mut self, object: &Object, path: &str) -> Option<ItemType> {
        let value = self.required(object, path, "type")?;
        let path = field_path(path, "type");
        let name = self.string(&path, value)?;
        match name.parse::<ItemType>() {
            Ok(t) => Some(t),
            Err(_) => {
                self.push(
                    &path,
                    ViolationKind::InvalidEnum {
                        value: name,
                        allowed: ItemType::allowed_list(),
                    },
                );
                None
            }
        }
    }

    fn vendor_price(&mut self, path: &str, value: &Value) -> Option<f64> {
        let Some(price) = value.as_f64() else {
            self.mismatch(path, "number", value);
            return None;
        };
        if price < 0.0 {
            self.push(path, ViolationKind::Constraint("must be zero or greater"));
            return None;
        }
        Some(price)
    }

    fn recipe(&mut self, path: &str, value: &Value) -> Option<Recipe> {
        let object = self.object(path, value)?;
        let id = self.non_empty_string(object, path, "id");
        let result_asset_id = self.non_empty_string(object, path, "resultAssetId");
        let ingredients = self.required_array(object, path, "ingredients", Self::ingredient);
        Some(Recipe {
            id: id?,
            result_asset_id: result_asset_id?,
            ingredients: ingredients?,
        })
    }

    fn ingredient(&mut self, path: &str, value: &Value) -> Option<Ingredient> {
        let object = self.object(path, value)?;
        let asset_id = self.non_empty_string(object, path, "assetId");
        let qty = self
            .required(object, path, "qty")
            .and_then(|v| self.quantity(&field_path(path, "qty"), v));
        Some(Ingredient {
            asset_id: asset_id?,
            qty: qty?,
        })
    }

    fn quantity(&mut self, path: &str, value: &Value) -> Option<u32> {
        let Some(n) = value.as_f64() else {
            self.mismatch(path, "number", value);
            return None;
        };
        let problem = if n.fract() != 0.0 {
            "must be an integer"
        } else if n < 1.0 {
            "must be a positive integer"
        } else if n > f64::from(u32::MAX) {
            "must fit in 32 bits"
        } else {
            return Some(n as u32);
        };
        self.push(path, ViolationKind::Constraint(problem));
        None
    }
}
