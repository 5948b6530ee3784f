//! Project directory persistence.
//!
//! A project is a directory with a fixed layout:
//!
//! ```text
//! ItemWorldProject/
//! ├── db.json                 # The project document (see `schema`)
//! ├── config.toml             # Optional tool settings (see `config`)
//! ├── assets/
//! │   └── thumbnails/         # Attached thumbnails, copied in by name
//! │       └── lamp.png
//! └── exports/hw/             # Default export location (see `export`)
//! ```
//!
//! Every entry point calls [`ensure`] first, so any directory, including an
//! empty or nonexistent one, becomes a valid empty project on first touch.
//!
//! ## Write Semantics
//!
//! [`save`] replaces the whole document. There is no merge and no lock: if
//! something else edits `db.json` between a [`load`] and a [`save`], the save
//! wins and the other edit is lost.

use crate::schema::{self, Project, ValidationError};
use crate::thumbnail::{self, ThumbnailError};
use directories::ProjectDirs;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name of the project document inside a project directory.
pub const DOCUMENT_FILENAME: &str = "db.json";

/// Thumbnail directory, relative to the project directory.
pub const THUMBNAILS_DIR: &str = "assets/thumbnails";

const DEFAULT_PROJECT_NAME: &str = "ItemWorldProject";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Project document {} is not valid JSON: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Thumbnail(#[from] ThumbnailError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Could not determine a data directory for this platform")]
    NoDataDir,
}

/// Path of the thumbnails directory for a project.
pub fn thumbnails_dir(project_dir: &Path) -> PathBuf {
    project_dir.join(THUMBNAILS_DIR)
}

/// Make `project_dir` a valid project, creating whatever is missing.
///
/// Creates the directory and its thumbnails folder recursively, and writes an
/// empty version-1 document if none exists. Existing files are never touched.
/// Returns the document path.
pub fn ensure(project_dir: &Path) -> Result<PathBuf, StoreError> {
    fs::create_dir_all(project_dir)?;

    let document = project_dir.join(DOCUMENT_FILENAME);
    if !document.exists() {
        fs::write(&document, serde_json::to_string(&Project::default())?)?;
        tracing::info!(path = %document.display(), "created empty project document");
    }

    fs::create_dir_all(thumbnails_dir(project_dir))?;
    Ok(document)
}

/// Read and validate the project document.
///
/// No partial result: a document that parses but fails validation is an error.
pub fn load(project_dir: &Path) -> Result<Project, StoreError> {
    let document = ensure(project_dir)?;
    let raw = fs::read_to_string(&document)?;
    let value: serde_json::Value =
        serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt {
            path: document.clone(),
            source,
        })?;
    let project = schema::validate(&value)?;
    tracing::debug!(
        path = %document.display(),
        items = project.items.len(),
        recipes = project.recipes.len(),
        "loaded project"
    );
    Ok(project)
}

/// Overwrite the project document with `project`.
pub fn save(project_dir: &Path, project: &Project) -> Result<(), StoreError> {
    let document = ensure(project_dir)?;
    fs::write(&document, serde_json::to_string(project)?)?;
    tracing::debug!(
        path = %document.display(),
        items = project.items.len(),
        recipes = project.recipes.len(),
        "saved project"
    );
    Ok(())
}

/// Use a caller-chosen directory as the project location.
pub fn open(project_dir: &Path) -> Result<PathBuf, StoreError> {
    ensure(project_dir)?;
    Ok(project_dir.to_path_buf())
}

/// The per-user default project location, created on first use.
///
/// Lives in an `ItemWorldProject` folder under the platform's per-user
/// application data directory (XDG data home, Application Support, or
/// roaming AppData).
pub fn default_project_dir() -> Result<PathBuf, StoreError> {
    let dirs = ProjectDirs::from("com", "ItemWorld", "Item World Database")
        .ok_or(StoreError::NoDataDir)?;
    let dir = dirs.data_dir().join(DEFAULT_PROJECT_NAME);
    open(&dir)
}

/// Validate `source` and copy it into the project's thumbnails folder.
///
/// The copy keeps the source file name, replacing any thumbnail already
/// stored under that name. Returns the path to record on the item: relative to
/// the project directory, with forward slashes.
pub fn attach_thumbnail(project_dir: &Path, source: &Path) -> Result<String, StoreError> {
    thumbnail::ensure_square_png(source)?;

    let file_name = source.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("thumbnail source has no file name: {}", source.display()),
        )
    })?;

    let thumbs = thumbnails_dir(project_dir);
    fs::create_dir_all(&thumbs)?;
    let destination = thumbs.join(file_name);
    if !is_same_file(source, &destination) {
        fs::copy(source, &destination)?;
    }
    tracing::info!(
        source = %source.display(),
        destination = %destination.display(),
        "attached thumbnail"
    );

    Ok(format!("{THUMBNAILS_DIR}/{}", file_name.to_string_lossy()))
}

/// Copying a file onto itself would truncate it.
fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
