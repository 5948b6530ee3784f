//! # Item World Database
//!
//! Authoring tool for a small game catalog: **items** (furniture, plants,
//! walls, crafting materials) and **recipes** that turn some items into
//! another. The catalog lives in a project directory as one JSON document;
//! an export step turns it into the flat payload and square PNG thumbnails
//! the game engine loads.
//!
//! # Architecture: Load → Edit → Save → Export
//!
//! ```text
//! db.json ──load──▶ Project ──session ops──▶ Project ──save──▶ db.json
//!                                                 │
//!                                                 └──export──▶ exports/hw/
//!                                                              ├── database.txt
//!                                                              └── thumbnails/{assetId}.png
//! ```
//!
//! - **Load** parses the document and runs it through the schema validator.
//!   A document that does not conform is rejected whole.
//! - **Edit** is a set of functions from `Project` to `Project`. No global
//!   state: the caller holds the current value and passes it along.
//! - **Save** overwrites the document. Last writer wins.
//! - **Export** deduplicates items, drops incomplete recipes, re-checks and
//!   copies thumbnails, and writes the payload.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`schema`] | Document types and the validator that produces them |
//! | [`session`] | Editing operations, including cascade delete |
//! | [`store`] | Project directory layout, load/save, thumbnail attach |
//! | [`export`] | Export filtering and bundle writing |
//! | [`thumbnail`] | Square-PNG guard used by attach and export |
//! | [`imaging`] | Image dimension probing behind a backend trait |
//! | [`config`] | Optional per-project `config.toml` |
//! | [`logging`] | `tracing` subscriber setup for the binary |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Lenient Editing, Strict Export
//!
//! The editor lets the catalog pass through half-finished states: blank
//! items, duplicate asset ids, recipes missing a result. Rejecting those
//! mid-edit would make the tool fight its user. Integrity is enforced once,
//! at export, where the rules are simple and silent: first asset id wins,
//! incomplete recipes are dropped whole.
//!
//! ## Ingredient References Are Not Foreign Keys
//!
//! A recipe may name an ingredient no item in this project defines. Catalogs
//! can reference assets that live elsewhere in the game, so dangling
//! references survive both validation and export.
//!
//! ## Thumbnails Are Checked Twice
//!
//! A thumbnail is validated when it is attached and again just before every
//! export copy. The file sits in the project directory in between, where
//! anything can replace it.

pub mod config;
pub mod export;
pub mod imaging;
pub mod logging;
pub mod output;
pub mod schema;
pub mod session;
pub mod store;
pub mod thumbnail;

#[cfg(test)]
pub(crate) mod test_helpers;
