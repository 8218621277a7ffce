//! In-memory fake of the entity-tracking service for fakegrid.
//!
//! This crate provides [`FakeEntityStore`], a single-threaded implementation
//! of the [`EntityApi`](fakegrid_core::api::EntityApi) trait meant to stand in
//! for the real client inside tests.
//!
//! # Features
//!
//! - **Seeded baseline** - Starts from an owned copy of a fixture dataset
//! - **Overlay of created entities** - New records never touch the baseline
//! - **Supported filter subset** - `id is`, `id in`, and `is`/`contains` on text fields
//! - **Call recording** - Every operation is journaled for assertions
//!
//! # Quick Start
//!
//! ```ignore
//! use fakegrid::{prelude::*, memory::FakeEntityStore};
//! use bson::doc;
//!
//! let mut store = FakeEntityStore::builder()
//!     .baseline_json(r#"{ "Shot": { "1": { "code": "sh010" } } }"#)
//!     .build()
//!     .unwrap();
//!
//! let created = store.create("Shot", doc! { "code": "sh020" });
//! assert_eq!(created.entity_id(), Some(10_000));
//!
//! let shots = store.find("Shot", &[Filter::contains("code", "sh0")], Fields::from("code"));
//! assert_eq!(shots.len(), 2);
//! assert_eq!(store.call_count(CallKind::Find), 1);
//! ```

#[allow(unused_extern_crates)]
extern crate self as fakegrid_memory;

pub mod store;
pub mod evaluator;
pub mod journal;

pub use store::{DEFAULT_FIRST_ID, FakeEntityStore, FakeEntityStoreBuilder};
pub use journal::CallJournal;
