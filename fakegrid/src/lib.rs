//! In-memory fake of an entity-tracking service's CRUD API, for tests.
//!
//! This crate is the primary entry point. It re-exports the contract and data
//! model from `fakegrid-core` and the in-memory store from `fakegrid-memory`.
//!
//! # Features
//!
//! - **Drop-in client** - Code under test talks to [`EntityApi`](api::EntityApi); tests pass a fake
//! - **Seed fixtures** - Load a baseline dataset and schema from JSON or build them in code
//! - **Representative filtering** - The operator subset exercised by tests, with AND semantics
//! - **Typed records** - Read and write plain serde structs instead of raw documents
//! - **Call recording** - Assert on which operations were called and with what
//!
//! # Quick Start
//!
//! ```ignore
//! use fakegrid::{prelude::*, memory::FakeEntityStore};
//! use bson::doc;
//!
//! // Code under test only knows about the trait
//! fn approve(api: &mut dyn EntityApi, version_id: i64) -> bool {
//!     api.update("Version", version_id, doc! { "sg_status_list": "apr" }).is_some()
//! }
//!
//! let mut store = FakeEntityStore::builder()
//!     .baseline_json(r#"{ "Version": { "7": { "code": "sh010_v001" } } }"#)
//!     .build()
//!     .unwrap();
//!
//! assert!(approve(&mut store, 7));
//!
//! let version = store
//!     .find_one("Version", &[Filter::is("id", 7)], Fields::from("sg_status_list"))
//!     .unwrap();
//! assert_eq!(version.get_str("sg_status_list").unwrap(), "apr");
//! ```
//!
//! # Typed Records
//!
//! ```ignore
//! use fakegrid::{prelude::*, memory::FakeEntityStore};
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! pub struct Shot {
//!     #[serde(default)]
//!     pub id: i64,
//!     pub code: String,
//! }
//!
//! impl Record for Shot {
//!     fn entity_type() -> &'static str { "Shot" }
//! }
//!
//! let mut store = FakeEntityStore::new();
//! let mut shots = store.records::<Shot>();
//!
//! let shot = shots.create(&Shot { id: 0, code: "sh010".into() }).unwrap();
//! assert_eq!(shot.id, 10_000);
//! ```
//!
//! # Backends
//!
//! - [`memory`] - The in-memory fake

pub mod prelude;

pub use fakegrid_core::{api, entity, error, fixture, query, typed};

// Re-export value types for convenience
pub use bson;
pub use serde_json;

/// In-memory fake implementations.
pub mod memory {
    pub use fakegrid_memory::{CallJournal, DEFAULT_FIRST_ID, FakeEntityStore, FakeEntityStoreBuilder};
}
