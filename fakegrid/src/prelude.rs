//! Convenient re-exports of commonly used types from fakegrid.
//!
//! Import this prelude module to quickly access the most frequently used types
//! and traits without needing to import from multiple sub-modules:
//!
//! ```ignore
//! use fakegrid::prelude::*;
//! ```
//!
//! This provides access to:
//! - The client contract and recorded calls
//! - Entities, ids and typed records
//! - Filters and field selection
//! - Fixtures and error types

pub use fakegrid_core::{
    api::{Call, CallKind, EntityApi, EntityApiBuilder},
    entity::{Entity, EntityExt, EntityId, Record, RecordExt},
    query::{Fields, Filter, FilterOp},
    fixture::{Dataset, SchemaFixture},
    typed::{EntityApiExt, TypedEntities},
    error::{FakeStoreError, FakeStoreResult},
};
