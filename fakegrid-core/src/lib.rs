//! Core contract and data model for an in-memory fake of an entity-tracking service.
//!
//! This crate is backend-agnostic. It defines what a client of the service
//! looks like and the types that flow through it:
//!
//! - **Client contract** ([`api`]) - The [`EntityApi`](api::EntityApi) trait and recorded calls
//! - **Entities** ([`entity`]) - Entity documents, ids and typed [`Record`](entity::Record)s
//! - **Filtering** ([`query`]) - Filter triples, the supported operator table and field selection
//! - **Fixtures** ([`fixture`]) - Seed datasets and the opaque schema fixture
//! - **Typed access** ([`typed`]) - Serde-backed views over a single entity type
//! - **Error handling** ([`error`]) - Error types and result types
//!
//! # Example
//!
//! ```ignore
//! use fakegrid::prelude::*;
//! use bson::doc;
//!
//! fn rename_shot(api: &mut dyn EntityApi, id: i64, code: &str) -> Option<Entity> {
//!     api.update("Shot", id, doc! { "code": code })
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as fakegrid_core;

pub mod api;
pub mod entity;
pub mod error;
pub mod fixture;
pub mod query;
pub mod typed;
