//! Typed access to the entities of a single type.
//!
//! [`TypedEntities`] wraps any [`EntityApi`] and converts between raw
//! [`Entity`](crate::entity::Entity) documents and a [`Record`] type through
//! serde, so tests can work with plain structs.
//!
//! # Example
//!
//! ```ignore
//! use fakegrid::prelude::*;
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
//! let shot = shots.create(&Shot { id: 0, code: "sh010".into() })?;
//! assert_eq!(shots.get(shot.id)?.unwrap().code, "sh010");
//! ```

use serde::Serialize;
use std::marker::PhantomData;

use crate::{
    api::EntityApi,
    entity::{EntityId, ID_FIELD, Record, RecordExt, TYPE_FIELD, to_entity},
    error::FakeStoreResult,
    query::{Fields, Filter},
};

/// A typed view over one entity type of an [`EntityApi`].
///
/// # Type Parameters
///
/// * `'a` - Lifetime of the borrowed client
/// * `A` - The client type
/// * `R` - The record type
#[derive(Debug)]
pub struct TypedEntities<'a, A: EntityApi + ?Sized, R: Record> {
    api: &'a mut A,
    _marker: PhantomData<R>,
}

impl<'a, A: EntityApi + ?Sized, R: Record> TypedEntities<'a, A, R> {
    pub(crate) fn new(api: &'a mut A) -> Self {
        Self { api, _marker: PhantomData }
    }

    /// Returns the entity type this view reads and writes.
    pub fn entity_type(&self) -> &'static str {
        R::entity_type()
    }

    /// Converts this view to a different record type.
    pub fn with_type<T: Record>(self) -> TypedEntities<'a, A, T> {
        TypedEntities::new(self.api)
    }

    /// Fetches a record by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored entity does not deserialize into `R`.
    pub fn get(&self, id: EntityId) -> FakeStoreResult<Option<R>> {
        self.api
            .find_one(R::entity_type(), &[Filter::is(ID_FIELD, id)], Fields::All)
            .map(R::from_entity)
            .transpose()
    }

    /// Returns every record matching all filters.
    ///
    /// # Errors
    ///
    /// Returns an error if any matching entity does not deserialize into `R`.
    pub fn find(&self, filters: &[Filter]) -> FakeStoreResult<Vec<R>> {
        self.api
            .find(R::entity_type(), filters, Fields::All)
            .into_iter()
            .map(R::from_entity)
            .collect()
    }

    /// Creates a record and returns it as stored, with its assigned id.
    ///
    /// Any `id` or `type` the record serializes is dropped before storing.
    ///
    /// # Errors
    ///
    /// Returns an error if the record fails to convert in either direction.
    pub fn create(&mut self, record: &R) -> FakeStoreResult<R> {
        let mut data = record.to_entity()?;
        data.remove(ID_FIELD);
        data.remove(TYPE_FIELD);

        R::from_entity(self.api.create(R::entity_type(), data))
    }

    /// Merges a partial payload into a record and returns the updated record.
    ///
    /// # Arguments
    ///
    /// * `id` - The id of the record to update
    /// * `changes` - Any value serializing to a document, e.g. a struct with the changed fields
    ///
    /// # Errors
    ///
    /// Returns an error if `changes` does not serialize to a document or the
    /// result does not deserialize into `R`.
    pub fn update<P: Serialize>(&mut self, id: EntityId, changes: &P) -> FakeStoreResult<Option<R>> {
        let data = to_entity(changes)?;

        self.api
            .update(R::entity_type(), id, data)
            .map(R::from_entity)
            .transpose()
    }

    /// Deletes a record. Returns `true` if something was removed.
    pub fn delete(&mut self, id: EntityId) -> bool {
        self.api.delete(R::entity_type(), id)
    }
}

/// Extension methods available on every [`EntityApi`].
pub trait EntityApiExt: EntityApi {
    /// Returns a typed view over the entities of `R`'s type.
    fn records<R: Record>(&mut self) -> TypedEntities<'_, Self, R>;
}

impl<A: EntityApi + ?Sized> EntityApiExt for A {
    fn records<R: Record>(&mut self) -> TypedEntities<'_, Self, R> {
        TypedEntities::new(self)
    }
}
