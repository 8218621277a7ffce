//! The entity API contract shared by real clients and the in-memory fake.
//!
//! Code under test is written against [`EntityApi`], so a test can hand it a
//! fake store while production wires in a network client. The trait mirrors
//! the service's call shapes: five CRUD operations plus a schema accessor.
//!
//! # Traits
//!
//! - [`EntityApi`]: the operations every client implements
//! - [`EntityApiBuilder`]: factory trait for constructing a client
//!
//! # Examples
//!
//! ```ignore
//! use fakegrid::prelude::*;
//! use bson::doc;
//!
//! fn publish(api: &mut dyn EntityApi, code: &str) -> Entity {
//!     api.create("Version", doc! { "code": code })
//! }
//! ```
//!
//! The module also defines [`Call`], the record a fake keeps of every
//! operation it serves, for asserting on what the code under test did.

use std::fmt;

use crate::{
    entity::{Entity, EntityId},
    error::FakeStoreResult,
    fixture::SchemaFixture,
    query::{Fields, Filter},
};

/// Client interface to the entity-tracking service.
///
/// # Error Handling
///
/// None of the operations fail. A missing type or id yields `None`, an empty
/// vector, or `false`. Malformed or unsupported filters narrow nothing or
/// produce an empty result; they never raise.
///
/// # Returned entities
///
/// Every entity returned carries an integer `id` and a string `type` field.
pub trait EntityApi {
    /// Looks up a single entity by the first `("id", "is", <id>)` filter.
    ///
    /// All other filters are ignored. Returns `None` when no such filter is
    /// present or no entity has that id.
    ///
    /// # Arguments
    ///
    /// * `entity_type` - The entity type to search
    /// * `filters` - Filter triples; only the id lookup is used
    /// * `fields` - Fields to return in addition to `id` and `type`
    fn find_one(&self, entity_type: &str, filters: &[Filter], fields: Fields) -> Option<Entity>;

    /// Returns every entity of a type matching all filters.
    ///
    /// An unknown type or no match yields an empty vector. Result order is unspecified.
    ///
    /// # Arguments
    ///
    /// * `entity_type` - The entity type to search
    /// * `filters` - Filter triples, combined with AND
    /// * `fields` - Fields to return in addition to `id` and `type`
    fn find(&self, entity_type: &str, filters: &[Filter], fields: Fields) -> Vec<Entity>;

    /// Creates an entity and returns it with its newly assigned `id`.
    fn create(&mut self, entity_type: &str, data: Entity) -> Entity;

    /// Shallow-merges `data` into an existing entity and returns the result.
    ///
    /// Returns `None` if the entity does not exist.
    fn update(&mut self, entity_type: &str, entity_id: EntityId, data: Entity) -> Option<Entity>;

    /// Deletes an entity. Returns `true` if something was removed.
    fn delete(&mut self, entity_type: &str, entity_id: EntityId) -> bool;

    /// Returns the schema description.
    fn schema_read(&self) -> SchemaFixture;
}

/// Factory trait for constructing [`EntityApi`] implementations.
pub trait EntityApiBuilder {
    /// The client type produced by this builder.
    type Api: EntityApi;

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, e.g. a fixture fails to parse.
    fn build(self) -> FakeStoreResult<Self::Api>;
}

/// Discriminant of a [`Call`], for filtering recorded calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallKind {
    FindOne,
    Find,
    Create,
    Update,
    Delete,
    SchemaRead,
}

impl fmt::Display for CallKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CallKind::FindOne => "find_one",
            CallKind::Find => "find",
            CallKind::Create => "create",
            CallKind::Update => "update",
            CallKind::Delete => "delete",
            CallKind::SchemaRead => "schema_read",
        })
    }
}

/// A recorded invocation of an [`EntityApi`] operation, with its arguments.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    FindOne {
        entity_type: String,
        filters: Vec<Filter>,
        fields: Fields,
    },
    Find {
        entity_type: String,
        filters: Vec<Filter>,
        fields: Fields,
    },
    Create {
        entity_type: String,
        data: Entity,
    },
    Update {
        entity_type: String,
        entity_id: EntityId,
        data: Entity,
    },
    Delete {
        entity_type: String,
        entity_id: EntityId,
    },
    SchemaRead,
}

impl Call {
    /// Returns which operation this call was.
    pub fn kind(&self) -> CallKind {
        match self {
            Call::FindOne { .. } => CallKind::FindOne,
            Call::Find { .. } => CallKind::Find,
            Call::Create { .. } => CallKind::Create,
            Call::Update { .. } => CallKind::Update,
            Call::Delete { .. } => CallKind::Delete,
            Call::SchemaRead => CallKind::SchemaRead,
        }
    }

    /// Returns the entity type the call targeted, if any.
    pub fn entity_type(&self) -> Option<&str> {
        match self {
            Call::FindOne { entity_type, .. }
            | Call::Find { entity_type, .. }
            | Call::Create { entity_type, .. }
            | Call::Update { entity_type, .. }
            | Call::Delete { entity_type, .. } => Some(entity_type),
            Call::SchemaRead => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn call_reports_kind_and_type() {
        let call = Call::Update {
            entity_type: "Shot".into(),
            entity_id: 3,
            data: doc! { "code": "sh030" },
        };

        assert_eq!(call.kind(), CallKind::Update);
        assert_eq!(call.entity_type(), Some("Shot"));
        assert_eq!(Call::SchemaRead.entity_type(), None);
        assert_eq!(CallKind::FindOne.to_string(), "find_one");
    }
}
