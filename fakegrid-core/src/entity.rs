//! Core types for entity representation and typed record conversion.
//!
//! An [`Entity`] is an ordered field map. Stored records do not need to carry
//! their own `id` or `type`; both are stamped onto every entity handed back to
//! a caller (see [`EntityExt::annotate`]).

use bson::{Bson, Document, de::deserialize_from_bson, ser::serialize_to_bson};
use serde::{Serialize, de::DeserializeOwned};

use crate::error::{FakeStoreError, FakeStoreResult};

/// Integer identifier of an entity, unique within its entity type.
pub type EntityId = i64;

/// A single record: a mapping from field name to value.
pub type Entity = Document;

/// Name of the synthesized identifier field.
pub const ID_FIELD: &str = "id";

/// Name of the synthesized entity type field.
pub const TYPE_FIELD: &str = "type";

/// Reads an [`EntityId`] out of a BSON value.
///
/// Integers of either width are accepted, as are doubles with no fractional
/// part. Everything else yields `None`.
pub fn entity_id_from_bson(value: &Bson) -> Option<EntityId> {
    match value {
        Bson::Int32(value) => Some(i64::from(*value)),
        Bson::Int64(value) => Some(*value),
        Bson::Double(value) if value.fract() == 0.0 && value.is_finite() => Some(*value as i64),
        _ => None,
    }
}

/// Convenience accessors on [`Entity`] values.
pub trait EntityExt {
    /// Returns the synthesized `id` field, if present and integral.
    fn entity_id(&self) -> Option<EntityId>;

    /// Returns the synthesized `type` field, if present.
    fn entity_type(&self) -> Option<&str>;

    /// Stamps `id` and `type` onto this entity, replacing any previous values.
    fn annotate(&mut self, entity_type: &str, id: EntityId);

    /// Consuming form of [`EntityExt::annotate`].
    fn annotated(mut self, entity_type: &str, id: EntityId) -> Self
    where
        Self: Sized,
    {
        self.annotate(entity_type, id);
        self
    }
}

impl EntityExt for Entity {
    fn entity_id(&self) -> Option<EntityId> {
        self.get(ID_FIELD).and_then(entity_id_from_bson)
    }

    fn entity_type(&self) -> Option<&str> {
        self.get(TYPE_FIELD).and_then(Bson::as_str)
    }

    fn annotate(&mut self, entity_type: &str, id: EntityId) {
        self.insert(ID_FIELD, Bson::Int64(id));
        self.insert(TYPE_FIELD, Bson::String(entity_type.to_string()));
    }
}

/// A typed view of an entity type.
///
/// Implement this for plain serde structs to read and write entities without
/// handling raw documents. The `id` field, if the struct has one, is filled
/// from the synthesized identifier on read and ignored on create.
///
/// # Example
///
/// ```ignore
/// use fakegrid::entity::Record;
/// use serde::{Serialize, Deserialize};
///
/// #[derive(Debug, Clone, Serialize, Deserialize)]
/// pub struct Shot {
///     pub id: i64,
///     pub code: String,
/// }
///
/// impl Record for Shot {
///     fn entity_type() -> &'static str {
///         "Shot"
///     }
/// }
/// ```
pub trait Record: Serialize + DeserializeOwned {
    /// Returns the entity type this record is stored under.
    fn entity_type() -> &'static str;
}

/// Conversion helpers between [`Record`] values and [`Entity`] documents.
///
/// Automatically implemented for every [`Record`].
pub trait RecordExt: Record {
    /// Converts this record into an entity.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or the record does not serialize to a document.
    fn to_entity(&self) -> FakeStoreResult<Entity>;

    /// Builds a record from an entity.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity does not match the record's shape.
    fn from_entity(entity: Entity) -> FakeStoreResult<Self>;
}

impl<R: Record> RecordExt for R {
    fn to_entity(&self) -> FakeStoreResult<Entity> {
        to_entity(self)
    }

    fn from_entity(entity: Entity) -> FakeStoreResult<Self> {
        Ok(deserialize_from_bson(Bson::Document(entity))?)
    }
}

/// Serializes any value into an [`Entity`].
///
/// Used for partial update payloads as well as full records.
///
/// # Errors
///
/// Returns [`FakeStoreError::UnsupportedValue`] when the value serializes to
/// something other than a document.
pub fn to_entity<T: Serialize>(value: &T) -> FakeStoreResult<Entity> {
    match serialize_to_bson(value)? {
        Bson::Document(document) => Ok(document),
        other => Err(FakeStoreError::UnsupportedValue(format!(
            "expected a document, got {:?}",
            other.element_type()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;
    use pretty_assertions::assert_eq;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Shot {
        #[serde(default)]
        id: i64,
        code: String,
    }

    impl Record for Shot {
        fn entity_type() -> &'static str {
            "Shot"
        }
    }

    #[test]
    fn entity_id_accepts_integral_numbers() {
        assert_eq!(entity_id_from_bson(&Bson::Int32(7)), Some(7));
        assert_eq!(entity_id_from_bson(&Bson::Int64(10_000)), Some(10_000));
        assert_eq!(entity_id_from_bson(&Bson::Double(3.0)), Some(3));
        assert_eq!(entity_id_from_bson(&Bson::Double(3.5)), None);
        assert_eq!(entity_id_from_bson(&Bson::String("3".into())), None);
    }

    #[test]
    fn annotate_overwrites_id_and_type() {
        let entity = doc! { "id": 99, "type": "Wrong", "code": "sh010" }.annotated("Shot", 4);

        assert_eq!(entity.entity_id(), Some(4));
        assert_eq!(entity.entity_type(), Some("Shot"));
        assert_eq!(entity.get_str("code").unwrap(), "sh010");
    }

    #[test]
    fn record_converts_through_entity() {
        let entity = doc! { "code": "sh020" }.annotated("Shot", 12);
        let shot = Shot::from_entity(entity).unwrap();

        assert_eq!(shot, Shot { id: 12, code: "sh020".into() });
        assert_eq!(shot.to_entity().unwrap(), doc! { "id": 12_i64, "code": "sh020" });
    }

    #[test]
    fn to_entity_rejects_scalars() {
        assert!(matches!(to_entity(&5), Err(FakeStoreError::UnsupportedValue(_))));
    }
}
