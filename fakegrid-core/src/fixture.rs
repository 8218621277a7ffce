//! Seed data and schema fixtures consumed at store construction.
//!
//! A [`Dataset`] maps entity types to tables of records keyed by id. It can be
//! assembled in code or loaded from JSON shaped like:
//!
//! ```json
//! {
//!     "Shot": {
//!         "1": { "code": "sh010", "sg_status_list": "ip" },
//!         "2": { "code": "sh020" }
//!     }
//! }
//! ```
//!
//! A [`SchemaFixture`] is an opaque JSON payload returned verbatim by the
//! schema accessor.

use std::collections::{BTreeMap, HashMap};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    entity::{Entity, EntityId},
    error::{FakeStoreError, FakeStoreResult},
};

/// Records of a single entity type, keyed by id.
pub type EntityTable = BTreeMap<EntityId, Entity>;

/// A mapping from entity type to its records.
///
/// Used both as the seed fixture handed to a store and as the store's
/// internal baseline and overlay layers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    tables: HashMap<String, EntityTable>,
}

impl Dataset {
    /// Creates an empty dataset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a record and returns the dataset, for fluent fixture construction.
    pub fn with_entity(mut self, entity_type: impl Into<String>, id: EntityId, entity: Entity) -> Self {
        self.insert(entity_type, id, entity);
        self
    }

    /// Inserts a record, returning the previous record stored under the same id.
    pub fn insert(&mut self, entity_type: impl Into<String>, id: EntityId, entity: Entity) -> Option<Entity> {
        self.tables
            .entry(entity_type.into())
            .or_default()
            .insert(id, entity)
    }

    /// Returns the table for an entity type.
    pub fn table(&self, entity_type: &str) -> Option<&EntityTable> {
        self.tables.get(entity_type)
    }

    /// Returns a record by type and id.
    pub fn get(&self, entity_type: &str, id: EntityId) -> Option<&Entity> {
        self.tables.get(entity_type)?.get(&id)
    }

    /// Returns a mutable record by type and id.
    pub fn get_mut(&mut self, entity_type: &str, id: EntityId) -> Option<&mut Entity> {
        self.tables.get_mut(entity_type)?.get_mut(&id)
    }

    /// Removes a record by type and id.
    pub fn remove(&mut self, entity_type: &str, id: EntityId) -> Option<Entity> {
        self.tables.get_mut(entity_type)?.remove(&id)
    }

    /// Returns `true` if a record exists under the given type and id.
    pub fn contains(&self, entity_type: &str, id: EntityId) -> bool {
        self.get(entity_type, id).is_some()
    }

    /// Returns `true` if the entity type has a table, even an empty one.
    pub fn contains_type(&self, entity_type: &str) -> bool {
        self.tables.contains_key(entity_type)
    }

    /// Returns the entity types present, in no particular order.
    pub fn entity_types(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    /// Returns the total number of records across all types.
    pub fn len(&self) -> usize {
        self.tables.values().map(BTreeMap::len).sum()
    }

    /// Returns `true` if the dataset holds no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Parses a dataset from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`FakeStoreError::Serialization`] for malformed JSON and
    /// [`FakeStoreError::InvalidFixture`] when the JSON is not shaped as
    /// `{type: {id: {field: value}}}`.
    pub fn from_json_str(json: &str) -> FakeStoreResult<Self> {
        Self::from_json_value(serde_json::from_str(json)?)
    }

    /// Builds a dataset from a parsed JSON value.
    ///
    /// # Errors
    ///
    /// See [`Dataset::from_json_str`].
    pub fn from_json_value(value: Value) -> FakeStoreResult<Self> {
        let Value::Object(types) = value else {
            return Err(FakeStoreError::InvalidFixture(
                "dataset must be a JSON object keyed by entity type".to_string(),
            ));
        };

        let mut dataset = Dataset::new();

        for (entity_type, records) in types {
            let Value::Object(records) = records else {
                return Err(FakeStoreError::InvalidFixture(format!(
                    "records for {entity_type} must be a JSON object keyed by id"
                )));
            };

            // Keep empty tables so the type still counts as known
            let table = dataset.tables.entry(entity_type.clone()).or_default();

            for (key, record) in records {
                let id = key.parse::<EntityId>().map_err(|_| {
                    FakeStoreError::InvalidFixture(format!("{entity_type} id {key:?} is not an integer"))
                })?;

                if !record.is_object() {
                    return Err(FakeStoreError::InvalidFixture(format!(
                        "{entity_type} {id} must be a JSON object"
                    )));
                }

                table.insert(id, serde_json::from_value::<Entity>(record)?);
            }
        }

        Ok(dataset)
    }
}

/// Opaque description of entity types and their fields.
///
/// The fake never interprets the payload; it only hands it back from the
/// schema accessor. The readers below assume the conventional
/// `{type: {field: {...}}}` layout and return nothing for other shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaFixture(Value);

impl SchemaFixture {
    /// Wraps a JSON payload.
    pub fn new(value: Value) -> Self {
        SchemaFixture(value)
    }

    /// Parses a schema fixture from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`FakeStoreError::Serialization`] for malformed JSON.
    pub fn from_json_str(json: &str) -> FakeStoreResult<Self> {
        Ok(SchemaFixture(serde_json::from_str(json)?))
    }

    /// Returns the raw payload.
    pub fn as_json(&self) -> &Value {
        &self.0
    }

    /// Consumes the fixture and returns the raw payload.
    pub fn into_json(self) -> Value {
        self.0
    }

    /// Returns the top-level entity type names.
    pub fn entity_types(&self) -> Vec<&str> {
        self.0
            .as_object()
            .map(|types| types.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Returns the field names described for an entity type.
    pub fn field_names(&self, entity_type: &str) -> Vec<&str> {
        self.0
            .get(entity_type)
            .and_then(Value::as_object)
            .map(|fields| fields.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }
}

impl Default for SchemaFixture {
    fn default() -> Self {
        SchemaFixture(Value::Object(Map::new()))
    }
}

impl From<Value> for SchemaFixture {
    fn from(value: Value) -> Self {
        SchemaFixture(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::{Bson, doc};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn dataset_loads_from_json() {
        let dataset = Dataset::from_json_str(
            r#"{
                "Shot": {
                    "1": { "code": "sh010", "cut_in": 1001 },
                    "2": { "code": "sh020" }
                },
                "Asset": {}
            }"#,
        )
        .unwrap();

        assert_eq!(dataset.len(), 2);
        assert!(dataset.contains_type("Asset"));
        assert_eq!(dataset.get("Shot", 2), Some(&doc! { "code": "sh020" }));

        let cut_in = dataset.get("Shot", 1).and_then(|shot| shot.get("cut_in")).cloned();
        assert!(matches!(cut_in, Some(Bson::Int32(1001)) | Some(Bson::Int64(1001))));
    }

    #[test]
    fn dataset_rejects_malformed_shapes() {
        let bad_id = Dataset::from_json_value(json!({ "Shot": { "one": {} } }));
        assert!(matches!(bad_id, Err(FakeStoreError::InvalidFixture(_))));

        let bad_record = Dataset::from_json_value(json!({ "Shot": { "1": "sh010" } }));
        assert!(matches!(bad_record, Err(FakeStoreError::InvalidFixture(_))));

        let bad_root = Dataset::from_json_value(json!([1, 2]));
        assert!(matches!(bad_root, Err(FakeStoreError::InvalidFixture(_))));

        let bad_json = Dataset::from_json_str("{");
        assert!(matches!(bad_json, Err(FakeStoreError::Serialization(_))));
    }

    #[test]
    fn dataset_insert_and_remove() {
        let mut dataset = Dataset::new().with_entity("Shot", 1, doc! { "code": "sh010" });

        assert_eq!(dataset.insert("Shot", 1, doc! { "code": "sh011" }), Some(doc! { "code": "sh010" }));
        assert_eq!(dataset.remove("Shot", 1), Some(doc! { "code": "sh011" }));
        assert_eq!(dataset.remove("Shot", 1), None);
        assert_eq!(dataset.remove("Nope", 1), None);
        assert!(dataset.is_empty());
    }

    #[test]
    fn schema_readers_follow_conventional_layout() {
        let schema = SchemaFixture::new(json!({
            "Shot": { "code": { "data_type": "text" }, "sg_status_list": {} }
        }));

        assert_eq!(schema.entity_types(), vec!["Shot"]);

        let mut fields = schema.field_names("Shot");
        fields.sort_unstable();
        assert_eq!(fields, vec!["code", "sg_status_list"]);
        assert!(schema.field_names("Asset").is_empty());

        assert_eq!(SchemaFixture::new(json!("opaque")).entity_types(), Vec::<&str>::new());
        assert_eq!(SchemaFixture::default().as_json(), &json!({}));
    }
}
