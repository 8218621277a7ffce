//! In-memory implementation of the entity API.
//!
//! This module provides [`FakeEntityStore`], which layers entities created
//! during a test on top of a seed dataset, and its builder.

use std::collections::BTreeMap;
use tracing::{debug, warn};

use fakegrid_core::{
    api::{Call, CallKind, EntityApi, EntityApiBuilder},
    entity::{Entity, EntityId},
    error::FakeStoreResult,
    fixture::{Dataset, SchemaFixture},
    query::{Fields, Filter, id_lookup},
};

use crate::{evaluator::FilterEvaluator, journal::CallJournal};

/// First id handed out by `create`, kept well above typical fixture ids.
pub const DEFAULT_FIRST_ID: EntityId = 10_000;

/// Which layer of the store holds a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layer {
    Baseline,
    Overlay,
}


/// In-memory fake of the entity-tracking service.
///
/// The store keeps two layers per entity type:
///
/// - the **baseline**, an owned copy of the seed dataset, and
/// - the **overlay**, holding every entity created through [`EntityApi::create`].
///
/// Lookups, updates and deletes consult the baseline first and fall back to
/// the overlay; `find` applies the same precedence when an id exists in both.
/// Created ids come from a counter starting at [`DEFAULT_FIRST_ID`] that never
/// goes backwards.
///
/// # Id Exhaustion
///
/// The counter stops at `EntityId::MAX`. Once that id has been handed out,
/// every further `create` is assigned `EntityId::MAX` again and replaces the
/// previous overlay record with that id.
///
/// # Isolation
///
/// The baseline is copied at construction, so updates and deletes against it
/// never leak into other stores built from the same [`Dataset`].
///
/// # Thread Safety
///
/// The store is single-threaded: it is `Send` but not `Sync`, since reads
/// record themselves into an internal [`CallJournal`].
///
/// # Example
///
/// ```ignore
/// use fakegrid_memory::FakeEntityStore;
/// use fakegrid_core::{api::EntityApi, query::{Fields, Filter}};
/// use bson::doc;
///
/// let mut store = FakeEntityStore::new();
/// let shot = store.create("Shot", doc! { "code": "sh010" });
///
/// let found = store.find("Shot", &[Filter::is("code", "sh010")], Fields::All);
/// assert_eq!(found.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct FakeEntityStore {
    /// Owned copy of the seed dataset; mutated by update and delete
    baseline: Dataset,
    /// Entities created during this store's lifetime
    overlay: Dataset,
    /// Returned verbatim by `schema_read`
    schema: SchemaFixture,
    /// Next id handed out by `create`
    next_id: EntityId,
    journal: CallJournal,
}

impl FakeEntityStore {
    /// Creates a store with no seed data and an empty schema.
    pub fn new() -> Self {
        Self::from_parts(Dataset::new(), SchemaFixture::default(), DEFAULT_FIRST_ID)
    }

    /// Creates a store seeded with a deep copy of `baseline`.
    pub fn with_baseline(baseline: &Dataset) -> Self {
        Self::from_parts(baseline.clone(), SchemaFixture::default(), DEFAULT_FIRST_ID)
    }

    /// Creates a builder for configuring seed data, schema and the id counter.
    pub fn builder() -> FakeEntityStoreBuilder {
        FakeEntityStoreBuilder::default()
    }

    fn from_parts(baseline: Dataset, schema: SchemaFixture, first_id: EntityId) -> Self {
        Self {
            baseline,
            overlay: Dataset::new(),
            schema,
            next_id: first_id,
            journal: CallJournal::new(),
        }
    }

    /// Returns the baseline layer in its current, possibly mutated, state.
    pub fn baseline(&self) -> &Dataset {
        &self.baseline
    }

    /// Returns the entities created so far.
    pub fn overlay(&self) -> &Dataset {
        &self.overlay
    }

    /// Returns the id the next `create` will assign.
    pub fn next_id(&self) -> EntityId {
        self.next_id
    }

    /// Returns every call served so far, oldest first.
    pub fn calls(&self) -> Vec<Call> {
        self.journal.calls()
    }

    /// Returns the calls of one kind, oldest first.
    pub fn calls_of(&self, kind: CallKind) -> Vec<Call> {
        self.journal.calls_of(kind)
    }

    /// Returns how many calls of one kind were served.
    pub fn call_count(&self, kind: CallKind) -> usize {
        self.journal.count(kind)
    }

    /// Returns the most recent call.
    pub fn last_call(&self) -> Option<Call> {
        self.journal.last()
    }

    /// Forgets every recorded call. Stored entities are untouched.
    pub fn clear_calls(&self) {
        self.journal.clear();
    }

    fn locate(&self, entity_type: &str, id: EntityId) -> Option<(Layer, &Entity)> {
        if let Some(entity) = self.baseline.get(entity_type, id) {
            return Some((Layer::Baseline, entity));
        }

        self.overlay
            .get(entity_type, id)
            .map(|entity| (Layer::Overlay, entity))
    }

    fn locate_mut(&mut self, entity_type: &str, id: EntityId) -> Option<(Layer, &mut Entity)> {
        if let Some(entity) = self.baseline.get_mut(entity_type, id) {
            return Some((Layer::Baseline, entity));
        }

        self.overlay
            .get_mut(entity_type, id)
            .map(|entity| (Layer::Overlay, entity))
    }
}

impl Default for FakeEntityStore {
    fn default() -> Self {
        Self::new()
    }
}


impl EntityApi for FakeEntityStore {
    fn find_one(&self, entity_type: &str, filters: &[Filter], fields: Fields) -> Option<Entity> {
        self.journal.record(Call::FindOne {
            entity_type: entity_type.to_string(),
            filters: filters.to_vec(),
            fields: fields.clone(),
        });

        let Some(id) = id_lookup(filters) else {
            debug!(target: "fakegrid::store", entity_type, "find_one without an id filter");
            return None;
        };

        let (layer, entity) = self.locate(entity_type, id)?;
        debug!(target: "fakegrid::store", entity_type, id, ?layer, "Entity found");

        Some(fields.project(entity.clone(), entity_type, id))
    }

    fn find(&self, entity_type: &str, filters: &[Filter], fields: Fields) -> Vec<Entity> {
        self.journal.record(Call::Find {
            entity_type: entity_type.to_string(),
            filters: filters.to_vec(),
            fields: fields.clone(),
        });

        let baseline = self.baseline.table(entity_type);
        let overlay = self.overlay.table(entity_type);

        if baseline.is_none() && overlay.is_none() {
            return vec![];
        }

        // Overlay first so baseline records replace it on id clash
        let candidates = [overlay, baseline]
            .into_iter()
            .flatten()
            .flat_map(|table| table.iter().map(|(id, entity)| (*id, entity)))
            .collect::<BTreeMap<_, _>>();

        let matches = FilterEvaluator::new(&candidates).filter_ids(filters);
        debug!(
            target: "fakegrid::store",
            entity_type,
            candidates = candidates.len(),
            matches = matches.len(),
            "Entities searched"
        );

        matches
            .into_iter()
            .filter_map(|id| {
                candidates
                    .get(&id)
                    .map(|&entity| fields.project(entity.clone(), entity_type, id))
            })
            .collect()
    }

    fn create(&mut self, entity_type: &str, data: Entity) -> Entity {
        self.journal.record(Call::Create {
            entity_type: entity_type.to_string(),
            data: data.clone(),
        });

        let id = self.next_id;
        match id.checked_add(1) {
            Some(next) => self.next_id = next,
            None => warn!(target: "fakegrid::store", entity_type, id, "Id counter exhausted"),
        }

        self.overlay.insert(entity_type, id, data.clone());
        debug!(target: "fakegrid::store", entity_type, id, "Entity created");

        Fields::All.project(data, entity_type, id)
    }

    fn update(&mut self, entity_type: &str, entity_id: EntityId, data: Entity) -> Option<Entity> {
        self.journal.record(Call::Update {
            entity_type: entity_type.to_string(),
            entity_id,
            data: data.clone(),
        });

        let Some((layer, record)) = self.locate_mut(entity_type, entity_id) else {
            debug!(target: "fakegrid::store", entity_type, id = entity_id, "Update target not found");
            return None;
        };

        for (field, value) in data {
            record.insert(field, value);
        }

        debug!(target: "fakegrid::store", entity_type, id = entity_id, ?layer, "Entity updated");

        Some(Fields::All.project(record.clone(), entity_type, entity_id))
    }

    fn delete(&mut self, entity_type: &str, entity_id: EntityId) -> bool {
        self.journal.record(Call::Delete {
            entity_type: entity_type.to_string(),
            entity_id,
        });

        let layer = if self.baseline.remove(entity_type, entity_id).is_some() {
            Layer::Baseline
        } else if self.overlay.remove(entity_type, entity_id).is_some() {
            Layer::Overlay
        } else {
            debug!(target: "fakegrid::store", entity_type, id = entity_id, "Delete target not found");
            return false;
        };

        debug!(target: "fakegrid::store", entity_type, id = entity_id, ?layer, "Entity deleted");
        true
    }

    fn schema_read(&self) -> SchemaFixture {
        self.journal.record(Call::SchemaRead);
        self.schema.clone()
    }
}


/// Where a fixture comes from; JSON is parsed when the store is built.
#[derive(Debug)]
enum FixtureSource<T> {
    Value(T),
    Json(String),
}

/// Builder for constructing [`FakeEntityStore`] instances.
///
/// JSON fixtures are parsed in [`EntityApiBuilder::build`], so a malformed
/// fixture surfaces as an error there rather than at the setter.
///
/// # Example
///
/// ```ignore
/// use fakegrid_memory::FakeEntityStore;
/// use fakegrid_core::api::EntityApiBuilder;
///
/// let store = FakeEntityStore::builder()
///     .baseline_json(r#"{ "Shot": { "1": { "code": "sh010" } } }"#)
///     .schema_json(r#"{ "Shot": { "code": {} } }"#)
///     .first_id(500)
///     .build()?;
/// ```
#[derive(Debug, Default)]
pub struct FakeEntityStoreBuilder {
    baseline: Option<FixtureSource<Dataset>>,
    schema: Option<FixtureSource<SchemaFixture>>,
    first_id: Option<EntityId>,
}

impl FakeEntityStoreBuilder {
    /// Seeds the store with `dataset`.
    pub fn baseline(mut self, dataset: Dataset) -> Self {
        self.baseline = Some(FixtureSource::Value(dataset));
        self
    }

    /// Seeds the store from a JSON dataset, parsed at build time.
    pub fn baseline_json(mut self, json: impl Into<String>) -> Self {
        self.baseline = Some(FixtureSource::Json(json.into()));
        self
    }

    /// Sets the schema fixture.
    pub fn schema(mut self, schema: SchemaFixture) -> Self {
        self.schema = Some(FixtureSource::Value(schema));
        self
    }

    /// Sets the schema fixture from JSON, parsed at build time.
    pub fn schema_json(mut self, json: impl Into<String>) -> Self {
        self.schema = Some(FixtureSource::Json(json.into()));
        self
    }

    /// Sets the first id assigned by `create`. Defaults to [`DEFAULT_FIRST_ID`].
    pub fn first_id(mut self, first_id: EntityId) -> Self {
        self.first_id = Some(first_id);
        self
    }
}

impl EntityApiBuilder for FakeEntityStoreBuilder {
    type Api = FakeEntityStore;

    fn build(self) -> FakeStoreResult<Self::Api> {
        let baseline = match self.baseline {
            Some(FixtureSource::Value(dataset)) => dataset,
            Some(FixtureSource::Json(json)) => Dataset::from_json_str(&json)?,
            None => Dataset::new(),
        };

        let schema = match self.schema {
            Some(FixtureSource::Value(schema)) => schema,
            Some(FixtureSource::Json(json)) => SchemaFixture::from_json_str(&json)?,
            None => SchemaFixture::default(),
        };

        let first_id = self.first_id.unwrap_or(DEFAULT_FIRST_ID);
        debug!(target: "fakegrid::store", records = baseline.len(), first_id, "Fake store built");

        Ok(FakeEntityStore::from_parts(baseline, schema, first_id))
    }
}
