//! Shared fixtures for the fake store integration tests.

#![allow(dead_code)]

use std::collections::BTreeSet;

use fakegrid_core::{
    api::EntityApiBuilder,
    entity::{Entity, EntityExt, EntityId},
    fixture::Dataset,
};
use fakegrid_memory::FakeEntityStore;

pub const BASELINE: &str = r#"{
    "Shot": {
        "1": { "code": "sh010", "name": "Hero enters", "sg_status_list": "ip" },
        "2": { "code": "sh020", "name": "Hero leaves", "sg_status_list": "wtg" },
        "3": { "code": "sh030", "content": "crowd sim" }
    },
    "Asset": {
        "100": { "code": "hero_rig", "sg_asset_type": "Character" }
    },
    "Note": {
        "200": { "content": "Please fix the cloth sim", "subject": "sh010 notes" }
    }
}"#;

pub const SCHEMA: &str = r#"{
    "Shot": { "code": { "data_type": "text" }, "sg_status_list": { "data_type": "status_list" } },
    "Asset": { "code": { "data_type": "text" } }
}"#;

pub fn dataset() -> Dataset {
    Dataset::from_json_str(BASELINE).expect("baseline fixture parses")
}

pub fn store() -> FakeEntityStore {
    FakeEntityStore::builder()
        .baseline(dataset())
        .schema_json(SCHEMA)
        .build()
        .expect("store builds")
}

pub fn ids(entities: &[Entity]) -> BTreeSet<EntityId> {
    entities
        .iter()
        .filter_map(|entity| entity.entity_id())
        .collect()
}
