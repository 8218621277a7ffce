//! Integration tests for typed record access over the fake store.

mod common;

use bson::doc;
use pretty_assertions::assert_eq;
use serde::{Deserialize, Serialize};

use fakegrid_core::{
    api::{CallKind, EntityApi},
    entity::{EntityExt, Record},
    error::FakeStoreError,
    query::{Fields, Filter},
    typed::EntityApiExt,
};

use common::store;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Shot {
    #[serde(default)]
    id: i64,
    code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sg_status_list: Option<String>,
}

impl Record for Shot {
    fn entity_type() -> &'static str {
        "Shot"
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Asset {
    #[serde(default)]
    id: i64,
    code: String,
    sg_asset_type: String,
}

impl Record for Asset {
    fn entity_type() -> &'static str {
        "Asset"
    }
}

#[derive(Serialize)]
struct StatusChange<'a> {
    sg_status_list: &'a str,
}

#[test]
fn typed_get_reads_seed_records() {
    let mut store = store();
    let shots = store.records::<Shot>();

    assert_eq!(shots.entity_type(), "Shot");
    assert_eq!(
        shots.get(1).unwrap(),
        Some(Shot { id: 1, code: "sh010".into(), sg_status_list: Some("ip".into()) })
    );
    assert_eq!(shots.get(999).unwrap(), None);
}

#[test]
fn typed_create_assigns_id_and_ignores_caller_id() {
    let mut store = store();
    let created = store
        .records::<Shot>()
        .create(&Shot { id: 5, code: "sh090".into(), sg_status_list: None })
        .unwrap();

    assert_eq!(created.id, 10_000);

    let raw = store
        .find_one("Shot", &[Filter::is("id", created.id)], Fields::All)
        .unwrap();
    assert_eq!(raw.get_str("code").unwrap(), "sh090");
    assert_eq!(raw.entity_id(), Some(10_000));
    assert_eq!(store.overlay().get("Shot", 10_000), Some(&doc! { "code": "sh090" }));
}

#[test]
fn typed_update_merges_partial_payload() {
    let mut store = store();
    let mut shots = store.records::<Shot>();

    let updated = shots.update(2, &StatusChange { sg_status_list: "fin" }).unwrap().unwrap();
    assert_eq!(updated.code, "sh020");
    assert_eq!(updated.sg_status_list.as_deref(), Some("fin"));

    assert_eq!(shots.update(999, &StatusChange { sg_status_list: "fin" }).unwrap(), None);
}

#[test]
fn typed_update_rejects_non_document_payloads() {
    let mut store = store();
    let result = store.records::<Shot>().update(1, &"fin");

    assert!(matches!(result, Err(FakeStoreError::UnsupportedValue(_))));
    assert_eq!(store.call_count(CallKind::Update), 0);
}

#[test]
fn typed_find_and_delete() {
    let mut store = store();
    let mut shots = store.records::<Shot>();

    let heroes = shots.find(&[Filter::contains("name", "Hero")]).unwrap();
    let mut codes = heroes.iter().map(|shot| shot.code.as_str()).collect::<Vec<_>>();
    codes.sort_unstable();
    assert_eq!(codes, vec!["sh010", "sh020"]);

    assert!(shots.delete(1));
    assert!(!shots.delete(1));
}

#[test]
fn typed_view_switches_record_type() {
    let mut store = store();
    let assets = store.records::<Shot>().with_type::<Asset>();

    assert_eq!(
        assets.get(100).unwrap(),
        Some(Asset { id: 100, code: "hero_rig".into(), sg_asset_type: "Character".into() })
    );
}

#[test]
fn typed_read_reports_shape_mismatch() {
    let mut store = store();
    assert!(store.records::<Asset>().find(&[]).is_ok());

    // Missing the required sg_asset_type
    store.create("Asset", doc! { "code": "prop" });
    let result = store.records::<Asset>().find(&[]);
    assert!(matches!(result, Err(FakeStoreError::Serialization(_))));
}
