//! Property tests for id allocation and filtering.

mod common;

use std::collections::BTreeSet;

use bson::doc;
use proptest::prelude::*;

use fakegrid_core::{
    api::EntityApi,
    entity::{EntityExt, EntityId},
    query::{Fields, Filter},
};
use fakegrid_memory::FakeEntityStore;

use common::{ids, store};

proptest! {
    #[test]
    fn created_ids_strictly_increase(types in prop::collection::vec("[A-Z][a-z]{1,6}", 1..40)) {
        let mut store = FakeEntityStore::new();
        let created = types
            .iter()
            .map(|entity_type| store.create(entity_type, doc! {}).entity_id().unwrap())
            .collect::<Vec<_>>();

        for pair in created.windows(2) {
            prop_assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn id_in_returns_the_intersection(requested in prop::collection::btree_set(0i64..10, 0..10)) {
        let store = store();
        let found = ids(&store.find("Shot", &[Filter::is_in("id", requested.iter().copied())], Fields::All));

        let seeded = BTreeSet::from([1, 2, 3]);
        let expected = seeded.intersection(&requested).copied().collect::<BTreeSet<EntityId>>();
        prop_assert_eq!(found, expected);
    }

    #[test]
    fn projection_only_keeps_requested_fields(fields in prop::collection::vec(prop::sample::select(vec!["code", "name", "content", "sg_status_list", "missing"]), 1..5)) {
        let store = store();

        for shot in store.find("Shot", &[], Fields::from(fields.clone())) {
            prop_assert!(shot.entity_id().is_some());
            prop_assert_eq!(shot.entity_type(), Some("Shot"));

            for key in shot.keys() {
                prop_assert!(key == "id" || key == "type" || fields.contains(&key.as_str()));
            }
        }
    }
}
