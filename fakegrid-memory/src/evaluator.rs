//! Filter evaluation for in-memory entity search.
//!
//! This module narrows a candidate set of entity ids one filter triple at a
//! time. Each supported rule removes candidates; unsupported triples are
//! logged and skipped.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use bson::Bson;
use tracing::{debug, trace};

use fakegrid_core::{
    entity::{Entity, EntityId, entity_id_from_bson},
    query::{Filter, FilterVisitor},
};


/// Returns the integer a numeric value represents exactly, if any.
fn as_integer(value: &Bson) -> Option<i64> {
    match value {
        Bson::Int32(value) => Some(i64::from(*value)),
        Bson::Int64(value) => Some(*value),
        // 2^63 itself is out of range for i64
        Bson::Double(value)
            if value.fract() == 0.0 && *value >= i64::MIN as f64 && *value < i64::MAX as f64 =>
        {
            Some(*value as i64)
        }
        _ => None,
    }
}

/// Exact equality between a stored value and a filter operand.
///
/// Values of different numeric types match only when both hold the same
/// integer; everything else falls back to structural `Bson` equality.
pub(crate) fn values_match(actual: &Bson, expected: &Bson) -> bool {
    match (as_integer(actual), as_integer(expected)) {
        (Some(actual), Some(expected)) => actual == expected,
        _ => actual == expected,
    }
}


/// Narrows a set of candidate entities by successive filter triples.
///
/// Filters combine with AND semantics: each one only ever removes ids from
/// the working set.
pub(crate) struct FilterEvaluator<'a> {
    candidates: &'a BTreeMap<EntityId, &'a Entity>,
    working: BTreeSet<EntityId>,
}

impl<'a> FilterEvaluator<'a> {
    pub fn new(candidates: &'a BTreeMap<EntityId, &'a Entity>) -> Self {
        Self {
            candidates,
            working: candidates.keys().copied().collect(),
        }
    }

    /// Applies every filter in order and returns the surviving ids.
    pub fn filter_ids(mut self, filters: &[Filter]) -> BTreeSet<EntityId> {
        for filter in filters {
            self.visit_filter(filter);

            trace!(target: "fakegrid::filter", %filter, remaining = self.working.len(), "Filter applied");

            if self.working.is_empty() {
                break;
            }
        }

        self.working
    }

    fn retain(&mut self, predicate: impl Fn(&Entity) -> bool) {
        let candidates = self.candidates;

        self.working.retain(|id| {
            candidates
                .get(id)
                .is_some_and(|&entity| predicate(entity))
        });
    }
}

impl<'a> FilterVisitor for FilterEvaluator<'a> {
    type Output = ();

    fn visit_id_is(&mut self, value: &Bson) {
        match entity_id_from_bson(value) {
            Some(id) if self.working.contains(&id) => {
                self.working = BTreeSet::from([id]);
            }
            _ => self.working.clear(),
        }
    }

    fn visit_id_in(&mut self, values: &Bson) {
        let ids = match values {
            Bson::Array(values) => values
                .iter()
                .filter_map(entity_id_from_bson)
                .collect::<HashSet<_>>(),
            // A bare id counts as a one-element list
            single => entity_id_from_bson(single)
                .into_iter()
                .collect::<HashSet<_>>(),
        };

        self.working.retain(|id| ids.contains(id));
    }

    fn visit_text_contains(&mut self, field: &str, value: &Bson) {
        let Some(needle) = value.as_str() else {
            self.working.clear();
            return;
        };

        self.retain(|entity| {
            entity
                .get(field)
                .and_then(Bson::as_str)
                .is_some_and(|haystack| haystack.contains(needle))
        });
    }

    fn visit_text_is(&mut self, field: &str, value: &Bson) {
        self.retain(|entity| {
            entity
                .get(field)
                .is_some_and(|actual| values_match(actual, value))
        });
    }

    fn visit_ignored(&mut self, filter: &Filter) {
        debug!(target: "fakegrid::filter", %filter, "Unsupported filter ignored");
    }
}
