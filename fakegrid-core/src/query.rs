//! Filter triples, field selection and the supported operator table.
//!
//! Queries against the entity API are lists of `(field, operator, value)`
//! triples combined with AND semantics. The fake only interprets a small,
//! explicit subset of the real service's operators; every other pairing is
//! classified as [`FilterRule::Ignored`] and leaves the result set untouched.
//!
//! # Building filters
//!
//! ```ignore
//! use fakegrid::query::{Filter, Fields};
//!
//! let filters = vec![
//!     Filter::is("code", "sh010"),
//!     Filter::is_in("id", vec![1, 2, 3]),
//!     ("name", "contains", "hero").into(),
//! ];
//!
//! let shots = store.find("Shot", &filters, Fields::from("code"));
//! ```
//!
//! # Supported operators
//!
//! | field                      | operator   | rule                         |
//! |----------------------------|------------|------------------------------|
//! | `id`                       | `is`       | [`FilterRule::IdIs`]         |
//! | `id`                       | `in`       | [`FilterRule::IdIn`]         |
//! | `code`, `name`, `content`  | `contains` | [`FilterRule::TextContains`] |
//! | `code`, `name`, `content`  | `is`       | [`FilterRule::TextIs`]       |
//! | anything else              | any        | [`FilterRule::Ignored`]      |

use std::{convert::Infallible, fmt, str::FromStr};
use bson::Bson;

use crate::entity::{Entity, EntityExt, EntityId, ID_FIELD};

/// Fields that support the string operators.
pub const TEXT_FIELDS: [&str; 3] = ["code", "name", "content"];

/// Filter operators from the real service's query vocabulary.
///
/// Parsing never fails: unknown operator names are kept verbatim in
/// [`FilterOp::Other`] so that they can be reported and ignored.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FilterOp {
    /// Exact match.
    Is,
    /// Negated exact match.
    IsNot,
    /// Value is one of a list.
    In,
    /// Value is none of a list.
    NotIn,
    /// String contains a substring.
    Contains,
    /// String does not contain a substring.
    NotContains,
    /// String starts with a prefix.
    StartsWith,
    /// String ends with a suffix.
    EndsWith,
    /// Less than.
    LessThan,
    /// Greater than.
    GreaterThan,
    /// Any operator name not listed above.
    Other(String),
}

impl FilterOp {
    /// Returns the wire name of this operator.
    pub fn as_str(&self) -> &str {
        match self {
            FilterOp::Is => "is",
            FilterOp::IsNot => "is_not",
            FilterOp::In => "in",
            FilterOp::NotIn => "not_in",
            FilterOp::Contains => "contains",
            FilterOp::NotContains => "not_contains",
            FilterOp::StartsWith => "starts_with",
            FilterOp::EndsWith => "ends_with",
            FilterOp::LessThan => "less_than",
            FilterOp::GreaterThan => "greater_than",
            FilterOp::Other(name) => name,
        }
    }
}

impl FromStr for FilterOp {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "is" => FilterOp::Is,
            "is_not" => FilterOp::IsNot,
            "in" => FilterOp::In,
            "not_in" => FilterOp::NotIn,
            "contains" => FilterOp::Contains,
            "not_contains" => FilterOp::NotContains,
            "starts_with" => FilterOp::StartsWith,
            "ends_with" => FilterOp::EndsWith,
            "less_than" => FilterOp::LessThan,
            "greater_than" => FilterOp::GreaterThan,
            other => FilterOp::Other(other.to_string()),
        })
    }
}

impl From<&str> for FilterOp {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(op) => op,
            Err(never) => match never {},
        }
    }
}

impl fmt::Display for FilterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which column family a filtered field belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldClass {
    /// The synthesized `id` field.
    Id,
    /// One of [`TEXT_FIELDS`].
    Text,
    /// Any other field.
    Other,
}

impl FieldClass {
    /// Classifies a field name.
    pub fn of(field: &str) -> Self {
        if field == ID_FIELD {
            FieldClass::Id
        } else if TEXT_FIELDS.contains(&field) {
            FieldClass::Text
        } else {
            FieldClass::Other
        }
    }
}

/// The interpreted meaning of a filter triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterRule {
    /// Keep only the candidate with the given id.
    IdIs,
    /// Keep candidates whose id is in the given list.
    IdIn,
    /// Keep candidates whose text field contains the given substring.
    TextContains,
    /// Keep candidates whose text field equals the given value.
    TextIs,
    /// Unsupported pairing; the filter has no effect.
    Ignored,
}

/// A single `(field, operator, value)` predicate.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    /// The field name to test.
    pub field: String,
    /// The operator to apply.
    pub op: FilterOp,
    /// The operand.
    pub value: Bson,
}

impl Filter {
    /// Creates a filter triple.
    pub fn new(field: impl Into<String>, op: impl Into<FilterOp>, value: impl Into<Bson>) -> Self {
        Filter {
            field: field.into(),
            op: op.into(),
            value: value.into(),
        }
    }

    /// Creates an `is` filter.
    pub fn is(field: impl Into<String>, value: impl Into<Bson>) -> Self {
        Filter::new(field, FilterOp::Is, value)
    }

    /// Creates an `in` filter over a list of values.
    pub fn is_in<V: Into<Bson>>(field: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self {
        Filter::new(
            field,
            FilterOp::In,
            Bson::Array(values.into_iter().map(Into::into).collect()),
        )
    }

    /// Creates a `contains` filter.
    pub fn contains(field: impl Into<String>, value: impl Into<Bson>) -> Self {
        Filter::new(field, FilterOp::Contains, value)
    }

    /// Classifies this triple against the supported operator table.
    pub fn rule(&self) -> FilterRule {
        match (FieldClass::of(&self.field), &self.op) {
            (FieldClass::Id, FilterOp::Is) => FilterRule::IdIs,
            (FieldClass::Id, FilterOp::In) => FilterRule::IdIn,
            (FieldClass::Text, FilterOp::Contains) => FilterRule::TextContains,
            (FieldClass::Text, FilterOp::Is) => FilterRule::TextIs,
            _ => FilterRule::Ignored,
        }
    }
}

impl<F, O, V> From<(F, O, V)> for Filter
where
    F: Into<String>,
    O: Into<FilterOp>,
    V: Into<Bson>,
{
    fn from((field, op, value): (F, O, V)) -> Self {
        Filter::new(field, op, value)
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.field, self.op, self.value)
    }
}

/// Returns the id targeted by the first `("id", "is", <int>)` triple, if any.
///
/// Only the first such triple is considered; a non-integer operand counts as absent.
pub fn id_lookup(filters: &[Filter]) -> Option<EntityId> {
    filters
        .iter()
        .find(|filter| filter.rule() == FilterRule::IdIs)
        .and_then(|filter| crate::entity::entity_id_from_bson(&filter.value))
}

/// Visitor over classified filter triples.
///
/// Backends implement the per-rule methods; [`FilterVisitor::visit_filter`]
/// performs the dispatch.
pub trait FilterVisitor {
    type Output;

    fn visit_id_is(&mut self, value: &Bson) -> Self::Output;
    fn visit_id_in(&mut self, values: &Bson) -> Self::Output;
    fn visit_text_contains(&mut self, field: &str, value: &Bson) -> Self::Output;
    fn visit_text_is(&mut self, field: &str, value: &Bson) -> Self::Output;
    fn visit_ignored(&mut self, filter: &Filter) -> Self::Output;

    fn visit_filter(&mut self, filter: &Filter) -> Self::Output {
        match filter.rule() {
            FilterRule::IdIs => self.visit_id_is(&filter.value),
            FilterRule::IdIn => self.visit_id_in(&filter.value),
            FilterRule::TextContains => self.visit_text_contains(&filter.field, &filter.value),
            FilterRule::TextIs => self.visit_text_is(&filter.field, &filter.value),
            FilterRule::Ignored => self.visit_ignored(filter),
        }
    }
}

/// Field selection for read operations.
///
/// A single field name is normalized to a one-element list. An empty list
/// selects everything, same as [`Fields::All`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Fields {
    /// Return every stored field.
    #[default]
    All,
    /// Return only the listed fields (plus `id` and `type`).
    Only(Vec<String>),
}

impl Fields {
    /// Creates a selection from a list of field names.
    pub fn only<S: Into<String>>(fields: impl IntoIterator<Item = S>) -> Self {
        Fields::Only(fields.into_iter().map(Into::into).collect())
    }

    /// Returns `true` if this selection keeps every field.
    pub fn is_all(&self) -> bool {
        match self {
            Fields::All => true,
            Fields::Only(fields) => fields.is_empty(),
        }
    }

    /// Shapes a stored record for output.
    ///
    /// Keeps the selected fields that exist on the record, silently skipping
    /// the ones that don't, then stamps `id` and `type`.
    pub fn project(&self, entity: Entity, entity_type: &str, id: EntityId) -> Entity {
        let projected = match self {
            Fields::Only(fields) if !fields.is_empty() => fields
                .iter()
                .filter_map(|field| entity.get(field).map(|value| (field.clone(), value.clone())))
                .collect::<Entity>(),
            _ => entity,
        };

        projected.annotated(entity_type, id)
    }
}

impl From<&str> for Fields {
    fn from(field: &str) -> Self {
        Fields::Only(vec![field.to_string()])
    }
}

impl From<String> for Fields {
    fn from(field: String) -> Self {
        Fields::Only(vec![field])
    }
}

impl From<Vec<&str>> for Fields {
    fn from(fields: Vec<&str>) -> Self {
        Fields::only(fields)
    }
}

impl From<Vec<String>> for Fields {
    fn from(fields: Vec<String>) -> Self {
        Fields::Only(fields)
    }
}

impl From<&[&str]> for Fields {
    fn from(fields: &[&str]) -> Self {
        Fields::only(fields.iter().copied())
    }
}

impl<const N: usize> From<[&str; N]> for Fields {
    fn from(fields: [&str; N]) -> Self {
        Fields::only(fields)
    }
}

impl<T: Into<Fields>> From<Option<T>> for Fields {
    fn from(fields: Option<T>) -> Self {
        fields.map(Into::into).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;
    use pretty_assertions::assert_eq;

    #[test]
    fn operator_names_round_trip_through_parsing() {
        for name in ["is", "is_not", "in", "not_in", "contains", "not_contains", "starts_with", "ends_with", "less_than", "greater_than"] {
            assert_eq!(FilterOp::from(name).as_str(), name);
        }

        assert_eq!(FilterOp::from("between"), FilterOp::Other("between".into()));
    }

    #[test]
    fn rules_follow_the_operator_table() {
        assert_eq!(Filter::is("id", 1).rule(), FilterRule::IdIs);
        assert_eq!(Filter::is_in("id", [1, 2]).rule(), FilterRule::IdIn);
        assert_eq!(Filter::contains("name", "x").rule(), FilterRule::TextContains);
        assert_eq!(Filter::is("content", "x").rule(), FilterRule::TextIs);

        assert_eq!(Filter::contains("id", 1).rule(), FilterRule::Ignored);
        assert_eq!(Filter::is("sg_status", "ip").rule(), FilterRule::Ignored);
        assert_eq!(Filter::new("code", "starts_with", "sh").rule(), FilterRule::Ignored);
    }

    #[test]
    fn tuple_literals_convert_into_filters() {
        let filter: Filter = ("code", "is", "sh010").into();

        assert_eq!(filter, Filter::is("code", "sh010"));
        assert_eq!(filter.op.to_string(), "is");
    }

    #[test]
    fn id_lookup_uses_first_id_is_triple() {
        let filters = vec![
            Filter::is("code", "sh010"),
            Filter::is("id", 4),
            Filter::is("id", 5),
        ];

        assert_eq!(id_lookup(&filters), Some(4));
        assert_eq!(id_lookup(&[Filter::is("code", "sh010")]), None);
        assert_eq!(id_lookup(&[Filter::is("id", "4")]), None);
    }

    #[test]
    fn field_selection_normalizes_inputs() {
        assert_eq!(Fields::from("code"), Fields::Only(vec!["code".into()]));
        assert_eq!(Fields::from(["code", "name"]), Fields::only(["code", "name"]));
        assert_eq!(Fields::from(None::<&str>), Fields::All);
        assert!(Fields::Only(vec![]).is_all());
    }

    #[test]
    fn projection_keeps_selected_fields_and_identity() {
        let record = doc! { "code": "sh010", "name": "Hero", "content": "anim" };

        let projected = Fields::from(["code", "missing"]).project(record.clone(), "Shot", 3);
        assert_eq!(projected, doc! { "code": "sh010", "id": 3_i64, "type": "Shot" });

        let full = Fields::All.project(record, "Shot", 3);
        assert_eq!(full.len(), 5);
    }
}
