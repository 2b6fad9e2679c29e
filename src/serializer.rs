//! Depth-bounded entity serialization.
//!
//! An entity is turned into a flat JSON object of its scalar columns. When
//! relationships are requested, each declared relationship adds one key:
//! an object (or `null`) for to-one, an array for to-many. Related rows are
//! themselves serialized with relationships disabled, so output never nests
//! more than one level deep.

use sea_orm::Value;
use serde_json::{Map, Value as JsonValue, json};
use tracing::trace;

use crate::{EntityGraph, EntityKind, RecordRef, Resolved};

/// A serialized entity
pub type JsonMap = Map<String, JsonValue>;

/// Serialize `record`, inlining its relationships one level deep.
pub fn to_json<'r>(graph: &EntityGraph, record: impl Into<RecordRef<'r>>) -> JsonValue {
    JsonValue::Object(to_map(graph, record, true))
}

/// Serialize `record` into a map of column name to value.
///
/// Relationship keys are added only when `include_relationships` is set.
/// Relationships are resolved against `graph`; rows missing from it serialize
/// as `null` (to-one) or are left out of the array (to-many).
pub fn to_map<'r>(
    graph: &EntityGraph,
    record: impl Into<RecordRef<'r>>,
    include_relationships: bool,
) -> JsonMap {
    let record = record.into();
    let descriptor = record.descriptor();

    let mut map: JsonMap = descriptor
        .columns
        .iter()
        .map(|name| {
            let value = record.column(name).map(json_value).unwrap_or(JsonValue::Null);
            ((*name).to_owned(), value)
        })
        .collect();

    if !include_relationships {
        return map;
    }

    for relation in descriptor.relations {
        trace!(
            entity = %record.kind(),
            id = record.id(),
            relation = relation.name,
            "inlining relationship"
        );
        let value = match graph.related(record, relation) {
            Resolved::One(Some(row)) => JsonValue::Object(to_map(graph, row, false)),
            Resolved::One(None) => JsonValue::Null,
            Resolved::Many(rows) => JsonValue::Array(
                rows.into_iter()
                    .map(|row| JsonValue::Object(to_map(graph, row, false)))
                    .collect(),
            ),
        };
        map.insert(relation.name.to_owned(), value);
    }

    map
}

/// Serialize every loaded row of `kind`, in id order.
pub fn to_maps(graph: &EntityGraph, kind: EntityKind, include_relationships: bool) -> Vec<JsonMap> {
    graph
        .records(kind)
        .into_iter()
        .map(|row| to_map(graph, row, include_relationships))
        .collect()
}

/// Convert a column value to JSON
pub fn json_value(value: Value) -> JsonValue {
    match value {
        Value::Bool(v) => json!(v),
        Value::TinyInt(v) => json!(v),
        Value::SmallInt(v) => json!(v),
        Value::Int(v) => json!(v),
        Value::BigInt(v) => json!(v),
        Value::TinyUnsigned(v) => json!(v),
        Value::SmallUnsigned(v) => json!(v),
        Value::Unsigned(v) => json!(v),
        Value::BigUnsigned(v) => json!(v),
        Value::Float(v) => json!(v),
        Value::Double(v) => json!(v),
        Value::String(v) => json!(v.map(|s| *s)),
        Value::Char(v) => json!(v),
        Value::Bytes(v) => json!(v.map(|b| *b)),
        Value::Json(v) => v.map(|j| *j).unwrap_or(JsonValue::Null),
        #[allow(unreachable_patterns)]
        _ => JsonValue::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{customer, item, review};
    use pretty_assertions::assert_eq;

    fn ann() -> customer::Model {
        customer::Model {
            id: 1,
            name: Some("Ann".to_owned()),
        }
    }

    fn mug() -> item::Model {
        item::Model {
            id: 1,
            name: Some("Mug".to_owned()),
            price: Some(9.99),
        }
    }

    fn nice() -> review::Model {
        review::Model {
            id: 1,
            comment: Some("Nice".to_owned()),
            customer_id: Some(1),
            item_id: Some(1),
        }
    }

    fn graph() -> EntityGraph {
        let mut graph = EntityGraph::new();
        graph.insert(ann());
        graph.insert(mug());
        graph.insert(nice());
        graph
    }

    fn keys(map: &JsonMap) -> Vec<&str> {
        let mut keys: Vec<&str> = map.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    #[test]
    fn review_with_relationships() {
        let graph = graph();

        assert_eq!(
            to_json(&graph, graph.review(1).unwrap()),
            json!({
                "id": 1,
                "comment": "Nice",
                "customer_id": 1,
                "item_id": 1,
                "customer": { "id": 1, "name": "Ann" },
                "item": { "id": 1, "name": "Mug", "price": 9.99 },
            })
        );
    }

    #[test]
    fn scalar_fields_only() {
        let graph = graph();

        for row in [
            RecordRef::from(graph.customer(1).unwrap()),
            RecordRef::from(graph.item(1).unwrap()),
            RecordRef::from(graph.review(1).unwrap()),
        ] {
            let map = to_map(&graph, row, false);
            let mut expected = row.descriptor().columns.to_vec();
            expected.sort_unstable();
            assert_eq!(keys(&map), expected);
        }
    }

    #[test]
    fn one_key_per_relationship() {
        let graph = graph();

        for row in [
            RecordRef::from(graph.customer(1).unwrap()),
            RecordRef::from(graph.item(1).unwrap()),
            RecordRef::from(graph.review(1).unwrap()),
        ] {
            let shallow = to_map(&graph, row, false);
            let mut full = to_map(&graph, row, true);
            assert_eq!(full.len(), shallow.len() + row.descriptor().relations.len());
            for relation in row.descriptor().relations {
                assert!(full.remove(relation.name).is_some());
            }
            assert_eq!(full, shallow);
        }
    }

    #[test]
    fn serialization_is_idempotent() {
        let graph = graph();
        let row = graph.customer(1).unwrap();

        assert_eq!(to_json(&graph, row), to_json(&graph, row));
    }

    #[test]
    fn nested_rows_are_never_expanded() {
        let graph = graph();

        let customer = to_map(&graph, graph.customer(1).unwrap(), true);
        assert_eq!(
            customer["reviews"],
            json!([{ "id": 1, "comment": "Nice", "customer_id": 1, "item_id": 1 }])
        );

        for (name, value) in to_map(&graph, graph.review(1).unwrap(), true) {
            if let JsonValue::Object(nested) = value {
                assert!(!nested.contains_key("reviews"), "{name} was expanded");
            }
        }
    }

    #[test]
    fn unset_to_one_is_null() {
        let mut graph = graph();
        graph.insert(review::Model {
            id: 2,
            comment: None,
            customer_id: None,
            item_id: Some(1),
        });

        let map = to_map(&graph, graph.review(2).unwrap(), true);
        assert_eq!(map["customer"], JsonValue::Null);
        assert_eq!(map["comment"], JsonValue::Null);
        assert_eq!(map["item"], json!({ "id": 1, "name": "Mug", "price": 9.99 }));
    }

    #[test]
    fn unloaded_to_one_is_null() {
        let mut graph = EntityGraph::new();
        graph.insert(nice());

        let map = to_map(&graph, graph.review(1).unwrap(), true);
        assert_eq!(map["customer"], JsonValue::Null);
        assert_eq!(map["item"], JsonValue::Null);
    }

    #[test]
    fn customer_without_reviews() {
        let mut graph = graph();
        graph.insert(customer::Model { id: 2, name: None });

        assert_eq!(
            to_json(&graph, graph.customer(2).unwrap()),
            json!({ "id": 2, "name": null, "reviews": [] })
        );
    }

    #[test]
    fn model_outside_graph() {
        let graph = graph();
        let item = item::Model {
            id: 1,
            name: Some("Mug (copy)".to_owned()),
            price: None,
        };

        assert_eq!(
            to_json(&graph, &item),
            json!({
                "id": 1,
                "name": "Mug (copy)",
                "price": null,
                "reviews": [{ "id": 1, "comment": "Nice", "customer_id": 1, "item_id": 1 }],
            })
        );
    }

    #[test]
    fn serialize_all_of_kind() {
        let mut graph = graph();
        graph.insert(item::Model {
            id: 2,
            name: Some("Pen".to_owned()),
            price: Some(1.5),
        });

        assert_eq!(
            to_maps(&graph, EntityKind::Item, false),
            vec![
                json!({ "id": 1, "name": "Mug", "price": 9.99 }).as_object().unwrap().clone(),
                json!({ "id": 2, "name": "Pen", "price": 1.5 }).as_object().unwrap().clone(),
            ]
        );
    }

    #[test]
    fn column_values() {
        assert_eq!(json_value(Value::Int(None)), JsonValue::Null);
        assert_eq!(json_value(Value::Double(Some(0.5))), json!(0.5));
        assert_eq!(json_value(Value::from("text")), json!("text"));
        assert_eq!(json_value(Value::Bool(Some(true))), json!(true));
    }
}
