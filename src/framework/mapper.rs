//! # Field Mapper
//!
//! Shared machinery for moving fields between a flat record and the nested
//! wire payload.
//!
//! Each [`ResourceKind`] declares a [`FieldSpec`] per field: the JSON pointer
//! where the field lives on the wire, its collection [`Discipline`], and its
//! [`Mutability`]. From that table this module derives:
//!
//! - [`ChangeSet::between`]: which fields differ between two records, comparing
//!   `Set` fields without regard to order and `Ordered` fields element-wise.
//! - [`merge_changes`]: a read-modify-write merge that copies *only* the changed
//!   fields into the payload read from the server, so remote fields the adapter
//!   does not model are sent back untouched.

use crate::framework::error::ReconcileError;
use crate::framework::gateway::WirePayload;
use crate::framework::kind::ResourceKind;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::hash::Hash;

/// How a field's value is compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Discipline {
    /// A single value or a nested block compared as a whole.
    Scalar,
    /// A list whose element order is meaningful (route lists, filter lists).
    Ordered,
    /// A collection compared as an unordered multiset (labels, ids).
    Set,
}

/// Whether the remote API accepts in-place changes to a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutability {
    Mutable,
    /// Only settable on creation; a change requires replacing the resource.
    ForceNew,
}

/// Where a field lives on the wire and how it behaves.
#[derive(Debug)]
pub struct FieldSpec<F: 'static> {
    pub field: F,
    /// Name in the flat record, used in errors and logs.
    pub name: &'static str,
    /// JSON pointer into the wire payload, e.g. `/properties/routes`.
    pub wire_path: &'static str,
    pub discipline: Discipline,
    pub mutability: Mutability,
}

/// The explicit set of fields an update touches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeSet<F: Eq + Hash> {
    fields: HashSet<F>,
}

impl<F: Copy + Eq + Hash + 'static> Default for ChangeSet<F> {
    fn default() -> Self {
        Self {
            fields: HashSet::new(),
        }
    }
}

impl<F: Copy + Eq + Hash + 'static> ChangeSet<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: F) -> Self {
        self.fields.insert(field);
        self
    }

    pub fn insert(&mut self, field: F) {
        self.fields.insert(field);
    }

    pub fn contains(&self, field: F) -> bool {
        self.fields.contains(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = F> + '_ {
        self.fields.iter().copied()
    }

    /// Every field the kind declares.
    pub fn all<K: ResourceKind<Field = F>>() -> Self {
        K::fields().iter().map(|spec| spec.field).collect()
    }

    /// The fields whose encoded values differ between `old` and `new`.
    pub fn between<K: ResourceKind<Field = F>>(
        old: &K::Record,
        new: &K::Record,
    ) -> Result<Self, ReconcileError> {
        let old = K::encode(old)?;
        let new = K::encode(new)?;
        Ok(K::fields()
            .iter()
            .filter(|spec| {
                !same_value(
                    old.pointer(spec.wire_path),
                    new.pointer(spec.wire_path),
                    spec.discipline,
                )
            })
            .map(|spec| spec.field)
            .collect())
    }
}

impl<F: Copy + Eq + Hash + 'static> FromIterator<F> for ChangeSet<F> {
    fn from_iter<I: IntoIterator<Item = F>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

/// Copies the changed fields of `desired` into `current`.
///
/// Fields `desired` leaves unset are removed from the result; fields not in
/// `changes` and anything the kind does not model keep the server's values.
pub fn merge_changes<K: ResourceKind>(
    current: &WirePayload,
    desired: &K::Record,
    changes: &ChangeSet<K::Field>,
) -> Result<WirePayload, ReconcileError> {
    let encoded = K::encode(desired)?;
    let mut merged = current.clone();

    for spec in K::fields().iter().filter(|spec| changes.contains(spec.field)) {
        match encoded.pointer(spec.wire_path) {
            Some(value) if !value.is_null() => {
                set_at(&mut merged, spec.wire_path, value.clone())
                    .map_err(|reason| ReconcileError::mapping(K::TYPE_NAME, reason))?;
            }
            _ => remove_at(&mut merged, spec.wire_path),
        }
    }

    Ok(merged)
}

/// Serializes a kind's typed wire struct into a payload.
pub fn encode_wire<T: Serialize>(
    resource_type: &'static str,
    wire: &T,
) -> Result<WirePayload, ReconcileError> {
    serde_json::to_value(wire).map_err(|e| ReconcileError::mapping(resource_type, e))
}

/// Reads a payload into a kind's typed wire struct. Unknown fields are ignored.
pub fn decode_wire<T: DeserializeOwned>(
    resource_type: &'static str,
    payload: &WirePayload,
) -> Result<T, ReconcileError> {
    T::deserialize(payload).map_err(|e| ReconcileError::mapping(resource_type, e))
}

fn same_value(a: Option<&Value>, b: Option<&Value>, discipline: Discipline) -> bool {
    let a = a.filter(|v| !is_empty(v));
    let b = b.filter(|v| !is_empty(v));
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => match (discipline, a, b) {
            (Discipline::Set, Value::Array(a), Value::Array(b)) => {
                sorted_elements(a) == sorted_elements(b)
            }
            _ => a == b,
        },
        _ => false,
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

fn sorted_elements(items: &[Value]) -> Vec<String> {
    let mut keys: Vec<String> = items.iter().map(Value::to_string).collect();
    keys.sort();
    keys
}

fn pointer_tokens(path: &str) -> impl Iterator<Item = String> + '_ {
    path.split('/')
        .skip(1)
        .map(|token| token.replace("~1", "/").replace("~0", "~"))
}

/// Writes `value` at the JSON pointer `path`, creating objects on the way.
pub fn set_at(root: &mut Value, path: &str, value: Value) -> Result<(), String> {
    let tokens: Vec<String> = pointer_tokens(path).collect();
    let Some((last, parents)) = tokens.split_last() else {
        *root = value;
        return Ok(());
    };

    let mut cursor = root;
    for token in parents {
        if cursor.is_null() {
            *cursor = Value::Object(Map::new());
        }
        let Value::Object(map) = cursor else {
            return Err(format!("cannot descend into non-object at {token:?} of {path}"));
        };
        cursor = map
            .entry(token.clone())
            .or_insert_with(|| Value::Object(Map::new()));
    }

    if cursor.is_null() {
        *cursor = Value::Object(Map::new());
    }
    match cursor {
        Value::Object(map) => {
            map.insert(last.clone(), value);
            Ok(())
        }
        _ => Err(format!("cannot set {path}: parent is not an object")),
    }
}

/// Removes the value at the JSON pointer `path`, if present.
pub fn remove_at(root: &mut Value, path: &str) {
    let tokens: Vec<String> = pointer_tokens(path).collect();
    let Some((last, parents)) = tokens.split_last() else {
        return;
    };

    let mut cursor = root;
    for token in parents {
        match cursor.get_mut(token.as_str()) {
            Some(next) => cursor = next,
            None => return,
        }
    }
    if let Value::Object(map) = cursor {
        map.remove(last.as_str());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::identity::templates::VIRTUAL_HUB;
    use crate::framework::identity::{IdTemplate, ResourceIdentifier};
    use serde_json::json;

    // --- Minimal kind: a hub with a label set and an ordered list ---

    #[derive(Debug, Clone, PartialEq)]
    struct Hub {
        name: String,
        labels: Vec<String>,
        steps: Vec<String>,
        sku: Option<String>,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum HubField {
        Labels,
        Steps,
        Sku,
    }

    struct HubKind;

    static FIELDS: [FieldSpec<HubField>; 3] = [
        FieldSpec {
            field: HubField::Labels,
            name: "labels",
            wire_path: "/properties/labels",
            discipline: Discipline::Set,
            mutability: Mutability::Mutable,
        },
        FieldSpec {
            field: HubField::Steps,
            name: "steps",
            wire_path: "/properties/steps",
            discipline: Discipline::Ordered,
            mutability: Mutability::Mutable,
        },
        FieldSpec {
            field: HubField::Sku,
            name: "sku",
            wire_path: "/properties/sku/name",
            discipline: Discipline::Scalar,
            mutability: Mutability::ForceNew,
        },
    ];

    impl ResourceKind for HubKind {
        type Record = Hub;
        type Field = HubField;
        const TYPE_NAME: &'static str = "test_hub";

        fn template() -> &'static IdTemplate {
            &VIRTUAL_HUB
        }

        fn fields() -> &'static [FieldSpec<HubField>] {
            &FIELDS
        }

        fn identifier(record: &Hub) -> Result<ResourceIdentifier, ReconcileError> {
            ResourceIdentifier::build(&VIRTUAL_HUB, &["0000", "rg1", record.name.as_str()])
        }

        fn encode(record: &Hub) -> Result<WirePayload, ReconcileError> {
            let mut properties = json!({
                "labels": record.labels,
                "steps": record.steps,
            });
            if let Some(sku) = &record.sku {
                properties["sku"] = json!({ "name": sku });
            }
            Ok(json!({ "properties": properties }))
        }

        fn decode(id: &ResourceIdentifier, payload: &WirePayload) -> Result<Hub, ReconcileError> {
            let strings = |path: &str| -> Vec<String> {
                payload
                    .pointer(path)
                    .and_then(Value::as_array)
                    .map(|items| {
                        items
                            .iter()
                            .filter_map(|v| v.as_str().map(str::to_string))
                            .collect()
                    })
                    .unwrap_or_default()
            };
            Ok(Hub {
                name: id.name().to_string(),
                labels: strings("/properties/labels"),
                steps: strings("/properties/steps"),
                sku: payload
                    .pointer("/properties/sku/name")
                    .and_then(Value::as_str)
                    .map(str::to_string),
            })
        }
    }

    fn hub(labels: &[&str], steps: &[&str]) -> Hub {
        Hub {
            name: "hub1".into(),
            labels: labels.iter().map(|s| s.to_string()).collect(),
            steps: steps.iter().map(|s| s.to_string()).collect(),
            sku: None,
        }
    }

    #[test]
    fn test_set_fields_ignore_order_but_ordered_fields_do_not() {
        let old = hub(&["a", "b"], &["x", "y"]);
        let relabelled = hub(&["b", "a"], &["x", "y"]);
        let reordered = hub(&["a", "b"], &["y", "x"]);

        assert!(ChangeSet::between::<HubKind>(&old, &relabelled)
            .unwrap()
            .is_empty());

        let changes = ChangeSet::between::<HubKind>(&old, &reordered).unwrap();
        assert_eq!(changes, ChangeSet::new().with(HubField::Steps));
    }

    #[test]
    fn test_missing_and_empty_collections_are_equal() {
        let a = hub(&[], &[]);
        let mut b = a.clone();
        b.sku = None;
        assert!(ChangeSet::between::<HubKind>(&a, &b).unwrap().is_empty());
    }

    #[test]
    fn test_merge_preserves_unmodeled_and_unchanged_fields() {
        let current = json!({
            "id": "/subscriptions/0000/resourceGroups/rg1/providers/Microsoft.Network/virtualHubs/hub1",
            "etag": "W/\"1\"",
            "properties": {
                "labels": ["old"],
                "steps": ["x"],
                "provisioningState": "Succeeded",
                "sku": { "name": "Basic", "tier": "Basic" }
            }
        });
        let desired = hub(&["new"], &["y", "z"]);

        let merged =
            merge_changes::<HubKind>(&current, &desired, &ChangeSet::new().with(HubField::Steps))
                .unwrap();

        assert_eq!(merged["properties"]["steps"], json!(["y", "z"]));
        assert_eq!(merged["properties"]["labels"], json!(["old"]));
        assert_eq!(merged["properties"]["provisioningState"], json!("Succeeded"));
        assert_eq!(merged["properties"]["sku"]["tier"], json!("Basic"));
        assert_eq!(merged["etag"], current["etag"]);
    }

    #[test]
    fn test_merge_removes_fields_the_record_unsets() {
        let current = json!({ "properties": { "sku": { "name": "Basic", "tier": "Basic" } } });
        let desired = hub(&[], &[]);

        let merged =
            merge_changes::<HubKind>(&current, &desired, &ChangeSet::new().with(HubField::Sku))
                .unwrap();

        assert_eq!(merged["properties"]["sku"], json!({ "tier": "Basic" }));
    }

    #[test]
    fn test_set_at_creates_intermediate_objects() {
        let mut root = json!({});
        set_at(&mut root, "/properties/sku/name", json!("Standard")).unwrap();
        assert_eq!(root, json!({ "properties": { "sku": { "name": "Standard" } } }));

        let mut scalar = json!({ "properties": 3 });
        assert!(set_at(&mut scalar, "/properties/sku", json!("x")).is_err());
    }

    #[test]
    fn test_all_lists_every_declared_field() {
        let all = ChangeSet::all::<HubKind>();
        assert_eq!(all.len(), 3);
        assert!(all.contains(HubField::Sku));
    }
}
