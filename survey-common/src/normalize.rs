//! Response normalization
//!
//! Turns a raw submission into a record holding exactly one string for
//! every registered field, and converts records to and from the document
//! shapes used by storage and exports.

use std::collections::BTreeMap;

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

use crate::schema::{self, FieldDef, CREATED_AT, FIELDS};
use crate::value::{FieldValue, RawSubmission};

/// A submission with every schema field present as a plain string
///
/// Keys outside the schema are kept as submitted (flattened) but never
/// appear in schema-ordered output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRecord {
    fields: BTreeMap<String, String>,
}

/// Normalize a raw submission, merging `extra` first (extra wins on collision)
///
/// Missing schema fields become `""`, multi values are joined with `"; "`.
/// Cannot fail.
pub fn normalize(raw: &RawSubmission, extra: &RawSubmission) -> NormalizedRecord {
    let mut fields: BTreeMap<String, String> = raw
        .iter()
        .chain(extra.iter())
        .map(|(key, value)| (key.clone(), value.flatten()))
        .collect();

    for id in schema::field_ids() {
        fields.entry(id.to_string()).or_default();
    }

    NormalizedRecord { fields }
}

/// Re-key a record by label, in schema order
pub fn to_labeled(record: &NormalizedRecord) -> LabeledRecord<'_> {
    LabeledRecord(
        FIELDS
            .iter()
            .map(|f| (f.label, record.get(f.id)))
            .collect(),
    )
}

impl NormalizedRecord {
    /// Build a record from a stored document keyed by labels, identifiers,
    /// or a mix of both. A label key wins over the identifier key for the
    /// same field. Only schema fields are read back.
    pub fn from_document(document: &Map<String, Value>) -> Self {
        let fields = FIELDS
            .iter()
            .map(|f| {
                let value = document
                    .get(f.label)
                    .or_else(|| document.get(f.id))
                    .cloned()
                    .map(|v| FieldValue::from_json(v).flatten())
                    .unwrap_or_default();
                (f.id.to_string(), value)
            })
            .collect();
        NormalizedRecord { fields }
    }

    /// Copy holding only the schema fields, as every store persists it
    pub fn schema_projection(&self) -> Self {
        let fields = self
            .schema_values()
            .map(|(f, value)| (f.id.to_string(), value.to_string()))
            .collect();
        NormalizedRecord { fields }
    }

    /// Value of a field; `""` for anything not present
    pub fn get(&self, id: &str) -> &str {
        self.fields.get(id).map(String::as_str).unwrap_or("")
    }

    /// Server-generated submission timestamp
    pub fn created_at(&self) -> &str {
        self.get(CREATED_AT)
    }

    /// Schema fields with their values, in canonical order
    pub fn schema_values(&self) -> impl Iterator<Item = (&'static FieldDef, &str)> {
        FIELDS.iter().map(move |f| (f, self.get(f.id)))
    }

    /// All keys carried by the record, schema or not
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Identifier-keyed document of schema fields, in schema order
    pub fn document(&self) -> SchemaDocument<'_> {
        SchemaDocument(self)
    }
}

/// Serializes a record as an identifier-keyed map in schema order
pub struct SchemaDocument<'a>(&'a NormalizedRecord);

impl Serialize for SchemaDocument<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(FIELDS.len()))?;
        for (field, value) in self.0.schema_values() {
            map.serialize_entry(field.id, value)?;
        }
        map.end()
    }
}

/// A record re-keyed by label, in schema order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledRecord<'a>(pub Vec<(&'static str, &'a str)>);

impl Serialize for LabeledRecord<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (label, value) in &self.0 {
            map.serialize_entry(label, value)?;
        }
        map.end()
    }
}

/// Stable sort by `created_at` ascending; ties keep their given order
pub fn sort_by_created_at(records: &mut [NormalizedRecord]) {
    records.sort_by(|a, b| a.created_at().cmp(b.created_at()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(pairs: &[(&str, FieldValue)]) -> RawSubmission {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_every_schema_field_present() {
        let record = normalize(&RawSubmission::new(), &RawSubmission::new());
        for id in schema::field_ids() {
            assert!(record.keys().any(|k| k == id), "missing {id}");
            assert_eq!(record.get(id), "");
        }
    }

    #[test]
    fn test_multi_value_joined_in_order() {
        let record = normalize(
            &raw(&[("infoSources", FieldValue::from(vec!["a", "b", "c"]))]),
            &RawSubmission::new(),
        );
        assert_eq!(record.get("infoSources"), "a; b; c");
    }

    #[test]
    fn test_missing_field_defaults_empty() {
        let record = normalize(
            &raw(&[("purchaseChannel", FieldValue::from("Store A"))]),
            &RawSubmission::new(),
        );
        assert_eq!(record.get("purchaseChannel"), "Store A");
        assert_eq!(record.get("switchFactors"), "");
    }

    #[test]
    fn test_extra_wins_on_collision() {
        let record = normalize(
            &raw(&[(CREATED_AT, FieldValue::from("client-supplied"))]),
            &raw(&[(CREATED_AT, FieldValue::from("2026-01-01T00:00:00.000Z"))]),
        );
        assert_eq!(record.created_at(), "2026-01-01T00:00:00.000Z");
    }

    #[test]
    fn test_unknown_keys_carried_but_not_in_schema_output() {
        let record = normalize(
            &raw(&[("honeypot", FieldValue::from(vec!["x", "y"]))]),
            &RawSubmission::new(),
        );
        assert_eq!(record.get("honeypot"), "x; y");
        assert!(record.schema_values().all(|(f, _)| f.id != "honeypot"));
        let doc = serde_json::to_value(record.document()).unwrap();
        assert!(doc.get("honeypot").is_none());
        assert_eq!(doc.as_object().unwrap().len(), FIELDS.len());
    }

    #[test]
    fn test_schema_projection_drops_unknown_keys() {
        let record = normalize(
            &raw(&[
                ("honeypot", FieldValue::from("bot")),
                ("purchaseChannel", FieldValue::from("Store A")),
            ]),
            &RawSubmission::new(),
        );
        let projected = record.schema_projection();
        assert_eq!(projected.keys().count(), FIELDS.len());
        assert!(projected.keys().all(|k| k != "honeypot"));
        assert_eq!(projected.get("purchaseChannel"), "Store A");
    }

    #[test]
    fn test_document_preserves_schema_order() {
        let record = normalize(&RawSubmission::new(), &RawSubmission::new());
        let text = serde_json::to_string(&record.document()).unwrap();
        let created = text.find("\"created_at\"").unwrap();
        let channel = text.find("\"purchaseChannel\"").unwrap();
        let last = text.find("\"switchFactors\"").unwrap();
        assert!(created < channel && channel < last);
    }

    #[test]
    fn test_to_labeled_uses_labels_in_order() {
        let record = normalize(
            &raw(&[("purchaseChannel", FieldValue::from("Online"))]),
            &RawSubmission::new(),
        );
        let labeled = to_labeled(&record);
        assert_eq!(labeled.0.len(), FIELDS.len());
        assert_eq!(labeled.0[0], ("Submission time", ""));
        assert!(labeled
            .0
            .contains(&("Where did you purchase the product?", "Online")));
    }

    #[test]
    fn test_from_document_accepts_labels_and_ids() {
        let doc = json!({
            "Submission time": "2026-10-18T00:00:00.000Z",
            "purchaseChannel": "Store B",
            "infoSources": ["Reviews", "Friends"],
            "switchFactors": null,
            "_id": "ignored"
        });
        let record = NormalizedRecord::from_document(doc.as_object().unwrap());
        assert_eq!(record.created_at(), "2026-10-18T00:00:00.000Z");
        assert_eq!(record.get("purchaseChannel"), "Store B");
        assert_eq!(record.get("infoSources"), "Reviews; Friends");
        assert_eq!(record.get("switchFactors"), "");
        assert!(record.keys().all(|k| k != "_id"));
    }

    #[test]
    fn test_from_document_label_wins_over_id() {
        let doc = json!({
            "Where did you purchase the product?": "label value",
            "purchaseChannel": "id value"
        });
        let record = NormalizedRecord::from_document(doc.as_object().unwrap());
        assert_eq!(record.get("purchaseChannel"), "label value");
    }

    #[test]
    fn test_document_reads_back_identically() {
        let record = normalize(
            &raw(&[
                ("purchaseChannel", FieldValue::from("Store A")),
                ("postPurchaseActions", FieldValue::from(vec!["Left a review", "Shared"])),
            ]),
            &raw(&[(CREATED_AT, FieldValue::from("2026-10-18T00:00:00.000Z"))]),
        );
        let value = serde_json::to_value(record.document()).unwrap();
        let back = NormalizedRecord::from_document(value.as_object().unwrap());
        assert_eq!(back, record);
    }

    #[test]
    fn test_sort_by_created_at_is_stable() {
        let make = |ts: &str, channel: &str| {
            normalize(
                &raw(&[("purchaseChannel", FieldValue::from(channel))]),
                &raw(&[(CREATED_AT, FieldValue::from(ts))]),
            )
        };
        let mut records = vec![
            make("2026-02-01T00:00:00.000Z", "late"),
            make("2026-01-01T00:00:00.000Z", "first"),
            make("2026-01-01T00:00:00.000Z", "second"),
        ];
        sort_by_created_at(&mut records);
        let order: Vec<_> = records.iter().map(|r| r.get("purchaseChannel")).collect();
        assert_eq!(order, vec!["first", "second", "late"]);
    }
}
