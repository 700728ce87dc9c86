use serde_json::{Map, Value};

use super::common::ACTIVE_TOGGLE;
use crate::shared::metadata::{
    as_number, DefaultValue, EntityDescriptor, EntityUiMetadata, ExportStrategy,
    FieldDependency, FieldMetadata, SearchStrategy,
};

static FIELDS: &[FieldMetadata] = &[
    FieldMetadata::integer("gst_id", "ID").server_assigned(),
    FieldMetadata::text("gst_name", "Name")
        .required("GST name is required")
        .max_length(50)
        .placeholder("GST 12%")
        .searchable(),
    FieldMetadata::number("gst_percentage", "GST %")
        .required("GST percentage is required")
        .range(0.0, 100.0),
    FieldMetadata::number("cgst", "CGST %").derived(),
    FieldMetadata::number("sgst", "SGST %").derived(),
    FieldMetadata::number("igst", "IGST %").derived(),
    FieldMetadata::boolean("status", "Status")
        .default_value(DefaultValue::Bool(true))
        .hidden_in_form(),
];

fn rounded(value: f64) -> Value {
    serde_json::Number::from_f64((value * 100.0).round() / 100.0)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

/// Intra-state tax splits evenly into CGST and SGST; inter-state IGST
/// carries the whole rate.
pub fn split_gst(values: &Map<String, Value>) -> Vec<(&'static str, Value)> {
    match values.get("gst_percentage").and_then(as_number) {
        Some(rate) if rate.is_finite() => vec![
            ("cgst", rounded(rate / 2.0)),
            ("sgst", rounded(rate / 2.0)),
            ("igst", rounded(rate)),
        ],
        _ => vec![
            ("cgst", Value::Null),
            ("sgst", Value::Null),
            ("igst", Value::Null),
        ],
    }
}

static DEPENDENCIES: &[FieldDependency] = &[FieldDependency::Derived {
    source: "gst_percentage",
    compute: split_gst,
}];

pub static DESCRIPTOR: EntityDescriptor = EntityDescriptor {
    entity_index: "a006",
    entity_name: "gst",
    resource: "gst",
    primary_key: "gst_id",
    label_field: "gst_name",
    status: Some(ACTIVE_TOGGLE),
    search: SearchStrategy::Client,
    export: ExportStrategy::ClientCsv,
    supports_import: false,
    ui: EntityUiMetadata {
        element_name: "GST slab",
        list_name: "GST slabs",
        icon: Some("percent"),
    },
    fields: FIELDS,
    dependencies: DEPENDENCIES,
};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn split(value: Value) -> Vec<(&'static str, Value)> {
        let mut map = Map::new();
        map.insert("gst_percentage".to_string(), value);
        split_gst(&map)
    }

    #[test]
    fn test_split_even_rate() {
        assert_eq!(
            split(json!(18)),
            vec![("cgst", json!(9.0)), ("sgst", json!(9.0)), ("igst", json!(18.0))]
        );
    }

    #[test]
    fn test_split_typed_text_and_rounding() {
        let parts = split(json!("5"));
        assert_eq!(parts[0], ("cgst", json!(2.5)));

        let parts = split(json!(0.25));
        assert_eq!(parts[0], ("cgst", json!(0.13)));
        assert_eq!(parts[2], ("igst", json!(0.25)));
    }

    #[test]
    fn test_split_clears_on_garbage() {
        for (_, value) in split(json!("abc")) {
            assert_eq!(value, Value::Null);
        }
        for (_, value) in split_gst(&Map::new()) {
            assert_eq!(value, Value::Null);
        }
    }
}
