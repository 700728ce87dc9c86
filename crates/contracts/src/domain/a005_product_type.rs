use super::common::ACTIVE_TOGGLE;
use crate::shared::metadata::{
    DefaultValue, EntityDescriptor, EntityUiMetadata, ExportStrategy, FieldMetadata,
    SearchStrategy,
};

static FIELDS: &[FieldMetadata] = &[
    FieldMetadata::integer("product_type_id", "ID").server_assigned(),
    FieldMetadata::text("product_type_name", "Product type")
        .required("Product type name is required")
        .length(2, 100)
        .searchable(),
    FieldMetadata::long_text("description", "Description").max_length(500),
    FieldMetadata::boolean("status", "Status")
        .default_value(DefaultValue::Bool(true))
        .hidden_in_form(),
];

pub static DESCRIPTOR: EntityDescriptor = EntityDescriptor {
    entity_index: "a005",
    entity_name: "product_type",
    resource: "product-type",
    primary_key: "product_type_id",
    label_field: "product_type_name",
    status: Some(ACTIVE_TOGGLE),
    search: SearchStrategy::Client,
    export: ExportStrategy::ClientCsv,
    supports_import: false,
    ui: EntityUiMetadata {
        element_name: "Product type",
        list_name: "Product types",
        icon: Some("tag"),
    },
    fields: FIELDS,
    dependencies: &[],
};
