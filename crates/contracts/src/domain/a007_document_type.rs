use super::common::ACTIVE_TOGGLE;
use crate::shared::metadata::{
    DefaultValue, EntityDescriptor, EntityUiMetadata, ExportStrategy, FieldMetadata,
    SearchStrategy,
};

static FIELDS: &[FieldMetadata] = &[
    FieldMetadata::integer("document_type_id", "ID").server_assigned(),
    FieldMetadata::text("document_type_name", "Document type")
        .required("Document type name is required")
        .length(2, 100)
        .placeholder("PAN card")
        .searchable(),
    FieldMetadata::boolean("status", "Status")
        .default_value(DefaultValue::Bool(true))
        .hidden_in_form(),
];

pub static DESCRIPTOR: EntityDescriptor = EntityDescriptor {
    entity_index: "a007",
    entity_name: "document_type",
    resource: "document-type",
    primary_key: "document_type_id",
    label_field: "document_type_name",
    status: Some(ACTIVE_TOGGLE),
    search: SearchStrategy::Client,
    export: ExportStrategy::ClientCsv,
    supports_import: false,
    ui: EntityUiMetadata {
        element_name: "Document type",
        list_name: "Document types",
        icon: Some("file"),
    },
    fields: FIELDS,
    dependencies: &[],
};
