use super::common::ACTIVE_TOGGLE;
use crate::shared::metadata::{
    DefaultValue, EntityDescriptor, EntityUiMetadata, ExportStrategy, FieldMetadata,
    SearchStrategy,
};

static FIELDS: &[FieldMetadata] = &[
    FieldMetadata::integer("drug_form_id", "ID").server_assigned(),
    FieldMetadata::text("drug_form_name", "Drug form")
        .required("Drug form name is required")
        .length(2, 60)
        .placeholder("Tablet")
        .searchable(),
    FieldMetadata::boolean("status", "Status")
        .default_value(DefaultValue::Bool(true))
        .hidden_in_form(),
];

pub static DESCRIPTOR: EntityDescriptor = EntityDescriptor {
    entity_index: "a004",
    entity_name: "drug_form",
    resource: "drug-form",
    primary_key: "drug_form_id",
    label_field: "drug_form_name",
    status: Some(ACTIVE_TOGGLE),
    search: SearchStrategy::Client,
    export: ExportStrategy::ClientCsv,
    supports_import: false,
    ui: EntityUiMetadata {
        element_name: "Drug form",
        list_name: "Drug forms",
        icon: Some("capsule"),
    },
    fields: FIELDS,
    dependencies: &[],
};
