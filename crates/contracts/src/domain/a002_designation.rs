use super::common::ACTIVE_TOGGLE;
use crate::shared::metadata::{
    DefaultValue, EntityDescriptor, EntityUiMetadata, ExportStrategy, FieldMetadata,
    SearchStrategy,
};

static FIELDS: &[FieldMetadata] = &[
    FieldMetadata::integer("designation_id", "ID").server_assigned(),
    FieldMetadata::text("designation_name", "Designation")
        .required("Designation name is required")
        .length(2, 100)
        .searchable(),
    FieldMetadata::reference("department", "Department", "department")
        .required("Select a department")
        .inline_creatable(),
    FieldMetadata::long_text("description", "Description").max_length(500),
    FieldMetadata::boolean("status", "Status")
        .default_value(DefaultValue::Bool(true))
        .hidden_in_form(),
];

pub static DESCRIPTOR: EntityDescriptor = EntityDescriptor {
    entity_index: "a002",
    entity_name: "designation",
    resource: "designation",
    primary_key: "designation_id",
    label_field: "designation_name",
    status: Some(ACTIVE_TOGGLE),
    search: SearchStrategy::Client,
    export: ExportStrategy::ClientCsv,
    supports_import: false,
    ui: EntityUiMetadata {
        element_name: "Designation",
        list_name: "Designations",
        icon: Some("badge"),
    },
    fields: FIELDS,
    dependencies: &[],
};
