use super::common::{ACTIVE_TOGGLE, CODE_ERROR, CODE_PATTERN};
use crate::shared::metadata::{
    DefaultValue, EntityDescriptor, EntityUiMetadata, ExportStrategy, FieldMetadata,
    SearchStrategy,
};

static FIELDS: &[FieldMetadata] = &[
    FieldMetadata::integer("department_id", "ID")
        .server_assigned()
        .width(80),
    FieldMetadata::text("department_name", "Department name")
        .required("Department name is required")
        .length(2, 100)
        .searchable(),
    FieldMetadata::text("department_code", "Department code")
        .pattern(CODE_PATTERN, CODE_ERROR)
        .placeholder("PHR01")
        .searchable(),
    FieldMetadata::long_text("description", "Description").max_length(500),
    FieldMetadata::boolean("status", "Status")
        .default_value(DefaultValue::Bool(true))
        .hidden_in_form(),
];

pub static DESCRIPTOR: EntityDescriptor = EntityDescriptor {
    entity_index: "a001",
    entity_name: "department",
    resource: "department",
    primary_key: "department_id",
    label_field: "department_name",
    status: Some(ACTIVE_TOGGLE),
    search: SearchStrategy::Server,
    export: ExportStrategy::Server,
    supports_import: true,
    ui: EntityUiMetadata {
        element_name: "Department",
        list_name: "Departments",
        icon: Some("building"),
    },
    fields: FIELDS,
    dependencies: &[],
};
