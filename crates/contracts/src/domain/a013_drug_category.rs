use super::common::ACTIVE_TOGGLE;
use crate::shared::metadata::{
    DefaultValue, EntityDescriptor, EntityUiMetadata, ExportStrategy, FieldMetadata,
    SearchStrategy,
};

static FIELDS: &[FieldMetadata] = &[
    FieldMetadata::integer("category_id", "ID").server_assigned(),
    FieldMetadata::text("category_name", "Category")
        .required("Category name is required")
        .length(2, 100)
        .searchable(),
    FieldMetadata::boolean("status", "Status")
        .default_value(DefaultValue::Bool(true))
        .hidden_in_form(),
];

pub static DESCRIPTOR: EntityDescriptor = EntityDescriptor {
    entity_index: "a013",
    entity_name: "drug_category",
    resource: "category",
    primary_key: "category_id",
    label_field: "category_name",
    status: Some(ACTIVE_TOGGLE),
    search: SearchStrategy::Client,
    export: ExportStrategy::ClientCsv,
    supports_import: false,
    ui: EntityUiMetadata {
        element_name: "Drug category",
        list_name: "Drug categories",
        icon: Some("folder"),
    },
    fields: FIELDS,
    dependencies: &[],
};
