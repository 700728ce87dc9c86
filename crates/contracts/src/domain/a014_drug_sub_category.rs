use super::common::ACTIVE_TOGGLE;
use crate::shared::metadata::{
    DefaultValue, EntityDescriptor, EntityUiMetadata, ExportStrategy, FieldMetadata,
    SearchStrategy,
};

static FIELDS: &[FieldMetadata] = &[
    FieldMetadata::integer("sub_category_id", "ID").server_assigned(),
    FieldMetadata::text("sub_category_name", "Sub category")
        .required("Sub category name is required")
        .length(2, 100)
        .searchable(),
    FieldMetadata::reference("category", "Category", "drug_category")
        .required("Select a category")
        .inline_creatable(),
    FieldMetadata::boolean("status", "Status")
        .default_value(DefaultValue::Bool(true))
        .hidden_in_form(),
];

pub static DESCRIPTOR: EntityDescriptor = EntityDescriptor {
    entity_index: "a014",
    entity_name: "drug_sub_category",
    resource: "sub-category",
    primary_key: "sub_category_id",
    label_field: "sub_category_name",
    status: Some(ACTIVE_TOGGLE),
    search: SearchStrategy::Client,
    export: ExportStrategy::ClientCsv,
    supports_import: false,
    ui: EntityUiMetadata {
        element_name: "Drug sub category",
        list_name: "Drug sub categories",
        icon: Some("folder-tree"),
    },
    fields: FIELDS,
    dependencies: &[],
};
