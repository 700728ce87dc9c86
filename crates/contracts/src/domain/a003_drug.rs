use super::common::ACTIVE_TOGGLE;
use crate::shared::metadata::{
    DefaultValue, EntityDescriptor, EntityUiMetadata, ExportStrategy, FieldDependency,
    FieldMetadata, SearchStrategy,
};

static FIELDS: &[FieldMetadata] = &[
    FieldMetadata::integer("drug_id", "ID").server_assigned(),
    FieldMetadata::text("drug_name", "Drug name")
        .required("Drug name is required")
        .max_length(150)
        .searchable(),
    FieldMetadata::text("brand", "Brand")
        .required("Brand is required")
        .max_length(100)
        .searchable(),
    FieldMetadata::reference("category", "Category", "drug_category"),
    FieldMetadata::reference("sub_category", "Sub category", "drug_sub_category")
        .required("Sub category is required"),
    FieldMetadata::text("hsn", "HSN code")
        .required("HSN code is required")
        .pattern(r"^[0-9]{4,8}$", "HSN code must be 4 to 8 digits"),
    FieldMetadata::reference("drug_form", "Drug form", "drug_form").inline_creatable(),
    FieldMetadata::reference("product_type", "Product type", "product_type").inline_creatable(),
    FieldMetadata::reference("gst", "GST", "gst").hidden_in_list(),
    FieldMetadata::number("mrp", "MRP").min(0.0),
    FieldMetadata::file("image", "Image"),
    FieldMetadata::boolean("status", "Status")
        .default_value(DefaultValue::Bool(true))
        .hidden_in_form(),
];

/// Sub categories are scoped to the selected category
static DEPENDENCIES: &[FieldDependency] = &[FieldDependency::Options {
    source: "category",
    target: "sub_category",
    resource: "sub-category",
    filter_param: "category",
    value_field: "sub_category_id",
    label_field: "sub_category_name",
}];

pub static DESCRIPTOR: EntityDescriptor = EntityDescriptor {
    entity_index: "a003",
    entity_name: "drug",
    resource: "drug",
    primary_key: "drug_id",
    label_field: "drug_name",
    status: Some(ACTIVE_TOGGLE),
    search: SearchStrategy::Server,
    export: ExportStrategy::Server,
    supports_import: true,
    ui: EntityUiMetadata {
        element_name: "Drug",
        list_name: "Drugs",
        icon: Some("pill"),
    },
    fields: FIELDS,
    dependencies: DEPENDENCIES,
};
