use super::common::{CODE_ERROR, CODE_PATTERN};
use crate::shared::metadata::{
    DefaultValue, EntityDescriptor, EntityUiMetadata, ExportStrategy, FieldMetadata,
    SearchStrategy, StatusToggle,
};

static FIELDS: &[FieldMetadata] = &[
    FieldMetadata::integer("deal_id", "ID").server_assigned(),
    FieldMetadata::text("deal_name", "Deal")
        .required("Deal name is required")
        .length(2, 120)
        .searchable(),
    FieldMetadata::text("deal_code", "Deal code")
        .required("Deal code is required")
        .pattern(CODE_PATTERN, CODE_ERROR)
        .searchable(),
    FieldMetadata::number("discount_percentage", "Discount %")
        .required("Discount is required")
        .range(0.0, 100.0),
    FieldMetadata::date("start_date", "Starts"),
    FieldMetadata::date("end_date", "Ends"),
    FieldMetadata::long_text("description", "Description").max_length(1000),
    FieldMetadata::boolean("is_published", "Published")
        .default_value(DefaultValue::Bool(false))
        .hidden_in_form(),
];

pub static DESCRIPTOR: EntityDescriptor = EntityDescriptor {
    entity_index: "a009",
    entity_name: "deal",
    resource: "deal",
    primary_key: "deal_id",
    label_field: "deal_name",
    status: Some(StatusToggle {
        field: "is_published",
        on_label: "Published",
        off_label: "Draft",
        on_action: "Publish",
        off_action: "Unpublish",
    }),
    search: SearchStrategy::Server,
    export: ExportStrategy::ClientCsv,
    supports_import: false,
    ui: EntityUiMetadata {
        element_name: "Deal",
        list_name: "Deals",
        icon: Some("gift"),
    },
    fields: FIELDS,
    dependencies: &[],
};
