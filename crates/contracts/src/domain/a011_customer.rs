use super::common::MOBILE_PATTERN;
use crate::shared::metadata::{
    DefaultValue, EntityDescriptor, EntityUiMetadata, ExportStrategy, FieldMetadata,
    SearchStrategy, StatusToggle,
};

static FIELDS: &[FieldMetadata] = &[
    FieldMetadata::integer("customer_id", "ID").server_assigned(),
    FieldMetadata::text("customer_name", "Name")
        .required("Customer name is required")
        .length(2, 120)
        .searchable(),
    FieldMetadata::text("mobile", "Mobile")
        .required("Mobile number is required")
        .pattern(MOBILE_PATTERN, "Enter a valid 10-digit mobile number")
        .searchable(),
    FieldMetadata::email("email", "Email").searchable(),
    FieldMetadata::long_text("address", "Address").max_length(500),
    FieldMetadata::date("created_at", "Registered").server_assigned(),
    FieldMetadata::boolean("status", "Status")
        .default_value(DefaultValue::Bool(true))
        .hidden_in_form(),
];

pub static DESCRIPTOR: EntityDescriptor = EntityDescriptor {
    entity_index: "a011",
    entity_name: "customer",
    resource: "customer",
    primary_key: "customer_id",
    label_field: "customer_name",
    status: Some(StatusToggle {
        field: "status",
        on_label: "Active",
        off_label: "Blocked",
        on_action: "Unblock",
        off_action: "Block",
    }),
    search: SearchStrategy::Server,
    export: ExportStrategy::Server,
    supports_import: true,
    ui: EntityUiMetadata {
        element_name: "Customer",
        list_name: "Customers",
        icon: Some("users"),
    },
    fields: FIELDS,
    dependencies: &[],
};
