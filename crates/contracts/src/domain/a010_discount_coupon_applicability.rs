use super::common::ACTIVE_TOGGLE;
use crate::shared::metadata::{
    DefaultValue, EntityDescriptor, EntityUiMetadata, ExportStrategy, FieldMetadata,
    SearchStrategy, SelectOption,
};

static APPLIES_TO: &[SelectOption] = &[
    SelectOption {
        value: "all",
        label: "All orders",
    },
    SelectOption {
        value: "first_order",
        label: "First order",
    },
    SelectOption {
        value: "category",
        label: "Drug category",
    },
    SelectOption {
        value: "customer",
        label: "Single customer",
    },
];

static FIELDS: &[FieldMetadata] = &[
    FieldMetadata::integer("applicability_id", "ID").server_assigned(),
    FieldMetadata::text("applicability_name", "Applicability")
        .required("Applicability name is required")
        .length(2, 100)
        .searchable(),
    FieldMetadata::text("applies_to", "Applies to")
        .required("Select where the coupon applies")
        .choices(APPLIES_TO)
        .default_value(DefaultValue::Text("all")),
    FieldMetadata::number("min_order_value", "Minimum order").min(0.0),
    FieldMetadata::boolean("status", "Status")
        .default_value(DefaultValue::Bool(true))
        .hidden_in_form(),
];

pub static DESCRIPTOR: EntityDescriptor = EntityDescriptor {
    entity_index: "a010",
    entity_name: "discount_coupon_applicability",
    resource: "discount-coupon-applicability",
    primary_key: "applicability_id",
    label_field: "applicability_name",
    status: Some(ACTIVE_TOGGLE),
    search: SearchStrategy::Client,
    export: ExportStrategy::ClientCsv,
    supports_import: false,
    ui: EntityUiMetadata {
        element_name: "Coupon applicability",
        list_name: "Coupon applicability",
        icon: Some("ticket"),
    },
    fields: FIELDS,
    dependencies: &[],
};
