use crate::shared::metadata::{
    EntityDescriptor, EntityUiMetadata, ExportStrategy, FieldMetadata, SearchStrategy,
};

static FIELDS: &[FieldMetadata] = &[
    FieldMetadata::integer("purchase_entry_id", "ID").server_assigned(),
    FieldMetadata::text("invoice_number", "Invoice")
        .required("Invoice number is required")
        .max_length(50)
        .searchable(),
    FieldMetadata::date("invoice_date", "Invoice date").required("Invoice date is required"),
    FieldMetadata::text("supplier_name", "Supplier")
        .required("Supplier is required")
        .max_length(150)
        .searchable(),
    FieldMetadata::reference("drug", "Drug", "drug").required("Select a drug"),
    FieldMetadata::text("batch_number", "Batch")
        .required("Batch number is required")
        .max_length(30)
        .searchable(),
    FieldMetadata::date("expiry_date", "Expiry").required("Expiry date is required"),
    FieldMetadata::integer("quantity", "Quantity")
        .required("Quantity is required")
        .min(1.0),
    FieldMetadata::number("purchase_rate", "Rate")
        .required("Purchase rate is required")
        .min(0.0),
    FieldMetadata::number("mrp", "MRP").min(0.0),
    FieldMetadata::file("invoice_file", "Invoice scan"),
];

pub static DESCRIPTOR: EntityDescriptor = EntityDescriptor {
    entity_index: "a012",
    entity_name: "purchase_entry",
    resource: "purchase-entry",
    primary_key: "purchase_entry_id",
    label_field: "invoice_number",
    status: None,
    search: SearchStrategy::Server,
    export: ExportStrategy::Server,
    supports_import: true,
    ui: EntityUiMetadata {
        element_name: "Purchase entry",
        list_name: "Purchase entries",
        icon: Some("truck"),
    },
    fields: FIELDS,
    dependencies: &[],
};
