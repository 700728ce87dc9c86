use crate::shared::metadata::{
    DefaultValue, EntityDescriptor, EntityUiMetadata, ExportStrategy, FieldMetadata,
    SearchStrategy, StatusToggle,
};

static FIELDS: &[FieldMetadata] = &[
    FieldMetadata::integer("kyc_id", "ID").server_assigned(),
    FieldMetadata::reference("customer", "Customer", "customer").required("Select a customer"),
    FieldMetadata::reference("document_type", "Document type", "document_type")
        .required("Select a document type")
        .inline_creatable(),
    FieldMetadata::text("document_number", "Document number")
        .required("Document number is required")
        .length(4, 30)
        .searchable(),
    FieldMetadata::file("document_file", "Document"),
    FieldMetadata::boolean("is_verified", "Verified")
        .default_value(DefaultValue::Bool(false))
        .hidden_in_form(),
];

pub static DESCRIPTOR: EntityDescriptor = EntityDescriptor {
    entity_index: "a008",
    entity_name: "kyc",
    resource: "kyc",
    primary_key: "kyc_id",
    label_field: "document_number",
    status: Some(StatusToggle {
        field: "is_verified",
        on_label: "Verified",
        off_label: "Pending",
        on_action: "Verify",
        off_action: "Revoke verification",
    }),
    search: SearchStrategy::Server,
    export: ExportStrategy::ClientCsv,
    supports_import: false,
    ui: EntityUiMetadata {
        element_name: "KYC document",
        list_name: "KYC",
        icon: Some("id-card"),
    },
    fields: FIELDS,
    dependencies: &[],
};
