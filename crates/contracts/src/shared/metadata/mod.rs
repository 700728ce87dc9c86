//! Metadata types describing the console's entities
//!
//! Every master-data screen is driven by one `EntityDescriptor`: endpoint
//! path, primary key, columns, validation rules and dependent-field rules.
//! All descriptors are compile-time constants with 'static lifetimes.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use contracts::domain::a001_department::DESCRIPTOR;
//!
//! for field in DESCRIPTOR.form_fields() {
//!     println!("{}: {}", field.name, field.ui.label);
//! }
//! ```

mod field_type;
mod types;
mod validation;

pub use field_type::{FieldSource, FieldType};
pub use types::{
    DefaultValue, EntityDescriptor, EntityUiMetadata, ExportStrategy, FieldDependency,
    FieldMetadata, FieldUiMetadata, SearchStrategy, SelectOption, StatusToggle,
};
pub use validation::{as_number, is_blank, ValidationRules};
