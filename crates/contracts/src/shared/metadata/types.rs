//! Core metadata types for the console's entities
//!
//! All types use 'static lifetimes for zero-cost compile-time constants.
//! Descriptors are assembled with the `const fn` builders on `FieldMetadata`.

use serde_json::{Map, Value};

use super::field_type::{FieldSource, FieldType};
use super::validation::ValidationRules;

// ============================================================================
// Entity-level metadata
// ============================================================================

/// Describes one REST collection and the screens built on it
#[derive(Debug, Clone, Copy)]
pub struct EntityDescriptor {
    /// Stable index used for ordering in the menu ("a001")
    pub entity_index: &'static str,
    /// Registry key, also used by `FieldMetadata::ref_entity`
    pub entity_name: &'static str,
    /// Path segment of the collection: `/api/<resource>/`
    pub resource: &'static str,
    /// Name of the primary-key field in backend records
    pub primary_key: &'static str,
    /// Field shown as the option label when this entity is referenced
    pub label_field: &'static str,
    pub status: Option<StatusToggle>,
    pub search: SearchStrategy,
    pub export: ExportStrategy,
    /// Whether `/api/upload-<resource>/` exists
    pub supports_import: bool,
    pub ui: EntityUiMetadata,
    pub fields: &'static [FieldMetadata],
    pub dependencies: &'static [FieldDependency],
}

impl EntityDescriptor {
    pub fn field(&self, name: &str) -> Option<&'static FieldMetadata> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Fields rendered as list columns, in declaration order
    pub fn list_fields(&self) -> impl Iterator<Item = &'static FieldMetadata> {
        self.fields.iter().filter(|f| f.ui.visible_in_list)
    }

    /// Fields rendered in the details form, in declaration order
    pub fn form_fields(&self) -> impl Iterator<Item = &'static FieldMetadata> {
        self.fields.iter().filter(|f| f.ui.visible_in_form)
    }

    /// Fields matched by client-side search
    pub fn searchable_fields(&self) -> impl Iterator<Item = &'static FieldMetadata> {
        self.fields.iter().filter(|f| f.ui.searchable)
    }

    pub fn has_binary_fields(&self) -> bool {
        self.fields.iter().any(|f| f.field_type.is_binary())
    }

    /// Draft values a new record starts from
    pub fn default_values(&self) -> Map<String, Value> {
        self.fields
            .iter()
            .filter_map(|f| f.default.to_value().map(|v| (f.name.to_string(), v)))
            .collect()
    }

    pub fn collection_path(&self) -> String {
        format!("/api/{}/", self.resource)
    }

    pub fn upload_path(&self) -> String {
        format!("/api/upload-{}/", self.resource)
    }

    pub fn download_path(&self) -> String {
        format!("/api/download-{}/", self.resource)
    }
}

/// UI metadata for entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityUiMetadata {
    pub element_name: &'static str,
    pub list_name: &'static str,
    pub icon: Option<&'static str>,
}

/// Where the list screen's search happens. Fixed per entity so one screen
/// never mixes the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStrategy {
    /// Re-query the backend with the `search` parameter
    Server,
    /// Fetch the whole collection once and filter it in memory
    Client,
}

/// How "export" produces its file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportStrategy {
    /// `GET /api/download-<resource>/`
    Server,
    /// CSV built from the current Collection Snapshot
    ClientCsv,
}

/// A boolean field toggled by a dedicated action (publish, block, verify)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusToggle {
    pub field: &'static str,
    /// Label of the `true` state ("Active", "Published")
    pub on_label: &'static str,
    pub off_label: &'static str,
    /// Action that sets `true` ("Activate", "Publish")
    pub on_action: &'static str,
    pub off_action: &'static str,
}

impl StatusToggle {
    pub fn label(&self, status: bool) -> &'static str {
        if status {
            self.on_label
        } else {
            self.off_label
        }
    }

    /// Action that moves a record INTO the given status
    pub fn action(&self, status: bool) -> &'static str {
        if status {
            self.on_action
        } else {
            self.off_action
        }
    }
}

/// A change of `source` that must be reflected in other fields
#[derive(Debug, Clone, Copy)]
pub enum FieldDependency {
    /// Overwrite the fields returned by `compute` whenever `source` changes
    Derived {
        source: &'static str,
        compute: fn(&Map<String, Value>) -> Vec<(&'static str, Value)>,
    },
    /// Re-fetch the option set of `target` filtered by the value of `source`
    Options {
        source: &'static str,
        target: &'static str,
        /// Collection path segment of the option records
        resource: &'static str,
        /// Query parameter carrying the source value
        filter_param: &'static str,
        value_field: &'static str,
        label_field: &'static str,
    },
}

impl FieldDependency {
    pub fn source(&self) -> &'static str {
        match self {
            Self::Derived { source, .. } | Self::Options { source, .. } => source,
        }
    }
}

// ============================================================================
// Field-level metadata
// ============================================================================

/// A fixed choice of a select-like field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
}

/// Initial value of a field in a new Draft
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DefaultValue {
    #[default]
    None,
    Bool(bool),
    Text(&'static str),
    Number(f64),
}

impl DefaultValue {
    pub fn to_value(&self) -> Option<Value> {
        match self {
            Self::None => None,
            Self::Bool(b) => Some(Value::Bool(*b)),
            Self::Text(s) => Some(Value::String((*s).to_string())),
            Self::Number(n) => serde_json::Number::from_f64(*n).map(Value::Number),
        }
    }
}

/// Metadata for a single field
/// Copy trait enabled for efficient passing by value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldMetadata {
    pub name: &'static str,
    pub field_type: FieldType,
    pub source: FieldSource,
    pub ui: FieldUiMetadata,
    pub validation: ValidationRules,
    /// Referenced entity (`EntityDescriptor::entity_name`) for `Reference`
    pub ref_entity: Option<&'static str>,
    /// Whether a missing option may be created from inside the form
    pub inline_create: bool,
    pub choices: Option<&'static [SelectOption]>,
    pub default: DefaultValue,
}

/// UI metadata for a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldUiMetadata {
    pub label: &'static str,
    pub placeholder: Option<&'static str>,
    pub visible_in_list: bool,
    pub visible_in_form: bool,
    pub read_only: bool,
    pub searchable: bool,
    pub column_width: Option<u32>,
}

/// Default values for FieldUiMetadata
impl Default for FieldUiMetadata {
    fn default() -> Self {
        Self::labelled("")
    }
}

impl FieldUiMetadata {
    pub const fn labelled(label: &'static str) -> Self {
        Self {
            label,
            placeholder: None,
            visible_in_list: true,
            visible_in_form: true,
            read_only: false,
            searchable: false,
            column_width: None,
        }
    }
}

impl FieldMetadata {
    pub const fn new(name: &'static str, field_type: FieldType, label: &'static str) -> Self {
        Self {
            name,
            field_type,
            source: FieldSource::Editable,
            ui: FieldUiMetadata::labelled(label),
            validation: ValidationRules::none(),
            ref_entity: None,
            inline_create: false,
            choices: None,
            default: DefaultValue::None,
        }
    }

    pub const fn text(name: &'static str, label: &'static str) -> Self {
        Self::new(name, FieldType::Text, label)
    }

    pub const fn long_text(name: &'static str, label: &'static str) -> Self {
        Self::new(name, FieldType::LongText, label).hidden_in_list()
    }

    pub const fn email(name: &'static str, label: &'static str) -> Self {
        Self::new(name, FieldType::Email, label)
    }

    pub const fn number(name: &'static str, label: &'static str) -> Self {
        Self::new(name, FieldType::Number, label)
    }

    pub const fn integer(name: &'static str, label: &'static str) -> Self {
        Self::new(name, FieldType::Integer, label)
    }

    pub const fn boolean(name: &'static str, label: &'static str) -> Self {
        Self::new(name, FieldType::Boolean, label)
    }

    pub const fn date(name: &'static str, label: &'static str) -> Self {
        Self::new(name, FieldType::Date, label)
    }

    pub const fn file(name: &'static str, label: &'static str) -> Self {
        Self::new(name, FieldType::File, label).hidden_in_list()
    }

    pub const fn reference(
        name: &'static str,
        label: &'static str,
        entity: &'static str,
    ) -> Self {
        Self {
            ref_entity: Some(entity),
            ..Self::new(name, FieldType::Reference, label)
        }
    }

    /// Primary key and other backend-assigned values
    pub const fn server_assigned(self) -> Self {
        Self {
            source: FieldSource::Server,
            ui: FieldUiMetadata {
                visible_in_form: false,
                ..self.ui
            },
            ..self
        }
    }

    /// Shown in the form but recomputed by a `FieldDependency::Derived`
    pub const fn derived(self) -> Self {
        Self {
            source: FieldSource::Derived,
            ui: FieldUiMetadata {
                read_only: true,
                ..self.ui
            },
            ..self
        }
    }

    pub const fn required(self, message: &'static str) -> Self {
        Self {
            validation: ValidationRules {
                required: true,
                required_error: Some(message),
                ..self.validation
            },
            ..self
        }
    }

    pub const fn length(self, min: usize, max: usize) -> Self {
        Self {
            validation: ValidationRules {
                min_length: Some(min),
                max_length: Some(max),
                ..self.validation
            },
            ..self
        }
    }

    pub const fn max_length(self, max: usize) -> Self {
        Self {
            validation: ValidationRules {
                max_length: Some(max),
                ..self.validation
            },
            ..self
        }
    }

    pub const fn range(self, min: f64, max: f64) -> Self {
        Self {
            validation: ValidationRules {
                min: Some(min),
                max: Some(max),
                ..self.validation
            },
            ..self
        }
    }

    pub const fn min(self, min: f64) -> Self {
        Self {
            validation: ValidationRules {
                min: Some(min),
                ..self.validation
            },
            ..self
        }
    }

    pub const fn pattern(self, pattern: &'static str, message: &'static str) -> Self {
        Self {
            validation: ValidationRules {
                pattern: Some(pattern),
                custom_error: Some(message),
                ..self.validation
            },
            ..self
        }
    }

    pub const fn hidden_in_list(self) -> Self {
        Self {
            ui: FieldUiMetadata {
                visible_in_list: false,
                ..self.ui
            },
            ..self
        }
    }

    /// Kept out of the form; the value comes from defaults or a dedicated action
    pub const fn hidden_in_form(self) -> Self {
        Self {
            ui: FieldUiMetadata {
                visible_in_form: false,
                ..self.ui
            },
            ..self
        }
    }

    pub const fn searchable(self) -> Self {
        Self {
            ui: FieldUiMetadata {
                searchable: true,
                ..self.ui
            },
            ..self
        }
    }

    pub const fn placeholder(self, placeholder: &'static str) -> Self {
        Self {
            ui: FieldUiMetadata {
                placeholder: Some(placeholder),
                ..self.ui
            },
            ..self
        }
    }

    pub const fn width(self, px: u32) -> Self {
        Self {
            ui: FieldUiMetadata {
                column_width: Some(px),
                ..self.ui
            },
            ..self
        }
    }

    pub const fn inline_creatable(self) -> Self {
        Self {
            inline_create: true,
            ..self
        }
    }

    pub const fn choices(self, choices: &'static [SelectOption]) -> Self {
        Self {
            choices: Some(choices),
            ..self
        }
    }

    pub const fn default_value(self, default: DefaultValue) -> Self {
        Self { default, ..self }
    }

    /// Whether the value belongs in create/update payloads
    pub fn is_submitted(&self) -> bool {
        self.source != FieldSource::Server
    }

    /// Validate the draft value of this field
    pub fn validate(&self, value: Option<&Value>) -> Result<(), String> {
        self.validation
            .validate(self.field_type, value, self.ui.label)
    }
}
