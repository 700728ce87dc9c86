//! Client-side mirrors of backend records
//!
//! The backend owns the schema. A `Record` keeps whatever fields it returned;
//! a `Draft` is the editable copy the form works on, plus attached files.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::metadata::EntityDescriptor;

pub type FieldMap = Map<String, Value>;

/// One persisted business entity instance, as last returned by the backend
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(pub FieldMap);

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` unless the value is a JSON object
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn set(&mut self, field: impl Into<String>, value: Value) {
        self.0.insert(field.into(), value);
    }

    /// Primary key normalized to a string (numeric keys are common)
    pub fn id(&self, primary_key: &str) -> Option<String> {
        self.get(primary_key).and_then(value_to_id)
    }

    /// Value rendered for a table cell or CSV column
    pub fn display(&self, field: &str) -> String {
        self.get(field).map(display_value).unwrap_or_default()
    }

    pub fn as_map(&self) -> &FieldMap {
        &self.0
    }

    pub fn into_map(self) -> FieldMap {
        self.0
    }
}

impl From<FieldMap> for Record {
    fn from(map: FieldMap) -> Self {
        Self(map)
    }
}

/// A string or number id; anything else is not addressable
pub fn value_to_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(true) => "Yes".to_string(),
        Value::Bool(false) => "No".to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Binary content picked in a file input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// In-progress edit state of a record, never shown in a list until saved
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Draft {
    values: FieldMap,
    files: BTreeMap<String, FileUpload>,
}

impl Draft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty draft seeded with the descriptor's default values
    pub fn with_defaults(descriptor: &EntityDescriptor) -> Self {
        Self {
            values: descriptor.default_values(),
            files: BTreeMap::new(),
        }
    }

    /// Draft of an existing record. Binary fields hold the backend's URL
    /// until the user attaches a replacement file.
    pub fn from_record(record: &Record) -> Self {
        Self {
            values: record.as_map().clone(),
            files: BTreeMap::new(),
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    pub fn set(&mut self, field: impl Into<String>, value: Value) {
        self.values.insert(field.into(), value);
    }

    pub fn attach_file(&mut self, field: impl Into<String>, upload: FileUpload) {
        self.files.insert(field.into(), upload);
    }

    pub fn file(&self, field: &str) -> Option<&FileUpload> {
        self.files.get(field)
    }

    pub fn files(&self) -> &BTreeMap<String, FileUpload> {
        &self.files
    }

    /// Whether the payload must be sent as multipart/form-data
    pub fn has_files(&self) -> bool {
        !self.files.is_empty()
    }

    pub fn values(&self) -> &FieldMap {
        &self.values
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.files.is_empty()
    }

    /// The value validation sees: an attached file counts as filled in
    pub fn effective_value(&self, field: &str) -> Option<Value> {
        match self.files.get(field) {
            Some(upload) => Some(Value::String(upload.file_name.clone())),
            None => self.values.get(field).cloned(),
        }
    }

    /// Record the backend would hold after saving this draft, used when a
    /// create/update response carries no body
    pub fn to_record(&self) -> Record {
        Record(self.values.clone())
    }
}
