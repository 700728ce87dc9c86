//! Field type enumeration for metadata system

/// Kind of value a field holds, which also selects its form widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldType {
    #[default]
    Text,
    LongText,
    Email,
    Number,
    Integer,
    Boolean,
    /// ISO date, `YYYY-MM-DD`
    Date,
    /// Primary key of a record in another collection
    Reference,
    /// Binary upload (image, scanned document); forces a multipart payload
    File,
}

impl FieldType {
    pub fn is_binary(&self) -> bool {
        matches!(self, Self::File)
    }
}

/// Who owns the value of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldSource {
    /// Entered by the user and sent in create/update payloads
    #[default]
    Editable,
    /// Assigned by the backend (primary key, timestamps); never sent back
    Server,
    /// Computed on the client from other fields; sent, but not typed in
    Derived,
}
