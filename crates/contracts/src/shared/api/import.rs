use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outcome of a spreadsheet upload. Counts are only known when the
/// backend reports them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportResult {
    pub imported: Option<u64>,
    pub rejected: Option<u64>,
    #[serde(default)]
    pub errors: Vec<String>,
}

impl ImportResult {
    /// Read the counters from whichever key names the backend used
    pub fn from_body(body: Option<&Value>) -> Self {
        let map = match body {
            Some(Value::Object(map)) => map,
            _ => return Self::default(),
        };

        let count_of = |keys: &[&str]| {
            keys.iter()
                .find_map(|k| map.get(*k))
                .and_then(|v| match v {
                    Value::Number(n) => n.as_u64(),
                    Value::Array(items) => Some(items.len() as u64),
                    _ => None,
                })
        };

        let errors = ["errors", "rejected_rows", "failed_rows"]
            .iter()
            .find_map(|k| map.get(*k))
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .map(|item| match item {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            imported: count_of(&["imported", "created", "success_count", "inserted"]),
            rejected: count_of(&["rejected", "failed", "error_count", "skipped"]),
            errors,
        }
    }

    /// One-line summary for the success notification
    pub fn summary(&self) -> String {
        match (self.imported, self.rejected) {
            (Some(ok), Some(bad)) => format!("Imported {} rows, rejected {}", ok, bad),
            (Some(ok), None) => format!("Imported {} rows", ok),
            (None, Some(bad)) => format!("Import finished, {} rows rejected", bad),
            (None, None) => "Import finished".to_string(),
        }
    }
}
