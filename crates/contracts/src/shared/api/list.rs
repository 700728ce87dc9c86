use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::ApiError;
use crate::shared::record::Record;

pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Query parameters of a list request; unset values are omitted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl ListQuery {
    /// Whole collection, no paging
    pub fn all() -> Self {
        Self::default()
    }

    /// Pages are 1-based on the wire; page 0 is clamped to 1
    pub fn paged(page: u32, page_size: u32) -> Self {
        Self {
            page: Some(page.max(1)),
            page_size: Some(page_size.max(1)),
            search: None,
        }
    }

    /// Blank terms are dropped so the backend never sees `search=`
    pub fn with_search(mut self, term: &str) -> Self {
        let term = term.trim();
        self.search = if term.is_empty() {
            None
        } else {
            Some(term.to_string())
        };
        self
    }
}

/// One page of a collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Total matching records on the server, not just this page
    pub count: u64,
    pub results: Vec<T>,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            count: 0,
            results: Vec::new(),
        }
    }
}

/// `{ "data": ... }` envelopes wrap some responses
fn unwrap_envelope(body: Value) -> Value {
    match body {
        Value::Object(mut map) if !map.contains_key("results") => match map.remove("data") {
            Some(inner @ (Value::Object(_) | Value::Array(_))) => inner,
            Some(other) => {
                map.insert("data".to_string(), other);
                Value::Object(map)
            }
            None => Value::Object(map),
        },
        other => other,
    }
}

fn records_from(items: Vec<Value>) -> Result<Vec<Record>, ApiError> {
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            Record::from_value(item)
                .ok_or_else(|| ApiError::malformed(format!("results[{}] is not an object", i)))
        })
        .collect()
}

/// Accepts `{count, results: [...]}` or a bare `[...]`
pub fn parse_list_body(body: Value) -> Result<Page<Record>, ApiError> {
    match unwrap_envelope(body) {
        Value::Array(items) => {
            let results = records_from(items)?;
            Ok(Page {
                count: results.len() as u64,
                results,
            })
        }
        Value::Object(mut map) => {
            let results = match map.remove("results") {
                Some(Value::Array(items)) => records_from(items)?,
                Some(_) => return Err(ApiError::malformed("`results` is not a list")),
                None => return Err(ApiError::malformed("response has no `results` list")),
            };
            let count = match map.get("count") {
                Some(value) => value
                    .as_u64()
                    .ok_or_else(|| ApiError::malformed("`count` is not a non-negative integer"))?,
                None => results.len() as u64,
            };
            Ok(Page { count, results })
        }
        _ => Err(ApiError::malformed("expected a list or a page object")),
    }
}

/// Body of a by-id fetch. The query-parameter addressing makes some
/// backends answer with a one-element list instead of the object itself.
pub fn parse_single_body(body: Value) -> Result<Record, ApiError> {
    let body = unwrap_envelope(body);
    let is_page = matches!(&body, Value::Object(map) if map.contains_key("results"));
    let items = if is_page {
        parse_list_body(body)?.results
    } else {
        match body {
            Value::Object(map) => return Ok(Record(map)),
            Value::Array(items) => records_from(items)?,
            _ => return Err(ApiError::malformed("expected a record object")),
        }
    };

    let mut items = items.into_iter();
    match (items.next(), items.next()) {
        (Some(record), None) => Ok(record),
        (None, _) => Err(ApiError::not_found("Record not found")),
        (Some(_), Some(_)) => Err(ApiError::malformed("expected one record, got several")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::api::ErrorKind;
    use serde_json::json;

    #[test]
    fn test_paginated_body() {
        let page = parse_list_body(json!({
            "count": 42,
            "next": null,
            "results": [{"gst_id": 1}, {"gst_id": 2}]
        }))
        .unwrap();
        assert_eq!(page.count, 42);
        assert_eq!(page.results.len(), 2);
    }

    #[test]
    fn test_bare_list_and_envelope() {
        let page = parse_list_body(json!([{"drug_id": 1}])).unwrap();
        assert_eq!(page.count, 1);

        let page = parse_list_body(json!({"status": true, "data": [{"drug_id": 1}, {"drug_id": 2}]}))
            .unwrap();
        assert_eq!(page.count, 2);
    }

    #[test]
    fn test_malformed_shapes() {
        for body in [
            json!({"count": 1}),
            json!({"results": {"a": 1}}),
            json!("nope"),
            json!([1, 2]),
            json!({"count": -1, "results": []}),
        ] {
            let err = parse_list_body(body).unwrap_err();
            assert_eq!(err.kind, ErrorKind::MalformedResponse);
        }
    }

    #[test]
    fn test_single_body_unwraps_lists() {
        let record = parse_single_body(json!({"department_id": 3})).unwrap();
        assert_eq!(record.id("department_id"), Some("3".to_string()));

        let record = parse_single_body(json!({"count": 1, "results": [{"department_id": 4}]})).unwrap();
        assert_eq!(record.id("department_id"), Some("4".to_string()));

        let err = parse_single_body(json!([])).unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);

        let err = parse_single_body(json!([{"a": 1}, {"a": 2}])).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedResponse);
    }

    #[test]
    fn test_query_builders() {
        let query = ListQuery::paged(0, 25).with_search("  para ");
        assert_eq!(query.page, Some(1));
        assert_eq!(query.page_size, Some(25));
        assert_eq!(query.search.as_deref(), Some("para"));
        assert_eq!(ListQuery::all().with_search("   ").search, None);
    }
}
