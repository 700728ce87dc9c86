use std::collections::BTreeMap;
use std::rc::Rc;

use contracts::shared::api::{
    parse_list_body, parse_single_body, resolve_download_name, ApiError, Download, ErrorKind,
    ImportResult, ListQuery, Page,
};
use contracts::shared::metadata::{EntityDescriptor, FieldType};
use contracts::shared::record::{Draft, FieldMap, FileUpload, Record};
use serde::Serialize;
use serde_json::Value;

use super::transport::{HttpRequest, HttpResponse, Method, MultipartPart, Transport};

const SPREADSHEET_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

#[derive(Serialize)]
struct IdQuery<'a> {
    id: &'a str,
}

/// HTTP access to one REST collection. Holds no state between calls and
/// is cheap to clone, so screens share one per entity.
#[derive(Clone)]
pub struct ResourceClient {
    descriptor: &'static EntityDescriptor,
    transport: Rc<dyn Transport>,
}

impl ResourceClient {
    pub fn new(descriptor: &'static EntityDescriptor, transport: Rc<dyn Transport>) -> Self {
        Self {
            descriptor,
            transport,
        }
    }

    pub fn descriptor(&self) -> &'static EntityDescriptor {
        self.descriptor
    }

    /// Client of another collection over the same transport
    pub fn for_entity(&self, descriptor: &'static EntityDescriptor) -> Self {
        Self::new(descriptor, self.transport.clone())
    }

    pub async fn list(&self, query: &ListQuery) -> Result<Page<Record>, ApiError> {
        let request = HttpRequest::get(self.descriptor.collection_path()).with_query(query)?;
        let response = self.execute(request).await?;
        let body = self.json_body(&response)?;
        parse_list_body(body).map_err(|e| self.malformed(e))
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Record, ApiError> {
        let request = self.addressed(Method::Get, id)?;
        let response = self.execute(request).await?;
        let body = self.json_body(&response)?;
        parse_single_body(body).map_err(|e| self.malformed(e))
    }

    pub async fn create(&self, draft: &Draft) -> Result<Record, ApiError> {
        let request = HttpRequest::new(Method::Post, self.descriptor.collection_path());
        let request = self.with_payload(request, draft);
        let response = self.execute(request).await?;
        self.saved_record(&response, draft)
    }

    pub async fn update(&self, id: &str, draft: &Draft) -> Result<Record, ApiError> {
        let request = self.with_payload(self.addressed(Method::Put, id)?, draft);
        let response = self.execute(request).await?;
        let mut record = self.saved_record(&response, draft)?;
        if record.id(self.descriptor.primary_key).is_none() {
            record.set(self.descriptor.primary_key, Value::String(id.to_string()));
        }
        Ok(record)
    }

    pub async fn remove(&self, id: &str) -> Result<(), ApiError> {
        let request = self.addressed(Method::Delete, id)?;
        self.execute(request).await?;
        Ok(())
    }

    /// Narrow update of the descriptor's status field alone
    pub async fn set_status(&self, id: &str, status: bool) -> Result<Record, ApiError> {
        let toggle = self
            .descriptor
            .status
            .ok_or_else(|| ApiError::unknown("status change is not supported"))?;

        let mut body = FieldMap::new();
        body.insert(toggle.field.to_string(), Value::Bool(status));
        let request = self
            .addressed(Method::Patch, id)?
            .json(Value::Object(body.clone()));
        let response = self.execute(request).await?;

        if response.body.iter().all(u8::is_ascii_whitespace) {
            body.insert(
                self.descriptor.primary_key.to_string(),
                Value::String(id.to_string()),
            );
            return Ok(Record(body));
        }
        let value = self.json_body(&response)?;
        parse_single_body(value).map_err(|e| self.malformed(e))
    }

    pub async fn bulk_import(&self, file: FileUpload) -> Result<ImportResult, ApiError> {
        if !self.descriptor.supports_import {
            return Err(ApiError::unknown(format!(
                "{} cannot be imported",
                self.descriptor.ui.list_name
            )));
        }
        let request = HttpRequest::new(Method::Post, self.descriptor.upload_path())
            .multipart(vec![MultipartPart::File {
                name: "file".to_string(),
                upload: file,
            }]);
        let response = self.execute(request).await?;
        let body: Option<Value> = serde_json::from_slice(&response.body).ok();
        let result = ImportResult::from_body(body.as_ref());
        log::info!(
            "{}: import finished ({})",
            self.descriptor.resource,
            result.summary()
        );
        Ok(result)
    }

    pub async fn bulk_export(&self) -> Result<Download, ApiError> {
        let request = HttpRequest::get(self.descriptor.download_path());
        let response = self.execute(request).await?;
        let fallback = format!("{}.xlsx", self.descriptor.resource);
        Ok(Download {
            file_name: resolve_download_name(response.header("content-disposition"), &fallback),
            content_type: response
                .header("content-type")
                .unwrap_or(SPREADSHEET_TYPE)
                .to_string(),
            bytes: response.body,
        })
    }

    /// Records of a reference collection, optionally narrowed by one
    /// query parameter (`?category=3`)
    pub async fn list_options(
        &self,
        resource: &str,
        filter: Option<(&str, &str)>,
    ) -> Result<Vec<Record>, ApiError> {
        let mut params = BTreeMap::new();
        if let Some((key, value)) = filter {
            params.insert(key, value);
        }
        let request = HttpRequest::get(format!("/api/{}/", resource)).with_query(&params)?;
        let response = self.execute(request).await?;
        let body = self.json_body(&response)?;
        parse_list_body(body)
            .map(|page| page.results)
            .map_err(|e| self.malformed(e))
    }

    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let method = request.method;
        let path = request.path.clone();
        log::debug!("{} {} {}", method, path, request.query);

        let response = self.transport.send(request).await.map_err(|e| {
            log::warn!("{} {} failed: {}", method, path, e);
            ApiError::network(e.to_string())
        })?;

        if response.is_success() {
            Ok(response)
        } else {
            let err = ApiError::from_response(response.status, &response.body);
            log::warn!(
                "{} {} -> {} ({}): {}",
                method,
                path,
                response.status,
                err.kind.as_str(),
                err.message
            );
            Err(err)
        }
    }

    fn addressed(&self, method: Method, id: &str) -> Result<HttpRequest, ApiError> {
        HttpRequest::new(method, self.descriptor.collection_path()).with_query(&IdQuery { id })
    }

    /// JSON when no file is attached, multipart otherwise
    fn with_payload(&self, request: HttpRequest, draft: &Draft) -> HttpRequest {
        let values = self.payload_values(draft);
        if !draft.has_files() {
            return request.json(Value::Object(values));
        }

        let mut parts: Vec<MultipartPart> = values
            .into_iter()
            .filter(|(_, value)| !value.is_null())
            .map(|(name, value)| MultipartPart::Text {
                name,
                value: match value {
                    Value::String(s) => s,
                    other => other.to_string(),
                },
            })
            .collect();
        parts.extend(draft.files().iter().map(|(name, upload)| MultipartPart::File {
            name: name.clone(),
            upload: upload.clone(),
        }));
        request.multipart(parts)
    }

    /// Draft values the backend accepts: declared, shown in the form,
    /// client-owned and not binary. Status goes through `set_status` and a
    /// binary field still holding the stored URL is left untouched.
    fn payload_values(&self, draft: &Draft) -> FieldMap {
        draft
            .values()
            .iter()
            .filter(|(name, _)| {
                self.descriptor.field(name).is_some_and(|f| {
                    f.is_submitted() && f.ui.visible_in_form && f.field_type != FieldType::File
                })
            })
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }

    /// Record echoed by a create/update. An empty body means the backend
    /// confirmed without echoing; the draft is what it stored.
    fn saved_record(&self, response: &HttpResponse, draft: &Draft) -> Result<Record, ApiError> {
        if response.body.iter().all(u8::is_ascii_whitespace) {
            return Ok(draft.to_record());
        }
        let body = self.json_body(response)?;
        let record = parse_single_body(body).map_err(|e| self.malformed(e))?;
        if record.id(self.descriptor.primary_key).is_none() {
            // `{"message": "saved"}` style acknowledgements
            let mut merged = draft.to_record();
            for (key, value) in record.into_map() {
                if self.descriptor.field(&key).is_some() {
                    merged.set(key, value);
                }
            }
            return Ok(merged);
        }
        Ok(record)
    }

    fn json_body(&self, response: &HttpResponse) -> Result<Value, ApiError> {
        serde_json::from_slice(&response.body).map_err(|e| {
            self.malformed(ApiError::malformed(format!("body is not JSON: {}", e)))
        })
    }

    fn malformed(&self, err: ApiError) -> ApiError {
        if err.kind == ErrorKind::MalformedResponse {
            log::error!("{}: malformed response: {}", self.descriptor.resource, err.message);
        }
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::resource::fake::{FakeBackend, Reply};
    use crate::shared::resource::transport::RequestBody;
    use contracts::domain::{a001_department, a003_drug, a006_gst, a011_customer, a012_purchase_entry};
    use contracts::shared::api::ErrorKind;
    use serde_json::json;

    fn department_draft() -> Draft {
        let mut draft = Draft::with_defaults(&a001_department::DESCRIPTOR);
        draft.set("department_name", json!("Pharmacy"));
        draft.set("description", json!("Handles dispensing of drugs to patients"));
        draft
    }

    #[tokio::test]
    async fn test_list_sends_paging_and_search() {
        let backend = FakeBackend::new();
        backend.seed(
            "customer",
            vec![
                json!({"customer_id": 1, "customer_name": "Asha Rao"}),
                json!({"customer_id": 2, "customer_name": "Ravi Kumar"}),
                json!({"customer_id": 3, "customer_name": "Asha Menon"}),
            ],
        );
        let client = backend.client(&a011_customer::DESCRIPTOR);

        let page = client
            .list(&ListQuery::paged(1, 1).with_search("asha"))
            .await
            .unwrap();
        assert_eq!(page.count, 2);
        assert_eq!(page.results.len(), 1);

        let request = backend.last().unwrap();
        assert_eq!(request.path, "/api/customer/");
        assert_eq!(request.query_param("page").as_deref(), Some("1"));
        assert_eq!(request.query_param("search").as_deref(), Some("asha"));
    }

    #[tokio::test]
    async fn test_list_rejects_unexpected_shape() {
        let backend = FakeBackend::new();
        backend.script(
            Method::Get,
            "/api/gst/",
            Reply::Respond(HttpResponse::json(200, &json!({"items": []}))),
        );
        let err = backend
            .client(&a006_gst::DESCRIPTOR)
            .list(&ListQuery::all())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedResponse);

        backend.script(
            Method::Get,
            "/api/gst/",
            Reply::Respond(HttpResponse::new(200, "<html></html>")),
        );
        let err = backend
            .client(&a006_gst::DESCRIPTOR)
            .list(&ListQuery::all())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedResponse);
    }

    #[tokio::test]
    async fn test_network_failure_is_normalized() {
        let backend = FakeBackend::new();
        backend.script(Method::Get, "/api/department/", Reply::NetworkDown);
        let err = backend
            .client(&a001_department::DESCRIPTOR)
            .list(&ListQuery::all())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NetworkError);
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_create_then_get_round_trip() {
        let backend = FakeBackend::new();
        let client = backend.client(&a001_department::DESCRIPTOR);

        let created = client.create(&department_draft()).await.unwrap();
        let id = created.id("department_id").unwrap();

        let request = backend.last().unwrap();
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.content_type(), Some("application/json"));
        assert_eq!(
            request.body,
            RequestBody::Json(json!({
                "department_name": "Pharmacy",
                "description": "Handles dispensing of drugs to patients"
            }))
        );

        let fetched = client.get_by_id(&id).await.unwrap();
        assert_eq!(fetched.get("department_name"), Some(&json!("Pharmacy")));
        assert_eq!(
            fetched.get("description"),
            Some(&json!("Handles dispensing of drugs to patients"))
        );
        assert_eq!(backend.last().unwrap().query_param("id"), Some(id));
    }

    #[tokio::test]
    async fn test_get_missing_record_is_not_found() {
        let backend = FakeBackend::new();
        let err = backend
            .client(&a001_department::DESCRIPTOR)
            .get_by_id("404")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_update_leaves_status_to_patch() {
        let backend = FakeBackend::new();
        backend.seed(
            "department",
            vec![json!({"department_id": 4, "department_name": "Stores", "status": false})],
        );
        let client = backend.client(&a001_department::DESCRIPTOR);
        let mut draft = Draft::from_record(&client.get_by_id("4").await.unwrap());
        draft.set("department_name", json!("Central stores"));

        let record = client.update("4", &draft).await.unwrap();
        assert_eq!(
            backend.last().unwrap().body,
            RequestBody::Json(json!({"department_name": "Central stores"}))
        );
        assert_eq!(record.get("status"), Some(&json!(false)));
    }

    #[tokio::test]
    async fn test_files_switch_to_multipart() {
        let backend = FakeBackend::new();
        let client = backend.client(&a003_drug::DESCRIPTOR);
        let mut draft = Draft::new();
        draft.set("drug_name", json!("Paracetamol"));
        draft.set("mrp", json!(25.5));
        draft.set("image", json!("/media/old.png"));
        draft.attach_file(
            "image",
            FileUpload {
                file_name: "strip.png".to_string(),
                content_type: Some("image/png".to_string()),
                bytes: vec![1, 2, 3],
            },
        );

        let record = client.create(&draft).await.unwrap();
        assert_eq!(record.get("image"), Some(&json!("/media/strip.png")));

        let request = backend.last().unwrap();
        assert_eq!(request.content_type(), Some("multipart/form-data"));
        let RequestBody::Multipart(parts) = request.body else {
            panic!("expected multipart body");
        };
        assert!(parts.contains(&MultipartPart::Text {
            name: "mrp".to_string(),
            value: "25.5".to_string()
        }));
        let files = parts
            .iter()
            .filter(|p| matches!(p, MultipartPart::File { .. }))
            .count();
        assert_eq!(files, 1);
    }

    #[tokio::test]
    async fn test_validation_errors_pass_through() {
        let backend = FakeBackend::new();
        backend.script(
            Method::Post,
            "/api/drug/",
            Reply::Respond(HttpResponse::json(
                400,
                &json!({"hsn": ["HSN code already exists"]}),
            )),
        );
        let err = backend
            .client(&a003_drug::DESCRIPTOR)
            .create(&Draft::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::ValidationError);
        assert_eq!(
            err.field_errors.get("hsn").map(String::as_str),
            Some("HSN code already exists")
        );
    }

    #[tokio::test]
    async fn test_update_and_second_delete() {
        let backend = FakeBackend::new();
        backend.seed(
            "department",
            vec![json!({"department_id": 7, "department_name": "Stores"})],
        );
        let client = backend.client(&a001_department::DESCRIPTOR);

        let mut draft = Draft::new();
        draft.set("department_name", json!("Central stores"));
        draft.set("department_id", json!(7));
        let updated = client.update("7", &draft).await.unwrap();
        assert_eq!(updated.get("department_name"), Some(&json!("Central stores")));
        let request = backend.last().unwrap();
        assert_eq!(request.method, Method::Put);
        // server-assigned key is addressed by query, never sent in the body
        assert_eq!(
            request.body,
            RequestBody::Json(json!({"department_name": "Central stores"}))
        );

        client.remove("7").await.unwrap();
        let err = client.remove("7").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_set_status_sends_only_the_status_field() {
        let backend = FakeBackend::new();
        backend.seed(
            "customer",
            vec![json!({"customer_id": 5, "customer_name": "Asha", "status": true})],
        );
        let client = backend.client(&a011_customer::DESCRIPTOR);

        let record = client.set_status("5", false).await.unwrap();
        assert_eq!(record.get("status"), Some(&json!(false)));

        let request = backend.last().unwrap();
        assert_eq!(request.method, Method::Patch);
        assert_eq!(request.body, RequestBody::Json(json!({"status": false})));

        let err = backend
            .client(&a012_purchase_entry::DESCRIPTOR)
            .set_status("1", true)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unknown);
        assert_eq!(backend.count(Method::Patch), 1);
    }

    #[tokio::test]
    async fn test_bulk_import_and_export() {
        let backend = FakeBackend::new();
        let client = backend.client(&a011_customer::DESCRIPTOR);

        let result = client
            .bulk_import(FileUpload {
                file_name: "customers.xlsx".to_string(),
                content_type: None,
                bytes: vec![0; 8],
            })
            .await
            .unwrap();
        assert_eq!(result.imported, Some(2));
        assert_eq!(backend.last().unwrap().path, "/api/upload-customer/");

        let download = client.bulk_export().await.unwrap();
        assert_eq!(download.file_name, "customer_export.xlsx");
        assert_eq!(download.content_type, SPREADSHEET_TYPE);

        backend.script(
            Method::Get,
            "/api/download-customer/",
            Reply::Respond(HttpResponse::new(200, vec![1, 2])),
        );
        let download = client.bulk_export().await.unwrap();
        assert_eq!(download.file_name, "customer.xlsx");
    }

    #[tokio::test]
    async fn test_list_options_filters_by_parent() {
        let backend = FakeBackend::new();
        backend.seed(
            "sub-category",
            vec![
                json!({"sub_category_id": 1, "sub_category_name": "Analgesic", "category": 1}),
                json!({"sub_category_id": 2, "sub_category_name": "Antacid", "category": 2}),
            ],
        );
        let client = backend.client(&a003_drug::DESCRIPTOR);
        let options = client
            .list_options("sub-category", Some(("category", "2")))
            .await
            .unwrap();
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].display("sub_category_name"), "Antacid");
    }
}
