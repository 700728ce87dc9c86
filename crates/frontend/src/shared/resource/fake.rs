//! In-memory backend following the REST conventions of the real one

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use async_trait::async_trait;
use contracts::domain;
use contracts::shared::metadata::EntityDescriptor;
use contracts::shared::record::{value_to_id, FieldMap};
use serde_json::{json, Value};
use tokio::sync::Semaphore;

use super::client::ResourceClient;
use super::transport::{
    HttpRequest, HttpResponse, Method, MultipartPart, RequestBody, Transport, TransportError,
};

pub enum Reply {
    Respond(HttpResponse),
    NetworkDown,
}

struct Scripted {
    method: Method,
    path: String,
    reply: Reply,
}

#[derive(Default)]
pub struct FakeBackend {
    collections: RefCell<BTreeMap<String, Vec<FieldMap>>>,
    next_id: Cell<u64>,
    requests: RefCell<Vec<HttpRequest>>,
    scripted: RefCell<Vec<Scripted>>,
    holds: RefCell<Vec<(String, Rc<Semaphore>)>>,
}

fn primary_key(resource: &str) -> &'static str {
    domain::find_by_resource(resource)
        .map(|d| d.primary_key)
        .unwrap_or("id")
}

fn not_found() -> HttpResponse {
    HttpResponse::json(404, &json!({"detail": "Not found."}))
}

impl FakeBackend {
    pub fn new() -> Rc<Self> {
        let backend = Self::default();
        backend.next_id.set(100);
        Rc::new(backend)
    }

    pub fn client(self: &Rc<Self>, descriptor: &'static EntityDescriptor) -> ResourceClient {
        ResourceClient::new(descriptor, self.clone())
    }

    pub fn seed(&self, resource: &str, records: Vec<Value>) {
        let records = records
            .into_iter()
            .filter_map(|v| match v {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .collect();
        self.collections
            .borrow_mut()
            .insert(resource.to_string(), records);
    }

    pub fn records(&self, resource: &str) -> Vec<FieldMap> {
        self.collections
            .borrow()
            .get(resource)
            .cloned()
            .unwrap_or_default()
    }

    /// Answer the next matching request with `reply` instead of the store
    pub fn script(&self, method: Method, path: &str, reply: Reply) {
        self.scripted.borrow_mut().push(Scripted {
            method,
            path: path.to_string(),
            reply,
        });
    }

    /// Requests whose query contains `fragment` wait for a permit
    pub fn hold(&self, fragment: &str) -> Rc<Semaphore> {
        let gate = Rc::new(Semaphore::new(0));
        self.holds
            .borrow_mut()
            .push((fragment.to_string(), gate.clone()));
        gate
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }

    pub fn count(&self, method: Method) -> usize {
        self.requests
            .borrow()
            .iter()
            .filter(|r| r.method == method)
            .count()
    }

    pub fn last(&self) -> Option<HttpRequest> {
        self.requests.borrow().last().cloned()
    }

    fn take_scripted(&self, request: &HttpRequest) -> Option<Reply> {
        let mut scripted = self.scripted.borrow_mut();
        let index = scripted
            .iter()
            .position(|s| s.method == request.method && s.path == request.path)?;
        Some(scripted.remove(index).reply)
    }

    fn gate_for(&self, request: &HttpRequest) -> Option<Rc<Semaphore>> {
        self.holds
            .borrow()
            .iter()
            .find(|(fragment, _)| request.query.contains(fragment.as_str()))
            .map(|(_, gate)| gate.clone())
    }

    fn body_values(body: &RequestBody) -> FieldMap {
        match body {
            RequestBody::Json(Value::Object(map)) => map.clone(),
            RequestBody::Multipart(parts) => parts
                .iter()
                .map(|part| match part {
                    MultipartPart::Text { name, value } => {
                        (name.clone(), Value::String(value.clone()))
                    }
                    MultipartPart::File { name, upload } => (
                        name.clone(),
                        Value::String(format!("/media/{}", upload.file_name)),
                    ),
                })
                .collect(),
            _ => FieldMap::new(),
        }
    }

    fn handle(&self, request: &HttpRequest) -> HttpResponse {
        let segment = request.path.trim_start_matches("/api/").trim_end_matches('/');

        if let Some(resource) = segment.strip_prefix("upload-") {
            let count = match &request.body {
                RequestBody::Multipart(parts) => parts.len() as u64,
                _ => 0,
            };
            log::debug!("fake import into {}", resource);
            return HttpResponse::json(200, &json!({"imported": count * 2, "rejected": 0}));
        }
        if let Some(resource) = segment.strip_prefix("download-") {
            return HttpResponse::new(200, b"PK\x03\x04".to_vec())
                .with_header(
                    "Content-Disposition",
                    &format!("attachment; filename=\"{}_export.xlsx\"", resource),
                );
        }

        let resource = segment.to_string();
        let pk = primary_key(&resource);
        let id = request.query_param("id");
        let mut collections = self.collections.borrow_mut();
        let records = collections.entry(resource).or_default();
        let position = |records: &Vec<FieldMap>, id: &str| {
            records
                .iter()
                .position(|r| r.get(pk).and_then(value_to_id).as_deref() == Some(id))
        };

        match (request.method, id) {
            (Method::Get, Some(id)) => match position(records, &id) {
                Some(i) => HttpResponse::json(200, &Value::Object(records[i].clone())),
                None => not_found(),
            },
            (Method::Get, None) => self.list(request, records),
            (Method::Post, _) => {
                let mut record = Self::body_values(&request.body);
                let id = self.next_id.get();
                self.next_id.set(id + 1);
                record.insert(pk.to_string(), json!(id));
                records.push(record.clone());
                HttpResponse::json(201, &Value::Object(record))
            }
            (Method::Put | Method::Patch, Some(id)) => match position(records, &id) {
                Some(i) => {
                    for (key, value) in Self::body_values(&request.body) {
                        records[i].insert(key, value);
                    }
                    HttpResponse::json(200, &Value::Object(records[i].clone()))
                }
                None => not_found(),
            },
            (Method::Delete, Some(id)) => match position(records, &id) {
                Some(i) => {
                    records.remove(i);
                    HttpResponse::new(204, Vec::new())
                }
                None => not_found(),
            },
            _ => HttpResponse::json(405, &json!({"detail": "Method not allowed"})),
        }
    }

    fn list(&self, request: &HttpRequest, records: &[FieldMap]) -> HttpResponse {
        let search = request.query_param("search").map(|s| s.to_lowercase());
        let filters: Vec<(String, String)> = request
            .query
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .filter(|(key, _)| !["page", "page_size", "search", "id"].contains(key))
            .filter_map(|(key, _)| request.query_param(key).map(|v| (key.to_string(), v)))
            .collect();

        let matching: Vec<&FieldMap> = records
            .iter()
            .filter(|record| {
                search.as_ref().map_or(true, |term| {
                    record.values().any(|v| match v {
                        Value::String(s) => s.to_lowercase().contains(term),
                        _ => false,
                    })
                })
            })
            .filter(|record| {
                filters.iter().all(|(key, value)| {
                    record.get(key).and_then(value_to_id).as_deref() == Some(value.as_str())
                })
            })
            .collect();

        let count = matching.len();
        let page = request.query_param("page").and_then(|p| p.parse::<usize>().ok());
        let size = request
            .query_param("page_size")
            .and_then(|p| p.parse::<usize>().ok());
        let results: Vec<Value> = match (page, size) {
            (Some(page), Some(size)) => matching
                .into_iter()
                .skip((page.max(1) - 1) * size)
                .take(size)
                .map(|r| Value::Object(r.clone()))
                .collect(),
            _ => matching.into_iter().map(|r| Value::Object(r.clone())).collect(),
        };
        HttpResponse::json(200, &json!({"count": count, "results": results}))
    }
}

#[async_trait(?Send)]
impl Transport for FakeBackend {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.borrow_mut().push(request.clone());

        if let Some(gate) = self.gate_for(&request) {
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }

        match self.take_scripted(&request) {
            Some(Reply::Respond(response)) => Ok(response),
            Some(Reply::NetworkDown) => Err(TransportError::Send("connection refused".into())),
            None => Ok(self.handle(&request)),
        }
    }
}
