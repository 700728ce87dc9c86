use async_trait::async_trait;
use gloo_net::http::{Request, RequestBuilder, Response};
use wasm_bindgen::JsValue;
use web_sys::{Blob, BlobPropertyBag, FormData};

use super::transport::{
    HttpRequest, HttpResponse, Method, MultipartPart, RequestBody, Transport, TransportError,
};
use crate::shared::api_utils::api_base;

/// `Transport` over the browser's fetch API
#[derive(Debug, Clone)]
pub struct GlooTransport {
    base_url: String,
}

impl GlooTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Backend selected by the build configuration or the page location
    pub fn from_env() -> Self {
        Self::new(api_base())
    }

    fn builder(&self, request: &HttpRequest) -> RequestBuilder {
        let url = request.url(&self.base_url);
        match request.method {
            Method::Get => Request::get(&url),
            Method::Post => Request::post(&url),
            Method::Put => Request::put(&url),
            Method::Patch => Request::patch(&url),
            Method::Delete => Request::delete(&url),
        }
    }
}

fn js_err(e: JsValue) -> TransportError {
    TransportError::Build(format!("{:?}", e))
}

fn form_data(parts: &[MultipartPart]) -> Result<FormData, TransportError> {
    let form = FormData::new().map_err(js_err)?;
    for part in parts {
        match part {
            MultipartPart::Text { name, value } => {
                form.append_with_str(name, value).map_err(js_err)?;
            }
            MultipartPart::File { name, upload } => {
                let array = js_sys::Array::new();
                array.push(&js_sys::Uint8Array::from(upload.bytes.as_slice()));
                let properties = BlobPropertyBag::new();
                if let Some(content_type) = &upload.content_type {
                    properties.set_type(content_type);
                }
                let blob = Blob::new_with_u8_array_sequence_and_options(&array, &properties)
                    .map_err(js_err)?;
                form.append_with_blob_and_filename(name, &blob, &upload.file_name)
                    .map_err(js_err)?;
            }
        }
    }
    Ok(form)
}

async fn read_response(response: Response) -> Result<HttpResponse, TransportError> {
    let status = response.status();
    let headers = response.headers().entries().collect();
    let body = response
        .binary()
        .await
        .map_err(|e| TransportError::Read(e.to_string()))?;
    Ok(HttpResponse {
        status,
        headers,
        body,
    })
}

#[async_trait(?Send)]
impl Transport for GlooTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let builder = self.builder(&request);
        let prepared = match &request.body {
            RequestBody::Empty => builder.build(),
            RequestBody::Json(value) => builder.json(value),
            // no Content-Type header: the browser adds it with the boundary
            RequestBody::Multipart(parts) => builder.body(form_data(parts)?),
        }
        .map_err(|e| TransportError::Build(e.to_string()))?;

        let response = prepared
            .send()
            .await
            .map_err(|e| TransportError::Send(e.to_string()))?;
        read_response(response).await
    }
}
