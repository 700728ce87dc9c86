//! Access to the backend's REST collections

pub mod browser;
pub mod client;
#[cfg(test)]
pub mod fake;
pub mod transport;

pub use browser::GlooTransport;
pub use client::ResourceClient;
pub use transport::{
    HttpRequest, HttpResponse, Method, MultipartPart, RequestBody, Transport, TransportError,
};
