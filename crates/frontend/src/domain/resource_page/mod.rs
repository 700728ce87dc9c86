//! List and details screens shared by every entity of the registry
pub mod details;
pub mod list;

use std::rc::Rc;

use contracts::shared::metadata::EntityDescriptor;
use contracts::shared::record::FileUpload;
use leptos::prelude::*;
use wasm_bindgen_futures::JsFuture;

use crate::shared::gate::{BrowserConfirm, ConfirmationGate};
use crate::shared::notifications::NotificationCenter;
use crate::shared::resource::{GlooTransport, ResourceClient};

pub fn resource_client(descriptor: &'static EntityDescriptor) -> ResourceClient {
    ResourceClient::new(descriptor, Rc::new(GlooTransport::from_env()))
}

pub fn confirmation_gate() -> ConfirmationGate {
    let center = use_context::<NotificationCenter>().unwrap_or_else(|| {
        log::warn!("NotificationCenter not provided; notifications are not shown");
        NotificationCenter::new()
    });
    ConfirmationGate::new(Rc::new(BrowserConfirm), Rc::new(center))
}

/// First file picked in a file input
pub fn selected_file(ev: &web_sys::Event) -> Option<web_sys::File> {
    let input = event_target::<web_sys::HtmlInputElement>(ev);
    input.files()?.get(0)
}

/// Clear a file input so picking the same file again fires `change`
pub fn reset_file_input(ev: &web_sys::Event) {
    event_target::<web_sys::HtmlInputElement>(ev).set_value("");
}

pub async fn read_file(file: web_sys::File) -> Result<FileUpload, String> {
    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| format!("Failed to read {}: {:?}", file.name(), e))?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
    let content_type = Some(file.type_()).filter(|t| !t.is_empty());
    Ok(FileUpload {
        file_name: file.name(),
        content_type,
        bytes,
    })
}
