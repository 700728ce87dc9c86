use contracts::shared::record::Record;
use leptos::prelude::*;
use leptos::task::spawn_local;
use serde_json::Value;

use super::super::read_file;
use crate::shared::form_controller::{FormController, FormState, FormStatus, SubmitOutcome};

/// ViewModel of a details form: the controller plus a reactive mirror of
/// its state
#[derive(Clone, Copy)]
pub struct DetailsViewModel {
    controller: StoredValue<FormController, LocalStorage>,
    pub state: RwSignal<FormState>,
    pub file_error: RwSignal<Option<String>>,
}

impl DetailsViewModel {
    pub fn new(controller: FormController) -> Self {
        let state = RwSignal::new(controller.state());
        controller.subscribe(move |s| {
            let _ = state.try_set(s.clone());
        });
        Self {
            controller: StoredValue::new_local(controller),
            state,
            file_error: RwSignal::new(None),
        }
    }

    fn controller(&self) -> FormController {
        self.controller.get_value()
    }

    pub fn is_edit_mode(&self) -> bool {
        self.state.with(|s| s.is_edit())
    }

    pub fn is_submitting(&self) -> bool {
        self.state.with(|s| s.status == FormStatus::Submitting)
    }

    /// Load the record, or seed defaults when `id` is None
    pub fn open(&self, id: Option<String>) {
        let controller = self.controller();
        spawn_local(async move {
            if let Err(e) = controller.open(id.as_deref()).await {
                log::warn!("details form not opened: {}", e);
            }
        });
    }

    pub fn set_field(&self, name: &str, value: Value) {
        self.controller.with_value(|c| c.set_field(name, value));
    }

    /// Change that may re-fetch dependent option sets
    pub fn change_field(&self, name: &'static str, value: Value) {
        let controller = self.controller();
        spawn_local(async move {
            let _ = controller.change_field(name, value).await;
        });
    }

    pub fn validate_field(&self, name: &str) {
        self.controller.with_value(|c| {
            c.validate_field(name);
        });
    }

    pub fn attach_file(&self, name: &'static str, file: web_sys::File) {
        let controller = self.controller();
        let file_error = self.file_error;
        spawn_local(async move {
            match read_file(file).await {
                Ok(upload) => {
                    file_error.set(None);
                    controller.attach_file(name, upload);
                }
                Err(e) => {
                    log::error!("{}", e);
                    file_error.set(Some(e));
                }
            }
        });
    }

    /// Submit; `on_saved` runs only after the backend confirmed
    pub fn save_command(&self, on_saved: Callback<Record>) {
        let controller = self.controller();
        spawn_local(async move {
            if let SubmitOutcome::Saved(record) = controller.submit().await {
                on_saved.run(record);
            }
        });
    }

    pub fn inline_controller(&self, field: &str) -> Option<FormController> {
        self.controller.with_value(|c| c.open_inline_create(field))
    }

    pub fn attach_created(&self, field: &str, record: &Record) {
        self.controller.with_value(|c| {
            c.attach_created_option(field, record);
        });
    }

    pub fn unmount(&self) {
        let _ = self.controller.try_with_value(|c| c.unmount());
    }
}
