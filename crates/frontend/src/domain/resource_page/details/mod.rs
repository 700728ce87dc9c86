pub mod view;
pub mod view_model;

use contracts::shared::metadata::EntityDescriptor;
use contracts::shared::record::Record;
use leptos::prelude::*;

pub use view::DetailsForm;

use super::{confirmation_gate, resource_client};
use crate::shared::form_controller::FormController;

/// Create (`id` None) or edit form of one entity
#[component]
pub fn ResourceDetails(
    descriptor: &'static EntityDescriptor,
    id: Option<String>,
    on_saved: Callback<Record>,
    on_cancel: Callback<()>,
) -> impl IntoView {
    let controller = FormController::new(resource_client(descriptor), confirmation_gate());
    view! {
        <DetailsForm controller=controller id=id on_saved=on_saved on_cancel=on_cancel />
    }
}
