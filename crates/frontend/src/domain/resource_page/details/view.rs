use contracts::shared::metadata::{FieldMetadata, FieldType};
use contracts::shared::record::{display_value, Record};
use leptos::prelude::*;
use serde_json::Value;
use thaw::*;

use super::super::{reset_file_input, selected_file};
use super::view_model::DetailsViewModel;
use crate::shared::date_utils::to_input_date;
use crate::shared::form_controller::{FormController, FormStatus};
use crate::shared::icons::icon;
use crate::shared::modal::Modal;

fn text_value(vm: DetailsViewModel, name: &'static str) -> String {
    vm.state
        .with(|s| s.draft.get(name).map(display_value).unwrap_or_default())
}

fn field_error(vm: DetailsViewModel, name: &'static str) -> impl IntoView {
    move || {
        vm.state.with(|s| {
            s.error(name)
                .map(|e| view! { <div class="form__error">{e.to_string()}</div> })
        })
    }
}

fn text_input(vm: DetailsViewModel, field: &'static FieldMetadata) -> AnyView {
    let name = field.name;
    let input_type = match field.field_type {
        FieldType::Email => "email",
        FieldType::Number | FieldType::Integer => "number",
        FieldType::Date => "date",
        _ => "text",
    };
    let step = match field.field_type {
        FieldType::Number => Some("any"),
        _ => None,
    };
    let value = move || {
        let text = text_value(vm, name);
        if field.field_type == FieldType::Date {
            to_input_date(&text)
        } else {
            text
        }
    };
    view! {
        <input
            class="form__input"
            type=input_type
            step=step
            id=name
            placeholder=field.ui.placeholder.unwrap_or_default()
            disabled=field.ui.read_only
            prop:value=value
            on:input=move |ev| vm.set_field(name, Value::String(event_target_value(&ev)))
            on:blur=move |_| vm.validate_field(name)
        />
    }
    .into_any()
}

fn long_text_input(vm: DetailsViewModel, field: &'static FieldMetadata) -> AnyView {
    let name = field.name;
    view! {
        <textarea
            class="form__textarea"
            id=name
            rows=3
            placeholder=field.ui.placeholder.unwrap_or_default()
            prop:value=move || text_value(vm, name)
            on:input=move |ev| vm.set_field(name, Value::String(event_target_value(&ev)))
            on:blur=move |_| vm.validate_field(name)
        ></textarea>
    }
    .into_any()
}

fn checkbox_input(vm: DetailsViewModel, field: &'static FieldMetadata) -> AnyView {
    let name = field.name;
    view! {
        <input
            class="form__checkbox"
            type="checkbox"
            id=name
            prop:checked=move || vm.state.with(|s| s.draft.get(name) == Some(&Value::Bool(true)))
            on:change=move |ev| vm.set_field(name, Value::Bool(event_target_checked(&ev)))
        />
    }
    .into_any()
}

/// Fixed choices declared on the field
fn choice_select(vm: DetailsViewModel, field: &'static FieldMetadata) -> AnyView {
    let name = field.name;
    let choices = field.choices.unwrap_or_default();
    view! {
        <select
            class="form__select"
            id=name
            prop:value=move || text_value(vm, name)
            on:change=move |ev| vm.set_field(name, Value::String(event_target_value(&ev)))
        >
            {choices.iter().map(|choice| view! {
                <option value=choice.value>{choice.label}</option>
            }).collect_view()}
        </select>
    }
    .into_any()
}

fn reference_select(
    vm: DetailsViewModel,
    field: &'static FieldMetadata,
    inline_field: RwSignal<Option<&'static str>>,
) -> AnyView {
    let name = field.name;
    let on_change = move |ev: web_sys::Event| {
        let id = event_target_value(&ev);
        let value = vm.state.with_untracked(|s| {
            s.options(name)
                .iter()
                .find(|o| o.id == id)
                .map(|o| o.value.clone())
                .unwrap_or(Value::Null)
        });
        vm.change_field(name, value);
    };
    view! {
        <div class="form__reference">
            <select
                class="form__select"
                id=name
                prop:value=move || vm.state.with(|s| s.selected(name).unwrap_or_default())
                on:change=on_change
            >
                <option value="">{format!("Select {}", field.ui.label.to_lowercase())}</option>
                {move || vm.state.with(|s| {
                    s.options(name)
                        .iter()
                        .map(|o| view! { <option value=o.id.clone()>{o.label.clone()}</option> })
                        .collect_view()
                })}
            </select>
            {field.inline_create.then(|| view! {
                <button
                    class="button button--icon"
                    type="button"
                    title=format!("New {}", field.ui.label.to_lowercase())
                    on:click=move |_| inline_field.set(Some(name))
                >
                    {icon("plus")}
                </button>
            })}
        </div>
    }
    .into_any()
}

fn file_input(vm: DetailsViewModel, field: &'static FieldMetadata) -> AnyView {
    let name = field.name;
    let current = move || {
        vm.state.with(|s| match s.draft.file(name) {
            Some(upload) => upload.file_name.clone(),
            None => s
                .draft
                .get(name)
                .map(display_value)
                .map(|url| url.rsplit('/').next().unwrap_or_default().to_string())
                .unwrap_or_default(),
        })
    };
    view! {
        <div class="form__file">
            <input
                class="form__input"
                type="file"
                id=name
                on:change=move |ev| {
                    if let Some(file) = selected_file(&ev) {
                        vm.attach_file(name, file);
                    }
                    reset_file_input(&ev);
                }
            />
            <span class="form__file-name">{current}</span>
        </div>
    }
    .into_any()
}

fn field_widget(
    vm: DetailsViewModel,
    field: &'static FieldMetadata,
    inline_field: RwSignal<Option<&'static str>>,
) -> AnyView {
    match field.field_type {
        FieldType::Reference => reference_select(vm, field, inline_field),
        FieldType::Boolean => checkbox_input(vm, field),
        FieldType::LongText => long_text_input(vm, field),
        FieldType::File => file_input(vm, field),
        _ if field.choices.is_some() => choice_select(vm, field),
        _ => text_input(vm, field),
    }
}

/// Details form bound to an already constructed controller. Reference
/// fields that allow it open a nested form of the referenced entity.
#[component]
pub fn DetailsForm(
    controller: FormController,
    id: Option<String>,
    on_saved: Callback<Record>,
    on_cancel: Callback<()>,
) -> impl IntoView {
    let descriptor = controller.descriptor();
    let vm = DetailsViewModel::new(controller);
    let inline_field = RwSignal::new(None::<&'static str>);

    vm.open(id);
    on_cleanup(move || vm.unmount());

    let fields = descriptor
        .form_fields()
        .map(|field| {
            view! {
                <div class="form__group">
                    <label class="form__label" for=field.name>
                        {field.ui.label}
                        {field.validation.required.then_some(" *")}
                    </label>
                    {field_widget(vm, field, inline_field)}
                    {field_error(vm, field.name)}
                </div>
            }
        })
        .collect_view();

    let inline_modal = move || {
        let field = inline_field.get()?;
        let child = StoredValue::new_local(vm.inline_controller(field)?);
        let title = format!("New {}", child.with_value(|c| c.descriptor().ui.element_name));
        let close = Callback::new(move |_| inline_field.set(None));
        let attach = Callback::new(move |record: Record| {
            vm.attach_created(field, &record);
            inline_field.set(None);
        });
        Some(
            view! {
                <Modal title=title on_close=close>
                    <DetailsForm controller=child.get_value() id=None on_saved=attach on_cancel=close />
                </Modal>
            }
            .into_any(),
        )
    };

    let body = move || match vm.state.with(|s| s.status.clone()) {
        FormStatus::Idle | FormStatus::Loading => view! {
            <div class="form__loading">"Loading..."</div>
        }
        .into_any(),
        FormStatus::Failed(err) => view! {
            <div class="warning-box warning-box--error">
                <span class="warning-box__icon">"⚠"</span>
                <span class="warning-box__text">{err.user_message()}</span>
            </div>
        }
        .into_any(),
        FormStatus::Ready | FormStatus::Submitting => ().into_any(),
    };

    view! {
        <div class="details-form">
            {body}
            <form
                class="form"
                class:form--hidden=move || {
                    !matches!(vm.state.with(|s| s.status.clone()), FormStatus::Ready | FormStatus::Submitting)
                }
                on:submit=move |ev| {
                    ev.prevent_default();
                    vm.save_command(on_saved);
                }
            >
                {fields}
                {move || vm.file_error.get().map(|e| view! { <div class="form__error">{e}</div> })}
                <div class="form__actions">
                    <Button
                        appearance=ButtonAppearance::Primary
                        button_type=ButtonType::Submit
                        disabled=Signal::derive(move || vm.is_submitting())
                    >
                        {move || match (vm.is_submitting(), vm.is_edit_mode()) {
                            (true, _) => "Saving...",
                            (false, true) => "Save changes",
                            (false, false) => "Create",
                        }}
                    </Button>
                    <Button appearance=ButtonAppearance::Secondary on_click=move |_| on_cancel.run(())>
                        "Cancel"
                    </Button>
                </div>
            </form>
            {inline_modal}
        </div>
    }
}
