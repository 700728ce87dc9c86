use contracts::shared::api::DEFAULT_PAGE_SIZE;
use contracts::shared::metadata::{EntityDescriptor, FieldMetadata};
use contracts::shared::record::Record;
use leptos::prelude::*;
use leptos::task::spawn_local;
use serde_json::Value;
use thaw::*;

use super::details::ResourceDetails;
use super::{confirmation_gate, read_file, reset_file_input, resource_client, selected_file};
use crate::shared::components::pagination_controls::PaginationControls;
use crate::shared::export::save_download;
use crate::shared::gate::ConfirmationGate;
use crate::shared::icons::icon;
use crate::shared::list_controller::{ListController, ListState, ViewMeta};
use crate::shared::list_utils::{format_cell, get_sort_indicator, highlight_matches, SearchInput};
use crate::shared::modal::Modal;

/// What the details modal shows
#[derive(Debug, Clone, PartialEq)]
enum Editing {
    New,
    Existing(String),
}

fn status_cell(
    controller: StoredValue<ListController, LocalStorage>,
    state: RwSignal<ListState>,
    descriptor: &'static EntityDescriptor,
    row: &Record,
    id: String,
) -> AnyView {
    let Some(toggle) = descriptor.status else {
        return ().into_any();
    };
    let current = row.get(toggle.field) == Some(&Value::Bool(true));
    let busy_id = id.clone();
    let on_toggle = move |_| {
        let controller = controller.get_value();
        let id = id.clone();
        spawn_local(async move {
            controller.request_status_change(&id, !current).await;
        });
    };
    view! {
        <td class="table__cell table__cell--status">
            <span class={if current { "badge badge--success" } else { "badge badge--secondary" }}>
                {toggle.label(current)}
            </span>
            <button
                class="button button--small button--secondary"
                disabled=move || state.with(|s| s.is_busy(&busy_id))
                on:click=on_toggle
            >
                {toggle.action(!current)}
            </button>
        </td>
    }
    .into_any()
}

fn data_cell(field: &'static FieldMetadata, row: &Record, search: String) -> AnyView {
    let text = format_cell(field, row);
    if field.ui.searchable {
        view! { <td class="table__cell">{highlight_matches(&text, &search)}</td> }.into_any()
    } else {
        view! { <td class="table__cell">{text}</td> }.into_any()
    }
}

/// List screen of one entity: search, sort, pagination, row actions,
/// import and export
#[component]
pub fn ResourceList(
    descriptor: &'static EntityDescriptor,
    /// Receives the screen's page metadata once on mount
    on_meta: Callback<ViewMeta>,
) -> impl IntoView {
    let gate = confirmation_gate();
    let list = ListController::new(resource_client(descriptor), gate.clone());
    let state = RwSignal::new(list.state());
    list.subscribe(move |s| {
        let _ = state.try_set(s.clone());
    });
    let controller = StoredValue::new_local(list);
    let gate = StoredValue::new_local(gate);
    let editing = RwSignal::new(None::<Editing>);

    on_meta.run(controller.with_value(|c| c.view_meta()));

    let refresh = move || {
        let list = controller.get_value();
        spawn_local(async move { list.refresh().await });
    };

    spawn_local({
        let list = controller.get_value();
        async move { list.load(1, DEFAULT_PAGE_SIZE, "").await }
    });
    on_cleanup(move || {
        let _ = controller.try_with_value(|c| c.unmount());
    });

    let on_search = Callback::new(move |term: String| {
        let list = controller.get_value();
        spawn_local(async move { list.search(&term).await });
    });
    let on_page_change = Callback::new(move |page: u32| {
        let list = controller.get_value();
        spawn_local(async move { list.set_page(page).await });
    });
    let on_page_size_change = Callback::new(move |size: u32| {
        let list = controller.get_value();
        spawn_local(async move { list.set_page_size(size).await });
    });

    let on_export = move |_| {
        let list = controller.get_value();
        let gate = gate.get_value();
        spawn_local(async move {
            if let Ok(download) = list.export_current_view().await {
                match save_download(&download) {
                    Ok(()) => gate.success(&format!("Exported {}", download.file_name)),
                    Err(e) => {
                        log::error!("export download failed: {}", e);
                        gate.error("Could not save the exported file");
                    }
                }
            }
        });
    };

    let on_import = move |ev: web_sys::Event| {
        let file = selected_file(&ev);
        reset_file_input(&ev);
        let Some(file) = file else {
            return;
        };
        let list = controller.get_value();
        let gate: ConfirmationGate = gate.get_value();
        spawn_local(async move {
            match read_file(file).await {
                Ok(upload) => {
                    list.import(upload).await;
                }
                Err(e) => {
                    log::error!("{}", e);
                    gate.error("Could not read the selected file");
                }
            }
        });
    };

    let on_saved = Callback::new(move |_record: Record| {
        editing.set(None);
        refresh();
    });
    let on_close = Callback::new(move |_| editing.set(None));

    let header_cells = descriptor
        .list_fields()
        .map(|field| {
            let name = field.name;
            view! {
                <th
                    class="table__header-cell table__header-cell--sortable"
                    style=field.ui.column_width.map(|w| format!("width: {}px;", w))
                    on:click=move |_| controller.with_value(|c| c.sort_by(name))
                >
                    {field.ui.label}
                    {move || state.with(|s| get_sort_indicator(s.sort.as_ref(), name))}
                </th>
            }
        })
        .collect_view();

    let rows = move || {
        let (rows, search) = state.with(|s| (s.visible_rows(), s.search.clone()));
        let pk = descriptor.primary_key;
        rows.into_iter()
            .map(|row| {
                let id = row.id(pk).unwrap_or_default();
                let cells = descriptor
                    .list_fields()
                    .map(|field| {
                        if descriptor.status.is_some_and(|t| t.field == field.name) {
                            status_cell(controller, state, descriptor, &row, id.clone())
                        } else {
                            data_cell(field, &row, search.clone())
                        }
                    })
                    .collect_view();
                let edit_id = id.clone();
                let delete_id = id.clone();
                let busy_id = id.clone();
                view! {
                    <tr class="table__row" class:table__row--busy=move || state.with(|s| s.is_busy(&busy_id))>
                        {cells}
                        <td class="table__cell table__cell--actions">
                            <button
                                class="button button--icon"
                                title="Edit"
                                on:click=move |_| editing.set(Some(Editing::Existing(edit_id.clone())))
                            >
                                {icon("edit")}
                            </button>
                            <button
                                class="button button--icon button--danger"
                                title="Delete"
                                on:click=move |_| {
                                    let list = controller.get_value();
                                    let id = delete_id.clone();
                                    spawn_local(async move {
                                        list.request_delete(&id).await;
                                    });
                                }
                            >
                                {icon("trash")}
                            </button>
                        </td>
                    </tr>
                }
            })
            .collect_view()
    };

    let modal = move || {
        let current = editing.get()?;
        let (title, id) = match current {
            Editing::New => (format!("New {}", descriptor.ui.element_name.to_lowercase()), None),
            Editing::Existing(id) => (format!("Edit {}", descriptor.ui.element_name.to_lowercase()), Some(id)),
        };
        Some(view! {
            <Modal title=title on_close=on_close>
                <ResourceDetails descriptor=descriptor id=id on_saved=on_saved on_cancel=on_close />
            </Modal>
        })
    };

    view! {
        <div class="page">
            <div class="header">
                <div class="header__content">
                    <h1 class="header__title">{descriptor.ui.list_name}</h1>
                </div>
                <div class="header__actions">
                    <SearchInput
                        value=Signal::derive(move || state.with(|s| s.search.clone()))
                        on_change=on_search
                        placeholder=format!("Search {}", descriptor.ui.list_name.to_lowercase())
                    />
                    <Button appearance=ButtonAppearance::Primary on_click=move |_| editing.set(Some(Editing::New))>
                        {icon("plus")}
                        {format!(" New {}", descriptor.ui.element_name.to_lowercase())}
                    </Button>
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=move |_| refresh()
                        disabled=Signal::derive(move || state.with(|s| s.is_loading()))
                    >
                        {icon("refresh")}
                        " Refresh"
                    </Button>
                    <Button appearance=ButtonAppearance::Secondary on_click=on_export>
                        {icon("download")}
                        " Export"
                    </Button>
                    {descriptor.supports_import.then(|| view! {
                        <label class="button button--secondary">
                            {icon("upload")}
                            " Import"
                            <input
                                type="file"
                                accept=".xlsx,.xls,.csv"
                                style="display: none;"
                                on:change=on_import
                            />
                        </label>
                    })}
                </div>
            </div>

            {move || state.with(|s| s.error().cloned()).map(|err| view! {
                <div class="warning-box warning-box--error">
                    <span class="warning-box__icon">"⚠"</span>
                    <span class="warning-box__text">{err.user_message()}</span>
                    <button
                        class="button button--secondary"
                        on:click=move |_| refresh()
                    >
                        "Retry"
                    </button>
                </div>
            })}

            <div class="table">
                <table class="table__data table--striped">
                    <thead class="table__head">
                        <tr>
                            {header_cells}
                            <th class="table__header-cell table__header-cell--actions"></th>
                        </tr>
                    </thead>
                    <tbody>
                        {rows}
                    </tbody>
                </table>
                {move || state.with(|s| s.is_loading()).then(|| view! {
                    <div class="table__loading">"Loading..."</div>
                })}
                {move || state.with(|s| !s.is_loading() && s.error().is_none() && s.visible_rows().is_empty()).then(|| view! {
                    <div class="table__empty">{format!("No {} found", descriptor.ui.list_name.to_lowercase())}</div>
                })}
            </div>

            <PaginationControls
                current_page=Signal::derive(move || state.with(|s| s.page))
                total_pages=Signal::derive(move || state.with(|s| s.total_pages()))
                total_count=Signal::derive(move || state.with(|s| s.total_count()))
                page_size=Signal::derive(move || state.with(|s| s.page_size))
                on_page_change=on_page_change
                on_page_size_change=on_page_size_change
            />

            {modal}
        </div>
    }
}
