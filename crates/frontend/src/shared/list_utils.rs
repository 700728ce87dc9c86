/// Helpers shared by list screens: cell formatting, search input, sort headers
use contracts::shared::metadata::{FieldMetadata, FieldSource, FieldType};
use contracts::shared::record::{display_value, Record};
use gloo_timers::callback::Timeout;
use leptos::prelude::*;
use serde_json::Value;

use crate::shared::date_utils::{format_date, format_datetime};
use crate::shared::list_controller::SortState;

/// Delay before a typed search term is applied
pub const SEARCH_DEBOUNCE_MS: u32 = 300;

/// Text of one list cell
pub fn format_cell(field: &FieldMetadata, record: &Record) -> String {
    let Some(value) = record.get(field.name) else {
        return String::new();
    };
    match (field.field_type, value) {
        (FieldType::Date, Value::String(s)) if field.source == FieldSource::Server => {
            format_datetime(s)
        }
        (FieldType::Date, Value::String(s)) => format_date(s),
        (FieldType::File, Value::String(url)) => {
            url.rsplit('/').next().unwrap_or(url).to_string()
        }
        _ => display_value(value),
    }
}

/// Highlight matches of `filter` in `text` (case-insensitive)
pub fn highlight_matches(text: &str, filter: &str) -> AnyView {
    let filter_lower = filter.trim().to_lowercase();
    let text_lower = text.to_lowercase();
    // byte offsets only line up when lowercasing keeps the length
    if filter_lower.is_empty()
        || text_lower.len() != text.len()
        || !text_lower.contains(&filter_lower)
    {
        return view! { <span>{text.to_string()}</span> }.into_any();
    }

    let mut parts: Vec<AnyView> = Vec::new();
    let mut last_pos = 0;

    while let Some(pos) = text_lower[last_pos..].find(&filter_lower) {
        let actual_pos = last_pos + pos;
        if actual_pos > last_pos {
            parts.push(view! { <span>{text[last_pos..actual_pos].to_string()}</span> }.into_any());
        }
        let match_end = actual_pos + filter_lower.len();
        parts.push(
            view! { <mark class="search-match">{text[actual_pos..match_end].to_string()}</mark> }
                .into_any(),
        );
        last_pos = match_end;
    }

    if last_pos < text.len() {
        parts.push(view! { <span>{text[last_pos..].to_string()}</span> }.into_any());
    }

    view! { <>{parts}</> }.into_any()
}

/// Search box with debounce and a clear button
#[component]
pub fn SearchInput(
    /// Applied term
    #[prop(into)]
    value: Signal<String>,
    #[prop(into)]
    on_change: Callback<String>,
    #[prop(optional, into)]
    placeholder: String,
) -> impl IntoView {
    let placeholder = if placeholder.is_empty() {
        "Search...".to_string()
    } else {
        placeholder
    };

    let (input_value, set_input_value) = signal(value.get_untracked());
    let pending = StoredValue::new_local(None::<Timeout>);

    let handle_input_change = move |new_value: String| {
        set_input_value.set(new_value.clone());
        // dropping the previous Timeout cancels it
        let timeout = Timeout::new(SEARCH_DEBOUNCE_MS, move || on_change.run(new_value));
        pending.set_value(Some(timeout));
    };

    let is_filter_active = move || !value.get().trim().is_empty();

    let clear_filter = move |_| {
        pending.set_value(None);
        set_input_value.set(String::new());
        on_change.run(String::new());
    };

    view! {
        <div class="search-input">
            <input
                type="text"
                class="search-input__field"
                class:search-input__field--active=is_filter_active
                placeholder=placeholder
                prop:value=move || input_value.get()
                on:input=move |ev| handle_input_change(event_target_value(&ev))
            />
            {move || if !input_value.get().is_empty() {
                view! {
                    <button class="search-input__clear" on:click=clear_filter title="Clear">
                        {crate::shared::icons::icon("x")}
                    </button>
                }.into_any()
            } else {
                view! { <></> }.into_any()
            }}
        </div>
    }
}

/// Sort indicator for a column header
pub fn get_sort_indicator(sort: Option<&SortState>, field: &str) -> &'static str {
    match sort {
        Some(sort) if sort.field == field => {
            if sort.ascending {
                " ▲"
            } else {
                " ▼"
            }
        }
        _ => " ⇅",
    }
}
