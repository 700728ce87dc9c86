use contracts::domain;
use leptos::prelude::Effect;
use leptos::prelude::*;
use std::collections::HashMap;
use web_sys::window;

/// Query parameter holding the open screen
const ACTIVE_PARAM: &str = "entity";

#[derive(Clone, Copy)]
pub struct AppGlobalContext {
    /// `EntityDescriptor::entity_name` of the open list screen
    pub active: RwSignal<&'static str>,
    pub left_open: RwSignal<bool>,
}

impl AppGlobalContext {
    pub fn new() -> Self {
        let first = domain::REGISTRY
            .first()
            .map(|d| d.entity_name)
            .unwrap_or_default();
        Self {
            active: RwSignal::new(first),
            left_open: RwSignal::new(true),
        }
    }

    /// Restore the open screen from `?entity=` and keep the URL in sync
    pub fn init_router_integration(&self) {
        let search = window()
            .and_then(|w| w.location().search().ok())
            .unwrap_or_default();
        let params: HashMap<String, String> =
            serde_qs::from_str(search.trim_start_matches('?')).unwrap_or_default();
        if let Some(descriptor) = params.get(ACTIVE_PARAM).and_then(|name| domain::find(name)) {
            self.active.set(descriptor.entity_name);
        }

        let this = *self;
        Effect::new(move |_| {
            let active = this.active.get();
            let query_string =
                serde_qs::to_string(&HashMap::from([(ACTIVE_PARAM, active)])).unwrap_or_default();
            let new_url = format!("?{}", query_string);

            let current_search = window()
                .and_then(|w| w.location().search().ok())
                .unwrap_or_default();
            if current_search != new_url {
                if let Some(w) = window() {
                    if let Ok(history) = w.history() {
                        let _ = history.replace_state_with_url(
                            &wasm_bindgen::JsValue::NULL,
                            "",
                            Some(&new_url),
                        );
                    }
                }
            }
        });
    }

    pub fn open(&self, entity_name: &'static str) {
        log::debug!("open screen '{}'", entity_name);
        self.active.set(entity_name);
    }

    pub fn toggle_left(&self) {
        self.left_open.update(|val| *val = !*val);
    }
}

impl Default for AppGlobalContext {
    fn default() -> Self {
        Self::new()
    }
}
