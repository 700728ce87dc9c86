pub mod global_context;
pub mod sidebar;

use global_context::AppGlobalContext;
use leptos::prelude::*;
use sidebar::Sidebar;

use crate::shared::icons::icon;
use crate::shared::list_controller::{ViewMeta, APP_TITLE};

/// Header title of the open screen
fn screen_title(meta: Option<&ViewMeta>) -> String {
    meta.map(|m| m.title.clone())
        .unwrap_or_else(|| APP_TITLE.to_string())
}

/// Main application shell.
///
/// ```text
/// +------------------------------------------+
/// |              TopHeader                    |
/// +------------------------------------------+
/// |  Sidebar  |           Content             |
/// +------------------------------------------+
/// ```
#[component]
pub fn Shell(
    ctx: AppGlobalContext,
    /// Metadata of the open screen; the app title until one reports
    #[prop(into)]
    meta: Signal<Option<ViewMeta>>,
    children: Children,
) -> impl IntoView {
    let title = move || meta.with(|m| screen_title(m.as_ref()));

    view! {
        <div class="app-layout">
            <div class="top-header">
                <button
                    class="button button--icon top-header__toggle"
                    title="Toggle menu"
                    on:click=move |_| ctx.toggle_left()
                >
                    {icon("folder")}
                </button>
                <span class="top-header__title">{title}</span>
            </div>

            <div class="app-body">
                <aside class="app-sidebar" class:app-sidebar--collapsed=move || !ctx.left_open.get()>
                    <Sidebar ctx=ctx />
                </aside>
                <div class="app-main">
                    {children()}
                </div>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_shows_screen_title() {
        assert_eq!(screen_title(None), "Pharmacy Admin");
        let meta = ViewMeta {
            title: "Drugs | Pharmacy Admin".to_string(),
        };
        assert_eq!(screen_title(Some(&meta)), "Drugs | Pharmacy Admin");
    }
}
