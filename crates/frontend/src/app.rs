use crate::domain::resource_page::list::ResourceList;
use crate::layout::global_context::AppGlobalContext;
use crate::layout::Shell;
use crate::shared::list_controller::ViewMeta;
use crate::shared::notifications::{NotificationCenter, NotificationHost};
use contracts::domain;
use leptos::prelude::*;

#[component]
pub fn App() -> impl IntoView {
    let ctx = AppGlobalContext::new();
    ctx.init_router_integration();
    provide_context(ctx);

    // Toasts of every controller end up here
    let notifications = NotificationCenter::new();
    provide_context(notifications);

    let meta = RwSignal::new(None::<ViewMeta>);
    let on_meta = Callback::new(move |m: ViewMeta| meta.set(Some(m)));

    view! {
        <Shell ctx=ctx meta=meta>
            // Re-created per entity so a screen's in-flight responses die with it
            {move || {
                let active = ctx.active.get();
                match domain::find(active) {
                    Some(descriptor) => view! { <ResourceList descriptor=descriptor on_meta=on_meta /> }.into_any(),
                    None => view! {
                        <div class="page">{format!("Unknown screen '{}'", active)}</div>
                    }
                    .into_any(),
                }
            }}
        </Shell>
        <NotificationHost center=notifications />
    }
}
