use crate::shared::icons::icon;
use leptos::ev;
use leptos::html::Div;
use leptos::prelude::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::KeyboardEvent;

/// Only the last opened modal reacts to Escape
fn is_topmost(overlay: &web_sys::Node) -> bool {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return false;
    };
    match document.query_selector_all(".modal-overlay") {
        Ok(list) if list.length() > 0 => list
            .item(list.length() - 1)
            .is_some_and(|node| node.is_same_node(Some(overlay))),
        _ => false,
    }
}

/// Overlay dialog hosting a details form. Escape, the overlay and the
/// close button all call `on_close`. Modals may be nested.
#[component]
pub fn Modal(
    #[prop(into)]
    title: Signal<String>,
    on_close: Callback<()>,
    children: Children,
) -> impl IntoView {
    let overlay = NodeRef::<Div>::new();
    let listener = StoredValue::new_local(None::<Closure<dyn FnMut(web_sys::Event)>>);

    Effect::new(move |_| {
        let closure = Closure::wrap(Box::new(move |event: web_sys::Event| {
            let Some(keyboard_event) = event.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            if keyboard_event.key() != "Escape" {
                return;
            }
            if let Some(element) = overlay.get_untracked() {
                if is_topmost(element.as_ref()) {
                    on_close.run(());
                }
            }
        }) as Box<dyn FnMut(_)>);

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        }
        listener.set_value(Some(closure));
    });

    on_cleanup(move || {
        let _ = listener.try_with_value(|closure| {
            if let (Some(window), Some(closure)) = (web_sys::window(), closure) {
                let _ = window.remove_event_listener_with_callback(
                    "keydown",
                    closure.as_ref().unchecked_ref(),
                );
            }
        });
    });

    let stop_propagation = move |ev: ev::MouseEvent| {
        ev.stop_propagation();
    };

    view! {
        <div class="modal-overlay" node_ref=overlay on:click=move |_| on_close.run(())>
            <div class="modal" on:click=stop_propagation>
                <div class="modal-header">
                    <h2 class="modal-title">{move || title.get()}</h2>
                    <div class="modal-header-actions">
                        <button class="button button--icon modal__close" on:click=move |_| on_close.run(())>
                            {icon("x")}
                        </button>
                    </div>
                </div>
                <div class="modal-body">
                    {children()}
                </div>
            </div>
        </div>
    }
}
