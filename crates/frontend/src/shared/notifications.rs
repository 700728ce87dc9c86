use leptos::prelude::*;

use crate::shared::gate::{Notifier, NotifyKind};
use crate::shared::icons::icon;

/// Toasts stacked in the corner of the screen
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub kind: NotifyKind,
    pub message: String,
}

/// Errors stay long enough to be read
pub fn dismiss_after(kind: NotifyKind) -> u32 {
    match kind {
        NotifyKind::Error => 8000,
        NotifyKind::Success | NotifyKind::Info => 4000,
    }
}

#[derive(Clone, Copy)]
pub struct NotificationCenter {
    toasts: RwSignal<Vec<Toast>>,
    next_id: StoredValue<u64>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self {
            toasts: RwSignal::new(Vec::new()),
            next_id: StoredValue::new(1),
        }
    }

    pub fn toasts(&self) -> Signal<Vec<Toast>> {
        self.toasts.into()
    }

    pub fn dismiss(&self, id: u64) {
        self.toasts.update(|toasts| toasts.retain(|t| t.id != id));
    }
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for NotificationCenter {
    fn notify(&self, kind: NotifyKind, message: &str) {
        let id = self.next_id.get_value();
        self.next_id.set_value(id + 1);
        match kind {
            NotifyKind::Error => log::warn!("notification: {}", message),
            _ => log::info!("notification: {}", message),
        }
        self.toasts.update(|toasts| {
            toasts.push(Toast {
                id,
                kind,
                message: message.to_string(),
            })
        });

        let center = *self;
        leptos::task::spawn_local(async move {
            gloo_timers::future::TimeoutFuture::new(dismiss_after(kind)).await;
            center.dismiss(id);
        });
    }
}

#[component]
pub fn NotificationHost(center: NotificationCenter) -> impl IntoView {
    view! {
        <div class="toast-stack" role="status" aria-live="polite">
            <For
                each=move || center.toasts().get()
                key=|toast| toast.id
                children=move |toast| {
                    let id = toast.id;
                    view! {
                        <div class=format!("toast toast--{}", toast.kind.as_str())>
                            <span class="toast__message">{toast.message}</span>
                            <button
                                class="button button--icon toast__close"
                                title="Dismiss"
                                on:click=move |_| center.dismiss(id)
                            >
                                {icon("x")}
                            </button>
                        </div>
                    }
                }
            />
        </div>
    }
}
