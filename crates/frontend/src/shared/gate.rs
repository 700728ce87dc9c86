//! Confirmation before destructive or state-changing actions, and uniform
//! outcome reporting. Controllers receive both capabilities injected so
//! tests can script the user's answers.

use std::rc::Rc;

use async_trait::async_trait;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyKind {
    Success,
    Error,
    Info,
}

impl NotifyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
        }
    }
}

/// Asks the user a yes/no question; suspends until answered
#[async_trait(?Send)]
pub trait Confirm {
    async fn confirm(&self, message: &str) -> bool;
}

pub trait Notifier {
    fn notify(&self, kind: NotifyKind, message: &str);
}

/// `window.confirm`
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserConfirm;

#[async_trait(?Send)]
impl Confirm for BrowserConfirm {
    async fn confirm(&self, message: &str) -> bool {
        match web_sys::window() {
            Some(win) => win.confirm_with_message(message).unwrap_or(false),
            None => false,
        }
    }
}

#[derive(Clone)]
pub struct ConfirmationGate {
    confirm: Rc<dyn Confirm>,
    notifier: Rc<dyn Notifier>,
}

impl ConfirmationGate {
    pub fn new(confirm: Rc<dyn Confirm>, notifier: Rc<dyn Notifier>) -> Self {
        Self { confirm, notifier }
    }

    /// Two independent questions; the second is only asked after a yes
    /// to the first.
    pub async fn confirm_destructive(&self, first: &str, second: &str) -> bool {
        if !self.confirm.confirm(first).await {
            log::debug!("destructive action cancelled at first prompt");
            return false;
        }
        if !self.confirm.confirm(second).await {
            log::debug!("destructive action cancelled at second prompt");
            return false;
        }
        true
    }

    pub async fn confirm_state_change(&self, message: &str) -> bool {
        self.confirm.confirm(message).await
    }

    pub fn notify(&self, kind: NotifyKind, message: &str) {
        self.notifier.notify(kind, message);
    }

    pub fn success(&self, message: &str) {
        self.notify(NotifyKind::Success, message);
    }

    pub fn error(&self, message: &str) {
        self.notify(NotifyKind::Error, message);
    }

    pub fn info(&self, message: &str) {
        self.notify(NotifyKind::Info, message);
    }
}
