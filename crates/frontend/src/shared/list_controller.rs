//! State of one list screen: the Collection Snapshot, its load state
//! machine and the mutations issued from the list.
//!
//! State lives behind `Rc<RefCell<_>>` so several in-flight futures may
//! hold the controller. Borrows are never held across an await.

use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::rc::Rc;

use contracts::shared::api::{ApiError, Download, ListQuery, DEFAULT_PAGE_SIZE};
use contracts::shared::metadata::{as_number, EntityDescriptor, ExportStrategy, SearchStrategy};
use contracts::shared::record::{display_value, FileUpload, Record};
use serde_json::Value;

use crate::shared::export::csv_download;
use crate::shared::gate::ConfirmationGate;
use crate::shared::resource::ResourceClient;

pub const APP_TITLE: &str = "Pharmacy Admin";

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Idle,
    Loading,
    Loaded,
    Errored(ApiError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortState {
    pub field: String,
    pub ascending: bool,
}

/// Result of a delete, status change or import issued from the list
#[derive(Debug, Clone, PartialEq)]
pub enum MutationOutcome {
    Done,
    /// The user answered no; nothing was sent
    Cancelled,
    /// Another mutation of the same record is still in flight
    Busy,
    Failed(ApiError),
}

/// Declarative page metadata, rendered by the view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewMeta {
    pub title: String,
}

#[derive(Debug, Clone)]
pub struct ListState {
    pub descriptor: &'static EntityDescriptor,
    pub load: LoadState,
    /// Collection Snapshot: the current page for server search, the whole
    /// collection for client search
    pub records: Vec<Record>,
    /// Server total when paginated
    pub count: u64,
    /// 1-based
    pub page: u32,
    pub page_size: u32,
    pub search: String,
    pub sort: Option<SortState>,
    /// Ids with a mutation in flight
    pub busy: BTreeSet<String>,
}

impl ListState {
    fn new(descriptor: &'static EntityDescriptor) -> Self {
        Self {
            descriptor,
            load: LoadState::Idle,
            records: Vec::new(),
            count: 0,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            search: String::new(),
            sort: None,
            busy: BTreeSet::new(),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.load == LoadState::Loading
    }

    pub fn error(&self) -> Option<&ApiError> {
        match &self.load {
            LoadState::Errored(err) => Some(err),
            _ => None,
        }
    }

    pub fn is_busy(&self, id: &str) -> bool {
        self.busy.contains(id)
    }

    fn client_side(&self) -> bool {
        self.descriptor.search == SearchStrategy::Client
    }

    fn matches(&self, record: &Record, term: &str) -> bool {
        let mut fields = self.descriptor.searchable_fields().peekable();
        if fields.peek().is_none() {
            return self
                .descriptor
                .list_fields()
                .any(|f| record.display(f.name).to_lowercase().contains(term));
        }
        fields.any(|f| record.display(f.name).to_lowercase().contains(term))
    }

    /// Snapshot after client-side search and sorting, all pages
    pub fn filtered_rows(&self) -> Vec<Record> {
        let term = self.search.trim().to_lowercase();
        let mut rows: Vec<Record> = if self.client_side() && !term.is_empty() {
            self.records
                .iter()
                .filter(|r| self.matches(r, &term))
                .cloned()
                .collect()
        } else {
            self.records.clone()
        };

        if let Some(sort) = &self.sort {
            rows.sort_by(|a, b| {
                let cmp = compare_values(a.get(&sort.field), b.get(&sort.field));
                if sort.ascending {
                    cmp
                } else {
                    cmp.reverse()
                }
            });
        }
        rows
    }

    /// Rows of the current page
    pub fn visible_rows(&self) -> Vec<Record> {
        let rows = self.filtered_rows();
        if !self.client_side() {
            return rows;
        }
        let size = self.page_size.max(1) as usize;
        let start = (self.page.max(1) as usize - 1) * size;
        rows.into_iter().skip(start).take(size).collect()
    }

    /// Number of records the pager counts
    pub fn total_count(&self) -> u64 {
        if self.client_side() {
            self.filtered_rows().len() as u64
        } else {
            self.count
        }
    }

    pub fn total_pages(&self) -> u32 {
        let size = u64::from(self.page_size.max(1));
        let pages = self.total_count().div_ceil(size);
        pages.clamp(1, u64::from(u32::MAX)) as u32
    }
}

/// Numbers compare numerically, everything else as case-insensitive text;
/// missing values sort first.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    fn present(v: Option<&Value>) -> Option<&Value> {
        v.filter(|v| !v.is_null())
    }
    match (present(a), present(b)) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => match (as_number(a), as_number(b)) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            _ => display_value(a)
                .to_lowercase()
                .cmp(&display_value(b).to_lowercase()),
        },
    }
}

type Listener = Rc<dyn Fn(&ListState)>;

struct Inner {
    state: ListState,
    mounted: bool,
    /// Incremented per load; responses of older loads are discarded
    load_seq: u64,
    listener: Option<Listener>,
}

#[derive(Clone)]
pub struct ListController {
    client: ResourceClient,
    gate: ConfirmationGate,
    inner: Rc<RefCell<Inner>>,
}

impl ListController {
    pub fn new(client: ResourceClient, gate: ConfirmationGate) -> Self {
        let state = ListState::new(client.descriptor());
        Self {
            client,
            gate,
            inner: Rc::new(RefCell::new(Inner {
                state,
                mounted: true,
                load_seq: 0,
                listener: None,
            })),
        }
    }

    pub fn descriptor(&self) -> &'static EntityDescriptor {
        self.client.descriptor()
    }

    pub fn client(&self) -> &ResourceClient {
        &self.client
    }

    pub fn state(&self) -> ListState {
        self.inner.borrow().state.clone()
    }

    pub fn record(&self, id: &str) -> Option<Record> {
        let pk = self.descriptor().primary_key;
        self.inner
            .borrow()
            .state
            .records
            .iter()
            .find(|r| r.id(pk).as_deref() == Some(id))
            .cloned()
    }

    pub fn view_meta(&self) -> ViewMeta {
        ViewMeta {
            title: format!("{} | {}", self.descriptor().ui.list_name, APP_TITLE),
        }
    }

    /// Called with a fresh state after every change
    pub fn subscribe(&self, listener: impl Fn(&ListState) + 'static) {
        self.inner.borrow_mut().listener = Some(Rc::new(listener));
    }

    pub fn is_mounted(&self) -> bool {
        self.inner.borrow().mounted
    }

    /// The screen went away: later responses change nothing and notify no one
    pub fn unmount(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.mounted = false;
        inner.listener = None;
    }

    fn update(&self, f: impl FnOnce(&mut ListState)) {
        let (listener, snapshot) = {
            let mut inner = self.inner.borrow_mut();
            if !inner.mounted {
                return;
            }
            f(&mut inner.state);
            (inner.listener.clone(), inner.state.clone())
        };
        if let Some(listener) = listener {
            listener(&snapshot);
        }
    }

    pub async fn load(&self, page: u32, page_size: u32, search: &str) {
        if !self.is_mounted() {
            return;
        }
        let seq = {
            let mut inner = self.inner.borrow_mut();
            inner.load_seq += 1;
            inner.load_seq
        };
        let search = search.trim().to_string();
        self.update(|s| {
            s.load = LoadState::Loading;
            s.page = page.max(1);
            s.page_size = page_size.max(1);
            s.search = search.clone();
        });

        let query = match self.descriptor().search {
            SearchStrategy::Server => ListQuery::paged(page, page_size).with_search(&search),
            SearchStrategy::Client => ListQuery::all(),
        };
        let result = self.client.list(&query).await;

        {
            let inner = self.inner.borrow();
            if !inner.mounted || inner.load_seq != seq {
                log::debug!(
                    "{}: discarding superseded list response",
                    self.descriptor().resource
                );
                return;
            }
        }

        match result {
            Ok(page) => self.update(|s| {
                s.records = page.results;
                s.count = page.count;
                s.load = LoadState::Loaded;
                if s.client_side() {
                    s.page = s.page.min(s.total_pages());
                }
            }),
            Err(err) => {
                log::warn!("{}: list failed: {}", self.descriptor().resource, err);
                self.update(|s| s.load = LoadState::Errored(err));
            }
        }
    }

    /// Reload with the current page, size and search
    pub async fn refresh(&self) {
        let (page, size, search) = {
            let inner = self.inner.borrow();
            let s = &inner.state;
            (s.page, s.page_size, s.search.clone())
        };
        self.load(page, size, &search).await;
    }

    /// Server search re-queries; client search pages the snapshot it has
    pub async fn set_page(&self, page: u32) {
        match self.descriptor().search {
            SearchStrategy::Server => {
                let (size, search) = {
                    let inner = self.inner.borrow();
                    (inner.state.page_size, inner.state.search.clone())
                };
                self.load(page, size, &search).await;
            }
            SearchStrategy::Client => self.update(|s| {
                s.page = page.clamp(1, s.total_pages());
            }),
        }
    }

    pub async fn set_page_size(&self, page_size: u32) {
        match self.descriptor().search {
            SearchStrategy::Server => {
                let search = self.inner.borrow().state.search.clone();
                self.load(1, page_size, &search).await;
            }
            SearchStrategy::Client => self.update(|s| {
                s.page_size = page_size.max(1);
                s.page = 1;
            }),
        }
    }

    pub async fn search(&self, term: &str) {
        match self.descriptor().search {
            SearchStrategy::Server => {
                let size = self.inner.borrow().state.page_size;
                self.load(1, size, term).await;
            }
            SearchStrategy::Client => {
                let term = term.trim().to_string();
                self.update(|s| {
                    s.search = term;
                    s.page = 1;
                });
            }
        }
    }

    /// Same field flips direction, a new field starts ascending
    pub fn sort_by(&self, field: &str) {
        self.update(|s| {
            s.sort = match s.sort.take() {
                Some(sort) if sort.field == field => Some(SortState {
                    field: sort.field,
                    ascending: !sort.ascending,
                }),
                _ => Some(SortState {
                    field: field.to_string(),
                    ascending: true,
                }),
            };
        });
    }

    /// Claim the record for one mutation. A second request while one is
    /// in flight is refused.
    fn begin(&self, id: &str) -> bool {
        let claimed = self.inner.borrow_mut().state.busy.insert(id.to_string());
        if claimed {
            self.update(|_| {});
        } else {
            self.gate
                .info("Please wait, the previous action on this record is still running");
        }
        claimed
    }

    fn finish(&self, id: &str) {
        self.inner.borrow_mut().state.busy.remove(id);
        self.update(|_| {});
    }

    pub async fn request_delete(&self, id: &str) -> MutationOutcome {
        if !self.begin(id) {
            return MutationOutcome::Busy;
        }
        let element = self.descriptor().ui.element_name;
        let confirmed = self
            .gate
            .confirm_destructive(
                &format!("Delete this {}?", element.to_lowercase()),
                "This cannot be undone. Delete permanently?",
            )
            .await;
        if !confirmed {
            self.finish(id);
            return MutationOutcome::Cancelled;
        }

        let result = self.client.remove(id).await;
        self.finish(id);
        if !self.is_mounted() {
            return result.map_or_else(MutationOutcome::Failed, |_| MutationOutcome::Done);
        }

        match result {
            Ok(()) => {
                let pk = self.descriptor().primary_key;
                self.update(|s| {
                    let before = s.records.len();
                    s.records.retain(|r| r.id(pk).as_deref() != Some(id));
                    let removed = (before - s.records.len()) as u64;
                    s.count = s.count.saturating_sub(removed.max(1));
                    if s.client_side() {
                        s.page = s.page.min(s.total_pages());
                    }
                });
                self.gate.success(&format!("{} deleted", element));
                MutationOutcome::Done
            }
            Err(err) => {
                self.gate.error(&err.user_message());
                MutationOutcome::Failed(err)
            }
        }
    }

    /// Confirm once, call the backend, then patch only that record's
    /// status field.
    pub async fn request_status_change(&self, id: &str, status: bool) -> MutationOutcome {
        let descriptor = self.descriptor();
        let Some(toggle) = descriptor.status else {
            let err = ApiError::unknown("status change is not supported");
            self.gate.error(&err.message);
            return MutationOutcome::Failed(err);
        };
        if !self.begin(id) {
            return MutationOutcome::Busy;
        }

        let confirmed = self
            .gate
            .confirm_state_change(&format!(
                "{} this {}?",
                toggle.action(status),
                descriptor.ui.element_name.to_lowercase()
            ))
            .await;
        if !confirmed {
            self.finish(id);
            return MutationOutcome::Cancelled;
        }

        let result = self.client.set_status(id, status).await;
        self.finish(id);
        if !self.is_mounted() {
            return result.map_or_else(MutationOutcome::Failed, |_| MutationOutcome::Done);
        }

        match result {
            Ok(_) => {
                let pk = descriptor.primary_key;
                self.update(|s| {
                    if let Some(record) = s
                        .records
                        .iter_mut()
                        .find(|r| r.id(pk).as_deref() == Some(id))
                    {
                        record.set(toggle.field, Value::Bool(status));
                    }
                });
                self.gate.success(&format!(
                    "{} is now {}",
                    descriptor.ui.element_name,
                    toggle.label(status).to_lowercase()
                ));
                MutationOutcome::Done
            }
            Err(err) => {
                self.gate.error(&err.user_message());
                MutationOutcome::Failed(err)
            }
        }
    }

    /// Upload a spreadsheet, report the counts, then reload
    pub async fn import(&self, file: FileUpload) -> MutationOutcome {
        let result = self.client.bulk_import(file).await;
        if !self.is_mounted() {
            return result.map_or_else(MutationOutcome::Failed, |_| MutationOutcome::Done);
        }
        match result {
            Ok(summary) => {
                self.gate.success(&summary.summary());
                self.refresh().await;
                MutationOutcome::Done
            }
            Err(err) => {
                self.gate.error(&err.user_message());
                MutationOutcome::Failed(err)
            }
        }
    }

    /// File for the export button. An empty snapshot still yields the
    /// header row.
    pub async fn export_current_view(&self) -> Result<Download, ApiError> {
        let descriptor = self.descriptor();
        let result = match descriptor.export {
            ExportStrategy::ClientCsv => {
                let rows = self.inner.borrow().state.filtered_rows();
                Ok(csv_download(descriptor, &rows))
            }
            ExportStrategy::Server => self.client.bulk_export().await,
        };
        if let Err(err) = &result {
            if self.is_mounted() {
                self.gate.error(&err.user_message());
            }
        }
        result
    }
}
