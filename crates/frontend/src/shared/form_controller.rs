//! Lifecycle of one Draft: open, edit, validate, submit.
//!
//! Dependent fields follow their source on every change: derived values
//! are recomputed in place, dependent option sets are re-fetched and a
//! selection that is no longer offered is cleared.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use contracts::domain;
use contracts::shared::api::{ApiError, ErrorKind};
use contracts::shared::metadata::{
    is_blank, EntityDescriptor, FieldDependency, FieldMetadata, FieldSource, FieldType,
};
use contracts::shared::record::{value_to_id, Draft, FileUpload, Record};
use serde_json::Value;

use crate::shared::gate::ConfirmationGate;
use crate::shared::resource::ResourceClient;

/// Field name to message; empty means submittable
pub type ValidationResult = BTreeMap<String, String>;

pub const CORRECT_FIELDS_MESSAGE: &str = "Please correct the highlighted fields";

#[derive(Debug, Clone, PartialEq)]
pub enum FormStatus {
    Idle,
    Loading,
    Ready,
    Submitting,
    /// The record could not be opened
    Failed(ApiError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Persisted; the caller navigates back to the list
    Saved(Record),
    /// Client-side rules failed, nothing was sent
    Invalid(ValidationResult),
    /// The backend rejected fields; messages are in the Validation Result
    Rejected(ApiError),
    Failed(ApiError),
    /// A submit is already running
    Busy,
}

/// One selectable value of a reference field
#[derive(Debug, Clone, PartialEq)]
pub struct OptionItem {
    /// Normalized id used for comparison and as the `<option>` value
    pub id: String,
    pub label: String,
    /// Value stored in the Draft
    pub value: Value,
}

impl OptionItem {
    pub fn from_record(record: &Record, value_field: &str, label_field: &str) -> Option<Self> {
        let value = record.get(value_field)?.clone();
        let id = value_to_id(&value)?;
        let label = match record.display(label_field) {
            label if label.is_empty() => id.clone(),
            label => label,
        };
        Some(Self { id, label, value })
    }
}

#[derive(Debug, Clone)]
pub struct FormState {
    pub descriptor: &'static EntityDescriptor,
    /// Bound record id; `None` while creating
    pub id: Option<String>,
    pub draft: Draft,
    pub errors: ValidationResult,
    pub status: FormStatus,
    pub options: BTreeMap<String, Vec<OptionItem>>,
}

impl FormState {
    pub fn is_edit(&self) -> bool {
        self.id.is_some()
    }

    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn options(&self, field: &str) -> &[OptionItem] {
        self.options.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Id of the option currently selected in `field`
    pub fn selected(&self, field: &str) -> Option<String> {
        self.draft.get(field).and_then(value_to_id)
    }
}

type Listener = Rc<dyn Fn(&FormState)>;

struct Inner {
    state: FormState,
    mounted: bool,
    /// Per target field; option responses of older requests are dropped
    option_seq: BTreeMap<String, u64>,
    listener: Option<Listener>,
}

#[derive(Clone)]
pub struct FormController {
    client: ResourceClient,
    gate: ConfirmationGate,
    inner: Rc<RefCell<Inner>>,
}

/// Descriptor of the entity a reference field points to
fn referenced(field: &str, descriptor: &EntityDescriptor) -> Option<&'static EntityDescriptor> {
    descriptor
        .field(field)
        .and_then(|f| f.ref_entity)
        .and_then(domain::find)
}

impl FormController {
    pub fn new(client: ResourceClient, gate: ConfirmationGate) -> Self {
        let descriptor = client.descriptor();
        Self {
            client,
            gate,
            inner: Rc::new(RefCell::new(Inner {
                state: FormState {
                    descriptor,
                    id: None,
                    draft: Draft::with_defaults(descriptor),
                    errors: ValidationResult::new(),
                    status: FormStatus::Idle,
                    options: BTreeMap::new(),
                },
                mounted: true,
                option_seq: BTreeMap::new(),
                listener: None,
            })),
        }
    }

    pub fn descriptor(&self) -> &'static EntityDescriptor {
        self.client.descriptor()
    }

    pub fn state(&self) -> FormState {
        self.inner.borrow().state.clone()
    }

    pub fn subscribe(&self, listener: impl Fn(&FormState) + 'static) {
        self.inner.borrow_mut().listener = Some(Rc::new(listener));
    }

    pub fn is_mounted(&self) -> bool {
        self.inner.borrow().mounted
    }

    /// Navigation away: the Draft is abandoned and late responses ignored
    pub fn unmount(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.mounted = false;
        inner.listener = None;
    }

    fn update<R>(&self, f: impl FnOnce(&mut FormState) -> R) -> Option<R> {
        let (result, listener, snapshot) = {
            let mut inner = self.inner.borrow_mut();
            if !inner.mounted {
                return None;
            }
            let result = f(&mut inner.state);
            (result, inner.listener.clone(), inner.state.clone())
        };
        if let Some(listener) = listener {
            listener(&snapshot);
        }
        Some(result)
    }

    /// Seed the Draft from the backend record, or from defaults when
    /// creating. Reference option sets are loaded alongside.
    pub async fn open(&self, existing_id: Option<&str>) -> Result<(), ApiError> {
        let descriptor = self.descriptor();
        self.update(|s| {
            s.status = FormStatus::Loading;
            s.id = existing_id.map(str::to_string);
            s.errors.clear();
        });

        let draft = match existing_id {
            Some(id) => match self.client.get_by_id(id).await {
                Ok(record) => Draft::from_record(&record),
                Err(err) => {
                    log::warn!("{}: cannot open {}: {}", descriptor.resource, id, err);
                    self.update(|s| s.status = FormStatus::Failed(err.clone()));
                    return Err(err);
                }
            },
            None => Draft::with_defaults(descriptor),
        };

        self.update(|s| {
            s.draft = draft;
            for dep in descriptor.dependencies {
                if let FieldDependency::Derived { source, compute } = dep {
                    if s.draft.get(source).is_some_and(|v| !is_blank(v)) {
                        for (field, value) in compute(s.draft.values()) {
                            s.draft.set(field, value);
                        }
                    }
                }
            }
        });

        if !self.is_mounted() {
            return Ok(());
        }
        self.load_options().await;
        self.update(|s| s.status = FormStatus::Ready);
        Ok(())
    }

    /// Fetch option sets of every reference field shown in the form
    async fn load_options(&self) {
        let descriptor = self.descriptor();
        for field in descriptor
            .form_fields()
            .filter(|f| f.field_type == FieldType::Reference)
        {
            if !self.is_mounted() {
                break;
            }
            let dependency = descriptor.dependencies.iter().find(|d| {
                matches!(d, FieldDependency::Options { target, .. } if *target == field.name)
            });
            let result = match dependency {
                Some(dep) => self.refresh_options(dep).await,
                None => self.load_reference_options(field.name).await,
            };
            match result {
                Err(_) if !self.is_mounted() => break,
                Err(err) => self.gate.error(&format!(
                    "Could not load {} options: {}",
                    field.ui.label,
                    err.user_message()
                )),
                Ok(()) => {}
            }
        }
    }

    async fn load_reference_options(&self, field: &str) -> Result<(), ApiError> {
        let Some(target) = referenced(field, self.descriptor()) else {
            return Ok(());
        };
        let records = self.client.list_options(target.resource, None).await?;
        let items = records
            .iter()
            .filter_map(|r| OptionItem::from_record(r, target.primary_key, target.label_field))
            .collect();
        self.update(|s| {
            s.options.insert(field.to_string(), items);
        });
        Ok(())
    }

    /// Re-fetch the option set of an `Options` dependency's target and
    /// clear the target when its value is no longer offered
    async fn refresh_options(&self, dependency: &FieldDependency) -> Result<(), ApiError> {
        let FieldDependency::Options {
            source,
            target,
            resource,
            filter_param,
            value_field,
            label_field,
        } = *dependency
        else {
            return Ok(());
        };

        let seq = {
            let mut inner = self.inner.borrow_mut();
            let seq = inner.option_seq.entry(target.to_string()).or_insert(0);
            *seq += 1;
            *seq
        };
        let parent = self
            .inner
            .borrow()
            .state
            .draft
            .get(source)
            .and_then(value_to_id);

        let items: Vec<OptionItem> = match parent {
            Some(parent) => self
                .client
                .list_options(resource, Some((filter_param, parent.as_str())))
                .await?
                .iter()
                .filter_map(|r| OptionItem::from_record(r, value_field, label_field))
                .collect(),
            None => Vec::new(),
        };

        if self.inner.borrow().option_seq.get(target).copied() != Some(seq) {
            return Ok(());
        }
        self.update(|s| {
            let still_offered = s
                .draft
                .get(target)
                .and_then(value_to_id)
                .map(|current| items.iter().any(|o| o.id == current));
            if still_offered == Some(false) {
                s.draft.set(target, Value::Null);
                s.errors.remove(target);
            }
            s.options.insert(target.to_string(), items);
        });
        Ok(())
    }

    /// Update one Draft value. Clears the field's error and recomputes
    /// derived fields synchronously.
    pub fn set_field(&self, name: &str, value: Value) {
        let descriptor = self.descriptor();
        self.update(|s| {
            s.draft.set(name, value);
            s.errors.remove(name);
            for dep in descriptor.dependencies {
                if let FieldDependency::Derived { source, compute } = dep {
                    if *source == name {
                        for (field, value) in compute(s.draft.values()) {
                            s.draft.set(field, value);
                            s.errors.remove(field);
                        }
                    }
                }
            }
        });
    }

    /// `set_field` plus refresh of option sets depending on `name`
    pub async fn change_field(&self, name: &str, value: Value) -> Result<(), ApiError> {
        if !self.is_mounted() {
            return Ok(());
        }
        self.set_field(name, value);
        for dep in self.descriptor().dependencies {
            if matches!(dep, FieldDependency::Options { source, .. } if *source == name) {
                if let Err(err) = self.refresh_options(dep).await {
                    if self.is_mounted() {
                        self.gate.error(&err.user_message());
                    }
                    return Err(err);
                }
            }
        }
        Ok(())
    }

    pub fn attach_file(&self, name: &str, upload: FileUpload) {
        self.update(|s| {
            s.draft.attach_file(name, upload);
            s.errors.remove(name);
        });
    }

    fn checked_fields(&self) -> impl Iterator<Item = &'static FieldMetadata> {
        self.descriptor()
            .fields
            .iter()
            .filter(|f| f.source == FieldSource::Editable)
    }

    /// Run every rule; the result also becomes the displayed errors
    pub fn validate(&self) -> ValidationResult {
        let draft = self.inner.borrow().state.draft.clone();
        let errors: ValidationResult = self
            .checked_fields()
            .filter_map(|f| {
                f.validate(draft.effective_value(f.name).as_ref())
                    .err()
                    .map(|message| (f.name.to_string(), message))
            })
            .collect();
        let shown = errors.clone();
        self.update(|s| s.errors = shown);
        errors
    }

    /// Validate one field, e.g. on blur
    pub fn validate_field(&self, name: &str) -> Option<String> {
        let field = self.checked_fields().find(|f| f.name == name)?;
        let value = self.inner.borrow().state.draft.effective_value(name);
        let message = field.validate(value.as_ref()).err();
        let shown = message.clone();
        self.update(|s| match shown {
            Some(message) => {
                s.errors.insert(name.to_string(), message);
            }
            None => {
                s.errors.remove(name);
            }
        });
        message
    }

    /// Validate, then exactly one create or update
    pub async fn submit(&self) -> SubmitOutcome {
        if self.inner.borrow().state.status == FormStatus::Submitting {
            return SubmitOutcome::Busy;
        }
        let errors = self.validate();
        if !errors.is_empty() {
            return SubmitOutcome::Invalid(errors);
        }

        let (id, draft) = {
            let inner = self.inner.borrow();
            (inner.state.id.clone(), inner.state.draft.clone())
        };
        self.update(|s| s.status = FormStatus::Submitting);

        let result = match &id {
            Some(id) => self.client.update(id, &draft).await,
            None => self.client.create(&draft).await,
        };

        if !self.is_mounted() {
            return match result {
                Ok(record) => SubmitOutcome::Saved(record),
                Err(err) => SubmitOutcome::Failed(err),
            };
        }

        let element = self.descriptor().ui.element_name;
        match result {
            Ok(record) => {
                let descriptor = self.descriptor();
                self.update(|s| {
                    s.draft = Draft::with_defaults(descriptor);
                    s.id = None;
                    s.errors.clear();
                    s.status = FormStatus::Ready;
                });
                let verb = if id.is_some() { "updated" } else { "created" };
                self.gate.success(&format!("{} {}", element, verb));
                SubmitOutcome::Saved(record)
            }
            Err(err) if err.kind == ErrorKind::ValidationError && err.has_field_errors() => {
                let field_errors = err.field_errors.clone();
                self.update(|s| {
                    s.errors.extend(field_errors);
                    s.status = FormStatus::Ready;
                });
                self.gate.error(CORRECT_FIELDS_MESSAGE);
                SubmitOutcome::Rejected(err)
            }
            Err(err) => {
                self.update(|s| s.status = FormStatus::Ready);
                self.gate
                    .error(&format!("Could not save {}: {}", element.to_lowercase(), err.user_message()));
                SubmitOutcome::Failed(err)
            }
        }
    }

    /// Child form creating a record of the entity `field` references, when
    /// the field allows it
    pub fn open_inline_create(&self, field: &str) -> Option<FormController> {
        let meta = self.descriptor().field(field)?;
        if !meta.inline_create {
            return None;
        }
        let target = referenced(field, self.descriptor())?;
        Some(FormController::new(
            self.client.for_entity(target),
            self.gate.clone(),
        ))
    }

    /// Offer a record created inline and select it. Nothing else in the
    /// Draft changes.
    pub fn attach_created_option(&self, field: &str, record: &Record) -> Option<OptionItem> {
        let target = referenced(field, self.descriptor())?;
        let item = OptionItem::from_record(record, target.primary_key, target.label_field)?;
        let added = item.clone();
        self.update(|s| {
            let options = s.options.entry(field.to_string()).or_default();
            if !options.iter().any(|o| o.id == added.id) {
                options.push(added.clone());
            }
            s.draft.set(field, added.value);
            s.errors.remove(field);
        });
        Some(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::gate::testing::{gate, RecordingNotifier, ScriptedConfirm};
    use crate::shared::gate::NotifyKind;
    use crate::shared::resource::fake::{FakeBackend, Reply};
    use crate::shared::resource::{HttpResponse, Method, RequestBody};
    use contracts::domain::{a001_department, a003_drug, a006_gst, a012_purchase_entry};
    use serde_json::json;

    struct Harness {
        backend: Rc<FakeBackend>,
        notifier: Rc<RecordingNotifier>,
        form: FormController,
    }

    fn harness(descriptor: &'static EntityDescriptor) -> Harness {
        let backend = FakeBackend::new();
        let notifier = RecordingNotifier::new();
        let form = FormController::new(
            backend.client(descriptor),
            gate(&ScriptedConfirm::always(true), &notifier),
        );
        Harness {
            backend,
            notifier,
            form,
        }
    }

    fn writes(backend: &FakeBackend) -> usize {
        backend.count(Method::Post) + backend.count(Method::Put)
    }

    fn seed_drug_references(backend: &FakeBackend) {
        backend.seed(
            "category",
            vec![
                json!({"category_id": 1, "category_name": "Analgesics"}),
                json!({"category_id": 2, "category_name": "Antacids"}),
            ],
        );
        backend.seed(
            "sub-category",
            vec![
                json!({"sub_category_id": 11, "sub_category_name": "NSAID", "category": 1}),
                json!({"sub_category_id": 12, "sub_category_name": "Opioid", "category": 1}),
                json!({"sub_category_id": 21, "sub_category_name": "PPI", "category": 2}),
            ],
        );
        backend.seed(
            "drug-form",
            vec![json!({"drug_form_id": 1, "drug_form_name": "Tablet"})],
        );
    }

    #[tokio::test]
    async fn test_department_create_scenario() {
        let h = harness(&a001_department::DESCRIPTOR);
        h.form.open(None).await.unwrap();
        assert_eq!(h.form.state().status, FormStatus::Ready);

        h.form.set_field("department_name", json!("Pharmacy"));
        h.form
            .set_field("description", json!("Handles dispensing of drugs to patients"));
        assert!(h.form.validate().is_empty());

        let outcome = h.form.submit().await;
        let SubmitOutcome::Saved(record) = outcome else {
            panic!("expected Saved, got {:?}", outcome);
        };
        assert!(record.id("department_id").is_some());
        assert_eq!(writes(&h.backend), 1);
        let request = h.backend.last().unwrap();
        let RequestBody::Json(body) = request.body else {
            panic!("expected json body");
        };
        assert_eq!(
            body,
            json!({
                "department_name": "Pharmacy",
                "description": "Handles dispensing of drugs to patients"
            })
        );

        // draft cleared for the next record
        let state = h.form.state();
        assert!(state.draft.get("department_name").is_none());
        assert_eq!(
            h.notifier.events(),
            vec![(NotifyKind::Success, "Department created".to_string())]
        );
    }

    #[tokio::test]
    async fn test_drug_missing_name_blocks_submit() {
        let h = harness(&a003_drug::DESCRIPTOR);
        seed_drug_references(&h.backend);
        h.form.open(None).await.unwrap();
        h.form.set_field("drug_name", json!(""));
        h.form.set_field("brand", json!("Crocin"));
        h.form.set_field("sub_category", json!(11));
        h.form.set_field("hsn", json!("30049099"));

        let mut expected = ValidationResult::new();
        expected.insert("drug_name".to_string(), "Drug name is required".to_string());
        assert_eq!(h.form.validate(), expected);

        assert_eq!(h.form.submit().await, SubmitOutcome::Invalid(expected));
        assert_eq!(writes(&h.backend), 0);
        assert_eq!(h.notifier.count(), 0);
    }

    #[tokio::test]
    async fn test_set_field_clears_only_its_error() {
        let h = harness(&a012_purchase_entry::DESCRIPTOR);
        h.form.open(None).await.unwrap();
        let errors = h.form.validate();
        assert!(errors.contains_key("invoice_number"));
        assert!(errors.contains_key("quantity"));

        h.form.set_field("invoice_number", json!("INV-1"));
        let state = h.form.state();
        assert!(state.error("invoice_number").is_none());
        assert!(state.error("quantity").is_some());
    }

    #[tokio::test]
    async fn test_validate_field_on_blur() {
        let h = harness(&a012_purchase_entry::DESCRIPTOR);
        h.form.open(None).await.unwrap();
        h.form.set_field("quantity", json!("0"));
        assert_eq!(
            h.form.validate_field("quantity"),
            Some("Quantity must be at least 1".to_string())
        );
        assert_eq!(h.form.state().errors.len(), 1);

        h.form.set_field("quantity", json!("3"));
        assert_eq!(h.form.validate_field("quantity"), None);
        assert!(h.form.state().errors.is_empty());
    }

    #[tokio::test]
    async fn test_backend_field_errors_are_mapped() {
        let h = harness(&a001_department::DESCRIPTOR);
        h.form.open(None).await.unwrap();
        h.form.set_field("department_name", json!("Pharmacy"));
        h.backend.script(
            Method::Post,
            "/api/department/",
            Reply::Respond(HttpResponse::json(
                400,
                &json!({"department_name": ["Department with this name already exists."]}),
            )),
        );

        let outcome = h.form.submit().await;
        assert!(matches!(outcome, SubmitOutcome::Rejected(_)));
        let state = h.form.state();
        assert_eq!(
            state.error("department_name"),
            Some("Department with this name already exists.")
        );
        assert_eq!(state.draft.get("department_name"), Some(&json!("Pharmacy")));
        assert_eq!(
            h.notifier.events(),
            vec![(NotifyKind::Error, CORRECT_FIELDS_MESSAGE.to_string())]
        );
    }

    #[tokio::test]
    async fn test_generic_failure_keeps_draft_for_resubmit() {
        let h = harness(&a001_department::DESCRIPTOR);
        h.form.open(None).await.unwrap();
        h.form.set_field("department_name", json!("Pharmacy"));
        h.backend
            .script(Method::Post, "/api/department/", Reply::NetworkDown);

        let outcome = h.form.submit().await;
        assert!(matches!(outcome, SubmitOutcome::Failed(_)));
        let state = h.form.state();
        assert_eq!(state.draft.get("department_name"), Some(&json!("Pharmacy")));
        assert!(state.errors.is_empty());
        assert_eq!(h.notifier.kinds(), vec![NotifyKind::Error]);

        assert!(matches!(h.form.submit().await, SubmitOutcome::Saved(_)));
        assert_eq!(writes(&h.backend), 2);
        assert_eq!(h.notifier.kinds(), vec![NotifyKind::Error, NotifyKind::Success]);
    }

    #[tokio::test]
    async fn test_edit_updates_bound_record() {
        let h = harness(&a001_department::DESCRIPTOR);
        h.backend.seed(
            "department",
            vec![json!({"department_id": 4, "department_name": "Stores", "status": true})],
        );
        h.form.open(Some("4")).await.unwrap();
        let state = h.form.state();
        assert!(state.is_edit());
        assert_eq!(state.draft.get("department_name"), Some(&json!("Stores")));

        h.form.set_field("department_name", json!("Central stores"));
        let SubmitOutcome::Saved(record) = h.form.submit().await else {
            panic!("expected Saved");
        };
        assert_eq!(record.get("department_name"), Some(&json!("Central stores")));
        let request = h.backend.last().unwrap();
        assert_eq!(request.method, Method::Put);
        assert_eq!(request.query_param("id").as_deref(), Some("4"));
        assert_eq!(h.backend.count(Method::Post), 0);
    }

    #[tokio::test]
    async fn test_open_missing_record() {
        let h = harness(&a001_department::DESCRIPTOR);
        let err = h.form.open(Some("99")).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert!(matches!(h.form.state().status, FormStatus::Failed(_)));
    }

    #[tokio::test]
    async fn test_gst_rates_follow_percentage() {
        let h = harness(&a006_gst::DESCRIPTOR);
        h.form.open(None).await.unwrap();
        h.form.set_field("gst_percentage", json!("12"));
        let state = h.form.state();
        assert_eq!(state.draft.get("cgst"), Some(&json!(6.0)));
        assert_eq!(state.draft.get("sgst"), Some(&json!(6.0)));
        assert_eq!(state.draft.get("igst"), Some(&json!(12.0)));

        h.form.set_field("gst_percentage", json!(""));
        assert_eq!(h.form.state().draft.get("cgst"), Some(&Value::Null));
    }

    #[tokio::test]
    async fn test_category_drives_sub_category_options() {
        let h = harness(&a003_drug::DESCRIPTOR);
        seed_drug_references(&h.backend);
        h.form.open(None).await.unwrap();
        // nothing offered until a category is picked
        assert!(h.form.state().options("sub_category").is_empty());
        assert_eq!(h.form.state().options("category").len(), 2);

        h.form.change_field("category", json!(1)).await.unwrap();
        let labels: Vec<_> = h
            .form
            .state()
            .options("sub_category")
            .iter()
            .map(|o| o.label.clone())
            .collect();
        assert_eq!(labels, vec!["NSAID", "Opioid"]);
        let request = h.backend.last().unwrap();
        assert_eq!(request.path, "/api/sub-category/");
        assert_eq!(request.query_param("category").as_deref(), Some("1"));

        h.form.set_field("sub_category", json!(12));
        h.form.change_field("category", json!(1)).await.unwrap();
        assert_eq!(h.form.state().selected("sub_category").as_deref(), Some("12"));

        h.form.change_field("category", json!(2)).await.unwrap();
        let state = h.form.state();
        assert_eq!(state.draft.get("sub_category"), Some(&Value::Null));
        assert_eq!(state.options("sub_category").len(), 1);
    }

    #[tokio::test]
    async fn test_inline_create_attaches_and_selects() {
        let h = harness(&a003_drug::DESCRIPTOR);
        seed_drug_references(&h.backend);
        h.form.open(None).await.unwrap();
        h.form.set_field("drug_name", json!("Paracetamol"));
        h.form.set_field("brand", json!("Crocin"));
        let draft_before = h.form.state().draft;

        let child = h.form.open_inline_create("drug_form").expect("inline create");
        assert_eq!(child.descriptor().entity_name, "drug_form");
        child.open(None).await.unwrap();
        child.set_field("drug_form_name", json!("Syrup"));
        let SubmitOutcome::Saved(created) = child.submit().await else {
            panic!("child save failed");
        };

        let item = h.form.attach_created_option("drug_form", &created).unwrap();
        assert_eq!(item.label, "Syrup");
        let state = h.form.state();
        assert_eq!(state.options("drug_form").len(), 2);
        assert_eq!(state.selected("drug_form"), Some(item.id.clone()));
        assert_eq!(state.draft.get("drug_name"), draft_before.get("drug_name"));
        assert_eq!(state.draft.get("brand"), draft_before.get("brand"));
        assert_eq!(state.status, FormStatus::Ready);

        // not every reference may be created inline
        assert!(h.form.open_inline_create("gst").is_none());
        assert!(h.form.open_inline_create("drug_name").is_none());
    }

    #[tokio::test]
    async fn test_second_submit_while_saving_is_refused() {
        let h = harness(&a001_department::DESCRIPTOR);
        h.form.open(None).await.unwrap();
        h.form.set_field("department_name", json!("Pharmacy"));
        let hold = h.backend.hold("");

        let (first, second) = tokio::join!(h.form.submit(), async {
            let outcome = h.form.submit().await;
            hold.add_permits(1);
            outcome
        });
        assert!(matches!(first, SubmitOutcome::Saved(_)));
        assert_eq!(second, SubmitOutcome::Busy);
        assert_eq!(writes(&h.backend), 1);
    }

    #[tokio::test]
    async fn test_unmount_while_opening_discards_option_failures() {
        let h = harness(&a003_drug::DESCRIPTOR);
        for path in ["/api/category/", "/api/drug-form/", "/api/product-type/", "/api/gst/"] {
            h.backend.script(Method::Get, path, Reply::NetworkDown);
        }
        let hold = h.backend.hold("");

        let (opened, _) = tokio::join!(h.form.open(None), async {
            h.form.unmount();
            hold.add_permits(4);
        });
        assert!(opened.is_ok());
        // the pending category request was the last one sent
        assert_eq!(h.backend.requests().len(), 1);
        assert_eq!(h.notifier.count(), 0);
        let state = h.form.state();
        assert_eq!(state.status, FormStatus::Loading);
        assert!(state.options.is_empty());

        h.form.change_field("category", json!(1)).await.unwrap();
        assert_eq!(h.backend.requests().len(), 1);
        assert_eq!(h.notifier.count(), 0);
    }

    #[tokio::test]
    async fn test_failed_option_refresh_keeps_draft() {
        let h = harness(&a003_drug::DESCRIPTOR);
        seed_drug_references(&h.backend);
        h.form.open(None).await.unwrap();
        h.form.change_field("category", json!(1)).await.unwrap();
        h.form.set_field("sub_category", json!(12));
        let options_before = h.form.state().options("sub_category").to_vec();

        h.backend
            .script(Method::Get, "/api/sub-category/", Reply::NetworkDown);
        let err = h.form.change_field("category", json!(2)).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NetworkError);

        assert_eq!(h.notifier.kinds(), vec![NotifyKind::Error]);
        let state = h.form.state();
        assert_eq!(state.draft.get("category"), Some(&json!(2)));
        assert_eq!(state.draft.get("sub_category"), Some(&json!(12)));
        assert_eq!(state.options("sub_category"), options_before.as_slice());
        assert_eq!(state.status, FormStatus::Ready);
    }
}
