//! Lifecycle controller shared by every class editor
//!
//! One [`ClassEditor`] drives one mounted editor instance:
//!
//! - `initialize` builds the draft and launches one independent fetch per
//!   remote resource the class type needs
//! - completions, user edits and submissions are merged into the
//!   [`DraftStore`], the only mutation path
//! - `save`/`delete`/`back`/`done` move the two step workflow
//! - after `teardown` every completion is discarded unseen
//!
//! Asynchronous work is handed back to the host as [`Job`]s; the host decides
//! how to run them (`spawn_local` in the browser, `join_all` on the CLI).

use crate::client::{Endpoint, ModalHost, ResourceClient};
use crate::draft::{Draft, DraftValue};
use crate::error::{EditorError, TransportError};
use crate::payload::{DependentResourceList, OptionsSchema};
use crate::render::{self, FormView};
use crate::store::{Activity, DraftStore, EditorState, FetchKind, Patch, Phase, Step, UiStatus};
use crate::template::{ClassTemplate, ClassType};
use crate::token::MountToken;
use futures::future::LocalBoxFuture;
use std::cell::Cell;
use std::rc::Rc;
use tracing::{debug, info, warn};

/// Unit of background work launched by the controller
pub type Job = LocalBoxFuture<'static, ()>;

pub const SAVED_MESSAGE: &str = "Class was saved";
pub const DELETED_MESSAGE: &str = "Class was deleted";

/// Identity of the class being edited, supplied by the modal host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassConfig {
    pub api_type: String,
    pub class_name: String,
    /// Stored class object, absent for a new class
    pub existing_object: Option<Vec<u8>>,
    pub has_delete: bool,
}

impl ClassConfig {
    pub fn new(api_type: impl Into<String>, class_name: impl Into<String>) -> Self {
        Self {
            api_type: api_type.into(),
            class_name: class_name.into(),
            existing_object: None,
            has_delete: false,
        }
    }

    pub fn with_existing(mut self, existing_object: Vec<u8>) -> Self {
        self.existing_object = Some(existing_object);
        self
    }

    pub fn with_delete(mut self, has_delete: bool) -> Self {
        self.has_delete = has_delete;
        self
    }
}

#[derive(Debug, Clone, Copy)]
enum Submission {
    Save,
    Delete,
}

impl Submission {
    fn action(self) -> &'static str {
        match self {
            Submission::Save => "save",
            Submission::Delete => "delete",
        }
    }
}

struct Inner {
    config: ClassConfig,
    template: &'static ClassTemplate,
    client: Rc<dyn ResourceClient>,
    host: Rc<dyn ModalHost>,
    store: DraftStore,
    token: MountToken,
    initialized: Cell<bool>,
}

/// Handle to one editor instance. Clones share the same instance.
#[derive(Clone)]
pub struct ClassEditor {
    inner: Rc<Inner>,
}

impl ClassEditor {
    pub fn new(
        config: ClassConfig,
        client: Rc<dyn ResourceClient>,
        host: Rc<dyn ModalHost>,
    ) -> Result<Self, EditorError> {
        let class_type = ClassType::from_api_type(&config.api_type)
            .ok_or_else(|| EditorError::UnknownClassType(config.api_type.clone()))?;

        Ok(Self {
            inner: Rc::new(Inner {
                config,
                template: class_type.template(),
                client,
                host,
                store: DraftStore::default(),
                token: MountToken::new(),
                initialized: Cell::new(false),
            }),
        })
    }

    pub fn config(&self) -> &ClassConfig {
        &self.inner.config
    }

    pub fn template(&self) -> &'static ClassTemplate {
        self.inner.template
    }

    /// Shared liveness flag; clearing it is equivalent to [`teardown`](Self::teardown)
    /// as far as completions are concerned.
    pub fn mount_token(&self) -> MountToken {
        self.inner.token.clone()
    }

    pub fn is_mounted(&self) -> bool {
        self.inner.token.is_live()
    }

    /// Decode the existing class into the draft and launch the initial
    /// fetches. Only the first call has any effect.
    pub fn initialize(&self) -> Vec<Job> {
        if !self.is_mounted() || self.inner.initialized.replace(true) {
            return Vec::new();
        }

        let config = &self.inner.config;
        let (draft, decode_error) = match &config.existing_object {
            Some(bytes) => match Draft::decode(bytes) {
                Ok(draft) => (draft, None),
                Err(err) => {
                    warn!(class = %config.class_name, error = %err, "stored class is not decodable");
                    (
                        Draft::new(),
                        Some(format!("Unable to decode class {}: {}", config.class_name, err)),
                    )
                }
            },
            None => (Draft::new(), None),
        };
        let draft = draft.with_defaults(self.inner.template);

        let kinds = self.inner.template.required_fetches();
        let mut patch = Patch::new()
            .fields(draft.iter().map(|(k, v)| (k.to_string(), v.clone())))
            .step(Step::One);
        for kind in &kinds {
            patch = patch.pending(*kind, true).failed(*kind, false);
        }
        if let Some(message) = decode_error {
            patch = patch.error(message);
        }
        self.inner.store.merge(patch);

        info!(
            api_type = %config.api_type,
            class = %config.class_name,
            fetches = kinds.len(),
            "editor initialized"
        );
        kinds.into_iter().map(|kind| self.fetch_job(kind)).collect()
    }

    fn endpoint_for(&self, kind: FetchKind) -> Endpoint {
        match kind {
            FetchKind::Options => Endpoint::ClassOptions {
                api_type: self.inner.config.api_type.clone(),
            },
            FetchKind::Dependents => Endpoint::RunningInstances,
        }
    }

    fn class_endpoint(&self) -> Endpoint {
        Endpoint::Class {
            api_type: self.inner.config.api_type.clone(),
            class_name: self.inner.config.class_name.clone(),
        }
    }

    fn fetch_job(&self, kind: FetchKind) -> Job {
        let editor = self.clone();
        let endpoint = self.endpoint_for(kind);
        Box::pin(async move {
            debug!(?kind, url = %editor.inner.client.url(&endpoint), "fetching");
            let result = editor.inner.client.get(&endpoint).await;
            editor.on_fetch_settled(kind, result);
        })
    }

    /// Completion of a launched fetch. A no-op once torn down or when the
    /// fetch is not outstanding.
    pub fn on_fetch_settled(&self, kind: FetchKind, result: Result<Vec<u8>, TransportError>) {
        if !self.is_mounted() {
            debug!(?kind, "discarding fetch completion after teardown");
            return;
        }
        if !self.inner.store.read(|s| s.pending.contains(&kind)) {
            debug!(?kind, "discarding completion of a fetch that is not outstanding");
            return;
        }

        let endpoint = self.inner.client.url(&self.endpoint_for(kind));
        let settled = Patch::new().pending(kind, false);
        let patch = match decode_fetch(kind, &endpoint, result) {
            Ok(Decoded::Options(options)) => settled.options(options).failed(kind, false),
            Ok(Decoded::Dependents(dependents)) => {
                settled.dependents(dependents).failed(kind, false)
            }
            Err(err) => {
                warn!(?kind, error = %err, "fetch failed");
                settled.failed(kind, true).error(err.status_message())
            }
        };
        self.inner.store.merge(patch);
    }

    /// Merge one user edit into the draft
    pub fn set_field(&self, key: &str, value: DraftValue) -> Result<(), EditorError> {
        self.ensure_mounted()?;
        let (phase, step) = self.inner.store.read(|s| (s.phase(), s.step));
        if !matches!(phase, Phase::Ready | Phase::Error) || step != Step::One {
            return Err(EditorError::Rejected {
                action: "edit",
                phase,
            });
        }

        let field = self
            .inner
            .template
            .field(key)
            .ok_or_else(|| EditorError::UnknownField(key.to_string()))?;
        if !field.widget.accepts(&value) {
            return Err(EditorError::InvalidValue {
                key: key.to_string(),
                expected: field.widget,
            });
        }

        self.inner.store.merge(Patch::new().field(field.key, value));
        Ok(())
    }

    /// Submit the full draft. Only permitted while Ready.
    pub fn save(&self) -> Result<Job, EditorError> {
        self.ensure_mounted()?;
        self.ensure_ready(Submission::Save)?;

        let payload = self.inner.store.read(|s| s.draft.to_payload());
        self.inner
            .store
            .merge(Patch::new().activity(Activity::Saving).step(Step::Two));

        let editor = self.clone();
        let endpoint = self.class_endpoint();
        Ok(Box::pin(async move {
            let result = editor.inner.client.put(&endpoint, &payload).await;
            editor.on_submit_settled(Submission::Save, result);
        }))
    }

    /// Delete the class. Only permitted while Ready and when the host allows it.
    pub fn delete(&self) -> Result<Job, EditorError> {
        self.ensure_mounted()?;
        if !self.inner.config.has_delete {
            return Err(EditorError::DeleteUnsupported);
        }
        self.ensure_ready(Submission::Delete)?;

        self.inner
            .store
            .merge(Patch::new().activity(Activity::Deleting));

        let editor = self.clone();
        let endpoint = self.class_endpoint();
        Ok(Box::pin(async move {
            let result = editor.inner.client.delete(&endpoint).await;
            editor.on_submit_settled(Submission::Delete, result);
        }))
    }

    fn on_submit_settled(&self, submission: Submission, result: Result<(), TransportError>) {
        if !self.is_mounted() {
            debug!(action = submission.action(), "discarding submission result after teardown");
            return;
        }

        let idle = Patch::new().activity(Activity::Idle);
        let patch = match (submission, result) {
            (Submission::Save, Ok(())) => idle.success(SAVED_MESSAGE).clear_error(),
            (Submission::Delete, Ok(())) => idle
                .success(DELETED_MESSAGE)
                .clear_error()
                .step(Step::Two),
            (submission, Err(source)) => {
                let err = EditorError::Submit {
                    endpoint: self.inner.client.url(&self.class_endpoint()),
                    source,
                };
                warn!(action = submission.action(), error = %err, "submission failed");
                let patch = idle.error(err.status_message());
                match submission {
                    Submission::Save => patch.step(Step::One),
                    Submission::Delete => patch,
                }
            }
        };
        self.inner.store.merge(patch);
    }

    /// Clear the error alert and relaunch every fetch whose last attempt
    /// failed.
    pub fn acknowledge_error(&self) -> Result<Vec<Job>, EditorError> {
        self.ensure_mounted()?;
        let (phase, step, failed) = self
            .inner
            .store
            .read(|s| (s.phase(), s.step, s.failed.clone()));
        if phase != Phase::Error || step != Step::One {
            return Err(EditorError::Rejected {
                action: "retry",
                phase,
            });
        }

        let mut patch = Patch::new().clear_error();
        for kind in &failed {
            patch = patch.pending(*kind, true).failed(*kind, false);
        }
        self.inner.store.merge(patch);

        Ok(failed.into_iter().map(|kind| self.fetch_job(kind)).collect())
    }

    /// Leave the result step and return to the previous view
    pub fn back(&self) -> Result<(), EditorError> {
        self.ensure_result_step("go back")?;
        self.inner
            .store
            .merge(Patch::new().clear_success().step(Step::One));
        self.inner.host.back_button();
        Ok(())
    }

    /// Close the editor. Leaves the state as it is.
    pub fn done(&self) -> Result<(), EditorError> {
        self.ensure_result_step("finish")?;
        self.inner.host.hide_all_modals();
        Ok(())
    }

    /// Detach the editor. Results of work still in flight are discarded.
    pub fn teardown(&self) {
        if self.inner.token.clear() {
            self.inner.store.clear_listeners();
            debug!(class = %self.inner.config.class_name, "editor torn down");
        }
    }

    /// Called with the merged state after every change
    pub fn subscribe(&self, listener: impl Fn(&EditorState) + 'static) {
        self.inner.store.subscribe(listener);
    }

    pub fn state(&self) -> EditorState {
        self.inner.store.snapshot()
    }

    pub fn status(&self) -> UiStatus {
        self.inner.store.read(EditorState::status)
    }

    pub fn draft(&self) -> Draft {
        self.inner.store.read(|s| s.draft.clone())
    }

    pub fn render(&self) -> FormView {
        self.inner.store.read(|s| {
            render::render(self.inner.template, s, self.inner.config.has_delete)
        })
    }

    fn ensure_mounted(&self) -> Result<(), EditorError> {
        if self.is_mounted() {
            Ok(())
        } else {
            Err(EditorError::Unmounted)
        }
    }

    fn ensure_ready(&self, submission: Submission) -> Result<(), EditorError> {
        let phase = self.inner.store.read(EditorState::phase);
        if phase == Phase::Ready {
            Ok(())
        } else {
            Err(EditorError::Rejected {
                action: submission.action(),
                phase,
            })
        }
    }

    fn ensure_result_step(&self, action: &'static str) -> Result<(), EditorError> {
        self.ensure_mounted()?;
        let (phase, step, activity) = self
            .inner
            .store
            .read(|s| (s.phase(), s.step, s.activity));
        if step == Step::Two && activity == Activity::Idle {
            Ok(())
        } else {
            Err(EditorError::Rejected { action, phase })
        }
    }
}

enum Decoded {
    Options(OptionsSchema),
    Dependents(DependentResourceList),
}

fn decode_fetch(
    kind: FetchKind,
    endpoint: &str,
    result: Result<Vec<u8>, TransportError>,
) -> Result<Decoded, EditorError> {
    let bytes = result.map_err(|source| EditorError::Fetch {
        endpoint: endpoint.to_string(),
        source,
    })?;
    let decoded = match kind {
        FetchKind::Options => OptionsSchema::decode(&bytes).map(Decoded::Options),
        FetchKind::Dependents => DependentResourceList::decode(&bytes).map(Decoded::Dependents),
    };
    decoded.map_err(|source| EditorError::Decode {
        endpoint: endpoint.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use futures::future::join_all;
    use serde_json::Value;

    const OPTIONS: &[u8] = br#"{"classOptions": {"regions": ["us-east-1"], "metricName": ["t3.micro", "m5.large"]}}"#;

    /// Answers every read immediately with the canned options payload
    struct Immediate;

    #[async_trait(?Send)]
    impl ResourceClient for Immediate {
        fn base_url(&self) -> &str {
            "http://api.test"
        }

        async fn get(&self, _endpoint: &Endpoint) -> Result<Vec<u8>, TransportError> {
            Ok(OPTIONS.to_vec())
        }

        async fn put(&self, _endpoint: &Endpoint, _body: &Value) -> Result<(), TransportError> {
            Ok(())
        }

        async fn delete(&self, _endpoint: &Endpoint) -> Result<(), TransportError> {
            Ok(())
        }
    }

    struct NoHost;

    impl ModalHost for NoHost {
        fn back_button(&self) {}
        fn hide_all_modals(&self) {}
    }

    fn editor(config: ClassConfig) -> ClassEditor {
        ClassEditor::new(config, Rc::new(Immediate), Rc::new(NoHost)).unwrap()
    }

    #[test]
    fn test_unknown_class_type() {
        let result = ClassEditor::new(
            ClassConfig::new("volumes", "x"),
            Rc::new(Immediate),
            Rc::new(NoHost),
        );
        assert!(matches!(result, Err(EditorError::UnknownClassType(t)) if t == "volumes"));
    }

    #[tokio::test]
    async fn test_initialize_runs_once() {
        let editor = editor(ClassConfig::new("launchconfigurations", "web"));

        let jobs = editor.initialize();
        assert_eq!(jobs.len(), 1);
        assert!(editor.initialize().is_empty());

        join_all(jobs).await;
        assert_eq!(editor.status().phase, Phase::Ready);
    }

    #[tokio::test]
    async fn test_undecodable_existing_object() {
        let editor = editor(ClassConfig::new("snapshots", "broken").with_existing(b"[1, 2]".to_vec()));
        join_all(editor.initialize()).await;

        let status = editor.status();
        assert_eq!(status.phase, Phase::Error);
        assert!(status.message.starts_with("Unable to decode class broken: "));
        assert_eq!(editor.draft().get("rotate"), Some(&DraftValue::Bool(false)));

        assert!(editor.acknowledge_error().unwrap().is_empty());
        assert_eq!(editor.status().phase, Phase::Ready);
    }

    #[tokio::test]
    async fn test_set_field_validation() {
        let editor = editor(ClassConfig::new("launchconfigurations", "web"));
        let jobs = editor.initialize();

        assert!(matches!(
            editor.set_field("version", DraftValue::from(2i64)),
            Err(EditorError::Rejected { action: "edit", phase: Phase::LoadingOptions })
        ));

        join_all(jobs).await;
        assert!(matches!(
            editor.set_field("owner", DraftValue::from("ops")),
            Err(EditorError::UnknownField(key)) if key == "owner"
        ));
        assert!(matches!(
            editor.set_field("rotate", DraftValue::from("yes")),
            Err(EditorError::InvalidValue { expected: crate::template::WidgetKind::Checkbox, .. })
        ));

        editor.set_field("version", DraftValue::from(2i64)).unwrap();
        editor
            .set_field("regions", DraftValue::from(vec!["us-east-1".to_string()]))
            .unwrap();
        assert_eq!(editor.draft().get("version"), Some(&DraftValue::from(2i64)));
    }

    #[tokio::test]
    async fn test_instance_class_choices_come_from_metric_group() {
        let editor = editor(ClassConfig::new("launchconfigurations", "web"));
        join_all(editor.initialize()).await;

        let FormView::Editing { fields, .. } = editor.render() else {
            panic!("editor should be editable");
        };
        let instance_class = fields.iter().find(|f| f.key == "instanceClass").unwrap();
        let values: Vec<_> = instance_class
            .choices
            .iter()
            .flatten()
            .map(|c| c.value.as_str())
            .collect();
        assert_eq!(values, vec!["t3.micro", "m5.large"]);
    }

    #[tokio::test]
    async fn test_back_and_done_need_result_step() {
        let editor = editor(ClassConfig::new("snapshots", "nightly"));
        join_all(editor.initialize()).await;

        assert!(matches!(editor.back(), Err(EditorError::Rejected { .. })));
        assert!(matches!(editor.done(), Err(EditorError::Rejected { .. })));
    }

    #[test]
    fn test_teardown_is_idempotent() {
        let editor = editor(ClassConfig::new("snapshots", "nightly"));
        editor.teardown();
        editor.teardown();

        assert!(!editor.is_mounted());
        assert!(editor.initialize().is_empty());
        assert!(matches!(editor.save(), Err(EditorError::Unmounted)));
    }

    #[test]
    fn test_teardown_releases_listeners() {
        let editor = editor(ClassConfig::new("snapshots", "nightly"));
        let captured = Rc::new(Cell::new(0));
        let sink = captured.clone();
        editor.subscribe(move |_| sink.set(sink.get() + 1));
        assert_eq!(Rc::strong_count(&captured), 2);

        editor.teardown();
        assert_eq!(Rc::strong_count(&captured), 1);
    }
}
