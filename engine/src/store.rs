//! Draft state store
//!
//! Holds the draft, the fetched schemas and the transient UI flags of one
//! editor. All mutation goes through [`DraftStore::merge`], which overlays a
//! [`Patch`] and leaves every key the patch does not mention untouched.

use crate::draft::{Draft, DraftValue};
use crate::payload::{DependentResourceList, OptionsSchema};
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use tracing::debug;

/// Remote resources fetched while an editor loads
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FetchKind {
    /// Select choices for the class type
    Options,
    /// Live resources referenced by the class (running instances)
    Dependents,
}

/// Mutating request in flight
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Activity {
    #[default]
    Idle,
    Saving,
    Deleting,
}

/// Editing (one) vs. result/confirmation (two)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Step {
    #[default]
    One,
    Two,
}

impl Step {
    pub fn number(self) -> u8 {
        match self {
            Step::One => 1,
            Step::Two => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    LoadingOptions,
    LoadingDependents,
    Ready,
    Saving,
    Deleting,
    Error,
    Success,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::LoadingOptions => "LoadingOptions",
            Phase::LoadingDependents => "LoadingDependents",
            Phase::Ready => "Ready",
            Phase::Saving => "Saving",
            Phase::Deleting => "Deleting",
            Phase::Error => "Error",
            Phase::Success => "Success",
        };
        f.write_str(name)
    }
}

/// What the user sees: current phase, alert text and workflow step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiStatus {
    pub phase: Phase,
    pub message: String,
    pub step: Step,
}

/// Complete state of one editor
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditorState {
    pub draft: Draft,
    pub options: Option<OptionsSchema>,
    pub dependents: Option<DependentResourceList>,
    /// Fetches launched and not yet settled
    pub pending: BTreeSet<FetchKind>,
    /// Fetches whose last attempt failed
    pub failed: BTreeSet<FetchKind>,
    pub activity: Activity,
    pub error: String,
    pub success: String,
    pub step: Step,
}

impl EditorState {
    /// Overlay a patch onto this state
    pub fn apply(&mut self, patch: &Patch) {
        for (key, value) in &patch.fields {
            self.draft.insert(key.clone(), value.clone());
        }
        if let Some(options) = &patch.options {
            self.options = Some(options.clone());
        }
        if let Some(dependents) = &patch.dependents {
            self.dependents = Some(dependents.clone());
        }
        overlay_flags(&mut self.pending, &patch.pending);
        overlay_flags(&mut self.failed, &patch.failed);
        if let Some(activity) = patch.activity {
            self.activity = activity;
        }
        if let Some(error) = &patch.error {
            self.error = error.clone();
        }
        if let Some(success) = &patch.success {
            self.success = success.clone();
        }
        if let Some(step) = patch.step {
            self.step = step;
        }
    }

    pub fn phase(&self) -> Phase {
        match self.activity {
            Activity::Saving => return Phase::Saving,
            Activity::Deleting => return Phase::Deleting,
            Activity::Idle => {}
        }
        if !self.error.is_empty() {
            Phase::Error
        } else if self.pending.contains(&FetchKind::Options) {
            Phase::LoadingOptions
        } else if self.pending.contains(&FetchKind::Dependents) {
            Phase::LoadingDependents
        } else if !self.failed.is_empty() {
            Phase::Error
        } else if !self.success.is_empty() {
            Phase::Success
        } else {
            Phase::Ready
        }
    }

    pub fn status(&self) -> UiStatus {
        let message = if !self.error.is_empty() {
            self.error.clone()
        } else {
            self.success.clone()
        };
        UiStatus {
            phase: self.phase(),
            message,
            step: self.step,
        }
    }
}

fn overlay_flags(flags: &mut BTreeSet<FetchKind>, patch: &BTreeMap<FetchKind, bool>) {
    for (kind, set) in patch {
        if *set {
            flags.insert(*kind);
        } else {
            flags.remove(kind);
        }
    }
}

/// Partial update of an [`EditorState`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Patch {
    fields: BTreeMap<String, DraftValue>,
    options: Option<OptionsSchema>,
    dependents: Option<DependentResourceList>,
    pending: BTreeMap<FetchKind, bool>,
    failed: BTreeMap<FetchKind, bool>,
    activity: Option<Activity>,
    error: Option<String>,
    success: Option<String>,
    step: Option<Step>,
}

impl Patch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, key: impl Into<String>, value: DraftValue) -> Self {
        self.fields.insert(key.into(), value);
        self
    }

    pub fn fields<I>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = (String, DraftValue)>,
    {
        self.fields.extend(fields);
        self
    }

    pub fn options(mut self, options: OptionsSchema) -> Self {
        self.options = Some(options);
        self
    }

    pub fn dependents(mut self, dependents: DependentResourceList) -> Self {
        self.dependents = Some(dependents);
        self
    }

    pub fn pending(mut self, kind: FetchKind, pending: bool) -> Self {
        self.pending.insert(kind, pending);
        self
    }

    pub fn failed(mut self, kind: FetchKind, failed: bool) -> Self {
        self.failed.insert(kind, failed);
        self
    }

    pub fn activity(mut self, activity: Activity) -> Self {
        self.activity = Some(activity);
        self
    }

    pub fn error(mut self, message: impl Into<String>) -> Self {
        self.error = Some(message.into());
        self
    }

    pub fn clear_error(self) -> Self {
        self.error("")
    }

    pub fn success(mut self, message: impl Into<String>) -> Self {
        self.success = Some(message.into());
        self
    }

    pub fn clear_success(self) -> Self {
        self.success("")
    }

    pub fn step(mut self, step: Step) -> Self {
        self.step = Some(step);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Patch::default()
    }
}

type Listener = Box<dyn Fn(&EditorState)>;

/// Single-owner container for an [`EditorState`].
///
/// A merge is applied in full before any listener or reader sees the state.
#[derive(Default)]
pub struct DraftStore {
    state: RefCell<EditorState>,
    listeners: RefCell<Vec<Listener>>,
}

impl DraftStore {
    pub fn new(state: EditorState) -> Self {
        Self {
            state: RefCell::new(state),
            listeners: RefCell::new(Vec::new()),
        }
    }

    pub fn merge(&self, patch: Patch) {
        if patch.is_empty() {
            return;
        }
        self.state.borrow_mut().apply(&patch);
        debug!(?patch, "merged editor state");

        // listeners may read back through the editor, so no borrow is held
        let state = self.snapshot();
        for listener in self.listeners.borrow().iter() {
            listener(&state);
        }
    }

    /// Read the current state without copying it
    pub fn read<R>(&self, f: impl FnOnce(&EditorState) -> R) -> R {
        f(&self.state.borrow())
    }

    pub fn snapshot(&self) -> EditorState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self, listener: impl Fn(&EditorState) + 'static) {
        self.listeners.borrow_mut().push(Box::new(listener));
    }

    pub fn clear_listeners(&self) {
        self.listeners.borrow_mut().clear();
    }
}

impl fmt::Debug for DraftStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DraftStore")
            .field("state", &self.state.borrow())
            .field("listeners", &self.listeners.borrow().len())
            .finish()
    }
}
