//! Schema driven form description
//!
//! Pure functions from editor state to what a host should draw. Hosts only
//! turn [`FieldRender`]s into widgets.

use crate::draft::DraftValue;
use crate::store::{Activity, EditorState, Step};
use crate::template::{ChoiceSource, ClassTemplate, WidgetKind};

/// One selectable entry of a select widget
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub value: String,
    pub label: String,
}

impl Choice {
    fn plain(value: &str) -> Self {
        Self {
            value: value.to_string(),
            label: value.to_string(),
        }
    }
}

/// Instruction to draw one field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRender {
    pub key: &'static str,
    pub label: &'static str,
    pub widget: WidgetKind,
    /// `None` for free input widgets
    pub choices: Option<Vec<Choice>>,
    pub value: DraftValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    Save,
    Delete,
    Back,
    Done,
}

impl FormAction {
    pub fn label(self) -> &'static str {
        match self {
            FormAction::Save => "Save",
            FormAction::Delete => "Delete",
            FormAction::Back => "Back",
            FormAction::Done => "Done",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormView {
    /// Initial fetches still running
    Loading,
    Editing {
        fields: Vec<FieldRender>,
        actions: Vec<FormAction>,
    },
    /// A save or delete is in flight
    Submitting { activity: Activity },
    /// Result of a submission, waiting for Back or Done
    Finished { actions: Vec<FormAction> },
}

pub fn render(template: &ClassTemplate, state: &EditorState, has_delete: bool) -> FormView {
    if state.activity != Activity::Idle {
        return FormView::Submitting {
            activity: state.activity,
        };
    }

    match state.step {
        Step::Two => FormView::Finished {
            actions: vec![FormAction::Back, FormAction::Done],
        },
        Step::One if !state.pending.is_empty() && state.error.is_empty() => FormView::Loading,
        Step::One => {
            let mut actions = vec![FormAction::Save];
            if has_delete {
                actions.push(FormAction::Delete);
            }
            FormView::Editing {
                fields: visible_fields(template, state),
                actions,
            }
        }
    }
}

/// Fields to draw, in template order.
///
/// A field whose choices come from a resource that has not loaded is left
/// out rather than drawn empty. Draft keys without a template entry are never
/// drawn.
pub fn visible_fields(template: &ClassTemplate, state: &EditorState) -> Vec<FieldRender> {
    template
        .fields
        .iter()
        .filter(|field| field.visibility.is_visible(&state.draft))
        .filter_map(|field| {
            let choices = match field.choices {
                ChoiceSource::Free => None,
                ChoiceSource::Literal(values) => {
                    Some(values.iter().map(|v| Choice::plain(v)).collect())
                }
                ChoiceSource::Options(group) => Some(
                    state
                        .options
                        .as_ref()?
                        .group(group)?
                        .iter()
                        .map(|v| Choice::plain(v))
                        .collect(),
                ),
                ChoiceSource::Dependents => Some(
                    state
                        .dependents
                        .as_ref()?
                        .iter()
                        .map(|r| Choice {
                            value: r.id.clone(),
                            label: r.label.clone(),
                        })
                        .collect(),
                ),
            };

            let value = state
                .draft
                .get(field.key)
                .cloned()
                .unwrap_or_else(|| field.widget.default_value());

            Some(FieldRender {
                key: field.key,
                label: field.label,
                widget: field.widget,
                choices,
                value,
            })
        })
        .collect()
}
