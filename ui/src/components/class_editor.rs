//! Browser host of one class editor
//!
//! Owns a `ClassEditor`, mirrors its state into a signal and spawns the jobs
//! it returns. Unmounting tears the editor down, so late responses are
//! dropped by the editor itself.

use super::fields::FieldWidget;
use super::modal::DashboardModals;
use crate::api::GlooResourceClient;
use awsm_dashboard_engine::render;
use awsm_dashboard_engine::{ClassConfig, ClassEditor, DraftValue, FormAction, FormView, Job, Phase};
use leptos::prelude::*;
use std::rc::Rc;

fn spawn_all(jobs: Vec<Job>) {
    for job in jobs {
        wasm_bindgen_futures::spawn_local(job);
    }
}

#[component]
pub fn ClassEditorView(config: ClassConfig, host: DashboardModals) -> impl IntoView {
    let has_delete = config.has_delete;
    let client = use_context::<GlooResourceClient>().unwrap_or_default();
    let editor = match ClassEditor::new(config, Rc::new(client), Rc::new(host)) {
        Ok(editor) => editor,
        Err(e) => {
            return view! { <div class="text-red-500">{e.to_string()}</div> }.into_any();
        }
    };

    let template = editor.template();
    let state = RwSignal::new(editor.state());
    editor.subscribe(move |s| state.set(s.clone()));

    let token = editor.mount_token();
    spawn_all(editor.initialize());
    let editor = StoredValue::new_local(editor);

    on_cleanup(move || {
        // the token alone still silences late replies if the value is gone
        if editor.try_with_value(ClassEditor::teardown).is_none() {
            token.clear();
        }
    });

    let on_change = Callback::new(move |(key, value): (&'static str, DraftValue)| {
        editor.with_value(|e| {
            if let Err(err) = e.set_field(key, value) {
                log::warn!("{}", err);
            }
        });
    });

    let run_action = move |action: FormAction| {
        editor.with_value(|e| {
            let result = match action {
                FormAction::Save => e.save().map(|job| spawn_all(vec![job])),
                FormAction::Delete => e.delete().map(|job| spawn_all(vec![job])),
                FormAction::Back => e.back(),
                FormAction::Done => e.done(),
            };
            if let Err(err) = result {
                log::warn!("{}", err);
            }
        });
    };

    let retry = move |_: leptos::ev::MouseEvent| {
        editor.with_value(|e| match e.acknowledge_error() {
            Ok(jobs) => spawn_all(jobs),
            Err(err) => log::warn!("{}", err),
        });
    };

    let alert = move || {
        let status = state.with(|s| s.status());
        if status.message.is_empty() {
            return None;
        }
        let (class, retryable) = match status.phase {
            Phase::Error => ("bg-red-100 text-red-800", status.step.number() == 1),
            _ => ("bg-green-100 text-green-800", false),
        };
        Some(view! {
            <div class=format!("p-3 mb-4 rounded flex justify-between items-center {}", class)>
                <span>{status.message}</span>
                {retryable.then(|| view! {
                    <button class="underline text-sm" on:click=retry>"Retry"</button>
                })}
            </div>
        })
    };

    let body = move || match state.with(|s| render::render(template, s, has_delete)) {
        FormView::Loading => view! {
            <div class="text-gray-500">"Loading..."</div>
        }
        .into_any(),
        FormView::Submitting { activity } => view! {
            <div class="text-gray-500">{format!("{:?}...", activity)}</div>
        }
        .into_any(),
        FormView::Editing { fields, actions } => view! {
            <div>
                {fields
                    .into_iter()
                    .map(|field| view! { <FieldWidget field=field on_change=on_change /> })
                    .collect_view()}
                <ActionBar actions=actions on_action=Callback::new(run_action) />
            </div>
        }
        .into_any(),
        FormView::Finished { actions } => view! {
            <ActionBar actions=actions on_action=Callback::new(run_action) />
        }
        .into_any(),
    };

    view! {
        <div>
            {alert}
            {body}
        </div>
    }
    .into_any()
}

#[component]
fn ActionBar(actions: Vec<FormAction>, on_action: Callback<FormAction>) -> impl IntoView {
    view! {
        <div class="flex justify-end space-x-2 mt-6">
            {actions
                .into_iter()
                .map(|action| {
                    let class = match action {
                        FormAction::Delete => "bg-red-500 hover:bg-red-600 text-white px-4 py-2 rounded",
                        FormAction::Save | FormAction::Done => {
                            "bg-blue-500 hover:bg-blue-600 text-white px-4 py-2 rounded"
                        }
                        FormAction::Back => "bg-gray-200 hover:bg-gray-300 px-4 py-2 rounded",
                    };
                    view! {
                        <button class=class on:click=move |_| on_action.run(action)>
                            {action.label()}
                        </button>
                    }
                })
                .collect_view()}
        </div>
    }
}
