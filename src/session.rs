//! Headless editor sessions
//!
//! Drives one [`ClassEditor`] from the command line the way the browser modal
//! does: load the stored class, run the initial fetches, apply edits, then
//! optionally save or delete.

use crate::cli::EditArgs;
use anyhow::Context;
use awsm_dashboard_engine::{
    ClassCatalog, ClassConfig, ClassEditor, ClassType, EditorError, Endpoint, FormView, ModalHost,
    OptionsSchema, Phase, ResourceClient, Step, UiStatus,
};
use futures::future::join_all;
use std::cell::Cell;
use std::io::Write;
use std::path::Path;
use std::rc::Rc;
use tracing::info;

/// Modal host of a terminal session. There is nothing to navigate, so the
/// signals are only logged.
#[derive(Debug, Default)]
pub struct LoggingHost {
    backs: Cell<usize>,
    closed: Cell<bool>,
}

impl LoggingHost {
    pub fn backs(&self) -> usize {
        self.backs.get()
    }

    pub fn closed(&self) -> bool {
        self.closed.get()
    }
}

impl ModalHost for LoggingHost {
    fn back_button(&self) {
        self.backs.set(self.backs.get() + 1);
        info!("editor returned to the previous view");
    }

    fn hide_all_modals(&self) {
        self.closed.set(true);
        info!("editor closed");
    }
}

async fn fetch(client: &dyn ResourceClient, endpoint: &Endpoint) -> Result<Vec<u8>, EditorError> {
    client
        .get(endpoint)
        .await
        .map_err(|source| EditorError::Fetch {
            endpoint: client.url(endpoint),
            source,
        })
}

fn class_type(api_type: &str) -> Result<ClassType, EditorError> {
    ClassType::from_api_type(api_type)
        .ok_or_else(|| EditorError::UnknownClassType(api_type.to_string()))
}

pub async fn fetch_catalog(
    client: &dyn ResourceClient,
    api_type: &str,
) -> Result<ClassCatalog, EditorError> {
    let class_type = class_type(api_type)?;
    let endpoint = Endpoint::ClassList {
        api_type: class_type.api_type().to_string(),
    };
    let bytes = fetch(client, &endpoint).await?;
    ClassCatalog::decode(&bytes).map_err(|source| EditorError::Decode {
        endpoint: client.url(&endpoint),
        source,
    })
}

pub async fn fetch_options(
    client: &dyn ResourceClient,
    api_type: &str,
) -> Result<OptionsSchema, EditorError> {
    let class_type = class_type(api_type)?;
    let endpoint = Endpoint::ClassOptions {
        api_type: class_type.api_type().to_string(),
    };
    let bytes = fetch(client, &endpoint).await?;
    OptionsSchema::decode(&bytes).map_err(|source| EditorError::Decode {
        endpoint: client.url(&endpoint),
        source,
    })
}

/// Stored object of a class: read from `file` when given, otherwise looked up
/// in the class list. `None` means the class does not exist yet.
pub async fn load_class(
    client: &dyn ResourceClient,
    api_type: &str,
    class_name: &str,
    file: Option<&Path>,
) -> anyhow::Result<Option<Vec<u8>>> {
    if let Some(path) = file {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read class file {}", path.display()))?;
        return Ok(Some(bytes));
    }

    let catalog = fetch_catalog(client, api_type).await?;
    Ok(catalog.class_bytes(class_name))
}

/// Run one editor session and return the status it ended in
pub async fn run_edit(
    client: Rc<dyn ResourceClient>,
    args: &EditArgs,
    out: &mut dyn Write,
) -> anyhow::Result<UiStatus> {
    let existing = load_class(
        client.as_ref(),
        &args.api_type,
        &args.class_name,
        args.file.as_deref(),
    )
    .await?;

    let mut config =
        ClassConfig::new(&args.api_type, &args.class_name).with_delete(existing.is_some());
    if let Some(bytes) = existing {
        config = config.with_existing(bytes);
    }

    let host = Rc::new(LoggingHost::default());
    let editor = ClassEditor::new(config, client, host)?;
    join_all(editor.initialize()).await;

    let result = drive(&editor, args, out).await;
    editor.teardown();
    result
}

async fn drive(
    editor: &ClassEditor,
    args: &EditArgs,
    out: &mut dyn Write,
) -> anyhow::Result<UiStatus> {
    if editor.status().phase == Phase::Error {
        let status = editor.status();
        writeln!(out, "{}", status_line(&status))?;
        return Ok(status);
    }

    for (key, raw) in &args.set {
        let field = editor
            .template()
            .field(key)
            .ok_or_else(|| EditorError::UnknownField(key.clone()))?;
        let value = field
            .widget
            .parse_input(raw)
            .ok_or_else(|| EditorError::InvalidValue {
                key: key.clone(),
                expected: field.widget,
            })?;
        editor.set_field(key, value)?;
    }

    write_form(out, &editor.render())?;

    if args.save {
        editor.save()?.await;
    } else if args.delete {
        editor.delete()?.await;
    }

    let status = editor.status();
    writeln!(out, "{}", status_line(&status))?;
    if status.phase == Phase::Success && status.step == Step::Two {
        editor.done()?;
    }
    Ok(status)
}

pub fn status_line(status: &UiStatus) -> String {
    if status.message.is_empty() {
        format!("[{}] step {}", status.phase, status.step.number())
    } else {
        format!(
            "[{}] step {}: {}",
            status.phase,
            status.step.number(),
            status.message
        )
    }
}

/// Plain text rendering of a form view
pub fn write_form(out: &mut dyn Write, view: &FormView) -> std::io::Result<()> {
    match view {
        FormView::Loading => writeln!(out, "loading...")?,
        FormView::Submitting { activity } => writeln!(out, "{:?}...", activity)?,
        FormView::Editing { fields, actions } => {
            for field in fields {
                writeln!(
                    out,
                    "{} ({}, {}): {}",
                    field.label,
                    field.key,
                    field.widget,
                    field.value.display()
                )?;
                if let Some(choices) = &field.choices {
                    let labels: Vec<&str> = choices.iter().map(|c| c.label.as_str()).collect();
                    writeln!(out, "    choices: {}", labels.join(", "))?;
                }
            }
            let labels: Vec<&str> = actions.iter().map(|a| a.label()).collect();
            writeln!(out, "actions: {}", labels.join(", "))?;
        }
        FormView::Finished { actions } => {
            let labels: Vec<&str> = actions.iter().map(|a| a.label()).collect();
            writeln!(out, "actions: {}", labels.join(", "))?;
        }
    }
    Ok(())
}
