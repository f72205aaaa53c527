//! Field widgets
//!
//! Dumb renderers for one `FieldRender` each. They never touch the draft;
//! every change is reported through `on_change` and merged by the editor.

use awsm_dashboard_engine::{Choice, DraftValue, FieldRender, WidgetKind};
use leptos::prelude::*;
use leptos::web_sys;
use wasm_bindgen::JsCast;

const INPUT_CLASS: &str =
    "w-full px-3 py-2 text-sm border border-gray-300 rounded-md focus:outline-none focus:ring-2 focus:ring-blue-500";

pub type FieldChange = Callback<(&'static str, DraftValue)>;

#[component]
pub fn FieldWidget(field: FieldRender, on_change: FieldChange) -> impl IntoView {
    let label = field.label;
    let input = match field.widget {
        WidgetKind::Text | WidgetKind::Number => view! {
            <TextInput field=field on_change=on_change />
        }
        .into_any(),
        WidgetKind::Checkbox => view! {
            <CheckboxInput field=field on_change=on_change />
        }
        .into_any(),
        WidgetKind::SelectOne => view! {
            <SelectOne field=field on_change=on_change />
        }
        .into_any(),
        WidgetKind::SelectMultiple => view! {
            <SelectMultiple field=field on_change=on_change />
        }
        .into_any(),
    };

    view! {
        <div class="mb-4">
            <label class="block text-sm font-medium text-gray-700 mb-1">{label}</label>
            {input}
        </div>
    }
}

#[component]
fn TextInput(field: FieldRender, on_change: FieldChange) -> impl IntoView {
    let key = field.key;
    let widget = field.widget;
    let input_type = if widget == WidgetKind::Number { "number" } else { "text" };

    let handle_change = move |ev: web_sys::Event| {
        let raw = event_target_value(&ev);
        match widget.parse_input(&raw) {
            Some(value) => on_change.run((key, value)),
            None => log::warn!("ignoring invalid {} input for {}: {:?}", widget, key, raw),
        }
    };

    view! {
        <input
            type=input_type
            class=INPUT_CLASS
            prop:value=field.value.display()
            on:change=handle_change
        />
    }
}

#[component]
fn CheckboxInput(field: FieldRender, on_change: FieldChange) -> impl IntoView {
    let key = field.key;
    let checked = field.value.as_bool().unwrap_or(false);

    view! {
        <input
            type="checkbox"
            class="h-4 w-4 text-blue-600 border-gray-300 rounded"
            prop:checked=checked
            on:change=move |ev| on_change.run((key, DraftValue::Bool(event_target_checked(&ev))))
        />
    }
}

fn options_view(choices: Vec<Choice>, selected: impl Fn(&str) -> bool) -> impl IntoView {
    choices
        .into_iter()
        .map(|choice| {
            let is_selected = selected(&choice.value);
            view! {
                <option value=choice.value prop:selected=is_selected>{choice.label}</option>
            }
        })
        .collect_view()
}

#[component]
fn SelectOne(field: FieldRender, on_change: FieldChange) -> impl IntoView {
    let key = field.key;
    let current = field.value.as_str().unwrap_or_default().to_string();
    let choices = field.choices.unwrap_or_default();

    view! {
        <select
            class=format!("{} bg-white", INPUT_CLASS)
            on:change=move |ev| on_change.run((key, DraftValue::Text(event_target_value(&ev))))
        >
            <option value="" prop:selected=current.is_empty()>"-- Select --"</option>
            {options_view(choices, move |value| value == current)}
        </select>
    }
}

#[component]
fn SelectMultiple(field: FieldRender, on_change: FieldChange) -> impl IntoView {
    let key = field.key;
    let current: Vec<String> = field.value.as_list().map(<[String]>::to_vec).unwrap_or_default();
    let choices = field.choices.unwrap_or_default();

    let handle_change = move |ev: web_sys::Event| {
        let select: web_sys::HtmlSelectElement = event_target(&ev);
        let options = select.selected_options();
        let values = (0..options.length())
            .filter_map(|i| options.item(i))
            .filter_map(|el| el.dyn_into::<web_sys::HtmlOptionElement>().ok())
            .map(|option| option.value())
            .collect::<Vec<_>>();
        on_change.run((key, DraftValue::List(values)));
    };

    view! {
        <select multiple=true class=format!("{} bg-white h-32", INPUT_CLASS) on:change=handle_change>
            {options_view(choices, move |value| current.iter().any(|c| c == value))}
        </select>
    }
}
