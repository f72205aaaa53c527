//! Per class type field templates
//!
//! Every class editor shares one controller; the class type only contributes
//! an ordered list of field descriptors and the set of remote resources its
//! choices come from.

use crate::draft::{Draft, DraftValue};
use crate::store::FetchKind;
use serde_json::Number;
use std::fmt;

/// Widget used to edit a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    Text,
    Number,
    Checkbox,
    SelectOne,
    SelectMultiple,
}

impl WidgetKind {
    /// Value used when the stored class does not carry the field
    pub fn default_value(self) -> DraftValue {
        match self {
            WidgetKind::Text | WidgetKind::SelectOne => DraftValue::Text(String::new()),
            WidgetKind::Number => DraftValue::Number(0.into()),
            WidgetKind::Checkbox => DraftValue::Bool(false),
            WidgetKind::SelectMultiple => DraftValue::List(Vec::new()),
        }
    }

    /// Whether the widget can hold this value
    pub fn accepts(self, value: &DraftValue) -> bool {
        matches!(
            (self, value),
            (WidgetKind::Text | WidgetKind::SelectOne, DraftValue::Text(_) | DraftValue::Null)
                | (WidgetKind::Number, DraftValue::Number(_) | DraftValue::Null)
                | (WidgetKind::Checkbox, DraftValue::Bool(_))
                | (WidgetKind::SelectMultiple, DraftValue::List(_))
        )
    }

    /// Convert raw widget input into a draft value.
    ///
    /// Multi-select input is a comma separated list; its order is kept and
    /// duplicates are not removed.
    pub fn parse_input(self, raw: &str) -> Option<DraftValue> {
        let trimmed = raw.trim();
        match self {
            WidgetKind::Text | WidgetKind::SelectOne => Some(DraftValue::Text(raw.to_string())),
            WidgetKind::Number => {
                if trimmed.is_empty() {
                    return Some(DraftValue::Null);
                }
                if let Ok(n) = trimmed.parse::<i64>() {
                    return Some(DraftValue::Number(n.into()));
                }
                trimmed
                    .parse::<f64>()
                    .ok()
                    .and_then(Number::from_f64)
                    .map(DraftValue::Number)
            }
            WidgetKind::Checkbox => match trimmed.to_ascii_lowercase().as_str() {
                "true" | "yes" | "on" | "1" => Some(DraftValue::Bool(true)),
                "false" | "no" | "off" | "0" => Some(DraftValue::Bool(false)),
                _ => None,
            },
            WidgetKind::SelectMultiple => Some(DraftValue::List(
                trimmed
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect(),
            )),
        }
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WidgetKind::Text => "text",
            WidgetKind::Number => "number",
            WidgetKind::Checkbox => "checkbox",
            WidgetKind::SelectOne => "select-one",
            WidgetKind::SelectMultiple => "select-multiple",
        };
        f.write_str(name)
    }
}

/// When a field is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Always,
    /// Only while the named checkbox is ticked
    WhenSet(&'static str),
}

impl Visibility {
    pub fn is_visible(self, draft: &Draft) -> bool {
        match self {
            Visibility::Always => true,
            Visibility::WhenSet(key) => draft.is_set(key),
        }
    }
}

/// Where a field's allowed choices come from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceSource {
    /// Free input, no choices
    Free,
    Literal(&'static [&'static str]),
    /// A group of the fetched options schema
    Options(&'static str),
    /// The fetched dependent resource list
    Dependents,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Canonical identity: draft key, widget id and widget name
    pub key: &'static str,
    pub label: &'static str,
    pub widget: WidgetKind,
    pub visibility: Visibility,
    pub choices: ChoiceSource,
}

impl FieldDescriptor {
    const fn new(key: &'static str, label: &'static str, widget: WidgetKind) -> Self {
        Self {
            key,
            label,
            widget,
            visibility: Visibility::Always,
            choices: ChoiceSource::Free,
        }
    }

    const fn when(mut self, key: &'static str) -> Self {
        self.visibility = Visibility::WhenSet(key);
        self
    }

    const fn from_options(mut self, group: &'static str) -> Self {
        self.choices = ChoiceSource::Options(group);
        self
    }

    const fn from_dependents(mut self) -> Self {
        self.choices = ChoiceSource::Dependents;
        self
    }
}

/// Supported asset class kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassType {
    Image,
    LaunchConfiguration,
    Snapshot,
}

impl ClassType {
    pub const ALL: [ClassType; 3] = [
        ClassType::Image,
        ClassType::LaunchConfiguration,
        ClassType::Snapshot,
    ];

    pub fn from_api_type(api_type: &str) -> Option<Self> {
        match api_type {
            "images" => Some(ClassType::Image),
            "launchconfigurations" => Some(ClassType::LaunchConfiguration),
            "snapshots" => Some(ClassType::Snapshot),
            _ => None,
        }
    }

    pub fn api_type(self) -> &'static str {
        self.template().api_type
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ClassType::Image => "Image",
            ClassType::LaunchConfiguration => "Launch Configuration",
            ClassType::Snapshot => "Snapshot",
        }
    }

    pub fn template(self) -> &'static ClassTemplate {
        match self {
            ClassType::Image => &IMAGE_CLASS,
            ClassType::LaunchConfiguration => &LAUNCH_CONFIGURATION_CLASS,
            ClassType::Snapshot => &SNAPSHOT_CLASS,
        }
    }
}

/// Ordered field list plus the remote resources a class type depends on
#[derive(Debug, PartialEq, Eq)]
pub struct ClassTemplate {
    pub class_type: ClassType,
    pub api_type: &'static str,
    pub fields: &'static [FieldDescriptor],
    /// Whether choices come from live resources besides the options schema
    pub requires_dependents: bool,
}

impl ClassTemplate {
    pub fn field(&self, key: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.key == key)
    }

    /// Fetches launched when an editor for this class type is initialized
    pub fn required_fetches(&self) -> Vec<FetchKind> {
        let mut kinds = vec![FetchKind::Options];
        if self.requires_dependents {
            kinds.push(FetchKind::Dependents);
        }
        kinds
    }
}

pub static IMAGE_CLASS: ClassTemplate = ClassTemplate {
    class_type: ClassType::Image,
    api_type: "images",
    fields: &[
        FieldDescriptor::new("instanceID", "Instance ID", WidgetKind::SelectOne).from_dependents(),
        FieldDescriptor::new("propagate", "Propagate", WidgetKind::Checkbox),
        FieldDescriptor::new("propagateRegions", "Propagate Regions", WidgetKind::SelectMultiple)
            .when("propagate")
            .from_options("regions"),
        FieldDescriptor::new("rotate", "Rotate", WidgetKind::Checkbox),
        FieldDescriptor::new("retain", "Retain", WidgetKind::Number).when("rotate"),
    ],
    requires_dependents: true,
};

pub static LAUNCH_CONFIGURATION_CLASS: ClassTemplate = ClassTemplate {
    class_type: ClassType::LaunchConfiguration,
    api_type: "launchconfigurations",
    fields: &[
        FieldDescriptor::new("version", "Version", WidgetKind::Number),
        FieldDescriptor::new("instanceClass", "Instance Class", WidgetKind::SelectOne)
            .from_options("metricName"),
        FieldDescriptor::new("rotate", "Rotate", WidgetKind::Checkbox),
        FieldDescriptor::new("retain", "Retain", WidgetKind::Number).when("rotate"),
        FieldDescriptor::new("regions", "Regions", WidgetKind::SelectMultiple).from_options("regions"),
    ],
    requires_dependents: false,
};

pub static SNAPSHOT_CLASS: ClassTemplate = ClassTemplate {
    class_type: ClassType::Snapshot,
    api_type: "snapshots",
    fields: &[
        FieldDescriptor::new("rotate", "Rotate", WidgetKind::Checkbox),
        FieldDescriptor::new("retain", "Retain", WidgetKind::Number).when("rotate"),
        FieldDescriptor::new("propagate", "Propagate", WidgetKind::Checkbox),
        FieldDescriptor::new("propagateRegions", "Propagate Regions", WidgetKind::SelectMultiple)
            .when("propagate")
            .from_options("regions"),
        FieldDescriptor::new("volumeID", "Volume ID", WidgetKind::Text),
    ],
    requires_dependents: false,
};
