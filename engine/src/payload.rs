//! Decoding of the JSON payloads served by the class management API

use crate::error::DecodeError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Option group name to ordered list of allowed choices.
///
/// Replaced wholesale whenever a fetch succeeds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionsSchema(BTreeMap<String, Vec<String>>);

#[derive(Deserialize)]
struct OptionsEnvelope {
    #[serde(rename = "classOptions")]
    class_options: BTreeMap<String, Option<Vec<String>>>,
}

impl OptionsSchema {
    /// Decode `{"classOptions": {group: [choice, ...]}}`. A `null` group is
    /// treated as absent.
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        let envelope: OptionsEnvelope = serde_json::from_slice(bytes)?;
        Ok(Self(
            envelope
                .class_options
                .into_iter()
                .filter_map(|(group, choices)| choices.map(|c| (group, c)))
                .collect(),
        ))
    }

    pub fn group(&self, name: &str) -> Option<&[String]> {
        self.0.get(name).map(Vec::as_slice)
    }

    pub fn groups(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, Vec<String>)> for OptionsSchema {
    fn from_iter<I: IntoIterator<Item = (String, Vec<String>)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Live resource a class can reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependentResource {
    pub id: String,
    pub label: String,
}

#[derive(Deserialize)]
struct RunningInstance {
    #[serde(rename = "instanceID")]
    instance_id: String,
    name: String,
    #[serde(rename = "availabilityZone")]
    availability_zone: String,
}

impl From<RunningInstance> for DependentResource {
    fn from(instance: RunningInstance) -> Self {
        let label = if instance.name.is_empty() {
            format!("{} - {}", instance.instance_id, instance.availability_zone)
        } else {
            format!(
                "{} ({}) - {}",
                instance.name, instance.instance_id, instance.availability_zone
            )
        };
        Self {
            id: instance.instance_id,
            label,
        }
    }
}

#[derive(Deserialize)]
struct AssetsEnvelope {
    assets: Vec<RunningInstance>,
}

/// Ordered list of live resources, in server order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DependentResourceList(Vec<DependentResource>);

impl DependentResourceList {
    /// Decode `{"assets": [{"instanceID", "name", "availabilityZone", ...}]}`
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        let envelope: AssetsEnvelope = serde_json::from_slice(bytes)?;
        Ok(Self(envelope.assets.into_iter().map(Into::into).collect()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &DependentResource> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<DependentResource> for DependentResourceList {
    fn from_iter<I: IntoIterator<Item = DependentResource>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Existing classes of one type, by name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassCatalog(BTreeMap<String, Map<String, Value>>);

#[derive(Deserialize)]
struct CatalogEnvelope {
    classes: BTreeMap<String, Value>,
}

impl ClassCatalog {
    /// Decode `{"classes": {name: {...}}}`
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        let envelope: CatalogEnvelope = serde_json::from_slice(bytes)?;
        envelope
            .classes
            .into_iter()
            .map(|(name, class)| match class {
                Value::Object(fields) => Ok((name, fields)),
                _ => Err(DecodeError::Shape(format!("class '{}' is not an object", name))),
            })
            .collect::<Result<_, _>>()
            .map(Self)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Stored object of a class, encoded the way editors expect it
    pub fn class_bytes(&self, name: &str) -> Option<Vec<u8>> {
        self.0
            .get(name)
            .and_then(|fields| serde_json::to_vec(fields).ok())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
