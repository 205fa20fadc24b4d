//! # Component Interface Collection
//!
//! Enumerates the inputs, outputs and parameters of a TouchDesigner
//! component through the [`ComponentHandle`] trait and records them as an
//! [`InterfaceSnapshot`].
//!
//! Enumeration order matters: required inputs are named by their ordinal
//! position, so channels are always listed family by family (TOP, CHOP,
//! DAT, then any extra families) and in the component's native order
//! within a family.

use crate::error::{GenerationError, Result};
use crate::types::{ChannelCategory, ValueKind};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// Side of the component a channel sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Input,
    Output,
}

/// A parameter as reported by the authoring tool
#[derive(Debug, Clone, PartialEq)]
pub struct RawParameter {
    pub name: String,
    /// Runtime type name of the current value (`int`, `float`, `str`, ...)
    pub type_name: String,
    pub value: Value,
}

/// Read access to a live component inside the authoring tool
pub trait ComponentHandle {
    /// Component name, usually the `.tox` file name
    fn name(&self) -> &str;

    /// Channel names of one family, in the tool's native order
    fn channel_names(&self, direction: Direction, category: &ChannelCategory) -> Vec<String>;

    /// Operator families beyond TOP/CHOP/DAT that carry channels
    fn extra_categories(&self) -> Vec<ChannelCategory> {
        Vec::new()
    }

    /// Parameters in the tool's native order
    fn parameters(&self) -> Vec<RawParameter>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub name: String,
    pub category: ChannelCategory,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub kind: ValueKind,
    pub default: Value,
}

/// Interface of a component at one point in time
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InterfaceSnapshot {
    pub inputs: Vec<Channel>,
    pub outputs: Vec<Channel>,
    pub parameters: Vec<Parameter>,
}

/// Collects component interfaces on structural change
#[derive(Debug, Default)]
pub struct InterfaceCollector {
    snapshot: Option<InterfaceSnapshot>,
}

impl InterfaceCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enumerate the full interface of a component
    pub fn collect(handle: &dyn ComponentHandle) -> InterfaceSnapshot {
        let mut categories: Vec<ChannelCategory> = ChannelCategory::STANDARD.to_vec();
        for extra in handle.extra_categories() {
            if !categories.contains(&extra) {
                categories.push(extra);
            }
        }

        let inputs = collect_channels(handle, Direction::Input, &categories);
        let outputs = collect_channels(handle, Direction::Output, &categories);

        let parameters = handle
            .parameters()
            .into_iter()
            .map(|raw| Parameter {
                name: raw.name,
                kind: ValueKind::from_type_name(&raw.type_name),
                default: raw.value,
            })
            .collect();

        InterfaceSnapshot {
            inputs,
            outputs,
            parameters,
        }
    }

    /// Layout-change callback: re-enumerates and replaces the stored snapshot
    pub fn on_layout_change(&mut self, handle: &dyn ComponentHandle) -> &InterfaceSnapshot {
        let snapshot = Self::collect(handle);
        tracing::debug!(
            "[TDNC] Layout of '{}' changed: {} inputs, {} outputs, {} parameters",
            handle.name(),
            snapshot.inputs.len(),
            snapshot.outputs.len(),
            snapshot.parameters.len()
        );
        self.snapshot.insert(snapshot)
    }

    /// Most recently collected snapshot
    pub fn snapshot(&self) -> Option<&InterfaceSnapshot> {
        self.snapshot.as_ref()
    }
}

fn collect_channels(
    handle: &dyn ComponentHandle,
    direction: Direction,
    categories: &[ChannelCategory],
) -> Vec<Channel> {
    let mut channels = Vec::new();
    for category in categories {
        for name in handle.channel_names(direction, category) {
            channels.push(Channel {
                name,
                category: category.clone(),
            });
        }
    }
    channels
}

/// Serialized description of a component, used in place of a live handle
///
/// ```json
/// {
///   "name": "TOP_flip.tox",
///   "inputs": { "TOP": ["in1"] },
///   "outputs": { "TOP": ["out1"] },
///   "parameters": [{ "name": "flipx", "type": "bool", "value": false }]
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComponentDescription {
    pub name: String,
    #[serde(default)]
    pub inputs: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub outputs: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub parameters: Vec<ParameterDescription>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterDescription {
    pub name: String,
    /// Runtime type name; inferred from `value` when absent
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    #[serde(default)]
    pub value: Value,
}

impl ComponentDescription {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| GenerationError::io(path, e))?;
        serde_json::from_str(&text).map_err(|source| GenerationError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    fn side(&self, direction: Direction) -> &BTreeMap<String, Vec<String>> {
        match direction {
            Direction::Input => &self.inputs,
            Direction::Output => &self.outputs,
        }
    }
}

impl ComponentHandle for ComponentDescription {
    fn name(&self) -> &str {
        &self.name
    }

    fn channel_names(&self, direction: Direction, category: &ChannelCategory) -> Vec<String> {
        self.side(direction)
            .iter()
            .filter(|(tag, _)| ChannelCategory::from_tag(tag) == *category)
            .flat_map(|(_, names)| names.iter().cloned())
            .collect()
    }

    fn extra_categories(&self) -> Vec<ChannelCategory> {
        let mut extras = Vec::new();
        for tag in self.inputs.keys().chain(self.outputs.keys()) {
            let category = ChannelCategory::from_tag(tag);
            if matches!(category, ChannelCategory::Other(_)) && !extras.contains(&category) {
                extras.push(category);
            }
        }
        extras
    }

    fn parameters(&self) -> Vec<RawParameter> {
        self.parameters
            .iter()
            .map(|p| RawParameter {
                name: p.name.clone(),
                type_name: p
                    .type_name
                    .clone()
                    .unwrap_or_else(|| ValueKind::of_value(&p.value).type_name().to_string()),
                value: p.value.clone(),
            })
            .collect()
    }
}
