//! # Node Configuration
//!
//! The configuration record is the single source of truth for a generated
//! node. It is written next to the node as JSON:
//!
//! ```json
//! {
//!     "input_types": {
//!         "required": { "In1(Image)": ["Image", { "default": null }] },
//!         "optional": { "speed(Float)": ["Float", { "default": 1.5 }] }
//!     },
//!     "output_types": ["Image"]
//! }
//! ```

use crate::artifact;
use crate::error::{GenerationError, Result};
use crate::interface::InterfaceSnapshot;
use crate::naming::{optional_input_name, required_input_name};
use crate::types::{map_channel_type, map_value_type, PluginType};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};

/// Schema properties attached to an input
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputProperties {
    #[serde(default)]
    pub default: Value,
}

/// `[type, {"default": value}]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputSpec(pub PluginType, pub InputProperties);

impl InputSpec {
    pub fn new(plugin_type: PluginType, default: Value) -> Self {
        Self(plugin_type, InputProperties { default })
    }

    pub fn plugin_type(&self) -> PluginType {
        self.0
    }

    pub fn default_value(&self) -> &Value {
        &self.1.default
    }
}

/// Insertion-ordered map of input name to spec
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputMap(Vec<(String, InputSpec)>);

impl InputMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` without inserting if the key is already present
    pub fn insert(&mut self, key: String, spec: InputSpec) -> bool {
        if self.contains_key(&key) {
            return false;
        }
        self.0.push((key, spec));
        true
    }

    pub fn get(&self, key: &str) -> Option<&InputSpec> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, spec)| spec)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.iter().any(|(k, _)| k == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &InputSpec)> {
        self.0.iter().map(|(k, spec)| (k.as_str(), spec))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for InputMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, spec) in &self.0 {
            map.serialize_entry(key, spec)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for InputMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct InputMapVisitor;

        impl<'de> Visitor<'de> for InputMapVisitor {
            type Value = InputMap;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of input names to [type, properties]")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<InputMap, A::Error> {
                let mut map = InputMap::new();
                while let Some((key, spec)) = access.next_entry::<String, InputSpec>()? {
                    if map.contains_key(&key) {
                        return Err(serde::de::Error::custom(format!("duplicate input key '{}'", key)));
                    }
                    map.0.push((key, spec));
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(InputMapVisitor)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputTypes {
    #[serde(default)]
    pub required: InputMap,
    #[serde(default)]
    pub optional: InputMap,
}

/// Configuration record for one component
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeConfig {
    pub input_types: InputTypes,
    #[serde(default)]
    pub output_types: Vec<PluginType>,
}

/// Input schema as the generated node reports it to the host
#[derive(Debug, Clone, PartialEq)]
pub struct NodeSchema {
    pub required: InputMap,
    pub optional: InputMap,
    pub return_types: Vec<PluginType>,
}

impl NodeConfig {
    /// Map a snapshot onto the plugin type vocabulary
    pub fn from_snapshot(snapshot: &InterfaceSnapshot) -> Result<Self> {
        let mut config = NodeConfig::default();

        for (index, channel) in snapshot.inputs.iter().enumerate() {
            let plugin_type = map_channel_type(&channel.category);
            // Ordinals are unique, so this never collides
            config
                .input_types
                .required
                .insert(required_input_name(index + 1, plugin_type), InputSpec::new(plugin_type, Value::Null));
        }

        for parameter in &snapshot.parameters {
            let plugin_type = map_value_type(&parameter.kind);
            let key = optional_input_name(&parameter.name, plugin_type);
            let spec = InputSpec::new(plugin_type, parameter.default.clone());
            if !config.input_types.optional.insert(key.clone(), spec) {
                return Err(GenerationError::DuplicateInputKey {
                    section: "optional",
                    key,
                });
            }
        }

        config.output_types = snapshot
            .outputs
            .iter()
            .map(|channel| map_channel_type(&channel.category))
            .collect();

        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = artifact::read_to_string(path)?;
        Self::from_json(&text).map_err(|source| GenerationError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Pretty JSON with four-space indentation
    pub fn to_json(&self) -> serde_json::Result<String> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut serializer)?;
        buf.push(b'\n');
        // serde_json only ever emits UTF-8
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Rebuild the input schema the way the generated class does at load time
    ///
    /// Required inputs are renamed by position and type; the stored keys are
    /// not trusted.
    pub fn schema(&self) -> NodeSchema {
        let mut required = InputMap::new();
        for (index, (_, spec)) in self.input_types.required.iter().enumerate() {
            required.insert(required_input_name(index + 1, spec.plugin_type()), spec.clone());
        }

        NodeSchema {
            required,
            optional: self.input_types.optional.clone(),
            return_types: self.output_types.clone(),
        }
    }
}

/// Where an unmapped type came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningOrigin {
    Input,
    Output,
    Parameter,
}

/// A channel or parameter whose type mapped to `Unknown`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeWarning {
    pub origin: WarningOrigin,
    pub name: String,
    pub source_type: String,
}

impl fmt::Display for TypeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let origin = match self.origin {
            WarningOrigin::Input => "input",
            WarningOrigin::Output => "output",
            WarningOrigin::Parameter => "parameter",
        };
        write!(
            f,
            "{} '{}' has unmapped type '{}', emitted as {}",
            origin,
            self.name,
            self.source_type,
            PluginType::Unknown
        )
    }
}

/// Collect every channel and parameter that maps to `Unknown`
pub fn type_warnings(snapshot: &InterfaceSnapshot) -> Vec<TypeWarning> {
    let channels = snapshot
        .inputs
        .iter()
        .map(|c| (WarningOrigin::Input, c))
        .chain(snapshot.outputs.iter().map(|c| (WarningOrigin::Output, c)))
        .filter(|(_, c)| map_channel_type(&c.category).is_unknown())
        .map(|(origin, c)| TypeWarning {
            origin,
            name: c.name.clone(),
            source_type: c.category.tag().to_string(),
        });

    let parameters = snapshot
        .parameters
        .iter()
        .filter(|p| map_value_type(&p.kind).is_unknown())
        .map(|p| TypeWarning {
            origin: WarningOrigin::Parameter,
            name: p.name.clone(),
            source_type: p.kind.type_name().to_string(),
        });

    channels.chain(parameters).collect()
}

/// Result of writing a configuration record
#[derive(Debug, Clone)]
pub struct EmittedConfig {
    pub path: PathBuf,
    pub config: NodeConfig,
    pub warnings: Vec<TypeWarning>,
}

/// Build the configuration record for `snapshot` and write it to `path`
pub fn emit(snapshot: &InterfaceSnapshot, path: &Path) -> Result<EmittedConfig> {
    let config = NodeConfig::from_snapshot(snapshot)?;
    let warnings = type_warnings(snapshot);
    for warning in &warnings {
        tracing::warn!("[TDNC] {}", warning);
    }

    let json = config.to_json().map_err(|source| GenerationError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    artifact::write_atomic(path, json.as_bytes())?;

    tracing::info!(
        "[TDNC] Wrote config {} ({} required, {} optional, {} outputs)",
        path.display(),
        config.input_types.required.len(),
        config.input_types.optional.len(),
        config.output_types.len()
    );

    Ok(EmittedConfig {
        path: path.to_path_buf(),
        config,
        warnings,
    })
}
