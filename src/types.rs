//! # Type Mapping
//!
//! Maps TouchDesigner operator families and parameter value kinds onto the
//! plugin host's type vocabulary. Both mappings are total: anything that is
//! not recognized becomes [`PluginType::Unknown`].

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// Operator family of an input or output channel
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChannelCategory {
    /// Texture operators (visual)
    Top,
    /// Channel operators (numeric streams)
    Chop,
    /// Data operators (text and tables)
    Dat,
    /// Any other operator family, kept by its raw tag
    Other(String),
}

impl ChannelCategory {
    /// Families every component exposes, in enumeration order
    pub const STANDARD: [ChannelCategory; 3] =
        [ChannelCategory::Top, ChannelCategory::Chop, ChannelCategory::Dat];

    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_uppercase().as_str() {
            "TOP" => Self::Top,
            "CHOP" => Self::Chop,
            "DAT" => Self::Dat,
            _ => Self::Other(tag.to_string()),
        }
    }

    pub fn tag(&self) -> &str {
        match self {
            Self::Top => "TOP",
            Self::Chop => "CHOP",
            Self::Dat => "DAT",
            Self::Other(tag) => tag,
        }
    }
}

impl fmt::Display for ChannelCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Runtime type of a parameter value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Int,
    Float,
    Str,
    Bool,
    /// Unrecognized runtime type name
    Other(String),
}

impl ValueKind {
    /// Parse a runtime type name such as `float` or `str`
    pub fn from_type_name(name: &str) -> Self {
        match name.trim() {
            "int" => Self::Int,
            "float" => Self::Float,
            "str" | "string" => Self::Str,
            "bool" => Self::Bool,
            other => Self::Other(other.to_string()),
        }
    }

    /// Infer the kind of a JSON value
    pub fn of_value(value: &Value) -> Self {
        match value {
            Value::Bool(_) => Self::Bool,
            Value::Number(n) if n.is_i64() || n.is_u64() => Self::Int,
            Value::Number(_) => Self::Float,
            Value::String(_) => Self::Str,
            Value::Null => Self::Other("NoneType".to_string()),
            Value::Array(_) => Self::Other("list".to_string()),
            Value::Object(_) => Self::Other("dict".to_string()),
        }
    }

    pub fn type_name(&self) -> &str {
        match self {
            Self::Int => "int",
            Self::Float => "float",
            Self::Str => "str",
            Self::Bool => "bool",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Type tag understood by the plugin host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PluginType {
    Image,
    Scalar,
    String,
    Int,
    Float,
    Boolean,
    Unknown,
}

impl PluginType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "Image",
            Self::Scalar => "Scalar",
            Self::String => "String",
            Self::Int => "Int",
            Self::Float => "Float",
            Self::Boolean => "Boolean",
            Self::Unknown => "Unknown",
        }
    }

    /// Parse a tag read back from a configuration artifact
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "Image" => Self::Image,
            "Scalar" => Self::Scalar,
            "String" => Self::String,
            "Int" => Self::Int,
            "Float" => Self::Float,
            "Boolean" => Self::Boolean,
            _ => Self::Unknown,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }
}

impl fmt::Display for PluginType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for PluginType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PluginType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(Self::from_tag(&tag))
    }
}

/// Map a channel's operator family to its plugin type
pub fn map_channel_type(category: &ChannelCategory) -> PluginType {
    match category {
        ChannelCategory::Top => PluginType::Image,
        ChannelCategory::Chop => PluginType::Scalar,
        ChannelCategory::Dat => PluginType::String,
        ChannelCategory::Other(_) => PluginType::Unknown,
    }
}

/// Map a parameter's runtime value kind to its plugin type
pub fn map_value_type(kind: &ValueKind) -> PluginType {
    match kind {
        ValueKind::Int => PluginType::Int,
        ValueKind::Float => PluginType::Float,
        ValueKind::Str => PluginType::String,
        ValueKind::Bool => PluginType::Boolean,
        ValueKind::Other(_) => PluginType::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn standard_channels_map_to_fixed_types() {
        assert_eq!(map_channel_type(&ChannelCategory::Top), PluginType::Image);
        assert_eq!(map_channel_type(&ChannelCategory::Chop), PluginType::Scalar);
        assert_eq!(map_channel_type(&ChannelCategory::Dat), PluginType::String);
    }

    #[test]
    fn unrecognized_channel_tag_is_unknown() {
        let category = ChannelCategory::from_tag("SOP");
        assert_eq!(category, ChannelCategory::Other("SOP".to_string()));
        assert_eq!(map_channel_type(&category), PluginType::Unknown);
        assert_eq!(map_channel_type(&category), map_channel_type(&category));
    }

    #[test]
    fn channel_tags_are_case_insensitive() {
        assert_eq!(ChannelCategory::from_tag("top"), ChannelCategory::Top);
        assert_eq!(ChannelCategory::from_tag(" Chop "), ChannelCategory::Chop);
    }

    #[test]
    fn value_kinds_map_to_plugin_types() {
        assert_eq!(map_value_type(&ValueKind::from_type_name("int")), PluginType::Int);
        assert_eq!(map_value_type(&ValueKind::from_type_name("float")), PluginType::Float);
        assert_eq!(map_value_type(&ValueKind::from_type_name("str")), PluginType::String);
        assert_eq!(map_value_type(&ValueKind::from_type_name("string")), PluginType::String);
        assert_eq!(map_value_type(&ValueKind::from_type_name("bool")), PluginType::Boolean);
        assert_eq!(map_value_type(&ValueKind::from_type_name("tuple")), PluginType::Unknown);
    }

    #[test]
    fn value_kind_is_inferred_from_json() {
        assert_eq!(ValueKind::of_value(&json!(3)), ValueKind::Int);
        assert_eq!(ValueKind::of_value(&json!(1.5)), ValueKind::Float);
        assert_eq!(ValueKind::of_value(&json!("abc")), ValueKind::Str);
        assert_eq!(ValueKind::of_value(&json!(true)), ValueKind::Bool);
        assert_eq!(ValueKind::of_value(&json!(null)).type_name(), "NoneType");
    }

    #[test]
    fn plugin_type_serializes_as_tag() {
        assert_eq!(serde_json::to_string(&PluginType::Scalar).unwrap(), "\"Scalar\"");
        let parsed: PluginType = serde_json::from_str("\"MESH\"").unwrap();
        assert_eq!(parsed, PluginType::Unknown);
    }
}
