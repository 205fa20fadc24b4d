//! # TouchDesigner Node Compiler (TDNC)
//!
//! Turns TouchDesigner components into ComfyUI custom nodes.
//!
//! For every component TDNC writes:
//! - `<Class>_config.json` - the component interface in ComfyUI types
//! - `<Class>_node.py` - a node class that reads that configuration
//! - an entry for the class in the package `__init__.py` registry
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tdnc::{generate_for_component, ComponentDescription, GeneratorSettings};
//! use std::path::Path;
//!
//! let component = ComponentDescription::load(Path::new("TOP_flip.json"))?;
//! let report = generate_for_component(&component, &GeneratorSettings::default())?;
//! println!("Registered {}", report.class_name);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! TDNC runs a three-phase pipeline on every layout change:
//!
//! 1. **Configuration** - Map the collected interface onto ComfyUI types
//! 2. **Code Generation** - Emit the node class referencing the configuration
//! 3. **Registration** - Add import and mapping entries to the registry

pub mod artifact;
pub mod codegen;
pub mod config;
pub mod error;
pub mod interface;
pub mod naming;
pub mod pipeline;
pub mod registry;
pub mod settings;
pub mod types;

// Re-export the main generation API
pub use pipeline::{generate_for_component, generate_node, GenerationReport, Pipeline};

pub use codegen::NodeGenerator;
pub use config::{emit, EmittedConfig, NodeConfig, NodeSchema, TypeWarning};
pub use error::{GenerationError, Result};
pub use interface::{
    ComponentDescription, ComponentHandle, Direction, InterfaceCollector, InterfaceSnapshot,
};
pub use registry::{patch, InsertOutcome, PatchReport, Registry};
pub use settings::GeneratorSettings;
pub use types::{map_channel_type, map_value_type, ChannelCategory, PluginType, ValueKind};
