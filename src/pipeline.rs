//! # Node Generation Pipeline
//!
//! Main entry points for turning a component interface into a registered
//! ComfyUI node.

use crate::codegen::NodeGenerator;
use crate::config::{self, TypeWarning};
use crate::error::Result;
use crate::interface::{ComponentHandle, InterfaceCollector, InterfaceSnapshot};
use crate::naming::{class_name_for, config_file_name, validate_class_name};
use crate::registry::{self, PatchReport};
use crate::settings::GeneratorSettings;
use std::path::PathBuf;

/// Everything a generation run produced
#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub class_name: String,
    pub config_path: PathBuf,
    pub node_path: PathBuf,
    pub registry_path: PathBuf,
    pub registry: PatchReport,
    /// Channels and parameters that were emitted as `Unknown`
    pub warnings: Vec<TypeWarning>,
}

/// Generate and register a node for an already collected interface
///
/// Artifacts are written in order: configuration record, node module,
/// registry entries. Any failure stops the run, so the registry never
/// references a node whose files were not written.
///
/// # Arguments
///
/// * `snapshot` - The collected component interface
/// * `class_name` - Name of the generated class
/// * `settings` - Output locations
pub fn generate_node(
    snapshot: &InterfaceSnapshot,
    class_name: &str,
    settings: &GeneratorSettings,
) -> Result<GenerationReport> {
    tracing::info!("[TDNC] Generating node {}", class_name);
    tracing::info!(
        "[TDNC] Interface: {} inputs, {} outputs, {} parameters",
        snapshot.inputs.len(),
        snapshot.outputs.len(),
        snapshot.parameters.len()
    );

    validate_class_name(class_name)?;

    // Phase 1: Configuration record
    tracing::info!("[TDNC] Phase 1: Emitting configuration...");
    let config_file = config_file_name(class_name);
    let config_path = settings.output_dir.join(&config_file);
    let emitted = config::emit(snapshot, &config_path)?;

    // Phase 2: Node module
    tracing::info!("[TDNC] Phase 2: Generating node class...");
    let node_path = NodeGenerator::new(&config_file, class_name).write_to(&settings.output_dir)?;

    // Phase 3: Registry
    tracing::info!("[TDNC] Phase 3: Patching registry...");
    let registry_path = settings.registry_path();
    let report = registry::patch(&registry_path, class_name, &settings.display_name(class_name))?;
    if !report.changed() {
        tracing::debug!("[TDNC] {} was already registered", class_name);
    }

    tracing::info!(
        "[TDNC] Generation of {} complete ({} warnings)",
        class_name,
        emitted.warnings.len()
    );

    Ok(GenerationReport {
        class_name: class_name.to_string(),
        config_path,
        node_path,
        registry_path,
        registry: report,
        warnings: emitted.warnings,
    })
}

/// Collect a component's interface and generate its node
pub fn generate_for_component(
    handle: &dyn ComponentHandle,
    settings: &GeneratorSettings,
) -> Result<GenerationReport> {
    let class_name = class_name_for(handle.name())?;
    let snapshot = InterfaceCollector::collect(handle);
    generate_node(&snapshot, &class_name, settings)
}

/// Regenerates a component's node every time its layout changes
pub struct Pipeline {
    settings: GeneratorSettings,
    collector: InterfaceCollector,
    class_name: Option<String>,
}

impl Pipeline {
    pub fn new(settings: GeneratorSettings) -> Self {
        Self {
            settings,
            collector: InterfaceCollector::new(),
            class_name: None,
        }
    }

    /// Use a fixed class name instead of deriving it from the component
    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    pub fn settings(&self) -> &GeneratorSettings {
        &self.settings
    }

    /// Snapshot from the most recent layout change
    pub fn snapshot(&self) -> Option<&InterfaceSnapshot> {
        self.collector.snapshot()
    }

    /// Layout-change callback: re-collect and run the whole chain
    pub fn on_layout_change(&mut self, handle: &dyn ComponentHandle) -> Result<GenerationReport> {
        let class_name = match &self.class_name {
            Some(name) => name.clone(),
            None => class_name_for(handle.name())?,
        };
        let snapshot = self.collector.on_layout_change(handle);
        generate_node(snapshot, &class_name, &self.settings)
    }
}
