//! # Python Code Generator for ComfyUI Nodes
//!
//! Generates a ComfyUI node class that loads its schema from a
//! configuration record at import time.

use crate::artifact;
use crate::error::{GenerationError, Result};
use crate::naming::{node_file_name, python_str, validate_class_name};
use std::path::{Path, PathBuf};

/// Category the host lists generated nodes under
pub const NODE_CATEGORY: &str = "TouchDesigner";

/// Name of the processing method the host calls
pub const NODE_FUNCTION: &str = "node_function";

/// Generator for one node class
///
/// The output depends only on the config file name and the class name.
/// Input names and output types are read from the config when the node
/// is imported, never baked into the source.
pub struct NodeGenerator<'a> {
    config_file: &'a str,
    class_name: &'a str,
}

impl<'a> NodeGenerator<'a> {
    pub fn new(config_file: &'a str, class_name: &'a str) -> Self {
        Self {
            config_file,
            class_name,
        }
    }

    /// Generate the complete Python module
    pub fn generate(&self) -> Result<String> {
        validate_class_name(self.class_name)?;
        validate_config_file(self.config_file)?;

        let mut code = String::new();

        // Add header
        code.push_str("# Auto-generated ComfyUI node for a TouchDesigner component\n");
        code.push_str("# DO NOT EDIT - Changes will be overwritten\n");
        code.push_str("# Generated by TDNC (TouchDesigner Node Compiler)\n\n");

        code.push_str("import json\n");
        code.push_str("import os\n\n");
        code.push_str(&format!("CONFIG_FILE = {}\n\n\n", python_str(self.config_file)));

        code.push_str(&self.generate_name_helper());
        code.push_str("\n\n");
        code.push_str(&self.generate_factory());
        code.push_str("\n\n");
        code.push_str(&format!("{} = create_dynamic_node()\n", self.class_name));

        Ok(code)
    }

    /// Generate and write `{class_name}_node.py` into `dir`
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        let code = self.generate()?;
        let path = dir.join(node_file_name(self.class_name));
        artifact::write_atomic(&path, code.as_bytes())?;

        tracing::info!("[TDNC] Wrote node {} ({} bytes)", path.display(), code.len());
        Ok(path)
    }

    /// Required input names are rebuilt with this at load time
    fn generate_name_helper(&self) -> String {
        let mut code = String::new();
        code.push_str("def generate_input_name(index, input_type):\n");
        code.push_str("    return \"In{}({})\".format(index, input_type)\n");
        code
    }

    fn generate_factory(&self) -> String {
        let mut code = String::new();

        code.push_str("def create_dynamic_node():\n");
        code.push_str("    script_dir = os.path.dirname(__file__)\n");
        code.push_str("    config_path = os.path.join(script_dir, CONFIG_FILE)\n\n");
        code.push_str("    with open(config_path, \"r\") as config_file:\n");
        code.push_str("        config = json.load(config_file)\n\n");

        code.push_str(&indent(&self.generate_class(), 1));
        code.push('\n');
        code.push_str(&format!("    return {}\n", self.class_name));

        code
    }

    fn generate_class(&self) -> String {
        let mut code = String::new();

        code.push_str(&format!("class {}:\n", self.class_name));

        // Introspection
        code.push_str("    @classmethod\n");
        code.push_str("    def INPUT_TYPES(cls):\n");
        code.push_str("        inputs = config[\"input_types\"]\n");
        code.push_str("        parsed_inputs = {\"required\": {}, \"optional\": {}}\n");
        code.push_str("        for index, value in enumerate(inputs.get(\"required\", {}).values(), start=1):\n");
        code.push_str("            input_type, properties = value\n");
        code.push_str("            input_name = generate_input_name(index, input_type)\n");
        code.push_str("            parsed_inputs[\"required\"][input_name] = (input_type, properties)\n\n");
        code.push_str("        for key, value in inputs.get(\"optional\", {}).items():\n");
        code.push_str("            input_type, properties = value\n");
        code.push_str("            parsed_inputs[\"optional\"][key] = (input_type, properties)\n\n");
        code.push_str("        return parsed_inputs\n\n");

        // Declared outputs
        code.push_str("    RETURN_TYPES = tuple(config[\"output_types\"])\n");
        code.push_str(&format!("    FUNCTION = {}\n", python_str(NODE_FUNCTION)));
        code.push_str(&format!("    CATEGORY = {}\n\n", python_str(NODE_CATEGORY)));

        // Placeholder processing, one value per declared output
        code.push_str(&format!("    def {}(self, **inputs):\n", NODE_FUNCTION));
        code.push_str("        summary = \"Processed inputs: {}\".format(inputs)\n");
        code.push_str("        return tuple(summary for _ in self.RETURN_TYPES)\n");

        code
    }
}

/// Generate the node source for a config file and class name
pub fn generate(config_file: &str, class_name: &str) -> Result<String> {
    NodeGenerator::new(config_file, class_name).generate()
}

fn validate_config_file(name: &str) -> Result<()> {
    let invalid = |reason| GenerationError::InvalidArtifactName {
        name: name.to_string(),
        reason,
    };

    if name.trim().is_empty() {
        return Err(invalid("name is empty"));
    }
    if name.contains(['/', '\\']) {
        return Err(invalid("must be a bare file name next to the node"));
    }
    if name.chars().any(char::is_control) {
        return Err(invalid("contains control characters"));
    }
    Ok(())
}

fn indent(code: &str, level: usize) -> String {
    let prefix = "    ".repeat(level);
    code.lines()
        .map(|line| {
            if line.trim().is_empty() {
                String::new()
            } else {
                format!("{}{}", prefix, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
        + "\n"
}
