//! TDNC CLI - generate ComfyUI nodes from TouchDesigner component descriptions

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tdnc::{ComponentDescription, GeneratorSettings, NodeConfig, Pipeline};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// TDNC - TouchDesigner Node Compiler
#[derive(Parser)]
#[command(name = "tdnc")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate and register a node for a component description
    Generate {
        /// Component description (JSON)
        #[arg(short, long)]
        component: PathBuf,

        /// Settings file (TOML)
        #[arg(short, long)]
        settings: Option<PathBuf>,

        /// Directory for the config and node files
        #[arg(short, long)]
        out_dir: Option<PathBuf>,

        /// Registry file to patch
        #[arg(short, long)]
        registry: Option<PathBuf>,

        /// Class name (default: derived from the component name)
        #[arg(long)]
        class_name: Option<String>,
    },

    /// Print the node schema a configuration record produces
    Inspect {
        /// Configuration record (JSON)
        #[arg(short, long)]
        config: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Generate {
            component,
            settings,
            out_dir,
            registry,
            class_name,
        } => {
            let mut settings = match settings {
                Some(path) => GeneratorSettings::load(&path)?,
                None => GeneratorSettings::default(),
            };
            if let Some(dir) = out_dir {
                settings.output_dir = dir;
            }
            if registry.is_some() {
                settings.registry_path = registry;
            }

            let description = ComponentDescription::load(&component)
                .with_context(|| format!("loading component {}", component.display()))?;

            let mut pipeline = Pipeline::new(settings);
            if let Some(name) = class_name {
                pipeline = pipeline.with_class_name(name);
            }
            let report = pipeline
                .on_layout_change(&description)
                .with_context(|| format!("generating node for {}", description.name))?;

            println!("class:    {}", report.class_name);
            println!("config:   {}", report.config_path.display());
            println!("node:     {}", report.node_path.display());
            println!(
                "registry: {} (import {:?}, class {:?}, display {:?})",
                report.registry_path.display(),
                report.registry.import,
                report.registry.class_mapping,
                report.registry.display_name
            );
            for warning in &report.warnings {
                println!("warning:  {}", warning);
            }
        }
        Commands::Inspect { config } => {
            let schema = NodeConfig::load(&config)?.schema();
            println!("required:");
            if schema.required.is_empty() {
                println!("  (none)");
            }
            for (name, spec) in schema.required.iter() {
                println!("  {} -> {} (default {})", name, spec.plugin_type(), spec.default_value());
            }
            println!("optional:");
            if schema.optional.is_empty() {
                println!("  (none)");
            }
            for (name, spec) in schema.optional.iter() {
                println!("  {} -> {} (default {})", name, spec.plugin_type(), spec.default_value());
            }
            let outputs: Vec<_> = schema.return_types.iter().map(|t| t.as_str()).collect();
            println!("outputs: [{}]", outputs.join(", "));
        }
    }

    Ok(())
}
