//! # Node Code Generation
//!
//! Python source generation for ComfyUI custom nodes.

mod python_codegen;

pub use python_codegen::*;
