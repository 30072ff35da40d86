//! Filegate Core Library
//!
//! Configuration model, domain types and error types shared by the plugin
//! and processing crates.

pub mod config;
mod document;
pub mod error;
pub mod filename;
pub mod model;
pub mod models;
pub mod pattern;

// Re-export commonly used types
pub use config::EngineSettings;
pub use error::{ConfigError, LookupError};
pub use filename::{extension_of, sanitize_filename};
pub use model::ConfigModel;
pub use models::{
    BodyFormat, CliStep, CustomValidatorRef, ExtensionRule, HttpMethod, HttpStep, OnFailPolicy,
    OwnershipChange, PluginDefinition, StepDefinition, StepKind, ValidationResult,
};
pub use pattern::decode_hex_pattern;
