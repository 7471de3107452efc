//! Core types and configuration for templar.
//!
//! This crate defines the `templar.toml` schema ([`TemplarConfig`]), the
//! per-template `template.toml` schema ([`TemplateConfig`]), the publish
//! [`Mode`], template directory discovery, and shared error types.

pub mod config;
pub mod discovery;
pub mod error;
pub mod mode;
pub mod template;

pub use config::{EnvSection, PublishSection, RegistrySection, StorageSection, TemplarConfig};
pub use discovery::discover_templates;
pub use error::{Error, Result};
pub use mode::Mode;
pub use template::{EnvConfig, TemplateConfig, validate_id};
