//! Configuration loading, validation, and env substitution.
//!
//! Config files: `findmy.toml`, `findmy.yaml`, or `findmy.json`
//! Searched in `./` then `~/.config/findmy/`.
//!
//! Supports `${ENV_VAR}` substitution in all string values, and the
//! deployment variables `APPLICATION_ID`, `APPLE_ID`, `APPLE_PASSWORD`,
//! `TARGET_DEVICE_NAME` as overrides.

pub mod env_subst;
pub mod loader;
pub mod schema;
pub mod validate;

pub use {
    loader::{apply_env_overrides, config_dir, discover_and_load, load, load_config},
    schema::{AccountConfig, ServerConfig, SkillConfig},
    validate::{Diagnostic, Severity, ValidationResult, validate_config},
};
