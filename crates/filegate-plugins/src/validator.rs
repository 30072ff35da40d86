//! Custom validators compiled into the host application.
//!
//! Rules reference validators by name. Each name must be registered on a
//! [`CustomValidatorRegistry`] before the pipeline is built.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;

use filegate_core::{ConfigError, ConfigModel};

use crate::outcome::StepOutcome;

/// A validation routine with the same pass/fail contract as plugin steps.
#[async_trait]
pub trait CustomValidator: Send + Sync + Debug {
    async fn validate(&self, content: &[u8]) -> StepOutcome;
}

#[derive(Clone, Debug, Default)]
pub struct CustomValidatorRegistry {
    validators: HashMap<String, Arc<dyn CustomValidator>>,
}

impl CustomValidatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a validator, replacing any previous one with the same name.
    pub fn register(&mut self, name: impl Into<String>, validator: Arc<dyn CustomValidator>) {
        let name = name.into();
        if self.validators.insert(name.clone(), validator).is_some() {
            tracing::warn!(validator = %name, "Replaced previously registered custom validator");
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn CustomValidator>> {
        self.validators.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.validators.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.validators.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Fail if any rule references a validator that is not registered.
    pub fn ensure_registered(&self, model: &ConfigModel) -> Result<(), ConfigError> {
        for rule in model.rules() {
            for reference in &rule.custom_validators {
                if !self.contains(&reference.name) {
                    return Err(ConfigError::UnregisteredValidator {
                        location: rule.label(),
                        name: reference.name.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}
