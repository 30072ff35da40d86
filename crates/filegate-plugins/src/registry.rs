//! Registry of parsed plugin steps and their phases.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use filegate_core::{ConfigModel, StepDefinition};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Steps flagged `run_before`.
    Pre,
    /// Steps flagged `run_after`.
    Post,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Pre => "pre-steps",
            Phase::Post => "post-steps",
        })
    }
}

/// Steps keyed by `plugin.step`, with the pre and post phase lists kept in
/// declaration order.
///
/// Built once from the [`ConfigModel`] and never mutated afterwards.
#[derive(Clone, Debug, Default)]
pub struct StepRegistry {
    steps: HashMap<String, Arc<StepDefinition>>,
    pre: Vec<Arc<StepDefinition>>,
    post: Vec<Arc<StepDefinition>>,
}

impl StepRegistry {
    pub fn from_model(model: &ConfigModel) -> Self {
        let mut registry = Self::default();

        for step in model.steps() {
            let step = Arc::new(step.clone());
            if step.run_before {
                registry.pre.push(Arc::clone(&step));
            }
            if step.run_after {
                registry.post.push(Arc::clone(&step));
            }
            registry.steps.insert(step.key.clone(), step);
        }

        tracing::debug!(
            steps = registry.steps.len(),
            pre = registry.pre.len(),
            post = registry.post.len(),
            "Built step registry"
        );

        registry
    }

    pub fn get(&self, key: &str) -> Option<&StepDefinition> {
        self.steps.get(key).map(|step| step.as_ref())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.steps.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Every step of a phase, in declaration order.
    pub fn phase(&self, phase: Phase) -> &[Arc<StepDefinition>] {
        match phase {
            Phase::Pre => &self.pre,
            Phase::Post => &self.post,
        }
    }

    /// Steps of a phase selected by a rule's plugin references, still in
    /// declaration order.
    pub fn phase_for(&self, phase: Phase, references: &[String]) -> Vec<Arc<StepDefinition>> {
        if references.is_empty() {
            return Vec::new();
        }

        self.phase(phase)
            .iter()
            .filter(|step| references.iter().any(|r| step.matches_reference(r)))
            .cloned()
            .collect()
    }
}
