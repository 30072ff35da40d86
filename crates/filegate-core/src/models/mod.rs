pub mod result;
pub mod rule;
pub mod step;

pub use result::ValidationResult;
pub use rule::{CustomValidatorRef, ExtensionRule, OwnershipChange};
pub use step::{
    BodyFormat, CliStep, HttpMethod, HttpStep, OnFailPolicy, PluginDefinition, StepDefinition,
    StepKind,
};
