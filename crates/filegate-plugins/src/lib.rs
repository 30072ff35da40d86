//! Filegate plugin orchestration
//!
//! Registry of configured plugin steps, the executors that run them (command
//! line and HTTP), and the registry of custom validators compiled into the
//! host.

pub mod executor;
pub mod input;
pub mod outcome;
pub mod registry;
pub mod response;
pub mod template;
pub mod validator;

pub use executor::{CliExecutor, HttpExecutor, StepDispatcher, StepExecutor};
pub use input::{StagedFile, StepInput};
pub use outcome::{OutcomeStatus, StepOutcome};
pub use registry::{Phase, StepRegistry};
pub use response::ResponsePattern;
pub use validator::{CustomValidator, CustomValidatorRegistry};
