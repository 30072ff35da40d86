//! Validation pipeline: static checks → pre-steps → custom validators →
//! post-steps → name encoding → checksum.
//!
//! Stages run strictly one after another (see [`Stage`]). The first failing
//! stage turns into an invalid [`ValidationResult`]; `validate` never returns
//! an error.

mod stage;
mod steps;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

use filegate_core::{
    extension_of, sanitize_filename, ConfigError, ConfigModel, EngineSettings, ExtensionRule,
    ValidationResult,
};
use filegate_plugins::{
    CustomValidator, CustomValidatorRegistry, Phase, StagedFile, StepDispatcher, StepExecutor,
    StepInput, StepRegistry,
};

use crate::checksum::sha256_base64;
use crate::mime::{ContentSniffer, MimeDetector};
use crate::output;
use crate::validator::{self, Rejection};

pub use stage::Stage;

/// A file submitted for validation.
struct Candidate<'a> {
    category: &'a str,
    content: &'a [u8],
    original_name: &'a str,
    clean_name: String,
    output_dir: Option<&'a Path>,
}

/// State threaded through the stages once the rule is known.
struct StageContext<'a> {
    candidate: &'a Candidate<'a>,
    rule: &'a ExtensionRule,
    staged: Option<StagedFile>,
    warnings: Vec<String>,
    file_name: String,
    output_path: Option<PathBuf>,
    checksum: String,
}

pub struct ValidationPipeline {
    model: Arc<ConfigModel>,
    steps: StepRegistry,
    validators: CustomValidatorRegistry,
    executor: Arc<dyn StepExecutor>,
    mime: Arc<dyn MimeDetector>,
    settings: EngineSettings,
}

impl ValidationPipeline {
    pub fn builder(model: Arc<ConfigModel>) -> PipelineBuilder {
        PipelineBuilder::new(model)
    }

    /// Builder for the document at `settings.config_path`, carrying
    /// `settings`.
    pub fn builder_from_settings(
        settings: EngineSettings,
    ) -> Result<PipelineBuilder, ConfigError> {
        let model = ConfigModel::from_settings(&settings)?;
        Ok(PipelineBuilder::new(Arc::new(model)).settings(settings))
    }

    pub fn model(&self) -> &ConfigModel {
        &self.model
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Validate `content` as a file called `file_name` in `category`.
    ///
    /// When `output_dir` is given, an accepted file is written there under its
    /// final name. Dropping the returned future cancels running plugin steps.
    #[tracing::instrument(skip(self, content, output_dir), fields(size = content.len()))]
    pub async fn validate(
        &self,
        category: &str,
        content: &[u8],
        file_name: &str,
        output_dir: Option<&Path>,
    ) -> ValidationResult {
        let start = Instant::now();

        let candidate = match Self::accept_input(category, content, file_name, output_dir) {
            Ok(candidate) => candidate,
            Err(rejection) => return Self::reject(rejection, Vec::new()),
        };

        let result = self.run(&candidate).await;

        tracing::info!(
            valid = result.valid,
            warnings = result.warnings.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Validation finished"
        );
        result
    }

    /// Same as [`validate`](Self::validate), but gives up as soon as `cancel`
    /// fires. In-flight steps are killed and staged files removed.
    pub async fn validate_with_cancellation(
        &self,
        category: &str,
        content: &[u8],
        file_name: &str,
        output_dir: Option<&Path>,
        cancel: CancellationToken,
    ) -> ValidationResult {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::info!(category = %category, file_name = %file_name, "Validation cancelled");
                Self::reject(Rejection::Cancelled, Vec::new())
            }
            result = self.validate(category, content, file_name, output_dir) => result,
        }
    }

    fn accept_input<'a>(
        category: &'a str,
        content: &'a [u8],
        file_name: &'a str,
        output_dir: Option<&'a Path>,
    ) -> Result<Candidate<'a>, Rejection> {
        if category.trim().is_empty() {
            return Err(Rejection::InvalidInput("category is empty".to_string()));
        }
        if file_name.trim().is_empty() {
            return Err(Rejection::InvalidInput("file name is empty".to_string()));
        }
        if content.is_empty() {
            return Err(Rejection::InvalidInput("file content is empty".to_string()));
        }
        let clean_name = sanitize_filename(file_name).ok_or_else(|| {
            Rejection::InvalidInput(format!("file name '{}' is not usable", file_name))
        })?;

        Ok(Candidate {
            category,
            content,
            original_name: file_name.trim(),
            clean_name,
            output_dir,
        })
    }

    async fn run(&self, candidate: &Candidate<'_>) -> ValidationResult {
        // LookupRule and ExtensionAllowed produce the rule every later stage needs.
        tracing::debug!(stage = %Stage::LookupRule, "Entering stage");
        if !self.model.has_category(candidate.category) {
            return Self::reject(
                filegate_core::LookupError::UnknownCategory(candidate.category.to_string()).into(),
                Vec::new(),
            );
        }

        tracing::debug!(stage = %Stage::ExtensionAllowed, "Entering stage");
        // Taken from the name as submitted: sanitizing may shorten the stem.
        let Some(extension) = extension_of(candidate.original_name) else {
            return Self::reject(
                Rejection::MissingExtension(candidate.original_name.to_string()),
                Vec::new(),
            );
        };
        let rule = match self.model.lookup(candidate.category, &extension) {
            Ok(rule) => rule,
            Err(e) => return Self::reject(e.into(), Vec::new()),
        };

        let mut ctx = StageContext {
            candidate,
            rule,
            staged: None,
            warnings: Vec::new(),
            file_name: candidate.clean_name.clone(),
            output_path: None,
            checksum: String::new(),
        };

        let mut stage = Stage::ExtensionAllowed.next();
        while !stage.is_terminal() {
            tracing::debug!(stage = %stage, "Entering stage");
            if let Err(rejection) = self.advance(stage, &mut ctx).await {
                tracing::debug!(stage = %stage, "Stage rejected file");
                return Self::reject(rejection, ctx.warnings);
            }
            stage = stage.next();
        }

        ValidationResult::accepted(ctx.file_name, ctx.checksum, ctx.output_path, ctx.warnings)
    }

    async fn advance(&self, stage: Stage, ctx: &mut StageContext<'_>) -> Result<(), Rejection> {
        let rule = ctx.rule;
        let content = ctx.candidate.content;

        match stage {
            Stage::MimeTypeCheck => validator::validate_mime_type(self.mime.as_ref(), rule, content),
            Stage::SizeCheck => validator::validate_file_size(rule, content.len()),
            Stage::MagicBytesCheck => validator::validate_magic_bytes(rule, content),
            Stage::HeaderCheck => validator::validate_header(rule, content),
            Stage::FooterCheck => validator::validate_footer(rule, content),
            Stage::PreStepsPhase => self.run_steps(Phase::Pre, ctx).await,
            Stage::CustomValidatorsPhase => self.run_custom_validators(ctx).await,
            Stage::PostStepsPhase => self.run_steps(Phase::Post, ctx).await,
            Stage::NameEncoding => self.write_output(ctx).await,
            Stage::ChecksumCompute => {
                ctx.checksum = sha256_base64(content);
                Ok(())
            }
            // Resolved in `run` before the context exists.
            Stage::LookupRule | Stage::ExtensionAllowed | Stage::Valid => Ok(()),
        }
    }

    async fn run_steps(&self, phase: Phase, ctx: &mut StageContext<'_>) -> Result<(), Rejection> {
        let candidate = ctx.candidate;
        let steps = self.steps.phase_for(phase, &ctx.rule.plugins);
        if steps.is_empty() {
            return Ok(());
        }

        // Staged lazily, once per validation, and shared by both phases.
        let staged = match ctx.staged.take() {
            Some(staged) => staged,
            None => StagedFile::stage(
                candidate.content,
                &candidate.clean_name,
                self.settings.temp_dir.as_deref(),
            )
            .await
            .map_err(|e| Rejection::Staging(format!("{:#}", e)))?,
        };

        let input = StepInput::new(candidate.content, &candidate.clean_name, &staged);
        let result = steps::run_phase(
            self.executor.as_ref(),
            phase,
            &steps,
            &input,
            self.settings.max_concurrent_steps,
            &mut ctx.warnings,
        )
        .await;

        ctx.staged = Some(staged);
        result
    }

    async fn run_custom_validators(&self, ctx: &mut StageContext<'_>) -> Result<(), Rejection> {
        for reference in &ctx.rule.custom_validators {
            let outcome = match self.validators.get(&reference.name) {
                Some(validator) => validator.validate(ctx.candidate.content).await,
                None => filegate_plugins::StepOutcome::errored("not registered"),
            };

            if !outcome.is_passed() {
                tracing::warn!(
                    validator = %reference.name,
                    outcome = %outcome,
                    "Custom validator rejected file"
                );
                return Err(Rejection::CustomValidatorFailed {
                    name: reference.name.clone(),
                    outcome,
                });
            }
            tracing::debug!(validator = %reference.name, "Custom validator passed");
        }
        Ok(())
    }

    async fn write_output(&self, ctx: &mut StageContext<'_>) -> Result<(), Rejection> {
        let rule = ctx.rule;
        let candidate = ctx.candidate;

        if rule.name_encoding {
            ctx.file_name = output::encoded_file_name(candidate.original_name, &rule.extension);
        }

        let Some(output_dir) = candidate.output_dir else {
            return Ok(());
        };

        let path = output::persist(
            output_dir,
            &ctx.file_name,
            candidate.content,
            rule.ownership.as_ref(),
        )
        .await
        .map_err(|e| Rejection::Output(format!("{:#}", e)))?;

        tracing::info!(path = %path.display(), "Wrote accepted file");
        ctx.output_path = Some(path);
        Ok(())
    }

    fn reject(rejection: Rejection, warnings: Vec<String>) -> ValidationResult {
        tracing::info!(reason = %rejection, "File rejected");
        ValidationResult::invalid(rejection.to_string()).with_warnings(warnings)
    }
}

/// Builds a [`ValidationPipeline`]. Every custom validator referenced by the
/// configuration must be registered before [`build`](Self::build).
pub struct PipelineBuilder {
    model: Arc<ConfigModel>,
    settings: EngineSettings,
    validators: CustomValidatorRegistry,
    executor: Option<Arc<dyn StepExecutor>>,
    mime: Arc<dyn MimeDetector>,
}

impl PipelineBuilder {
    pub fn new(model: Arc<ConfigModel>) -> Self {
        Self {
            model,
            settings: EngineSettings::default(),
            validators: CustomValidatorRegistry::new(),
            executor: None,
            mime: Arc::new(ContentSniffer),
        }
    }

    pub fn settings(mut self, settings: EngineSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn custom_validator(
        mut self,
        name: impl Into<String>,
        validator: Arc<dyn CustomValidator>,
    ) -> Self {
        self.validators.register(name, validator);
        self
    }

    pub fn validators(mut self, validators: CustomValidatorRegistry) -> Self {
        self.validators = validators;
        self
    }

    /// Replace the default CLI/HTTP dispatcher.
    pub fn executor(mut self, executor: Arc<dyn StepExecutor>) -> Self {
        self.executor = Some(executor);
        self
    }

    pub fn mime_detector(mut self, mime: Arc<dyn MimeDetector>) -> Self {
        self.mime = mime;
        self
    }

    pub fn build(self) -> Result<ValidationPipeline, ConfigError> {
        self.settings
            .validate()
            .map_err(|e| ConfigError::Settings(e.to_string()))?;
        self.validators.ensure_registered(&self.model)?;

        let executor = match self.executor {
            Some(executor) => executor,
            None => {
                let connect_timeout = Duration::from_secs(self.settings.http_connect_timeout_secs);
                let dispatcher = StepDispatcher::new(connect_timeout)
                    .map_err(|e| ConfigError::Executor(format!("{:#}", e)))?;
                Arc::new(dispatcher)
            }
        };

        let steps = StepRegistry::from_model(&self.model);

        Ok(ValidationPipeline {
            model: self.model,
            steps,
            validators: self.validators,
            executor,
            mime: self.mime,
            settings: self.settings,
        })
    }
}
