use std::fmt;

/// Stages of one validation, in execution order.
///
/// Each stage either advances to [`Stage::next`] or rejects the file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    LookupRule,
    ExtensionAllowed,
    MimeTypeCheck,
    SizeCheck,
    MagicBytesCheck,
    HeaderCheck,
    FooterCheck,
    PreStepsPhase,
    CustomValidatorsPhase,
    PostStepsPhase,
    NameEncoding,
    ChecksumCompute,
    Valid,
}

impl Stage {
    pub fn next(self) -> Stage {
        match self {
            Stage::LookupRule => Stage::ExtensionAllowed,
            Stage::ExtensionAllowed => Stage::MimeTypeCheck,
            Stage::MimeTypeCheck => Stage::SizeCheck,
            Stage::SizeCheck => Stage::MagicBytesCheck,
            Stage::MagicBytesCheck => Stage::HeaderCheck,
            Stage::HeaderCheck => Stage::FooterCheck,
            Stage::FooterCheck => Stage::PreStepsPhase,
            Stage::PreStepsPhase => Stage::CustomValidatorsPhase,
            Stage::CustomValidatorsPhase => Stage::PostStepsPhase,
            Stage::PostStepsPhase => Stage::NameEncoding,
            Stage::NameEncoding => Stage::ChecksumCompute,
            Stage::ChecksumCompute => Stage::Valid,
            Stage::Valid => Stage::Valid,
        }
    }

    pub fn is_terminal(self) -> bool {
        self == Stage::Valid
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
