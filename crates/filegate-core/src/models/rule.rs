/// Validation rule for one extension inside one category.
///
/// Signature patterns are stored decoded; a missing header or footer
/// pattern is an empty vector and always matches.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtensionRule {
    pub category: String,
    /// Lower-case, without the leading dot.
    pub extension: String,
    pub mime_type: String,
    pub magic_bytes: Vec<u8>,
    pub header_signature: Vec<u8>,
    pub footer_signature: Vec<u8>,
    /// Maximum accepted size in bytes. `0` disables the limit.
    pub max_size: u64,
    pub name_encoding: bool,
    pub ownership: Option<OwnershipChange>,
    pub custom_validators: Vec<CustomValidatorRef>,
    /// Plugin names or `plugin.step` keys, in the order they were written.
    pub plugins: Vec<String>,
}

impl ExtensionRule {
    /// `Documents.pdf` style label used in logs and error messages.
    pub fn label(&self) -> String {
        format!("{}.{}", self.category, self.extension)
    }

    pub fn has_size_limit(&self) -> bool {
        self.max_size > 0
    }
}

/// Owner and permission change applied to a file written to the output
/// directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OwnershipChange {
    pub user: String,
    /// Any combination of `r`, `w` and `x`.
    pub mode: String,
}

impl OwnershipChange {
    /// Owner-only permission bits for the configured mode, e.g. `rw` is `0o600`.
    pub fn permission_bits(&self) -> u32 {
        self.mode.chars().fold(0, |bits, c| match c {
            'r' => bits | 0o400,
            'w' => bits | 0o200,
            'x' => bits | 0o100,
            _ => bits,
        })
    }
}

/// Reference from a rule to a custom validator registered at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CustomValidatorRef {
    pub name: String,
    /// Descriptive `(type, function)` pair from the configuration document.
    pub entry_point: (String, String),
}
