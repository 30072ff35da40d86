//! The candidate file as seen by plugin steps.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use sha2::{Digest, Sha256, Sha512};
use tempfile::TempDir;

/// Private on-disk copy of the candidate file for steps that need a path.
///
/// The directory and the copy are removed when this value is dropped.
#[derive(Debug)]
pub struct StagedFile {
    _dir: TempDir,
    path: PathBuf,
}

impl StagedFile {
    /// Write `content` as `file_name` inside a fresh temp directory under
    /// `root` (or the system temp dir). `file_name` must already be sanitized.
    pub async fn stage(content: &[u8], file_name: &str, root: Option<&Path>) -> Result<Self> {
        let builder = {
            let mut builder = tempfile::Builder::new();
            builder.prefix("filegate-");
            builder
        };
        let dir = match root {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        }
        .context("Failed to create staging directory")?;

        let path = dir.path().join(file_name);
        tokio::fs::write(&path, content)
            .await
            .with_context(|| format!("Failed to stage file at {}", path.display()))?;

        Ok(Self { _dir: dir, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Read-only view of the candidate handed to every step of a validation.
#[derive(Clone, Copy, Debug)]
pub struct StepInput<'a> {
    pub content: &'a [u8],
    /// Sanitized file name.
    pub file_name: &'a str,
    pub path: &'a Path,
}

impl<'a> StepInput<'a> {
    pub fn new(content: &'a [u8], file_name: &'a str, staged: &'a StagedFile) -> Self {
        Self {
            content,
            file_name,
            path: staged.path(),
        }
    }

    pub fn content_base64(&self) -> String {
        STANDARD.encode(self.content)
    }

    pub fn sha256_hex(&self) -> String {
        hex::encode(Sha256::digest(self.content))
    }

    pub fn sha512_hex(&self) -> String {
        hex::encode(Sha512::digest(self.content))
    }
}
