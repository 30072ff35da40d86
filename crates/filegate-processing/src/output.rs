//! Writing accepted files to the output directory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use base64::{engine::general_purpose::URL_SAFE, Engine as _};
use tokio::io::AsyncWriteExt;

use filegate_core::OwnershipChange;

/// URL-safe Base64 of the original file name, followed by the extension.
///
/// The URL-safe alphabet keeps `/` out of the result.
pub fn encoded_file_name(original_name: &str, extension: &str) -> String {
    format!("{}.{}", URL_SAFE.encode(original_name.as_bytes()), extension)
}

/// Write `content` to `output_dir/file_name`.
///
/// The bytes go to a temp file inside `output_dir` first. Ownership and mode
/// changes are applied to the temp file, and the rename into place is the
/// last step, so the target is either complete and final or untouched. If
/// anything fails, or the future is dropped, the temp file is removed. An
/// existing file with the same name is replaced.
pub async fn persist(
    output_dir: &Path,
    file_name: &str,
    content: &[u8],
    ownership: Option<&OwnershipChange>,
) -> Result<PathBuf> {
    tokio::fs::create_dir_all(output_dir)
        .await
        .with_context(|| format!("Failed to create output directory {}", output_dir.display()))?;

    let temp = tempfile::Builder::new()
        .prefix(".filegate-")
        .tempfile_in(output_dir)
        .with_context(|| format!("Failed to create temp file in {}", output_dir.display()))?;

    let mut file = tokio::fs::File::from_std(
        temp.reopen()
            .context("Failed to open temp file for writing")?,
    );
    file.write_all(content)
        .await
        .context("Failed to write output file")?;
    file.sync_all().await.context("Failed to sync output file")?;
    drop(file);

    if let Some(change) = ownership {
        apply_ownership(temp.path(), change).await?;
    }

    let target = output_dir.join(file_name);
    temp.persist(&target)
        .map_err(|e| e.error)
        .with_context(|| format!("Failed to rename output file to {}", target.display()))?;

    Ok(target)
}

/// Give the file to `change.user` and set owner-only permissions.
#[cfg(unix)]
async fn apply_ownership(path: &Path, change: &OwnershipChange) -> Result<()> {
    use nix::unistd::{chown, User};
    use std::os::unix::fs::PermissionsExt;

    let user = User::from_name(&change.user)
        .with_context(|| format!("Failed to look up user '{}'", change.user))?
        .with_context(|| format!("User '{}' does not exist", change.user))?;

    chown(path, Some(user.uid), None)
        .with_context(|| format!("Failed to change owner of {}", path.display()))?;

    tokio::fs::set_permissions(
        path,
        std::fs::Permissions::from_mode(change.permission_bits()),
    )
    .await
    .with_context(|| format!("Failed to change permissions of {}", path.display()))?;

    tracing::debug!(
        path = %path.display(),
        user = %change.user,
        mode = %change.mode,
        "Changed file ownership"
    );
    Ok(())
}

#[cfg(not(unix))]
async fn apply_ownership(_path: &Path, change: &OwnershipChange) -> Result<()> {
    anyhow::bail!(
        "cannot give file to '{}': ownership changes require a Unix platform",
        change.user
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoded_file_name() {
        assert_eq!(encoded_file_name("report.pdf", "pdf"), "cmVwb3J0LnBkZg==.pdf");
        assert!(!encoded_file_name("a/b?c>d.pdf", "pdf").contains('/'));
    }

    #[tokio::test]
    async fn test_persist_writes_and_replaces() {
        let dir = tempfile::tempdir().unwrap();

        let path = persist(dir.path(), "report.pdf", b"first", None).await.unwrap();
        assert_eq!(path, dir.path().join("report.pdf"));
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"first");

        persist(dir.path(), "report.pdf", b"second", None).await.unwrap();
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"second");

        // Only the target remains; no temp files are left behind.
        let entries = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[tokio::test]
    async fn test_persist_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("accepted").join("today");

        let path = persist(&nested, "a.txt", b"x", None).await.unwrap();
        assert!(path.exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_persist_with_ownership_for_current_user() {
        use nix::unistd::{getuid, User};
        use std::os::unix::fs::PermissionsExt;

        let current = User::from_uid(getuid()).unwrap().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let change = OwnershipChange {
            user: current.name,
            mode: "rw".to_string(),
        };

        let path = persist(dir.path(), "a.txt", b"x", Some(&change))
            .await
            .unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(std::fs::read(&path).unwrap(), b"x");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_persist_with_unknown_user_leaves_nothing_behind() {
        let dir = tempfile::tempdir().unwrap();
        let change = OwnershipChange {
            user: "filegate-no-such-user-3948".to_string(),
            mode: "r".to_string(),
        };

        let err = persist(dir.path(), "a.txt", b"x", Some(&change))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("does not exist"));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failed_ownership_keeps_existing_target() {
        let dir = tempfile::tempdir().unwrap();
        persist(dir.path(), "a.txt", b"old", None).await.unwrap();

        let change = OwnershipChange {
            user: "filegate-no-such-user-3948".to_string(),
            mode: "r".to_string(),
        };
        assert!(persist(dir.path(), "a.txt", b"new", Some(&change))
            .await
            .is_err());

        assert_eq!(std::fs::read(dir.path().join("a.txt")).unwrap(), b"old");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
