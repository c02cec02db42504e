use crate::shared::Result;
use std::fs;
use std::path::Path;

/// Maximum file size for security (100 MB)
/// This prevents DoS attacks via excessively large files
pub const MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// Reads a file to a string after validating it is safe to read.
///
/// Manifest and lock files come from scanned project trees the user may not
/// fully control, so every read goes through the same checks: the path must
/// be a regular file (no symlinks, checked on the link itself rather than
/// its target) and must not exceed [`MAX_FILE_SIZE`].
///
/// # Errors
/// Returns an error if validation fails or the file cannot be read.
pub fn safe_read_to_string(path: &Path) -> Result<String> {
    let metadata = validate_regular_file(path)?;
    if metadata.len() > MAX_FILE_SIZE {
        anyhow::bail!(
            "Security: {} is too large ({} bytes). Maximum allowed size is {} bytes.",
            path.display(),
            metadata.len(),
            MAX_FILE_SIZE
        );
    }
    fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))
}

/// Validates that a path exists and is a regular file, returning its metadata.
///
/// Uses `symlink_metadata()` instead of `metadata()` so the check applies to
/// the symlink itself, not the target it points to.
///
/// # Errors
/// Returns an error if the path doesn't exist, is a symbolic link, or is not
/// a regular file.
pub fn validate_regular_file(path: &Path) -> Result<fs::Metadata> {
    let metadata = fs::symlink_metadata(path)
        .map_err(|e| anyhow::anyhow!("Failed to read metadata for {}: {}", path.display(), e))?;

    if metadata.is_symlink() {
        anyhow::bail!(
            "Security: {} is a symbolic link. For security reasons, symbolic links are not allowed.",
            path.display()
        );
    }

    if !metadata.is_file() {
        anyhow::bail!("{} is not a regular file", path.display());
    }

    Ok(metadata)
}
