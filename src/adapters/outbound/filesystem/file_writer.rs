use crate::ports::outbound::OutputPresenter;
use crate::shared::error::ScanError;
use crate::shared::Result;
use std::ffi::OsString;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// FileSystemWriter adapter for writing output to files
///
/// This adapter implements the OutputPresenter port for file output. The
/// document is staged in a temporary file next to the destination and moved
/// into place with a rename, so an interrupted run never leaves a truncated
/// report behind.
pub struct FileSystemWriter {
    output_path: PathBuf,
}

impl FileSystemWriter {
    pub fn new(output_path: PathBuf) -> Self {
        Self { output_path }
    }

    /// Validates that the parent directory exists before writing
    fn validate_parent_directory(&self) -> Result<()> {
        if let Some(parent) = self.output_path.parent() {
            if !parent.exists() && parent != Path::new("") {
                return Err(ScanError::FileWriteError {
                    path: self.output_path.clone(),
                    details: format!("Parent directory does not exist: {}", parent.display()),
                }
                .into());
            }
        }
        Ok(())
    }

    /// Security validation before writing:
    /// - Reject if the output path exists and is a symlink
    /// - Reject if the parent directory cannot be resolved
    fn validate_output_security(&self) -> Result<()> {
        if self.output_path.exists() {
            let metadata =
                fs::symlink_metadata(&self.output_path).map_err(|e| ScanError::FileWriteError {
                    path: self.output_path.clone(),
                    details: format!("Failed to read file metadata: {}", e),
                })?;

            if metadata.is_symlink() {
                return Err(ScanError::FileWriteError {
                    path: self.output_path.clone(),
                    details: "Security: Output path is a symbolic link. For security reasons, writing to symbolic links is not allowed.".to_string(),
                }
                .into());
            }
        }

        if let Some(parent) = self.output_path.parent() {
            if parent.exists() && parent != Path::new("") {
                parent
                    .canonicalize()
                    .map_err(|e| ScanError::FileWriteError {
                        path: self.output_path.clone(),
                        details: format!("Failed to validate parent directory: {}", e),
                    })?;
            }
        }

        Ok(())
    }

    /// Staging file beside the destination, so the final rename stays on one
    /// filesystem
    fn staging_path(&self) -> PathBuf {
        let mut file_name = self
            .output_path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("output"));
        file_name.push(".tmp");
        self.output_path.with_file_name(file_name)
    }
}

impl OutputPresenter for FileSystemWriter {
    fn present(&self, content: &str) -> Result<()> {
        // Security validations
        self.validate_parent_directory()?;
        self.validate_output_security()?;

        let staging_path = self.staging_path();
        fs::write(&staging_path, content).map_err(|e| ScanError::FileWriteError {
            path: staging_path.clone(),
            details: e.to_string(),
        })?;

        if let Err(e) = fs::rename(&staging_path, &self.output_path) {
            let _ = fs::remove_file(&staging_path);
            return Err(ScanError::FileWriteError {
                path: self.output_path.clone(),
                details: e.to_string(),
            }
            .into());
        }

        eprintln!("✅ Output complete: {}", self.output_path.display());
        Ok(())
    }
}

/// StdoutPresenter adapter for writing output to stdout
///
/// This adapter implements the OutputPresenter port for stdout output.
pub struct StdoutPresenter;

impl StdoutPresenter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StdoutPresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputPresenter for StdoutPresenter {
    fn present(&self, content: &str) -> Result<()> {
        io::stdout()
            .write_all(content.as_bytes())
            .map_err(|e| anyhow::anyhow!("Failed to write to stdout: {}", e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_writer_success() {
        let temp_dir = TempDir::new().unwrap();
        let output_path = temp_dir.path().join("bom.json");

        let writer = FileSystemWriter::new(output_path.clone());
        let result = writer.present("test content");

        assert!(result.is_ok());
        let written_content = fs::read_to_string(&output_path).unwrap();
        assert_eq!(written_content, "test content");
    }

    #[test]
    fn test_file_writer_overwrites_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let output_path = temp_dir.path().join("bom.json");
        fs::write(&output_path, "old content").unwrap();

        let writer = FileSystemWriter::new(output_path.clone());
        writer.present("new content").unwrap();

        assert_eq!(fs::read_to_string(&output_path).unwrap(), "new content");
    }

    #[test]
    fn test_file_writer_removes_staging_file() {
        let temp_dir = TempDir::new().unwrap();
        let output_path = temp_dir.path().join("bom.json");

        let writer = FileSystemWriter::new(output_path.clone());
        writer.present("test content").unwrap();

        assert!(!temp_dir.path().join("bom.json.tmp").exists());
    }

    #[test]
    fn test_file_writer_parent_directory_not_found() {
        let output_path = PathBuf::from("/nonexistent/directory/bom.json");

        let writer = FileSystemWriter::new(output_path);
        let result = writer.present("test content");

        assert!(result.is_err());
        let err_string = format!("{}", result.unwrap_err());
        assert!(err_string.contains("Parent directory does not exist"));
    }

    #[cfg(unix)]
    #[test]
    fn test_file_writer_rejects_symlink_target() {
        let temp_dir = TempDir::new().unwrap();
        let real_path = temp_dir.path().join("real.json");
        let link_path = temp_dir.path().join("link.json");
        fs::write(&real_path, "real").unwrap();
        std::os::unix::fs::symlink(&real_path, &link_path).unwrap();

        let writer = FileSystemWriter::new(link_path);
        let result = writer.present("test content");

        assert!(result.is_err());
        let err_string = format!("{}", result.unwrap_err());
        assert!(err_string.contains("symbolic link"));
        // The symlink target must stay untouched.
        assert_eq!(fs::read_to_string(&real_path).unwrap(), "real");
    }

    #[test]
    fn test_stdout_presenter_success() {
        let presenter = StdoutPresenter::new();
        let result = presenter.present("test output\n");
        assert!(result.is_ok());
    }
}
