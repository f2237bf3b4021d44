use std::fs;
use std::path::Path;
use tracing::debug;
use crate::utils::{TaskError, TaskResult};

/// Get file name for log messages, falling back to the full path
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Fail if the path points at a directory
pub fn ensure_not_directory(path: &Path) -> TaskResult<()> {
    if path.is_dir() {
        return Err(TaskError::processing(format!(
            "file {} is a directory", display_name(path)
        )));
    }
    Ok(())
}

/// Binary copy of `input` to `output`, returning the number of bytes copied
pub fn copy_file(input: &Path, output: &Path) -> TaskResult<u64> {
    ensure_not_directory(input)?;
    ensure_not_directory(output)?;

    debug!("Copying {} to {}", input.display(), output.display());
    Ok(fs::copy(input, output)?)
}

/// Delete a regular file
pub fn delete_file(path: &Path) -> TaskResult<()> {
    if !path.exists() {
        return Err(TaskError::processing(format!(
            "file {} does not exist", display_name(path)
        )));
    }
    ensure_not_directory(path)?;

    debug!("Deleting {}", path.display());
    Ok(fs::remove_file(path)?)
}

/// Rename (or move) `input` to `output`
pub fn rename_file(input: &Path, output: &Path) -> TaskResult<()> {
    debug!("Renaming {} to {}", input.display(), output.display());
    Ok(fs::rename(input, output)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_refuses_directories() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.png");
        fs::write(&file, b"abc").unwrap();

        let err = copy_file(&file, dir.path()).unwrap_err();
        assert!(matches!(err, TaskError::ProcessingFailed(_)));

        let copied = dir.path().join("b.png");
        assert_eq!(copy_file(&file, &copied).unwrap(), 3);
        assert_eq!(fs::read(&copied).unwrap(), b"abc");
    }

    #[test]
    fn rename_io_failures_are_processing_failures() {
        let dir = tempfile::tempdir().unwrap();
        let err = rename_file(&dir.path().join("gone.png"), &dir.path().join("b.png")).unwrap_err();
        assert_eq!(err.as_label(), "processing_failed");
    }

    #[test]
    fn delete_reports_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let err = delete_file(&dir.path().join("gone.png")).unwrap_err();
        assert_eq!(err, TaskError::processing("file gone.png does not exist"));
    }
}
