use std::path::Path;
use crate::utils::PathError;

/// Validates that the input path exists and is a regular file
pub fn validate_input_path(path: &Path) -> Result<(), PathError> {
    if !path.exists() {
        return Err(PathError::NotFound(path.to_path_buf()));
    }

    if !path.is_file() {
        return Err(PathError::NotFile(path.to_path_buf()));
    }

    Ok(())
}

/// Validates that the directory an output file would land in exists
pub fn validate_output_path(path: &Path) -> Result<(), PathError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
            Err(PathError::NotFound(parent.to_path_buf()))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_must_be_an_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.png");
        assert_eq!(validate_input_path(&missing), Err(PathError::NotFound(missing.clone())));
        assert_eq!(
            validate_input_path(dir.path()),
            Err(PathError::NotFile(dir.path().to_path_buf()))
        );

        let file = dir.path().join("present.png");
        std::fs::write(&file, b"x").unwrap();
        assert!(validate_input_path(&file).is_ok());
    }

    #[test]
    fn output_parent_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        assert!(validate_output_path(&dir.path().join("out.png")).is_ok());
        assert!(validate_output_path(Path::new("relative.png")).is_ok());

        let nested = dir.path().join("missing").join("out.png");
        assert!(matches!(validate_output_path(&nested), Err(PathError::NotFound(_))));
    }
}
