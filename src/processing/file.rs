use std::fmt;
use std::path::{Path, PathBuf};

use image::DynamicImage;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::ImageEvent;
use crate::utils::fs::{copy_file, delete_file, display_name, rename_file};
use crate::utils::{format_from_extension, validate_input_path, ImageFormat, TaskError, TaskResult};
use crate::worker::Task;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileOperation {
    DoNothing,
    /// Decode `input` into the event's image
    Read,
    /// Encode the event's image into `output`
    Write,
    Delete,
    Rename,
    Move,
    Copy,
}

impl fmt::Display for FileOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::DoNothing => "do_nothing",
            Self::Read => "read",
            Self::Write => "write",
            Self::Delete => "delete",
            Self::Rename => "rename",
            Self::Move => "move",
            Self::Copy => "copy",
        };
        f.write_str(name)
    }
}

/// File system task: reads, writes, copies, deletes or renames image files.
///
/// Which paths are required depends on the operation; a missing required path
/// is reported as `Malformed` when the task runs.
#[derive(Debug, Clone)]
pub struct FileTask {
    operation: FileOperation,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
}

impl FileTask {
    pub const NAME: &'static str = "file";

    /// Fails if neither path is given.
    pub fn new(
        operation: FileOperation,
        input: Option<PathBuf>,
        output: Option<PathBuf>,
    ) -> TaskResult<Self> {
        if input.is_none() && output.is_none() {
            return Err(TaskError::malformed(
                "both input and output files cannot be absent",
            ));
        }
        Ok(Self {
            operation,
            input,
            output,
        })
    }

    pub fn read(input: impl Into<PathBuf>) -> Self {
        Self {
            operation: FileOperation::Read,
            input: Some(input.into()),
            output: None,
        }
    }

    pub fn write(output: impl Into<PathBuf>) -> Self {
        Self {
            operation: FileOperation::Write,
            input: None,
            output: Some(output.into()),
        }
    }

    pub fn operation(&self) -> FileOperation {
        self.operation
    }

    pub fn input(&self) -> Option<&Path> {
        self.input.as_deref()
    }

    pub fn output(&self) -> Option<&Path> {
        self.output.as_deref()
    }

    fn require_input(&self) -> TaskResult<&Path> {
        self.input()
            .ok_or_else(|| TaskError::malformed("you must provide an input file"))
    }

    fn require_output(&self) -> TaskResult<&Path> {
        self.output()
            .ok_or_else(|| TaskError::malformed("you must provide an output file"))
    }

    fn require_both(&self) -> TaskResult<(&Path, &Path)> {
        match (self.input(), self.output()) {
            (Some(input), Some(output)) => Ok((input, output)),
            _ => Err(TaskError::malformed(
                "you must provide both an input and output file",
            )),
        }
    }
}

impl Task for FileTask {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn execute(&self, event: &mut ImageEvent) -> TaskResult<()> {
        let message = match self.operation {
            FileOperation::DoNothing => "empty task".to_string(),
            FileOperation::Read => {
                let input = self.require_input()?;
                event.set_image(Some(read_image(input)?));
                format!("retrieved image {}", display_name(input))
            }
            FileOperation::Write => {
                let output = self.require_output()?;
                let image = event
                    .image()
                    .ok_or_else(|| TaskError::malformed("nothing to write, image is absent"))?;
                write_image(image, output)?;
                format!("saved image {}", display_name(output))
            }
            FileOperation::Delete => {
                let input = self.require_input()?;
                delete_file(input)?;
                format!("deleted image {}", display_name(input))
            }
            FileOperation::Rename | FileOperation::Move => {
                let (input, output) = self.require_both()?;
                rename_file(input, output)?;
                format!("renamed image {} to {}", display_name(input), display_name(output))
            }
            FileOperation::Copy => {
                let (input, output) = self.require_both()?;
                let bytes = copy_file(input, output)?;
                format!(
                    "copied image {} to {} ({} bytes)",
                    display_name(input),
                    display_name(output),
                    bytes
                )
            }
        };

        info!("{}", message);
        Ok(())
    }
}

fn read_image(path: &Path) -> TaskResult<DynamicImage> {
    validate_input_path(path)?;
    debug!("Decoding {}", path.display());
    Ok(image::open(path)?)
}

fn write_image(image: &DynamicImage, path: &Path) -> TaskResult<()> {
    let format = format_from_extension(path)?;
    debug!("Encoding {} as {:?}", path.display(), format);

    // JPEG has no alpha channel
    if format == ImageFormat::JPEG && image.color().has_alpha() {
        DynamicImage::ImageRgb8(image.to_rgb8()).save_with_format(path, format.codec())?;
    } else {
        image.save_with_format(path, format.codec())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Priority;
    use image::{Rgba, RgbaImage};

    fn sample() -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 3, Rgba([10, 20, 30, 255])))
    }

    #[test]
    fn constructor_requires_a_path() {
        let err = FileTask::new(FileOperation::Copy, None, None).unwrap_err();
        assert_eq!(err.as_label(), "malformed");
        assert!(FileTask::new(FileOperation::Delete, Some("a.png".into()), None).is_ok());
    }

    #[test]
    fn missing_input_file_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let mut event = ImageEvent::new(Priority::Low);
        let err = FileTask::read(dir.path().join("missing.png"))
            .execute(&mut event)
            .unwrap_err();

        assert!(matches!(err, TaskError::Malformed(_)));
        assert!(event.image().is_none());
    }

    #[test]
    fn write_then_read_restores_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");

        let mut event = ImageEvent::new(Priority::Low).with_image(sample());
        FileTask::write(&path).execute(&mut event).unwrap();
        assert!(path.is_file());

        let mut fresh = ImageEvent::new(Priority::Low);
        FileTask::read(&path).execute(&mut fresh).unwrap();
        let image = fresh.image().unwrap();
        assert_eq!((image.width(), image.height()), (4, 3));
    }

    #[test]
    fn write_rejects_unknown_extension_and_missing_image() {
        let dir = tempfile::tempdir().unwrap();

        let mut event = ImageEvent::new(Priority::Low).with_image(sample());
        let err = FileTask::write(dir.path().join("out.xyz"))
            .execute(&mut event)
            .unwrap_err();
        assert_eq!(err, TaskError::processing("file type XYZ not supported"));

        let mut empty = ImageEvent::new(Priority::Low);
        let err = FileTask::write(dir.path().join("out.png"))
            .execute(&mut empty)
            .unwrap_err();
        assert!(matches!(err, TaskError::Malformed(_)));
    }

    #[test]
    fn undecodable_file_fails_processing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"definitely not a png").unwrap();

        let mut event = ImageEvent::new(Priority::Low);
        let err = FileTask::read(&path).execute(&mut event).unwrap_err();
        assert!(matches!(err, TaskError::ProcessingFailed(_)));
        assert!(event.image().is_none());
    }

    #[test]
    fn jpeg_output_drops_alpha() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jpg");
        let mut event = ImageEvent::new(Priority::Low).with_image(sample());

        FileTask::write(&path).execute(&mut event).unwrap();
        assert!(path.is_file());
    }

    #[test]
    fn rename_requires_both_paths() {
        let task = FileTask::new(FileOperation::Rename, Some("a.png".into()), None).unwrap();
        let err = task.execute(&mut ImageEvent::new(Priority::Low)).unwrap_err();
        assert_eq!(
            err,
            TaskError::malformed("you must provide both an input and output file")
        );
    }
}
