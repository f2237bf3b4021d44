pub mod error;
pub mod validation;
pub mod formats;
pub mod fs;

pub use error::{ConfigError, PathError, TaskError, TaskResult};
pub use validation::{validate_input_path, validate_output_path};
pub use formats::{ImageFormat, format_from_extension};
