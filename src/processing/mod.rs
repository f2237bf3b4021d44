mod exit;
mod file;
mod kernel;
mod null;
mod resize;

pub use exit::ExitTask;
pub use file::{FileOperation, FileTask};
pub use kernel::{Kernel, KernelTask};
pub use null::NullTask;
pub use resize::ResizeTask;

pub use image::imageops::FilterType;
