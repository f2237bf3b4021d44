//! Fit-to-box resizing.

use image::imageops::FilterType;
use image::DynamicImage;
use tracing::debug;

use crate::core::ImageEvent;
use crate::utils::{TaskError, TaskResult};
use crate::worker::Task;

/// Scales the event's image to fit inside `width` x `height`, keeping its
/// aspect ratio. Images are enlarged as well as shrunk.
#[derive(Debug, Clone)]
pub struct ResizeTask {
    width: u32,
    height: u32,
    filter: FilterType,
}

impl ResizeTask {
    pub const NAME: &'static str = "resize";

    pub fn new(width: u32, height: u32) -> TaskResult<Self> {
        if width == 0 || height == 0 {
            return Err(TaskError::malformed(
                "height and width must be greater than 0",
            ));
        }
        Ok(Self {
            width,
            height,
            filter: FilterType::Nearest,
        })
    }

    /// Sampling filter, nearest neighbour by default.
    pub fn with_filter(mut self, filter: FilterType) -> Self {
        self.filter = filter;
        self
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns `None` when the image should be left as it is.
    pub fn target_size(&self, width: u32, height: u32) -> Option<(u32, u32)> {
        let x_scale = f64::from(self.width) / f64::from(width);
        let y_scale = f64::from(self.height) / f64::from(height);

        // One side already matches the box
        if x_scale == 1.0 || y_scale == 1.0 {
            return None;
        }

        let scale = x_scale.min(y_scale);
        let scaled = |side: u32| ((f64::from(side) * scale).round() as u32).max(1);
        Some((scaled(width), scaled(height)))
    }

    fn resize(&self, image: &DynamicImage) -> Option<DynamicImage> {
        let (width, height) = self.target_size(image.width(), image.height())?;
        debug!(
            "Resizing {}x{} to {}x{}",
            image.width(),
            image.height(),
            width,
            height
        );
        Some(image.resize_exact(width, height, self.filter))
    }
}

impl Task for ResizeTask {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn execute(&self, event: &mut ImageEvent) -> TaskResult<()> {
        let image = event
            .image()
            .ok_or_else(|| TaskError::processing("image cannot be absent"))?;
        if image.width() == 0 || image.height() == 0 {
            return Err(TaskError::processing("image has no pixels"));
        }

        match self.resize(image) {
            Some(resized) => event.set_image(Some(resized)),
            None => debug!("No scaling to do for {}x{}", self.width, self.height),
        }
        Ok(())
    }
}
