use tracing::debug;

use crate::core::ImageEvent;
use crate::utils::{TaskError, TaskResult};
use crate::worker::Task;

/// 3x3 convolution weights, row major.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kernel([f32; 9]);

impl Kernel {
    pub const AVERAGE: Kernel = Kernel([1.0 / 9.0; 9]);

    #[rustfmt::skip]
    pub const GAUSSIAN: Kernel = Kernel([
        1.0 / 16.0, 2.0 / 16.0, 1.0 / 16.0,
        2.0 / 16.0, 4.0 / 16.0, 2.0 / 16.0,
        1.0 / 16.0, 2.0 / 16.0, 1.0 / 16.0,
    ]);

    #[rustfmt::skip]
    pub const SHARPEN: Kernel = Kernel([
        0.0, -1.0, 0.0,
        -1.0, 5.0, -1.0,
        0.0, -1.0, 0.0,
    ]);

    pub fn new(weights: [f32; 9]) -> TaskResult<Self> {
        if weights.iter().any(|w| !w.is_finite()) {
            return Err(TaskError::malformed("kernel weights must be finite"));
        }
        Ok(Self(weights))
    }

    pub fn weights(&self) -> &[f32; 9] {
        &self.0
    }
}

/// Spatial filter applied with a 3x3 kernel.
#[derive(Debug, Clone)]
pub struct KernelTask {
    kernel: Kernel,
}

impl KernelTask {
    pub const NAME: &'static str = "spatial_filter";

    pub fn new(kernel: Kernel) -> Self {
        Self { kernel }
    }

    pub fn kernel(&self) -> &Kernel {
        &self.kernel
    }
}

impl Task for KernelTask {
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

        debug!("Applying kernel {:?}", self.kernel.weights());
        let filtered = image.filter3x3(self.kernel.weights());
        event.set_image(Some(filtered));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Priority;
    use image::{DynamicImage, Luma, GrayImage};

    #[test]
    fn rejects_non_finite_weights() {
        let mut weights = [0.0; 9];
        weights[4] = f32::NAN;
        assert!(matches!(Kernel::new(weights), Err(TaskError::Malformed(_))));
        assert!(Kernel::new([0.5; 9]).is_ok());
    }

    #[test]
    fn average_smooths_a_single_bright_pixel() {
        let mut gray = GrayImage::from_pixel(3, 3, Luma([0]));
        gray.put_pixel(1, 1, Luma([180]));
        let mut event = ImageEvent::new(Priority::Low).with_image(DynamicImage::ImageLuma8(gray));

        KernelTask::new(Kernel::AVERAGE).execute(&mut event).unwrap();

        let out = event.image().unwrap().to_luma8();
        assert_eq!(out.dimensions(), (3, 3));
        assert!(out.get_pixel(1, 1)[0] < 180);
    }

    #[test]
    fn empty_images_fail_processing() {
        for (width, height) in [(0, 5), (5, 0), (0, 0)] {
            let mut event = ImageEvent::new(Priority::Low)
                .with_image(DynamicImage::new_rgb8(width, height));
            let err = KernelTask::new(Kernel::SHARPEN).execute(&mut event).unwrap_err();

            assert_eq!(err, TaskError::processing("image has no pixels"));
            assert_eq!(event.image().map(|i| i.height()), Some(height));
        }
    }

    #[test]
    fn one_pixel_image_is_filtered() {
        let mut event = ImageEvent::new(Priority::Low).with_image(DynamicImage::new_rgb8(1, 1));
        KernelTask::new(Kernel::AVERAGE).execute(&mut event).unwrap();
        assert_eq!(event.image().map(|i| (i.width(), i.height())), Some((1, 1)));
    }

    #[test]
    fn missing_image_fails_processing() {
        let mut event = ImageEvent::new(Priority::Low);
        let err = KernelTask::new(Kernel::SHARPEN).execute(&mut event).unwrap_err();
        assert_eq!(err, TaskError::processing("image cannot be absent"));
    }
}
