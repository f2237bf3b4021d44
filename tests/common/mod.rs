#![allow(dead_code)]
//! Shared helpers for the integration tests.

use std::sync::Arc;
use std::time::Duration;

use image::{DynamicImage, RgbImage};
use parking_lot::Mutex;

use image_pipeline::{ImageEvent, Listener, Outcome, Task, TaskError, TaskResult};

/// How long tests wait for a reply that is expected to arrive.
pub const REPLY_TIMEOUT: Duration = Duration::from_secs(5);

/// Listener that keeps every outcome it receives.
pub fn recording_listener() -> (Arc<dyn Listener>, Arc<Mutex<Vec<Outcome>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let listener: Arc<dyn Listener> = Arc::new(move |outcome: &Outcome| {
        sink.lock().push(outcome.clone());
    });
    (listener, seen)
}

/// Fails with the given error every time it runs.
#[derive(Debug, Clone)]
pub struct ErrorTask(pub TaskError);

impl ErrorTask {
    pub fn processing(msg: &str) -> Self {
        Self(TaskError::processing(msg))
    }

    pub fn malformed(msg: &str) -> Self {
        Self(TaskError::malformed(msg))
    }
}

impl Task for ErrorTask {
    fn name(&self) -> &str {
        "error"
    }

    fn execute(&self, _event: &mut ImageEvent) -> TaskResult<()> {
        Err(self.0.clone())
    }
}

/// Appends its label to a shared log and replaces the image with one a
/// pixel wider than before (1 pixel wide when there was none).
#[derive(Debug, Clone)]
pub struct RecordingTask {
    label: String,
    log: Arc<Mutex<Vec<String>>>,
}

impl RecordingTask {
    pub fn new(label: &str, log: &Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            label: label.to_string(),
            log: Arc::clone(log),
        }
    }
}

impl Task for RecordingTask {
    fn name(&self) -> &str {
        &self.label
    }

    fn execute(&self, event: &mut ImageEvent) -> TaskResult<()> {
        self.log.lock().push(self.label.clone());
        let width = event.image().map_or(0, |image| image.width()) + 1;
        event.set_image(Some(DynamicImage::ImageRgb8(RgbImage::new(width, 1))));
        Ok(())
    }
}

#[derive(Debug)]
pub struct PanicTask;

impl Task for PanicTask {
    fn name(&self) -> &str {
        "panic"
    }

    fn execute(&self, _event: &mut ImageEvent) -> TaskResult<()> {
        panic!("task blew up")
    }
}

pub fn new_log() -> Arc<Mutex<Vec<String>>> {
    Arc::new(Mutex::new(Vec::new()))
}
