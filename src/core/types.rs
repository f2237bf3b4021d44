//! Core types shared by the queue, the worker and callers.

use std::fmt;
use std::str::FromStr;

use image::DynamicImage;
use serde::{Deserialize, Serialize};

/// Scheduling priority of an [`ImageEvent`](crate::ImageEvent).
///
/// High events go to the front of the queue, Low events to the back and
/// Medium events to the middle of whatever is queued at the time of the push.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(format!("Unknown priority: {other}")),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        };
        f.write_str(label)
    }
}

/// Identifier of a worker, assigned by whoever constructs it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WorkerId(pub u64);

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ImageWorker{}", self.0)
    }
}

/// Outcome status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OutcomeStatus {
    /// Every task of the event completed
    Ok,
    /// A task failed; the message says why
    Error,
    /// Processing ended abnormally (a task panicked)
    Unknown,
}

/// The single message a worker sends after processing an event.
#[derive(Clone)]
pub struct Outcome {
    /// Whether the event was processed
    pub status: OutcomeStatus,
    /// The image as it stood when processing ended
    pub image: Option<DynamicImage>,
    /// Error text for failed events
    pub message: Option<String>,
    /// Caller metadata copied from the event, untouched
    pub metadata: Option<serde_json::Value>,
    /// Worker that processed the event
    pub worker: WorkerId,
}

impl Outcome {
    pub fn ok(worker: WorkerId, image: Option<DynamicImage>, metadata: Option<serde_json::Value>) -> Self {
        Self {
            status: OutcomeStatus::Ok,
            image,
            message: None,
            metadata,
            worker,
        }
    }

    pub fn error(
        worker: WorkerId,
        message: impl Into<String>,
        image: Option<DynamicImage>,
        metadata: Option<serde_json::Value>,
    ) -> Self {
        Self {
            status: OutcomeStatus::Error,
            image,
            message: Some(message.into()),
            metadata,
            worker,
        }
    }

    pub fn unknown(
        worker: WorkerId,
        message: impl Into<String>,
        image: Option<DynamicImage>,
        metadata: Option<serde_json::Value>,
    ) -> Self {
        Self {
            status: OutcomeStatus::Unknown,
            image,
            message: Some(message.into()),
            metadata,
            worker,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == OutcomeStatus::Ok
    }
}

impl fmt::Debug for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let image = self
            .image
            .as_ref()
            .map(|img| format!("[{}x{}]", img.width(), img.height()));
        f.debug_struct("Outcome")
            .field("status", &self.status)
            .field("image", &image)
            .field("message", &self.message)
            .field("metadata", &self.metadata)
            .field("worker", &self.worker)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_parses_and_defaults_to_medium() {
        assert_eq!("HIGH".parse::<Priority>().unwrap(), Priority::High);
        assert_eq!("low".parse::<Priority>().unwrap(), Priority::Low);
        assert!("urgent".parse::<Priority>().is_err());
        assert_eq!(Priority::default(), Priority::Medium);
    }

    #[test]
    fn outcome_debug_summarises_the_image() {
        let outcome = Outcome::ok(WorkerId(3), Some(DynamicImage::new_rgb8(4, 2)), None);
        let text = format!("{outcome:?}");
        assert!(text.contains("[4x2]"));
        assert!(outcome.is_ok());
        assert_eq!(WorkerId(3).to_string(), "ImageWorker3");
    }
}
