//! Image processing event definition.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use image::DynamicImage;

use crate::core::{Listener, Priority, ReplyTo};
use crate::worker::Task;

/// Identity of a task within the event that holds it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

/// A caller's request: priority, reply destination, image and an ordered
/// list of tasks.
///
/// Tasks run first-in first-out against the event's image. Once a task has
/// been consumed it is gone; the list only shrinks while a worker processes
/// the event. The event is moved into exactly one worker, so none of its
/// methods need locking.
pub struct ImageEvent {
    priority: Priority,
    reply_to: Option<ReplyTo>,
    image: Option<DynamicImage>,
    metadata: Option<serde_json::Value>,
    tasks: VecDeque<(TaskId, Box<dyn Task>)>,
    next_task_id: u64,
}

impl ImageEvent {
    pub fn new(priority: Priority) -> Self {
        Self {
            priority,
            reply_to: None,
            image: None,
            metadata: None,
            tasks: VecDeque::new(),
            next_task_id: 0,
        }
    }

    /// Sends the outcome of this event to `listener`.
    pub fn with_reply_to(mut self, listener: &Arc<dyn Listener>) -> Self {
        self.reply_to = Some(ReplyTo::new(listener));
        self
    }

    pub fn with_image(mut self, image: DynamicImage) -> Self {
        self.image = Some(image);
        self
    }

    /// Attaches caller data that is returned untouched in the outcome.
    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn with_task(mut self, task: impl Task + 'static) -> Self {
        self.add_task(task);
        self
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn set_priority(&mut self, priority: Priority) {
        self.priority = priority;
    }

    pub fn reply_to(&self) -> Option<&ReplyTo> {
        self.reply_to.as_ref()
    }

    /// Appends a task to the end of the pending list.
    pub fn add_task(&mut self, task: impl Task + 'static) -> TaskId {
        self.add_boxed_task(Box::new(task))
    }

    pub fn add_boxed_task(&mut self, task: Box<dyn Task>) -> TaskId {
        let id = TaskId(self.next_task_id);
        self.next_task_id += 1;
        self.tasks.push_back((id, task));
        id
    }

    /// Removes a pending task by identity. Returns `None` if it is not queued
    /// (never added, already removed or already consumed).
    pub fn remove_task(&mut self, id: TaskId) -> Option<Box<dyn Task>> {
        let pos = self.tasks.iter().position(|(task_id, _)| *task_id == id)?;
        self.tasks.remove(pos).map(|(_, task)| task)
    }

    /// Removes and returns the front task.
    pub fn consume_next_task(&mut self) -> Option<Box<dyn Task>> {
        self.tasks.pop_front().map(|(_, task)| task)
    }

    pub fn remaining_count(&self) -> usize {
        self.tasks.len()
    }

    /// Drops every pending task, returning how many there were.
    pub fn clear_tasks(&mut self) -> usize {
        let count = self.tasks.len();
        self.tasks.clear();
        count
    }

    pub fn image(&self) -> Option<&DynamicImage> {
        self.image.as_ref()
    }

    /// Replaces the whole image.
    pub fn set_image(&mut self, image: Option<DynamicImage>) {
        self.image = image;
    }

    pub fn take_image(&mut self) -> Option<DynamicImage> {
        self.image.take()
    }

    pub fn metadata(&self) -> Option<&serde_json::Value> {
        self.metadata.as_ref()
    }

    pub fn set_metadata(&mut self, metadata: Option<serde_json::Value>) {
        self.metadata = metadata;
    }

    pub fn take_metadata(&mut self) -> Option<serde_json::Value> {
        self.metadata.take()
    }
}

impl fmt::Debug for ImageEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tasks: Vec<&str> = self.tasks.iter().map(|(_, task)| task.name()).collect();
        let image = self
            .image
            .as_ref()
            .map(|img| format!("[{}x{}]", img.width(), img.height()));
        f.debug_struct("ImageEvent")
            .field("priority", &self.priority)
            .field("reply_to", &self.reply_to)
            .field("image", &image)
            .field("metadata", &self.metadata)
            .field("tasks", &tasks)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::{ExitTask, NullTask};
    use std::time::Duration;

    fn null_task() -> NullTask {
        NullTask::new(Duration::from_millis(1))
    }

    #[test]
    fn tasks_are_consumed_front_to_back() {
        let mut event = ImageEvent::new(Priority::Low)
            .with_task(null_task())
            .with_task(ExitTask::new());
        assert_eq!(event.remaining_count(), 2);

        let first = event.consume_next_task().unwrap();
        assert_eq!(first.name(), NullTask::NAME);
        let second = event.consume_next_task().unwrap();
        assert!(second.stops_worker());
        assert!(event.consume_next_task().is_none());
        assert_eq!(event.remaining_count(), 0);
    }

    #[test]
    fn remove_task_matches_identity_only_once() {
        let mut event = ImageEvent::new(Priority::Medium);
        let a = event.add_task(null_task());
        let b = event.add_task(null_task());

        assert!(event.remove_task(a).is_some());
        assert!(event.remove_task(a).is_none());
        assert_eq!(event.remaining_count(), 1);

        event.consume_next_task();
        assert!(event.remove_task(b).is_none());
    }

    #[test]
    fn image_is_replaced_wholesale() {
        let mut event = ImageEvent::new(Priority::High).with_image(DynamicImage::new_rgb8(2, 2));
        assert_eq!(event.image().map(|i| i.width()), Some(2));

        event.set_image(Some(DynamicImage::new_rgb8(5, 1)));
        assert_eq!(event.image().map(|i| i.width()), Some(5));
        assert!(event.take_image().is_some());
        assert!(event.image().is_none());
    }

    #[test]
    fn metadata_round_trips_untouched() {
        let event = ImageEvent::new(Priority::Low).with_metadata(serde_json::json!({"row": 7}));
        assert_eq!(event.metadata(), Some(&serde_json::json!({"row": 7})));
    }
}
