//! Core pipeline types.
//!
//! This module contains the fundamental types used throughout the crate:
//! - [`ImageEvent`]: A caller's request (priority, reply destination, image, tasks)
//! - [`Outcome`]: The single result a worker reports for an event
//! - [`Listener`]: Observer that receives outcomes
//! - [`PipelineConfig`]: Configuration for the worker pool

mod config;
mod event;
mod listener;
mod types;

pub use config::PipelineConfig;
pub use event::{ImageEvent, TaskId};
pub use listener::{ChannelListener, Listener, ReplyTo};
pub use types::{Outcome, OutcomeStatus, Priority, WorkerId};
