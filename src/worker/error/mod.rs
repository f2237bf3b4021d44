use crate::core::WorkerId;

#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    #[error("{0} has already been started")]
    AlreadyStarted(WorkerId),

    #[error("Failed to spawn thread for {worker}: {source}")]
    Spawn {
        worker: WorkerId,
        #[source]
        source: std::io::Error,
    },

    #[error("{worker} thread panicked: {message}")]
    Panicked { worker: WorkerId, message: String },
}

pub type WorkerResult<T> = Result<T, WorkerError>;

/// Best-effort text of a panic payload.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
