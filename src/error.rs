use thiserror::Error;

pub type Result<T> = std::result::Result<T, QueueError>;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueError {
    #[error("allocation failed")]
    AllocationFailure,

    #[error("queue is absent or empty")]
    InvalidState,
}
