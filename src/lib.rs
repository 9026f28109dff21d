pub mod cmp;
pub mod error;
pub mod queue;
pub mod raw;

pub use crate::cmp::{natural_cmp, natural_cmp_ignore_case};
pub use crate::error::{QueueError, Result};
pub use crate::queue::LinkedQueue;
