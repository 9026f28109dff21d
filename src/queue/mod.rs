pub mod handle;
mod linked_queue;
mod merge_sort;
mod node;

pub use self::linked_queue::{Iter, IterOwned, LinkedQueue};
