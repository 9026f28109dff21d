mod alloc;
mod raw_bytes;

pub use self::alloc::{Global, RawAlloc, TrackingAlloc};
pub use self::raw_bytes::RawBytes;
