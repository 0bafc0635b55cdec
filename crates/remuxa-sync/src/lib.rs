#![forbid(unsafe_code)]

//! `remuxa-sync`
//!
//! FIFO mutual exclusion for cooperative async tasks.
//!
//! Provides [`Mutex`], a unit mutex that serializes critical sections in the
//! exact order they were requested. It guards no data of its own; callers keep
//! the protected state reachable only from inside the critical section.

mod mutex;

pub use mutex::Mutex;
