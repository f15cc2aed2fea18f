//! Streaming support.

pub mod merge;

pub use merge::{merge_fields, ChunkMerger};
