//! Trellis Storage Implementations
//!
//! This crate provides concrete implementations of the `GraphStore` trait
//! from `trellis-core`.
//!
//! # Available Backends
//!
//! - `MemGraph`: In-memory property graph (for testing and ephemeral use)

pub mod mem;

// Re-export the trait from trellis-core
pub use trellis_core::{GraphStore, GraphStoreError, StoreResult};

// Re-export implementations
pub use mem::{MemGraph, MemNode};
