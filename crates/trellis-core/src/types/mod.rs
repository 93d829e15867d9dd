//! Core data types for trellis

pub mod config;
pub mod node;
