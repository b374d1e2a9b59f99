//! CLI command implementations.

pub mod chord;
pub mod common;
pub mod devices;
pub mod play;
pub mod render;
