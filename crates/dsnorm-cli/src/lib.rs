//! Library side of the `dsnorm` command: configuration, logging, rendering.

pub mod config;
pub mod logging;
pub mod render;
