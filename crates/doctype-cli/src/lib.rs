//! Command-line host for the DocType layout engine.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod render;
pub mod settings;
pub mod state;
