//! Integration layer
//!
//! Wires the TUI, the command executor and the application state into a running loop.

pub mod app_runner;
