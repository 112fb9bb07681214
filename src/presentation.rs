//! Presentation layer
//!
//! - Stateless frame components
//! - Reusable widgets
//! - Configuration (keybindings)

pub mod components;
pub mod config;
pub mod widgets;
