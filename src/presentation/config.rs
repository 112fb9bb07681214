//! UI configuration
//!
//! This module contains configuration for key bindings.

pub mod keybindings;

// Re-export for convenience
pub use keybindings::KeyBindings;
