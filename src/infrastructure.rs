//! Infrastructure layer
//!
//! This module handles external integrations and services:
//! - Network API client and its trait
//! - Launcher for external programs
//! - Session persistence
//! - TUI foundation
//! - CLI argument processing and configuration

pub mod api;
pub mod bsky;
pub mod cli;
pub mod config;
pub mod launcher;
pub mod session;
pub mod tui;
