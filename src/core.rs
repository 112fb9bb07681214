//! Core Elm Architecture implementation
//!
//! This module contains the core components of the Elm architecture:
//! - Messages and key-bound actions
//! - Application state and its update logic
//! - Side-effect commands and their executor
//! - Key translation layer

pub mod action;
pub mod cmd;
pub mod cmd_executor;
pub mod message;
pub mod state;
pub mod translator;
