//! Domain logic
//!
//! This module contains domain-specific types and helpers:
//! - Posts, embeds, profiles, notifications and threads
//! - Timeline ordering keys
//! - Text processing utilities and language codes

pub mod embed;
pub mod langs;
pub mod notification;
pub mod post;
pub mod profile;
pub mod sort_key;
pub mod text;
pub mod thread;
