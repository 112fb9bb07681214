//! # skytui - a terminal client for Bluesky
//!
//! A terminal user interface for AT protocol social networks, built with Ratatui.
//! State changes follow an Elm-like loop.
//!
//! ## Architecture Overview
//!
//! - **Domain** (`domain`): posts, profiles, notifications and text helpers
//! - **Model** (`model`): the post store, timelines, the navigation stack and other
//!   sub-states, each with its own `Message` and `update`
//! - **Core** (`core`): `AppState`, the messages it accepts and the commands it emits
//! - **Infrastructure** (`infrastructure`): the XRPC client, launcher, session store,
//!   config and terminal
//! - **Presentation** (`presentation`): stateless components and widgets
//! - **Integration** (`integration`): the runner tying it all together
//!
//! ## Example Usage
//!
//! ```rust
//! use skytui::{
//!     core::{cmd::Cmd, message::AppMsg, state::AppState},
//!     presentation::config::KeyBindings,
//! };
//!
//! let mut state = AppState::new(KeyBindings::default());
//!
//! // The first sync tick asks for the newest feed page
//! let commands = state.init();
//! assert!(matches!(commands.as_slice(), [Cmd::FetchFeedHead]));
//! ```

pub mod core;
pub mod domain;
pub mod infrastructure;
pub mod integration;
pub mod model;
pub mod presentation;
pub mod utils;

/// Result type used throughout the library
pub type Result<T> = color_eyre::eyre::Result<T>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
