//! Stateful building blocks owned by the coordinator
//!
//! Each component exposes a `Message` enum and an `update` method; none of them perform I/O.

pub mod actor_search;
pub mod composer;
pub mod feed_sync;
pub mod key_sequence;
pub mod navigation;
pub mod post_store;
pub mod selection;
pub mod status_bar;
pub mod timeline;
