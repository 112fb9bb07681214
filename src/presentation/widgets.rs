//! Reusable widgets
//!
//! Widgets render borrowed domain values and never touch `AppState` directly.

pub mod breadcrumb;
pub mod name_with_handle;
pub mod post;
pub mod post_stats;
pub mod status_bar;
