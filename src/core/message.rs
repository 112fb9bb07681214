//! Application messages
//!
//! Everything that can change [`AppState`](crate::core::state::AppState) arrives as an
//! [`AppMsg`]: terminal input, sync ticks, and the results of spawned commands.

use crossterm::event::KeyEvent;

use crate::{
    domain::{
        embed::{ImageAttachment, OpenKind},
        post::{Author, Post, PostId, ViewerMutation},
    },
    infrastructure::api::{ApiError, FeedPage, NotificationPage, ProfilePage, Session, ThreadPage},
    model::{actor_search, composer, navigation::FrameId},
};

/// Main application message type
#[derive(Debug, Clone)]
pub enum AppMsg {
    /// System-level messages
    System(SystemMsg),
    /// Raw key input, translated against the top frame
    Key(KeyEvent),
    /// Intents on the top feed-like frame
    Feed(FeedMsg),
    /// Input for the composer on top of the stack
    Composer(composer::Message),
    /// Query edits on the search frame on top of the stack
    Search(actor_search::Message),
    /// Results of spawned commands
    Api(ApiMsg),
}

/// System messages
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SystemMsg {
    /// Quit the application
    Quit,
    /// Sync interval elapsed
    Tick,
    /// Notification poll interval elapsed
    PollNotifications,
    /// Terminal resize event
    Resize(u16, u16),
    /// Bracketed paste
    Paste(String),
    /// Show an error message
    ShowError(String),
}

/// Intents bound to keys on feed, thread, profile and notification frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedMsg {
    /// Pop the top frame
    Back,
    ScrollUp,
    /// Move down; past the last feed item this loads older posts
    ScrollDown,
    ScrollToTop,
    /// Jump to the last item and load older posts
    ScrollToBottom,
    OpenThread,
    OpenProfile,
    OpenNotifications,
    OpenSearch,
    /// List the accounts that liked the selected post
    OpenLikes,
    OpenMedia,
    OpenLink,
    OpenInBrowser,
    NewPost,
    Reply,
    Quote,
    ToggleLike,
    ToggleRepost,
    Follow,
}

/// Outcomes reported by the command executor
#[derive(Debug, Clone)]
pub enum ApiMsg {
    FeedHeadLoaded(Result<FeedPage, ApiError>),
    FeedOlderLoaded(Result<FeedPage, ApiError>),
    ThreadLoaded {
        frame: FrameId,
        result: Result<ThreadPage, ApiError>,
    },
    ProfileLoaded {
        frame: FrameId,
        result: Result<ProfilePage, ApiError>,
    },
    NotificationsLoaded {
        frame: FrameId,
        result: Result<NotificationPage, ApiError>,
    },
    UnreadCountLoaded(Result<u32, ApiError>),
    NotificationsSeen(Result<(), ApiError>),
    ActorsFound {
        frame: FrameId,
        query: String,
        result: Result<Vec<Author>, ApiError>,
    },
    LikesLoaded {
        frame: FrameId,
        result: Result<Vec<Author>, ApiError>,
    },
    ViewerStateChanged {
        post: PostId,
        result: Result<ViewerMutation, ApiError>,
    },
    Followed {
        did: String,
        result: Result<String, ApiError>,
    },
    PostCreated {
        frame: FrameId,
        result: Result<Post, ApiError>,
    },
    Opened {
        kind: OpenKind,
        /// Composer that asked for the file, if any
        frame: Option<FrameId>,
        result: Result<Option<ImageAttachment>, String>,
    },
    Reauthenticated(Result<Session, ApiError>),
    SessionSaved(Result<(), String>),
}
