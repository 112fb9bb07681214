use chrono::{DateTime, Utc};

use crate::{
    domain::{
        embed::OpenKind,
        post::{CreatePostRequest, PostId, StrongRef},
    },
    infrastructure::api::{Cursor, Session},
    model::navigation::FrameId,
};

/// Side effects requested by `AppState::update`
///
/// Commands are data only; `CmdExecutor` runs them and reports back through `ApiMsg`.
#[derive(Debug, Clone)]
pub enum Cmd {
    FetchFeedHead,
    FetchFeedOlder {
        cursor: Cursor,
    },
    FetchThread {
        frame: FrameId,
        root: PostId,
    },
    FetchProfile {
        frame: FrameId,
        actor: String,
    },
    FetchNotifications {
        frame: FrameId,
    },
    FetchUnreadCount,
    MarkNotificationsSeen {
        seen_at: DateTime<Utc>,
    },
    SearchActors {
        frame: FrameId,
        query: String,
    },
    FetchLikes {
        frame: FrameId,
        post: PostId,
    },
    Like {
        post: StrongRef,
    },
    Unlike {
        post: PostId,
        record: String,
    },
    Repost {
        post: StrongRef,
    },
    Unrepost {
        post: PostId,
        record: String,
    },
    Follow {
        did: String,
    },
    CreatePost {
        frame: FrameId,
        request: CreatePostRequest,
    },
    Open {
        kind: OpenKind,
        payload: String,
        frame: Option<FrameId>,
    },
    Reauthenticate,
    SaveSession(Session),
}

impl Cmd {
    pub fn name(&self) -> &'static str {
        match self {
            Cmd::FetchFeedHead => "FetchFeedHead",
            Cmd::FetchFeedOlder { .. } => "FetchFeedOlder",
            Cmd::FetchThread { .. } => "FetchThread",
            Cmd::FetchProfile { .. } => "FetchProfile",
            Cmd::FetchNotifications { .. } => "FetchNotifications",
            Cmd::FetchUnreadCount => "FetchUnreadCount",
            Cmd::MarkNotificationsSeen { .. } => "MarkNotificationsSeen",
            Cmd::SearchActors { .. } => "SearchActors",
            Cmd::FetchLikes { .. } => "FetchLikes",
            Cmd::Like { .. } => "Like",
            Cmd::Unlike { .. } => "Unlike",
            Cmd::Repost { .. } => "Repost",
            Cmd::Unrepost { .. } => "Unrepost",
            Cmd::Follow { .. } => "Follow",
            Cmd::CreatePost { .. } => "CreatePost",
            Cmd::Open { .. } => "Open",
            Cmd::Reauthenticate => "Reauthenticate",
            Cmd::SaveSession(_) => "SaveSession",
        }
    }
}
