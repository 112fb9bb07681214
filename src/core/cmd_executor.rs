use std::sync::Arc;

use tokio::{sync::mpsc, task};
use tracing::{debug_span, Instrument};

use crate::{
    core::{
        cmd::Cmd,
        message::{ApiMsg, AppMsg},
    },
    domain::post::ViewerMutation,
    infrastructure::{
        api::{Api, ApiError, Credentials},
        launcher::Launcher,
        session::SessionStore,
    },
};

/// Runs commands on spawned tokio tasks and sends their outcome back as `AppMsg::Api`
#[derive(Clone)]
pub struct CmdExecutor {
    api: Arc<dyn Api>,
    launcher: Arc<dyn Launcher>,
    sessions: Arc<dyn SessionStore>,
    credentials: Option<Credentials>,
    sender: mpsc::UnboundedSender<AppMsg>,
}

impl CmdExecutor {
    pub fn new(
        api: Arc<dyn Api>,
        launcher: Arc<dyn Launcher>,
        sessions: Arc<dyn SessionStore>,
        sender: mpsc::UnboundedSender<AppMsg>,
    ) -> Self {
        Self {
            api,
            launcher,
            sessions,
            credentials: None,
            sender,
        }
    }

    /// Credentials used to sign in again after the session expired
    pub fn with_credentials(mut self, credentials: Option<Credentials>) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn execute_commands(&self, commands: impl IntoIterator<Item = Cmd>) {
        for cmd in commands {
            self.execute_command(cmd);
        }
    }

    pub fn execute_command(&self, cmd: Cmd) {
        log::debug!("execute: {}", cmd.name());

        let span = debug_span!("cmd", name = cmd.name());
        let this = self.clone();
        tokio::spawn(
            async move {
                let msg = this.run(cmd).await;
                send(&this.sender, msg);
            }
            .instrument(span),
        );
    }

    async fn run(&self, cmd: Cmd) -> ApiMsg {
        let api = &self.api;
        match cmd {
            Cmd::FetchFeedHead => ApiMsg::FeedHeadLoaded(api.fetch_feed_page(None).await),
            Cmd::FetchFeedOlder { cursor } => {
                ApiMsg::FeedOlderLoaded(api.fetch_feed_page(Some(&cursor)).await)
            }
            Cmd::FetchThread { frame, root } => ApiMsg::ThreadLoaded {
                frame,
                result: api.fetch_thread(&root).await,
            },
            Cmd::FetchProfile { frame, actor } => ApiMsg::ProfileLoaded {
                frame,
                result: api.fetch_profile(&actor).await,
            },
            Cmd::FetchNotifications { frame } => ApiMsg::NotificationsLoaded {
                frame,
                result: api.fetch_notifications(None).await,
            },
            Cmd::FetchUnreadCount => ApiMsg::UnreadCountLoaded(api.unread_notifications().await),
            Cmd::MarkNotificationsSeen { seen_at } => {
                ApiMsg::NotificationsSeen(api.mark_notifications_seen(seen_at).await)
            }
            Cmd::SearchActors { frame, query } => ApiMsg::ActorsFound {
                frame,
                result: api.search_actors(&query).await,
                query,
            },
            Cmd::FetchLikes { frame, post } => ApiMsg::LikesLoaded {
                frame,
                result: api.fetch_likes(&post).await,
            },
            Cmd::Like { post } => ApiMsg::ViewerStateChanged {
                result: api
                    .like(&post)
                    .await
                    .map(|record| ViewerMutation::Liked { record }),
                post: post.uri,
            },
            Cmd::Unlike { post, record } => ApiMsg::ViewerStateChanged {
                result: api.unlike(&record).await.map(|()| ViewerMutation::Unliked),
                post,
            },
            Cmd::Repost { post } => ApiMsg::ViewerStateChanged {
                result: api
                    .repost(&post)
                    .await
                    .map(|record| ViewerMutation::Reposted { record }),
                post: post.uri,
            },
            Cmd::Unrepost { post, record } => ApiMsg::ViewerStateChanged {
                result: api
                    .unrepost(&record)
                    .await
                    .map(|()| ViewerMutation::Unreposted),
                post,
            },
            Cmd::Follow { did } => ApiMsg::Followed {
                result: api.follow(&did).await,
                did,
            },
            Cmd::CreatePost { frame, request } => ApiMsg::PostCreated {
                frame,
                result: api.create_post(&request).await,
            },
            Cmd::Open {
                kind,
                payload,
                frame,
            } => ApiMsg::Opened {
                kind,
                frame,
                result: self
                    .launcher
                    .open(kind, &payload)
                    .await
                    .map_err(|e| e.to_string()),
            },
            Cmd::Reauthenticate => {
                let result = match &self.credentials {
                    Some(credentials) => api.authenticate(credentials).await,
                    None => Err(ApiError::Auth(String::from(
                        "session expired and no password is configured",
                    ))),
                };
                ApiMsg::Reauthenticated(result)
            }
            Cmd::SaveSession(session) => {
                let sessions = Arc::clone(&self.sessions);
                let result = task::spawn_blocking(move || sessions.save(&session))
                    .await
                    .map_err(|e| e.to_string())
                    .and_then(|saved| saved.map_err(|e| format!("{e:#}")));
                ApiMsg::SessionSaved(result)
            }
        }
    }
}

fn send(sender: &mpsc::UnboundedSender<AppMsg>, msg: ApiMsg) {
    if let Err(e) = sender.send(AppMsg::Api(msg)) {
        log::warn!("dropping command result, receiver closed: {e}");
    }
}
