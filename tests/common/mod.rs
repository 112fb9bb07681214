#![allow(dead_code)]

use std::{
    collections::{HashMap, VecDeque},
    env,
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use secrecy::SecretString;
use tokio::{sync::mpsc, time};

use skytui::{
    core::{
        cmd::Cmd,
        cmd_executor::CmdExecutor,
        message::AppMsg,
        state::AppState,
    },
    domain::{
        embed::{ImageAttachment, OpenKind},
        post::{Author, CreatePostRequest, Engagement, Post, PostId, StrongRef},
    },
    infrastructure::{
        api::{
            Api, ApiError, Credentials, Cursor, FeedPage, NotificationPage, ProfilePage, Session,
            ThreadPage,
        },
        config::Config,
        launcher::{LaunchError, Launcher},
        session::SessionStore,
    },
    presentation::config::KeyBindings,
};

pub fn author(handle: &str) -> Author {
    Author {
        did: format!("did:plc:{handle}"),
        handle: format!("{handle}.test"),
        display_name: None,
    }
}

pub fn post_id(name: &str) -> PostId {
    PostId::new(format!("at://did:plc:alice/app.bsky.feed.post/{name}"))
}

/// A post by alice created `secs` seconds after the epoch
pub fn post(name: &str, secs: i64) -> Post {
    Post {
        id: post_id(name),
        cid: format!("cid-{name}"),
        author: author("alice"),
        text: format!("post {name}"),
        embed: None,
        like: Engagement::default(),
        repost: Engagement::default(),
        reply_count: 0,
        quote_count: 0,
        labels: vec![],
        created_at: Utc.timestamp_opt(secs, 0).single().expect("valid timestamp"),
        reason: None,
        reply_to: None,
        thread_root: None,
    }
}

pub fn page(posts: Vec<Post>, cursor: Option<&str>) -> FeedPage {
    FeedPage {
        posts,
        cursor: cursor.map(Cursor::new),
    }
}

pub fn session(handle: &str) -> Session {
    Session {
        did: format!("did:plc:{handle}"),
        handle: format!("{handle}.test"),
        access_jwt: SecretString::from(format!("access-{handle}")),
        refresh_jwt: SecretString::from(format!("refresh-{handle}")),
    }
}

pub fn credentials() -> Credentials {
    Credentials {
        identifier: String::from("alice.test"),
        password: SecretString::from("app-password"),
    }
}

/// Default keybindings from the bundled config
pub fn default_bindings() -> KeyBindings {
    let dir = env::temp_dir().join("skytui-tests-no-config");
    Config::load(&dir, &dir)
        .expect("bundled config loads")
        .keybindings
}

pub fn key(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
}

pub fn code(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

/// Api double answering from scripted responses and recording every call
#[derive(Default)]
pub struct FakeApi {
    pub feed: Mutex<VecDeque<Result<FeedPage, ApiError>>>,
    pub threads: Mutex<HashMap<PostId, ThreadPage>>,
    pub profiles: Mutex<HashMap<String, ProfilePage>>,
    pub notifications: Mutex<Option<NotificationPage>>,
    pub authenticate: Mutex<Option<Result<Session, ApiError>>>,
    pub resume: Mutex<Option<Result<Session, ApiError>>>,
    pub created: Mutex<VecDeque<Result<Post, ApiError>>>,
    pub unread: Mutex<u32>,
    /// Search results by query
    pub actors: Mutex<HashMap<String, Vec<Author>>>,
    pub likes: Mutex<HashMap<PostId, Vec<Author>>>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeApi {
    pub fn push_feed(&self, result: Result<FeedPage, ApiError>) {
        self.feed.lock().expect("lock").push_back(result);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("lock").clone()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().expect("lock").push(call.into());
    }
}

#[async_trait]
impl Api for FakeApi {
    async fn authenticate(&self, credentials: &Credentials) -> Result<Session, ApiError> {
        self.record(format!("authenticate {}", credentials.identifier));
        self.authenticate
            .lock()
            .expect("lock")
            .clone()
            .unwrap_or_else(|| Ok(session("alice")))
    }

    async fn resume_session(&self, session: Session) -> Result<Session, ApiError> {
        self.record(format!("resume {}", session.handle));
        self.resume
            .lock()
            .expect("lock")
            .clone()
            .unwrap_or(Ok(session))
    }

    async fn fetch_feed_page(&self, cursor: Option<&Cursor>) -> Result<FeedPage, ApiError> {
        self.record(format!(
            "feed {}",
            cursor.map_or("-", |cursor| cursor.as_str())
        ));
        self.feed
            .lock()
            .expect("lock")
            .pop_front()
            .unwrap_or_else(|| Ok(FeedPage::default()))
    }

    async fn fetch_thread(&self, root: &PostId) -> Result<ThreadPage, ApiError> {
        self.record(format!("thread {}", root.rkey()));
        self.threads
            .lock()
            .expect("lock")
            .get(root)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(root.to_string()))
    }

    async fn fetch_profile(&self, actor: &str) -> Result<ProfilePage, ApiError> {
        self.record(format!("profile {actor}"));
        self.profiles
            .lock()
            .expect("lock")
            .get(actor)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(actor.to_string()))
    }

    async fn fetch_notifications(
        &self,
        _cursor: Option<&Cursor>,
    ) -> Result<NotificationPage, ApiError> {
        self.record("notifications");
        Ok(self
            .notifications
            .lock()
            .expect("lock")
            .clone()
            .unwrap_or_default())
    }

    async fn unread_notifications(&self) -> Result<u32, ApiError> {
        self.record("unread");
        Ok(*self.unread.lock().expect("lock"))
    }

    async fn mark_notifications_seen(&self, _seen_at: DateTime<Utc>) -> Result<(), ApiError> {
        self.record("seen");
        *self.unread.lock().expect("lock") = 0;
        if let Some(page) = self.notifications.lock().expect("lock").as_mut() {
            for notification in &mut page.notifications {
                notification.is_read = true;
            }
        }
        Ok(())
    }

    async fn search_actors(&self, query: &str) -> Result<Vec<Author>, ApiError> {
        self.record(format!("search {query}"));
        Ok(self
            .actors
            .lock()
            .expect("lock")
            .get(query)
            .cloned()
            .unwrap_or_default())
    }

    async fn fetch_likes(&self, post: &PostId) -> Result<Vec<Author>, ApiError> {
        self.record(format!("likes {}", post.rkey()));
        Ok(self
            .likes
            .lock()
            .expect("lock")
            .get(post)
            .cloned()
            .unwrap_or_default())
    }

    async fn like(&self, post: &StrongRef) -> Result<String, ApiError> {
        self.record(format!("like {}", post.uri.rkey()));
        Ok(format!("at://did:plc:me/app.bsky.feed.like/{}", post.uri.rkey()))
    }

    async fn unlike(&self, record: &str) -> Result<(), ApiError> {
        self.record(format!("unlike {record}"));
        Ok(())
    }

    async fn repost(&self, post: &StrongRef) -> Result<String, ApiError> {
        self.record(format!("repost {}", post.uri.rkey()));
        Ok(format!("at://did:plc:me/app.bsky.feed.repost/{}", post.uri.rkey()))
    }

    async fn unrepost(&self, record: &str) -> Result<(), ApiError> {
        self.record(format!("unrepost {record}"));
        Ok(())
    }

    async fn follow(&self, did: &str) -> Result<String, ApiError> {
        self.record(format!("follow {did}"));
        Ok(String::from("at://did:plc:me/app.bsky.graph.follow/1"))
    }

    async fn create_post(&self, request: &CreatePostRequest) -> Result<Post, ApiError> {
        self.record(format!("post {}", request.text));
        self.created
            .lock()
            .expect("lock")
            .pop_front()
            .unwrap_or_else(|| {
                let mut created = post("created", 1_000_000);
                created.text.clone_from(&request.text);
                Ok(created)
            })
    }
}

#[derive(Default)]
pub struct FakeLauncher {
    pub opened: Mutex<Vec<(OpenKind, String)>>,
    pub attachment: Mutex<Option<ImageAttachment>>,
}

#[async_trait]
impl Launcher for FakeLauncher {
    async fn open(
        &self,
        kind: OpenKind,
        payload: &str,
    ) -> Result<Option<ImageAttachment>, LaunchError> {
        self.opened
            .lock()
            .expect("lock")
            .push((kind, payload.to_string()));
        match kind {
            OpenKind::FilePicker | OpenKind::ClipboardImage => {
                Ok(self.attachment.lock().expect("lock").clone())
            }
            OpenKind::Image | OpenKind::Video | OpenKind::Link => Ok(None),
        }
    }
}

#[derive(Default)]
pub struct MemorySessionStore {
    pub session: Mutex<Option<Session>>,
    pub saves: Mutex<usize>,
}

impl MemorySessionStore {
    pub fn with(session: Session) -> Self {
        Self {
            session: Mutex::new(Some(session)),
            saves: Mutex::new(0),
        }
    }

    pub fn stored_handle(&self) -> Option<String> {
        self.session
            .lock()
            .expect("lock")
            .as_ref()
            .map(|session| session.handle.clone())
    }

    pub fn save_count(&self) -> usize {
        *self.saves.lock().expect("lock")
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<Session>> {
        Ok(self.session.lock().expect("lock").clone())
    }

    fn save(&self, session: &Session) -> Result<()> {
        *self.session.lock().expect("lock") = Some(session.clone());
        *self.saves.lock().expect("lock") += 1;
        Ok(())
    }
}

/// `AppState` wired to a real `CmdExecutor` over fakes
///
/// Every command answers with exactly one message, so `settle` can wait for all of them.
pub struct Harness {
    pub state: AppState,
    pub api: Arc<FakeApi>,
    pub launcher: Arc<FakeLauncher>,
    pub sessions: Arc<MemorySessionStore>,
    executor: CmdExecutor,
    rx: mpsc::UnboundedReceiver<AppMsg>,
}

impl Harness {
    pub fn new(api: FakeApi) -> Self {
        Self::with_credentials(api, None)
    }

    pub fn with_credentials(api: FakeApi, credentials: Option<Credentials>) -> Self {
        let api = Arc::new(api);
        let launcher = Arc::new(FakeLauncher::default());
        let sessions = Arc::new(MemorySessionStore::default());
        let (tx, rx) = mpsc::unbounded_channel();
        let executor = CmdExecutor::new(api.clone(), launcher.clone(), sessions.clone(), tx)
            .with_credentials(credentials);

        Self {
            state: AppState::new(default_bindings()).with_handle("alice.test"),
            api,
            launcher,
            sessions,
            executor,
            rx,
        }
    }

    /// Start up: the first sync tick and its page
    pub async fn start(&mut self) {
        let commands = self.state.init();
        self.settle(commands).await;
    }

    pub async fn send(&mut self, msg: AppMsg) {
        let commands = self.state.update(msg);
        self.settle(commands).await;
    }

    pub async fn press(&mut self, key: KeyEvent) {
        let commands = self.state.handle_key(key, Instant::now());
        self.settle(commands).await;
    }

    pub async fn type_keys(&mut self, keys: &str) {
        for c in keys.chars() {
            self.press(key(c)).await;
        }
    }

    /// Run `commands` and feed back their results until nothing is outstanding
    pub async fn settle(&mut self, commands: Vec<Cmd>) {
        let mut outstanding = commands.len();
        self.executor.execute_commands(commands);
        while outstanding > 0 {
            let msg = time::timeout(Duration::from_secs(5), self.rx.recv())
                .await
                .expect("command result in time")
                .expect("channel open");
            outstanding -= 1;
            let more = self.state.update(msg);
            outstanding += more.len();
            self.executor.execute_commands(more);
        }
    }

    pub fn selected_text(&self) -> Option<String> {
        self.state.selected_post().map(|post| post.text.clone())
    }
}
