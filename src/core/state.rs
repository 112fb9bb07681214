//! Application state and its update logic
//!
//! `AppState` is the single owner of the post store, the navigation stack (and with it every
//! selection cursor and draft) and the feed synchronizer. All mutations go through
//! [`AppState::update`], which answers with the side effects to run.

use std::{collections::HashSet, time::Instant};

use chrono::Utc;
use crossterm::event::KeyEvent;

use crate::{
    core::{
        cmd::Cmd,
        message::{ApiMsg, AppMsg, FeedMsg, SystemMsg},
        translator,
    },
    domain::{
        embed::{ImageAttachment, OpenKind},
        post::{Author, Post, PostId, ViewerMutation},
        thread::ThreadView,
    },
    infrastructure::api::{
        ApiError, ErrorKind, FeedPage, NotificationPage, ProfilePage, ThreadPage,
    },
    model::{
        actor_search::{self, ActorSearch},
        composer::{self, Composer, Outcome},
        feed_sync::{self, FeedSync, Request, SyncState},
        key_sequence::KeySequence,
        navigation::{
            FrameId, FrameKind, FrameStatus, NavigationStack, Popped, ProfileContent, ViewFrame,
        },
        post_store::PostStore,
        selection,
        status_bar::{self, StatusBar},
        timeline::MergeResult,
    },
    presentation::config::keybindings::KeyBindings,
};

const WEB_URL: &str = "https://bsky.app";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Toggle {
    Like,
    Repost,
}

#[derive(Debug)]
pub struct AppState {
    pub store: PostStore,
    pub nav: NavigationStack,
    pub sync: FeedSync,
    pub status_bar: StatusBar,
    pub pending_keys: KeySequence,
    pub bindings: KeyBindings,
    /// Handle of the signed-in account
    pub handle: Option<String>,
    pub should_quit: bool,
    /// Unread count from the last notification poll
    pub unread_notifications: u32,
    reauthenticating: bool,
    polling_notifications: bool,
    in_flight: HashSet<(PostId, Toggle)>,
}

impl AppState {
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            store: PostStore::new(),
            nav: NavigationStack::new(),
            sync: FeedSync::default(),
            status_bar: StatusBar::default(),
            pending_keys: KeySequence::default(),
            bindings,
            handle: None,
            should_quit: false,
            unread_notifications: 0,
            reauthenticating: false,
            polling_notifications: false,
            in_flight: HashSet::new(),
        }
    }

    pub fn with_handle(mut self, handle: impl Into<String>) -> Self {
        self.handle = Some(handle.into());
        self
    }

    /// Commands to run right after start-up: the first feed page
    pub fn init(&mut self) -> Vec<Cmd> {
        self.handle_system_msg(SystemMsg::Tick)
    }

    pub fn update(&mut self, msg: AppMsg) -> Vec<Cmd> {
        log::debug!("update: {msg:?}");

        match msg {
            AppMsg::System(system_msg) => self.handle_system_msg(system_msg),
            AppMsg::Key(key) => self.handle_key(key, Instant::now()),
            AppMsg::Feed(feed_msg) => self.handle_feed_msg(feed_msg),
            AppMsg::Composer(composer_msg) => self.handle_composer_msg(composer_msg),
            AppMsg::Search(search_msg) => self.handle_search_msg(search_msg),
            AppMsg::Api(api_msg) => self.handle_api_msg(api_msg),
        }
    }

    /// Translate a key against the top frame and apply the result
    pub fn handle_key(&mut self, key: KeyEvent, at: Instant) -> Vec<Cmd> {
        match translator::translate_key(
            key,
            at,
            self.nav.top(),
            &mut self.pending_keys,
            &self.bindings,
        ) {
            Some(msg) => self.update(msg),
            None => vec![],
        }
    }

    /// Number of rows a frame lists
    pub fn frame_len(&self, frame: &ViewFrame) -> usize {
        frame_len(&self.store, frame)
    }

    /// Post under the top frame's cursor
    pub fn selected_post(&self) -> Option<&Post> {
        let frame = self.nav.top();
        let index = frame.selection.selected_index()?;
        let id = match &frame.kind {
            FrameKind::Feed => self.store.feed().get(index)?,
            FrameKind::Thread { view, .. } => view.as_ref()?.get(index)?,
            FrameKind::Profile { content, .. } => content.as_ref()?.posts.get(index)?,
            FrameKind::Notifications => self.store.notification_at(index)?.target()?,
            FrameKind::Composer(_) | FrameKind::Search(_) | FrameKind::Likes { .. } => {
                return None
            }
        };
        self.store.post(id)
    }

    fn selected_author(&self) -> Option<Author> {
        let frame = self.nav.top();
        if let FrameKind::Notifications = frame.kind {
            let index = frame.selection.selected_index()?;
            return self
                .store
                .notification_at(index)
                .map(|notification| notification.author.clone());
        }
        if let Some(actors) = frame.actors() {
            return actors.get(frame.selection.selected_index()?).cloned();
        }
        self.selected_post().map(|post| post.author.clone())
    }

    fn info(&mut self, label: &str, message: impl Into<String>) {
        self.status_bar.update(status_bar::Message::InfoPosted {
            label: label.to_string(),
            message: message.into(),
        });
    }

    fn error(&mut self, label: &str, message: impl Into<String>) {
        let message = message.into();
        log::warn!("{label}: {message}");
        self.status_bar.update(status_bar::Message::ErrorPosted {
            label: label.to_string(),
            message,
        });
    }

    /// Handle system messages
    fn handle_system_msg(&mut self, msg: SystemMsg) -> Vec<Cmd> {
        match msg {
            SystemMsg::Quit => {
                log::info!("Quit requested");
                self.should_quit = true;
                vec![]
            }
            SystemMsg::Tick => match self.sync.update(feed_sync::Message::Ticked) {
                Some(Request::Head) => vec![Cmd::FetchFeedHead],
                Some(Request::Older(cursor)) => vec![Cmd::FetchFeedOlder { cursor }],
                None => vec![],
            },
            SystemMsg::PollNotifications => self.poll_notifications(),
            SystemMsg::Resize(width, height) => {
                log::debug!("Terminal resized to {width}x{height}");
                vec![]
            }
            SystemMsg::Paste(text) => {
                if self.nav.top().composer().is_some() {
                    self.handle_composer_msg(composer::Message::Pasted(text))
                } else {
                    vec![]
                }
            }
            SystemMsg::ShowError(error) => {
                self.error("System", error);
                vec![]
            }
        }
    }

    /// Handle intents on the top frame
    fn handle_feed_msg(&mut self, msg: FeedMsg) -> Vec<Cmd> {
        if self.nav.top().composer().is_some() {
            return vec![];
        }

        let len = self.frame_len(self.nav.top());
        let on_feed = matches!(self.nav.top().kind, FrameKind::Feed);
        let lists_actors = self.nav.top().actors().is_some();

        match msg {
            FeedMsg::Back => match self.nav.pop() {
                Popped::Frame(frame) => {
                    log::debug!("popped {} frame {}", frame.kind.title(), frame.id);
                    vec![]
                }
                Popped::Rejected => self.handle_system_msg(SystemMsg::Quit),
            },
            FeedMsg::ScrollUp => {
                self.select(selection::Message::PreviousItemSelected);
                vec![]
            }
            FeedMsg::ScrollDown => {
                let at_end = self
                    .nav
                    .top()
                    .selection
                    .selected_index()
                    .is_some_and(|index| index + 1 >= len);
                self.select(selection::Message::NextItemSelected { len });
                if on_feed && (at_end || len == 0) {
                    self.request_older()
                } else {
                    vec![]
                }
            }
            FeedMsg::ScrollToTop => {
                self.select(selection::Message::FirstItemSelected { len });
                vec![]
            }
            FeedMsg::ScrollToBottom => {
                self.select(selection::Message::LastItemSelected { len });
                if on_feed {
                    self.request_older()
                } else {
                    vec![]
                }
            }
            FeedMsg::OpenThread if lists_actors => self.open_profile(),
            FeedMsg::OpenThread => self.open_thread(),
            FeedMsg::OpenProfile => self.open_profile(),
            FeedMsg::OpenNotifications => self.open_notifications(),
            FeedMsg::OpenSearch => {
                if !matches!(self.nav.top().kind, FrameKind::Search(_)) {
                    self.nav.push(FrameKind::Search(ActorSearch::new()));
                }
                vec![]
            }
            FeedMsg::OpenLikes => self.open_likes(),
            FeedMsg::OpenMedia => self.open_media(),
            FeedMsg::OpenLink => {
                let link = self.selected_post().and_then(|post| {
                    post.embed
                        .as_ref()
                        .and_then(|embed| {
                            embed
                                .open_targets()
                                .into_iter()
                                .find(|(kind, _)| *kind == OpenKind::Link)
                                .map(|(_, uri)| uri)
                        })
                        .or_else(|| post.first_link())
                });
                match link {
                    Some(uri) => vec![Cmd::Open {
                        kind: OpenKind::Link,
                        payload: uri,
                        frame: None,
                    }],
                    None => {
                        self.info("Open", "No link in this post");
                        vec![]
                    }
                }
            }
            FeedMsg::OpenInBrowser => {
                let url = self.selected_post().and_then(|post| {
                    let did = post.id.author_did()?;
                    Some(format!("{WEB_URL}/profile/{did}/post/{}", post.id.rkey()))
                });
                url.map(|url| Cmd::Open {
                    kind: OpenKind::Link,
                    payload: url,
                    frame: None,
                })
                .into_iter()
                .collect()
            }
            FeedMsg::NewPost => {
                self.nav
                    .push(FrameKind::Composer(Box::new(Composer::new())));
                vec![]
            }
            FeedMsg::Reply => {
                if let Some(reply) = self.selected_post().map(Post::reply_ref) {
                    self.nav
                        .push(FrameKind::Composer(Box::new(Composer::reply(reply))));
                }
                vec![]
            }
            FeedMsg::Quote => {
                if let Some((id, cid)) = self
                    .selected_post()
                    .map(|post| (post.id.clone(), post.cid.clone()))
                {
                    self.nav
                        .push(FrameKind::Composer(Box::new(Composer::quote(id, cid))));
                }
                vec![]
            }
            FeedMsg::ToggleLike => self.toggle(Toggle::Like),
            FeedMsg::ToggleRepost => self.toggle(Toggle::Repost),
            FeedMsg::Follow => self.follow(),
        }
    }

    fn select(&mut self, msg: selection::Message) {
        self.nav.top_mut().selection.update(msg);
    }

    fn request_older(&mut self) -> Vec<Cmd> {
        match self.sync.update(feed_sync::Message::OlderRequested) {
            Some(Request::Older(cursor)) => {
                self.info("Feed", "Loading older posts...");
                vec![Cmd::FetchFeedOlder { cursor }]
            }
            _ => vec![],
        }
    }

    fn open_thread(&mut self) -> Vec<Cmd> {
        let Some(root) = self.selected_post().map(|post| post.id.clone()) else {
            if let FrameKind::Notifications = self.nav.top().kind {
                self.info("Thread", "Nothing to open for this notification");
            }
            return vec![];
        };
        if let FrameKind::Thread { root: current, .. } = &self.nav.top().kind {
            if *current == root {
                return vec![];
            }
        }
        // The root must be resolvable before a thread frame may exist
        if !self.store.contains(&root) {
            self.error("Thread", format!("{root} is not loaded"));
            return vec![];
        }

        let frame = self.nav.push(FrameKind::Thread {
            root: root.clone(),
            view: None,
        });
        vec![Cmd::FetchThread { frame, root }]
    }

    fn open_profile(&mut self) -> Vec<Cmd> {
        let Some(author) = self.selected_author() else {
            return vec![];
        };
        if let FrameKind::Profile { actor, .. } = &self.nav.top().kind {
            if *actor == author.did {
                return vec![];
            }
        }

        let frame = self.nav.push(FrameKind::Profile {
            actor: author.did.clone(),
            content: None,
        });
        vec![Cmd::FetchProfile {
            frame,
            actor: author.did,
        }]
    }

    fn open_notifications(&mut self) -> Vec<Cmd> {
        if let FrameKind::Notifications = self.nav.top().kind {
            return vec![];
        }
        let frame = self.nav.push(FrameKind::Notifications);
        let len = self.store.notifications().len();
        if let Some(top) = self.nav.get_mut(frame) {
            top.status = FrameStatus::Loading;
            top.selection
                .update(selection::Message::FirstItemSelected { len });
        }
        vec![Cmd::FetchNotifications { frame }]
    }

    fn open_likes(&mut self) -> Vec<Cmd> {
        let Some(post) = self.selected_post().map(|post| post.id.clone()) else {
            return vec![];
        };
        let frame = self.nav.push(FrameKind::Likes {
            post: post.clone(),
            likers: None,
        });
        vec![Cmd::FetchLikes { frame, post }]
    }

    /// Refresh an open notifications frame, or just the unread count
    fn poll_notifications(&mut self) -> Vec<Cmd> {
        if self.polling_notifications || self.sync.is_halted() {
            return vec![];
        }
        let open = self
            .nav
            .iter()
            .find(|frame| matches!(frame.kind, FrameKind::Notifications))
            .map(|frame| (frame.id, frame.status == FrameStatus::Loading));
        let cmd = match open {
            Some((_, true)) => return vec![],
            Some((frame, false)) => Cmd::FetchNotifications { frame },
            None => Cmd::FetchUnreadCount,
        };
        self.polling_notifications = true;
        vec![cmd]
    }

    fn open_media(&mut self) -> Vec<Cmd> {
        let targets: Vec<_> = self
            .selected_post()
            .and_then(|post| post.embed.as_ref())
            .map(|embed| {
                embed
                    .open_targets()
                    .into_iter()
                    .filter(|(kind, _)| matches!(kind, OpenKind::Image | OpenKind::Video))
                    .collect()
            })
            .unwrap_or_default();
        if targets.is_empty() {
            self.info("Open", "No media in this post");
        }
        targets
            .into_iter()
            .map(|(kind, payload)| Cmd::Open {
                kind,
                payload,
                frame: None,
            })
            .collect()
    }

    fn toggle(&mut self, toggle: Toggle) -> Vec<Cmd> {
        let Some(post) = self.selected_post() else {
            return vec![];
        };
        let engagement = match toggle {
            Toggle::Like => &post.like,
            Toggle::Repost => &post.repost,
        };
        let id = post.id.clone();
        let cmd = match (toggle, engagement.viewer.clone()) {
            (Toggle::Like, Some(record)) => Cmd::Unlike {
                post: id.clone(),
                record,
            },
            (Toggle::Like, None) => Cmd::Like {
                post: post.strong_ref(),
            },
            (Toggle::Repost, Some(record)) => Cmd::Unrepost {
                post: id.clone(),
                record,
            },
            (Toggle::Repost, None) => Cmd::Repost {
                post: post.strong_ref(),
            },
        };
        // One request per post and kind until the first one reports back
        if !self.in_flight.insert((id, toggle)) {
            return vec![];
        }
        vec![cmd]
    }

    fn follow(&mut self) -> Vec<Cmd> {
        let already_following = match &self.nav.top().kind {
            FrameKind::Profile {
                content: Some(content),
                ..
            } if content.profile.is_followed() => Some(content.profile.handle.clone()),
            _ => None,
        };
        if let Some(handle) = already_following {
            self.info("Follow", format!("Already following @{handle}"));
            return vec![];
        }

        let did = match &self.nav.top().kind {
            FrameKind::Profile { actor, .. } => Some(actor.clone()),
            _ => self.selected_author().map(|author| author.did),
        };
        did.map(|did| Cmd::Follow { did }).into_iter().collect()
    }

    /// Handle input for the composer on top of the stack
    fn handle_composer_msg(&mut self, msg: composer::Message) -> Vec<Cmd> {
        let top = self.nav.top_mut();
        let frame = top.id;
        let Some(composer) = top.composer_mut() else {
            log::debug!("composer message without a composer frame: {msg:?}");
            return vec![];
        };

        match composer.update(msg) {
            Outcome::None => vec![],
            Outcome::Close => {
                self.nav.pop();
                vec![]
            }
            Outcome::Submit(request) => vec![Cmd::CreatePost { frame, request }],
            Outcome::Open(kind) => vec![Cmd::Open {
                kind,
                payload: String::new(),
                frame: Some(frame),
            }],
        }
    }

    /// Handle query edits on the search frame on top of the stack
    fn handle_search_msg(&mut self, msg: actor_search::Message) -> Vec<Cmd> {
        let top = self.nav.top_mut();
        let frame = top.id;
        let FrameKind::Search(search) = &mut top.kind else {
            log::debug!("search message without a search frame: {msg:?}");
            return vec![];
        };
        // Erasing past the start leaves the search
        if msg == actor_search::Message::Erased && search.query().is_empty() {
            return self.handle_feed_msg(FeedMsg::Back);
        }

        match search.update(msg) {
            Some(query) => vec![Cmd::SearchActors { frame, query }],
            None => {
                let len = search.results().len();
                top.selection
                    .update(selection::Message::LengthChanged { len });
                vec![]
            }
        }
    }

    /// Handle results of spawned commands
    fn handle_api_msg(&mut self, msg: ApiMsg) -> Vec<Cmd> {
        match msg {
            ApiMsg::FeedHeadLoaded(Ok(page)) => self.on_feed_head(page),
            ApiMsg::FeedHeadLoaded(Err(e)) => {
                self.sync.update(feed_sync::Message::HeadFailed(e.kind()));
                self.on_sync_error("Sync", &e)
            }
            ApiMsg::FeedOlderLoaded(Ok(page)) => {
                let next_cursor = page.cursor.clone();
                let exhausted = next_cursor.is_none();
                self.merge_feed(page);
                self.sync
                    .update(feed_sync::Message::OlderReceived { next_cursor });
                if exhausted {
                    self.info("Feed", "No older posts");
                } else {
                    self.status_bar.update(status_bar::Message::Cleared);
                }
                vec![]
            }
            ApiMsg::FeedOlderLoaded(Err(e)) => {
                self.sync.update(feed_sync::Message::OlderFailed(e.kind()));
                self.on_sync_error("Feed", &e)
            }
            ApiMsg::ThreadLoaded { frame, result } => {
                self.on_thread(frame, result);
                vec![]
            }
            ApiMsg::ProfileLoaded { frame, result } => {
                self.on_profile(frame, result);
                vec![]
            }
            ApiMsg::NotificationsLoaded { frame, result } => {
                self.polling_notifications = false;
                self.on_notifications(frame, result)
            }
            ApiMsg::UnreadCountLoaded(result) => {
                self.polling_notifications = false;
                match result {
                    Ok(count) => self.unread_notifications = count,
                    Err(e) => log::warn!("unread count: {e}"),
                }
                vec![]
            }
            ApiMsg::NotificationsSeen(Ok(())) => {
                self.store.mark_notifications_read();
                self.unread_notifications = 0;
                vec![]
            }
            ApiMsg::NotificationsSeen(Err(e)) => {
                self.error("Notifications", format!("Could not mark as seen: {e}"));
                vec![]
            }
            ApiMsg::ActorsFound {
                frame,
                query,
                result,
            } => {
                self.on_actors_found(frame, query, result);
                vec![]
            }
            ApiMsg::LikesLoaded { frame, result } => {
                self.on_likes(frame, result);
                vec![]
            }
            ApiMsg::ViewerStateChanged { post, result } => {
                self.on_viewer_state(post, result);
                vec![]
            }
            ApiMsg::Followed { did, result } => {
                self.on_followed(did, result);
                vec![]
            }
            ApiMsg::PostCreated { frame, result } => {
                self.on_post_created(frame, result);
                vec![]
            }
            ApiMsg::Opened {
                kind,
                frame,
                result,
            } => {
                self.on_opened(kind, frame, result);
                vec![]
            }
            ApiMsg::Reauthenticated(Ok(session)) => {
                self.reauthenticating = false;
                self.sync.update(feed_sync::Message::Reauthenticated);
                self.info("Session", format!("Signed in again as @{}", session.handle));
                self.handle = Some(session.handle.clone());
                vec![Cmd::SaveSession(session)]
            }
            ApiMsg::Reauthenticated(Err(e)) => {
                self.reauthenticating = false;
                self.error("Session", format!("Sign-in failed: {e}"));
                vec![]
            }
            ApiMsg::SessionSaved(Ok(())) => vec![],
            ApiMsg::SessionSaved(Err(e)) => {
                self.error("Session", format!("Could not save session: {e}"));
                vec![]
            }
        }
    }

    fn on_feed_head(&mut self, page: FeedPage) -> Vec<Cmd> {
        self.sync.update(feed_sync::Message::HeadReceived);
        if *self.sync.state() != SyncState::Merging {
            log::debug!("discarding feed page received in state {:?}", self.sync.state());
            return vec![];
        }

        let was_empty = self.store.feed_len() == 0;
        let next_cursor = page.cursor.clone();
        self.merge_feed(page);
        self.sync.update(feed_sync::Message::Merged {
            next_cursor,
            was_empty,
        });
        vec![]
    }

    fn on_sync_error(&mut self, label: &str, e: &ApiError) -> Vec<Cmd> {
        self.error(label, e.to_string());
        if e.kind() == ErrorKind::Auth && self.sync.is_halted() && !self.reauthenticating {
            self.reauthenticating = true;
            return vec![Cmd::Reauthenticate];
        }
        vec![]
    }

    /// Merge a page into the feed and shift every feed cursor accordingly
    fn merge_feed(&mut self, page: FeedPage) {
        let posts: Vec<Post> = page
            .posts
            .into_iter()
            .filter(|post| !post.is_hidden_reply())
            .collect();
        let result = self.store.merge(posts);
        self.publish_merge(&result, |kind| matches!(kind, FrameKind::Feed));
    }

    fn publish_merge(&mut self, result: &MergeResult, applies: impl Fn(&FrameKind) -> bool) {
        if result.is_empty() {
            return;
        }
        for frame in self.nav.iter_mut().filter(|frame| applies(&frame.kind)) {
            frame
                .selection
                .update(selection::Message::ItemsMerged(result.clone()));
        }
    }

    fn on_thread(&mut self, frame: FrameId, result: Result<ThreadPage, ApiError>) {
        if !self.nav.contains(frame) {
            log::debug!("discarding thread for closed frame {frame}");
            return;
        }
        match result {
            Ok(page) => {
                self.store.upsert(page.posts);
                let view: ThreadView = page.view;
                if let Some(target) = self.nav.get_mut(frame) {
                    let index = view.root_index();
                    let len = view.len();
                    if let FrameKind::Thread { view: slot, .. } = &mut target.kind {
                        *slot = Some(view);
                    }
                    target.status = FrameStatus::Ready;
                    target
                        .selection
                        .update(selection::Message::ItemSelected { index, len });
                }
            }
            Err(e) => self.fail_frame(frame, "Thread", &e),
        }
    }

    fn on_profile(&mut self, frame: FrameId, result: Result<ProfilePage, ApiError>) {
        if !self.nav.contains(frame) {
            log::debug!("discarding profile for closed frame {frame}");
            return;
        }
        match result {
            Ok(ProfilePage { profile, posts, .. }) => {
                let ids: Vec<PostId> = posts.iter().map(|post| post.id.clone()).collect();
                self.store.upsert(posts);
                if let Some(target) = self.nav.get_mut(frame) {
                    let len = ids.len();
                    if let FrameKind::Profile { content, .. } = &mut target.kind {
                        *content = Some(ProfileContent {
                            profile,
                            posts: ids,
                        });
                    }
                    target.status = FrameStatus::Ready;
                    target
                        .selection
                        .update(selection::Message::LengthChanged { len });
                }
            }
            Err(e) => self.fail_frame(frame, "Profile", &e),
        }
    }

    fn on_notifications(
        &mut self,
        frame: FrameId,
        result: Result<NotificationPage, ApiError>,
    ) -> Vec<Cmd> {
        if !self.nav.contains(frame) {
            log::debug!("discarding notifications for closed frame {frame}");
            return vec![];
        }
        match result {
            Ok(page) => {
                self.store.upsert(page.subjects);
                let result = self.store.merge_notifications(page.notifications);
                self.publish_merge(&result, |kind| matches!(kind, FrameKind::Notifications));
                let len = self.store.notifications().len();
                if let Some(target) = self.nav.get_mut(frame) {
                    target.status = FrameStatus::Ready;
                    target
                        .selection
                        .update(selection::Message::LengthChanged { len });
                }
                let unread = self.store.unread_notifications();
                self.unread_notifications = u32::try_from(unread).unwrap_or(u32::MAX);
                // The list is on screen, so everything in it has been seen
                if unread > 0 {
                    return vec![Cmd::MarkNotificationsSeen { seen_at: Utc::now() }];
                }
                vec![]
            }
            Err(e) => {
                self.fail_frame(frame, "Notifications", &e);
                vec![]
            }
        }
    }

    fn on_actors_found(
        &mut self,
        frame: FrameId,
        query: String,
        result: Result<Vec<Author>, ApiError>,
    ) {
        let Some(target) = self.nav.get_mut(frame) else {
            log::debug!("discarding search results for closed frame {frame}");
            return;
        };
        match result {
            Ok(actors) => {
                if let FrameKind::Search(search) = &mut target.kind {
                    search.update(actor_search::Message::ResultsLoaded { query, actors });
                    let len = search.results().len();
                    target
                        .selection
                        .update(selection::Message::LengthChanged { len });
                }
            }
            Err(e) => self.error("Search", e.to_string()),
        }
    }

    fn on_likes(&mut self, frame: FrameId, result: Result<Vec<Author>, ApiError>) {
        if !self.nav.contains(frame) {
            log::debug!("discarding likes for closed frame {frame}");
            return;
        }
        match result {
            Ok(actors) => {
                if let Some(target) = self.nav.get_mut(frame) {
                    let len = actors.len();
                    if let FrameKind::Likes { likers, .. } = &mut target.kind {
                        *likers = Some(actors);
                    }
                    target.status = FrameStatus::Ready;
                    target
                        .selection
                        .update(selection::Message::LengthChanged { len });
                }
            }
            Err(e) => self.fail_frame(frame, "Likes", &e),
        }
    }

    /// Record a failed load on its own frame only
    fn fail_frame(&mut self, frame: FrameId, label: &str, e: &ApiError) {
        if let Some(target) = self.nav.get_mut(frame) {
            target.status = FrameStatus::Failed(e.to_string());
        }
        self.error(label, e.to_string());
    }

    fn on_viewer_state(&mut self, post: PostId, result: Result<ViewerMutation, ApiError>) {
        let toggle = match &result {
            Ok(ViewerMutation::Liked { .. } | ViewerMutation::Unliked) => Some(Toggle::Like),
            Ok(ViewerMutation::Reposted { .. } | ViewerMutation::Unreposted) => {
                Some(Toggle::Repost)
            }
            Err(_) => None,
        };
        match toggle {
            Some(toggle) => {
                self.in_flight.remove(&(post.clone(), toggle));
            }
            None => self.in_flight.retain(|(id, _)| *id != post),
        }

        match result {
            Ok(mutation) => {
                let message = match &mutation {
                    ViewerMutation::Liked { .. } => "Liked",
                    ViewerMutation::Unliked => "Unliked",
                    ViewerMutation::Reposted { .. } => "Reposted",
                    ViewerMutation::Unreposted => "Removed repost",
                };
                self.store.patch_viewer_state(&post, mutation);
                self.info("Engagement", message);
            }
            Err(e) => self.error("Engagement", e.to_string()),
        }
    }

    fn on_followed(&mut self, did: String, result: Result<String, ApiError>) {
        match result {
            Ok(record) => {
                let mut handle = None;
                for frame in self.nav.iter_mut() {
                    if let FrameKind::Profile {
                        content: Some(content),
                        ..
                    } = &mut frame.kind
                    {
                        if content.profile.did == did {
                            content.profile.viewer_following = Some(record.clone());
                            content.profile.followers_count += 1;
                            handle = Some(content.profile.handle.clone());
                        }
                    }
                }
                let name = handle.unwrap_or(did);
                self.info("Follow", format!("Followed {name}"));
            }
            Err(e) => self.error("Follow", e.to_string()),
        }
    }

    fn on_post_created(&mut self, frame: FrameId, result: Result<Post, ApiError>) {
        match result {
            Ok(post) => {
                self.nav.remove(frame);
                let result = self.store.merge(vec![post]);
                self.publish_merge(&result, |kind| matches!(kind, FrameKind::Feed));
                self.info("Post", "Posted");
            }
            Err(e) => {
                let message = e.to_string();
                match self.nav.get_mut(frame).and_then(ViewFrame::composer_mut) {
                    Some(composer) => {
                        composer.update(composer::Message::SubmitFailed(message.clone()));
                    }
                    None => log::debug!("post failed for closed composer {frame}"),
                }
                self.error("Post", message);
            }
        }
    }

    fn on_opened(
        &mut self,
        kind: OpenKind,
        frame: Option<FrameId>,
        result: Result<Option<ImageAttachment>, String>,
    ) {
        let Some(composer) = frame
            .and_then(|id| self.nav.get_mut(id))
            .and_then(ViewFrame::composer_mut)
        else {
            if let Err(e) = result {
                self.error("Open", format!("{kind}: {e}"));
            }
            return;
        };
        match result {
            Ok(Some(attachment)) => {
                composer.update(composer::Message::AttachmentLoaded(attachment));
            }
            Ok(None) => {
                composer.update(composer::Message::PickerClosed);
                self.info("Attach", format!("{kind}: nothing picked"));
            }
            Err(e) => {
                composer.update(composer::Message::AttachmentFailed(e));
            }
        }
    }
}

fn frame_len(store: &PostStore, frame: &ViewFrame) -> usize {
    match &frame.kind {
        FrameKind::Feed => store.feed_len(),
        FrameKind::Notifications => store.notifications().len(),
        FrameKind::Thread { view, .. } => view.as_ref().map_or(0, ThreadView::len),
        FrameKind::Profile { content, .. } => content.as_ref().map_or(0, |c| c.posts.len()),
        FrameKind::Search(_) | FrameKind::Likes { .. } => frame.actors().map_or(0, <[_]>::len),
        FrameKind::Composer(_) => 0,
    }
}
