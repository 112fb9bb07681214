//! XRPC client for a Bluesky-compatible PDS
//!
//! Only the handful of lexicon methods the client needs are mapped. Wire types stay private to
//! this module; everything crossing the [`Api`] boundary is a domain type.

use std::slice;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{header::CONTENT_TYPE, Client, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::sync::RwLock;

use crate::{
    domain::{
        embed::{EmbedItem, ImageRef, LinkRef, PostEmbed, QuotedRecord, VideoRef},
        notification::{Notification, NotificationReason},
        post::{
            Author, CreatePostRequest, Engagement, Post, PostId, ReplyContext, RepostedBy,
            StrongRef,
        },
        profile::Profile,
        thread::ThreadView,
    },
    infrastructure::api::{
        Api, ApiError, Credentials, Cursor, FeedPage, NotificationPage, ProfilePage, Session,
        ThreadPage,
    },
};

const PAGE_LIMIT: u32 = 50;
const SEARCH_LIMIT: u32 = 10;
/// `app.bsky.feed.getPosts` accepts at most this many URIs per call
const GET_POSTS_LIMIT: usize = 25;

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::InvalidResponse(e.to_string())
        } else {
            ApiError::Network(e.to_string())
        }
    }
}

#[derive(Debug)]
pub struct BskyClient {
    http: Client,
    service: String,
    session: RwLock<Option<Session>>,
}

impl BskyClient {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            service: service.into().trim_end_matches('/').to_string(),
            session: RwLock::new(None),
        }
    }

    fn url(&self, method: &str) -> String {
        format!("{}/xrpc/{method}", self.service)
    }

    async fn did(&self) -> Result<String, ApiError> {
        self.session
            .read()
            .await
            .as_ref()
            .map(|session| session.did.clone())
            .ok_or_else(|| ApiError::Auth(String::from("not logged in")))
    }

    async fn authorized(&self, request: RequestBuilder) -> Result<RequestBuilder, ApiError> {
        let guard = self.session.read().await;
        let session = guard
            .as_ref()
            .ok_or_else(|| ApiError::Auth(String::from("not logged in")))?;
        Ok(request.bearer_auth(session.access_jwt.expose_secret()))
    }

    async fn query<T: DeserializeOwned>(
        &self,
        method: &str,
        params: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let request = self.http.get(self.url(method)).query(params);
        let response = self.authorized(request).await?.send().await?;
        decode(response).await
    }

    async fn procedure<T: DeserializeOwned>(
        &self,
        method: &str,
        body: &Value,
    ) -> Result<T, ApiError> {
        let request = self.http.post(self.url(method)).json(body);
        let response = self.authorized(request).await?.send().await?;
        decode(response).await
    }

    /// A procedure that answers with an empty body
    async fn procedure_without_output(&self, method: &str, body: &Value) -> Result<(), ApiError> {
        let request = self.http.post(self.url(method)).json(body);
        let response = self.authorized(request).await?.send().await?;
        check(response).await.map(|_| ())
    }

    async fn create_record(&self, collection: &str, record: Value) -> Result<StrongRef, ApiError> {
        let body = json!({
            "repo": self.did().await?,
            "collection": collection,
            "record": record,
        });
        let created: CreatedRecord = self
            .procedure("com.atproto.repo.createRecord", &body)
            .await?;
        Ok(StrongRef {
            uri: PostId::new(created.uri),
            cid: created.cid,
        })
    }

    async fn delete_record(&self, record: &str) -> Result<(), ApiError> {
        let id = PostId::new(record);
        let collection = record
            .split('/')
            .rev()
            .nth(1)
            .ok_or_else(|| ApiError::InvalidResponse(format!("malformed record uri {record}")))?;
        let body = json!({
            "repo": self.did().await?,
            "collection": collection,
            "rkey": id.rkey(),
        });
        self.procedure_without_output("com.atproto.repo.deleteRecord", &body)
            .await
    }

    async fn upload_blob(&self, mime: &str, data: Vec<u8>) -> Result<Value, ApiError> {
        let request = self
            .http
            .post(self.url("com.atproto.repo.uploadBlob"))
            .header(CONTENT_TYPE, mime)
            .body(data);
        let response = self.authorized(request).await?.send().await?;
        let uploaded: UploadedBlob = decode(response).await?;
        Ok(uploaded.blob)
    }

    async fn get_posts(&self, uris: &[PostId]) -> Result<Vec<Post>, ApiError> {
        let mut posts = Vec::with_capacity(uris.len());
        for chunk in uris.chunks(GET_POSTS_LIMIT) {
            let params: Vec<_> = chunk
                .iter()
                .map(|uri| ("uris", uri.to_string()))
                .collect();
            let page: PostsOutput = self.query("app.bsky.feed.getPosts", &params).await?;
            posts.extend(page.posts.into_iter().map(PostView::into_post));
        }
        Ok(posts)
    }

    async fn store_session(&self, wire: SessionOutput) -> Session {
        let session = Session {
            did: wire.did,
            handle: wire.handle,
            access_jwt: SecretString::from(wire.access_jwt),
            refresh_jwt: SecretString::from(wire.refresh_jwt),
        };
        *self.session.write().await = Some(session.clone());
        session
    }

    async fn embed_record(&self, embeds: &[EmbedItem]) -> Result<Option<Value>, ApiError> {
        let mut images = Vec::new();
        let mut external = None;
        let mut quote = None;
        for item in embeds {
            match item {
                EmbedItem::Image(image) => {
                    let blob = self.upload_blob(&image.mime, image.data.clone()).await?;
                    images.push(json!({ "image": blob, "alt": "" }));
                }
                EmbedItem::LinkCard { uri } => {
                    external = Some(json!({
                        "$type": "app.bsky.embed.external",
                        "external": { "uri": uri, "title": uri, "description": "" },
                    }));
                }
                EmbedItem::QuotedPost { id, cid } => {
                    quote = Some(json!({ "uri": id.as_str(), "cid": cid }));
                }
            }
        }

        let media = if images.is_empty() {
            external
        } else {
            Some(json!({ "$type": "app.bsky.embed.images", "images": images }))
        };
        Ok(match (quote, media) {
            (Some(record), Some(media)) => Some(json!({
                "$type": "app.bsky.embed.recordWithMedia",
                "record": { "$type": "app.bsky.embed.record", "record": record },
                "media": media,
            })),
            (Some(record), None) => Some(json!({
                "$type": "app.bsky.embed.record",
                "record": record,
            })),
            (None, media) => media,
        })
    }
}

#[async_trait]
impl Api for BskyClient {
    async fn authenticate(&self, credentials: &Credentials) -> Result<Session, ApiError> {
        let body = json!({
            "identifier": credentials.identifier,
            "password": credentials.password.expose_secret(),
        });
        let response = self
            .http
            .post(self.url("com.atproto.server.createSession"))
            .json(&body)
            .send()
            .await?;
        let wire: SessionOutput = decode(response).await?;
        Ok(self.store_session(wire).await)
    }

    async fn resume_session(&self, session: Session) -> Result<Session, ApiError> {
        let response = self
            .http
            .post(self.url("com.atproto.server.refreshSession"))
            .bearer_auth(session.refresh_jwt.expose_secret())
            .send()
            .await?;
        let wire: SessionOutput = decode(response).await?;
        Ok(self.store_session(wire).await)
    }

    async fn fetch_feed_page(&self, cursor: Option<&Cursor>) -> Result<FeedPage, ApiError> {
        let mut params = vec![("limit", PAGE_LIMIT.to_string())];
        if let Some(cursor) = cursor {
            params.push(("cursor", cursor.to_string()));
        }
        let output: FeedOutput = self.query("app.bsky.feed.getTimeline", &params).await?;
        Ok(FeedPage {
            posts: output
                .feed
                .into_iter()
                .map(FeedViewPost::into_post)
                .collect(),
            cursor: output.cursor.map(Cursor::new),
        })
    }

    async fn fetch_thread(&self, root: &PostId) -> Result<ThreadPage, ApiError> {
        let params = [("uri", root.to_string()), ("depth", String::from("10"))];
        let output: ThreadOutput = self.query("app.bsky.feed.getPostThread", &params).await?;
        output.thread.into_page()
    }

    async fn fetch_profile(&self, actor: &str) -> Result<ProfilePage, ApiError> {
        let profile: ProfileViewDetailed = self
            .query("app.bsky.actor.getProfile", &[("actor", actor.to_string())])
            .await?;
        let params = [
            ("actor", actor.to_string()),
            ("limit", PAGE_LIMIT.to_string()),
        ];
        let feed: FeedOutput = self.query("app.bsky.feed.getAuthorFeed", &params).await?;
        Ok(ProfilePage {
            profile: profile.into_profile(),
            posts: feed.feed.into_iter().map(FeedViewPost::into_post).collect(),
            cursor: feed.cursor.map(Cursor::new),
        })
    }

    async fn fetch_notifications(
        &self,
        cursor: Option<&Cursor>,
    ) -> Result<NotificationPage, ApiError> {
        let mut params = vec![("limit", PAGE_LIMIT.to_string())];
        if let Some(cursor) = cursor {
            params.push(("cursor", cursor.to_string()));
        }
        let output: NotificationsOutput = self
            .query("app.bsky.notification.listNotifications", &params)
            .await?;

        let notifications: Vec<_> = output
            .notifications
            .into_iter()
            .filter_map(NotificationView::into_notification)
            .collect();
        let mut targets: Vec<PostId> = notifications
            .iter()
            .filter_map(|n| n.target().cloned())
            .collect();
        targets.sort();
        targets.dedup();

        Ok(NotificationPage {
            subjects: self.get_posts(&targets).await?,
            notifications,
            cursor: output.cursor.map(Cursor::new),
        })
    }

    async fn unread_notifications(&self) -> Result<u32, ApiError> {
        let output: UnreadCountOutput = self
            .query("app.bsky.notification.getUnreadCount", &[])
            .await?;
        Ok(output.count)
    }

    async fn mark_notifications_seen(&self, seen_at: DateTime<Utc>) -> Result<(), ApiError> {
        let body = json!({ "seenAt": seen_at.to_rfc3339() });
        self.procedure_without_output("app.bsky.notification.updateSeen", &body)
            .await
    }

    async fn search_actors(&self, query: &str) -> Result<Vec<Author>, ApiError> {
        let params = [
            ("q", query.to_string()),
            ("limit", SEARCH_LIMIT.to_string()),
        ];
        let output: ActorsOutput = self
            .query("app.bsky.actor.searchActorsTypeahead", &params)
            .await?;
        Ok(output
            .actors
            .into_iter()
            .map(ProfileViewBasic::into_author)
            .collect())
    }

    async fn fetch_likes(&self, post: &PostId) -> Result<Vec<Author>, ApiError> {
        let params = [
            ("uri", post.to_string()),
            ("limit", PAGE_LIMIT.to_string()),
        ];
        let output: LikesOutput = self.query("app.bsky.feed.getLikes", &params).await?;
        Ok(output
            .likes
            .into_iter()
            .map(|like| like.actor.into_author())
            .collect())
    }

    async fn like(&self, post: &StrongRef) -> Result<String, ApiError> {
        let record = json!({
            "$type": "app.bsky.feed.like",
            "subject": { "uri": post.uri.as_str(), "cid": post.cid },
            "createdAt": Utc::now().to_rfc3339(),
        });
        let created = self.create_record("app.bsky.feed.like", record).await?;
        Ok(created.uri.to_string())
    }

    async fn unlike(&self, record: &str) -> Result<(), ApiError> {
        self.delete_record(record).await
    }

    async fn repost(&self, post: &StrongRef) -> Result<String, ApiError> {
        let record = json!({
            "$type": "app.bsky.feed.repost",
            "subject": { "uri": post.uri.as_str(), "cid": post.cid },
            "createdAt": Utc::now().to_rfc3339(),
        });
        let created = self.create_record("app.bsky.feed.repost", record).await?;
        Ok(created.uri.to_string())
    }

    async fn unrepost(&self, record: &str) -> Result<(), ApiError> {
        self.delete_record(record).await
    }

    async fn follow(&self, did: &str) -> Result<String, ApiError> {
        let record = json!({
            "$type": "app.bsky.graph.follow",
            "subject": did,
            "createdAt": Utc::now().to_rfc3339(),
        });
        let created = self.create_record("app.bsky.graph.follow", record).await?;
        Ok(created.uri.to_string())
    }

    async fn create_post(&self, request: &CreatePostRequest) -> Result<Post, ApiError> {
        let mut record = json!({
            "$type": "app.bsky.feed.post",
            "text": request.text,
            "createdAt": Utc::now().to_rfc3339(),
        });
        if !request.langs.is_empty() {
            record["langs"] = json!(request.langs);
        }
        if let Some(reply) = &request.reply {
            record["reply"] = json!({
                "root": { "uri": reply.root.uri.as_str(), "cid": reply.root.cid },
                "parent": { "uri": reply.parent.uri.as_str(), "cid": reply.parent.cid },
            });
        }
        if let Some(embed) = self.embed_record(&request.embeds).await? {
            record["embed"] = embed;
        }

        let created = self.create_record("app.bsky.feed.post", record).await?;
        self.get_posts(slice::from_ref(&created.uri))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::NotFound(created.uri.to_string()))
    }
}

async fn check(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body: XrpcError = response.json().await.unwrap_or_default();
    let message = body.message.unwrap_or_else(|| status.to_string());
    log::debug!("xrpc error {status}: {:?} {message}", body.error);
    Err(match (status, body.error.as_deref()) {
        (StatusCode::TOO_MANY_REQUESTS, _) => ApiError::RateLimited,
        (StatusCode::UNAUTHORIZED, _)
        | (_, Some("ExpiredToken" | "InvalidToken" | "AuthenticationRequired")) => {
            ApiError::Auth(message)
        }
        (StatusCode::NOT_FOUND, _) | (_, Some("NotFound" | "ProfileNotFound")) => {
            ApiError::NotFound(message)
        }
        (status, _) if status.is_server_error() => ApiError::Network(message),
        _ => ApiError::InvalidResponse(message),
    })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    Ok(check(response).await?.json().await?)
}

#[derive(Debug, Default, Deserialize)]
struct XrpcError {
    error: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionOutput {
    did: String,
    handle: String,
    access_jwt: String,
    refresh_jwt: String,
}

#[derive(Debug, Deserialize)]
struct CreatedRecord {
    uri: String,
    cid: String,
}

#[derive(Debug, Deserialize)]
struct UploadedBlob {
    blob: Value,
}

#[derive(Debug, Deserialize)]
struct PostsOutput {
    posts: Vec<PostView>,
}

#[derive(Debug, Deserialize)]
struct FeedOutput {
    feed: Vec<FeedViewPost>,
    cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ThreadOutput {
    thread: ThreadNode,
}

#[derive(Debug, Deserialize)]
struct NotificationsOutput {
    notifications: Vec<NotificationView>,
    cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UnreadCountOutput {
    count: u32,
}

#[derive(Debug, Deserialize)]
struct ActorsOutput {
    actors: Vec<ProfileViewBasic>,
}

#[derive(Debug, Deserialize)]
struct LikeView {
    actor: ProfileViewBasic,
}

#[derive(Debug, Deserialize)]
struct LikesOutput {
    likes: Vec<LikeView>,
}

#[derive(Debug, Deserialize)]
struct Label {
    val: String,
}

#[derive(Debug, Default, Deserialize)]
struct ActorViewer {
    following: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfileViewBasic {
    did: String,
    handle: String,
    display_name: Option<String>,
    #[serde(default)]
    viewer: Option<ActorViewer>,
}

impl ProfileViewBasic {
    fn is_followed(&self) -> bool {
        self.viewer
            .as_ref()
            .is_some_and(|viewer| viewer.following.is_some())
    }

    fn into_author(self) -> Author {
        Author {
            did: self.did,
            handle: self.handle,
            display_name: self.display_name,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfileViewDetailed {
    did: String,
    handle: String,
    display_name: Option<String>,
    description: Option<String>,
    followers_count: Option<u32>,
    follows_count: Option<u32>,
    posts_count: Option<u32>,
    #[serde(default)]
    viewer: Option<ActorViewer>,
    #[serde(default)]
    labels: Vec<Label>,
}

impl ProfileViewDetailed {
    fn into_profile(self) -> Profile {
        Profile {
            did: self.did,
            handle: self.handle,
            display_name: self.display_name,
            description: self.description,
            followers_count: self.followers_count.unwrap_or_default(),
            follows_count: self.follows_count.unwrap_or_default(),
            posts_count: self.posts_count.unwrap_or_default(),
            viewer_following: self.viewer.and_then(|viewer| viewer.following),
            labels: self.labels.into_iter().map(|label| label.val).collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
struct WireRef {
    uri: String,
    cid: String,
}

impl From<WireRef> for StrongRef {
    fn from(wire: WireRef) -> Self {
        StrongRef {
            uri: PostId::new(wire.uri),
            cid: wire.cid,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ReplyRecord {
    root: WireRef,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PostRecord {
    #[serde(default)]
    text: String,
    created_at: DateTime<Utc>,
    reply: Option<ReplyRecord>,
}

#[derive(Debug, Default, Deserialize)]
struct PostViewer {
    like: Option<String>,
    repost: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PostView {
    uri: String,
    cid: String,
    author: ProfileViewBasic,
    record: PostRecord,
    embed: Option<EmbedView>,
    reply_count: Option<u32>,
    repost_count: Option<u32>,
    like_count: Option<u32>,
    quote_count: Option<u32>,
    #[serde(default)]
    viewer: Option<PostViewer>,
    #[serde(default)]
    labels: Vec<Label>,
}

impl PostView {
    fn into_post(self) -> Post {
        let viewer = self.viewer.unwrap_or_default();
        Post {
            id: PostId::new(self.uri),
            cid: self.cid,
            author: self.author.into_author(),
            text: self.record.text,
            embed: self.embed.and_then(EmbedView::into_embed),
            like: Engagement::new(self.like_count.unwrap_or_default(), viewer.like),
            repost: Engagement::new(self.repost_count.unwrap_or_default(), viewer.repost),
            reply_count: self.reply_count.unwrap_or_default(),
            quote_count: self.quote_count.unwrap_or_default(),
            labels: self.labels.into_iter().map(|label| label.val).collect(),
            created_at: self.record.created_at,
            reason: None,
            reply_to: None,
            thread_root: self.record.reply.map(|reply| reply.root.into()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ImageView {
    thumb: String,
    fullsize: String,
    #[serde(default)]
    alt: String,
}

#[derive(Debug, Deserialize)]
struct ExternalView {
    uri: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct RecordValue {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "$type")]
enum RecordView {
    #[serde(rename = "app.bsky.embed.record#viewRecord")]
    Post {
        uri: String,
        author: ProfileViewBasic,
        value: RecordValue,
    },
    #[serde(rename = "app.bsky.embed.record#viewBlocked")]
    Blocked,
    #[serde(other)]
    Missing,
}

impl RecordView {
    fn into_quoted(self) -> QuotedRecord {
        match self {
            RecordView::Post { uri, author, value } => QuotedRecord::Post {
                id: PostId::new(uri),
                author: author.into_author(),
                text: value.text,
            },
            RecordView::Blocked => QuotedRecord::Blocked,
            RecordView::Missing => QuotedRecord::NotFound,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RecordWrapper {
    record: RecordView,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "$type")]
enum EmbedView {
    #[serde(rename = "app.bsky.embed.images#view")]
    Images { images: Vec<ImageView> },
    #[serde(rename = "app.bsky.embed.video#view")]
    Video { playlist: String, alt: Option<String> },
    #[serde(rename = "app.bsky.embed.external#view")]
    External { external: ExternalView },
    #[serde(rename = "app.bsky.embed.record#view")]
    Record { record: RecordView },
    #[serde(rename = "app.bsky.embed.recordWithMedia#view")]
    RecordWithMedia {
        record: RecordWrapper,
        media: Box<EmbedView>,
    },
    #[serde(other)]
    Unknown,
}

impl EmbedView {
    fn into_embed(self) -> Option<PostEmbed> {
        Some(match self {
            EmbedView::Images { images } => PostEmbed::Images(
                images
                    .into_iter()
                    .map(|image| ImageRef {
                        thumb: image.thumb,
                        fullsize: image.fullsize,
                        alt: image.alt,
                    })
                    .collect(),
            ),
            EmbedView::Video { playlist, alt } => PostEmbed::Video(VideoRef { playlist, alt }),
            EmbedView::External { external } => PostEmbed::External(LinkRef {
                uri: external.uri,
                title: external.title,
                description: external.description,
            }),
            EmbedView::Record { record } => PostEmbed::Record(record.into_quoted()),
            EmbedView::RecordWithMedia { record, media } => PostEmbed::RecordWithMedia(
                record.record.into_quoted(),
                Box::new(media.into_embed()?),
            ),
            EmbedView::Unknown => return None,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "$type")]
enum ParentView {
    #[serde(rename = "app.bsky.feed.defs#postView")]
    Post(Box<PostView>),
    #[serde(rename = "app.bsky.feed.defs#blockedPost")]
    Blocked,
    #[serde(other)]
    NotFound,
}

#[derive(Debug, Deserialize)]
struct ReplyView {
    parent: ParentView,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "$type")]
enum ReasonView {
    #[serde(rename = "app.bsky.feed.defs#reasonRepost")]
    Repost {
        by: ProfileViewBasic,
        #[serde(rename = "indexedAt")]
        indexed_at: DateTime<Utc>,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct FeedViewPost {
    post: PostView,
    reply: Option<ReplyView>,
    reason: Option<ReasonView>,
}

impl FeedViewPost {
    fn into_post(self) -> Post {
        let mut post = self.post.into_post();
        post.reply_to = self.reply.map(|reply| match reply.parent {
            ParentView::Post(parent) => ReplyContext::Parent {
                following: parent.author.is_followed(),
                author: parent.author.into_author(),
            },
            ParentView::Blocked => ReplyContext::BlockedUser,
            ParentView::NotFound => ReplyContext::DeletedPost,
        });
        post.reason = match self.reason {
            Some(ReasonView::Repost { by, indexed_at }) => Some(RepostedBy {
                author: by.into_author(),
                at: indexed_at,
            }),
            _ => None,
        };
        post
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "$type")]
enum ThreadNode {
    #[serde(rename = "app.bsky.feed.defs#threadViewPost")]
    Post {
        post: PostView,
        parent: Option<Box<ThreadNode>>,
        #[serde(default)]
        replies: Vec<ThreadNode>,
    },
    #[serde(other)]
    Missing,
}

impl ThreadNode {
    fn into_page(self) -> Result<ThreadPage, ApiError> {
        let ThreadNode::Post {
            post,
            parent,
            replies,
        } = self
        else {
            return Err(ApiError::NotFound(String::from("thread root")));
        };

        let root = post.into_post();
        let mut view = ThreadView::new(root.id.clone());
        let mut posts = vec![root];

        let mut next = parent;
        while let Some(node) = next {
            match *node {
                ThreadNode::Post { post, parent, .. } => {
                    let post = post.into_post();
                    view.parents.push(post.id.clone());
                    posts.push(post);
                    next = parent;
                }
                ThreadNode::Missing => break,
            }
        }
        view.parents.reverse();

        let mut stack: Vec<ThreadNode> = replies.into_iter().rev().collect();
        while let Some(node) = stack.pop() {
            if let ThreadNode::Post { post, replies, .. } = node {
                let post = post.into_post();
                view.replies.push(post.id.clone());
                posts.push(post);
                stack.extend(replies.into_iter().rev());
            }
        }

        Ok(ThreadPage { view, posts })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NotificationView {
    uri: String,
    author: ProfileViewBasic,
    reason: String,
    reason_subject: Option<String>,
    is_read: bool,
    indexed_at: DateTime<Utc>,
}

impl NotificationView {
    /// Reasons the client does not know about are skipped
    fn into_notification(self) -> Option<Notification> {
        let reason: NotificationReason = self.reason.parse().ok()?;
        Some(Notification {
            id: PostId::new(self.uri),
            reason,
            author: self.author.into_author(),
            subject: self.reason_subject.map(PostId::new),
            indexed_at: self.indexed_at,
            is_read: self.is_read,
        })
    }
}
