//! Boundary to the social network service
//!
//! Everything the client asks of the network goes through the [`Api`] trait so that the
//! coordinator can be driven by a fake in tests.

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

use crate::domain::{
    notification::Notification,
    post::{Author, CreatePostRequest, Post, PostId, StrongRef},
    profile::Profile,
    thread::ThreadView,
};

/// Opaque pagination token handed out by the server
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cursor(String);

impl Cursor {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone)]
pub struct Credentials {
    pub identifier: String,
    pub password: SecretString,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub did: String,
    pub handle: String,
    #[serde(serialize_with = "expose")]
    pub access_jwt: SecretString,
    #[serde(serialize_with = "expose")]
    pub refresh_jwt: SecretString,
}

fn expose<S: Serializer>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

#[derive(Debug, Clone, Default)]
pub struct FeedPage {
    pub posts: Vec<Post>,
    pub cursor: Option<Cursor>,
}

/// A thread in render order plus every post it references
#[derive(Debug, Clone)]
pub struct ThreadPage {
    pub view: ThreadView,
    pub posts: Vec<Post>,
}

#[derive(Debug, Clone)]
pub struct ProfilePage {
    pub profile: Profile,
    pub posts: Vec<Post>,
    pub cursor: Option<Cursor>,
}

#[derive(Debug, Clone, Default)]
pub struct NotificationPage {
    pub notifications: Vec<Notification>,
    /// Posts the notifications point at
    pub subjects: Vec<Post>,
    pub cursor: Option<Cursor>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    TransientNetwork,
    Auth,
    NotFound,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("rate limited")]
    RateLimited,
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Auth(_) => ErrorKind::Auth,
            ApiError::NotFound(_) => ErrorKind::NotFound,
            ApiError::Network(_) | ApiError::RateLimited | ApiError::InvalidResponse(_) => {
                ErrorKind::TransientNetwork
            }
        }
    }
}

#[async_trait]
pub trait Api: Send + Sync {
    /// Log in with an identifier and an app password
    async fn authenticate(&self, credentials: &Credentials) -> Result<Session, ApiError>;

    /// Continue a stored session, refreshing its tokens
    async fn resume_session(&self, session: Session) -> Result<Session, ApiError>;

    /// Home feed, newest first. `None` asks for the newest page.
    async fn fetch_feed_page(&self, cursor: Option<&Cursor>) -> Result<FeedPage, ApiError>;

    async fn fetch_thread(&self, root: &PostId) -> Result<ThreadPage, ApiError>;

    async fn fetch_profile(&self, actor: &str) -> Result<ProfilePage, ApiError>;

    async fn fetch_notifications(
        &self,
        cursor: Option<&Cursor>,
    ) -> Result<NotificationPage, ApiError>;

    /// Notifications indexed after the last `mark_notifications_seen`
    async fn unread_notifications(&self) -> Result<u32, ApiError>;

    async fn mark_notifications_seen(&self, seen_at: DateTime<Utc>) -> Result<(), ApiError>;

    /// Accounts whose handle or name starts with `query`
    async fn search_actors(&self, query: &str) -> Result<Vec<Author>, ApiError>;

    /// Accounts that liked `post`, most recent first
    async fn fetch_likes(&self, post: &PostId) -> Result<Vec<Author>, ApiError>;

    /// Returns the URI of the created like record
    async fn like(&self, post: &StrongRef) -> Result<String, ApiError>;

    async fn unlike(&self, record: &str) -> Result<(), ApiError>;

    /// Returns the URI of the created repost record
    async fn repost(&self, post: &StrongRef) -> Result<String, ApiError>;

    async fn unrepost(&self, record: &str) -> Result<(), ApiError>;

    /// Returns the URI of the created follow record
    async fn follow(&self, did: &str) -> Result<String, ApiError>;

    /// Publish a post and return it as the server renders it
    async fn create_post(&self, request: &CreatePostRequest) -> Result<Post, ApiError>;
}
