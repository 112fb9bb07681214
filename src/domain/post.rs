use std::fmt;

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    embed::{EmbedItem, PostEmbed},
    sort_key::SortKey,
    text::find_urls,
};

/// Identity of a post: its `at://` record URI
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PostId(String);

impl PostId {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The author's DID, taken from the URI authority
    pub fn author_did(&self) -> Option<&str> {
        self.0.strip_prefix("at://")?.split('/').next()
    }

    /// The record key (last path segment)
    pub fn rkey(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or_default()
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub did: String,
    pub handle: String,
    pub display_name: Option<String>,
}

impl Author {
    pub fn name(&self) -> String {
        match &self.display_name {
            Some(display_name) if !display_name.is_empty() => display_name.clone(),
            _ => format!("@{}", self.handle),
        }
    }
}

/// A like or repost counter together with the viewer's own record, if any
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Engagement {
    pub count: u32,
    pub viewer: Option<String>,
}

impl Engagement {
    pub fn new(count: u32, viewer: Option<String>) -> Self {
        Self { count, viewer }
    }

    pub fn is_active(&self) -> bool {
        self.viewer.is_some()
    }

    fn activate(&mut self, record: String) {
        if self.viewer.is_none() {
            self.count = self.count.saturating_add(1);
        }
        self.viewer = Some(record);
    }

    fn deactivate(&mut self) {
        if self.viewer.take().is_some() {
            self.count = self.count.saturating_sub(1);
        }
    }
}

/// Patch applied after a like/repost request succeeds
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewerMutation {
    Liked { record: String },
    Unliked,
    Reposted { record: String },
    Unreposted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepostedBy {
    pub author: Author,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyContext {
    Parent { author: Author, following: bool },
    DeletedPost,
    BlockedUser,
}

/// A `(uri, cid)` pair pinning one version of a record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrongRef {
    pub uri: PostId,
    pub cid: String,
}

/// Where a new post attaches when it is a reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyRef {
    pub root: StrongRef,
    pub parent: StrongRef,
    pub parent_author: Author,
}

/// A validated draft ready to be sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePostRequest {
    pub text: String,
    pub langs: Vec<String>,
    pub embeds: Vec<EmbedItem>,
    pub reply: Option<ReplyRef>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: PostId,
    pub cid: String,
    pub author: Author,
    pub text: String,
    pub embed: Option<PostEmbed>,
    pub like: Engagement,
    pub repost: Engagement,
    pub reply_count: u32,
    pub quote_count: u32,
    pub labels: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub reason: Option<RepostedBy>,
    pub reply_to: Option<ReplyContext>,
    /// Root of the thread this post belongs to, when it is itself a reply
    pub thread_root: Option<StrongRef>,
}

impl Post {
    /// Position of this post in a timeline: reposts sort by the repost time
    pub fn sort_key(&self) -> SortKey<PostId> {
        let at = self
            .reason
            .as_ref()
            .map(|reason| reason.at)
            .unwrap_or(self.created_at);
        SortKey::new(at, self.id.clone())
    }

    pub fn created_at_local(&self) -> String {
        self.created_at
            .with_timezone(&Local)
            .format("%m-%d %H:%M")
            .to_string()
    }

    /// Replies to accounts the viewer does not follow are hidden from the home feed
    pub fn is_hidden_reply(&self) -> bool {
        match &self.reply_to {
            Some(ReplyContext::Parent { following, .. }) => !following,
            Some(ReplyContext::DeletedPost | ReplyContext::BlockedUser) => true,
            None => false,
        }
    }

    /// Copy the server-owned counters and labels of a fresher copy of this post
    ///
    /// Body, embed and viewer state are left untouched.
    pub fn refresh_from(&mut self, fresher: &Post) -> bool {
        let before = (
            self.like.count,
            self.repost.count,
            self.reply_count,
            self.quote_count,
        );
        let changed = before
            != (
                fresher.like.count,
                fresher.repost.count,
                fresher.reply_count,
                fresher.quote_count,
            )
            || self.labels != fresher.labels;

        self.like.count = fresher.like.count;
        self.repost.count = fresher.repost.count;
        self.reply_count = fresher.reply_count;
        self.quote_count = fresher.quote_count;
        self.labels.clone_from(&fresher.labels);
        changed
    }

    pub fn apply(&mut self, mutation: ViewerMutation) {
        match mutation {
            ViewerMutation::Liked { record } => self.like.activate(record),
            ViewerMutation::Unliked => self.like.deactivate(),
            ViewerMutation::Reposted { record } => self.repost.activate(record),
            ViewerMutation::Unreposted => self.repost.deactivate(),
        }
    }

    pub fn strong_ref(&self) -> StrongRef {
        StrongRef {
            uri: self.id.clone(),
            cid: self.cid.clone(),
        }
    }

    /// Reply reference for answering this post
    pub fn reply_ref(&self) -> ReplyRef {
        let parent = self.strong_ref();
        ReplyRef {
            root: self.thread_root.clone().unwrap_or_else(|| parent.clone()),
            parent,
            parent_author: self.author.clone(),
        }
    }

    pub fn first_link(&self) -> Option<String> {
        find_urls(&self.text).into_iter().next()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::TimeZone;

    use super::*;

    pub fn author(handle: &str) -> Author {
        Author {
            did: format!("did:plc:{handle}"),
            handle: format!("{handle}.bsky.social"),
            display_name: None,
        }
    }

    /// A plain post created `secs` seconds after the epoch
    pub fn post(name: &str, secs: i64) -> Post {
        Post {
            id: PostId::new(format!("at://did:plc:alice/app.bsky.feed.post/{name}")),
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
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    use super::fixtures::{author, post};
    use super::*;

    #[test]
    fn test_post_id_parts() {
        let id = PostId::new("at://did:plc:alice/app.bsky.feed.post/3kabc");
        assert_eq!(id.author_did(), Some("did:plc:alice"));
        assert_eq!(id.rkey(), "3kabc");
    }

    #[test]
    fn test_author_name_prefers_display_name() {
        let mut author = author("bob");
        assert_eq!(author.name(), "@bob.bsky.social");

        author.display_name = Some(String::from("Bob"));
        assert_eq!(author.name(), "Bob");

        author.display_name = Some(String::new());
        assert_eq!(author.name(), "@bob.bsky.social");
    }

    #[test]
    fn test_sort_key_uses_repost_time() {
        let mut p = post("a", 1000);
        assert_eq!(p.sort_key().at, p.created_at);

        let reposted_at = Utc.timestamp_opt(5000, 0).single().expect("valid timestamp");
        p.reason = Some(RepostedBy {
            author: author("carol"),
            at: reposted_at,
        });
        assert_eq!(p.sort_key().at, reposted_at);
    }

    #[test]
    fn test_apply_like_and_unlike() {
        let mut p = post("a", 1000);
        p.like.count = 3;

        p.apply(ViewerMutation::Liked {
            record: "at://like/1".into(),
        });
        assert_eq!(p.like, Engagement::new(4, Some("at://like/1".into())));

        // A second like confirmation does not double count
        p.apply(ViewerMutation::Liked {
            record: "at://like/1".into(),
        });
        assert_eq!(p.like.count, 4);

        p.apply(ViewerMutation::Unliked);
        assert_eq!(p.like, Engagement::new(3, None));

        p.apply(ViewerMutation::Unliked);
        assert_eq!(p.like.count, 3);
    }

    #[test]
    fn test_refresh_from_keeps_viewer_state_and_body() {
        let mut stored = post("a", 1000);
        stored.like = Engagement::new(1, Some("at://like/mine".into()));

        let mut fresher = post("a", 1000);
        fresher.text = String::from("edited elsewhere");
        fresher.like = Engagement::new(7, None);
        fresher.labels = vec![String::from("nsfw")];

        assert!(stored.refresh_from(&fresher));
        assert_eq!(stored.like, Engagement::new(7, Some("at://like/mine".into())));
        assert_eq!(stored.labels, vec![String::from("nsfw")]);
        assert_eq!(stored.text, "post a");

        assert!(!stored.refresh_from(&fresher));
    }

    #[test]
    fn test_reply_ref_keeps_thread_root() {
        let mut p = post("b", 1000);
        assert_eq!(p.reply_ref().root, p.strong_ref());

        let root = post("a", 500).strong_ref();
        p.thread_root = Some(root.clone());
        let reply = p.reply_ref();
        assert_eq!(reply.root, root);
        assert_eq!(reply.parent, p.strong_ref());
    }

    #[test]
    fn test_is_hidden_reply() {
        let mut p = post("a", 1000);
        assert!(!p.is_hidden_reply());

        p.reply_to = Some(ReplyContext::Parent {
            author: author("bob"),
            following: true,
        });
        assert!(!p.is_hidden_reply());

        p.reply_to = Some(ReplyContext::Parent {
            author: author("bob"),
            following: false,
        });
        assert!(p.is_hidden_reply());
    }
}
