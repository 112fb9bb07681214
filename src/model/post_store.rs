//! Owner of every post and notification the client has seen
//!
//! Frames only keep identities or indices; everything they render is resolved here.

use std::collections::HashMap;

use crate::{
    domain::{
        notification::Notification,
        post::{Post, PostId, ViewerMutation},
    },
    model::timeline::{MergeResult, Timeline},
};

#[derive(Debug, Clone, Default)]
pub struct PostStore {
    posts: HashMap<PostId, Post>,
    feed: Timeline<PostId>,
    notifications: HashMap<PostId, Notification>,
    notification_timeline: Timeline<PostId>,
}

impl PostStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn post(&self, id: &PostId) -> Option<&Post> {
        self.posts.get(id)
    }

    pub fn contains(&self, id: &PostId) -> bool {
        self.posts.contains_key(id)
    }

    pub fn feed(&self) -> &Timeline<PostId> {
        &self.feed
    }

    pub fn feed_len(&self) -> usize {
        self.feed.len()
    }

    pub fn feed_post_at(&self, index: usize) -> Option<&Post> {
        self.feed.get(index).and_then(|id| self.posts.get(id))
    }

    /// Position of `id` in the feed timeline
    pub fn index_of(&self, id: &PostId) -> Option<usize> {
        self.feed.index_of(id)
    }

    /// Merge a feed page: unknown posts are inserted in order, known ones only get their
    /// counters and labels refreshed
    pub fn merge(&mut self, page: Vec<Post>) -> MergeResult {
        let keys: Vec<_> = page.iter().map(Post::sort_key).collect();
        self.upsert(page);
        self.feed.merge(keys)
    }

    /// Store posts that are shown outside the feed (threads, profiles, quoted posts)
    pub fn upsert(&mut self, posts: impl IntoIterator<Item = Post>) {
        for post in posts {
            match self.posts.get_mut(&post.id) {
                Some(stored) => {
                    if post.sort_key() >= stored.sort_key() {
                        stored.refresh_from(&post);
                    }
                }
                None => {
                    self.posts.insert(post.id.clone(), post);
                }
            }
        }
    }

    /// Apply a like/repost outcome; absent posts are ignored
    pub fn patch_viewer_state(&mut self, id: &PostId, mutation: ViewerMutation) -> bool {
        match self.posts.get_mut(id) {
            Some(post) => {
                post.apply(mutation);
                true
            }
            None => false,
        }
    }

    pub fn notifications(&self) -> &Timeline<PostId> {
        &self.notification_timeline
    }

    pub fn notification_at(&self, index: usize) -> Option<&Notification> {
        self.notification_timeline
            .get(index)
            .and_then(|id| self.notifications.get(id))
    }

    pub fn merge_notifications(&mut self, page: Vec<Notification>) -> MergeResult {
        let keys: Vec<_> = page.iter().map(Notification::sort_key).collect();
        for notification in page {
            match self.notifications.get_mut(&notification.id) {
                Some(stored) => stored.is_read = notification.is_read,
                None => {
                    self.notifications
                        .insert(notification.id.clone(), notification);
                }
            }
        }
        self.notification_timeline.merge(keys)
    }

    pub fn unread_notifications(&self) -> usize {
        self.notifications.values().filter(|n| !n.is_read).count()
    }

    /// Mirror a successful `updateSeen` locally
    pub fn mark_notifications_read(&mut self) {
        for notification in self.notifications.values_mut() {
            notification.is_read = true;
        }
    }
}
