use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::domain::{
    post::{Author, PostId},
    sort_key::SortKey,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum NotificationReason {
    Like,
    Repost,
    Follow,
    Mention,
    Reply,
    Quote,
}

impl NotificationReason {
    pub fn describe(&self) -> &'static str {
        match self {
            NotificationReason::Like => "liked your post",
            NotificationReason::Repost => "reposted your post",
            NotificationReason::Follow => "followed you",
            NotificationReason::Mention => "mentioned you",
            NotificationReason::Reply => "replied to your post",
            NotificationReason::Quote => "quoted your post",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// URI of the record that caused the notification
    pub id: PostId,
    pub reason: NotificationReason,
    pub author: Author,
    /// The post the notification is about (liked, reposted, replied to...)
    pub subject: Option<PostId>,
    pub indexed_at: DateTime<Utc>,
    pub is_read: bool,
}

impl Notification {
    pub fn sort_key(&self) -> SortKey<PostId> {
        SortKey::new(self.indexed_at, self.id.clone())
    }

    /// Post to open when the notification is selected
    ///
    /// Replies, mentions and quotes are posts themselves; likes and reposts point at the subject.
    pub fn target(&self) -> Option<&PostId> {
        match self.reason {
            NotificationReason::Mention | NotificationReason::Reply | NotificationReason::Quote => {
                Some(&self.id)
            }
            NotificationReason::Like | NotificationReason::Repost => self.subject.as_ref(),
            NotificationReason::Follow => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::domain::post::fixtures::author;

    fn notification(reason: NotificationReason) -> Notification {
        Notification {
            id: PostId::new("at://did:plc:bob/app.bsky.feed.post/reply"),
            reason,
            author: author("bob"),
            subject: Some(PostId::new("at://did:plc:alice/app.bsky.feed.post/mine")),
            indexed_at: Utc.timestamp_opt(100, 0).single().expect("valid timestamp"),
            is_read: false,
        }
    }

    #[test]
    fn test_target_depends_on_reason() {
        assert_eq!(
            notification(NotificationReason::Reply).target(),
            Some(&PostId::new("at://did:plc:bob/app.bsky.feed.post/reply"))
        );
        assert_eq!(
            notification(NotificationReason::Like).target(),
            Some(&PostId::new("at://did:plc:alice/app.bsky.feed.post/mine"))
        );
        assert_eq!(notification(NotificationReason::Follow).target(), None);
    }

    #[test]
    fn test_reason_parses_wire_names() {
        assert_eq!(
            NotificationReason::from_str("quote").ok(),
            Some(NotificationReason::Quote)
        );
        assert!(NotificationReason::from_str("starterpack-joined").is_err());
    }
}
