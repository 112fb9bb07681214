use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Commands a key binding can name on feed-like frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
pub enum Action {
    Quit,
    Back,
    ScrollUp,
    ScrollDown,
    ScrollToTop,
    ScrollToBottom,
    OpenThread,
    OpenProfile,
    OpenNotifications,
    OpenSearch,
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
