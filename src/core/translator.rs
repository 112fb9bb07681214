//! Key translation
//!
//! Ctrl-C quits from any frame. Composer and search frames take raw keys; every other frame
//! resolves keys through the configured bindings, buffering multi-key sequences such as `gg`.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::{
    core::{
        action::Action,
        message::{AppMsg, FeedMsg, SystemMsg},
    },
    model::{
        actor_search, composer,
        key_sequence::{KeySequence, Match},
        navigation::{FrameKind, ViewFrame},
    },
    presentation::config::keybindings::{self, KeyBindings},
};

pub fn translate_key(
    key: KeyEvent,
    at: Instant,
    top: &ViewFrame,
    pending: &mut KeySequence,
    bindings: &KeyBindings,
) -> Option<AppMsg> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        pending.clear();
        return Some(AppMsg::System(SystemMsg::Quit));
    }

    if let FrameKind::Composer(_) = top.kind {
        pending.clear();
        return Some(AppMsg::Composer(composer::Message::KeyPressed { key, at }));
    }

    if let FrameKind::Search(_) = top.kind {
        pending.clear();
        return translate_search_key(key);
    }

    match pending.push(keybindings::normalize(key), at, |keys| bindings.resolve(keys)) {
        Match::Exact(action) => Some(translate_action(action)),
        Match::Prefix | Match::NoMatch => None,
    }
}

/// Text keys edit the query; navigation keys act on the result list
fn translate_search_key(key: KeyEvent) -> Option<AppMsg> {
    let feed = match key.code {
        KeyCode::Esc => FeedMsg::Back,
        KeyCode::Enter => FeedMsg::OpenProfile,
        KeyCode::Up => FeedMsg::ScrollUp,
        KeyCode::Down => FeedMsg::ScrollDown,
        KeyCode::Backspace => return Some(AppMsg::Search(actor_search::Message::Erased)),
        KeyCode::Char(c)
            if !key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            return Some(AppMsg::Search(actor_search::Message::Typed(c)))
        }
        _ => return None,
    };
    Some(AppMsg::Feed(feed))
}

pub fn translate_action(action: Action) -> AppMsg {
    let feed = match action {
        Action::Quit => return AppMsg::System(SystemMsg::Quit),
        Action::Back => FeedMsg::Back,
        Action::ScrollUp => FeedMsg::ScrollUp,
        Action::ScrollDown => FeedMsg::ScrollDown,
        Action::ScrollToTop => FeedMsg::ScrollToTop,
        Action::ScrollToBottom => FeedMsg::ScrollToBottom,
        Action::OpenThread => FeedMsg::OpenThread,
        Action::OpenProfile => FeedMsg::OpenProfile,
        Action::OpenNotifications => FeedMsg::OpenNotifications,
        Action::OpenSearch => FeedMsg::OpenSearch,
        Action::OpenLikes => FeedMsg::OpenLikes,
        Action::OpenMedia => FeedMsg::OpenMedia,
        Action::OpenLink => FeedMsg::OpenLink,
        Action::OpenInBrowser => FeedMsg::OpenInBrowser,
        Action::NewPost => FeedMsg::NewPost,
        Action::Reply => FeedMsg::Reply,
        Action::Quote => FeedMsg::Quote,
        Action::ToggleLike => FeedMsg::ToggleLike,
        Action::ToggleRepost => FeedMsg::ToggleRepost,
        Action::Follow => FeedMsg::Follow,
    };
    AppMsg::Feed(feed)
}
