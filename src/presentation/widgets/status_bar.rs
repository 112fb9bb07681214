use crossterm::event::KeyEvent;
use ratatui::{prelude::*, widgets::Paragraph};

use crate::{
    model::{
        feed_sync::{FeedSync, SyncState},
        status_bar::{Level, Notice},
    },
    presentation::config::keybindings::key_event_to_string,
};

#[derive(Debug, Clone)]
pub struct ViewContext<'a> {
    pub handle: Option<&'a str>,
    pub sync: &'a FeedSync,
    pub pending_keys: &'a [KeyEvent],
    /// Unread notifications from the last poll
    pub unread: u32,
}

pub struct StatusBarWidget<'a> {
    notice: Option<&'a Notice>,
    ctx: ViewContext<'a>,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(notice: Option<&'a Notice>, ctx: ViewContext<'a>) -> Self {
        Self { notice, ctx }
    }

    pub fn user_name(&self) -> String {
        match self.ctx.handle {
            Some(handle) => format!("@{handle}"),
            None => String::from("(not signed in)"),
        }
    }

    pub fn sync_status(&self) -> String {
        let sync = self.ctx.sync;
        let mut status = match sync.state() {
            SyncState::Idle => String::from("synced"),
            SyncState::Fetching | SyncState::Merging => String::from("syncing..."),
            SyncState::Failed { attempts, .. } => format!("sync failed ({attempts}x), retrying"),
            SyncState::Halted => String::from("sync halted: sign in again"),
        };
        if sync.is_loading_older() {
            status.push_str(" | loading older...");
        }
        status
    }

    pub fn pending_keys(&self) -> String {
        self.ctx
            .pending_keys
            .iter()
            .map(|key| format!("<{}>", key_event_to_string(key)))
            .collect()
    }
}

impl Widget for StatusBarWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let layout = Layout::new(
            Direction::Vertical,
            [
                Constraint::Min(0),
                Constraint::Length(1), // User and sync line
                Constraint::Length(1), // Status message line
            ],
        )
        .split(area);

        let mut spans = vec![
            Span::styled(self.user_name(), Style::default().fg(Color::Gray).italic()),
            Span::raw(" | "),
            Span::styled(self.sync_status(), Style::default().fg(Color::Gray)),
        ];
        if self.ctx.unread > 0 {
            spans.push(Span::raw(" | "));
            spans.push(Span::styled(
                format!("{} unread", self.ctx.unread),
                Style::default().fg(Color::LightBlue),
            ));
        }
        let pending = self.pending_keys();
        if !pending.is_empty() {
            spans.push(Span::raw(" | "));
            spans.push(Span::styled(pending, Style::default().fg(Color::Yellow)));
        }
        Paragraph::new(Line::from(spans))
            .style(Style::default().bg(Color::Black))
            .render(layout[1], buf);

        if let Some(notice) = self.notice {
            let style = match notice.level {
                Level::Info => Style::default(),
                Level::Error => Style::default().fg(Color::Red),
            };
            Paragraph::new(Span::styled(notice.text.as_str(), style)).render(layout[2], buf);
        }
    }
}
