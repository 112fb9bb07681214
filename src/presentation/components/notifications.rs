use ratatui::{prelude::*, widgets::*};
use tui_widget_list::{ListBuilder, ListState, ListView};

use crate::{
    domain::{notification::Notification, post::Post, text},
    presentation::widgets::name_with_handle::NameWithHandle,
};

/// One notification row: who did what, plus the first line of the post it is about
#[derive(Clone, Copy, Debug)]
struct NotificationItem<'a> {
    notification: &'a Notification,
    subject: Option<&'a Post>,
    highlight: bool,
}

impl NotificationItem<'_> {
    fn height(&self) -> u16 {
        if self.subject.is_some() {
            3
        } else {
            2
        }
    }
}

impl Widget for NotificationItem<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut first: Line = NameWithHandle::new(&self.notification.author, self.highlight).into();
        first.push_span(Span::raw(" "));
        first.push_span(Span::raw(self.notification.reason.describe()));
        if !self.notification.is_read {
            first.push_span(Span::styled(" ●", Style::default().fg(Color::LightBlue)));
        }

        let mut lines = vec![first];
        if let Some(subject) = self.subject {
            let snippet = text::truncate_text(
                &text::wrap_text(&subject.text.replace('\n', " "), area.width as usize),
                1,
            );
            lines.push(Line::styled(snippet, Style::default().fg(Color::DarkGray)));
        }
        lines.push(Line::styled(
            "─".repeat(area.width as usize),
            Style::default().fg(Color::Gray),
        ));
        Paragraph::new(lines).render(area, buf);
    }
}

#[derive(Debug, Clone, Default)]
pub struct NotificationsComponent;

impl NotificationsComponent {
    pub fn new() -> Self {
        Self
    }

    pub fn view(
        &self,
        notifications: &[(&Notification, Option<&Post>)],
        selected: Option<usize>,
        frame: &mut Frame,
        area: Rect,
    ) {
        if notifications.is_empty() {
            let empty_text = Paragraph::new("No notifications")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center);
            frame.render_widget(empty_text, area);
            return;
        }

        let items: Vec<NotificationItem> = notifications
            .iter()
            .map(|(notification, subject)| NotificationItem {
                notification: *notification,
                subject: *subject,
                highlight: false,
            })
            .collect();
        let item_count = items.len();

        let builder = ListBuilder::new(move |context| {
            let mut item = items[context.index];
            item.highlight = context.is_selected;
            (item, item.height())
        });

        let mut list_state = ListState::default();
        list_state.select(selected);

        let list = ListView::new(builder, item_count)
            .block(Block::default().padding(Padding::horizontal(1)));
        frame.render_stateful_widget(list, area, &mut list_state);
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::domain::{
        notification::NotificationReason,
        post::{
            fixtures::{author, post},
            PostId,
        },
    };

    fn notification(reason: NotificationReason, is_read: bool) -> Notification {
        Notification {
            id: PostId::new("at://did:plc:bob/app.bsky.feed.like/1"),
            reason,
            author: author("bob"),
            subject: None,
            indexed_at: Utc.timestamp_opt(0, 0).single().expect("valid timestamp"),
            is_read,
        }
    }

    fn lines(item: NotificationItem, area: Rect) -> Vec<String> {
        let mut buffer = Buffer::empty(area);
        item.render(area, &mut buffer);
        (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buffer[(x, y)].symbol())
                    .collect::<String>()
                    .trim_end()
                    .to_string()
            })
            .collect()
    }

    #[test]
    fn test_like_shows_subject_snippet() {
        let n = notification(NotificationReason::Like, true);
        let subject = post("a", 0);
        let item = NotificationItem {
            notification: &n,
            subject: Some(&subject),
            highlight: false,
        };

        assert_eq!(item.height(), 3);
        let lines = lines(item, Rect::new(0, 0, 40, 3));
        assert_eq!(lines[0], "@bob.bsky.social liked your post");
        assert_eq!(lines[1], "post a");
    }

    #[test]
    fn test_unread_follow_is_marked() {
        let n = notification(NotificationReason::Follow, false);
        let item = NotificationItem {
            notification: &n,
            subject: None,
            highlight: false,
        };

        assert_eq!(item.height(), 2);
        let lines = lines(item, Rect::new(0, 0, 40, 2));
        assert_eq!(lines[0], "@bob.bsky.social followed you ●");
    }
}
