use ratatui::{prelude::*, widgets::*};

use crate::{
    domain::{
        embed::QuotedRecord,
        post::{Post, ReplyContext},
        text,
    },
    presentation::widgets::{name_with_handle::NameWithHandle, post_stats::PostStats},
};

/// One post in a list: context line, author, body, embed summary, time and counters
#[derive(Clone, Copy, Debug)]
pub struct PostWidget<'a> {
    pub post: &'a Post,
    pub padding: Padding, // Only use to calc width/height
    pub highlight: bool,
}

impl<'a> PostWidget<'a> {
    pub fn new(post: &'a Post, padding: Padding) -> Self {
        Self {
            post,
            padding,
            highlight: false,
        }
    }

    pub fn calculate_height(&self, area: &Rect) -> u16 {
        let width = area
            .width
            .saturating_sub(self.padding.left + self.padding.right);
        let height = area.height.saturating_sub(self.padding.top + self.padding.bottom);
        self.text(width as usize, height as usize).height() as u16
    }

    fn context_line(&self) -> Option<Line<'static>> {
        if let Some(reason) = &self.post.reason {
            return Some(Line::styled(
                format!("Reposted by {}", reason.author.name()),
                Style::default().fg(Color::Green),
            ));
        }
        let reply = match &self.post.reply_to {
            Some(ReplyContext::Parent { author, .. }) => format!("Reply to {}", author.name()),
            Some(ReplyContext::DeletedPost) => String::from("Reply to a deleted post"),
            Some(ReplyContext::BlockedUser) => String::from("Reply to a blocked user"),
            None => return None,
        };
        Some(Line::styled(reply, Style::default().fg(Color::Cyan)))
    }

    fn embed_lines(&self, width: usize) -> Vec<Line<'static>> {
        let Some(embed) = &self.post.embed else {
            return vec![];
        };

        let mut lines = vec![Line::styled(
            text::truncate_text(&text::wrap_text(&embed.to_string(), width), 1),
            Style::default().fg(Color::Magenta),
        )];
        if let Some(QuotedRecord::Post { text: quoted, .. }) = embed.quoted() {
            let quoted = quoted.replace('\n', " ");
            lines.push(Line::styled(
                text::truncate_text(&text::wrap_text(&format!("> {quoted}"), width), 1),
                Style::default().fg(Color::DarkGray),
            ));
        }
        lines
    }

    fn text(&self, width: usize, max_height: usize) -> Text<'static> {
        let mut header: Vec<Line> = self.context_line().into_iter().collect();
        header.push(NameWithHandle::new(&self.post.author, self.highlight).into());

        let mut footer = self.embed_lines(width);
        if !self.post.labels.is_empty() {
            footer.push(Line::styled(
                format!("[{}]", self.post.labels.join(", ")),
                Style::default().fg(Color::Yellow),
            ));
        }
        footer.push(Line::styled(
            self.post.created_at_local(),
            Style::default().fg(Color::Gray),
        ));
        footer.push(PostStats::new(self.post).into());
        footer.push(Line::styled(
            "─".repeat(width),
            Style::default().fg(Color::Gray),
        ));

        let available = max_height.saturating_sub(header.len() + footer.len());
        let body = text::truncate_text(&text::wrap_text(&self.post.text, width), available);

        let mut text = Text::from(header);
        if !body.is_empty() {
            text.extend(Text::from(body).lines);
        }
        text.extend(footer);
        text
    }
}

impl Widget for PostWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(self.text(area.width as usize, area.height as usize)).render(area, buf);
    }
}
