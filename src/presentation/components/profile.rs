use ratatui::{prelude::*, widgets::*};
use thousands::Separable;

use crate::{
    domain::{post::Post, profile::Profile, text},
    presentation::{components::post_list::PostListComponent, widgets::name_with_handle::NameWithHandle},
};

const MAX_DESCRIPTION_LINES: usize = 3;

#[derive(Debug, Clone, Default)]
pub struct ProfileComponent {
    posts: PostListComponent,
}

impl ProfileComponent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(profile: &Profile, width: usize) -> Text<'static> {
        let mut name: Line = NameWithHandle::new(&profile.as_author(), false).into();
        if profile.is_followed() {
            name.push_span(Span::styled(" [following]", Style::default().fg(Color::LightGreen)));
        }

        let mut text = Text::from(name);
        if let Some(description) = profile.description.as_deref().filter(|d| !d.is_empty()) {
            let description =
                text::truncate_text(&text::wrap_text(description, width), MAX_DESCRIPTION_LINES);
            text.extend(Text::from(description).lines);
        }
        text.extend([Line::styled(
            format!(
                "{} followers  {} following  {} posts",
                profile.followers_count.separate_with_commas(),
                profile.follows_count.separate_with_commas(),
                profile.posts_count.separate_with_commas(),
            ),
            Style::default().fg(Color::Gray),
        )]);
        if !profile.labels.is_empty() {
            text.extend([Line::styled(
                format!("[{}]", profile.labels.join(", ")),
                Style::default().fg(Color::Yellow),
            )]);
        }
        text
    }

    pub fn view(
        &self,
        profile: &Profile,
        posts: &[&Post],
        selected: Option<usize>,
        frame: &mut Frame,
        area: Rect,
    ) {
        let block = Block::default()
            .borders(Borders::BOTTOM)
            .padding(Padding::horizontal(1));
        let width = block.inner(area).width as usize;
        let header = Self::header(profile, width);

        let layout = Layout::vertical([
            Constraint::Length(header.height() as u16 + 1),
            Constraint::Min(0),
        ])
        .split(area);

        frame.render_widget(Paragraph::new(header).block(block), layout[0]);
        self.posts
            .view(posts, selected, "No posts yet", frame, layout[1]);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn profile() -> Profile {
        Profile {
            did: String::from("did:plc:alice"),
            handle: String::from("alice.test"),
            display_name: Some(String::from("Alice")),
            description: Some(String::from("hello\nworld")),
            followers_count: 1200,
            follows_count: 3,
            posts_count: 45,
            viewer_following: None,
            labels: vec![],
        }
    }

    #[test]
    fn test_header_lines() {
        let header = ProfileComponent::header(&profile(), 40);

        let lines: Vec<String> = header.lines.iter().map(ToString::to_string).collect();
        assert_eq!(
            lines,
            vec![
                "Alice @alice.test",
                "hello",
                "world",
                "1,200 followers  3 following  45 posts",
            ]
        );
    }

    #[test]
    fn test_header_marks_followed_profile() {
        let mut profile = profile();
        profile.viewer_following = Some(String::from("at://follow/1"));
        profile.description = None;

        let header = ProfileComponent::header(&profile, 40);

        assert_eq!(header.lines[0].to_string(), "Alice @alice.test [following]");
        assert_eq!(header.height(), 2);
    }
}
