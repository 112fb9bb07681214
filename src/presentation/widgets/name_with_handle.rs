use ratatui::prelude::*;

use crate::domain::{post::Author, text::shorten_did};

const INVALID_HANDLE: &str = "handle.invalid";

pub struct NameWithHandle {
    did: String,
    display_name: Option<String>,
    handle: Option<String>,
    highlighted: bool,
}

impl NameWithHandle {
    pub fn new(author: &Author, highlighted: bool) -> Self {
        Self {
            did: author.did.clone(),
            display_name: author
                .display_name
                .clone()
                .filter(|display_name| !display_name.is_empty()),
            handle: (!author.handle.is_empty() && author.handle != INVALID_HANDLE)
                .then(|| format!("@{}", author.handle)),
            highlighted,
        }
    }

    pub fn display_name_style(&self) -> Style {
        if self.highlighted {
            Style::default().bold().reversed()
        } else {
            Style::default().bold()
        }
    }

    pub fn handle_style(&self) -> Style {
        if self.display_name.is_none() && self.highlighted {
            Style::default().italic().reversed()
        } else {
            Style::default().italic().fg(Color::Gray)
        }
    }
}

impl From<NameWithHandle> for Line<'static> {
    fn from(widget: NameWithHandle) -> Self {
        let display_name_style = widget.display_name_style();
        let handle_style = widget.handle_style();

        match (widget.display_name, widget.handle) {
            (Some(display_name), Some(handle)) => Line::from(vec![
                Span::styled(display_name, display_name_style),
                Span::raw(" "),
                Span::styled(handle, handle_style),
            ]),
            (Some(display_name), None) => Span::styled(display_name, display_name_style).into(),
            (None, Some(handle)) => Span::styled(handle, handle_style).into(),
            (None, None) => Span::styled(shorten_did(&widget.did), display_name_style).into(),
        }
    }
}

impl Widget for NameWithHandle {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let line: Line = self.into();
        line.render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use ratatui::prelude::Modifier;
    use rstest::rstest;

    use super::*;

    fn author(handle: &str, display_name: Option<&str>) -> Author {
        Author {
            did: String::from("did:plc:abcdefghijklmnopqrstuvwx"),
            handle: handle.to_string(),
            display_name: display_name.map(str::to_string),
        }
    }

    #[rstest]
    #[case(author("alice.bsky.social", Some("Alice")), "Alice @alice.bsky.social")]
    #[case(author("alice.bsky.social", None), "@alice.bsky.social")]
    #[case(author("alice.bsky.social", Some("")), "@alice.bsky.social")]
    #[case(author("handle.invalid", Some("Alice")), "Alice")]
    #[case(author("handle.invalid", None), "abcde:tuvwx")]
    fn test_name_with_handle(#[case] author: Author, #[case] expected: &str) {
        let line: Line = NameWithHandle::new(&author, false).into();
        assert_eq!(line.to_string(), expected);
    }

    #[test]
    fn test_highlighted_display_name_is_reversed() {
        let line: Line = NameWithHandle::new(&author("alice.bsky.social", Some("Alice")), true).into();

        let style = line.spans[0].style;
        assert!(style.add_modifier.contains(Modifier::BOLD));
        assert!(style.add_modifier.contains(Modifier::REVERSED));
        assert!(!line.spans[2].style.add_modifier.contains(Modifier::REVERSED));
    }

    #[test]
    fn test_render_handle_only() {
        let widget = NameWithHandle::new(&author("bob.test", None), false);
        let area = Rect::new(0, 0, 12, 1);
        let mut buffer = Buffer::empty(area);
        widget.render(area, &mut buffer);

        let content: String = buffer.content().iter().take(9).map(|cell| cell.symbol()).collect();
        assert_eq!(content, "@bob.test");
        assert_eq!(buffer.content()[0].modifier, Modifier::ITALIC);
    }
}
