use ratatui::{prelude::*, widgets::*};
use tui_widget_list::{ListBuilder, ListState, ListView};

use crate::{domain::post::Author, presentation::widgets::name_with_handle::NameWithHandle};

/// One account row: name and handle over a separator
#[derive(Clone, Copy, Debug)]
struct ActorItem<'a> {
    author: &'a Author,
    highlight: bool,
}

impl ActorItem<'_> {
    const HEIGHT: u16 = 2;
}

impl Widget for ActorItem<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let lines = vec![
            NameWithHandle::new(self.author, self.highlight).into(),
            Line::styled("─".repeat(area.width as usize), Style::default().fg(Color::Gray)),
        ];
        Paragraph::new(lines).render(area, buf);
    }
}

/// Lists of accounts: search results and the likers of a post
#[derive(Debug, Clone, Default)]
pub struct ActorListComponent;

impl ActorListComponent {
    pub fn new() -> Self {
        Self
    }

    pub fn view(
        &self,
        actors: &[Author],
        selected: Option<usize>,
        empty_text: &str,
        frame: &mut Frame,
        area: Rect,
    ) {
        if actors.is_empty() {
            let empty_text = Paragraph::new(empty_text.to_string())
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center);
            frame.render_widget(empty_text, area);
            return;
        }

        let items: Vec<ActorItem> = actors
            .iter()
            .map(|author| ActorItem {
                author,
                highlight: false,
            })
            .collect();
        let item_count = items.len();

        let builder = ListBuilder::new(move |context| {
            let mut item = items[context.index];
            item.highlight = context.is_selected;
            (item, ActorItem::HEIGHT)
        });

        let mut list_state = ListState::default();
        list_state.select(selected);

        let list = ListView::new(builder, item_count)
            .block(Block::default().padding(Padding::horizontal(1)));
        frame.render_stateful_widget(list, area, &mut list_state);
    }

    /// Query input above the results
    pub fn view_search(
        &self,
        query: &str,
        results: &[Author],
        selected: Option<usize>,
        frame: &mut Frame,
        area: Rect,
    ) {
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(area);

        let input = Paragraph::new(Line::from(vec![
            Span::raw(query.to_string()),
            Span::styled("█", Style::default().fg(Color::Gray)),
        ]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Search accounts")
                .padding(Padding::horizontal(1)),
        );
        frame.render_widget(input, layout[0]);

        let empty_text = if query.trim().is_empty() {
            "Type a name or handle"
        } else {
            "No matching accounts"
        };
        self.view(results, selected, empty_text, frame, layout[1]);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use ratatui::{backend::TestBackend, Terminal};

    use super::*;
    use crate::domain::post::fixtures::author;

    fn screen(terminal: &Terminal<TestBackend>) -> Vec<String> {
        let buffer = terminal.backend().buffer();
        (0..buffer.area.height)
            .map(|y| {
                (0..buffer.area.width)
                    .map(|x| buffer[(x, y)].symbol())
                    .collect::<String>()
                    .trim_end()
                    .to_string()
            })
            .collect()
    }

    #[test]
    fn test_search_shows_query_and_results() {
        let mut terminal = Terminal::new(TestBackend::new(40, 8)).expect("terminal");
        let results = vec![author("bob"), author("bea")];

        terminal
            .draw(|frame| {
                ActorListComponent::new().view_search("b", &results, Some(0), frame, frame.area())
            })
            .expect("drawn");

        let lines = screen(&terminal);
        assert!(lines[1].starts_with("│ b█"), "{lines:?}");
        assert_eq!(lines[3].trim(), "@bob.bsky.social");
        assert_eq!(lines[5].trim(), "@bea.bsky.social");
    }

    #[test]
    fn test_empty_query_shows_a_hint() {
        let mut terminal = Terminal::new(TestBackend::new(40, 6)).expect("terminal");

        terminal
            .draw(|frame| ActorListComponent::new().view_search("", &[], None, frame, frame.area()))
            .expect("drawn");

        assert!(screen(&terminal)
            .iter()
            .any(|line| line.trim() == "Type a name or handle"));
    }
}
