//! Scrollable list of posts shared by the feed, thread and profile frames

use ratatui::{prelude::*, widgets::*};
use tui_widget_list::{ListBuilder, ListState, ListView};

use crate::{domain::post::Post, presentation::widgets::post::PostWidget};

#[derive(Debug, Clone, Default)]
pub struct PostListComponent;

impl PostListComponent {
    pub fn new() -> Self {
        Self
    }

    pub fn view(
        &self,
        posts: &[&Post],
        selected: Option<usize>,
        empty_message: &str,
        frame: &mut Frame,
        area: Rect,
    ) {
        let padding = Padding::new(1, 1, 0, 0);

        if posts.is_empty() {
            let empty_block = Block::default().padding(Padding::new(1, 1, 1, 1));
            let empty_text = Paragraph::new(empty_message.to_string())
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center);

            let inner = empty_block.inner(area);
            frame.render_widget(empty_block, area);
            frame.render_widget(empty_text, inner);
            return;
        }

        let items: Vec<(PostWidget, u16)> = posts
            .iter()
            .map(|post| {
                let widget = PostWidget::new(post, padding);
                let height = widget.calculate_height(&area);
                (widget, height)
            })
            .collect();
        let item_count = items.len();

        let builder = ListBuilder::new(move |context| {
            let (mut widget, height) = items[context.index];
            widget.highlight = context.is_selected;
            (widget, height)
        });

        let mut list_state = ListState::default();
        list_state.select(selected);

        let list = ListView::new(builder, item_count).block(Block::default().padding(padding));
        frame.render_stateful_widget(list, area, &mut list_state);
    }
}
