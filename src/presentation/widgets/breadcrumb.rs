use ratatui::{prelude::*, widgets::Tabs};

/// Titles of the frames on the navigation stack, newest selected
#[derive(Clone, Debug)]
pub struct BreadcrumbWidget {
    titles: Vec<&'static str>,
}

impl BreadcrumbWidget {
    pub fn new(titles: Vec<&'static str>) -> Self {
        Self { titles }
    }
}

impl Widget for BreadcrumbWidget {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let selected = self.titles.len().saturating_sub(1);
        Tabs::new(self.titles)
            .select(selected)
            .divider(">")
            .style(Style::default().bg(Color::Black))
            .highlight_style(Style::default().reversed())
            .render(area, buf);
    }
}
