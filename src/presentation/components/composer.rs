//! Composer overlay
//!
//! Draws the draft of the composer frame on top of the stack: text area, attached embeds,
//! post languages and the last validation or submit error.

use ratatui::{prelude::*, widgets::*};

use crate::{
    domain::text::char_count,
    model::composer::{Composer, EditMode, Focus},
};

const MAX_LANG_CANDIDATES: usize = 5;

#[derive(Debug, Clone, Default)]
pub struct ComposerComponent;

impl ComposerComponent {
    pub fn new() -> Self {
        Self
    }

    pub fn title(composer: &Composer) -> String {
        let base = match composer.reply_to() {
            Some(reply) => format!("Reply to {}", reply.parent_author.name()),
            None => String::from("New post"),
        };
        if composer.is_submitting() {
            format!("{base} (posting...)")
        } else {
            base
        }
    }

    pub fn mode_label(composer: &Composer) -> &'static str {
        match composer.mode() {
            EditMode::Normal => "NORMAL",
            EditMode::Insert => "INSERT",
            EditMode::EmbedPicker => "EMBED",
            EditMode::LangSelect => "LANG",
        }
    }

    fn focus_style(composer: &Composer, focus: Focus) -> Style {
        if composer.focus() == focus {
            Style::default().fg(Color::LightCyan)
        } else {
            Style::default().fg(Color::Gray)
        }
    }

    fn info_line(composer: &Composer) -> Line<'static> {
        let remaining = composer.remaining_chars();
        let remaining_style = if remaining < 0 {
            Style::default().fg(Color::Red).bold()
        } else {
            Style::default().fg(Color::Gray)
        };
        let langs = if composer.langs().is_empty() {
            String::from("-")
        } else {
            composer.langs().join(", ")
        };

        Line::from(vec![
            Span::styled(format!("langs: {langs}"), Self::focus_style(composer, Focus::Lang)),
            Span::raw(" | "),
            Span::styled(format!("{remaining} left"), remaining_style),
            Span::raw(" | "),
            Span::styled(
                format!("{} chars", char_count(&composer.text())),
                Style::default().fg(Color::Gray),
            ),
        ])
    }

    fn embed_lines(composer: &Composer) -> Vec<Line<'static>> {
        let picking = composer.mode() == EditMode::EmbedPicker;
        composer
            .embeds()
            .iter()
            .enumerate()
            .map(|(index, embed)| {
                let style = Self::focus_style(composer, Focus::Embed);
                let style = if picking && composer.selected_embed() == Some(index) {
                    style.reversed()
                } else {
                    style
                };
                Line::styled(format!("+ {}", embed.label()), style)
            })
            .collect()
    }

    fn lang_lines(composer: &Composer) -> Vec<Line<'static>> {
        let mut lines = vec![Line::styled(
            format!("lang: {}", composer.lang_query()),
            Style::default().fg(Color::LightCyan),
        )];
        let selected = composer.selected_lang_candidate();
        lines.extend(
            composer
                .lang_candidates()
                .into_iter()
                .enumerate()
                .take(MAX_LANG_CANDIDATES)
                .map(|(index, (code, name))| {
                    let line = format!("  {code} {name}");
                    if selected == Some(index) {
                        Line::styled(line, Style::default().reversed())
                    } else {
                        Line::raw(line)
                    }
                }),
        );
        lines
    }

    pub fn view(&self, composer: &Composer, frame: &mut Frame, area: Rect) {
        frame.render_widget(Clear, area);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(Self::title(composer))
            .title_bottom(Line::from(format!(" {} ", Self::mode_label(composer))).right_aligned())
            .border_style(Self::focus_style(composer, Focus::Text));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let extra = if composer.mode() == EditMode::LangSelect {
            Self::lang_lines(composer)
        } else {
            Self::embed_lines(composer)
        };
        let error = composer
            .error()
            .map(|e| Line::styled(e.to_string(), Style::default().fg(Color::Red)));

        let layout = Layout::vertical([
            Constraint::Min(1),
            Constraint::Length(extra.len() as u16),
            Constraint::Length(1),
            Constraint::Length(u16::from(error.is_some())),
        ])
        .split(inner);

        frame.render_widget(composer.textarea(), layout[0]);
        frame.render_widget(Paragraph::new(extra), layout[1]);
        frame.render_widget(Paragraph::new(Self::info_line(composer)), layout[2]);
        if let Some(error) = error {
            frame.render_widget(Paragraph::new(error), layout[3]);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        domain::post::fixtures::post,
        model::composer::{Message, MAX_CHARS},
    };

    fn press(composer: &mut Composer, code: KeyCode) {
        composer.update(Message::KeyPressed {
            key: KeyEvent::new(code, KeyModifiers::NONE),
            at: Instant::now(),
        });
    }

    #[test]
    fn test_title_for_reply() {
        let composer = Composer::reply(post("a", 0).reply_ref());
        assert_eq!(ComposerComponent::title(&composer), "Reply to @alice.bsky.social");
        assert_eq!(ComposerComponent::title(&Composer::new()), "New post");
    }

    #[test]
    fn test_mode_label_follows_edit_mode() {
        let mut composer = Composer::new();
        assert_eq!(ComposerComponent::mode_label(&composer), "NORMAL");

        press(&mut composer, KeyCode::Char('i'));
        assert_eq!(ComposerComponent::mode_label(&composer), "INSERT");
    }

    #[test]
    fn test_info_line_counts_remaining_chars() {
        let mut composer = Composer::new();
        composer.update(Message::Pasted(String::from("hello")));

        let line = ComposerComponent::info_line(&composer);

        assert_eq!(
            line.to_string(),
            format!("langs: - | {} left | 5 chars", MAX_CHARS - 5)
        );
    }
}
